pub mod auth_dto;
pub mod common_dto;
pub mod employee_dto;
pub mod report_dto;
pub mod stock_dto;
