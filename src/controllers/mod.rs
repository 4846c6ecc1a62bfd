//! Controllers
//!
//! Validación de requests, reglas de negocio y armado de DTOs. Cada controller
//! se construye por request a partir del `PgPool` compartido.

pub mod alert_controller;
pub mod auth_controller;
pub mod employee_controller;
pub mod material_controller;
pub mod report_controller;
pub mod salary_controller;
pub mod stock_controller;
pub mod trip_controller;
