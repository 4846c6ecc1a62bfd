//! Repositorios
//!
//! Acceso a PostgreSQL por agregado. Cada repositorio posee un clon del `PgPool`.

pub mod advance_repository;
pub mod employee_repository;
pub mod material_repository;
pub mod salary_repository;
pub mod stock_repository;
pub mod trip_repository;
pub mod user_repository;
