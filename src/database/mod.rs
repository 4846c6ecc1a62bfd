//! Módulo de base de datos
//!
//! Maneja la conexión, migraciones y datos iniciales de PostgreSQL

pub mod connection;
pub mod seed;

pub use connection::DatabaseConnection;
