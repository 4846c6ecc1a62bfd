//! Modelos del sistema
//!
//! Este módulo contiene todos los modelos de datos que mapean exactamente
//! al schema PostgreSQL de `migrations/`.

pub mod advance;
pub mod employee;
pub mod material;
pub mod salary;
pub mod stock;
pub mod trip;
pub mod user;
