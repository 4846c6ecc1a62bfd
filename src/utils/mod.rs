//! Utilidades del sistema
//!
//! Este módulo contiene utilidades para manejo de errores, validación
//! y la sesión firmada.

pub mod errors;
pub mod session;
pub mod validation;
