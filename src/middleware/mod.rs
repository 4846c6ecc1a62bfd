//! Middleware del sistema
//!
//! Este módulo contiene el middleware de sesión, del secreto de cron y CORS.

pub mod auth;
pub mod cors;

pub use auth::*;
pub use cors::*;
