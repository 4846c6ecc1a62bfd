//! Services module
//!
//! Este módulo contiene la lógica de negocio y servicios de la aplicación:
//! reglas de stock y nómina, exportaciones, contraseñas y notificaciones.

pub mod excel_export;
pub mod line_notify;
pub mod password;
pub mod payroll;
pub mod pdf_export;
pub mod stock_rules;

pub use line_notify::{LineNotifyClient, StockAlertNotifier};
