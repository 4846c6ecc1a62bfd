//! Back office de materiales de construcción
//!
//! API HTTP (axum + PostgreSQL) para el inventario de materiales, los viajes
//! y adelantos de los conductores y la nómina mensual.

pub mod config;
pub mod controllers;
pub mod database;
pub mod dto;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod state;
pub mod utils;

pub use routes::create_app;
pub use state::AppState;
