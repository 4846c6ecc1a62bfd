//! Rutas HTTP
//!
//! Cada módulo expone un `Router<AppState>`; `create_app` los monta bajo
//! `/api` junto con el health check, CORS, compresión y el trace de requests.

pub mod auth_routes;
pub mod cron_routes;
pub mod employee_routes;
pub mod report_routes;
pub mod stock_routes;

use axum::{routing::get, Json, Router};
use serde_json::{json, Value};
use tower_http::{compression::CompressionLayer, trace::TraceLayer};

use crate::middleware::cors::cors_layer;
use crate::state::AppState;

/// Router completo de la aplicación
pub fn create_app(state: AppState) -> Router {
    let cors = cors_layer(&state.config.cors_origins);

    Router::new()
        .route("/health", get(health))
        .nest("/api/auth", auth_routes::create_auth_router())
        .nest("/api/stock", stock_routes::create_stock_router())
        .nest("/api/employees", employee_routes::create_employee_router())
        .nest("/api/reports", report_routes::create_report_router())
        .nest("/api/cron", cron_routes::create_cron_router(state.clone()))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
