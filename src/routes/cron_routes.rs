use axum::{extract::State, middleware::from_fn_with_state, routing::get, Json, Router};

use crate::controllers::alert_controller::AlertController;
use crate::dto::report_dto::StockAlertResponse;
use crate::middleware::auth::cron_auth_middleware;
use crate::state::AppState;
use crate::utils::errors::AppError;

/// Endpoints disparados por un scheduler externo, montados en `/api/cron`
pub fn create_cron_router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/stock-alert", get(stock_alert).post(stock_alert))
        .route_layer(from_fn_with_state(state, cron_auth_middleware))
}

async fn stock_alert(State(state): State<AppState>) -> Result<Json<StockAlertResponse>, AppError> {
    let controller = AlertController::new(state.pool.clone());
    let response = controller.run_stock_alert(state.notifier.as_ref()).await?;
    Ok(Json(response))
}
