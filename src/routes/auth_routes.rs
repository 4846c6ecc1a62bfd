use axum::{
    extract::{rejection::JsonRejection, State},
    http::header,
    response::{IntoResponse, Redirect},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;

use crate::controllers::auth_controller::AuthController;
use crate::dto::auth_dto::LoginRequest;
use crate::middleware::auth::AuthenticatedUser;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::session::expired_session_cookie;

/// Configura las rutas de autenticación
pub fn create_auth_router() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/logout", post(logout).get(logout_redirect))
        .route("/me", get(me))
}

async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(request) = payload?;
    let controller = AuthController::new(state.pool.clone());
    let (response, cookie) = controller.login(request, &state.session_config()).await?;
    Ok(([(header::SET_COOKIE, cookie)], Json(response)))
}

async fn logout(State(state): State<AppState>) -> impl IntoResponse {
    let cookie = expired_session_cookie(&state.session_config());
    ([(header::SET_COOKIE, cookie)], Json(json!({ "success": true })))
}

async fn logout_redirect(State(state): State<AppState>) -> impl IntoResponse {
    let cookie = expired_session_cookie(&state.session_config());
    ([(header::SET_COOKIE, cookie)], Redirect::to("/login"))
}

async fn me(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<serde_json::Value>, AppError> {
    let controller = AuthController::new(state.pool.clone());
    let response = controller.me(user.user_id).await?;
    Ok(Json(json!({ "user": response })))
}
