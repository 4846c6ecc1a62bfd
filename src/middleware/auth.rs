//! Middleware de autenticación
//!
//! Este módulo maneja la sesión del back office (cookie firmada) y el
//! secreto compartido del endpoint de cron.

use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts},
    middleware::Next,
    response::Response,
};

use crate::{
    state::AppState,
    utils::{
        errors::AppError,
        session::{find_cookie, verify_session_token, SESSION_COOKIE_NAME},
    },
};

/// Usuario autenticado, extraído de la cookie `stock-session`
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: i32,
    pub email: String,
    pub name: String,
    pub role: String,
}

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get_all(header::COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .find_map(|cookies| find_cookie(cookies, SESSION_COOKIE_NAME))
            .ok_or_else(|| AppError::Unauthorized("Sesión requerida".to_string()))?;

        let claims = verify_session_token(token, &state.session_config())?;

        Ok(AuthenticatedUser {
            user_id: claims.sub,
            email: claims.email,
            name: claims.name,
            role: claims.role,
        })
    }
}

/// Exige `Authorization: Bearer <CRON_SECRET>` cuando el secreto está configurado
pub async fn cron_auth_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    match state.config.cron_secret.as_deref() {
        Some(secret) => {
            let provided = request
                .headers()
                .get(header::AUTHORIZATION)
                .and_then(|value| value.to_str().ok())
                .and_then(|value| value.strip_prefix("Bearer "));

            if provided != Some(secret) {
                return Err(AppError::Unauthorized("Secreto de cron inválido".to_string()));
            }
        }
        None => {
            tracing::warn!("⚠️ CRON_SECRET no definido, endpoint de cron sin protección");
        }
    }

    Ok(next.run(request).await)
}
