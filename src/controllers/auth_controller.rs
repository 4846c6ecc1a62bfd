use sqlx::PgPool;
use validator::Validate;

use crate::dto::auth_dto::{LoginRequest, LoginResponse};
use crate::models::user::UserResponse;
use crate::repositories::user_repository::UserRepository;
use crate::services::password::verify_password;
use crate::utils::errors::AppError;
use crate::utils::session::{generate_session_token, session_cookie, SessionConfig};

const INVALID_CREDENTIALS: &str = "Email o contraseña incorrectos";

pub struct AuthController {
    repository: UserRepository,
}

impl AuthController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: UserRepository::new(pool),
        }
    }

    /// Verifica credenciales y devuelve el usuario junto con la cookie de sesión
    pub async fn login(
        &self,
        request: LoginRequest,
        session: &SessionConfig,
    ) -> Result<(LoginResponse, String), AppError> {
        request.validate()?;

        let email = request.email.trim().to_lowercase();

        // Email desconocido y contraseña incorrecta dan el mismo mensaje
        let user = self
            .repository
            .find_by_email(&email)
            .await?
            .ok_or_else(|| AppError::Unauthorized(INVALID_CREDENTIALS.to_string()))?;

        if !verify_password(&request.password, &user.password_hash)? {
            tracing::warn!("🔒 Contraseña incorrecta para {}", email);
            return Err(AppError::Unauthorized(INVALID_CREDENTIALS.to_string()));
        }

        let token = generate_session_token(user.id, &user.email, &user.name, &user.role, session)?;
        let cookie = session_cookie(&token, session);

        tracing::info!("✅ Login exitoso: {}", user.email);

        Ok((
            LoginResponse {
                user: UserResponse::from(user),
            },
            cookie,
        ))
    }

    /// Usuario actual; la sesión de un usuario borrado deja de valer
    pub async fn me(&self, user_id: i32) -> Result<UserResponse, AppError> {
        let user = self
            .repository
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::Unauthorized("Sesión inválida o expirada".to_string()))?;

        Ok(UserResponse::from(user))
    }
}
