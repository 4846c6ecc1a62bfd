//! Sesión firmada en cookie
//!
//! La cookie `stock-session` lleva un JWT HS256 con la identidad y el rol
//! del usuario. Un token alterado o expirado equivale a "sin sesión".

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::{config::environment::EnvironmentConfig, utils::errors::AppError};

pub const SESSION_COOKIE_NAME: &str = "stock-session";

/// Claims de la sesión
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionClaims {
    pub sub: i32, // user_id
    pub email: String,
    pub name: String,
    pub role: String,
    pub exp: usize,
    pub iat: usize,
}

/// Configuración de la sesión
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub secret: String,
    pub max_age: u64,
    pub secure: bool,
}

impl From<&EnvironmentConfig> for SessionConfig {
    fn from(config: &EnvironmentConfig) -> Self {
        Self {
            secret: config.session_secret.clone(),
            max_age: config.session_max_age,
            secure: config.is_production(),
        }
    }
}

/// Generar el token de sesión para un usuario
pub fn generate_session_token(
    user_id: i32,
    email: &str,
    name: &str,
    role: &str,
    config: &SessionConfig,
) -> Result<String, AppError> {
    let now = chrono::Utc::now();
    let expires_at = now + chrono::Duration::seconds(config.max_age as i64);

    let claims = SessionClaims {
        sub: user_id,
        email: email.to_string(),
        name: name.to_string(),
        role: role.to_string(),
        exp: expires_at.timestamp() as usize,
        iat: now.timestamp() as usize,
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(config.secret.as_ref()),
    )
    .map_err(|e| AppError::Session(format!("Error generando token: {}", e)))
}

/// Verificar y decodificar el token de sesión
pub fn verify_session_token(token: &str, config: &SessionConfig) -> Result<SessionClaims, AppError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 0;

    decode::<SessionClaims>(
        token,
        &DecodingKey::from_secret(config.secret.as_ref()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|_| AppError::Unauthorized("Sesión inválida o expirada".to_string()))
}

/// Valor de `Set-Cookie` que abre la sesión
pub fn session_cookie(token: &str, config: &SessionConfig) -> String {
    let mut cookie = format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        SESSION_COOKIE_NAME, token, config.max_age
    );
    if config.secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// Valor de `Set-Cookie` que cierra la sesión
pub fn expired_session_cookie(config: &SessionConfig) -> String {
    let mut cookie = format!(
        "{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0; Expires=Thu, 01 Jan 1970 00:00:00 GMT",
        SESSION_COOKIE_NAME
    );
    if config.secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// Extrae el valor de una cookie del header `Cookie`
pub fn find_cookie<'a>(cookie_header: &'a str, name: &str) -> Option<&'a str> {
    cookie_header
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.trim())
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> SessionConfig {
        SessionConfig {
            secret: "test-secret".to_string(),
            max_age: 3600,
            secure: false,
        }
    }

    #[test]
    fn test_generate_and_verify_token() {
        let config = test_config();
        let token =
            generate_session_token(7, "admin@example.com", "Admin", "admin", &config).unwrap();

        let claims = verify_session_token(&token, &config).unwrap();
        assert_eq!(claims.sub, 7);
        assert_eq!(claims.email, "admin@example.com");
        assert_eq!(claims.role, "admin");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_payload_is_not_plain_json() {
        let config = test_config();
        let token =
            generate_session_token(1, "admin@example.com", "Admin", "admin", &config).unwrap();
        assert!(!token.contains("admin@example.com"));
        assert!(!token.starts_with('{'));
    }

    #[test]
    fn test_rejects_other_secret() {
        let token = generate_session_token(1, "a@b.co", "A", "admin", &test_config()).unwrap();
        let other = SessionConfig {
            secret: "another-secret".to_string(),
            ..test_config()
        };
        assert!(matches!(
            verify_session_token(&token, &other),
            Err(AppError::Unauthorized(_))
        ));
    }

    #[test]
    fn test_rejects_tampered_token() {
        let config = test_config();
        let token = generate_session_token(1, "a@b.co", "A", "admin", &config).unwrap();
        let mut parts: Vec<String> = token.split('.').map(str::to_string).collect();
        parts[1] = parts[1].chars().rev().collect();
        assert!(verify_session_token(&parts.join("."), &config).is_err());
        assert!(verify_session_token("{\"userId\":1}", &config).is_err());
    }

    #[test]
    fn test_rejects_expired_token() {
        let config = test_config();
        let claims = SessionClaims {
            sub: 1,
            email: "a@b.co".to_string(),
            name: "A".to_string(),
            role: "admin".to_string(),
            exp: (chrono::Utc::now().timestamp() - 60) as usize,
            iat: (chrono::Utc::now().timestamp() - 120) as usize,
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(config.secret.as_ref()),
        )
        .unwrap();
        assert!(verify_session_token(&token, &config).is_err());
    }

    #[test]
    fn test_cookie_attributes() {
        let mut config = test_config();
        let cookie = session_cookie("abc", &config);
        assert!(cookie.starts_with("stock-session=abc;"));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("SameSite=Lax"));
        assert!(cookie.contains("Max-Age=3600"));
        assert!(!cookie.contains("Secure"));

        config.secure = true;
        assert!(session_cookie("abc", &config).ends_with("; Secure"));
        assert!(expired_session_cookie(&config).contains("Max-Age=0"));
    }

    #[test]
    fn test_find_cookie() {
        let header = "theme=dark; stock-session=tok.en.value; other=1";
        assert_eq!(find_cookie(header, "stock-session"), Some("tok.en.value"));
        assert_eq!(find_cookie(header, "missing"), None);
        assert_eq!(find_cookie("stock-session=", "stock-session"), None);
    }
}
