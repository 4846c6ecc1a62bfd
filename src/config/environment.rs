//! Configuración de variables de entorno
//!
//! Este módulo maneja la configuración del entorno y variables de configuración.

use std::env;

const DEV_SESSION_SECRET: &str = "dev-session-secret-change-in-production";
const DEFAULT_LINE_NOTIFY_URL: &str = "https://notify-api.line.me/api/notify";

/// Errores de configuración
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{0} must be a valid number")]
    InvalidNumber(&'static str),
}

/// Configuración del entorno
#[derive(Debug, Clone)]
pub struct EnvironmentConfig {
    pub environment: String,
    pub port: u16,
    pub host: String,
    pub database_url: String,
    pub db_max_connections: u32,
    pub session_secret: String,
    pub session_max_age: u64,
    pub cors_origins: Vec<String>,
    pub cron_secret: Option<String>,
    pub line_notify_token: Option<String>,
    pub line_notify_url: String,
    /// Fuente TrueType para los PDF; sin ella se usa Helvetica
    pub pdf_font_path: Option<String>,
}

impl EnvironmentConfig {
    /// Leer la configuración desde variables de entorno
    pub fn from_env() -> Result<Self, ConfigError> {
        let environment = var_or("ENVIRONMENT", "development");
        let is_production = environment == "production";

        let session_secret = match non_empty_var("SESSION_SECRET") {
            Some(secret) => secret,
            None if is_production => return Err(ConfigError::Missing("SESSION_SECRET")),
            None => {
                tracing::warn!("⚠️ SESSION_SECRET no definido, usando secreto de desarrollo");
                DEV_SESSION_SECRET.to_string()
            }
        };

        Ok(Self {
            environment,
            port: parse_var("PORT", 3000)?,
            host: var_or("HOST", "0.0.0.0"),
            database_url: non_empty_var("DATABASE_URL")
                .ok_or(ConfigError::Missing("DATABASE_URL"))?,
            db_max_connections: parse_var("DB_MAX_CONNECTIONS", 10)?,
            session_secret,
            session_max_age: parse_var("SESSION_MAX_AGE", 60 * 60 * 24 * 7)?,
            cors_origins: var_or("CORS_ORIGINS", "")
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            cron_secret: non_empty_var("CRON_SECRET"),
            line_notify_token: non_empty_var("LINE_NOTIFY_TOKEN"),
            line_notify_url: var_or("LINE_NOTIFY_URL", DEFAULT_LINE_NOTIFY_URL),
            pdf_font_path: non_empty_var("PDF_FONT_PATH"),
        })
    }

    /// Configuración para tests, sin leer el entorno
    pub fn for_tests(database_url: &str) -> Self {
        Self {
            environment: "test".to_string(),
            port: 0,
            host: "127.0.0.1".to_string(),
            database_url: database_url.to_string(),
            db_max_connections: 2,
            session_secret: "test-session-secret".to_string(),
            session_max_age: 3600,
            cors_origins: Vec::new(),
            cron_secret: Some("test-cron-secret".to_string()),
            line_notify_token: None,
            line_notify_url: DEFAULT_LINE_NOTIFY_URL.to_string(),
            pdf_font_path: None,
        }
    }

    /// Verificar si estamos en modo desarrollo
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// Verificar si estamos en modo producción
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Obtener la URL del servidor
    pub fn server_url(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn var_or(key: &str, default: &str) -> String {
    non_empty_var(key).unwrap_or_else(|| default.to_string())
}

fn parse_var<T: std::str::FromStr>(key: &'static str, default: T) -> Result<T, ConfigError> {
    match non_empty_var(key) {
        Some(raw) => raw.trim().parse().map_err(|_| ConfigError::InvalidNumber(key)),
        None => Ok(default),
    }
}
