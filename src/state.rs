//! Shared application state
//!
//! Este módulo define el estado compartido de la aplicación que se pasa
//! a través del router de Axum.

use reqwest::Client;
use sqlx::PgPool;
use std::sync::Arc;

use crate::config::environment::EnvironmentConfig;
use crate::services::line_notify::{LineNotifyClient, StockAlertNotifier};
use crate::services::pdf_export::EmbeddedFont;
use crate::utils::session::SessionConfig;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: EnvironmentConfig,
    pub notifier: Arc<dyn StockAlertNotifier>,
    pub pdf_font: Option<Arc<EmbeddedFont>>,
}

impl AppState {
    pub fn new(pool: PgPool, config: EnvironmentConfig) -> Self {
        let notifier = Arc::new(LineNotifyClient::from_config(Client::new(), &config));
        let pdf_font = config.pdf_font_path.as_deref().and_then(load_pdf_font);

        Self {
            pool,
            config,
            notifier,
            pdf_font,
        }
    }

    /// Reemplaza el canal de alertas (tests, otros webhooks)
    pub fn with_notifier(mut self, notifier: Arc<dyn StockAlertNotifier>) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn session_config(&self) -> SessionConfig {
        SessionConfig::from(&self.config)
    }
}

/// Una fuente ilegible no impide arrancar: los PDF vuelven a Helvetica
fn load_pdf_font(path: &str) -> Option<Arc<EmbeddedFont>> {
    match EmbeddedFont::load(path) {
        Ok(font) => {
            tracing::info!("🔤 Fuente PDF cargada: {} ({})", font.postscript_name(), path);
            Some(Arc::new(font))
        }
        Err(e) => {
            tracing::warn!("⚠️ {}; los PDF usarán Helvetica", e);
            None
        }
    }
}
