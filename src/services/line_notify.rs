//! Integración con LINE Notify
//!
//! Envía las alertas de stock bajo al webhook configurado. Un fallo del
//! webhook nunca es un error de la request: se registra y se informa `false`.

use async_trait::async_trait;
use rust_decimal::Decimal;
use std::time::Duration;

use crate::config::environment::EnvironmentConfig;
use crate::models::material::Material;

/// Canal de salida para las alertas de stock bajo
#[async_trait]
pub trait StockAlertNotifier: Send + Sync {
    /// Devuelve `true` sólo si el mensaje fue aceptado
    async fn send(&self, message: &str) -> bool;
}

pub struct LineNotifyClient {
    client: reqwest::Client,
    token: Option<String>,
    url: String,
}

impl LineNotifyClient {
    pub fn new(client: reqwest::Client, token: Option<String>, url: String) -> Self {
        Self { client, token, url }
    }

    pub fn from_config(client: reqwest::Client, config: &EnvironmentConfig) -> Self {
        Self::new(
            client,
            config.line_notify_token.clone(),
            config.line_notify_url.clone(),
        )
    }
}

#[async_trait]
impl StockAlertNotifier for LineNotifyClient {
    async fn send(&self, message: &str) -> bool {
        let Some(token) = self.token.as_deref() else {
            tracing::warn!("⚠️ LINE_NOTIFY_TOKEN no definido, se omite la notificación");
            return false;
        };

        let result = self
            .client
            .post(&self.url)
            .bearer_auth(token)
            .timeout(Duration::from_secs(10))
            .form(&[("message", message)])
            .send()
            .await;

        match result {
            Ok(response) if response.status().is_success() => {
                tracing::info!("📨 Alerta de stock enviada a LINE Notify");
                true
            }
            Ok(response) => {
                let status = response.status();
                let body = response.text().await.unwrap_or_default();
                tracing::error!("❌ LINE Notify respondió {}: {}", status, body);
                false
            }
            Err(e) => {
                tracing::error!("❌ Error enviando notificación LINE: {}", e);
                false
            }
        }
    }
}

/// Mensaje numerado con saldo y umbral de cada material
pub fn format_low_stock_message(materials: &[Material]) -> String {
    if materials.is_empty() {
        return String::new();
    }

    let mut message = String::from("🚨 Low stock alert\n\n");

    for (index, material) in materials.iter().enumerate() {
        let threshold = material.min_stock_alert.unwrap_or(Decimal::ZERO);
        message.push_str(&format!("{}. {}\n", index + 1, material.name));
        message.push_str(&format!(
            "   Remaining: {} {}\n",
            material.current_stock.normalize(),
            material.unit
        ));
        message.push_str(&format!(
            "   Alert level: {} {}\n\n",
            threshold.normalize(),
            material.unit
        ));
    }

    message.push_str("Please check and restock as soon as possible");
    message
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal_macros::dec;

    fn material(name: &str, stock: Decimal, alert: Decimal) -> Material {
        Material {
            id: 1,
            name: name.to_string(),
            unit: "ton".to_string(),
            current_stock: stock,
            min_stock_alert: Some(alert),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_format_empty() {
        assert_eq!(format_low_stock_message(&[]), "");
    }

    #[test]
    fn test_format_numbered_entries() {
        let message = format_low_stock_message(&[
            material("Crushed stone", dec!(4.50), dec!(10)),
            material("Fill soil", dec!(0), dec!(8)),
        ]);

        assert!(message.starts_with("🚨 Low stock alert\n\n"));
        assert!(message.contains("1. Crushed stone\n   Remaining: 4.5 ton\n   Alert level: 10 ton\n"));
        assert!(message.contains("2. Fill soil\n   Remaining: 0 ton\n"));
        assert!(message.ends_with("restock as soon as possible"));
    }

    #[tokio::test]
    async fn test_send_without_token_is_skipped() {
        let client = LineNotifyClient::new(
            reqwest::Client::new(),
            None,
            "http://127.0.0.1:9/notify".to_string(),
        );
        assert!(!client.send("hola").await);
    }
}
