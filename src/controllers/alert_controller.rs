use sqlx::PgPool;

use crate::dto::report_dto::StockAlertResponse;
use crate::repositories::material_repository::MaterialRepository;
use crate::services::line_notify::{format_low_stock_message, StockAlertNotifier};
use crate::services::stock_rules::filter_low_stock;
use crate::utils::errors::AppError;

pub struct AlertController {
    materials: MaterialRepository,
}

impl AlertController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            materials: MaterialRepository::new(pool),
        }
    }

    /// Revisa el stock y, si hay materiales bajo el umbral, envía la alerta
    pub async fn run_stock_alert(
        &self,
        notifier: &dyn StockAlertNotifier,
    ) -> Result<StockAlertResponse, AppError> {
        let low = filter_low_stock(self.materials.find_all().await?);

        if low.is_empty() {
            tracing::info!("✅ Sin materiales con stock bajo");
            return Ok(StockAlertResponse {
                success: true,
                message: "No hay materiales con stock bajo".to_string(),
                alert_count: 0,
                materials: None,
            });
        }

        let message = format_low_stock_message(&low);
        let sent = notifier.send(&message).await;

        tracing::info!("🚨 {} materiales con stock bajo (notificado: {})", low.len(), sent);

        Ok(StockAlertResponse {
            success: sent,
            message: if sent {
                "Alerta de stock enviada".to_string()
            } else {
                "No se pudo enviar la alerta de stock".to_string()
            },
            alert_count: low.len(),
            materials: Some(low),
        })
    }
}
