use sqlx::PgPool;
use validator::Validate;

use crate::dto::common_dto::MessageResponse;
use crate::dto::stock_dto::MaterialRequest;
use crate::models::material::Material;
use crate::repositories::material_repository::MaterialRepository;
use crate::services::stock_rules::filter_low_stock;
use crate::utils::errors::{not_found_error, AppError};

pub struct MaterialController {
    repository: MaterialRepository,
}

impl MaterialController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: MaterialRepository::new(pool),
        }
    }

    pub async fn list(&self) -> Result<Vec<Material>, AppError> {
        self.repository.find_all().await
    }

    pub async fn get_by_id(&self, id: i32) -> Result<Material, AppError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Material", id))
    }

    pub async fn create(&self, request: MaterialRequest) -> Result<Material, AppError> {
        request.validate()?;

        let material = self
            .repository
            .create(
                request.name.trim(),
                request.unit.trim(),
                request.current_stock,
                request.min_stock_alert,
            )
            .await?;

        tracing::info!("📦 Material creado: {} (id {})", material.name, material.id);
        Ok(material)
    }

    pub async fn update(&self, id: i32, request: MaterialRequest) -> Result<Material, AppError> {
        request.validate()?;

        self.repository
            .update(
                id,
                request.name.trim(),
                request.unit.trim(),
                request.current_stock,
                request.min_stock_alert,
            )
            .await?
            .ok_or_else(|| not_found_error("Material", id))
    }

    pub async fn delete(&self, id: i32) -> Result<MessageResponse, AppError> {
        let material = self.get_by_id(id).await?;

        let references = self.repository.count_references(id).await?;
        if references.is_referenced() {
            return Err(AppError::InUse(format!(
                "No se puede eliminar '{}': tiene {} entradas, {} salidas y {} viajes registrados",
                material.name, references.stock_ins, references.stock_outs, references.trips
            )));
        }

        if !self.repository.delete(id).await? {
            return Err(not_found_error("Material", id));
        }

        tracing::info!("🗑️ Material eliminado: {} (id {})", material.name, id);
        Ok(MessageResponse::new("Material eliminado exitosamente"))
    }

    /// Materiales con `current_stock <= min_stock_alert`, por nombre
    pub async fn low_stock(&self) -> Result<Vec<Material>, AppError> {
        let materials = self.repository.find_all().await?;
        Ok(filter_low_stock(materials))
    }
}
