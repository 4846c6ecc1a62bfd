//! Controller de movimientos de stock

use sqlx::PgPool;
use validator::Validate;

use crate::dto::stock_dto::{StockInRequest, StockInResponse, StockOutRequest, StockOutResponse};
use crate::models::stock::StockMovement;
use crate::repositories::material_repository::MaterialRepository;
use crate::repositories::stock_repository::StockRepository;
use crate::services::payroll::DateRange;
use crate::utils::errors::AppError;

pub struct StockController {
    repository: StockRepository,
    materials: MaterialRepository,
}

impl StockController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: StockRepository::new(pool.clone()),
            materials: MaterialRepository::new(pool),
        }
    }

    pub async fn stock_in(&self, request: StockInRequest) -> Result<StockInResponse, AppError> {
        request.validate()?;

        let (stock_in, material) = self.repository.create_stock_in(&request).await?;

        tracing::info!(
            "📥 Entrada de {} {} de '{}' (saldo {})",
            stock_in.quantity,
            material.unit,
            material.name,
            material.current_stock
        );
        Ok(StockInResponse { stock_in, material })
    }

    pub async fn stock_out(&self, request: StockOutRequest) -> Result<StockOutResponse, AppError> {
        request.validate()?;

        let (stock_out, material) = self.repository.create_stock_out(&request).await?;

        tracing::info!(
            "📤 Salida de {} {} de '{}' (saldo {})",
            stock_out.quantity,
            material.unit,
            material.name,
            material.current_stock
        );
        Ok(StockOutResponse { stock_out, material })
    }

    pub async fn list_in(
        &self,
        material_id: Option<i32>,
        range: DateRange,
    ) -> Result<Vec<StockInResponse>, AppError> {
        let rows = self.repository.find_stock_ins(material_id, range).await?;

        let ids: Vec<i32> = rows.iter().map(|r| r.material_id).collect();
        let materials = self.materials.find_by_ids(&ids).await?;

        Ok(rows
            .into_iter()
            .filter_map(|stock_in| {
                let material = materials.get(&stock_in.material_id)?.clone();
                Some(StockInResponse { stock_in, material })
            })
            .collect())
    }

    pub async fn list_out(
        &self,
        material_id: Option<i32>,
        range: DateRange,
    ) -> Result<Vec<StockOutResponse>, AppError> {
        let rows = self.repository.find_stock_outs(material_id, range).await?;

        let ids: Vec<i32> = rows.iter().map(|r| r.material_id).collect();
        let materials = self.materials.find_by_ids(&ids).await?;

        Ok(rows
            .into_iter()
            .filter_map(|stock_out| {
                let material = materials.get(&stock_out.material_id)?.clone();
                Some(StockOutResponse { stock_out, material })
            })
            .collect())
    }

    pub async fn history(
        &self,
        material_id: Option<i32>,
        range: DateRange,
    ) -> Result<Vec<StockMovement>, AppError> {
        self.repository.find_history(material_id, range).await
    }
}
