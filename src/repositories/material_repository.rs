//! Repositorio de materiales

use rust_decimal::Decimal;
use sqlx::PgPool;
use std::collections::HashMap;

use crate::models::material::{Material, MaterialReferences};
use crate::utils::errors::{foreign_key_violation_as, unique_violation_as_bad_request, AppError};

const DUPLICATE_NAME: &str = "Ya existe un material con ese nombre";

pub struct MaterialRepository {
    pool: PgPool,
}

impl MaterialRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_all(&self) -> Result<Vec<Material>, AppError> {
        let materials = sqlx::query_as::<_, Material>("SELECT * FROM materials ORDER BY name ASC")
            .fetch_all(&self.pool)
            .await?;

        Ok(materials)
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<Material>, AppError> {
        let material = sqlx::query_as::<_, Material>("SELECT * FROM materials WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(material)
    }

    /// Carga varios materiales de una vez para embeberlos en listados
    pub async fn find_by_ids(&self, ids: &[i32]) -> Result<HashMap<i32, Material>, AppError> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let materials = sqlx::query_as::<_, Material>("SELECT * FROM materials WHERE id = ANY($1)")
            .bind(ids)
            .fetch_all(&self.pool)
            .await?;

        Ok(materials.into_iter().map(|m| (m.id, m)).collect())
    }

    pub async fn create(
        &self,
        name: &str,
        unit: &str,
        current_stock: Decimal,
        min_stock_alert: Option<Decimal>,
    ) -> Result<Material, AppError> {
        sqlx::query_as::<_, Material>(
            r#"
            INSERT INTO materials (name, unit, current_stock, min_stock_alert)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(name)
        .bind(unit)
        .bind(current_stock)
        .bind(min_stock_alert)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| unique_violation_as_bad_request(e, DUPLICATE_NAME))
    }

    /// Alta idempotente por nombre, usada por el seed
    pub async fn create_if_missing(
        &self,
        name: &str,
        unit: &str,
        current_stock: Decimal,
        min_stock_alert: Option<Decimal>,
    ) -> Result<bool, AppError> {
        let result = sqlx::query(
            r#"
            INSERT INTO materials (name, unit, current_stock, min_stock_alert)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (name) DO NOTHING
            "#,
        )
        .bind(name)
        .bind(unit)
        .bind(current_stock)
        .bind(min_stock_alert)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn update(
        &self,
        id: i32,
        name: &str,
        unit: &str,
        current_stock: Decimal,
        min_stock_alert: Option<Decimal>,
    ) -> Result<Option<Material>, AppError> {
        sqlx::query_as::<_, Material>(
            r#"
            UPDATE materials
            SET name = $2, unit = $3, current_stock = $4, min_stock_alert = $5, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(unit)
        .bind(current_stock)
        .bind(min_stock_alert)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| unique_violation_as_bad_request(e, DUPLICATE_NAME))
    }

    pub async fn count_references(&self, id: i32) -> Result<MaterialReferences, AppError> {
        let references = sqlx::query_as::<_, MaterialReferences>(
            r#"
            SELECT
                (SELECT COUNT(*) FROM stock_ins WHERE material_id = $1) AS stock_ins,
                (SELECT COUNT(*) FROM stock_outs WHERE material_id = $1) AS stock_outs,
                (SELECT COUNT(*) FROM trips WHERE material_id = $1) AS trips
            "#,
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        Ok(references)
    }

    /// Devuelve `false` si no existía
    pub async fn delete(&self, id: i32) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM materials WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                foreign_key_violation_as(e, || {
                    AppError::InUse("No se puede eliminar: el material tiene movimientos o viajes registrados".to_string())
                })
            })?;

        Ok(result.rows_affected() > 0)
    }
}
