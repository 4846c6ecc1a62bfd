//! Repositorio de movimientos de stock
//!
//! Cada movimiento se registra junto con el ajuste del saldo del material en
//! una sola transacción, con la fila del material bloqueada (`FOR UPDATE`).

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool, Postgres, Transaction};

use crate::dto::stock_dto::{StockInRequest, StockOutRequest};
use crate::models::material::Material;
use crate::models::stock::{MovementKind, StockIn, StockMovement, StockOut};
use crate::services::payroll::DateRange;
use crate::services::stock_rules::{apply_stock_in, apply_stock_out};
use crate::utils::errors::{not_found_error, AppError};

/// Fila del historial combinado tal como sale del UNION
#[derive(Debug, FromRow)]
struct MovementRow {
    kind: String,
    id: i32,
    material_id: i32,
    material_name: String,
    unit: String,
    quantity: Decimal,
    counterparty: Option<String>,
    note: Option<String>,
    transaction_date: DateTime<Utc>,
}

impl From<MovementRow> for StockMovement {
    fn from(row: MovementRow) -> Self {
        let kind = if row.kind == "in" {
            MovementKind::In
        } else {
            MovementKind::Out
        };
        Self {
            kind,
            id: row.id,
            material_id: row.material_id,
            material_name: row.material_name,
            unit: row.unit,
            quantity: row.quantity,
            counterparty: row.counterparty,
            note: row.note,
            transaction_date: row.transaction_date,
        }
    }
}

pub struct StockRepository {
    pool: PgPool,
}

impl StockRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn lock_material(
        tx: &mut Transaction<'_, Postgres>,
        material_id: i32,
    ) -> Result<Material, AppError> {
        sqlx::query_as::<_, Material>("SELECT * FROM materials WHERE id = $1 FOR UPDATE")
            .bind(material_id)
            .fetch_optional(&mut **tx)
            .await?
            .ok_or_else(|| not_found_error("Material", material_id))
    }

    async fn set_balance(
        tx: &mut Transaction<'_, Postgres>,
        material_id: i32,
        balance: Decimal,
    ) -> Result<Material, AppError> {
        let material = sqlx::query_as::<_, Material>(
            "UPDATE materials SET current_stock = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(material_id)
        .bind(balance)
        .fetch_one(&mut **tx)
        .await?;

        Ok(material)
    }

    /// Registra la entrada y suma la cantidad al saldo
    pub async fn create_stock_in(
        &self,
        request: &StockInRequest,
    ) -> Result<(StockIn, Material), AppError> {
        let mut tx = self.pool.begin().await?;

        let material = Self::lock_material(&mut tx, request.material_id).await?;
        let balance = apply_stock_in(&material, request.quantity)?;

        let stock_in = sqlx::query_as::<_, StockIn>(
            r#"
            INSERT INTO stock_ins (material_id, quantity, unit_price, supplier, note, transaction_date)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(request.material_id)
        .bind(request.quantity)
        .bind(request.unit_price)
        .bind(&request.supplier)
        .bind(&request.note)
        .bind(request.transaction_date)
        .fetch_one(&mut *tx)
        .await?;

        let material = Self::set_balance(&mut tx, request.material_id, balance).await?;
        tx.commit().await?;

        Ok((stock_in, material))
    }

    /// Registra la salida y descuenta la cantidad; rechaza si supera el saldo
    pub async fn create_stock_out(
        &self,
        request: &StockOutRequest,
    ) -> Result<(StockOut, Material), AppError> {
        let mut tx = self.pool.begin().await?;

        let material = Self::lock_material(&mut tx, request.material_id).await?;
        // si falla, el drop de `tx` hace rollback
        let balance = apply_stock_out(&material, request.quantity)?;

        let stock_out = sqlx::query_as::<_, StockOut>(
            r#"
            INSERT INTO stock_outs (material_id, quantity, customer_name, project_name, note, transaction_date)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(request.material_id)
        .bind(request.quantity)
        .bind(&request.customer_name)
        .bind(&request.project_name)
        .bind(&request.note)
        .bind(request.transaction_date)
        .fetch_one(&mut *tx)
        .await?;

        let material = Self::set_balance(&mut tx, request.material_id, balance).await?;
        tx.commit().await?;

        Ok((stock_out, material))
    }

    pub async fn find_stock_ins(
        &self,
        material_id: Option<i32>,
        range: DateRange,
    ) -> Result<Vec<StockIn>, AppError> {
        let rows = sqlx::query_as::<_, StockIn>(
            r#"
            SELECT * FROM stock_ins
            WHERE ($1::int IS NULL OR material_id = $1)
              AND ($2::timestamptz IS NULL OR transaction_date >= $2)
              AND ($3::timestamptz IS NULL OR transaction_date <= $3)
            ORDER BY transaction_date DESC, id DESC
            "#,
        )
        .bind(material_id)
        .bind(range.start)
        .bind(range.end)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    pub async fn find_stock_outs(
        &self,
        material_id: Option<i32>,
        range: DateRange,
    ) -> Result<Vec<StockOut>, AppError> {
        let rows = sqlx::query_as::<_, StockOut>(
            r#"
            SELECT * FROM stock_outs
            WHERE ($1::int IS NULL OR material_id = $1)
              AND ($2::timestamptz IS NULL OR transaction_date >= $2)
              AND ($3::timestamptz IS NULL OR transaction_date <= $3)
            ORDER BY transaction_date DESC, id DESC
            "#,
        )
        .bind(material_id)
        .bind(range.start)
        .bind(range.end)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Entradas y salidas en una sola lista, más recientes primero
    pub async fn find_history(
        &self,
        material_id: Option<i32>,
        range: DateRange,
    ) -> Result<Vec<StockMovement>, AppError> {
        let rows = sqlx::query_as::<_, MovementRow>(
            r#"
            SELECT * FROM (
                SELECT 'in' AS kind, si.id, si.material_id, m.name AS material_name, m.unit,
                       si.quantity, si.supplier AS counterparty, si.note, si.transaction_date
                FROM stock_ins si
                JOIN materials m ON m.id = si.material_id
                UNION ALL
                SELECT 'out' AS kind, so.id, so.material_id, m.name AS material_name, m.unit,
                       so.quantity,
                       NULLIF(CONCAT_WS(' / ', so.customer_name, so.project_name), '') AS counterparty,
                       so.note, so.transaction_date
                FROM stock_outs so
                JOIN materials m ON m.id = so.material_id
            ) movements
            WHERE ($1::int IS NULL OR material_id = $1)
              AND ($2::timestamptz IS NULL OR transaction_date >= $2)
              AND ($3::timestamptz IS NULL OR transaction_date <= $3)
            ORDER BY transaction_date DESC, kind ASC, id DESC
            "#,
        )
        .bind(material_id)
        .bind(range.start)
        .bind(range.end)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(StockMovement::from).collect())
    }
}
