use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::dto::employee_dto::AdvanceRequest;
use crate::models::advance::Advance;
use crate::services::payroll::DateRange;
use crate::utils::errors::{foreign_key_violation_as, not_found_error, AppError};

pub struct AdvanceRepository {
    pool: PgPool,
}

impl AdvanceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, request: &AdvanceRequest) -> Result<Advance, AppError> {
        let advance = sqlx::query_as::<_, Advance>(
            r#"
            INSERT INTO advances (employee_id, amount, advance_date, note)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(request.employee_id)
        .bind(request.amount)
        .bind(request.advance_date)
        .bind(&request.note)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| foreign_key_violation_as(e, || not_found_error("Empleado", request.employee_id)))?;

        Ok(advance)
    }

    pub async fn find_filtered(
        &self,
        employee_id: Option<i32>,
        range: DateRange,
    ) -> Result<Vec<Advance>, AppError> {
        let advances = sqlx::query_as::<_, Advance>(
            r#"
            SELECT * FROM advances
            WHERE ($1::int IS NULL OR employee_id = $1)
              AND ($2::timestamptz IS NULL OR advance_date >= $2)
              AND ($3::timestamptz IS NULL OR advance_date <= $3)
            ORDER BY advance_date DESC, id DESC
            "#,
        )
        .bind(employee_id)
        .bind(range.start)
        .bind(range.end)
        .fetch_all(&self.pool)
        .await?;

        Ok(advances)
    }

    /// Pares `(employee_id, amount)` de los adelantos dentro del rango
    pub async fn amounts_in_range(&self, range: DateRange) -> Result<Vec<(i32, Decimal)>, AppError> {
        let rows: Vec<(i32, Decimal)> = sqlx::query_as(
            r#"
            SELECT employee_id, amount FROM advances
            WHERE advance_date >= $1 AND advance_date <= $2
            "#,
        )
        .bind(range.start)
        .bind(range.end)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}
