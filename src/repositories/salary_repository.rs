//! Repositorio de nóminas
//!
//! Una fila por (empleado, mes, año). El recálculo pisa los totales y conserva
//! el estado de pago.

use sqlx::PgPool;

use crate::models::salary::SalarySummary;
use crate::services::payroll::PayrollBreakdown;
use crate::utils::errors::AppError;

pub struct SalaryRepository {
    pool: PgPool,
}

impl SalaryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Upsert de todas las nóminas de un mes en una transacción
    pub async fn upsert_month(
        &self,
        month: i32,
        year: i32,
        rows: &[(i32, PayrollBreakdown)],
    ) -> Result<Vec<SalarySummary>, AppError> {
        let mut tx = self.pool.begin().await?;
        let mut summaries = Vec::with_capacity(rows.len());

        for (employee_id, breakdown) in rows {
            let summary = sqlx::query_as::<_, SalarySummary>(
                r#"
                INSERT INTO salary_summaries
                    (employee_id, month, year, total_trips, total_trip_income,
                     total_advances, base_salary, net_salary)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                ON CONFLICT (employee_id, month, year) DO UPDATE
                SET total_trips = EXCLUDED.total_trips,
                    total_trip_income = EXCLUDED.total_trip_income,
                    total_advances = EXCLUDED.total_advances,
                    base_salary = EXCLUDED.base_salary,
                    net_salary = EXCLUDED.net_salary,
                    updated_at = NOW()
                RETURNING *
                "#,
            )
            .bind(*employee_id)
            .bind(month)
            .bind(year)
            .bind(breakdown.total_trips)
            .bind(breakdown.total_trip_income)
            .bind(breakdown.total_advances)
            .bind(breakdown.base_salary)
            .bind(breakdown.net_salary)
            .fetch_one(&mut *tx)
            .await?;

            summaries.push(summary);
        }

        tx.commit().await?;
        Ok(summaries)
    }

    /// Año y mes descendentes, luego nombre del empleado
    pub async fn find_filtered(
        &self,
        month: Option<i32>,
        year: Option<i32>,
        employee_id: Option<i32>,
    ) -> Result<Vec<SalarySummary>, AppError> {
        let summaries = sqlx::query_as::<_, SalarySummary>(
            r#"
            SELECT s.* FROM salary_summaries s
            JOIN employees e ON e.id = s.employee_id
            WHERE ($1::int IS NULL OR s.month = $1)
              AND ($2::int IS NULL OR s.year = $2)
              AND ($3::int IS NULL OR s.employee_id = $3)
            ORDER BY s.year DESC, s.month DESC, e.name ASC
            "#,
        )
        .bind(month)
        .bind(year)
        .bind(employee_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(summaries)
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<SalarySummary>, AppError> {
        let summary = sqlx::query_as::<_, SalarySummary>("SELECT * FROM salary_summaries WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(summary)
    }

    /// `paid_date` pasa a NOW() al pagar y a NULL al revertir
    pub async fn set_paid(&self, id: i32, is_paid: bool) -> Result<Option<SalarySummary>, AppError> {
        let summary = sqlx::query_as::<_, SalarySummary>(
            r#"
            UPDATE salary_summaries
            SET is_paid = $2,
                paid_date = CASE WHEN $2 THEN NOW() ELSE NULL END,
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(is_paid)
        .fetch_optional(&self.pool)
        .await?;

        Ok(summary)
    }
}
