use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::dto::employee_dto::TripRequest;
use crate::models::trip::Trip;
use crate::services::payroll::DateRange;
use crate::utils::errors::{foreign_key_violation_as, AppError};

pub struct TripRepository {
    pool: PgPool,
}

impl TripRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, request: &TripRequest) -> Result<Trip, AppError> {
        let trip = sqlx::query_as::<_, Trip>(
            r#"
            INSERT INTO trips (employee_id, trip_date, route, material_id, quantity, rate, note)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(request.employee_id)
        .bind(request.trip_date)
        .bind(&request.route)
        .bind(request.material_id)
        .bind(request.quantity)
        .bind(request.rate)
        .bind(&request.note)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            foreign_key_violation_as(e, || {
                AppError::NotFound("El empleado o material del viaje ya no existe".to_string())
            })
        })?;

        Ok(trip)
    }

    /// Viajes más recientes primero, filtrados por empleado y rango inclusivo
    pub async fn find_filtered(
        &self,
        employee_id: Option<i32>,
        range: DateRange,
    ) -> Result<Vec<Trip>, AppError> {
        let trips = sqlx::query_as::<_, Trip>(
            r#"
            SELECT * FROM trips
            WHERE ($1::int IS NULL OR employee_id = $1)
              AND ($2::timestamptz IS NULL OR trip_date >= $2)
              AND ($3::timestamptz IS NULL OR trip_date <= $3)
            ORDER BY trip_date DESC, id DESC
            "#,
        )
        .bind(employee_id)
        .bind(range.start)
        .bind(range.end)
        .fetch_all(&self.pool)
        .await?;

        Ok(trips)
    }

    /// Pares `(employee_id, rate)` de los viajes dentro del rango
    pub async fn rates_in_range(&self, range: DateRange) -> Result<Vec<(i32, Decimal)>, AppError> {
        let rows: Vec<(i32, Decimal)> = sqlx::query_as(
            r#"
            SELECT employee_id, rate FROM trips
            WHERE trip_date >= $1 AND trip_date <= $2
            "#,
        )
        .bind(range.start)
        .bind(range.end)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}
