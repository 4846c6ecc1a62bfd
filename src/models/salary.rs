//! Modelo de SalarySummary
//!
//! Una fila por (empleado, mes, año); se recalcula con upsert.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// SalarySummary - mapea exactamente a la tabla salary_summaries
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SalarySummary {
    pub id: i32,
    pub employee_id: i32,
    pub month: i32,
    pub year: i32,
    pub total_trips: i32,
    pub total_trip_income: Decimal,
    pub total_advances: Decimal,
    pub base_salary: Decimal,
    pub net_salary: Decimal,
    pub is_paid: bool,
    pub paid_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
