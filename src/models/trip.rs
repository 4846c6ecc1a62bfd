use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Viaje - tabla trips. `rate` es el ingreso plano del viaje.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Trip {
    pub id: i32,
    pub employee_id: i32,
    pub trip_date: DateTime<Utc>,
    pub route: Option<String>,
    pub material_id: Option<i32>,
    pub quantity: Option<Decimal>,
    pub rate: Decimal,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
}
