use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Adelanto de sueldo - tabla advances
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Advance {
    pub id: i32,
    pub employee_id: i32,
    pub amount: Decimal,
    pub advance_date: DateTime<Utc>,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
}
