//! Modelo de Material
//!
//! `current_stock` es el saldo corriente; sólo lo mueven las entradas y salidas
//! de stock (o una corrección manual vía update).

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Material - mapea exactamente a la tabla materials
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct Material {
    pub id: i32,
    pub name: String,
    pub unit: String,
    pub current_stock: Decimal,
    pub min_stock_alert: Option<Decimal>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Conteo de filas que referencian un material
#[derive(Debug, Clone, Copy, Default, FromRow)]
pub struct MaterialReferences {
    pub stock_ins: i64,
    pub stock_outs: i64,
    pub trips: i64,
}

impl MaterialReferences {
    pub fn is_referenced(&self) -> bool {
        self.stock_ins > 0 || self.stock_outs > 0 || self.trips > 0
    }
}
