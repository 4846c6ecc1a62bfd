//! Movimientos de stock
//!
//! Filas inmutables del libro de entradas y salidas.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Entrada de stock - tabla stock_ins
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct StockIn {
    pub id: i32,
    pub material_id: i32,
    pub quantity: Decimal,
    pub unit_price: Option<Decimal>,
    pub supplier: Option<String>,
    pub note: Option<String>,
    pub transaction_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// Salida de stock - tabla stock_outs
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct StockOut {
    pub id: i32,
    pub material_id: i32,
    pub quantity: Decimal,
    pub customer_name: Option<String>,
    pub project_name: Option<String>,
    pub note: Option<String>,
    pub transaction_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MovementKind {
    In,
    Out,
}

impl MovementKind {
    pub fn label(&self) -> &'static str {
        match self {
            MovementKind::In => "IN",
            MovementKind::Out => "OUT",
        }
    }
}

/// Fila del historial combinado (entradas + salidas)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockMovement {
    pub kind: MovementKind,
    pub id: i32,
    pub material_id: i32,
    pub material_name: String,
    pub unit: String,
    pub quantity: Decimal,
    /// Proveedor en entradas, cliente/proyecto en salidas
    pub counterparty: Option<String>,
    pub note: Option<String>,
    pub transaction_date: DateTime<Utc>,
}
