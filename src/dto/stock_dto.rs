//! DTOs de materiales y movimientos de stock

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::dto::common_dto::{parse_date_range, parse_query_int};
use crate::models::material::Material;
use crate::models::stock::{StockIn, StockOut};
use crate::services::payroll::DateRange;
use crate::utils::errors::AppResult;
use crate::utils::validation::{deserialize_flexible_datetime, non_negative_decimal, positive_decimal};

// Request para crear o actualizar un material
#[derive(Debug, Deserialize, Validate)]
pub struct MaterialRequest {
    #[validate(length(min = 1, max = 100, message = "El nombre debe tener entre 1 y 100 caracteres"))]
    pub name: String,

    #[validate(length(min = 1, max = 20, message = "La unidad debe tener entre 1 y 20 caracteres"))]
    pub unit: String,

    #[serde(default)]
    #[validate(custom = "non_negative_decimal")]
    pub current_stock: Decimal,

    #[validate(custom = "non_negative_decimal")]
    pub min_stock_alert: Option<Decimal>,
}

// Request de entrada de stock
#[derive(Debug, Deserialize, Validate)]
pub struct StockInRequest {
    pub material_id: i32,

    #[validate(custom = "positive_decimal")]
    pub quantity: Decimal,

    #[validate(custom = "non_negative_decimal")]
    pub unit_price: Option<Decimal>,

    #[validate(length(max = 200, message = "El proveedor no puede superar 200 caracteres"))]
    pub supplier: Option<String>,

    pub note: Option<String>,

    #[serde(deserialize_with = "deserialize_flexible_datetime")]
    pub transaction_date: DateTime<Utc>,
}

// Request de salida de stock
#[derive(Debug, Deserialize, Validate)]
pub struct StockOutRequest {
    pub material_id: i32,

    #[validate(custom = "positive_decimal")]
    pub quantity: Decimal,

    #[validate(length(max = 200, message = "El cliente no puede superar 200 caracteres"))]
    pub customer_name: Option<String>,

    #[validate(length(max = 200, message = "El proyecto no puede superar 200 caracteres"))]
    pub project_name: Option<String>,

    pub note: Option<String>,

    #[serde(deserialize_with = "deserialize_flexible_datetime")]
    pub transaction_date: DateTime<Utc>,
}

/// Filtros de listados de movimientos
#[derive(Debug, Default, Deserialize)]
pub struct StockQuery {
    pub material_id: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

impl StockQuery {
    pub fn material_id(&self) -> AppResult<Option<i32>> {
        parse_query_int(self.material_id.as_deref(), "material_id")
    }

    pub fn date_range(&self) -> AppResult<DateRange> {
        parse_date_range(self.start_date.as_deref(), self.end_date.as_deref())
    }
}

// Entrada de stock con su material
#[derive(Debug, Serialize, Deserialize)]
pub struct StockInResponse {
    #[serde(flatten)]
    pub stock_in: StockIn,
    pub material: Material,
}

// Salida de stock con su material
#[derive(Debug, Serialize, Deserialize)]
pub struct StockOutResponse {
    #[serde(flatten)]
    pub stock_out: StockOut,
    pub material: Material,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn test_material_request_validation() {
        let ok: MaterialRequest = serde_json::from_value(json!({
            "name": "Crushed stone",
            "unit": "ton",
            "current_stock": 12.5,
            "min_stock_alert": "10"
        }))
        .unwrap();
        assert!(ok.validate().is_ok());
        assert_eq!(ok.current_stock, dec!(12.5));

        let bad: MaterialRequest = serde_json::from_value(json!({
            "name": "",
            "unit": "a-very-long-unit-name-here",
            "current_stock": -1
        }))
        .unwrap();
        let errors = bad.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("name"));
        assert!(fields.contains_key("unit"));
        assert!(fields.contains_key("current_stock"));
    }

    #[test]
    fn test_material_request_defaults_stock_to_zero() {
        let req: MaterialRequest =
            serde_json::from_value(json!({"name": "Sand", "unit": "m3"})).unwrap();
        assert_eq!(req.current_stock, Decimal::ZERO);
        assert!(req.min_stock_alert.is_none());
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_stock_in_request_accepts_plain_date() {
        let req: StockInRequest = serde_json::from_value(json!({
            "material_id": 1,
            "quantity": 30,
            "transaction_date": "2025-03-01"
        }))
        .unwrap();
        assert!(req.validate().is_ok());
        assert_eq!(req.transaction_date.to_rfc3339(), "2025-03-01T00:00:00+00:00");
    }

    #[test]
    fn test_stock_out_request_rejects_zero_quantity() {
        let req: StockOutRequest = serde_json::from_value(json!({
            "material_id": 1,
            "quantity": 0,
            "transaction_date": "2025-03-01T08:00:00Z"
        }))
        .unwrap();
        assert!(req.validate().unwrap_err().field_errors().contains_key("quantity"));
    }

    #[test]
    fn test_stock_query_rejects_bad_material_id() {
        let query = StockQuery {
            material_id: Some("abc".to_string()),
            ..Default::default()
        };
        assert!(query.material_id().is_err());
    }
}
