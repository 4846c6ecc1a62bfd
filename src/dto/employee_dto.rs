//! DTOs de empleados, viajes, adelantos y nómina

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::advance::Advance;
use crate::models::employee::{Employee, EmployeeStatus};
use crate::models::material::Material;
use crate::models::salary::SalarySummary;
use crate::models::trip::Trip;
use crate::utils::validation::{deserialize_flexible_datetime, non_negative_decimal, positive_decimal};

// Request para crear o actualizar un empleado
#[derive(Debug, Deserialize, Validate)]
pub struct EmployeeRequest {
    #[validate(length(min = 1, max = 100, message = "El nombre debe tener entre 1 y 100 caracteres"))]
    pub name: String,

    #[validate(length(max = 50, message = "La licencia no puede superar 50 caracteres"))]
    pub truck_license: Option<String>,

    #[serde(default)]
    #[validate(custom = "non_negative_decimal")]
    pub base_salary: Decimal,

    #[validate(custom = "positive_decimal")]
    pub rate_per_trip: Decimal,

    #[serde(default)]
    pub status: EmployeeStatus,
}

/// Query de `GET /api/employees`
#[derive(Debug, Default, Deserialize)]
pub struct EmployeeQuery {
    pub status: Option<String>,
}

impl EmployeeQuery {
    pub fn status(&self) -> Option<EmployeeStatus> {
        self.status.as_deref().and_then(EmployeeStatus::from_query)
    }
}

// Request para registrar un viaje
#[derive(Debug, Deserialize, Validate)]
pub struct TripRequest {
    pub employee_id: i32,

    #[serde(deserialize_with = "deserialize_flexible_datetime")]
    pub trip_date: DateTime<Utc>,

    #[validate(length(max = 200, message = "La ruta no puede superar 200 caracteres"))]
    pub route: Option<String>,

    pub material_id: Option<i32>,

    #[validate(custom = "positive_decimal")]
    pub quantity: Option<Decimal>,

    #[validate(custom = "positive_decimal")]
    pub rate: Decimal,

    pub note: Option<String>,
}

// Request para registrar un adelanto
#[derive(Debug, Deserialize, Validate)]
pub struct AdvanceRequest {
    pub employee_id: i32,

    #[validate(custom = "positive_decimal")]
    pub amount: Decimal,

    #[serde(deserialize_with = "deserialize_flexible_datetime")]
    pub advance_date: DateTime<Utc>,

    pub note: Option<String>,
}

// Request de cálculo de nómina
#[derive(Debug, Deserialize, Validate)]
pub struct SalaryCalculationRequest {
    #[validate(range(min = 1, max = 12, message = "El mes debe estar entre 1 y 12"))]
    pub month: i32,

    #[validate(range(min = 2020, max = 2100, message = "El año debe estar entre 2020 y 2100"))]
    pub year: i32,
}

// Request para marcar una nómina como pagada / impaga
#[derive(Debug, Deserialize)]
pub struct MarkPaidRequest {
    pub id: i32,
    pub is_paid: bool,
}

// Viaje con empleado y material
#[derive(Debug, Serialize, Deserialize)]
pub struct TripResponse {
    #[serde(flatten)]
    pub trip: Trip,
    pub employee: Employee,
    pub material: Option<Material>,
}

// Adelanto con empleado
#[derive(Debug, Serialize, Deserialize)]
pub struct AdvanceResponse {
    #[serde(flatten)]
    pub advance: Advance,
    pub employee: Employee,
}

// Nómina con empleado
#[derive(Debug, Serialize, Deserialize)]
pub struct SalarySummaryResponse {
    #[serde(flatten)]
    pub summary: SalarySummary,
    pub employee: Employee,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn test_employee_request_defaults() {
        let req: EmployeeRequest =
            serde_json::from_value(json!({"name": "Somchai", "rate_per_trip": "500"})).unwrap();
        assert_eq!(req.base_salary, Decimal::ZERO);
        assert_eq!(req.status, EmployeeStatus::Active);
        assert_eq!(req.rate_per_trip, dec!(500));
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_employee_request_rejects_zero_rate() {
        let req: EmployeeRequest = serde_json::from_value(json!({
            "name": "Somchai",
            "base_salary": -5,
            "rate_per_trip": 0
        }))
        .unwrap();
        let errors = req.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("rate_per_trip"));
        assert!(fields.contains_key("base_salary"));
    }

    #[test]
    fn test_employee_query_ignores_unknown_status() {
        let query = EmployeeQuery {
            status: Some("fired".to_string()),
        };
        assert_eq!(query.status(), None);
    }

    #[test]
    fn test_trip_request_optional_quantity() {
        let req: TripRequest = serde_json::from_value(json!({
            "employee_id": 1,
            "trip_date": "2025-03-15",
            "rate": 650
        }))
        .unwrap();
        assert!(req.validate().is_ok());

        let bad: TripRequest = serde_json::from_value(json!({
            "employee_id": 1,
            "trip_date": "2025-03-15",
            "quantity": 0,
            "rate": 650
        }))
        .unwrap();
        assert!(bad.validate().unwrap_err().field_errors().contains_key("quantity"));
    }

    #[test]
    fn test_salary_request_bounds() {
        assert!(SalaryCalculationRequest { month: 1, year: 2020 }.validate().is_ok());
        assert!(SalaryCalculationRequest { month: 12, year: 2100 }.validate().is_ok());
        assert!(SalaryCalculationRequest { month: 13, year: 2025 }.validate().is_err());
        assert!(SalaryCalculationRequest { month: 6, year: 2019 }.validate().is_err());
    }
}
