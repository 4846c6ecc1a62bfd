//! Modelo de Employee
//!
//! Conductores con salario base y tarifa por viaje.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};

/// Estado del empleado - mapea al ENUM employee_status
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, Type, PartialEq, Eq)]
#[sqlx(type_name = "employee_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum EmployeeStatus {
    #[default]
    Active,
    Inactive,
}

impl EmployeeStatus {
    /// Parseo tolerante del query param `status`; valores desconocidos se ignoran
    pub fn from_query(value: &str) -> Option<Self> {
        match value {
            "active" => Some(EmployeeStatus::Active),
            "inactive" => Some(EmployeeStatus::Inactive),
            _ => None,
        }
    }
}

/// Employee - mapea exactamente a la tabla employees
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct Employee {
    pub id: i32,
    pub name: String,
    pub truck_license: Option<String>,
    pub base_salary: Decimal,
    pub rate_per_trip: Decimal,
    pub status: EmployeeStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Conteo de filas que referencian un empleado
#[derive(Debug, Clone, Copy, Default, FromRow)]
pub struct EmployeeReferences {
    pub trips: i64,
    pub advances: i64,
    pub salary_summaries: i64,
}

impl EmployeeReferences {
    pub fn is_referenced(&self) -> bool {
        self.trips > 0 || self.advances > 0 || self.salary_summaries > 0
    }
}
