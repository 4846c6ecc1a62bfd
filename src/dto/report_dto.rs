use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::dto::common_dto::{parse_date_range, parse_query_int};
use crate::models::material::Material;
use crate::services::payroll::DateRange;
use crate::utils::errors::{AppError, AppResult};

/// Query de `salary-excel`: mes y año obligatorios
#[derive(Debug, Default, Deserialize)]
pub struct SalaryReportQuery {
    pub month: Option<String>,
    pub year: Option<String>,
}

impl SalaryReportQuery {
    pub fn period(&self) -> AppResult<(i32, i32)> {
        let month = parse_query_int(self.month.as_deref(), "month")?;
        let year = parse_query_int(self.year.as_deref(), "year")?;
        match (month, year) {
            (Some(month), Some(year)) => Ok((month, year)),
            _ => Err(AppError::BadRequest(
                "Los parámetros 'month' y 'year' son obligatorios".to_string(),
            )),
        }
    }
}

/// Query de `salary-pdf`: id de la nómina obligatorio
#[derive(Debug, Default, Deserialize)]
pub struct SalarySlipQuery {
    pub id: Option<String>,
}

impl SalarySlipQuery {
    pub fn id(&self) -> AppResult<i32> {
        parse_query_int(self.id.as_deref(), "id")?
            .ok_or_else(|| AppError::BadRequest("El parámetro 'id' es obligatorio".to_string()))
    }
}

/// Query de los reportes de stock
#[derive(Debug, Default, Deserialize)]
pub struct StockReportQuery {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

impl StockReportQuery {
    pub fn date_range(&self) -> AppResult<DateRange> {
        parse_date_range(self.start_date.as_deref(), self.end_date.as_deref())
    }
}

/// Response del endpoint de alerta de stock
#[derive(Debug, Serialize, Deserialize)]
pub struct StockAlertResponse {
    pub success: bool,
    pub message: String,
    #[serde(rename = "alertCount")]
    pub alert_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub materials: Option<Vec<Material>>,
}

pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";
pub const PDF_CONTENT_TYPE: &str = "application/pdf";

/// Archivo generado que se devuelve como descarga
#[derive(Debug)]
pub struct ReportFile {
    pub filename: String,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

impl ReportFile {
    pub fn xlsx(filename: String, bytes: Vec<u8>) -> Self {
        Self {
            filename,
            content_type: XLSX_CONTENT_TYPE,
            bytes,
        }
    }

    pub fn pdf(filename: String, bytes: Vec<u8>) -> Self {
        Self {
            filename,
            content_type: PDF_CONTENT_TYPE,
            bytes,
        }
    }
}

impl IntoResponse for ReportFile {
    fn into_response(self) -> Response {
        let disposition = format!("attachment; filename=\"{}\"", self.filename);
        (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, self.content_type.to_string()),
                (header::CONTENT_DISPOSITION, disposition),
            ],
            self.bytes,
        )
            .into_response()
    }
}
