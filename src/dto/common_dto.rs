use serde::{Deserialize, Serialize};

use crate::services::payroll::{month_range, DateRange};
use crate::utils::errors::{AppError, AppResult};
use crate::utils::validation::{parse_date_input, parse_range_end};

// Response genérica para borrados y avisos
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Parsea un query param entero opcional (`?employee_id=3`)
pub fn parse_query_int(raw: Option<&str>, field: &str) -> AppResult<Option<i32>> {
    match raw.map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(None),
        Some(value) => value
            .parse::<i32>()
            .map(Some)
            .map_err(|_| AppError::BadRequest(format!("Parámetro '{}' inválido", field))),
    }
}

/// Rango `start_date` / `end_date` de los listados
pub fn parse_date_range(start: Option<&str>, end: Option<&str>) -> AppResult<DateRange> {
    let start = start
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(|v| {
            parse_date_input(v)
                .map_err(|_| AppError::BadRequest("Parámetro 'start_date' inválido".to_string()))
        })
        .transpose()?;
    let end = end
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(|v| {
            parse_range_end(v)
                .map_err(|_| AppError::BadRequest("Parámetro 'end_date' inválido".to_string()))
        })
        .transpose()?;

    Ok(DateRange { start, end })
}

/// Filtros de período: `month`+`year` tienen prioridad sobre `start_date`/`end_date`
#[derive(Debug, Default, Deserialize)]
pub struct PeriodQuery {
    pub employee_id: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub month: Option<String>,
    pub year: Option<String>,
}

impl PeriodQuery {
    pub fn employee_id(&self) -> AppResult<Option<i32>> {
        parse_query_int(self.employee_id.as_deref(), "employee_id")
    }

    pub fn date_range(&self) -> AppResult<DateRange> {
        let month = parse_query_int(self.month.as_deref(), "month")?;
        let year = parse_query_int(self.year.as_deref(), "year")?;

        match (month, year) {
            (Some(month), Some(year)) => month_range(month, year),
            _ => parse_date_range(self.start_date.as_deref(), self.end_date.as_deref()),
        }
    }
}
