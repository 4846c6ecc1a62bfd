//! Utilidades de validación
//!
//! Este módulo contiene funciones helper para validación de datos
//! y conversión de tipos.

use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use validator::ValidationError;

/// Validar y convertir string a fecha
pub fn validate_date(value: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| {
        let mut error = ValidationError::new("date");
        error.add_param("value".into(), &value.to_string());
        error.add_param("format".into(), &"YYYY-MM-DD".to_string());
        error
    })
}

/// Validar y convertir string a datetime
pub fn validate_datetime(value: &str) -> Result<DateTime<Utc>, ValidationError> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| {
            let mut error = ValidationError::new("datetime");
            error.add_param("value".into(), &value.to_string());
            error.add_param("format".into(), &"RFC3339".to_string());
            error
        })
}

/// Acepta RFC3339 o `YYYY-MM-DD` (medianoche UTC)
pub fn parse_date_input(value: &str) -> Result<DateTime<Utc>, ValidationError> {
    let value = value.trim();
    validate_datetime(value).or_else(|_| {
        validate_date(value).map(|date| Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN)))
    })
}

/// Límite superior de un rango: una fecha sola cubre el día completo
pub fn parse_range_end(value: &str) -> Result<DateTime<Utc>, ValidationError> {
    let value = value.trim();
    match validate_date(value) {
        Ok(date) => {
            let end_of_day = date
                .and_hms_opt(23, 59, 59)
                .unwrap_or_else(|| date.and_time(NaiveTime::MIN));
            Ok(Utc.from_utc_datetime(&end_of_day))
        }
        Err(_) => validate_datetime(value),
    }
}

/// Validar que un valor sea positivo
pub fn validate_positive<T: PartialOrd + std::fmt::Display + num_traits::Zero + Serialize>(
    value: T,
) -> Result<(), ValidationError> {
    if value <= T::zero() {
        let mut error = ValidationError::new("positive");
        error.add_param("value".into(), &value);
        return Err(error);
    }
    Ok(())
}

/// Validar que un valor sea no negativo
pub fn validate_non_negative<T: PartialOrd + std::fmt::Display + num_traits::Zero + Serialize>(
    value: T,
) -> Result<(), ValidationError> {
    if value < T::zero() {
        let mut error = ValidationError::new("non_negative");
        error.add_param("value".into(), &value);
        return Err(error);
    }
    Ok(())
}

/// Decimales que admite una columna `NUMERIC(12, 2)`
pub const MONEY_SCALE: u32 = 2;

/// Cota exclusiva del valor absoluto en una columna `NUMERIC(12, 2)`
pub fn money_limit() -> Decimal {
    Decimal::new(10_000_000_000, 0)
}

/// Validar que un decimal quepa en `NUMERIC(12, 2)` sin redondeo
pub fn validate_money_precision(value: &Decimal) -> Result<(), ValidationError> {
    if value.normalize().scale() > MONEY_SCALE {
        let mut error = ValidationError::new("scale");
        error.add_param("value".into(), value);
        error.add_param("max_decimals".into(), &MONEY_SCALE);
        return Err(error);
    }
    if value.abs() >= money_limit() {
        let mut error = ValidationError::new("max_value");
        error.add_param("value".into(), value);
        error.add_param("max".into(), &money_limit());
        return Err(error);
    }
    Ok(())
}

pub fn positive_decimal(value: &Decimal) -> Result<(), ValidationError> {
    validate_positive(*value)?;
    validate_money_precision(value)
}

pub fn non_negative_decimal(value: &Decimal) -> Result<(), ValidationError> {
    validate_non_negative(*value)?;
    validate_money_precision(value)
}

/// Deserializador de fechas de formularios (RFC3339 o `YYYY-MM-DD`)
pub fn deserialize_flexible_datetime<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_date_input(&raw)
        .map_err(|_| serde::de::Error::custom(format!("fecha inválida: '{}'", raw)))
}
