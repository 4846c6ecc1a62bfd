//! Cálculo de nómina mensual
//!
//! `net_salary = base_salary + ingresos por viajes - adelantos`, sumando sólo
//! los viajes y adelantos fechados dentro del mes calendario.

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use rust_decimal::Decimal;
use std::collections::HashMap;

use crate::utils::errors::{AppError, AppResult};

pub const MIN_PAYROLL_YEAR: i32 = 2020;
pub const MAX_PAYROLL_YEAR: i32 = 2100;

pub const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Rango de fechas inclusivo en ambos extremos
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

impl DateRange {
    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.start.map_or(true, |start| at >= start) && self.end.map_or(true, |end| at <= end)
    }
}

/// Mes calendario completo: día 1 00:00:00 hasta el último instante del mes
pub fn month_range(month: i32, year: i32) -> AppResult<DateRange> {
    let invalid = || AppError::BadRequest(format!("Mes/año inválido: {}/{}", month, year));

    let month_u = u32::try_from(month).map_err(|_| invalid())?;
    let first = NaiveDate::from_ymd_opt(year, month_u, 1).ok_or_else(invalid)?;
    let next_first = if month_u == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month_u + 1, 1)
    }
    .ok_or_else(invalid)?;

    let start = Utc.from_utc_datetime(&first.and_time(chrono::NaiveTime::MIN));
    let next_start = Utc.from_utc_datetime(&next_first.and_time(chrono::NaiveTime::MIN));

    // timestamptz tiene resolución de microsegundos
    Ok(DateRange {
        start: Some(start),
        end: Some(next_start - Duration::microseconds(1)),
    })
}

pub fn month_name(month: i32) -> &'static str {
    usize::try_from(month - 1)
        .ok()
        .and_then(|idx| MONTH_NAMES.get(idx))
        .copied()
        .unwrap_or("?")
}

/// Totales de nómina de un empleado en un mes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PayrollBreakdown {
    pub total_trips: i32,
    pub total_trip_income: Decimal,
    pub total_advances: Decimal,
    pub base_salary: Decimal,
    pub net_salary: Decimal,
}

pub fn compute_payroll(
    base_salary: Decimal,
    trip_rates: &[Decimal],
    advance_amounts: &[Decimal],
) -> PayrollBreakdown {
    let total_trip_income: Decimal = trip_rates.iter().copied().sum();
    let total_advances: Decimal = advance_amounts.iter().copied().sum();

    PayrollBreakdown {
        total_trips: trip_rates.len() as i32,
        total_trip_income,
        total_advances,
        base_salary,
        net_salary: base_salary + total_trip_income - total_advances,
    }
}

/// Agrupa filas `(employee_id, importe)` por empleado
pub fn group_by_employee(rows: Vec<(i32, Decimal)>) -> HashMap<i32, Vec<Decimal>> {
    let mut grouped: HashMap<i32, Vec<Decimal>> = HashMap::new();
    for (employee_id, amount) in rows {
        grouped.entry(employee_id).or_default().push(amount);
    }
    grouped
}
