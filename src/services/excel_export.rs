//! Exportación a Excel (XLSX)
//!
//! Este módulo arma los libros de nómina mensual y de movimientos de stock
//! en memoria; el controller los devuelve como descarga.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_xlsxwriter::{Color, Format, FormatAlign, FormatBorder, FormatPattern, Workbook, Worksheet};

use crate::dto::employee_dto::SalarySummaryResponse;
use crate::dto::stock_dto::{StockInResponse, StockOutResponse};
use crate::models::material::Material;
use crate::services::payroll::month_name;
use crate::utils::errors::{AppError, AppResult};

const SALARY_HEADERS: [&str; 7] = [
    "Employee",
    "Base salary",
    "Trips",
    "Trip income",
    "Advances",
    "Net salary",
    "Status",
];

const MATERIAL_HEADERS: [&str; 4] = ["Material", "Unit", "Current stock", "Alert level"];

const STOCK_IN_HEADERS: [&str; 7] = [
    "Date",
    "Material",
    "Quantity",
    "Unit",
    "Unit price",
    "Supplier",
    "Note",
];

const STOCK_OUT_HEADERS: [&str; 7] = [
    "Date",
    "Material",
    "Quantity",
    "Unit",
    "Customer",
    "Project",
    "Note",
];

/// Celda tipada de una fila de datos
enum Cell {
    Text(String),
    Amount(Decimal),
    Count(i32),
}

fn header_format() -> Format {
    Format::new()
        .set_bold()
        .set_background_color(Color::RGB(0xD9D9D9))
        .set_pattern(FormatPattern::Solid)
        .set_border(FormatBorder::Thin)
}

fn text_format() -> Format {
    Format::new().set_border(FormatBorder::Thin)
}

fn amount_format() -> Format {
    Format::new()
        .set_num_format("#,##0.00")
        .set_align(FormatAlign::Right)
        .set_border(FormatBorder::Thin)
}

fn to_export_error<E: std::fmt::Display>(e: E) -> AppError {
    AppError::Export(e.to_string())
}

fn decimal_to_f64(value: Decimal) -> f64 {
    value.to_f64().unwrap_or_default()
}

fn write_headers(worksheet: &mut Worksheet, row: u32, headers: &[&str]) -> AppResult<Vec<usize>> {
    let format = header_format();
    for (col, header) in headers.iter().enumerate() {
        worksheet
            .write_with_format(row, col as u16, *header, &format)
            .map_err(to_export_error)?;
    }
    Ok(headers.iter().map(|h| h.chars().count()).collect())
}

fn write_row(
    worksheet: &mut Worksheet,
    row: u32,
    cells: &[Cell],
    widths: &mut [usize],
) -> AppResult<()> {
    let text = text_format();
    let amount = amount_format();

    for (col, cell) in cells.iter().enumerate() {
        let width = match cell {
            Cell::Text(value) => {
                worksheet
                    .write_with_format(row, col as u16, value.as_str(), &text)
                    .map_err(to_export_error)?;
                value.chars().count()
            }
            Cell::Amount(value) => {
                worksheet
                    .write_with_format(row, col as u16, decimal_to_f64(*value), &amount)
                    .map_err(to_export_error)?;
                value.to_string().len() + 2
            }
            Cell::Count(value) => {
                worksheet
                    .write_with_format(row, col as u16, *value, &text)
                    .map_err(to_export_error)?;
                value.to_string().len()
            }
        };
        if let Some(current) = widths.get_mut(col) {
            *current = (*current).max(width);
        }
    }
    Ok(())
}

fn apply_widths(worksheet: &mut Worksheet, widths: &[usize]) -> AppResult<()> {
    for (col, width) in widths.iter().enumerate() {
        worksheet
            .set_column_width(col as u16, *width as f64 + 2.0)
            .map_err(to_export_error)?;
    }
    Ok(())
}

fn paid_label(is_paid: bool) -> &'static str {
    if is_paid {
        "Paid"
    } else {
        "Unpaid"
    }
}

/// Libro de nómina mensual: título, encabezado, una fila por empleado y el total neto
pub fn salary_workbook(
    summaries: &[SalarySummaryResponse],
    month: i32,
    year: i32,
) -> AppResult<Vec<u8>> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name("Salary").map_err(to_export_error)?;

    let title = format!("Salary summary {} {}", month_name(month), year);
    let title_format = Format::new().set_bold().set_font_size(14);
    worksheet
        .write_with_format(0, 0, title.as_str(), &title_format)
        .map_err(to_export_error)?;

    let mut widths = write_headers(worksheet, 2, &SALARY_HEADERS)?;
    worksheet.set_freeze_panes(3, 0).map_err(to_export_error)?;

    let mut row = 3u32;
    let mut total_net = Decimal::ZERO;

    for entry in summaries {
        let summary = &entry.summary;
        total_net += summary.net_salary;

        write_row(
            worksheet,
            row,
            &[
                Cell::Text(entry.employee.name.clone()),
                Cell::Amount(summary.base_salary),
                Cell::Count(summary.total_trips),
                Cell::Amount(summary.total_trip_income),
                Cell::Amount(summary.total_advances),
                Cell::Amount(summary.net_salary),
                Cell::Text(paid_label(summary.is_paid).to_string()),
            ],
            &mut widths,
        )?;
        row += 1;
    }

    // fila vacía y total
    row += 1;
    let total_label = Format::new().set_bold().set_border(FormatBorder::Thin);
    let total_amount = amount_format().set_bold();
    worksheet
        .write_with_format(row, 4, "Total net", &total_label)
        .map_err(to_export_error)?;
    worksheet
        .write_with_format(row, 5, decimal_to_f64(total_net), &total_amount)
        .map_err(to_export_error)?;

    apply_widths(worksheet, &widths)?;

    workbook.save_to_buffer().map_err(to_export_error)
}

/// Libro de stock: hoja de materiales y, si hay movimientos, hojas de entradas y salidas
pub fn stock_workbook(
    materials: &[Material],
    stock_ins: &[StockInResponse],
    stock_outs: &[StockOutResponse],
) -> AppResult<Vec<u8>> {
    let mut workbook = Workbook::new();

    {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name("Materials").map_err(to_export_error)?;
        let mut widths = write_headers(worksheet, 0, &MATERIAL_HEADERS)?;
        worksheet.set_freeze_panes(1, 0).map_err(to_export_error)?;

        for (index, material) in materials.iter().enumerate() {
            let alert = match material.min_stock_alert {
                Some(threshold) => Cell::Amount(threshold),
                None => Cell::Text("-".to_string()),
            };
            write_row(
                worksheet,
                index as u32 + 1,
                &[
                    Cell::Text(material.name.clone()),
                    Cell::Text(material.unit.clone()),
                    Cell::Amount(material.current_stock),
                    alert,
                ],
                &mut widths,
            )?;
        }
        apply_widths(worksheet, &widths)?;
    }

    if !stock_ins.is_empty() {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name("Stock in").map_err(to_export_error)?;
        let mut widths = write_headers(worksheet, 0, &STOCK_IN_HEADERS)?;

        for (index, entry) in stock_ins.iter().enumerate() {
            let movement = &entry.stock_in;
            let unit_price = match movement.unit_price {
                Some(price) => Cell::Amount(price),
                None => Cell::Text(String::new()),
            };
            write_row(
                worksheet,
                index as u32 + 1,
                &[
                    Cell::Text(movement.transaction_date.format("%Y-%m-%d").to_string()),
                    Cell::Text(entry.material.name.clone()),
                    Cell::Amount(movement.quantity),
                    Cell::Text(entry.material.unit.clone()),
                    unit_price,
                    Cell::Text(movement.supplier.clone().unwrap_or_default()),
                    Cell::Text(movement.note.clone().unwrap_or_default()),
                ],
                &mut widths,
            )?;
        }
        apply_widths(worksheet, &widths)?;
    }

    if !stock_outs.is_empty() {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name("Stock out").map_err(to_export_error)?;
        let mut widths = write_headers(worksheet, 0, &STOCK_OUT_HEADERS)?;

        for (index, entry) in stock_outs.iter().enumerate() {
            let movement = &entry.stock_out;
            write_row(
                worksheet,
                index as u32 + 1,
                &[
                    Cell::Text(movement.transaction_date.format("%Y-%m-%d").to_string()),
                    Cell::Text(entry.material.name.clone()),
                    Cell::Amount(movement.quantity),
                    Cell::Text(entry.material.unit.clone()),
                    Cell::Text(movement.customer_name.clone().unwrap_or_default()),
                    Cell::Text(movement.project_name.clone().unwrap_or_default()),
                    Cell::Text(movement.note.clone().unwrap_or_default()),
                ],
                &mut widths,
            )?;
        }
        apply_widths(worksheet, &widths)?;
    }

    workbook.save_to_buffer().map_err(to_export_error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::employee::{Employee, EmployeeStatus};
    use crate::models::salary::SalarySummary;
    use chrono::Utc;
    use rust_decimal_macros::dec;

    fn summary(name: &str, net: Decimal, is_paid: bool) -> SalarySummaryResponse {
        let now = Utc::now();
        SalarySummaryResponse {
            summary: SalarySummary {
                id: 1,
                employee_id: 1,
                month: 3,
                year: 2025,
                total_trips: 4,
                total_trip_income: dec!(2000),
                total_advances: dec!(500),
                base_salary: dec!(9000),
                net_salary: net,
                is_paid,
                paid_date: None,
                created_at: now,
                updated_at: now,
            },
            employee: Employee {
                id: 1,
                name: name.to_string(),
                truck_license: None,
                base_salary: dec!(9000),
                rate_per_trip: dec!(500),
                status: EmployeeStatus::Active,
                created_at: now,
                updated_at: now,
            },
        }
    }

    fn material(name: &str, alert: Option<Decimal>) -> Material {
        Material {
            id: 1,
            name: name.to_string(),
            unit: "ton".to_string(),
            current_stock: dec!(42.5),
            min_stock_alert: alert,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_salary_workbook_is_zip() {
        let bytes = salary_workbook(
            &[
                summary("Somchai", dec!(10500), true),
                summary("Anan", dec!(8200.50), false),
            ],
            3,
            2025,
        )
        .unwrap();
        assert!(bytes.starts_with(b"PK"));
    }

    #[test]
    fn test_salary_workbook_empty_month() {
        let bytes = salary_workbook(&[], 1, 2025).unwrap();
        assert!(bytes.starts_with(b"PK"));
    }

    #[test]
    fn test_stock_workbook_materials_only() {
        let bytes = stock_workbook(
            &[material("Crushed stone", Some(dec!(10))), material("Sand", None)],
            &[],
            &[],
        )
        .unwrap();
        assert!(bytes.starts_with(b"PK"));
    }
}
