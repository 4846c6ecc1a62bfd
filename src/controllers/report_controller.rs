//! Controller de reportes
//!
//! Arma los datos de cada reporte con los otros controllers y delega el
//! dibujo en los servicios de exportación.

use std::sync::Arc;

use chrono::Utc;
use sqlx::PgPool;

use crate::controllers::material_controller::MaterialController;
use crate::controllers::salary_controller::SalaryController;
use crate::controllers::stock_controller::StockController;
use crate::dto::report_dto::ReportFile;
use crate::services::excel_export::{salary_workbook, stock_workbook};
use crate::services::payroll::{DateRange, MAX_PAYROLL_YEAR, MIN_PAYROLL_YEAR};
use crate::services::pdf_export::{salary_slip_pdf, stock_movements_pdf, EmbeddedFont};
use crate::utils::errors::{bad_request_error, AppError};

pub struct ReportController {
    salaries: SalaryController,
    stock: StockController,
    materials: MaterialController,
    pdf_font: Option<Arc<EmbeddedFont>>,
}

/// Nombre de archivo ASCII: minúsculas, dígitos y guiones
pub fn filename_slug(value: &str) -> String {
    let mut slug = String::new();
    for c in value.trim().chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.ends_with('-') && !slug.is_empty() {
            slug.push('-');
        }
    }
    slug.trim_end_matches('-').to_string()
}

/// Subtítulo legible del rango de fechas
pub fn describe_range(range: &DateRange) -> String {
    let fmt = |d: chrono::DateTime<Utc>| d.format("%Y-%m-%d").to_string();
    match (range.start, range.end) {
        (Some(start), Some(end)) => format!("{} - {}", fmt(start), fmt(end)),
        (Some(start), None) => format!("From {}", fmt(start)),
        (None, Some(end)) => format!("Until {}", fmt(end)),
        (None, None) => "All dates".to_string(),
    }
}

impl ReportController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            salaries: SalaryController::new(pool.clone()),
            stock: StockController::new(pool.clone()),
            materials: MaterialController::new(pool),
            pdf_font: None,
        }
    }

    /// Fuente embebida en los PDF
    pub fn with_font(mut self, font: Option<Arc<EmbeddedFont>>) -> Self {
        self.pdf_font = font;
        self
    }

    pub async fn salary_excel(&self, month: i32, year: i32) -> Result<ReportFile, AppError> {
        if !(1..=12).contains(&month) || !(MIN_PAYROLL_YEAR..=MAX_PAYROLL_YEAR).contains(&year) {
            return Err(bad_request_error("Mes o año fuera de rango"));
        }

        let summaries = self.salaries.list(Some(month), Some(year), None).await?;
        let bytes = salary_workbook(&summaries, month, year)?;

        tracing::info!("📊 Excel de nómina {}/{} ({} filas)", month, year, summaries.len());
        Ok(ReportFile::xlsx(format!("salary-{}-{}.xlsx", month, year), bytes))
    }

    pub async fn salary_pdf(&self, id: i32) -> Result<ReportFile, AppError> {
        let entry = self.salaries.get_by_id(id).await?;
        let bytes = salary_slip_pdf(&entry, Utc::now(), self.pdf_font.as_deref());

        let mut employee = filename_slug(&entry.employee.name);
        if employee.is_empty() {
            employee = format!("employee-{}", entry.employee.id);
        }

        tracing::info!("🧾 Recibo de sueldo generado para la nómina {}", id);
        Ok(ReportFile::pdf(
            format!(
                "salary-slip-{}-{}-{}.pdf",
                employee, entry.summary.month, entry.summary.year
            ),
            bytes,
        ))
    }

    pub async fn stock_excel(&self, range: DateRange) -> Result<ReportFile, AppError> {
        let materials = self.materials.list().await?;
        let stock_ins = self.stock.list_in(None, range).await?;
        let stock_outs = self.stock.list_out(None, range).await?;

        let bytes = stock_workbook(&materials, &stock_ins, &stock_outs)?;

        tracing::info!(
            "📊 Excel de stock: {} materiales, {} entradas, {} salidas",
            materials.len(),
            stock_ins.len(),
            stock_outs.len()
        );
        Ok(ReportFile::xlsx(
            format!("stock-report-{}.xlsx", Utc::now().format("%Y-%m-%d")),
            bytes,
        ))
    }

    pub async fn stock_pdf(&self, range: DateRange) -> Result<ReportFile, AppError> {
        let movements = self.stock.history(None, range).await?;
        let bytes = stock_movements_pdf(&movements, &describe_range(&range), self.pdf_font.as_deref());

        tracing::info!("🧾 PDF de stock con {} movimientos", movements.len());
        Ok(ReportFile::pdf(
            format!("stock-transactions-{}.pdf", Utc::now().format("%Y-%m-%d")),
            bytes,
        ))
    }
}
