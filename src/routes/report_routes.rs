use axum::{
    extract::{Query, State},
    routing::get,
    Router,
};

use crate::controllers::report_controller::ReportController;
use crate::dto::report_dto::{ReportFile, SalaryReportQuery, SalarySlipQuery, StockReportQuery};
use crate::middleware::auth::AuthenticatedUser;
use crate::state::AppState;
use crate::utils::errors::AppError;

/// Descargas XLSX/PDF, montadas en `/api/reports`; todas requieren sesión
pub fn create_report_router() -> Router<AppState> {
    Router::new()
        .route("/salary-excel", get(salary_excel))
        .route("/salary-pdf", get(salary_pdf))
        .route("/stock-excel", get(stock_excel))
        .route("/stock-pdf", get(stock_pdf))
}

async fn salary_excel(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Query(query): Query<SalaryReportQuery>,
) -> Result<ReportFile, AppError> {
    let (month, year) = query.period()?;
    let controller = ReportController::new(state.pool.clone());
    controller.salary_excel(month, year).await
}

async fn salary_pdf(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Query(query): Query<SalarySlipQuery>,
) -> Result<ReportFile, AppError> {
    let id = query.id()?;
    let controller = ReportController::new(state.pool.clone()).with_font(state.pdf_font.clone());
    controller.salary_pdf(id).await
}

async fn stock_excel(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Query(query): Query<StockReportQuery>,
) -> Result<ReportFile, AppError> {
    let range = query.date_range()?;
    let controller = ReportController::new(state.pool.clone());
    controller.stock_excel(range).await
}

async fn stock_pdf(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Query(query): Query<StockReportQuery>,
) -> Result<ReportFile, AppError> {
    let range = query.date_range()?;
    let controller = ReportController::new(state.pool.clone()).with_font(state.pdf_font.clone());
    controller.stock_pdf(range).await
}
