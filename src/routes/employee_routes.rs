use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};

use crate::controllers::employee_controller::EmployeeController;
use crate::controllers::salary_controller::SalaryController;
use crate::controllers::trip_controller::TripController;
use crate::dto::common_dto::{parse_query_int, MessageResponse, PeriodQuery};
use crate::dto::employee_dto::{
    AdvanceRequest, AdvanceResponse, EmployeeQuery, EmployeeRequest, MarkPaidRequest,
    SalaryCalculationRequest, SalarySummaryResponse, TripRequest, TripResponse,
};
use crate::middleware::auth::AuthenticatedUser;
use crate::models::employee::Employee;
use crate::state::AppState;
use crate::utils::errors::{parse_id, AppError};

/// Rutas de empleados, viajes, adelantos y nómina, montadas en `/api/employees`
pub fn create_employee_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_employees).post(create_employee))
        .route("/trips", get(list_trips).post(create_trip))
        .route("/advances", get(list_advances).post(create_advance))
        .route(
            "/salary",
            get(list_salaries).post(calculate_salary).put(mark_salary_paid),
        )
        .route(
            "/:id",
            get(get_employee).put(update_employee).delete(delete_employee),
        )
}

async fn list_employees(
    State(state): State<AppState>,
    Query(query): Query<EmployeeQuery>,
) -> Result<Json<Vec<Employee>>, AppError> {
    let controller = EmployeeController::new(state.pool.clone());
    Ok(Json(controller.list(query.status()).await?))
}

async fn create_employee(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    payload: Result<Json<EmployeeRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Employee>), AppError> {
    let Json(request) = payload?;
    let controller = EmployeeController::new(state.pool.clone());
    let employee = controller.create(request).await?;
    Ok((StatusCode::CREATED, Json(employee)))
}

async fn get_employee(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Employee>, AppError> {
    let id = parse_id(&id)?;
    let controller = EmployeeController::new(state.pool.clone());
    Ok(Json(controller.get_by_id(id).await?))
}

async fn update_employee(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Path(id): Path<String>,
    payload: Result<Json<EmployeeRequest>, JsonRejection>,
) -> Result<Json<Employee>, AppError> {
    let id = parse_id(&id)?;
    let Json(request) = payload?;
    let controller = EmployeeController::new(state.pool.clone());
    Ok(Json(controller.update(id, request).await?))
}

async fn delete_employee(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    let id = parse_id(&id)?;
    let controller = EmployeeController::new(state.pool.clone());
    Ok(Json(controller.delete(id).await?))
}

async fn list_trips(
    State(state): State<AppState>,
    Query(query): Query<PeriodQuery>,
) -> Result<Json<Vec<TripResponse>>, AppError> {
    let employee_id = query.employee_id()?;
    let range = query.date_range()?;
    let controller = TripController::new(state.pool.clone());
    Ok(Json(controller.list_trips(employee_id, range).await?))
}

async fn create_trip(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    payload: Result<Json<TripRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<TripResponse>), AppError> {
    let Json(request) = payload?;
    let controller = TripController::new(state.pool.clone());
    let trip = controller.create_trip(request).await?;
    Ok((StatusCode::CREATED, Json(trip)))
}

async fn list_advances(
    State(state): State<AppState>,
    Query(query): Query<PeriodQuery>,
) -> Result<Json<Vec<AdvanceResponse>>, AppError> {
    let employee_id = query.employee_id()?;
    let range = query.date_range()?;
    let controller = TripController::new(state.pool.clone());
    Ok(Json(controller.list_advances(employee_id, range).await?))
}

async fn create_advance(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    payload: Result<Json<AdvanceRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<AdvanceResponse>), AppError> {
    let Json(request) = payload?;
    let controller = TripController::new(state.pool.clone());
    let advance = controller.create_advance(request).await?;
    Ok((StatusCode::CREATED, Json(advance)))
}

async fn list_salaries(
    State(state): State<AppState>,
    Query(query): Query<PeriodQuery>,
) -> Result<Json<Vec<SalarySummaryResponse>>, AppError> {
    let month = parse_query_int(query.month.as_deref(), "month")?;
    let year = parse_query_int(query.year.as_deref(), "year")?;
    let employee_id = query.employee_id()?;
    let controller = SalaryController::new(state.pool.clone());
    Ok(Json(controller.list(month, year, employee_id).await?))
}

async fn calculate_salary(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    payload: Result<Json<SalaryCalculationRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Vec<SalarySummaryResponse>>), AppError> {
    let Json(request) = payload?;
    let controller = SalaryController::new(state.pool.clone());
    let summaries = controller.calculate(request).await?;
    Ok((StatusCode::CREATED, Json(summaries)))
}

async fn mark_salary_paid(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    payload: Result<Json<MarkPaidRequest>, JsonRejection>,
) -> Result<Json<SalarySummaryResponse>, AppError> {
    let Json(request) = payload?;
    let controller = SalaryController::new(state.pool.clone());
    Ok(Json(controller.mark_paid(request).await?))
}
