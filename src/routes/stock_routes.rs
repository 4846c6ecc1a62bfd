use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};

use crate::controllers::material_controller::MaterialController;
use crate::controllers::stock_controller::StockController;
use crate::dto::common_dto::MessageResponse;
use crate::dto::stock_dto::{
    MaterialRequest, StockInRequest, StockInResponse, StockOutRequest, StockOutResponse, StockQuery,
};
use crate::middleware::auth::AuthenticatedUser;
use crate::models::material::Material;
use crate::models::stock::StockMovement;
use crate::state::AppState;
use crate::utils::errors::{parse_id, AppError};

/// Rutas de materiales y movimientos, montadas en `/api/stock`
pub fn create_stock_router() -> Router<AppState> {
    Router::new()
        .route("/materials", get(list_materials).post(create_material))
        .route(
            "/materials/:id",
            get(get_material).put(update_material).delete(delete_material),
        )
        .route("/in", get(list_stock_in).post(create_stock_in))
        .route("/out", get(list_stock_out).post(create_stock_out))
        .route("/low-stock", get(low_stock))
        .route("/history", get(history))
}

async fn list_materials(State(state): State<AppState>) -> Result<Json<Vec<Material>>, AppError> {
    let controller = MaterialController::new(state.pool.clone());
    Ok(Json(controller.list().await?))
}

async fn create_material(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    payload: Result<Json<MaterialRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Material>), AppError> {
    let Json(request) = payload?;
    let controller = MaterialController::new(state.pool.clone());
    let material = controller.create(request).await?;
    Ok((StatusCode::CREATED, Json(material)))
}

async fn get_material(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Material>, AppError> {
    let id = parse_id(&id)?;
    let controller = MaterialController::new(state.pool.clone());
    Ok(Json(controller.get_by_id(id).await?))
}

async fn update_material(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Path(id): Path<String>,
    payload: Result<Json<MaterialRequest>, JsonRejection>,
) -> Result<Json<Material>, AppError> {
    let id = parse_id(&id)?;
    let Json(request) = payload?;
    let controller = MaterialController::new(state.pool.clone());
    Ok(Json(controller.update(id, request).await?))
}

async fn delete_material(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    let id = parse_id(&id)?;
    let controller = MaterialController::new(state.pool.clone());
    Ok(Json(controller.delete(id).await?))
}

async fn list_stock_in(
    State(state): State<AppState>,
    Query(query): Query<StockQuery>,
) -> Result<Json<Vec<StockInResponse>>, AppError> {
    let material_id = query.material_id()?;
    let range = query.date_range()?;
    let controller = StockController::new(state.pool.clone());
    Ok(Json(controller.list_in(material_id, range).await?))
}

async fn create_stock_in(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    payload: Result<Json<StockInRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<StockInResponse>), AppError> {
    let Json(request) = payload?;
    let controller = StockController::new(state.pool.clone());
    let response = controller.stock_in(request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn list_stock_out(
    State(state): State<AppState>,
    Query(query): Query<StockQuery>,
) -> Result<Json<Vec<StockOutResponse>>, AppError> {
    let material_id = query.material_id()?;
    let range = query.date_range()?;
    let controller = StockController::new(state.pool.clone());
    Ok(Json(controller.list_out(material_id, range).await?))
}

async fn create_stock_out(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    payload: Result<Json<StockOutRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<StockOutResponse>), AppError> {
    let Json(request) = payload?;
    let controller = StockController::new(state.pool.clone());
    let response = controller.stock_out(request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn low_stock(State(state): State<AppState>) -> Result<Json<Vec<Material>>, AppError> {
    let controller = MaterialController::new(state.pool.clone());
    Ok(Json(controller.low_stock().await?))
}

async fn history(
    State(state): State<AppState>,
    Query(query): Query<StockQuery>,
) -> Result<Json<Vec<StockMovement>>, AppError> {
    let material_id = query.material_id()?;
    let range = query.date_range()?;
    let controller = StockController::new(state.pool.clone());
    Ok(Json(controller.history(material_id, range).await?))
}
