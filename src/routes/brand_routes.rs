use axum::{
    extract::State,
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::dto::reference_dto::{CreateBrandRequest, UpdateBrandRequest};
use crate::middleware::AdminUser;
use crate::routes::extract::{AppJson, AppPath};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_brand_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_brands).post(create_brand))
        .route("/:id", get(get_brand).put(update_brand).delete(delete_brand))
}

async fn list_brands(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    let brands = state.reference_data.list_brands().await?;
    Ok(Json(json!({ "success": true, "brands": brands })))
}

async fn get_brand(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> Result<Json<Value>, AppError> {
    let brand = state.reference_data.get_brand(id).await?;
    Ok(Json(json!({ "success": true, "brand": brand })))
}

async fn create_brand(
    State(state): State<AppState>,
    _admin: AdminUser,
    AppJson(request): AppJson<CreateBrandRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let brand = state.reference_data.create_brand(request).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "Brand created successfully",
            "brand": brand
        })),
    ))
}

async fn update_brand(
    State(state): State<AppState>,
    _admin: AdminUser,
    AppPath(id): AppPath<Uuid>,
    AppJson(request): AppJson<UpdateBrandRequest>,
) -> Result<Json<Value>, AppError> {
    let brand = state.reference_data.update_brand(id, request).await?;
    Ok(Json(json!({
        "success": true,
        "message": "Brand updated successfully",
        "brand": brand
    })))
}

async fn delete_brand(
    State(state): State<AppState>,
    _admin: AdminUser,
    AppPath(id): AppPath<Uuid>,
) -> Result<Json<Value>, AppError> {
    state.reference_data.delete_brand(id).await?;
    Ok(Json(json!({
        "success": true,
        "message": "Brand deleted successfully"
    })))
}
