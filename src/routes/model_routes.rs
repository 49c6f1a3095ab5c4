use axum::{
    extract::State,
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::dto::reference_dto::{CreateModelRequest, ModelListQuery, UpdateModelRequest};
use crate::middleware::AdminUser;
use crate::routes::extract::{AppJson, AppPath, AppQuery};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_model_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_models).post(create_model))
        .route("/:id", get(get_model).put(update_model).delete(delete_model))
}

async fn list_models(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<ModelListQuery>,
) -> Result<Json<Value>, AppError> {
    let models = state.reference_data.list_models(query.brand).await?;
    Ok(Json(json!({ "success": true, "models": models })))
}

async fn get_model(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> Result<Json<Value>, AppError> {
    let model = state.reference_data.get_model(id).await?;
    Ok(Json(json!({ "success": true, "model": model })))
}

async fn create_model(
    State(state): State<AppState>,
    _admin: AdminUser,
    AppJson(request): AppJson<CreateModelRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let model = state.reference_data.create_model(request).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "Model created successfully",
            "model": model
        })),
    ))
}

async fn update_model(
    State(state): State<AppState>,
    _admin: AdminUser,
    AppPath(id): AppPath<Uuid>,
    AppJson(request): AppJson<UpdateModelRequest>,
) -> Result<Json<Value>, AppError> {
    let model = state.reference_data.update_model(id, request).await?;
    Ok(Json(json!({
        "success": true,
        "message": "Model updated successfully",
        "model": model
    })))
}

async fn delete_model(
    State(state): State<AppState>,
    _admin: AdminUser,
    AppPath(id): AppPath<Uuid>,
) -> Result<Json<Value>, AppError> {
    state.reference_data.delete_model(id).await?;
    Ok(Json(json!({
        "success": true,
        "message": "Model deleted successfully"
    })))
}
