use axum::{
    extract::{rejection::JsonRejection, State},
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};

use crate::dto::reference_dto::UpdateDropdownRequest;
use crate::middleware::AdminUser;
use crate::routes::extract::AppPath;
use crate::state::AppState;
use crate::utils::errors::{validation_error, AppError};

pub fn create_dropdown_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_dropdowns))
        .route("/:field_name", get(get_dropdown).put(update_dropdown))
}

async fn list_dropdowns(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    let dropdowns = state.reference_data.list_dropdowns().await?;
    Ok(Json(json!({ "success": true, "dropdowns": dropdowns })))
}

async fn get_dropdown(
    State(state): State<AppState>,
    AppPath(field_name): AppPath<String>,
) -> Result<Json<Value>, AppError> {
    let dropdown = state.reference_data.get_dropdown(&field_name).await?;
    Ok(Json(json!({ "success": true, "dropdown": dropdown })))
}

async fn update_dropdown(
    State(state): State<AppState>,
    _admin: AdminUser,
    AppPath(field_name): AppPath<String>,
    body: Result<Json<UpdateDropdownRequest>, JsonRejection>,
) -> Result<Json<Value>, AppError> {
    let Json(request) = body.map_err(|e| {
        tracing::debug!("Cuerpo de desplegable inválido: {}", e);
        validation_error("Options must be an array")
    })?;

    let dropdown = state
        .reference_data
        .update_dropdown(&field_name, request.options)
        .await?;
    Ok(Json(json!({
        "success": true,
        "message": "Dropdown options updated successfully",
        "dropdown": dropdown
    })))
}
