use axum::{
    extract::{multipart::MultipartRejection, DefaultBodyLimit, Multipart, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde_json::json;
use uuid::Uuid;

use crate::dto::car_dto::{CarListQuery, CarListResponse, CarResponse};
use crate::middleware::AuthenticatedUser;
use crate::routes::extract::{AppPath, AppQuery};
use crate::routes::multipart::read_car_form;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_car_router(max_upload_bytes: usize) -> Router<AppState> {
    Router::new()
        .route("/", get(list_cars).post(create_car))
        .route("/:id", get(get_car).put(update_car).delete(delete_car))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
}

async fn list_cars(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<CarListQuery>,
) -> Result<Json<CarListResponse>, AppError> {
    let response = state.cars.listings().list_cars(&query).await?;
    Ok(Json(response))
}

async fn get_car(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> Result<Json<CarResponse>, AppError> {
    let car = state.cars.listings().get_car(id).await?;
    Ok(Json(CarResponse::new(car)))
}

async fn create_car(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<(StatusCode, Json<CarResponse>), AppError> {
    let form = read_car_form(multipart?).await?;
    let car = state.cars.create_car(form, user.user_id).await?;
    Ok((
        StatusCode::CREATED,
        Json(CarResponse::with_message(car, "Car created successfully")),
    ))
}

async fn update_car(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    AppPath(id): AppPath<Uuid>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<CarResponse>, AppError> {
    let form = read_car_form(multipart?).await?;
    let car = state.cars.update_car(id, form).await?;
    Ok(Json(CarResponse::with_message(car, "Car updated successfully")))
}

async fn delete_car(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    AppPath(id): AppPath<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    state.cars.delete_car(id).await?;
    Ok(Json(json!({
        "success": true,
        "message": "Car deleted successfully"
    })))
}
