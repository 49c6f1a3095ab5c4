//! Rutas HTTP
//!
//! Composición del router: autenticación, anuncios, datos de referencia
//! bajo `/api/admin` y estáticos de imágenes.

pub mod auth_routes;
pub mod brand_routes;
pub mod car_routes;
pub mod dropdown_routes;
pub mod extract;
pub mod model_routes;
pub mod multipart;

use axum::{
    http::StatusCode, middleware::from_fn_with_state, response::IntoResponse, routing::get, Json,
    Router,
};
use serde_json::json;
use tower::ServiceBuilder;
use tower_http::{compression::CompressionLayer, services::ServeDir, trace::TraceLayer};

use crate::middleware::{cors_layer, require_auth};
use crate::state::AppState;

/// Construye la aplicación completa con el estado ya aplicado
pub fn create_app(state: AppState) -> Router {
    let config = state.config.clone();
    let auth = from_fn_with_state(state.clone(), require_auth);

    let admin = Router::new()
        .nest("/brands", brand_routes::create_brand_router())
        .nest("/models", model_routes::create_model_router())
        .nest("/dropdowns", dropdown_routes::create_dropdown_router())
        .route_layer(auth.clone());

    let cars = car_routes::create_car_router(config.max_upload_bytes).route_layer(auth);

    let uploads_path = match config.public_upload_url.as_str() {
        path if path.starts_with('/') && path.len() > 1 => path.trim_end_matches('/').to_string(),
        _ => "/uploads".to_string(),
    };

    Router::new()
        .route("/health", get(health))
        .nest("/api/auth", auth_routes::auth_routes(state.clone()))
        .nest("/api/cars", cars)
        .nest("/api/admin", admin)
        .nest_service(&uploads_path, ServeDir::new(&config.upload_dir))
        .fallback(not_found)
        .layer(
            ServiceBuilder::new()
                .layer(CompressionLayer::new())
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer(&config.cors_origins)),
        )
        .with_state(state)
}

async fn health() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "car-inventory",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "success": false,
            "error": "Not Found",
            "message": "Route not found",
            "code": "NOT_FOUND"
        })),
    )
}
