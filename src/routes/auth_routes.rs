use axum::{
    extract::State,
    middleware::from_fn_with_state,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};

use crate::dto::auth_dto::{LoginRequest, LoginResponse};
use crate::middleware::{require_auth, AuthenticatedUser};
use crate::models::UserSummary;
use crate::routes::extract::AppJson;
use crate::state::AppState;
use crate::utils::errors::AppError;

/// Configura las rutas de autenticación; `/me` exige token
pub fn auth_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/me", get(me))
        .route_layer(from_fn_with_state(state, require_auth))
        .route("/login", post(login))
}

async fn login(
    State(state): State<AppState>,
    AppJson(request): AppJson<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let response = state.auth.login(request).await?;
    Ok(Json(response))
}

async fn me(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<Value>, AppError> {
    let user = state
        .repository
        .find_user(user.user_id)
        .await?
        .ok_or_else(|| AppError::Unauthorized("User not found".to_string()))?;
    Ok(Json(json!({ "success": true, "user": UserSummary::from(&user) })))
}
