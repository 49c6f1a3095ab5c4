//! Sistema de manejo de errores
//!
//! Este módulo define todos los tipos de errores del inventario
//! y su conversión a respuestas HTTP apropiadas.

use axum::{
    extract::multipart::MultipartRejection,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Errores principales de la aplicación
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid fields: {0}")]
    InvalidFields(#[from] validator::ValidationErrors),

    #[error("Duplicate key: {0}")]
    DuplicateKey(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Invalid reference: {0}")]
    InvalidReference(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Image storage error: {0}")]
    Storage(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Respuesta de error para la API
#[derive(Debug, serde::Serialize)]
struct ErrorResponse {
    success: bool,
    error: &'static str,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<serde_json::Value>,
    code: &'static str,
}

impl AppError {
    /// Código HTTP asociado a cada variante
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_)
            | AppError::InvalidFields(_)
            | AppError::DuplicateKey(_)
            | AppError::InvalidReference(_)
            | AppError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::Storage(_) => StatusCode::BAD_GATEWAY,
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Código estable legible por máquina
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Database(_) => "DB_ERROR",
            AppError::Validation(_) | AppError::InvalidFields(_) => "VALIDATION_ERROR",
            AppError::DuplicateKey(_) => "DUPLICATE_KEY",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Conflict(_) => "CONFLICT",
            AppError::InvalidReference(_) => "INVALID_REFERENCE",
            AppError::InvalidArgument(_) => "INVALID_ARGUMENT",
            AppError::Unauthorized(_) => "UNAUTHORIZED",
            AppError::Forbidden(_) => "FORBIDDEN",
            AppError::Storage(_) => "IMAGE_STORAGE_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let code = self.code();

        let (error, message, details) = match self {
            AppError::Database(e) => {
                tracing::error!("❌ Database error: {}", e);
                (
                    "Database Error",
                    "An error occurred while accessing the database".to_string(),
                    None,
                )
            }
            AppError::Internal(msg) => {
                tracing::error!("❌ Internal error: {}", msg);
                (
                    "Internal Server Error",
                    "An unexpected error occurred".to_string(),
                    None,
                )
            }
            AppError::Storage(msg) => {
                tracing::error!("❌ Image storage error: {}", msg);
                (
                    "Image Storage Error",
                    "Image upload failed, nothing was saved".to_string(),
                    None,
                )
            }
            AppError::InvalidFields(e) => {
                tracing::debug!("Invalid fields: {}", e);
                (
                    "Validation Error",
                    "The provided data is invalid".to_string(),
                    Some(json!(e)),
                )
            }
            AppError::Validation(msg) => ("Validation Error", msg, None),
            AppError::DuplicateKey(msg) => ("Duplicate Key", msg, None),
            AppError::NotFound(msg) => ("Not Found", msg, None),
            AppError::Conflict(msg) => ("Conflict", msg, None),
            AppError::InvalidReference(msg) => ("Invalid Reference", msg, None),
            AppError::InvalidArgument(msg) => ("Invalid Argument", msg, None),
            AppError::Unauthorized(msg) => ("Unauthorized", msg, None),
            AppError::Forbidden(msg) => ("Forbidden", msg, None),
        };

        if status.is_client_error() {
            tracing::debug!(status = status.as_u16(), code, "request rejected: {}", message);
        }

        let body = ErrorResponse {
            success: false,
            error,
            message,
            details,
            code,
        };

        (status, Json(body)).into_response()
    }
}

// Rechazos de los extractores de axum con el mismo cuerpo JSON que el resto
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl From<MultipartRejection> for AppError {
    fn from(rejection: MultipartRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

/// Resultado tipado para operaciones que pueden fallar
pub type AppResult<T> = Result<T, AppError>;

/// Función helper para crear errores de recurso no encontrado
pub fn not_found_error(resource: &str, id: impl std::fmt::Display) -> AppError {
    AppError::NotFound(format!("{} with id '{}' not found", resource, id))
}

/// Función helper para crear errores de clave duplicada
pub fn duplicate_key_error(resource: &str, field: &str, value: &str) -> AppError {
    AppError::DuplicateKey(format!("{} with {} '{}' already exists", resource, field, value))
}

/// Función helper para crear errores de validación
pub fn validation_error(message: impl Into<String>) -> AppError {
    AppError::Validation(message.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes_follow_taxonomy() {
        assert_eq!(validation_error("x").status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            duplicate_key_error("Car", "stock_code", "A1").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(not_found_error("Car", "1").status_code(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::Conflict("x".into()).status_code(), StatusCode::CONFLICT);
        assert_eq!(AppError::Forbidden("x".into()).status_code(), StatusCode::FORBIDDEN);
        assert_eq!(
            AppError::Internal("x".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_duplicate_key_message_names_field() {
        let err = duplicate_key_error("Car", "stock_code", "STK001");
        assert_eq!(
            err.to_string(),
            "Duplicate key: Car with stock_code 'STK001' already exists"
        );
    }
}
