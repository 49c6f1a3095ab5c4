//! Utilidades de validación
//!
//! Normalización de identificadores y conversión de campos de formulario
//! (multipart) a tipos concretos.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::utils::errors::{validation_error, AppResult};

/// Normaliza códigos únicos (stock_code, plate_number): sin espacios y en mayúsculas
pub fn normalize_code(value: &str) -> String {
    value.trim().to_uppercase()
}

/// Exige un texto no vacío tras recortar espacios
pub fn require_text(field: &str, value: &str) -> AppResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(validation_error(format!("{} cannot be empty", field)));
    }
    Ok(trimmed.to_string())
}

pub fn parse_uuid(field: &str, value: &str) -> AppResult<Uuid> {
    Uuid::parse_str(value.trim())
        .map_err(|_| validation_error(format!("{} must be a valid id", field)))
}

pub fn parse_i32(field: &str, value: &str) -> AppResult<i32> {
    value
        .trim()
        .parse()
        .map_err(|_| validation_error(format!("{} must be a whole number", field)))
}

pub fn parse_i64(field: &str, value: &str) -> AppResult<i64> {
    value
        .trim()
        .parse()
        .map_err(|_| validation_error(format!("{} must be a whole number", field)))
}

pub fn parse_decimal(field: &str, value: &str) -> AppResult<Decimal> {
    Decimal::from_str(value.trim())
        .map_err(|_| validation_error(format!("{} must be a number", field)))
}

/// Fecha opcional: vacío = ninguna; acepta `YYYY-MM-DD` o RFC 3339
pub fn parse_optional_date(field: &str, value: &str) -> AppResult<Option<NaiveDate>> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Ok(Some(date));
    }
    DateTime::parse_from_rfc3339(value)
        .map(|dt| Some(dt.date_naive()))
        .map_err(|_| validation_error(format!("{} must be a date (YYYY-MM-DD)", field)))
}

/// Valida que un precio no sea negativo
pub fn ensure_non_negative(field: &str, value: Decimal) -> AppResult<Decimal> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(validation_error(format!("{} cannot be negative", field)));
    }
    Ok(value)
}
