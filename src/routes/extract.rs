//! Extractores con rechazo `AppError`
//!
//! Envuelven `Json`, `Path` y `Query` de axum para que un cuerpo mal formado,
//! un id que no es UUID o un query string inválido respondan 400 con el
//! cuerpo de error habitual en lugar del texto plano de axum.

use axum::extract::{FromRequest, FromRequestParts};

use crate::utils::errors::AppError;

#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct AppPath<T>(pub T);

#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct AppQuery<T>(pub T);
