//! DTOs de la API
//!
//! Requests (JSON y campos multipart) y envoltorios de respuesta.

pub mod auth_dto;
pub mod car_dto;
pub mod reference_dto;
