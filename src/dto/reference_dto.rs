use serde::Deserialize;
use uuid::Uuid;

use super::car_dto::blank_as_none;

// Request para crear una marca
#[derive(Debug, Deserialize)]
pub struct CreateBrandRequest {
    pub name: String,
    pub category: Option<String>,
}

// Request para actualizar una marca
#[derive(Debug, Default, Deserialize)]
pub struct UpdateBrandRequest {
    pub name: Option<String>,
    pub category: Option<String>,
}

// Request para crear un modelo
#[derive(Debug, Deserialize)]
pub struct CreateModelRequest {
    pub name: String,
    pub brand: Uuid,
}

// Request para actualizar un modelo
#[derive(Debug, Default, Deserialize)]
pub struct UpdateModelRequest {
    pub name: Option<String>,
    pub brand: Option<Uuid>,
}

// Filtro opcional de modelos por marca
#[derive(Debug, Default, Deserialize)]
pub struct ModelListQuery {
    #[serde(default, deserialize_with = "blank_as_none")]
    pub brand: Option<Uuid>,
}

// Reemplazo completo de las opciones de un desplegable
#[derive(Debug, Deserialize)]
pub struct UpdateDropdownRequest {
    pub options: Vec<String>,
}
