//! Modelo de CarModel
//!
//! Modelo comercial de una marca (p. ej. Toyota → Camry). El par
//! (name, brand_id) es único; dos marcas pueden compartir nombre de modelo.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::brand::BrandSummary;

/// CarModel - mapea a la tabla car_models
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct CarModel {
    pub id: Uuid,
    pub name: String,
    pub brand_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl CarModel {
    pub fn new(name: String, brand_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            brand_id,
            created_at: Utc::now(),
        }
    }
}

/// Modelo con la marca expandida para la API
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CarModelDetails {
    pub id: Uuid,
    pub name: String,
    pub brand: BrandSummary,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

impl CarModelDetails {
    pub fn new(model: CarModel, brand: BrandSummary) -> Self {
        Self {
            id: model.id,
            name: model.name,
            brand,
            created_at: model.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CarModelSummary {
    pub id: Uuid,
    pub name: String,
}

impl From<&CarModel> for CarModelSummary {
    fn from(model: &CarModel) -> Self {
        Self {
            id: model.id,
            name: model.name.clone(),
        }
    }
}
