//! Modelo de Brand
//!
//! Marca de coche; referenciada (no poseída) por modelos y anuncios.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use uuid::Uuid;

use crate::utils::errors::{validation_error, AppError};

/// Categoría de la marca - mapea al ENUM brand_category
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, Type, PartialEq, Eq)]
#[sqlx(type_name = "brand_category", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum BrandCategory {
    #[default]
    Regular,
    Luxury,
}

impl std::str::FromStr for BrandCategory {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "regular" => Ok(BrandCategory::Regular),
            "luxury" => Ok(BrandCategory::Luxury),
            other => Err(validation_error(format!(
                "Unknown brand category '{}', expected 'regular' or 'luxury'",
                other
            ))),
        }
    }
}

/// Brand - mapea a la tabla brands
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct Brand {
    pub id: Uuid,
    pub name: String,
    pub category: BrandCategory,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

impl Brand {
    pub fn new(name: String, category: BrandCategory) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            category,
            created_at: Utc::now(),
        }
    }
}

/// Vista reducida usada al expandir referencias
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BrandSummary {
    pub id: Uuid,
    pub name: String,
}

impl From<&Brand> for BrandSummary {
    fn from(brand: &Brand) -> Self {
        Self {
            id: brand.id,
            name: brand.name.clone(),
        }
    }
}
