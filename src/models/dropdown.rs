//! Modelo de DropdownOption
//!
//! Vocabularios controlados para los desplegables del formulario. Son
//! orientativos: los valores de un Car no se validan contra ellos.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use uuid::Uuid;

use crate::utils::errors::AppError;

/// Campo configurable - mapea al ENUM dropdown_field
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[sqlx(type_name = "dropdown_field", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum DropdownField {
    FuelType,
    Transmission,
    Ownership,
    RegistrationState,
}

impl DropdownField {
    pub const ALL: [DropdownField; 4] = [
        DropdownField::FuelType,
        DropdownField::Transmission,
        DropdownField::Ownership,
        DropdownField::RegistrationState,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DropdownField::FuelType => "fuel_type",
            DropdownField::Transmission => "transmission",
            DropdownField::Ownership => "ownership",
            DropdownField::RegistrationState => "registration_state",
        }
    }
}

impl std::fmt::Display for DropdownField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for DropdownField {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        DropdownField::ALL
            .into_iter()
            .find(|field| field.as_str() == value)
            .ok_or_else(|| {
                AppError::InvalidArgument(format!(
                    "Unknown dropdown field '{}', expected one of: fuel_type, transmission, ownership, registration_state",
                    value
                ))
            })
    }
}

/// DropdownOption - mapea a la tabla dropdown_options
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct DropdownOption {
    pub id: Uuid,
    pub field_name: DropdownField,
    pub options: Vec<String>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}
