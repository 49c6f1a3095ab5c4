//! Modelo de Car
//!
//! Un anuncio de coche en venta. Posee en exclusiva su lista ordenada de
//! URLs de imágenes; referencia Brand, CarModel y User.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::brand::BrandSummary;
use super::car_model::CarModelSummary;
use super::user::UserSummary;

/// Car principal - mapea exactamente a la tabla cars
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct Car {
    pub id: Uuid,
    pub stock_code: String,
    pub plate_number: String,
    pub brand_id: Uuid,
    pub model_id: Uuid,
    pub variant: String,
    pub year_of_manufacture: i32,
    pub registration_year: i32,
    pub fuel_type: String,
    pub transmission: String,
    pub km: i64,
    pub price: Decimal,
    pub ownership: String,
    pub registration_state: String,
    pub rto: String,
    pub insurance_valid_till: Option<NaiveDate>,
    pub images: Vec<String>,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Anuncio con marca, modelo y autor expandidos para mostrarlo directamente
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CarDetails {
    pub id: Uuid,
    pub stock_code: String,
    pub plate_number: String,
    pub brand: BrandSummary,
    pub model: CarModelSummary,
    pub variant: String,
    pub year_of_manufacture: i32,
    pub registration_year: i32,
    pub fuel_type: String,
    pub transmission: String,
    pub km: i64,
    pub price: Decimal,
    pub ownership: String,
    pub registration_state: String,
    pub rto: String,
    pub insurance_valid_till: Option<NaiveDate>,
    pub images: Vec<String>,
    #[serde(rename = "createdBy")]
    pub created_by: UserSummary,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

impl CarDetails {
    pub fn new(
        car: Car,
        brand: BrandSummary,
        model: CarModelSummary,
        created_by: UserSummary,
    ) -> Self {
        Self {
            id: car.id,
            stock_code: car.stock_code,
            plate_number: car.plate_number,
            brand,
            model,
            variant: car.variant,
            year_of_manufacture: car.year_of_manufacture,
            registration_year: car.registration_year,
            fuel_type: car.fuel_type,
            transmission: car.transmission,
            km: car.km,
            price: car.price,
            ownership: car.ownership,
            registration_state: car.registration_state,
            rto: car.rto,
            insurance_valid_till: car.insurance_valid_till,
            images: car.images,
            created_by,
            created_at: car.created_at,
            updated_at: car.updated_at,
        }
    }
}

/// Filtros para búsqueda de coches (coincidencia exacta)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CarFilter {
    pub brand: Option<Uuid>,
    pub model: Option<Uuid>,
    pub fuel_type: Option<String>,
    pub transmission: Option<String>,
    pub rto: Option<String>,
    pub registration_state: Option<String>,
}

impl CarFilter {
    pub fn matches(&self, car: &Car) -> bool {
        self.brand.map_or(true, |id| car.brand_id == id)
            && self.model.map_or(true, |id| car.model_id == id)
            && self.fuel_type.as_deref().map_or(true, |v| car.fuel_type == v)
            && self.transmission.as_deref().map_or(true, |v| car.transmission == v)
            && self.rto.as_deref().map_or(true, |v| car.rto == v)
            && self
                .registration_state
                .as_deref()
                .map_or(true, |v| car.registration_state == v)
    }
}
