use std::collections::HashMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::clients::ImageUpload;
use crate::models::{Car, CarDetails, CarFilter};
use crate::utils::errors::{validation_error, AppResult};
use crate::utils::validation::{
    ensure_non_negative, parse_decimal, parse_i32, parse_i64, parse_optional_date, parse_uuid,
    require_text,
};

/// Campos obligatorios al crear, en el orden en que se reportan
pub const REQUIRED_CAR_FIELDS: [&str; 14] = [
    "stock_code",
    "plate_number",
    "brand",
    "model",
    "variant",
    "year_of_manufacture",
    "registration_year",
    "fuel_type",
    "transmission",
    "km",
    "price",
    "ownership",
    "registration_state",
    "rto",
];

/// Contenido de un formulario multipart de coche
#[derive(Debug, Default)]
pub struct CarMultipart {
    pub fields: HashMap<String, String>,
    pub images: Vec<ImageUpload>,
    pub remove_images: Vec<String>,
}

// Request para crear un coche
#[derive(Debug, Clone, Validate)]
pub struct NewCarRequest {
    #[validate(length(min = 1, max = 50))]
    pub stock_code: String,
    #[validate(length(min = 1, max = 20))]
    pub plate_number: String,
    pub brand: Uuid,
    pub model: Uuid,
    #[validate(length(min = 1, max = 100))]
    pub variant: String,
    #[validate(range(min = 1900, max = 2100))]
    pub year_of_manufacture: i32,
    #[validate(range(min = 1900, max = 2100))]
    pub registration_year: i32,
    #[validate(length(min = 1, max = 50))]
    pub fuel_type: String,
    #[validate(length(min = 1, max = 50))]
    pub transmission: String,
    #[validate(range(min = 0))]
    pub km: i64,
    pub price: Decimal,
    #[validate(length(min = 1, max = 50))]
    pub ownership: String,
    #[validate(length(min = 1, max = 50))]
    pub registration_state: String,
    #[validate(length(min = 1, max = 20))]
    pub rto: String,
    pub insurance_valid_till: Option<NaiveDate>,
}

impl NewCarRequest {
    pub fn from_fields(fields: &HashMap<String, String>) -> AppResult<Self> {
        for name in REQUIRED_CAR_FIELDS {
            let present = fields.get(name).map_or(false, |v| !v.trim().is_empty());
            if !present {
                return Err(validation_error(format!("Missing required field: {}", name)));
            }
        }

        let text = |name: &str| require_text(name, &fields[name]);

        let request = Self {
            stock_code: text("stock_code")?,
            plate_number: text("plate_number")?,
            brand: parse_uuid("brand", &fields["brand"])?,
            model: parse_uuid("model", &fields["model"])?,
            variant: text("variant")?,
            year_of_manufacture: parse_i32("year_of_manufacture", &fields["year_of_manufacture"])?,
            registration_year: parse_i32("registration_year", &fields["registration_year"])?,
            fuel_type: text("fuel_type")?,
            transmission: text("transmission")?,
            km: parse_i64("km", &fields["km"])?,
            price: ensure_non_negative("price", parse_decimal("price", &fields["price"])?)?,
            ownership: text("ownership")?,
            registration_state: text("registration_state")?,
            rto: text("rto")?,
            insurance_valid_till: match fields.get("insurance_valid_till") {
                Some(value) => parse_optional_date("insurance_valid_till", value)?,
                None => None,
            },
        };

        request.validate()?;
        Ok(request)
    }
}

// Request para actualizar un coche: solo los campos presentes se aplican
#[derive(Debug, Clone, Default, Validate)]
pub struct CarPatch {
    #[validate(length(min = 1, max = 50))]
    pub stock_code: Option<String>,
    #[validate(length(min = 1, max = 20))]
    pub plate_number: Option<String>,
    pub brand: Option<Uuid>,
    pub model: Option<Uuid>,
    #[validate(length(min = 1, max = 100))]
    pub variant: Option<String>,
    #[validate(range(min = 1900, max = 2100))]
    pub year_of_manufacture: Option<i32>,
    #[validate(range(min = 1900, max = 2100))]
    pub registration_year: Option<i32>,
    pub fuel_type: Option<String>,
    pub transmission: Option<String>,
    #[validate(range(min = 0))]
    pub km: Option<i64>,
    pub price: Option<Decimal>,
    pub ownership: Option<String>,
    pub registration_state: Option<String>,
    pub rto: Option<String>,
    /// `Some(None)` borra la fecha
    pub insurance_valid_till: Option<Option<NaiveDate>>,
}

impl CarPatch {
    pub fn from_fields(fields: &HashMap<String, String>) -> AppResult<Self> {
        let mut patch = Self::default();

        for (name, value) in fields {
            match name.as_str() {
                "stock_code" => patch.stock_code = Some(require_text(name, value)?),
                "plate_number" => patch.plate_number = Some(require_text(name, value)?),
                "brand" => patch.brand = Some(parse_uuid(name, value)?),
                "model" => patch.model = Some(parse_uuid(name, value)?),
                "variant" => patch.variant = Some(require_text(name, value)?),
                "year_of_manufacture" => patch.year_of_manufacture = Some(parse_i32(name, value)?),
                "registration_year" => patch.registration_year = Some(parse_i32(name, value)?),
                "fuel_type" => patch.fuel_type = Some(require_text(name, value)?),
                "transmission" => patch.transmission = Some(require_text(name, value)?),
                "km" => patch.km = Some(parse_i64(name, value)?),
                "price" => {
                    patch.price = Some(ensure_non_negative(name, parse_decimal(name, value)?)?)
                }
                "ownership" => patch.ownership = Some(require_text(name, value)?),
                "registration_state" => {
                    patch.registration_state = Some(require_text(name, value)?)
                }
                "rto" => patch.rto = Some(require_text(name, value)?),
                "insurance_valid_till" => {
                    patch.insurance_valid_till = Some(parse_optional_date(name, value)?)
                }
                other => tracing::debug!("Campo ignorado en actualización de coche: {}", other),
            }
        }

        patch.validate()?;
        Ok(patch)
    }

    /// Merge superficial: los campos ausentes quedan como estaban
    pub fn apply_to(&self, car: &mut Car) {
        fn set<T: Clone>(target: &mut T, value: &Option<T>) {
            if let Some(value) = value {
                *target = value.clone();
            }
        }

        set(&mut car.stock_code, &self.stock_code);
        set(&mut car.plate_number, &self.plate_number);
        set(&mut car.brand_id, &self.brand);
        set(&mut car.model_id, &self.model);
        set(&mut car.variant, &self.variant);
        set(&mut car.year_of_manufacture, &self.year_of_manufacture);
        set(&mut car.registration_year, &self.registration_year);
        set(&mut car.fuel_type, &self.fuel_type);
        set(&mut car.transmission, &self.transmission);
        set(&mut car.km, &self.km);
        set(&mut car.price, &self.price);
        set(&mut car.ownership, &self.ownership);
        set(&mut car.registration_state, &self.registration_state);
        set(&mut car.rto, &self.rto);
        set(&mut car.insurance_valid_till, &self.insurance_valid_till);
    }
}

/// Query string de `GET /api/cars`
#[derive(Debug, Default, Deserialize)]
pub struct CarListQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub brand: Option<Uuid>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub model: Option<Uuid>,
    pub fuel_type: Option<String>,
    pub transmission: Option<String>,
    pub rto: Option<String>,
    pub registration_state: Option<String>,
}

impl CarListQuery {
    pub const DEFAULT_LIMIT: i64 = 20;
    pub const MAX_LIMIT: i64 = 100;

    /// Acotada para que `(page - 1) * limit` no desborde
    pub fn page(&self) -> i64 {
        self.page
            .unwrap_or(1)
            .clamp(1, i64::MAX / Self::MAX_LIMIT)
    }

    pub fn limit(&self) -> i64 {
        self.limit
            .unwrap_or(Self::DEFAULT_LIMIT)
            .clamp(1, Self::MAX_LIMIT)
    }

    pub fn filter(&self) -> CarFilter {
        let non_empty = |value: &Option<String>| {
            value
                .as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };

        CarFilter {
            brand: self.brand,
            model: self.model,
            fuel_type: non_empty(&self.fuel_type),
            transmission: non_empty(&self.transmission),
            rto: non_empty(&self.rto),
            registration_state: non_empty(&self.registration_state),
        }
    }
}

/// Los selects vacíos del panel llegan como `brand=`
pub(crate) fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<Uuid>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value: Option<String> = Option::deserialize(deserializer)?;
    match value.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(id) => Uuid::parse_str(id)
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}

// Response de un coche
#[derive(Debug, Serialize)]
pub struct CarResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub car: CarDetails,
}

impl CarResponse {
    pub fn new(car: CarDetails) -> Self {
        Self {
            success: true,
            message: None,
            car,
        }
    }

    pub fn with_message(car: CarDetails, message: &str) -> Self {
        Self {
            success: true,
            message: Some(message.to_string()),
            car,
        }
    }
}

// Response de listado paginado
#[derive(Debug, Serialize)]
pub struct CarListResponse {
    pub success: bool,
    pub cars: Vec<CarDetails>,
    #[serde(rename = "totalPages")]
    pub total_pages: i64,
    #[serde(rename = "currentPage")]
    pub current_page: i64,
    #[serde(rename = "totalCars")]
    pub total_cars: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete_fields() -> HashMap<String, String> {
        [
            ("stock_code", "stk001"),
            ("plate_number", "ka01ab1234"),
            ("brand", "6f1c2b8e-7a57-4c36-9d4e-0d1f3f3e2a10"),
            ("model", "0b9a3e3c-1d1b-4a8e-8a52-2f4b6a1c7d22"),
            ("variant", " VXi "),
            ("year_of_manufacture", "2019"),
            ("registration_year", "2020"),
            ("fuel_type", "Petrol"),
            ("transmission", "Manual"),
            ("km", "42000"),
            ("price", "525000.50"),
            ("ownership", "1st Owner"),
            ("registration_state", "KA"),
            ("rto", "KA01"),
            ("insurance_valid_till", ""),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
    }

    #[test]
    fn test_new_car_from_complete_fields() {
        let request = NewCarRequest::from_fields(&complete_fields()).unwrap();
        assert_eq!(request.variant, "VXi");
        assert_eq!(request.km, 42000);
        assert_eq!(request.price, Decimal::new(52500050, 2));
        assert_eq!(request.insurance_valid_till, None);
    }

    #[test]
    fn test_new_car_reports_first_missing_field() {
        let mut fields = complete_fields();
        fields.remove("variant");
        fields.insert("rto".to_string(), "  ".to_string());
        let err = NewCarRequest::from_fields(&fields).unwrap_err();
        assert_eq!(err.to_string(), "Validation error: Missing required field: variant");
    }

    #[test]
    fn test_new_car_rejects_out_of_range_year() {
        let mut fields = complete_fields();
        fields.insert("year_of_manufacture".to_string(), "1850".to_string());
        assert!(NewCarRequest::from_fields(&fields).is_err());
    }

    #[test]
    fn test_patch_only_touches_present_fields() {
        let fields: HashMap<String, String> = [("km", "50000"), ("insurance_valid_till", "")]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        let patch = CarPatch::from_fields(&fields).unwrap();
        assert_eq!(patch.km, Some(50000));
        assert_eq!(patch.insurance_valid_till, Some(None));
        assert!(patch.stock_code.is_none());
        assert!(patch.variant.is_none());
    }

    #[test]
    fn test_patch_rejects_blank_required_text() {
        let fields: HashMap<String, String> = [("variant", "   ")]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        assert!(CarPatch::from_fields(&fields).is_err());
    }

    #[test]
    fn test_list_query_defaults_and_clamping() {
        let query = CarListQuery::default();
        assert_eq!(query.page(), 1);
        assert_eq!(query.limit(), 20);

        let query = CarListQuery {
            page: Some(0),
            limit: Some(1000),
            fuel_type: Some(" ".to_string()),
            rto: Some("KA01".to_string()),
            ..Default::default()
        };
        assert_eq!(query.page(), 1);
        assert_eq!(query.limit(), 100);
        let filter = query.filter();
        assert_eq!(filter.fuel_type, None);
        assert_eq!(filter.rto.as_deref(), Some("KA01"));
    }
}
