//! Servicio de anuncios (coches)
//!
//! Persistencia de Car con normalización de códigos, unicidad de stock_code
//! y plate_number, merge parcial en actualizaciones y expansión de marca,
//! modelo y autor para la respuesta.

use std::collections::HashMap;

use chrono::Utc;
use uuid::Uuid;

use crate::dto::car_dto::{CarListQuery, CarListResponse, CarPatch, NewCarRequest};
use crate::models::{BrandSummary, Car, CarDetails, CarModelSummary, UserSummary};
use crate::repositories::SharedRepository;
use crate::services::image_attachment::{ensure_minimum, removed_images, resolve_images};
use crate::utils::errors::{duplicate_key_error, not_found_error, AppError, AppResult};
use crate::utils::validation::normalize_code;

/// Resultado de una actualización: el anuncio y las URLs que dejaron de usarse
#[derive(Debug)]
pub struct UpdatedCar {
    pub car: CarDetails,
    pub removed_images: Vec<String>,
}

#[derive(Clone)]
pub struct ListingService {
    repository: SharedRepository,
}

impl ListingService {
    pub fn new(repository: SharedRepository) -> Self {
        Self { repository }
    }

    pub async fn find_car(&self, id: Uuid) -> AppResult<Car> {
        self.repository
            .find_car(id)
            .await?
            .ok_or_else(|| not_found_error("Car", id))
    }

    pub async fn get_car(&self, id: Uuid) -> AppResult<CarDetails> {
        let car = self.find_car(id).await?;
        self.expand(car).await
    }

    /// Falla con `DuplicateKey` si otro coche ya usa alguno de los códigos.
    /// Si chocan ambos, el mensaje nombra stock_code. Es una comprobación
    /// previa a la subida de imágenes; la escritura la repite el repositorio
    /// de forma atómica.
    pub async fn ensure_unique(
        &self,
        stock_code: Option<&str>,
        plate_number: Option<&str>,
        exclude: Option<Uuid>,
    ) -> AppResult<()> {
        if stock_code.is_none() && plate_number.is_none() {
            return Ok(());
        }

        let stock_code = stock_code.map(normalize_code);
        let plate_number = plate_number.map(normalize_code);

        let conflict = self
            .repository
            .find_car_conflict(stock_code.as_deref(), plate_number.as_deref(), exclude)
            .await?;

        match conflict {
            Some(existing) if stock_code.as_deref() == Some(existing.stock_code.as_str()) => {
                Err(duplicate_key_error("Car", "stock_code", &existing.stock_code))
            }
            Some(existing) => Err(duplicate_key_error(
                "Car",
                "plate_number",
                &existing.plate_number,
            )),
            None => Ok(()),
        }
    }

    pub async fn create_car(
        &self,
        request: NewCarRequest,
        images: Vec<String>,
        created_by: Uuid,
    ) -> AppResult<CarDetails> {
        ensure_minimum(images.len())?;

        let stock_code = normalize_code(&request.stock_code);
        let plate_number = normalize_code(&request.plate_number);

        let now = Utc::now();
        let car = Car {
            id: Uuid::new_v4(),
            stock_code,
            plate_number,
            brand_id: request.brand,
            model_id: request.model,
            variant: request.variant,
            year_of_manufacture: request.year_of_manufacture,
            registration_year: request.registration_year,
            fuel_type: request.fuel_type,
            transmission: request.transmission,
            km: request.km,
            price: request.price,
            ownership: request.ownership,
            registration_state: request.registration_state,
            rto: request.rto,
            insurance_valid_till: request.insurance_valid_till,
            images,
            created_by,
            created_at: now,
            updated_at: now,
        };

        let car = self.repository.insert_car(&car).await?;
        tracing::info!("✅ Coche creado: {} ({})", car.stock_code, car.id);
        self.expand(car).await
    }

    /// Merge parcial. No vuelve a exigir el mínimo de imágenes.
    pub async fn update_car(
        &self,
        id: Uuid,
        mut patch: CarPatch,
        added_images: Vec<String>,
        remove_images: &[String],
    ) -> AppResult<UpdatedCar> {
        let mut car = self.find_car(id).await?;

        patch.stock_code = patch.stock_code.as_deref().map(normalize_code);
        patch.plate_number = patch.plate_number.as_deref().map(normalize_code);

        let removed = removed_images(&car.images, remove_images);
        car.images = resolve_images(&car.images, remove_images, &added_images);
        patch.apply_to(&mut car);
        car.updated_at = Utc::now();

        let car = self.repository.update_car(&car).await?;
        tracing::info!(
            "✅ Coche actualizado: {} ({} imágenes, {} retiradas)",
            car.id,
            car.images.len(),
            removed.len()
        );

        Ok(UpdatedCar {
            car: self.expand(car).await?,
            removed_images: removed,
        })
    }

    /// Borrado definitivo; devuelve el registro eliminado
    pub async fn delete_car(&self, id: Uuid) -> AppResult<Car> {
        let car = self.find_car(id).await?;
        if !self.repository.delete_car(id).await? {
            return Err(not_found_error("Car", id));
        }
        tracing::info!("🗑️ Coche eliminado: {} ({})", car.stock_code, id);
        Ok(car)
    }

    pub async fn list_cars(&self, query: &CarListQuery) -> AppResult<CarListResponse> {
        let page = query.page();
        let limit = query.limit();
        let filter = query.filter();

        let result = self
            .repository
            .list_cars(&filter, (page - 1) * limit, limit)
            .await?;
        tracing::debug!(
            "📋 Listado de coches: página {} ({} de {})",
            page,
            result.cars.len(),
            result.total
        );

        Ok(CarListResponse {
            success: true,
            cars: self.expand_many(result.cars).await?,
            total_pages: (result.total + limit - 1) / limit,
            current_page: page,
            total_cars: result.total,
        })
    }

    pub async fn expand(&self, car: Car) -> AppResult<CarDetails> {
        let mut expanded = self.expand_many(vec![car]).await?;
        expanded
            .pop()
            .ok_or_else(|| AppError::Internal("car expansion returned nothing".to_string()))
    }

    /// Expande referencias con una consulta por tabla
    pub async fn expand_many(&self, cars: Vec<Car>) -> AppResult<Vec<CarDetails>> {
        if cars.is_empty() {
            return Ok(Vec::new());
        }

        let brand_ids = unique_ids(cars.iter().map(|c| c.brand_id));
        let model_ids = unique_ids(cars.iter().map(|c| c.model_id));
        let user_ids = unique_ids(cars.iter().map(|c| c.created_by));

        let brands: HashMap<Uuid, BrandSummary> = self
            .repository
            .find_brands(&brand_ids)
            .await?
            .iter()
            .map(|b| (b.id, BrandSummary::from(b)))
            .collect();
        let models: HashMap<Uuid, CarModelSummary> = self
            .repository
            .find_models(&model_ids)
            .await?
            .iter()
            .map(|m| (m.id, CarModelSummary::from(m)))
            .collect();
        let users: HashMap<Uuid, UserSummary> = self
            .repository
            .find_users(&user_ids)
            .await?
            .iter()
            .map(|u| (u.id, UserSummary::from(u)))
            .collect();

        cars.into_iter()
            .map(|car| {
                let missing = |what: &str| {
                    AppError::Internal(format!("car {} points to a missing {}", car.id, what))
                };
                let brand = brands.get(&car.brand_id).cloned().ok_or_else(|| missing("brand"))?;
                let model = models.get(&car.model_id).cloned().ok_or_else(|| missing("model"))?;
                let user = users.get(&car.created_by).cloned().ok_or_else(|| missing("user"))?;
                Ok(CarDetails::new(car, brand, model, user))
            })
            .collect()
    }
}

fn unique_ids(ids: impl Iterator<Item = Uuid>) -> Vec<Uuid> {
    let mut ids: Vec<Uuid> = ids.collect();
    ids.sort();
    ids.dedup();
    ids
}
