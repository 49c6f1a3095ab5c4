//! Servicio de datos de referencia
//!
//! Marcas, modelos y vocabularios de desplegables. Los pre-chequeos dan
//! mensajes claros; la unicidad real la garantiza el repositorio al escribir.

use std::collections::HashMap;

use uuid::Uuid;

use crate::dto::reference_dto::{
    CreateBrandRequest, CreateModelRequest, UpdateBrandRequest, UpdateModelRequest,
};
use crate::models::{
    Brand, BrandCategory, BrandSummary, CarModel, CarModelDetails, DropdownField, DropdownOption,
};
use crate::repositories::SharedRepository;
use crate::utils::errors::{
    duplicate_key_error, not_found_error, validation_error, AppError, AppResult,
};
use crate::utils::validation::require_text;

#[derive(Clone)]
pub struct ReferenceDataService {
    repository: SharedRepository,
}

impl ReferenceDataService {
    pub fn new(repository: SharedRepository) -> Self {
        Self { repository }
    }

    // ---- Brands ----

    pub async fn list_brands(&self) -> AppResult<Vec<Brand>> {
        self.repository.list_brands().await
    }

    pub async fn get_brand(&self, id: Uuid) -> AppResult<Brand> {
        self.repository
            .find_brand(id)
            .await?
            .ok_or_else(|| not_found_error("Brand", id))
    }

    pub async fn create_brand(&self, request: CreateBrandRequest) -> AppResult<Brand> {
        let name = require_text("name", &request.name)?;
        let category = parse_category(request.category.as_deref())?;

        if self.repository.find_brand_by_name(&name).await?.is_some() {
            tracing::warn!("⚠️ Marca duplicada rechazada: {}", name);
            return Err(duplicate_key_error("Brand", "name", &name));
        }

        let brand = self.repository.insert_brand(&Brand::new(name, category)).await?;
        tracing::info!("✅ Marca creada: {} ({})", brand.name, brand.id);
        Ok(brand)
    }

    pub async fn update_brand(&self, id: Uuid, request: UpdateBrandRequest) -> AppResult<Brand> {
        let mut brand = self.get_brand(id).await?;

        if let Some(name) = request.name.as_deref() {
            let name = require_text("name", name)?;
            if name != brand.name {
                if let Some(other) = self.repository.find_brand_by_name(&name).await? {
                    if other.id != id {
                        return Err(duplicate_key_error("Brand", "name", &name));
                    }
                }
            }
            brand.name = name;
        }
        if let Some(category) = request.category.as_deref() {
            brand.category = category.parse()?;
        }

        let brand = self.repository.update_brand(&brand).await?;
        tracing::info!("✅ Marca actualizada: {}", brand.id);
        Ok(brand)
    }

    pub async fn delete_brand(&self, id: Uuid) -> AppResult<()> {
        self.get_brand(id).await?;

        let models = self.repository.count_models_for_brand(id).await?;
        if models > 0 {
            tracing::warn!("⚠️ Borrado de marca {} bloqueado: {} modelos", id, models);
            return Err(AppError::Conflict(format!(
                "Cannot delete brand. It has {} associated models.",
                models
            )));
        }

        if !self.repository.delete_brand(id).await? {
            return Err(not_found_error("Brand", id));
        }
        tracing::info!("🗑️ Marca eliminada: {}", id);
        Ok(())
    }

    // ---- Models ----

    pub async fn list_models(&self, brand_id: Option<Uuid>) -> AppResult<Vec<CarModelDetails>> {
        let models = self.repository.list_models(brand_id).await?;
        self.expand_models(models).await
    }

    pub async fn get_model(&self, id: Uuid) -> AppResult<CarModelDetails> {
        let model = self
            .repository
            .find_model(id)
            .await?
            .ok_or_else(|| not_found_error("Model", id))?;
        self.expand_model(model).await
    }

    pub async fn create_model(&self, request: CreateModelRequest) -> AppResult<CarModelDetails> {
        let name = require_text("name", &request.name)?;
        self.get_brand(request.brand).await?;
        self.ensure_model_pair_free(&name, request.brand, None).await?;

        let model = self
            .repository
            .insert_model(&CarModel::new(name, request.brand))
            .await?;
        tracing::info!("✅ Modelo creado: {} ({})", model.name, model.id);
        self.expand_model(model).await
    }

    pub async fn update_model(
        &self,
        id: Uuid,
        request: UpdateModelRequest,
    ) -> AppResult<CarModelDetails> {
        let mut model = self
            .repository
            .find_model(id)
            .await?
            .ok_or_else(|| not_found_error("Model", id))?;

        if let Some(name) = request.name.as_deref() {
            model.name = require_text("name", name)?;
        }
        if let Some(brand_id) = request.brand {
            self.get_brand(brand_id).await?;
            model.brand_id = brand_id;
        }
        self.ensure_model_pair_free(&model.name, model.brand_id, Some(id))
            .await?;

        let model = self.repository.update_model(&model).await?;
        tracing::info!("✅ Modelo actualizado: {}", model.id);
        self.expand_model(model).await
    }

    pub async fn delete_model(&self, id: Uuid) -> AppResult<()> {
        if self.repository.find_model(id).await?.is_none() {
            return Err(not_found_error("Model", id));
        }

        let cars = self.repository.count_cars_for_model(id).await?;
        if cars > 0 {
            tracing::warn!("⚠️ Borrado de modelo {} bloqueado: {} coches", id, cars);
            return Err(AppError::Conflict(format!(
                "Cannot delete model. It has {} associated cars.",
                cars
            )));
        }

        if !self.repository.delete_model(id).await? {
            return Err(not_found_error("Model", id));
        }
        tracing::info!("🗑️ Modelo eliminado: {}", id);
        Ok(())
    }

    async fn ensure_model_pair_free(
        &self,
        name: &str,
        brand_id: Uuid,
        exclude: Option<Uuid>,
    ) -> AppResult<()> {
        match self.repository.find_model_by_name(brand_id, name).await? {
            Some(existing) if Some(existing.id) != exclude => Err(AppError::DuplicateKey(
                format!("Model '{}' already exists for this brand", name),
            )),
            _ => Ok(()),
        }
    }

    async fn expand_model(&self, model: CarModel) -> AppResult<CarModelDetails> {
        let brand = self.get_brand(model.brand_id).await?;
        Ok(CarModelDetails::new(model, BrandSummary::from(&brand)))
    }

    async fn expand_models(&self, models: Vec<CarModel>) -> AppResult<Vec<CarModelDetails>> {
        let mut brand_ids: Vec<Uuid> = models.iter().map(|m| m.brand_id).collect();
        brand_ids.sort();
        brand_ids.dedup();

        let brands: HashMap<Uuid, BrandSummary> = self
            .repository
            .find_brands(&brand_ids)
            .await?
            .iter()
            .map(|b| (b.id, BrandSummary::from(b)))
            .collect();

        models
            .into_iter()
            .map(|model| {
                let brand = brands.get(&model.brand_id).cloned().ok_or_else(|| {
                    AppError::Internal(format!("model {} points to a missing brand", model.id))
                })?;
                Ok(CarModelDetails::new(model, brand))
            })
            .collect()
    }

    // ---- Dropdowns ----

    pub async fn list_dropdowns(&self) -> AppResult<Vec<DropdownOption>> {
        self.repository.list_dropdowns().await
    }

    pub async fn get_dropdown(&self, field_name: &str) -> AppResult<DropdownOption> {
        let field: DropdownField = field_name.parse()?;
        self.repository
            .find_dropdown(field)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Dropdown '{}' not found", field)))
    }

    /// Crea la entrada o reemplaza la lista completa (sin merge)
    pub async fn update_dropdown(
        &self,
        field_name: &str,
        options: Vec<String>,
    ) -> AppResult<DropdownOption> {
        let field: DropdownField = field_name.parse()?;

        let options = options
            .iter()
            .map(|option| {
                let trimmed = option.trim();
                if trimmed.is_empty() {
                    return Err(validation_error("Options cannot contain empty values"));
                }
                Ok(trimmed.to_string())
            })
            .collect::<AppResult<Vec<_>>>()?;

        let dropdown = self.repository.upsert_dropdown(field, &options).await?;
        tracing::info!("✅ Desplegable {} actualizado ({} opciones)", field, options.len());
        Ok(dropdown)
    }
}

fn parse_category(value: Option<&str>) -> AppResult<BrandCategory> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        Some(category) => category.parse(),
        None => Ok(BrandCategory::default()),
    }
}
