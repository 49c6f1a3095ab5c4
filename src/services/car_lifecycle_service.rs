//! Ciclo de vida de un anuncio
//!
//! Orquesta alta, edición y baja: valida las referencias de marca y modelo,
//! sube las imágenes al proveedor externo con un tiempo máximo y delega la
//! persistencia en `ListingService`. Si algo falla después de subir, las
//! imágenes nuevas se retiran del proveedor.

use std::time::Duration;

use uuid::Uuid;

use crate::clients::{ImageUpload, SharedImageStorage};
use crate::dto::car_dto::{CarMultipart, CarPatch, NewCarRequest};
use crate::models::CarDetails;
use crate::repositories::SharedRepository;
use crate::services::image_attachment::{ensure_minimum, ensure_uploads_acceptable};
use crate::services::listing_service::ListingService;
use crate::utils::errors::{AppError, AppResult};

#[derive(Clone)]
pub struct CarLifecycleService {
    repository: SharedRepository,
    listings: ListingService,
    images: SharedImageStorage,
    upload_timeout: Duration,
}

impl CarLifecycleService {
    pub fn new(
        repository: SharedRepository,
        images: SharedImageStorage,
        upload_timeout: Duration,
    ) -> Self {
        Self {
            listings: ListingService::new(repository.clone()),
            repository,
            images,
            upload_timeout,
        }
    }

    pub fn listings(&self) -> &ListingService {
        &self.listings
    }

    pub async fn create_car(&self, form: CarMultipart, created_by: Uuid) -> AppResult<CarDetails> {
        let request = NewCarRequest::from_fields(&form.fields)?;
        self.validate_references(request.brand, request.model).await?;

        ensure_minimum(form.images.len())?;
        ensure_uploads_acceptable(&form.images)?;
        self.listings
            .ensure_unique(Some(&request.stock_code), Some(&request.plate_number), None)
            .await?;

        let urls = self.upload_all(&form.images).await?;
        match self
            .listings
            .create_car(request, urls.clone(), created_by)
            .await
        {
            Ok(car) => Ok(car),
            Err(e) => {
                self.discard(&urls).await;
                Err(e)
            }
        }
    }

    pub async fn update_car(&self, id: Uuid, form: CarMultipart) -> AppResult<CarDetails> {
        let current = self.listings.find_car(id).await?;
        let patch = CarPatch::from_fields(&form.fields)?;

        if patch.brand.is_some() || patch.model.is_some() {
            self.validate_references(
                patch.brand.unwrap_or(current.brand_id),
                patch.model.unwrap_or(current.model_id),
            )
            .await?;
        }

        ensure_uploads_acceptable(&form.images)?;
        self.listings
            .ensure_unique(
                patch.stock_code.as_deref(),
                patch.plate_number.as_deref(),
                Some(id),
            )
            .await?;

        let urls = self.upload_all(&form.images).await?;
        let updated = match self
            .listings
            .update_car(id, patch, urls.clone(), &form.remove_images)
            .await
        {
            Ok(updated) => updated,
            Err(e) => {
                self.discard(&urls).await;
                return Err(e);
            }
        };

        self.discard(&updated.removed_images).await;
        Ok(updated.car)
    }

    pub async fn delete_car(&self, id: Uuid) -> AppResult<()> {
        let car = self.listings.delete_car(id).await?;
        self.discard(&car.images).await;
        Ok(())
    }

    /// Marca y modelo deben existir y el modelo debe pertenecer a la marca
    async fn validate_references(&self, brand_id: Uuid, model_id: Uuid) -> AppResult<()> {
        if self.repository.find_brand(brand_id).await?.is_none() {
            return Err(AppError::InvalidReference(format!(
                "Brand '{}' does not exist",
                brand_id
            )));
        }

        let model = self.repository.find_model(model_id).await?.ok_or_else(|| {
            AppError::InvalidReference(format!("Model '{}' does not exist", model_id))
        })?;

        if model.brand_id != brand_id {
            tracing::warn!(
                "⚠️ Modelo {} no pertenece a la marca {} (es de {})",
                model_id,
                brand_id,
                model.brand_id
            );
            return Err(AppError::InvalidReference(format!(
                "Model '{}' does not belong to brand '{}'",
                model.name, brand_id
            )));
        }
        Ok(())
    }

    /// Sube en orden; ante error o timeout retira lo ya subido
    async fn upload_all(&self, uploads: &[ImageUpload]) -> AppResult<Vec<String>> {
        if uploads.is_empty() {
            return Ok(Vec::new());
        }

        let mut stored = Vec::with_capacity(uploads.len());
        let result = tokio::time::timeout(self.upload_timeout, async {
            for upload in uploads {
                stored.push(self.images.store(upload).await?);
            }
            Ok::<(), AppError>(())
        })
        .await;

        let error = match result {
            Ok(Ok(())) => {
                tracing::debug!("📤 {} imágenes subidas", stored.len());
                return Ok(stored);
            }
            Ok(Err(e)) => e,
            Err(_) => AppError::Storage(format!(
                "image upload timed out after {}s",
                self.upload_timeout.as_secs()
            )),
        };

        tracing::error!("❌ Fallo subiendo imágenes: {}", error);
        self.discard(&stored).await;
        Err(error)
    }

    /// Limpieza best-effort en el proveedor de imágenes
    async fn discard(&self, urls: &[String]) {
        for url in urls {
            if let Err(e) = self.images.remove(url).await {
                tracing::warn!("⚠️ No se pudo borrar la imagen {}: {}", url, e);
            }
        }
    }
}
