//! Lectura de formularios multipart de coches
//!
//! Campos de texto al mapa `fields`, archivos `images` como subidas y
//! `removeImages` (repetible) como lista de URLs a retirar.

use axum::extract::Multipart;

use crate::clients::ImageUpload;
use crate::dto::car_dto::CarMultipart;
use crate::utils::errors::{validation_error, AppResult};

pub async fn read_car_form(mut multipart: Multipart) -> AppResult<CarMultipart> {
    let mut form = CarMultipart::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| validation_error(format!("Invalid multipart body: {}", e)))?
    {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "images" | "images[]" => {
                let file_name = field.file_name().unwrap_or("image").to_string();
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| validation_error(format!("Invalid image upload: {}", e)))?;

                // Input de archivo vacío en el formulario
                if bytes.is_empty() {
                    continue;
                }
                form.images.push(ImageUpload {
                    file_name,
                    content_type,
                    bytes,
                });
            }
            "removeImages" | "removeImages[]" => {
                let url = read_text(field).await?;
                if !url.trim().is_empty() {
                    form.remove_images.push(url.trim().to_string());
                }
            }
            "" => {}
            other => {
                let key = other.to_string();
                let value = read_text(field).await?;
                form.fields.insert(key, value);
            }
        }
    }

    tracing::debug!(
        "📨 Formulario de coche: {} campos, {} imágenes, {} a retirar",
        form.fields.len(),
        form.images.len(),
        form.remove_images.len()
    );
    Ok(form)
}

async fn read_text(field: axum::extract::multipart::Field<'_>) -> AppResult<String> {
    field
        .text()
        .await
        .map_err(|e| validation_error(format!("Invalid form field: {}", e)))
}
