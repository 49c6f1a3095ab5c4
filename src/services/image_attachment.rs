//! Gestión de imágenes de un anuncio
//!
//! Cálculo puro de la lista final de URLs: las imágenes existentes que
//! sobreviven conservan su orden original y las nuevas se añaden al final en
//! orden de subida.

use crate::clients::ImageUpload;
use crate::utils::errors::{validation_error, AppResult};

/// Mínimo de imágenes para crear un anuncio
pub const MIN_IMAGES: usize = 4;

/// Máximo de archivos aceptados en una sola petición
pub const MAX_UPLOAD_IMAGES: usize = 10;

/// Calcula la siguiente lista de imágenes.
///
/// Las URLs de `remove` que no están en `current` se ignoran. Con `remove` y
/// `added` vacíos devuelve `current` sin cambios.
pub fn resolve_images(current: &[String], remove: &[String], added: &[String]) -> Vec<String> {
    current
        .iter()
        .filter(|url| !remove.contains(url))
        .chain(added.iter())
        .cloned()
        .collect()
}

/// URLs que salen de la lista (solo las que realmente estaban)
pub fn removed_images(current: &[String], remove: &[String]) -> Vec<String> {
    current
        .iter()
        .filter(|url| remove.contains(url))
        .cloned()
        .collect()
}

pub fn ensure_minimum(count: usize) -> AppResult<()> {
    if count < MIN_IMAGES {
        return Err(validation_error(format!(
            "Minimum {} images are required",
            MIN_IMAGES
        )));
    }
    Ok(())
}

/// Límite de archivos y tipo de contenido de una subida
pub fn ensure_uploads_acceptable(uploads: &[ImageUpload]) -> AppResult<()> {
    if uploads.len() > MAX_UPLOAD_IMAGES {
        return Err(validation_error(format!(
            "Maximum {} images can be uploaded at once",
            MAX_UPLOAD_IMAGES
        )));
    }
    if let Some(bad) = uploads.iter().find(|upload| !upload.is_image()) {
        return Err(validation_error(format!(
            "Only image files are allowed ('{}' is {})",
            bad.file_name, bad.content_type
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Bytes;

    fn urls(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    fn upload(content_type: &str) -> ImageUpload {
        ImageUpload {
            file_name: "photo".to_string(),
            content_type: content_type.to_string(),
            bytes: Bytes::from_static(b"data"),
        }
    }

    #[test]
    fn test_remove_two_of_five_and_add_one() {
        let current = urls(&["a", "b", "c", "d", "e"]);
        let next = resolve_images(&current, &urls(&["b", "d"]), &urls(&["f"]));
        assert_eq!(next, urls(&["a", "c", "e", "f"]));
    }

    #[test]
    fn test_empty_change_is_noop() {
        let current = urls(&["a", "b", "c", "d"]);
        let next = resolve_images(&current, &[], &[]);
        assert_eq!(next, current);
        assert_eq!(resolve_images(&next, &[], &[]), current);
    }

    #[test]
    fn test_unknown_removals_are_ignored() {
        let current = urls(&["a", "b"]);
        let next = resolve_images(&current, &urls(&["zzz"]), &[]);
        assert_eq!(next, current);
        assert!(removed_images(&current, &urls(&["zzz", "a"])) == urls(&["a"]));
    }

    #[test]
    fn test_added_keep_upload_order() {
        let next = resolve_images(&[], &[], &urls(&["3", "1", "2"]));
        assert_eq!(next, urls(&["3", "1", "2"]));
    }

    #[test]
    fn test_minimum_images() {
        assert!(ensure_minimum(3).is_err());
        assert!(ensure_minimum(4).is_ok());
    }

    #[test]
    fn test_uploads_acceptable() {
        assert!(ensure_uploads_acceptable(&vec![upload("image/png"); 10]).is_ok());
        assert!(ensure_uploads_acceptable(&vec![upload("image/png"); 11]).is_err());
        assert!(ensure_uploads_acceptable(&[upload("image/jpeg"), upload("application/pdf")]).is_err());
    }
}
