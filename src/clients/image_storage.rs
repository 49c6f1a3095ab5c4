//! Almacenamiento de imágenes
//!
//! El proveedor de imágenes es un colaborador externo: recibe los bytes de
//! una subida y devuelve la URL pública. `LocalImageStorage` escribe en disco
//! y se sirve como estático bajo `PUBLIC_UPLOAD_URL`.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Bytes;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::utils::errors::{AppError, AppResult};

/// Handle compartido que viaja en `AppState`
pub type SharedImageStorage = Arc<dyn ImageStorage>;

/// Archivo de imagen recibido en una petición multipart
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Bytes,
}

impl ImageUpload {
    pub fn is_image(&self) -> bool {
        self.content_type.starts_with("image/")
    }

    /// Extensión de archivo derivada del content type
    pub fn extension(&self) -> &'static str {
        match self.content_type.as_str() {
            "image/png" => "png",
            "image/webp" => "webp",
            "image/gif" => "gif",
            "image/avif" => "avif",
            _ => "jpg",
        }
    }
}

#[async_trait]
pub trait ImageStorage: Send + Sync {
    /// Guarda la imagen y devuelve su URL pública
    async fn store(&self, upload: &ImageUpload) -> AppResult<String>;
    /// Elimina una imagen previamente guardada
    async fn remove(&self, url: &str) -> AppResult<()>;
}

/// Almacenamiento en disco local
pub struct LocalImageStorage {
    root: PathBuf,
    public_base_url: String,
}

impl LocalImageStorage {
    pub fn new(root: impl Into<PathBuf>, public_base_url: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            public_base_url: public_base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Crea el directorio raíz si no existe
    pub async fn ensure_root(&self) -> AppResult<()> {
        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|e| AppError::Storage(format!("cannot create {}: {}", self.root.display(), e)))
    }

    fn file_name_for(&self, url: &str) -> Option<String> {
        let name = url.strip_prefix(&self.public_base_url)?.trim_start_matches('/');
        // Solo nombres planos generados por nosotros
        if name.is_empty() || name.contains('/') || name.contains("..") {
            return None;
        }
        Some(name.to_string())
    }
}

#[async_trait]
impl ImageStorage for LocalImageStorage {
    async fn store(&self, upload: &ImageUpload) -> AppResult<String> {
        let name = format!("{}.{}", Uuid::new_v4(), upload.extension());
        let path = self.root.join(&name);

        tokio::fs::write(&path, &upload.bytes)
            .await
            .map_err(|e| AppError::Storage(format!("cannot write {}: {}", path.display(), e)))?;

        tracing::debug!("🖼️ Imagen guardada: {} ({} bytes)", name, upload.bytes.len());
        Ok(format!("{}/{}", self.public_base_url, name))
    }

    async fn remove(&self, url: &str) -> AppResult<()> {
        let Some(name) = self.file_name_for(url) else {
            tracing::debug!("URL ajena al almacenamiento local, se ignora: {}", url);
            return Ok(());
        };

        match tokio::fs::remove_file(self.root.join(&name)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::Storage(format!("cannot remove {}: {}", name, e))),
        }
    }
}

/// Almacenamiento en memoria con URLs deterministas (`memory://images/N-nombre`)
#[derive(Debug, Default)]
pub struct MemoryImageStorage {
    images: RwLock<HashMap<String, Bytes>>,
    counter: RwLock<u64>,
}

impl MemoryImageStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn contains(&self, url: &str) -> bool {
        self.images.read().await.contains_key(url)
    }

    pub async fn len(&self) -> usize {
        self.images.read().await.len()
    }
}

#[async_trait]
impl ImageStorage for MemoryImageStorage {
    async fn store(&self, upload: &ImageUpload) -> AppResult<String> {
        let mut counter = self.counter.write().await;
        *counter += 1;
        let url = format!("memory://images/{}-{}", *counter, upload.file_name);
        self.images.write().await.insert(url.clone(), upload.bytes.clone());
        Ok(url)
    }

    async fn remove(&self, url: &str) -> AppResult<()> {
        self.images.write().await.remove(url);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upload(name: &str, content_type: &str) -> ImageUpload {
        ImageUpload {
            file_name: name.to_string(),
            content_type: content_type.to_string(),
            bytes: Bytes::from_static(b"\xff\xd8\xff"),
        }
    }

    #[test]
    fn test_content_type_checks() {
        assert!(upload("a.jpg", "image/jpeg").is_image());
        assert!(!upload("a.pdf", "application/pdf").is_image());
        assert_eq!(upload("a.png", "image/png").extension(), "png");
        assert_eq!(upload("a", "image/jpeg").extension(), "jpg");
    }

    #[test]
    fn test_local_storage_rejects_foreign_urls() {
        let storage = LocalImageStorage::new("/tmp/uploads", "/uploads/");
        assert_eq!(storage.file_name_for("/uploads/abc.jpg").as_deref(), Some("abc.jpg"));
        assert_eq!(storage.file_name_for("/uploads/../etc/passwd"), None);
        assert_eq!(storage.file_name_for("https://cdn.example.com/x.jpg"), None);
    }

    #[tokio::test]
    async fn test_memory_storage_store_and_remove() {
        let storage = MemoryImageStorage::new();
        let url = storage.store(&upload("front.jpg", "image/jpeg")).await.unwrap();
        assert_eq!(url, "memory://images/1-front.jpg");
        assert!(storage.contains(&url).await);
        storage.remove(&url).await.unwrap();
        assert_eq!(storage.len().await, 0);
    }
}
