//! Clients - servicios externos
//!
//! Este módulo contiene los clientes de servicios externos que el inventario
//! trata como cajas negras (almacenamiento de imágenes).

pub mod image_storage;

pub use image_storage::{
    ImageStorage, ImageUpload, LocalImageStorage, MemoryImageStorage, SharedImageStorage,
};
