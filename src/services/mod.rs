//! Servicios de negocio
//!
//! Datos de referencia, anuncios, imágenes y autenticación.

pub mod auth_service;
pub mod car_lifecycle_service;
pub mod image_attachment;
pub mod listing_service;
pub mod reference_data_service;

pub use auth_service::{hash_password, AuthService};
pub use car_lifecycle_service::CarLifecycleService;
pub use listing_service::ListingService;
pub use reference_data_service::ReferenceDataService;
