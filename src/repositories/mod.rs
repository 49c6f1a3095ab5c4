//! Repositorios del inventario
//!
//! `InventoryRepository` es el handle de almacenamiento que se inyecta en los
//! servicios. Las implementaciones garantizan la unicidad y la integridad
//! referencial de forma atómica en la escritura (índices únicos y claves
//! foráneas); los servicios solo hacen pre-chequeos para dar mensajes claros.

use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use crate::models::{
    Brand, Car, CarFilter, CarModel, DropdownField, DropdownOption, User,
};
use crate::utils::errors::AppResult;

pub mod memory_repository;
pub mod pg_repository;

pub use memory_repository::MemoryInventoryRepository;
pub use pg_repository::PgInventoryRepository;

/// Handle compartido que viaja en `AppState`
pub type SharedRepository = Arc<dyn InventoryRepository>;

/// Página de resultados de `list_cars`
#[derive(Debug, Clone)]
pub struct CarPage {
    pub cars: Vec<Car>,
    pub total: i64,
}

#[async_trait]
pub trait InventoryRepository: Send + Sync {
    // ---- Brands ----

    /// Todas las marcas ordenadas por nombre ascendente
    async fn list_brands(&self) -> AppResult<Vec<Brand>>;
    async fn find_brand(&self, id: Uuid) -> AppResult<Option<Brand>>;
    async fn find_brand_by_name(&self, name: &str) -> AppResult<Option<Brand>>;
    async fn find_brands(&self, ids: &[Uuid]) -> AppResult<Vec<Brand>>;
    /// Falla con `DuplicateKey` si el nombre ya existe
    async fn insert_brand(&self, brand: &Brand) -> AppResult<Brand>;
    async fn update_brand(&self, brand: &Brand) -> AppResult<Brand>;
    /// Falla con `Conflict` si algún modelo referencia la marca
    async fn delete_brand(&self, id: Uuid) -> AppResult<bool>;
    async fn count_models_for_brand(&self, brand_id: Uuid) -> AppResult<i64>;

    // ---- Models ----

    /// Modelos ordenados por nombre, opcionalmente de una sola marca
    async fn list_models(&self, brand_id: Option<Uuid>) -> AppResult<Vec<CarModel>>;
    async fn find_model(&self, id: Uuid) -> AppResult<Option<CarModel>>;
    async fn find_model_by_name(&self, brand_id: Uuid, name: &str) -> AppResult<Option<CarModel>>;
    async fn find_models(&self, ids: &[Uuid]) -> AppResult<Vec<CarModel>>;
    /// Falla con `DuplicateKey` si el par (name, brand) ya existe
    async fn insert_model(&self, model: &CarModel) -> AppResult<CarModel>;
    async fn update_model(&self, model: &CarModel) -> AppResult<CarModel>;
    /// Falla con `Conflict` si algún coche referencia el modelo
    async fn delete_model(&self, id: Uuid) -> AppResult<bool>;
    async fn count_cars_for_model(&self, model_id: Uuid) -> AppResult<i64>;

    // ---- Dropdowns ----

    async fn list_dropdowns(&self) -> AppResult<Vec<DropdownOption>>;
    async fn find_dropdown(&self, field: DropdownField) -> AppResult<Option<DropdownOption>>;
    /// Crea la entrada o reemplaza la lista completa de opciones
    async fn upsert_dropdown(
        &self,
        field: DropdownField,
        options: &[String],
    ) -> AppResult<DropdownOption>;

    // ---- Cars ----

    async fn find_car(&self, id: Uuid) -> AppResult<Option<Car>>;
    /// Primer coche (distinto de `exclude`) con ese stock_code o plate_number
    async fn find_car_conflict(
        &self,
        stock_code: Option<&str>,
        plate_number: Option<&str>,
        exclude: Option<Uuid>,
    ) -> AppResult<Option<Car>>;
    /// Falla con `DuplicateKey` si stock_code o plate_number ya existen
    async fn insert_car(&self, car: &Car) -> AppResult<Car>;
    async fn update_car(&self, car: &Car) -> AppResult<Car>;
    async fn delete_car(&self, id: Uuid) -> AppResult<bool>;
    /// Página ordenada por fecha de creación descendente más el total filtrado
    async fn list_cars(&self, filter: &CarFilter, offset: i64, limit: i64) -> AppResult<CarPage>;

    // ---- Users ----

    async fn find_user(&self, id: Uuid) -> AppResult<Option<User>>;
    async fn find_user_by_email(&self, email: &str) -> AppResult<Option<User>>;
    async fn find_users(&self, ids: &[Uuid]) -> AppResult<Vec<User>>;
    /// Inserta o actualiza (hash y rol) por email
    async fn upsert_user(&self, user: &User) -> AppResult<User>;
}
