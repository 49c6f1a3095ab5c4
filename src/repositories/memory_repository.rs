//! Repositorio en memoria
//!
//! Misma semántica que el repositorio PostgreSQL: las comprobaciones de
//! unicidad y de claves foráneas se hacen bajo el mismo guard de escritura
//! que la inserción, así que son atómicas respecto a otras peticiones.
//! Se usa con `STORE_BACKEND=memory` y en los tests.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{CarPage, InventoryRepository};
use crate::models::{Brand, Car, CarFilter, CarModel, DropdownField, DropdownOption, User};
use crate::utils::errors::{duplicate_key_error, not_found_error, AppError, AppResult};

#[derive(Debug, Clone)]
struct StoredCar {
    car: Car,
    /// Orden de inserción; desempata coches creados en el mismo instante
    seq: u64,
}

#[derive(Debug, Default)]
struct Tables {
    brands: HashMap<Uuid, Brand>,
    models: HashMap<Uuid, CarModel>,
    dropdowns: HashMap<DropdownField, DropdownOption>,
    cars: HashMap<Uuid, StoredCar>,
    users: HashMap<Uuid, User>,
    next_seq: u64,
}

impl Tables {
    fn brand_name_taken(&self, name: &str, exclude: Uuid) -> bool {
        self.brands.values().any(|b| b.id != exclude && b.name == name)
    }

    fn model_pair_taken(&self, name: &str, brand_id: Uuid, exclude: Uuid) -> bool {
        self.models
            .values()
            .any(|m| m.id != exclude && m.brand_id == brand_id && m.name == name)
    }

    /// stock_code tiene precedencia sobre plate_number
    fn car_conflict(
        &self,
        stock_code: Option<&str>,
        plate_number: Option<&str>,
        exclude: Option<Uuid>,
    ) -> Option<&Car> {
        let others = || {
            self.cars
                .values()
                .map(|stored| &stored.car)
                .filter(move |car| Some(car.id) != exclude)
        };

        stock_code
            .and_then(|code| others().find(|car| car.stock_code == code))
            .or_else(|| plate_number.and_then(|plate| others().find(|car| car.plate_number == plate)))
    }

    fn check_car_unique(&self, car: &Car) -> AppResult<()> {
        match self.car_conflict(Some(&car.stock_code), Some(&car.plate_number), Some(car.id)) {
            Some(existing) if existing.stock_code == car.stock_code => {
                Err(duplicate_key_error("Car", "stock_code", &car.stock_code))
            }
            Some(_) => Err(duplicate_key_error("Car", "plate_number", &car.plate_number)),
            None => Ok(()),
        }
    }

    fn check_car_references(&self, car: &Car) -> AppResult<()> {
        if !self.brands.contains_key(&car.brand_id) {
            return Err(AppError::InvalidReference(format!(
                "Brand with id '{}' does not exist",
                car.brand_id
            )));
        }
        if !self.models.contains_key(&car.model_id) {
            return Err(AppError::InvalidReference(format!(
                "Model with id '{}' does not exist",
                car.model_id
            )));
        }
        if !self.users.contains_key(&car.created_by) {
            return Err(AppError::InvalidReference(format!(
                "User with id '{}' does not exist",
                car.created_by
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct MemoryInventoryRepository {
    tables: RwLock<Tables>,
}

impl MemoryInventoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn sorted_by_name<T: Clone>(items: impl Iterator<Item = T>, name: impl Fn(&T) -> (String, Uuid)) -> Vec<T> {
    let mut items: Vec<T> = items.collect();
    items.sort_by_key(|item| name(item));
    items
}

#[async_trait]
impl InventoryRepository for MemoryInventoryRepository {
    async fn list_brands(&self) -> AppResult<Vec<Brand>> {
        let tables = self.tables.read().await;
        Ok(sorted_by_name(tables.brands.values().cloned(), |b| {
            (b.name.clone(), b.id)
        }))
    }

    async fn find_brand(&self, id: Uuid) -> AppResult<Option<Brand>> {
        Ok(self.tables.read().await.brands.get(&id).cloned())
    }

    async fn find_brand_by_name(&self, name: &str) -> AppResult<Option<Brand>> {
        let tables = self.tables.read().await;
        Ok(tables.brands.values().find(|b| b.name == name).cloned())
    }

    async fn find_brands(&self, ids: &[Uuid]) -> AppResult<Vec<Brand>> {
        let tables = self.tables.read().await;
        Ok(ids.iter().filter_map(|id| tables.brands.get(id).cloned()).collect())
    }

    async fn insert_brand(&self, brand: &Brand) -> AppResult<Brand> {
        let mut tables = self.tables.write().await;
        if tables.brand_name_taken(&brand.name, brand.id) {
            return Err(duplicate_key_error("Brand", "name", &brand.name));
        }
        tables.brands.insert(brand.id, brand.clone());
        Ok(brand.clone())
    }

    async fn update_brand(&self, brand: &Brand) -> AppResult<Brand> {
        let mut tables = self.tables.write().await;
        if !tables.brands.contains_key(&brand.id) {
            return Err(not_found_error("Brand", brand.id));
        }
        if tables.brand_name_taken(&brand.name, brand.id) {
            return Err(duplicate_key_error("Brand", "name", &brand.name));
        }
        tables.brands.insert(brand.id, brand.clone());
        Ok(brand.clone())
    }

    async fn delete_brand(&self, id: Uuid) -> AppResult<bool> {
        let mut tables = self.tables.write().await;
        let models = tables.models.values().filter(|m| m.brand_id == id).count();
        if models > 0 {
            return Err(AppError::Conflict(format!(
                "Cannot delete brand. It has {} associated models.",
                models
            )));
        }
        if tables.cars.values().any(|stored| stored.car.brand_id == id) {
            return Err(AppError::Conflict(
                "Cannot delete brand. It is still referenced by cars.".to_string(),
            ));
        }
        Ok(tables.brands.remove(&id).is_some())
    }

    async fn count_models_for_brand(&self, brand_id: Uuid) -> AppResult<i64> {
        let tables = self.tables.read().await;
        Ok(tables.models.values().filter(|m| m.brand_id == brand_id).count() as i64)
    }

    async fn list_models(&self, brand_id: Option<Uuid>) -> AppResult<Vec<CarModel>> {
        let tables = self.tables.read().await;
        let models = tables
            .models
            .values()
            .filter(|m| brand_id.map_or(true, |id| m.brand_id == id))
            .cloned();
        Ok(sorted_by_name(models, |m| (m.name.clone(), m.id)))
    }

    async fn find_model(&self, id: Uuid) -> AppResult<Option<CarModel>> {
        Ok(self.tables.read().await.models.get(&id).cloned())
    }

    async fn find_model_by_name(&self, brand_id: Uuid, name: &str) -> AppResult<Option<CarModel>> {
        let tables = self.tables.read().await;
        Ok(tables
            .models
            .values()
            .find(|m| m.brand_id == brand_id && m.name == name)
            .cloned())
    }

    async fn find_models(&self, ids: &[Uuid]) -> AppResult<Vec<CarModel>> {
        let tables = self.tables.read().await;
        Ok(ids.iter().filter_map(|id| tables.models.get(id).cloned()).collect())
    }

    async fn insert_model(&self, model: &CarModel) -> AppResult<CarModel> {
        let mut tables = self.tables.write().await;
        if !tables.brands.contains_key(&model.brand_id) {
            return Err(not_found_error("Brand", model.brand_id));
        }
        if tables.model_pair_taken(&model.name, model.brand_id, model.id) {
            return Err(AppError::DuplicateKey(format!(
                "Model '{}' already exists for this brand",
                model.name
            )));
        }
        tables.models.insert(model.id, model.clone());
        Ok(model.clone())
    }

    async fn update_model(&self, model: &CarModel) -> AppResult<CarModel> {
        let mut tables = self.tables.write().await;
        if !tables.models.contains_key(&model.id) {
            return Err(not_found_error("Model", model.id));
        }
        if !tables.brands.contains_key(&model.brand_id) {
            return Err(not_found_error("Brand", model.brand_id));
        }
        if tables.model_pair_taken(&model.name, model.brand_id, model.id) {
            return Err(AppError::DuplicateKey(format!(
                "Model '{}' already exists for this brand",
                model.name
            )));
        }
        tables.models.insert(model.id, model.clone());
        Ok(model.clone())
    }

    async fn delete_model(&self, id: Uuid) -> AppResult<bool> {
        let mut tables = self.tables.write().await;
        let cars = tables.cars.values().filter(|s| s.car.model_id == id).count();
        if cars > 0 {
            return Err(AppError::Conflict(format!(
                "Cannot delete model. It has {} associated cars.",
                cars
            )));
        }
        Ok(tables.models.remove(&id).is_some())
    }

    async fn count_cars_for_model(&self, model_id: Uuid) -> AppResult<i64> {
        let tables = self.tables.read().await;
        Ok(tables.cars.values().filter(|s| s.car.model_id == model_id).count() as i64)
    }

    async fn list_dropdowns(&self) -> AppResult<Vec<DropdownOption>> {
        let tables = self.tables.read().await;
        let mut dropdowns: Vec<DropdownOption> = tables.dropdowns.values().cloned().collect();
        dropdowns.sort_by_key(|d| d.field_name);
        Ok(dropdowns)
    }

    async fn find_dropdown(&self, field: DropdownField) -> AppResult<Option<DropdownOption>> {
        Ok(self.tables.read().await.dropdowns.get(&field).cloned())
    }

    async fn upsert_dropdown(
        &self,
        field: DropdownField,
        options: &[String],
    ) -> AppResult<DropdownOption> {
        let mut tables = self.tables.write().await;
        let entry = tables.dropdowns.entry(field).or_insert_with(|| DropdownOption {
            id: Uuid::new_v4(),
            field_name: field,
            options: Vec::new(),
            updated_at: Utc::now(),
        });
        entry.options = options.to_vec();
        entry.updated_at = Utc::now();
        Ok(entry.clone())
    }

    async fn find_car(&self, id: Uuid) -> AppResult<Option<Car>> {
        Ok(self.tables.read().await.cars.get(&id).map(|s| s.car.clone()))
    }

    async fn find_car_conflict(
        &self,
        stock_code: Option<&str>,
        plate_number: Option<&str>,
        exclude: Option<Uuid>,
    ) -> AppResult<Option<Car>> {
        let tables = self.tables.read().await;
        Ok(tables.car_conflict(stock_code, plate_number, exclude).cloned())
    }

    async fn insert_car(&self, car: &Car) -> AppResult<Car> {
        let mut tables = self.tables.write().await;
        tables.check_car_unique(car)?;
        tables.check_car_references(car)?;
        let seq = tables.next_seq;
        tables.next_seq += 1;
        tables.cars.insert(car.id, StoredCar { car: car.clone(), seq });
        Ok(car.clone())
    }

    async fn update_car(&self, car: &Car) -> AppResult<Car> {
        let mut tables = self.tables.write().await;
        if !tables.cars.contains_key(&car.id) {
            return Err(not_found_error("Car", car.id));
        }
        tables.check_car_unique(car)?;
        tables.check_car_references(car)?;
        if let Some(stored) = tables.cars.get_mut(&car.id) {
            stored.car = car.clone();
        }
        Ok(car.clone())
    }

    async fn delete_car(&self, id: Uuid) -> AppResult<bool> {
        Ok(self.tables.write().await.cars.remove(&id).is_some())
    }

    async fn list_cars(&self, filter: &CarFilter, offset: i64, limit: i64) -> AppResult<CarPage> {
        let tables = self.tables.read().await;
        let mut matching: Vec<&StoredCar> = tables
            .cars
            .values()
            .filter(|stored| filter.matches(&stored.car))
            .collect();
        matching.sort_by(|a, b| {
            b.car
                .created_at
                .cmp(&a.car.created_at)
                .then_with(|| b.seq.cmp(&a.seq))
        });

        let total = matching.len() as i64;
        let cars = matching
            .into_iter()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .map(|stored| stored.car.clone())
            .collect();

        Ok(CarPage { cars, total })
    }

    async fn find_user(&self, id: Uuid) -> AppResult<Option<User>> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables.users.values().find(|u| u.email == email).cloned())
    }

    async fn find_users(&self, ids: &[Uuid]) -> AppResult<Vec<User>> {
        let tables = self.tables.read().await;
        Ok(ids.iter().filter_map(|id| tables.users.get(id).cloned()).collect())
    }

    async fn upsert_user(&self, user: &User) -> AppResult<User> {
        let mut tables = self.tables.write().await;
        let existing = tables.users.values().find(|u| u.email == user.email).map(|u| u.id);
        let stored = match existing {
            Some(id) => {
                let current = tables
                    .users
                    .get_mut(&id)
                    .ok_or_else(|| AppError::Internal("user index out of sync".to_string()))?;
                current.password_hash = user.password_hash.clone();
                current.role = user.role;
                current.clone()
            }
            None => {
                tables.users.insert(user.id, user.clone());
                user.clone()
            }
        };
        Ok(stored)
    }
}
