//! Repositorio PostgreSQL
//!
//! Implementación de `InventoryRepository` sobre SQLx. Las violaciones de
//! índices únicos (23505) y de claves foráneas (23503) se traducen a los
//! errores de dominio correspondientes.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use super::{CarPage, InventoryRepository};
use crate::models::{Brand, Car, CarFilter, CarModel, DropdownField, DropdownOption, User};
use crate::utils::errors::{duplicate_key_error, AppError, AppResult};

const UNIQUE_VIOLATION: &str = "23505";
const FOREIGN_KEY_VIOLATION: &str = "23503";

const CAR_COLUMNS: &str = r#"
    id, stock_code, plate_number, brand_id, model_id, variant,
    year_of_manufacture, registration_year, fuel_type, transmission, km, price,
    ownership, registration_state, rto, insurance_valid_till, images,
    created_by, created_at, updated_at
"#;

pub struct PgInventoryRepository {
    pool: PgPool,
}

impl PgInventoryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Devuelve (código SQLSTATE, constraint) si el error viene de la base de datos
fn db_violation(error: &sqlx::Error) -> Option<(String, Option<String>)> {
    error.as_database_error().and_then(|db| {
        db.code()
            .map(|code| (code.into_owned(), db.constraint().map(str::to_string)))
    })
}

fn map_brand_error(error: sqlx::Error, brand: &Brand) -> AppError {
    match db_violation(&error) {
        Some((code, _)) if code == UNIQUE_VIOLATION => {
            duplicate_key_error("Brand", "name", &brand.name)
        }
        _ => AppError::Database(error),
    }
}

fn map_model_error(error: sqlx::Error, model: &CarModel) -> AppError {
    match db_violation(&error) {
        Some((code, _)) if code == UNIQUE_VIOLATION => AppError::DuplicateKey(format!(
            "Model '{}' already exists for this brand",
            model.name
        )),
        Some((code, _)) if code == FOREIGN_KEY_VIOLATION => AppError::NotFound(format!(
            "Brand with id '{}' not found",
            model.brand_id
        )),
        _ => AppError::Database(error),
    }
}

fn map_car_error(error: sqlx::Error, car: &Car) -> AppError {
    match db_violation(&error) {
        Some((code, constraint)) if code == UNIQUE_VIOLATION => {
            match constraint.as_deref() {
                Some("cars_plate_number_key") => {
                    duplicate_key_error("Car", "plate_number", &car.plate_number)
                }
                _ => duplicate_key_error("Car", "stock_code", &car.stock_code),
            }
        }
        Some((code, constraint)) if code == FOREIGN_KEY_VIOLATION => AppError::InvalidReference(
            format!(
                "Car references a missing record ({})",
                constraint.unwrap_or_else(|| "unknown".to_string())
            ),
        ),
        _ => AppError::Database(error),
    }
}

fn map_delete_error(error: sqlx::Error, message: impl FnOnce() -> String) -> AppError {
    match db_violation(&error) {
        Some((code, _)) if code == FOREIGN_KEY_VIOLATION => AppError::Conflict(message()),
        _ => AppError::Database(error),
    }
}

#[async_trait]
impl InventoryRepository for PgInventoryRepository {
    async fn list_brands(&self) -> AppResult<Vec<Brand>> {
        let brands = sqlx::query_as::<_, Brand>(
            "SELECT id, name, category, created_at FROM brands ORDER BY name ASC, id ASC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(brands)
    }

    async fn find_brand(&self, id: Uuid) -> AppResult<Option<Brand>> {
        let brand = sqlx::query_as::<_, Brand>(
            "SELECT id, name, category, created_at FROM brands WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(brand)
    }

    async fn find_brand_by_name(&self, name: &str) -> AppResult<Option<Brand>> {
        let brand = sqlx::query_as::<_, Brand>(
            "SELECT id, name, category, created_at FROM brands WHERE name = $1",
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;
        Ok(brand)
    }

    async fn find_brands(&self, ids: &[Uuid]) -> AppResult<Vec<Brand>> {
        let brands = sqlx::query_as::<_, Brand>(
            "SELECT id, name, category, created_at FROM brands WHERE id = ANY($1)",
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;
        Ok(brands)
    }

    async fn insert_brand(&self, brand: &Brand) -> AppResult<Brand> {
        sqlx::query_as::<_, Brand>(
            r#"
            INSERT INTO brands (id, name, category, created_at)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, category, created_at
            "#,
        )
        .bind(brand.id)
        .bind(&brand.name)
        .bind(brand.category)
        .bind(brand.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_brand_error(e, brand))
    }

    async fn update_brand(&self, brand: &Brand) -> AppResult<Brand> {
        sqlx::query_as::<_, Brand>(
            r#"
            UPDATE brands SET name = $2, category = $3
            WHERE id = $1
            RETURNING id, name, category, created_at
            "#,
        )
        .bind(brand.id)
        .bind(&brand.name)
        .bind(brand.category)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_brand_error(e, brand))?
        .ok_or_else(|| AppError::NotFound("Brand not found".to_string()))
    }

    async fn delete_brand(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM brands WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                map_delete_error(e, || {
                    "Cannot delete brand. It is still referenced by models or cars.".to_string()
                })
            })?;
        Ok(result.rows_affected() > 0)
    }

    async fn count_models_for_brand(&self, brand_id: Uuid) -> AppResult<i64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM car_models WHERE brand_id = $1")
            .bind(brand_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    async fn list_models(&self, brand_id: Option<Uuid>) -> AppResult<Vec<CarModel>> {
        let models = sqlx::query_as::<_, CarModel>(
            r#"
            SELECT id, name, brand_id, created_at FROM car_models
            WHERE ($1::uuid IS NULL OR brand_id = $1)
            ORDER BY name ASC, id ASC
            "#,
        )
        .bind(brand_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(models)
    }

    async fn find_model(&self, id: Uuid) -> AppResult<Option<CarModel>> {
        let model = sqlx::query_as::<_, CarModel>(
            "SELECT id, name, brand_id, created_at FROM car_models WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(model)
    }

    async fn find_model_by_name(&self, brand_id: Uuid, name: &str) -> AppResult<Option<CarModel>> {
        let model = sqlx::query_as::<_, CarModel>(
            "SELECT id, name, brand_id, created_at FROM car_models WHERE brand_id = $1 AND name = $2",
        )
        .bind(brand_id)
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;
        Ok(model)
    }

    async fn find_models(&self, ids: &[Uuid]) -> AppResult<Vec<CarModel>> {
        let models = sqlx::query_as::<_, CarModel>(
            "SELECT id, name, brand_id, created_at FROM car_models WHERE id = ANY($1)",
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;
        Ok(models)
    }

    async fn insert_model(&self, model: &CarModel) -> AppResult<CarModel> {
        sqlx::query_as::<_, CarModel>(
            r#"
            INSERT INTO car_models (id, name, brand_id, created_at)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, brand_id, created_at
            "#,
        )
        .bind(model.id)
        .bind(&model.name)
        .bind(model.brand_id)
        .bind(model.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_model_error(e, model))
    }

    async fn update_model(&self, model: &CarModel) -> AppResult<CarModel> {
        sqlx::query_as::<_, CarModel>(
            r#"
            UPDATE car_models SET name = $2, brand_id = $3
            WHERE id = $1
            RETURNING id, name, brand_id, created_at
            "#,
        )
        .bind(model.id)
        .bind(&model.name)
        .bind(model.brand_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_model_error(e, model))?
        .ok_or_else(|| AppError::NotFound("Model not found".to_string()))
    }

    async fn delete_model(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM car_models WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                map_delete_error(e, || {
                    "Cannot delete model. It is still referenced by cars.".to_string()
                })
            })?;
        Ok(result.rows_affected() > 0)
    }

    async fn count_cars_for_model(&self, model_id: Uuid) -> AppResult<i64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM cars WHERE model_id = $1")
            .bind(model_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    async fn list_dropdowns(&self) -> AppResult<Vec<DropdownOption>> {
        let dropdowns = sqlx::query_as::<_, DropdownOption>(
            "SELECT id, field_name, options, updated_at FROM dropdown_options ORDER BY field_name ASC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(dropdowns)
    }

    async fn find_dropdown(&self, field: DropdownField) -> AppResult<Option<DropdownOption>> {
        let dropdown = sqlx::query_as::<_, DropdownOption>(
            "SELECT id, field_name, options, updated_at FROM dropdown_options WHERE field_name = $1",
        )
        .bind(field)
        .fetch_optional(&self.pool)
        .await?;
        Ok(dropdown)
    }

    async fn upsert_dropdown(
        &self,
        field: DropdownField,
        options: &[String],
    ) -> AppResult<DropdownOption> {
        let dropdown = sqlx::query_as::<_, DropdownOption>(
            r#"
            INSERT INTO dropdown_options (id, field_name, options, updated_at)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (field_name)
            DO UPDATE SET options = EXCLUDED.options, updated_at = EXCLUDED.updated_at
            RETURNING id, field_name, options, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(field)
        .bind(options)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;
        Ok(dropdown)
    }

    async fn find_car(&self, id: Uuid) -> AppResult<Option<Car>> {
        let car = sqlx::query_as::<_, Car>(&format!("SELECT {} FROM cars WHERE id = $1", CAR_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(car)
    }

    async fn find_car_conflict(
        &self,
        stock_code: Option<&str>,
        plate_number: Option<&str>,
        exclude: Option<Uuid>,
    ) -> AppResult<Option<Car>> {
        if stock_code.is_none() && plate_number.is_none() {
            return Ok(None);
        }

        // El coche que choca por stock_code va primero para respetar la precedencia del mensaje
        let car = sqlx::query_as::<_, Car>(&format!(
            r#"
            SELECT {} FROM cars
            WHERE ($3::uuid IS NULL OR id <> $3)
              AND (stock_code = $1 OR plate_number = $2)
            ORDER BY (stock_code = $1) DESC NULLS LAST
            LIMIT 1
            "#,
            CAR_COLUMNS
        ))
        .bind(stock_code)
        .bind(plate_number)
        .bind(exclude)
        .fetch_optional(&self.pool)
        .await?;
        Ok(car)
    }

    async fn insert_car(&self, car: &Car) -> AppResult<Car> {
        sqlx::query_as::<_, Car>(&format!(
            r#"
            INSERT INTO cars (
                id, stock_code, plate_number, brand_id, model_id, variant,
                year_of_manufacture, registration_year, fuel_type, transmission, km, price,
                ownership, registration_state, rto, insurance_valid_till, images,
                created_by, created_at, updated_at
            ) VALUES (
                $1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $19, $20
            )
            RETURNING {}
            "#,
            CAR_COLUMNS
        ))
        .bind(car.id)
        .bind(&car.stock_code)
        .bind(&car.plate_number)
        .bind(car.brand_id)
        .bind(car.model_id)
        .bind(&car.variant)
        .bind(car.year_of_manufacture)
        .bind(car.registration_year)
        .bind(&car.fuel_type)
        .bind(&car.transmission)
        .bind(car.km)
        .bind(car.price)
        .bind(&car.ownership)
        .bind(&car.registration_state)
        .bind(&car.rto)
        .bind(car.insurance_valid_till)
        .bind(&car.images)
        .bind(car.created_by)
        .bind(car.created_at)
        .bind(car.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_car_error(e, car))
    }

    async fn update_car(&self, car: &Car) -> AppResult<Car> {
        sqlx::query_as::<_, Car>(&format!(
            r#"
            UPDATE cars SET
                stock_code = $2, plate_number = $3, brand_id = $4, model_id = $5, variant = $6,
                year_of_manufacture = $7, registration_year = $8, fuel_type = $9,
                transmission = $10, km = $11, price = $12, ownership = $13,
                registration_state = $14, rto = $15, insurance_valid_till = $16,
                images = $17, updated_at = $18
            WHERE id = $1
            RETURNING {}
            "#,
            CAR_COLUMNS
        ))
        .bind(car.id)
        .bind(&car.stock_code)
        .bind(&car.plate_number)
        .bind(car.brand_id)
        .bind(car.model_id)
        .bind(&car.variant)
        .bind(car.year_of_manufacture)
        .bind(car.registration_year)
        .bind(&car.fuel_type)
        .bind(&car.transmission)
        .bind(car.km)
        .bind(car.price)
        .bind(&car.ownership)
        .bind(&car.registration_state)
        .bind(&car.rto)
        .bind(car.insurance_valid_till)
        .bind(&car.images)
        .bind(car.updated_at)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_car_error(e, car))?
        .ok_or_else(|| AppError::NotFound("Car not found".to_string()))
    }

    async fn delete_car(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM cars WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_cars(&self, filter: &CarFilter, offset: i64, limit: i64) -> AppResult<CarPage> {
        const WHERE_CLAUSE: &str = r#"
            WHERE ($1::uuid IS NULL OR brand_id = $1)
              AND ($2::uuid IS NULL OR model_id = $2)
              AND ($3::text IS NULL OR fuel_type = $3)
              AND ($4::text IS NULL OR transmission = $4)
              AND ($5::text IS NULL OR rto = $5)
              AND ($6::text IS NULL OR registration_state = $6)
        "#;

        let cars = sqlx::query_as::<_, Car>(&format!(
            "SELECT {} FROM cars {} ORDER BY created_at DESC, id DESC LIMIT $7 OFFSET $8",
            CAR_COLUMNS, WHERE_CLAUSE
        ))
        .bind(filter.brand)
        .bind(filter.model)
        .bind(filter.fuel_type.as_deref())
        .bind(filter.transmission.as_deref())
        .bind(filter.rto.as_deref())
        .bind(filter.registration_state.as_deref())
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        let (total,): (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM cars {}", WHERE_CLAUSE))
            .bind(filter.brand)
            .bind(filter.model)
            .bind(filter.fuel_type.as_deref())
            .bind(filter.transmission.as_deref())
            .bind(filter.rto.as_deref())
            .bind(filter.registration_state.as_deref())
            .fetch_one(&self.pool)
            .await?;

        Ok(CarPage { cars, total })
    }

    async fn find_user(&self, id: Uuid) -> AppResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, email, password_hash, role, created_at FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, email, password_hash, role, created_at FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn find_users(&self, ids: &[Uuid]) -> AppResult<Vec<User>> {
        let users = sqlx::query_as::<_, User>(
            "SELECT id, email, password_hash, role, created_at FROM users WHERE id = ANY($1)",
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;
        Ok(users)
    }

    async fn upsert_user(&self, user: &User) -> AppResult<User> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, email, password_hash, role, created_at)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (email)
            DO UPDATE SET password_hash = EXCLUDED.password_hash, role = EXCLUDED.role
            RETURNING id, email, password_hash, role, created_at
            "#,
        )
        .bind(user.id)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.role)
        .bind(user.created_at)
        .fetch_one(&self.pool)
        .await?;
        Ok(user)
    }
}
