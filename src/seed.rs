//! Datos iniciales
//!
//! Marcas y modelos del mercado indio, vocabularios de los desplegables y
//! usuarios iniciales. Idempotente: lo que ya existe se deja como está y los
//! desplegables y usuarios se sobrescriben.

use chrono::Utc;
use uuid::Uuid;

use crate::models::{Brand, BrandCategory, CarModel, DropdownField, User, UserRole};
use crate::repositories::SharedRepository;
use crate::services::hash_password;
use crate::utils::errors::AppResult;

struct BrandSeed {
    name: &'static str,
    category: BrandCategory,
    models: &'static [&'static str],
}

const fn regular(name: &'static str, models: &'static [&'static str]) -> BrandSeed {
    BrandSeed {
        name,
        category: BrandCategory::Regular,
        models,
    }
}

const fn luxury(name: &'static str, models: &'static [&'static str]) -> BrandSeed {
    BrandSeed {
        name,
        category: BrandCategory::Luxury,
        models,
    }
}

const BRANDS: &[BrandSeed] = &[
    regular(
        "Maruti Suzuki",
        &[
            "Alto K10", "S-Presso", "Celerio", "Wagon R", "Swift", "Dzire", "Baleno", "Fronx",
            "Brezza", "Ertiga", "XL6", "Jimny", "Grand Vitara", "Invicto",
        ],
    ),
    regular(
        "Hyundai",
        &[
            "Grand i10 Nios", "i20", "Aura", "Exter", "Venue", "Creta", "Alcazar", "Verna",
            "Tucson", "Ioniq 5",
        ],
    ),
    regular(
        "Tata Motors",
        &[
            "Tiago", "Tigor", "Altroz", "Punch", "Nexon", "Harrier", "Safari", "Nexon EV",
            "Tiago EV", "Punch EV", "Tigor EV",
        ],
    ),
    regular(
        "Mahindra",
        &[
            "Thar", "Thar Roxx", "Bolero", "Bolero Neo", "Scorpio Classic", "Scorpio N",
            "XUV 3XO", "XUV700", "XUV400 EV",
        ],
    ),
    regular(
        "Toyota",
        &[
            "Glanza", "Urban Cruiser Taisor", "Urban Cruiser Hyryder", "Innova Crysta",
            "Innova Hycross", "Fortuner", "Fortuner Legender", "Camry",
        ],
    ),
    regular("Kia", &["Sonet", "Seltos", "Carens", "Carnival", "EV6"]),
    regular(
        "MG Motor",
        &["Comet EV", "Astor", "Hector", "Hector Plus", "ZS EV", "Gloster", "Windsor EV"],
    ),
    regular("Honda", &["Amaze", "City", "City Hybrid", "Elevate"]),
    regular("Renault", &["Kwid", "Triber", "Kiger"]),
    regular("Nissan", &["Magnite", "X-Trail"]),
    regular("Volkswagen", &["Virtus", "Taigun", "Tiguan"]),
    regular("Skoda", &["Slavia", "Kushaq", "Kodiaq", "Superb"]),
    regular("Citroen", &["C3", "eC3", "C3 Aircross", "C5 Aircross"]),
    regular("Jeep", &["Compass", "Meridian", "Wrangler", "Grand Cherokee"]),
    regular("Force Motors", &["Gurkha", "Urbania"]),
    luxury(
        "Mercedes-Benz",
        &[
            "A-Class", "C-Class", "E-Class", "S-Class", "GLA", "GLC", "GLE", "GLS", "G-Class",
            "EQB", "EQE", "EQS",
        ],
    ),
    luxury(
        "BMW",
        &[
            "2 Series", "3 Series", "5 Series", "7 Series", "X1", "X3", "X5", "X7", "i4", "iX",
            "i7",
        ],
    ),
    luxury("Audi", &["A4", "A6", "Q3", "Q5", "Q7", "Q8", "Q8 e-tron"]),
    luxury(
        "Jaguar Land Rover",
        &[
            "Range Rover", "Range Rover Sport", "Range Rover Velar", "Range Rover Evoque",
            "Defender", "Discovery Sport", "F-Pace",
        ],
    ),
    luxury("Volvo", &["XC40", "XC60", "XC90", "C40 Recharge"]),
    luxury("Lexus", &["ES", "NX", "RX", "LX"]),
    luxury("Porsche", &["911", "Macan", "Cayenne", "Panamera", "Taycan"]),
    luxury("Mini", &["Cooper 3 Door", "Cooper S", "Countryman", "Mini Electric"]),
];

fn dropdown_options(field: DropdownField) -> &'static [&'static str] {
    match field {
        DropdownField::FuelType => &["Petrol", "Diesel", "CNG", "Electric", "Hybrid"],
        DropdownField::Transmission => &["Manual", "Automatic", "CVT", "AMT"],
        DropdownField::Ownership => &["1st Owner", "2nd Owner", "3rd Owner", "4th Owner"],
        DropdownField::RegistrationState => &[
            "AN", "AP", "AR", "AS", "BR", "CH", "CT", "DD", "DL", "DN", "GA", "GJ", "HP", "HR",
            "JH", "JK", "KA", "KL", "LA", "LD", "MH", "ML", "MN", "MP", "MZ", "NL", "OD", "PB",
            "PY", "RJ", "SK", "TN", "TG", "TR", "UP", "UT", "WB",
        ],
    }
}

/// Resumen de una ejecución de seed
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SeedReport {
    pub brands_created: usize,
    pub models_created: usize,
    pub dropdowns_upserted: usize,
}

/// Usuario inicial del concesionario
#[derive(Debug, Clone)]
pub struct SeedUser {
    pub email: String,
    pub password: String,
    pub role: UserRole,
}

impl SeedUser {
    /// `ADMIN_EMAIL`/`ADMIN_PASSWORD` y `AGENT_EMAIL`/`AGENT_PASSWORD`; los pares incompletos se omiten
    pub fn from_env() -> Vec<SeedUser> {
        [
            ("ADMIN_EMAIL", "ADMIN_PASSWORD", UserRole::Admin),
            ("AGENT_EMAIL", "AGENT_PASSWORD", UserRole::Agent),
        ]
        .into_iter()
        .filter_map(|(email_var, password_var, role)| {
            match (std::env::var(email_var), std::env::var(password_var)) {
                (Ok(email), Ok(password)) if !email.trim().is_empty() && !password.is_empty() => {
                    Some(SeedUser {
                        email,
                        password,
                        role,
                    })
                }
                _ => {
                    tracing::warn!("⚠️ {} / {} no definidos, usuario omitido", email_var, password_var);
                    None
                }
            }
        })
        .collect()
    }
}

/// Marcas, modelos y desplegables
pub async fn seed_reference_data(repository: &SharedRepository) -> AppResult<SeedReport> {
    let mut report = SeedReport::default();

    for seed in BRANDS {
        let brand = match repository.find_brand_by_name(seed.name).await? {
            Some(existing) => existing,
            None => {
                let brand = repository
                    .insert_brand(&Brand::new(seed.name.to_string(), seed.category))
                    .await?;
                report.brands_created += 1;
                tracing::info!("✅ Marca creada: {} ({:?})", brand.name, brand.category);
                brand
            }
        };

        for model_name in seed.models {
            if repository
                .find_model_by_name(brand.id, model_name)
                .await?
                .is_none()
            {
                repository
                    .insert_model(&CarModel::new(model_name.to_string(), brand.id))
                    .await?;
                report.models_created += 1;
            }
        }
    }

    for field in DropdownField::ALL {
        let options: Vec<String> = dropdown_options(field)
            .iter()
            .map(|o| o.to_string())
            .collect();
        repository.upsert_dropdown(field, &options).await?;
        report.dropdowns_upserted += 1;
        tracing::info!("✅ Desplegable {} ({} opciones)", field, options.len());
    }

    tracing::info!(
        "🎉 Seed completado: {} marcas y {} modelos nuevos",
        report.brands_created,
        report.models_created
    );
    Ok(report)
}

/// Inserta o actualiza los usuarios por email
pub async fn seed_users(repository: &SharedRepository, users: &[SeedUser]) -> AppResult<usize> {
    for seed in users {
        let user = User {
            id: Uuid::new_v4(),
            email: seed.email.trim().to_lowercase(),
            password_hash: hash_password(&seed.password)?,
            role: seed.role,
            created_at: Utc::now(),
        };
        let user = repository.upsert_user(&user).await?;
        tracing::info!("✅ Usuario {}: {}", user.role.as_str(), user.email);
    }
    Ok(users.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::MemoryInventoryRepository;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_seed_is_idempotent() {
        let repository: SharedRepository = Arc::new(MemoryInventoryRepository::new());

        let first = seed_reference_data(&repository).await.unwrap();
        assert_eq!(first.brands_created, BRANDS.len());
        assert_eq!(
            first.models_created,
            BRANDS.iter().map(|b| b.models.len()).sum::<usize>()
        );
        assert_eq!(first.dropdowns_upserted, 4);

        let second = seed_reference_data(&repository).await.unwrap();
        assert_eq!(second.brands_created, 0);
        assert_eq!(second.models_created, 0);
        assert_eq!(repository.list_brands().await.unwrap().len(), BRANDS.len());
    }

    #[tokio::test]
    async fn test_seeded_toyota_has_camry() {
        let repository: SharedRepository = Arc::new(MemoryInventoryRepository::new());
        seed_reference_data(&repository).await.unwrap();

        let toyota = repository.find_brand_by_name("Toyota").await.unwrap().unwrap();
        assert_eq!(toyota.category, BrandCategory::Regular);
        assert!(repository
            .find_model_by_name(toyota.id, "Camry")
            .await
            .unwrap()
            .is_some());

        let fuel = repository
            .find_dropdown(DropdownField::FuelType)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(fuel.options[0], "Petrol");
    }
}
