//! Seed de datos de referencia y usuarios iniciales
//!
//! Uso: `cargo run --bin seed` con `DATABASE_URL` y, opcionalmente,
//! `ADMIN_EMAIL`/`ADMIN_PASSWORD` y `AGENT_EMAIL`/`AGENT_PASSWORD`.

use std::sync::Arc;

use anyhow::Result;
use dotenvy::dotenv;
use tracing::info;
use tracing_subscriber::EnvFilter;

use car_inventory::{
    config::DatabaseConfig,
    database::DatabaseConnection,
    repositories::{PgInventoryRepository, SharedRepository},
    seed::{seed_reference_data, seed_users, SeedUser},
};

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("car_inventory=info")),
        )
        .init();

    let connection = DatabaseConnection::new(&DatabaseConfig::from_env()?).await?;
    connection.migrate().await?;

    let repository: SharedRepository = Arc::new(PgInventoryRepository::new(connection.pool()));

    let report = seed_reference_data(&repository).await?;
    let users = seed_users(&repository, &SeedUser::from_env()).await?;

    info!(
        "🎉 Base de datos lista: {} marcas, {} modelos, {} desplegables, {} usuarios",
        report.brands_created, report.models_created, report.dropdowns_upserted, users
    );

    connection.close().await;
    Ok(())
}
