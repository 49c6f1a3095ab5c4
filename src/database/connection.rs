//! Conexión a PostgreSQL
//!
//! Construcción explícita del pool, migraciones y cierre al terminar el proceso.

use anyhow::{Context, Result};
use sqlx::PgPool;

use crate::config::DatabaseConfig;

/// Handle de la base de datos que se crea en el arranque y se cierra al salir
#[derive(Clone)]
pub struct DatabaseConnection {
    pool: PgPool,
}

impl DatabaseConnection {
    pub async fn new(config: &DatabaseConfig) -> Result<Self> {
        tracing::info!("🔌 Conectando a PostgreSQL: {}", config.masked_url());
        let pool = config
            .create_pool()
            .await
            .context("failed to connect to PostgreSQL")?;

        sqlx::query("SELECT 1")
            .execute(&pool)
            .await
            .context("database health check failed")?;

        tracing::info!("✅ Conexión a PostgreSQL establecida");
        Ok(Self { pool })
    }

    /// Aplica las migraciones pendientes de `migrations/`
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .context("failed to run database migrations")?;
        tracing::info!("✅ Migraciones aplicadas");
        Ok(())
    }

    pub fn pool(&self) -> PgPool {
        self.pool.clone()
    }

    pub async fn close(&self) {
        self.pool.close().await;
        tracing::info!("🔌 Pool de PostgreSQL cerrado");
    }
}
