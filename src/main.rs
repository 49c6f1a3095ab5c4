use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use dotenvy::dotenv;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use car_inventory::{
    clients::{LocalImageStorage, SharedImageStorage},
    config::{DatabaseConfig, EnvironmentConfig, StoreBackend},
    create_app,
    database::DatabaseConnection,
    models::UserRole,
    repositories::{MemoryInventoryRepository, PgInventoryRepository, SharedRepository},
    seed::{seed_reference_data, seed_users, SeedUser},
    AppState,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    // Configurar logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("car_inventory=debug,tower_http=info")),
        )
        .init();

    info!("🚗 Car Inventory API");
    info!("===================");

    let config = EnvironmentConfig::from_env()?;
    info!("⚙️ Entorno: {} | backend: {:?}", config.environment, config.store_backend);

    // Persistencia
    let mut db_connection = None;
    let repository: SharedRepository = match config.store_backend {
        StoreBackend::Postgres => {
            let db_config = DatabaseConfig::from_env()?;
            let connection = match DatabaseConnection::new(&db_config).await {
                Ok(conn) => conn,
                Err(e) => {
                    error!("❌ Error conectando a la base de datos: {:#}", e);
                    return Err(e);
                }
            };
            connection.migrate().await?;
            let repository: SharedRepository =
                Arc::new(PgInventoryRepository::new(connection.pool()));
            db_connection = Some(connection);
            repository
        }
        StoreBackend::Memory => {
            warn!("⚠️ Backend en memoria: los datos se pierden al reiniciar");
            let repository: SharedRepository = Arc::new(MemoryInventoryRepository::new());
            seed_reference_data(&repository).await?;

            let mut users = SeedUser::from_env();
            if users.is_empty() && config.is_development() {
                warn!("⚠️ Usando usuarios de desarrollo admin@dealer.local / agent@dealer.local");
                users = vec![
                    SeedUser {
                        email: "admin@dealer.local".to_string(),
                        password: "admin123".to_string(),
                        role: UserRole::Admin,
                    },
                    SeedUser {
                        email: "agent@dealer.local".to_string(),
                        password: "agent123".to_string(),
                        role: UserRole::Agent,
                    },
                ];
            }
            seed_users(&repository, &users).await?;
            repository
        }
    };

    // Almacenamiento de imágenes
    let storage = LocalImageStorage::new(&config.upload_dir, &config.public_upload_url);
    storage.ensure_root().await?;
    let images: SharedImageStorage = Arc::new(storage);

    let addr: SocketAddr = config
        .server_url()
        .parse()
        .with_context(|| format!("invalid HOST/PORT: {}", config.server_url()))?;

    let app = create_app(AppState::new(repository, images, config));

    info!("🌐 Servidor iniciando en http://{}", addr);
    info!("🔍 Endpoints disponibles:");
    info!("   GET  /health");
    info!("   POST /api/auth/login | GET /api/auth/me");
    info!("   GET|POST /api/cars | GET|PUT|DELETE /api/cars/:id");
    info!("   /api/admin/brands | /api/admin/models | /api/admin/dropdowns/:field_name");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await;

    if let Some(connection) = db_connection {
        connection.close().await;
    }

    if let Err(e) = served {
        error!("❌ Servidor terminó con error: {}", e);
        return Err(e.into());
    }

    info!("👋 Servidor terminado");
    Ok(())
}

/// Señal de apagado graceful
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("❌ No se pudo instalar el handler de Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("❌ No se pudo instalar el handler de SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("🛑 Señal Ctrl+C recibida, apagando servidor...");
        },
        _ = terminate => {
            info!("🛑 Señal de terminación recibida, apagando servidor...");
        },
    }
}
