//! Shared application state
//!
//! Este módulo define el estado compartido de la aplicación que se pasa
//! a través del router de Axum. Los handles de persistencia e imágenes se
//! construyen una vez en el arranque y se inyectan en los servicios.

use std::sync::Arc;

use crate::clients::SharedImageStorage;
use crate::config::environment::EnvironmentConfig;
use crate::repositories::SharedRepository;
use crate::services::{AuthService, CarLifecycleService, ReferenceDataService};
use crate::utils::jwt::JwtConfig;

#[derive(Clone)]
pub struct AppState {
    pub repository: SharedRepository,
    pub images: SharedImageStorage,
    pub config: Arc<EnvironmentConfig>,
    pub jwt: JwtConfig,
    pub reference_data: ReferenceDataService,
    pub cars: CarLifecycleService,
    pub auth: AuthService,
}

impl AppState {
    pub fn new(
        repository: SharedRepository,
        images: SharedImageStorage,
        config: EnvironmentConfig,
    ) -> Self {
        let jwt = JwtConfig::from(&config);

        Self {
            reference_data: ReferenceDataService::new(repository.clone()),
            cars: CarLifecycleService::new(
                repository.clone(),
                images.clone(),
                config.upload_timeout,
            ),
            auth: AuthService::new(repository.clone(), jwt.clone()),
            repository,
            images,
            config: Arc::new(config),
            jwt,
        }
    }
}
