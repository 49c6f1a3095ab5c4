//! Inventario de concesionario
//!
//! API REST para el personal del concesionario: anuncios de coches con
//! imágenes, marcas, modelos y vocabularios de desplegables.

pub mod clients;
pub mod config;
pub mod database;
pub mod dto;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod seed;
pub mod services;
pub mod state;
pub mod utils;

pub use routes::create_app;
pub use state::AppState;
