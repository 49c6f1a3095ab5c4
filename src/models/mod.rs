//! Modelos del sistema
//!
//! Este módulo contiene todos los modelos de datos que mapean
//! al schema PostgreSQL del inventario.

pub mod brand;
pub mod car;
pub mod car_model;
pub mod dropdown;
pub mod user;

pub use brand::{Brand, BrandCategory, BrandSummary};
pub use car::{Car, CarDetails, CarFilter};
pub use car_model::{CarModel, CarModelDetails, CarModelSummary};
pub use dropdown::{DropdownField, DropdownOption};
pub use user::{User, UserRole, UserSummary};
