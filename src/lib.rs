pub mod catalog;
pub mod config;
mod error;
pub mod http;
pub mod model;
pub mod seed;
pub mod store;
pub mod telemetry;

pub use catalog::{CatalogService, CategoryCount, ListParams, PlantFilter, SortOrder};
pub use config::{AppConfig, ConfigError, StoreBackend};
pub use error::{CatalogError, FieldError, StoreError};
pub use model::{NewPlant, Plant, PlantId, PlantPatch};
pub use store::{InMemoryPlantStore, PlantStore};
#[cfg(feature = "sled")]
pub use store::SledPlantStore;
