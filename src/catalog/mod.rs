//! Catalog - the operations behind the HTTP surface.
//!
//! `CatalogService<S>` translates list parameters into a store query, runs
//! single-item CRUD and computes the category aggregate. It holds nothing
//! but the store handle.
//!
//! ## Quick Start
//!
//! ```ignore
//! use plant_catalog::catalog::{CatalogService, ListParams, PlantFilter};
//! use plant_catalog::store::InMemoryPlantStore;
//!
//! let service = CatalogService::new(InMemoryPlantStore::new());
//! let saved = service.create(new_plant).await?;
//! let in_stock = service.list(&PlantFilter::new().in_stock(true)).await?;
//! let counts = service.categories().await?;
//! ```

mod filter;
mod service;

pub use filter::{ListParams, PlantFilter, Predicate, SortOrder, ALL_CATEGORIES, DEFAULT_SORT_FIELD};
pub use service::{CatalogService, CategoryCount};
