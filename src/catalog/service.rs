use futures::future::try_join_all;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use super::filter::PlantFilter;
use crate::error::CatalogError;
use crate::model::{NewPlant, Plant, PlantPatch};
use crate::store::{Filter, PlantStore};

const CATEGORIES_FIELD: &str = "categories";

/// One entry of the category aggregate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCount {
    pub name: String,
    pub count: usize,
}

/// Stateless catalog operations over a plant store.
///
/// Generic over `S`, the store implementation. Every call is one
/// independent round of store operations; nothing is cached between calls.
pub struct CatalogService<S> {
    store: S,
}

impl<S: PlantStore> CatalogService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Get a reference to the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// All plants matching the filter, in the filter's sort order.
    #[instrument(skip(self, filter), fields(sort = filter.sort_field()))]
    pub async fn list(&self, filter: &PlantFilter) -> Result<Vec<Plant>, CatalogError> {
        let query = filter.to_query();
        let plants = self.store.find(&query).await?;
        debug!(count = plants.len(), "listed plants");
        Ok(plants)
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: &str) -> Result<Plant, CatalogError> {
        self.store
            .find_by_id(id)
            .await?
            .ok_or_else(|| CatalogError::NotFound(id.to_string()))
    }

    #[instrument(skip(self, plant), fields(name = %plant.name))]
    pub async fn create(&self, plant: NewPlant) -> Result<Plant, CatalogError> {
        let saved = self.store.insert(plant).await?;
        info!(plant_id = %saved.id, "created plant");
        Ok(saved)
    }

    /// Replace the fields present in `patch`.
    #[instrument(skip(self, patch))]
    pub async fn update(&self, id: &str, patch: PlantPatch) -> Result<Plant, CatalogError> {
        let set = patch.to_set_document()?;
        match self.store.find_by_id_and_update(id, &set).await? {
            Some(updated) => {
                info!(plant_id = %updated.id, fields = set.len(), "updated plant");
                Ok(updated)
            }
            None => {
                warn!("update target not found");
                Err(CatalogError::NotFound(id.to_string()))
            }
        }
    }

    /// Hard delete. Returns the removed plant.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: &str) -> Result<Plant, CatalogError> {
        match self.store.find_by_id_and_delete(id).await? {
            Some(removed) => {
                info!(plant_id = %removed.id, "deleted plant");
                Ok(removed)
            }
            None => {
                warn!("delete target not found");
                Err(CatalogError::NotFound(id.to_string()))
            }
        }
    }

    /// Distinct category values with the number of plants holding each.
    ///
    /// One distinct query, then one count per value, issued concurrently.
    /// Cost grows with the number of distinct values.
    #[instrument(skip(self))]
    pub async fn categories(&self) -> Result<Vec<CategoryCount>, CatalogError> {
        let values = self.store.distinct(CATEGORIES_FIELD).await?;

        let counts = try_join_all(values.into_iter().map(|value| async move {
            let filter = Filter::is_in(CATEGORIES_FIELD, vec![value.clone()]);
            let count = self.store.count(&filter).await?;
            Ok::<_, CatalogError>(CategoryCount {
                name: category_name(value),
                count,
            })
        }))
        .await?;

        debug!(categories = counts.len(), "counted categories");
        Ok(counts)
    }
}

fn category_name(value: Value) -> String {
    match value {
        Value::String(name) => name,
        other => other.to_string(),
    }
}
