//! Plant stores - document persistence behind the catalog.
//!
//! A store owns the `plants` collection. It exposes document-store
//! primitives (find, find-by-id, insert, update, delete, distinct, count)
//! over the native [`Query`] form, assigns ids and timestamps, and enforces
//! the collection schema on every write.
//!
//! Identifiers arrive as raw strings; casting them to [`PlantId`] is the
//! store's job, so a malformed id is a [`StoreError::InvalidId`], never a
//! missing record.
//!
//! ## Example
//!
//! ```ignore
//! use plant_catalog::store::{Filter, InMemoryPlantStore, PlantStore, Query};
//!
//! let store = InMemoryPlantStore::new();
//! let saved = store.insert(new_plant).await?;
//! let indoor = store.find(&Query::new(Filter::is_in("categories", vec!["Indoor".into()]))).await?;
//! ```
//!
//! [`PlantId`]: crate::model::PlantId

mod in_memory;
mod query;
#[cfg(feature = "sled")]
mod sled;

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::error::StoreError;
use crate::model::{NewPlant, Plant};

pub use in_memory::InMemoryPlantStore;
pub use query::{compare_values, distinct_values, lookup, Direction, Filter, Query, Sort};
#[cfg(feature = "sled")]
pub use self::sled::SledPlantStore;

/// Persistence service for the `plants` collection.
#[async_trait]
pub trait PlantStore: Send + Sync {
    /// All documents matching the query, in query order.
    async fn find(&self, query: &Query) -> Result<Vec<Plant>, StoreError>;

    /// Look up one document. `Ok(None)` when the id is well-formed but absent.
    async fn find_by_id(&self, id: &str) -> Result<Option<Plant>, StoreError>;

    /// Insert a new document; the store assigns `_id` and timestamps.
    async fn insert(&self, plant: NewPlant) -> Result<Plant, StoreError>;

    /// Apply a `$set` document to one record and return the updated record.
    async fn find_by_id_and_update(
        &self,
        id: &str,
        set: &Map<String, Value>,
    ) -> Result<Option<Plant>, StoreError>;

    /// Remove one record, returning what was removed.
    async fn find_by_id_and_delete(&self, id: &str) -> Result<Option<Plant>, StoreError>;

    /// Distinct values of `field`, array elements flattened.
    async fn distinct(&self, field: &str) -> Result<Vec<Value>, StoreError>;

    /// Number of documents matching `filter`.
    async fn count(&self, filter: &Filter) -> Result<usize, StoreError>;

    /// Remove every document matching `filter`, returning how many went.
    async fn delete_many(&self, filter: &Filter) -> Result<usize, StoreError>;

    /// Insert several documents in order.
    async fn insert_many(&self, plants: Vec<NewPlant>) -> Result<Vec<Plant>, StoreError> {
        let mut saved = Vec::with_capacity(plants.len());
        for plant in plants {
            saved.push(self.insert(plant).await?);
        }
        Ok(saved)
    }

    /// Release the backend. Called once at shutdown.
    async fn close(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

pub(crate) fn encode_plant(plant: &Plant) -> Result<Vec<u8>, StoreError> {
    Ok(serde_json::to_vec(plant)?)
}

pub(crate) fn decode_document(bytes: &[u8]) -> Result<Value, StoreError> {
    Ok(serde_json::from_slice(bytes)?)
}

pub(crate) fn into_plant(doc: Value) -> Result<Plant, StoreError> {
    Ok(serde_json::from_value(doc)?)
}
