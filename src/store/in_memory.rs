//! InMemoryPlantStore - BTreeMap-backed plant store for tests and development.

use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use serde_json::{Map, Value};

use super::{decode_document, distinct_values, encode_plant, into_plant, Filter, PlantStore, Query};
use crate::error::StoreError;
use crate::model::{now, IdGenerator, NewPlant, Plant, PlantId};

/// In-memory plant store.
///
/// Documents are kept as serialized JSON keyed by id, so iteration follows
/// creation order. Clone-friendly via Arc; clones share storage.
#[derive(Clone)]
pub struct InMemoryPlantStore {
    storage: Arc<RwLock<BTreeMap<PlantId, Vec<u8>>>>,
    ids: Arc<IdGenerator>,
}

impl Default for InMemoryPlantStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryPlantStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self {
            storage: Arc::new(RwLock::new(BTreeMap::new())),
            ids: Arc::new(IdGenerator::new()),
        }
    }

    /// Number of stored documents.
    pub fn len(&self) -> Result<usize, StoreError> {
        let storage = self
            .storage
            .read()
            .map_err(|_| StoreError::LockPoisoned("len"))?;
        Ok(storage.len())
    }

    pub fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.len()? == 0)
    }

    /// Decode every document in creation order.
    fn documents(&self, operation: &'static str) -> Result<Vec<Value>, StoreError> {
        let storage = self
            .storage
            .read()
            .map_err(|_| StoreError::LockPoisoned(operation))?;
        storage.values().map(|bytes| decode_document(bytes)).collect()
    }
}

#[async_trait]
impl PlantStore for InMemoryPlantStore {
    async fn find(&self, query: &Query) -> Result<Vec<Plant>, StoreError> {
        let docs = self.documents("find")?;
        query.run(docs).into_iter().map(into_plant).collect()
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Plant>, StoreError> {
        let id = PlantId::parse(id)?;
        let storage = self
            .storage
            .read()
            .map_err(|_| StoreError::LockPoisoned("find_by_id"))?;

        match storage.get(&id) {
            Some(bytes) => Ok(Some(serde_json::from_slice(bytes)?)),
            None => Ok(None),
        }
    }

    async fn insert(&self, plant: NewPlant) -> Result<Plant, StoreError> {
        let plant = Plant::from_new(self.ids.next_id(), plant, now())?;
        let bytes = encode_plant(&plant)?;

        let mut storage = self
            .storage
            .write()
            .map_err(|_| StoreError::LockPoisoned("insert"))?;
        storage.insert(plant.id, bytes);

        Ok(plant)
    }

    async fn find_by_id_and_update(
        &self,
        id: &str,
        set: &Map<String, Value>,
    ) -> Result<Option<Plant>, StoreError> {
        let id = PlantId::parse(id)?;
        let mut storage = self
            .storage
            .write()
            .map_err(|_| StoreError::LockPoisoned("find_by_id_and_update"))?;

        let current: Plant = match storage.get(&id) {
            Some(bytes) => serde_json::from_slice(bytes)?,
            None => return Ok(None),
        };

        let updated = current.apply_set(set, now())?;
        storage.insert(id, encode_plant(&updated)?);
        Ok(Some(updated))
    }

    async fn find_by_id_and_delete(&self, id: &str) -> Result<Option<Plant>, StoreError> {
        let id = PlantId::parse(id)?;
        let mut storage = self
            .storage
            .write()
            .map_err(|_| StoreError::LockPoisoned("find_by_id_and_delete"))?;

        match storage.remove(&id) {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    async fn distinct(&self, field: &str) -> Result<Vec<Value>, StoreError> {
        let docs = self.documents("distinct")?;
        Ok(distinct_values(field, docs.iter()))
    }

    async fn count(&self, filter: &Filter) -> Result<usize, StoreError> {
        let docs = self.documents("count")?;
        Ok(docs.iter().filter(|doc| filter.matches(doc)).count())
    }

    async fn delete_many(&self, filter: &Filter) -> Result<usize, StoreError> {
        let mut storage = self
            .storage
            .write()
            .map_err(|_| StoreError::LockPoisoned("delete_many"))?;

        let mut doomed = Vec::new();
        for (id, bytes) in storage.iter() {
            if filter.matches(&decode_document(bytes)?) {
                doomed.push(*id);
            }
        }
        for id in &doomed {
            storage.remove(id);
        }
        Ok(doomed.len())
    }
}
