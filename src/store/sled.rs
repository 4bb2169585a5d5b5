//! SledPlantStore - embedded, on-disk plant store backed by `sled`.
//!
//! sled calls block (a write ends in an fsync), so every trait method runs
//! its body on the blocking pool via [`SledPlantStore::blocking`].

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{Map, Value};
use sled::{Config, Db, Tree};

use super::{decode_document, distinct_values, encode_plant, into_plant, Filter, PlantStore, Query};
use crate::error::StoreError;
use crate::model::{now, IdGenerator, NewPlant, Plant, PlantId};

const PLANTS_TREE: &str = "plants";

/// Plant store persisted in a single sled tree.
///
/// Keys are the 12 id bytes, so tree order is creation order. Values are
/// JSON documents. Writes go through one lock so read-modify-write updates
/// never interleave, and every write is flushed before returning.
#[derive(Clone)]
pub struct SledPlantStore {
    db: Db,
    plants: Tree,
    data_dir: PathBuf,
    ids: Arc<IdGenerator>,
    write_lock: Arc<Mutex<()>>,
}

impl SledPlantStore {
    /// Opens (or creates) the database rooted at `data_dir`.
    pub fn open(data_dir: impl AsRef<Path>) -> Result<Self, StoreError> {
        let dir = data_dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&dir).map_err(|err| {
            StoreError::Storage(format!("failed to create data directory {:?}: {err}", dir))
        })?;

        let db = Config::default()
            .path(&dir)
            .open()
            .map_err(|err| StoreError::Storage(format!("failed to open sled db: {err}")))?;

        let plants = db
            .open_tree(PLANTS_TREE)
            .map_err(|err| StoreError::Storage(format!("failed to open plants tree: {err}")))?;

        tracing::debug!(data_dir = %dir.display(), documents = plants.len(), "opened sled plant store");

        Ok(Self {
            db,
            plants,
            data_dir: dir,
            ids: Arc::new(IdGenerator::new()),
            write_lock: Arc::new(Mutex::new(())),
        })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Run `op` against a clone of this store on tokio's blocking pool.
    async fn blocking<T, F>(&self, op: F) -> Result<T, StoreError>
    where
        T: Send + 'static,
        F: FnOnce(&SledPlantStore) -> Result<T, StoreError> + Send + 'static,
    {
        let store = self.clone();
        tokio::task::spawn_blocking(move || op(&store))
            .await
            .map_err(|err| StoreError::Storage(format!("sled task failed: {err}")))?
    }

    fn lock_writes(&self, operation: &'static str) -> Result<std::sync::MutexGuard<'_, ()>, StoreError> {
        self.write_lock
            .lock()
            .map_err(|_| StoreError::LockPoisoned(operation))
    }

    fn documents(&self) -> Result<Vec<(PlantId, Value)>, StoreError> {
        self.plants
            .iter()
            .map(|entry| {
                let (key, value) = entry
                    .map_err(|err| StoreError::Storage(format!("failed to read plant: {err}")))?;
                Ok((PlantId::from_key(&key)?, decode_document(&value)?))
            })
            .collect()
    }

    fn get(&self, id: &PlantId) -> Result<Option<Plant>, StoreError> {
        let bytes = self
            .plants
            .get(id.as_bytes())
            .map_err(|err| StoreError::Storage(format!("failed to read plant {id}: {err}")))?;
        match bytes {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    fn put(&self, plant: &Plant) -> Result<(), StoreError> {
        self.plants
            .insert(plant.id.as_bytes(), encode_plant(plant)?)
            .map_err(|err| StoreError::Storage(format!("failed to persist plant: {err}")))?;
        self.flush()
    }

    fn flush(&self) -> Result<(), StoreError> {
        self.plants
            .flush()
            .map_err(|err| StoreError::Storage(format!("failed to flush plants: {err}")))?;
        Ok(())
    }

    fn update_blocking(&self, id: PlantId, set: &Map<String, Value>) -> Result<Option<Plant>, StoreError> {
        let _guard = self.lock_writes("find_by_id_and_update")?;
        let Some(current) = self.get(&id)? else {
            return Ok(None);
        };
        let updated = current.apply_set(set, now())?;
        self.put(&updated)?;
        Ok(Some(updated))
    }

    fn delete_blocking(&self, id: PlantId) -> Result<Option<Plant>, StoreError> {
        let _guard = self.lock_writes("find_by_id_and_delete")?;
        let removed = self
            .plants
            .remove(id.as_bytes())
            .map_err(|err| StoreError::Storage(format!("failed to delete plant {id}: {err}")))?;
        self.flush()?;

        match removed {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    fn delete_many_blocking(&self, filter: &Filter) -> Result<usize, StoreError> {
        let _guard = self.lock_writes("delete_many")?;
        let mut removed = 0;
        for (id, doc) in self.documents()? {
            if filter.matches(&doc) {
                self.plants
                    .remove(id.as_bytes())
                    .map_err(|err| StoreError::Storage(format!("failed to delete plant {id}: {err}")))?;
                removed += 1;
            }
        }
        self.flush()?;
        Ok(removed)
    }
}

#[async_trait]
impl PlantStore for SledPlantStore {
    async fn find(&self, query: &Query) -> Result<Vec<Plant>, StoreError> {
        let query = query.clone();
        self.blocking(move |store| {
            let docs = store.documents()?.into_iter().map(|(_, doc)| doc);
            query.run(docs).into_iter().map(into_plant).collect()
        })
        .await
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Plant>, StoreError> {
        let id = PlantId::parse(id)?;
        self.blocking(move |store| store.get(&id)).await
    }

    async fn insert(&self, plant: NewPlant) -> Result<Plant, StoreError> {
        let plant = Plant::from_new(self.ids.next_id(), plant, now())?;
        self.blocking(move |store| {
            let _guard = store.lock_writes("insert")?;
            store.put(&plant)?;
            Ok(plant)
        })
        .await
    }

    async fn find_by_id_and_update(
        &self,
        id: &str,
        set: &Map<String, Value>,
    ) -> Result<Option<Plant>, StoreError> {
        let id = PlantId::parse(id)?;
        let set = set.clone();
        self.blocking(move |store| store.update_blocking(id, &set)).await
    }

    async fn find_by_id_and_delete(&self, id: &str) -> Result<Option<Plant>, StoreError> {
        let id = PlantId::parse(id)?;
        self.blocking(move |store| store.delete_blocking(id)).await
    }

    async fn distinct(&self, field: &str) -> Result<Vec<Value>, StoreError> {
        let field = field.to_string();
        self.blocking(move |store| {
            let docs: Vec<Value> = store.documents()?.into_iter().map(|(_, doc)| doc).collect();
            Ok(distinct_values(&field, docs.iter()))
        })
        .await
    }

    async fn count(&self, filter: &Filter) -> Result<usize, StoreError> {
        let filter = filter.clone();
        self.blocking(move |store| {
            let docs = store.documents()?;
            Ok(docs.iter().filter(|(_, doc)| filter.matches(doc)).count())
        })
        .await
    }

    async fn delete_many(&self, filter: &Filter) -> Result<usize, StoreError> {
        let filter = filter.clone();
        self.blocking(move |store| store.delete_many_blocking(&filter)).await
    }

    async fn close(&self) -> Result<(), StoreError> {
        self.db
            .flush_async()
            .await
            .map_err(|err| StoreError::Storage(format!("failed to flush database: {err}")))?;
        tracing::debug!(data_dir = %self.data_dir.display(), "closed sled plant store");
        Ok(())
    }
}
