//! [`VehicleStore`]: the persistence seam, and [`MemoryStore`], its in-process
//! implementation.
//!
//! Stored records only ever hold identity numbers as envelopes; the store
//! treats them as opaque text.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use thiserror::Error;
use uuid::Uuid;

use super::{RecordUpdate, VehicleRecord};

/// Errors produced by a record store.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    /// A record with this id already exists.
    #[error("vehicle {0} already exists")]
    Duplicate(Uuid),

    /// The backing store cannot serve requests right now.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Persistence for vehicle records.
#[cfg_attr(test, mockall::automock)]
pub trait VehicleStore: Send + Sync {
    /// Insert a new record.
    ///
    /// # Errors
    ///
    /// [`StoreError::Duplicate`] if the id is taken.
    fn insert(&self, record: VehicleRecord) -> Result<(), StoreError>;

    /// Fetch a record by id. `Ok(None)` when absent.
    ///
    /// # Errors
    ///
    /// [`StoreError::Unavailable`] if the store cannot be read.
    fn get(&self, id: &Uuid) -> Result<Option<VehicleRecord>, StoreError>;

    /// Apply `change` to the record with this id as one atomic step and
    /// return the updated record. `Ok(None)` when absent.
    ///
    /// # Errors
    ///
    /// [`StoreError::Unavailable`] if the store cannot be written.
    fn update(&self, id: &Uuid, change: RecordUpdate)
        -> Result<Option<VehicleRecord>, StoreError>;

    /// Number of stored records.
    ///
    /// # Errors
    ///
    /// [`StoreError::Unavailable`] if the store cannot be read.
    fn count(&self) -> Result<usize, StoreError>;
}

/// Thread-safe in-memory record store.
///
/// Many request handlers may read concurrently; writers take a short exclusive
/// lock.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<HashMap<Uuid, VehicleRecord>>>,
}

impl MemoryStore {
    /// Create a new, empty [`MemoryStore`].
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned<T>(_: T) -> StoreError {
    StoreError::Unavailable("record lock poisoned".into())
}

impl VehicleStore for MemoryStore {
    fn insert(&self, record: VehicleRecord) -> Result<(), StoreError> {
        let mut map = self.inner.write().map_err(poisoned)?;
        if map.contains_key(&record.id) {
            return Err(StoreError::Duplicate(record.id));
        }
        map.insert(record.id, record);
        Ok(())
    }

    fn get(&self, id: &Uuid) -> Result<Option<VehicleRecord>, StoreError> {
        let map = self.inner.read().map_err(poisoned)?;
        Ok(map.get(id).cloned())
    }

    fn update(
        &self,
        id: &Uuid,
        change: RecordUpdate,
    ) -> Result<Option<VehicleRecord>, StoreError> {
        let mut map = self.inner.write().map_err(poisoned)?;
        Ok(map.get_mut(id).map(|record| {
            change.apply_to(record);
            record.clone()
        }))
    }

    fn count(&self) -> Result<usize, StoreError> {
        Ok(self.inner.read().map_err(poisoned)?.len())
    }
}
