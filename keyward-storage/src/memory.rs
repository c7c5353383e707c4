//! In-process backend.

use crate::backend::{Datastore, Versioned};
use crate::error::{StorageError, StorageResult};
use crate::transaction::TransactionHandle;
use keyward_model::Entity;
use keyward_types::Key;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

/// A [`Datastore`] holding every entity in a mutex-guarded map.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<Key, Versioned>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> StorageResult<MutexGuard<'_, HashMap<Key, Versioned>>> {
        self.entries
            .lock()
            .map_err(|e| StorageError::LockPoisoned(e.to_string()))
    }

    /// Number of stored entities.
    pub fn len(&self) -> StorageResult<usize> {
        Ok(self.lock()?.len())
    }

    pub fn is_empty(&self) -> StorageResult<bool> {
        Ok(self.lock()?.is_empty())
    }

    /// Snapshot of every stored entity, in no particular order.
    pub fn entities(&self) -> StorageResult<Vec<Entity>> {
        Ok(self.lock()?.values().map(|v| v.entity.clone()).collect())
    }

    /// Current version of `key`, 0 if absent.
    pub fn version(&self, key: &Key) -> StorageResult<u64> {
        Ok(self.lock()?.get(key).map_or(0, |v| v.version))
    }
}

fn apply(entries: &mut HashMap<Key, Versioned>, key: &Key, entity: &Entity) -> u64 {
    let version = entries.get(key).map_or(0, |v| v.version) + 1;
    entries.insert(
        key.clone(),
        Versioned {
            entity: entity.clone(),
            version,
        },
    );
    version
}

impl Datastore for MemoryStore {
    fn lookup(&self, key: &Key) -> StorageResult<Option<Versioned>> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn write(&self, entity: &Entity) -> StorageResult<u64> {
        let key = entity.key().ok_or(StorageError::MissingKey)?;
        Ok(apply(&mut *self.lock()?, key, entity))
    }

    fn commit(&self, txn: &TransactionHandle) -> StorageResult<()> {
        let mut entries = self.lock()?;
        for (key, seen) in txn.reads() {
            let current = entries.get(key).map_or(0, |v| v.version);
            if current != *seen {
                return Err(StorageError::Conflict(key.to_string()));
            }
        }
        for (key, entity) in txn.writes() {
            apply(&mut entries, key, entity);
        }
        Ok(())
    }
}
