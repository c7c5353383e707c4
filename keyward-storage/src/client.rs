//! Get/Put/RunInTransaction over a [`Datastore`] backend.

use crate::backend::Datastore;
use crate::context::{KeyRef, RequestContext};
use crate::error::{StorageError, StorageResult};
use crate::memory::MemoryStore;
use crate::transaction::{RetryConfig, TransactionHandle};
use keyward_model::Entity;
use keyward_types::Key;
use std::sync::Arc;
use tracing::{debug, warn};

/// The datastore client every keyward operation goes through.
///
/// Cheap to clone; clones share the backend.
#[derive(Clone)]
pub struct DatastoreClient {
    backend: Arc<dyn Datastore>,
    retry: RetryConfig,
}

impl DatastoreClient {
    pub fn new(backend: Arc<dyn Datastore>, retry: RetryConfig) -> Self {
        Self { backend, retry }
    }

    /// A client over a fresh [`MemoryStore`] with default retries.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()), RetryConfig::default())
    }

    pub fn backend(&self) -> &Arc<dyn Datastore> {
        &self.backend
    }

    pub fn retry(&self) -> &RetryConfig {
        &self.retry
    }

    /// Reads the entity at `key`.
    ///
    /// The key is recorded in the context's access log. Inside a transaction
    /// the transaction's own buffered writes are visible and the observed
    /// version joins the read set.
    pub fn get(&self, ctx: &mut RequestContext, key: &Key) -> StorageResult<Option<Entity>> {
        ctx.record_access(KeyRef::from(key));

        let Some(txn) = ctx.transaction_mut() else {
            return Ok(self.backend.lookup(key)?.map(|v| v.entity));
        };
        if let Some(entity) = txn.buffered(key) {
            return Ok(Some(entity.clone()));
        }
        let found = self.backend.lookup(key)?;
        txn.record_read(key.clone(), found.as_ref().map_or(0, |v| v.version));
        Ok(found.map(|v| v.entity))
    }

    /// Writes `entity`.
    ///
    /// Inside a transaction the write is buffered until commit. The entity
    /// must carry a key, every property over the index limit must be
    /// excluded from indexes, and no double may be NaN or infinite.
    pub fn put(&self, ctx: &mut RequestContext, entity: &Entity) -> StorageResult<()> {
        let key = entity.key().ok_or(StorageError::MissingKey)?;
        if let Some(property) = entity.find_unindexed() {
            return Err(StorageError::Unindexable { property });
        }
        if let Some(property) = entity.find_non_finite() {
            return Err(StorageError::NonFinite { property });
        }

        match ctx.transaction_mut() {
            Some(txn) => {
                txn.buffer_write(key.clone(), entity.clone());
                Ok(())
            }
            None => {
                let version = self.backend.write(entity)?;
                debug!(key = %key, version, "Wrote entity");
                Ok(())
            }
        }
    }

    /// Runs `f` inside a new transaction and commits it.
    ///
    /// Commit conflicts are retried with exponential backoff up to
    /// [`RetryConfig::max_retries`] times; each attempt gets a fresh
    /// transaction. An error from `f` discards the buffered writes and is
    /// returned as-is.
    ///
    /// # Errors
    ///
    /// [`StorageError::NestedTransaction`] if `ctx` is already in a
    /// transaction, [`StorageError::TransactionAborted`] when retries run out.
    pub fn run_in_transaction<T, E, F>(&self, ctx: &mut RequestContext, mut f: F) -> Result<T, E>
    where
        F: FnMut(&mut RequestContext) -> Result<T, E>,
        E: From<StorageError>,
    {
        if ctx.in_transaction() {
            return Err(StorageError::NestedTransaction.into());
        }

        let attempts = self.retry.attempts();
        for attempt in 0..attempts {
            let prior = ctx.enter_transaction(TransactionHandle::new());
            let outcome = f(ctx);
            let Some(txn) = ctx.leave_transaction(prior) else {
                return Err(StorageError::InvalidState("transaction slot emptied".into()).into());
            };

            let value = match outcome {
                Ok(value) => value,
                Err(e) => {
                    debug!(txn = %txn.id(), "Unit of work failed, rolling back");
                    return Err(e);
                }
            };

            match self.backend.commit(&txn) {
                Ok(()) => {
                    debug!(txn = %txn.id(), attempt, writes = txn.writes().len(), "Committed transaction");
                    return Ok(value);
                }
                Err(e) if e.is_conflict() => {
                    warn!(txn = %txn.id(), attempt, error = %e, "Transaction conflict");
                    if attempt + 1 < attempts {
                        std::thread::sleep(self.retry.delay_for(attempt));
                    }
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(StorageError::TransactionAborted { attempts }.into())
    }
}

impl std::fmt::Debug for DatastoreClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatastoreClient")
            .field("retry", &self.retry)
            .finish_non_exhaustive()
    }
}
