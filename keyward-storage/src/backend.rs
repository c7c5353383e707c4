//! The backend seam: what a concrete datastore must provide.

use crate::error::StorageResult;
use crate::transaction::TransactionHandle;
use keyward_model::Entity;
use keyward_types::Key;

/// An entity together with the store version it was read at.
///
/// Versions start at 1 and grow by one on every write of the key; 0 stands
/// for "absent" in transaction read sets.
#[derive(Debug, Clone, PartialEq)]
pub struct Versioned {
    pub entity: Entity,
    pub version: u64,
}

/// A keyed entity store with optimistic transactions.
pub trait Datastore: Send + Sync {
    /// Reads the current state of `key`.
    fn lookup(&self, key: &Key) -> StorageResult<Option<Versioned>>;

    /// Writes `entity` outside any transaction, returning its new version.
    fn write(&self, entity: &Entity) -> StorageResult<u64>;

    /// Validates the transaction's read set against current versions and,
    /// if nothing changed, applies its write set atomically.
    ///
    /// Returns [`StorageError::Conflict`](crate::StorageError::Conflict)
    /// without writing anything when validation fails.
    fn commit(&self, txn: &TransactionHandle) -> StorageResult<()>;
}
