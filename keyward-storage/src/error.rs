//! Error types for the storage layer.

use thiserror::Error;

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors that can occur in storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// A key read by the transaction changed before commit.
    #[error("transaction conflict on {0}")]
    Conflict(String),

    /// Commit conflicts persisted past the retry budget.
    #[error("transaction aborted after {attempts} attempt(s)")]
    TransactionAborted { attempts: usize },

    /// A transaction was requested while one is already active.
    #[error("a transaction is already active on this context")]
    NestedTransaction,

    /// The transaction slot did not hold the handle the client installed.
    #[error("invalid transaction state: {0}")]
    InvalidState(String),

    /// An entity property exceeds the index limit and is not excluded.
    #[error("property {property:?} is too large to be indexed")]
    Unindexable { property: String },

    /// A double property is NaN or infinite and cannot be stored.
    #[error("property {property:?} holds a non-finite number")]
    NonFinite { property: String },

    /// Entities must carry a key to be written.
    #[error("entity has no key")]
    MissingKey,

    /// Database error from SQLite.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error (file system).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A store mutex was poisoned by a panicking writer.
    #[error("store lock poisoned: {0}")]
    LockPoisoned(String),
}

impl StorageError {
    /// Returns true for errors that a fresh transaction attempt may resolve.
    #[must_use]
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict(_))
    }
}
