//! Error types for the helper layer.

use keyward_storage::StorageError;
use thiserror::Error;

/// Result type for helper operations.
pub type HelperResult<T> = Result<T, HelperError>;

/// Errors surfaced by key resolution, idempotent writes and markers.
#[derive(Debug, Error)]
pub enum HelperError {
    /// A resolved key's kind is not the expected one.
    #[error("kind mismatch: {found:?} != {expected:?} (or in {allowed:?})")]
    KindMismatch {
        found: String,
        expected: String,
        allowed: Vec<String>,
    },

    /// The input cannot be interpreted as a key.
    #[error("unsupported key type: {found}")]
    UnsupportedKeyType { found: String },

    /// The input has a supported type but no usable value.
    #[error("invalid key: {0}")]
    InvalidKey(String),

    /// Commit conflicts outlasted the client's retry budget.
    #[error("transaction aborted after {attempts} attempt(s)")]
    TransactionAborted { attempts: usize },

    /// An operation that requires an active transaction ran outside one.
    #[error("no transaction is active")]
    NotInTransaction,

    /// Any other storage failure.
    #[error("storage error: {0}")]
    Storage(#[source] StorageError),

    /// Configuration could not be read.
    #[error("configuration error: {0}")]
    Config(String),
}

impl From<StorageError> for HelperError {
    fn from(e: StorageError) -> Self {
        match e {
            StorageError::TransactionAborted { attempts } => Self::TransactionAborted { attempts },
            other => Self::Storage(other),
        }
    }
}
