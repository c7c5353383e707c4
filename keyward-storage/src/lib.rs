//! Datastore client layer for keyward.
//!
//! Provides the Get/Put/RunInTransaction surface the helper layer is written
//! against, plus two backends.
//!
//! # Architecture
//!
//! - [`Datastore`] is the backend seam: versioned lookups, plain writes and
//!   optimistic commits
//! - [`RequestContext`] carries the request's transaction slot and access log
//! - [`DatastoreClient`] implements the read/write rules on top of both and
//!   retries conflicting commits per [`RetryConfig`]
//! - [`MemoryStore`] and [`SqliteStore`] are the concrete backends

mod backend;
mod client;
mod context;
mod error;
mod memory;
mod sqlite;
mod transaction;

pub use backend::{Datastore, Versioned};
pub use client::DatastoreClient;
pub use context::{AccessLog, KeyRef, RequestContext};
pub use error::{StorageError, StorageResult};
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
pub use transaction::{RetryConfig, TransactionHandle};
