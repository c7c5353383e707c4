//! Helpers on top of a keyed entity datastore.
//!
//! - [`KeyResolver`]: canonical keys from structured keys, legacy tokens,
//!   ids and names, with kind checks
//! - [`sanitize`]: exclude oversized properties from indexes, recursively
//! - [`get_or_insert`]: create-if-absent, exactly once under concurrency
//! - [`start_log`] / [`end_log`]: nested scoping of the read access log
//! - [`acquire_success_marker`]: a sentinel proving a transaction committed
//!
//! All state that used to be ambient (current transaction, access log) lives
//! in the caller's [`RequestContext`].
//!
//! # Example
//!
//! ```
//! use keyward::{get_or_insert, HelperConfig, ResolveOptions};
//! use keyward_storage::{MemoryStore, RequestContext};
//! use std::sync::Arc;
//!
//! let config = HelperConfig::default();
//! let client = config.client(Arc::new(MemoryStore::new()));
//! let resolver = config.resolver();
//! let mut ctx = RequestContext::new();
//!
//! let key = resolver.resolve("12345", "Person", &ResolveOptions::default()).unwrap();
//! let person = get_or_insert(&client, &mut ctx, &key, [("name", "Ada")]).unwrap();
//! assert_eq!(person.get_str("name"), Some("Ada"));
//! ```

pub mod access_log;
mod config;
mod error;
pub mod gate;
pub mod marker;
pub mod resolver;
pub mod sanitize;

pub use access_log::{end_log, start_log, with_access_log};
pub use config::{HelperConfig, NamespacePolicy};
pub use error::{HelperError, HelperResult};
pub use gate::{get_or_insert, in_transaction};
pub use marker::{acquire_success_marker, marker_committed, MARKER_CREATED, MARKER_KIND};
pub use resolver::{encode_key, KeyInput, KeyResolver, ResolveOptions};
pub use sanitize::{sanitize, sanitized};
