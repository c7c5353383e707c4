//! Entity model for keyward.
//!
//! Defines the value types every write path depends on:
//! - [`Entity`]: a keyed (or embedded) bag of named properties plus its
//!   exclude-from-indexes set
//! - [`Value`]: a property value, one of a [`Scalar`], text, bytes, a nested entity
//!   or an array of values
//!
//! [`Value::is_unindexable`] encodes the datastore's index size limit
//! ([`MAX_INDEXED_BYTES`]).

mod entity;
mod value;

pub use entity::Entity;
pub use value::{Scalar, Value, MAX_INDEXED_BYTES};
