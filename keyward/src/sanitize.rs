//! Making entities safe to index.
//!
//! The datastore refuses to write an indexed property holding a text or byte
//! value of [`MAX_INDEXED_BYTES`](keyward_model::MAX_INDEXED_BYTES) or more.
//! [`sanitize`] recomputes an entity's exclude-from-indexes set so such writes
//! go through.

use keyward_model::{Entity, Value};
use std::collections::BTreeSet;

/// Recomputes `entity`'s exclude-from-indexes set, in place.
///
/// A property is excluded when its value is unindexable, unless the value is
/// a nested entity: every nested entity is sanitized recursively (keeping its
/// own key) and the outer property stays indexed. Arrays are excluded as a
/// whole. Any previous exclude set is replaced, at every nesting level.
/// Idempotent.
pub fn sanitize(entity: &mut Entity) -> &mut Entity {
    let mut excluded = BTreeSet::new();
    for (name, value) in entity.iter_mut() {
        match value {
            Value::Entity(inner) => {
                sanitize(inner);
            }
            other if other.is_unindexable() => {
                excluded.insert(name.clone());
            }
            _ => {}
        }
    }
    entity.set_exclude_from_indexes(excluded);
    entity
}

/// By-value form of [`sanitize`].
#[must_use]
pub fn sanitized(mut entity: Entity) -> Entity {
    sanitize(&mut entity);
    entity
}
