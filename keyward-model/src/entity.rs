use crate::Value;
use keyward_types::Key;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// A named bag of properties, optionally addressed by a [`Key`].
///
/// Top-level entities carry a key. Entities nested inside another entity's
/// properties may be keyless.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    key: Option<Key>,
    #[serde(default)]
    properties: BTreeMap<String, Value>,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    exclude_from_indexes: BTreeSet<String>,
}

impl Entity {
    /// Creates an empty entity addressed by `key`.
    pub fn new(key: Key) -> Self {
        Self {
            key: Some(key),
            ..Self::default()
        }
    }

    /// Creates an empty keyless entity, for use as a nested value.
    pub fn embedded() -> Self {
        Self::default()
    }

    pub fn key(&self) -> Option<&Key> {
        self.key.as_ref()
    }

    pub fn set_key(&mut self, key: Option<Key>) {
        self.key = key;
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.properties.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Value> {
        self.properties.get_mut(name)
    }

    /// Sets a property, returning the previous value.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.properties.insert(name.into(), value.into())
    }

    /// Builder form of [`Entity::set`].
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(name, value);
        self
    }

    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.properties.remove(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.properties.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// Iterates properties in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.properties.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&String, &mut Value)> {
        self.properties.iter_mut()
    }

    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.properties.values()
    }

    /// Extract a text property.
    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Value::as_str)
    }

    /// Extract an integer property.
    pub fn get_i64(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(Value::as_i64)
    }

    /// Extract a boolean property.
    pub fn get_bool(&self, name: &str) -> Option<bool> {
        self.get(name).and_then(Value::as_bool)
    }

    pub fn exclude_from_indexes(&self) -> &BTreeSet<String> {
        &self.exclude_from_indexes
    }

    pub fn set_exclude_from_indexes(&mut self, names: BTreeSet<String>) {
        self.exclude_from_indexes = names;
    }

    pub fn is_excluded(&self, name: &str) -> bool {
        self.exclude_from_indexes.contains(name)
    }

    /// Finds the first property the datastore would refuse to index.
    ///
    /// Excluded properties are skipped. Nested entities are checked against
    /// their own exclude sets; the returned path joins names with `.`.
    pub fn find_unindexed(&self) -> Option<String> {
        for (name, value) in &self.properties {
            if self.is_excluded(name) {
                continue;
            }
            match value {
                Value::Entity(inner) => {
                    if let Some(path) = inner.find_unindexed() {
                        return Some(format!("{name}.{path}"));
                    }
                }
                other if other.is_unindexable() => return Some(name.clone()),
                _ => {}
            }
        }
        None
    }

    /// Finds the first property holding a NaN or infinite double, as a
    /// dotted path into nested entities. Exclusion from indexes is irrelevant.
    pub fn find_non_finite(&self) -> Option<String> {
        for (name, value) in &self.properties {
            match value {
                Value::Entity(inner) => {
                    if let Some(path) = inner.find_non_finite() {
                        return Some(format!("{name}.{path}"));
                    }
                }
                other if other.has_non_finite() => return Some(name.clone()),
                _ => {}
            }
        }
        None
    }
}
