//! Hierarchical datastore keys.
//!
//! A [`Key`] addresses exactly one entity: a kind, an integer id or a string
//! name, an optional parent key and the [`Partition`] (application and
//! namespace) it lives in.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The application/namespace pair a key belongs to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Partition {
    pub application: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
}

impl Partition {
    /// Creates a partition in the default namespace of `application`.
    pub fn new(application: impl Into<String>) -> Self {
        Self {
            application: application.into(),
            namespace: None,
        }
    }

    /// Returns this partition moved into `namespace`.
    #[must_use]
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }
}

impl fmt::Display for Partition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.namespace {
            Some(ns) => write!(f, "{}/{}", self.application, ns),
            None => write!(f, "{}", self.application),
        }
    }
}

/// The identifying part of a key: a numeric id or a string name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum KeyId {
    Id(i64),
    Name(String),
}

impl KeyId {
    /// Returns the numeric id, if this is one.
    pub fn as_id(&self) -> Option<i64> {
        match self {
            Self::Id(id) => Some(*id),
            Self::Name(_) => None,
        }
    }

    /// Returns the string name, if this is one.
    pub fn as_name(&self) -> Option<&str> {
        match self {
            Self::Id(_) => None,
            Self::Name(name) => Some(name),
        }
    }
}

impl From<i64> for KeyId {
    fn from(id: i64) -> Self {
        Self::Id(id)
    }
}

impl From<&str> for KeyId {
    fn from(name: &str) -> Self {
        Self::Name(name.to_string())
    }
}

impl From<String> for KeyId {
    fn from(name: String) -> Self {
        Self::Name(name)
    }
}

impl fmt::Display for KeyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(id) => write!(f, "{id}"),
            Self::Name(name) => write!(f, "{name:?}"),
        }
    }
}

/// A structured datastore key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Key {
    kind: String,
    id: KeyId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    parent: Option<Box<Key>>,
    #[serde(default)]
    partition: Partition,
}

impl Key {
    /// Creates a root key in the default (empty) partition.
    pub fn new(kind: impl Into<String>, id: impl Into<KeyId>) -> Self {
        Self {
            kind: kind.into(),
            id: id.into(),
            parent: None,
            partition: Partition::default(),
        }
    }

    /// Returns this key placed under `parent`.
    #[must_use]
    pub fn with_parent(mut self, parent: Key) -> Self {
        self.parent = Some(Box::new(parent));
        self
    }

    /// Returns this key placed in `partition`. Only this key is moved; the
    /// parent chain keeps its own partitions.
    #[must_use]
    pub fn in_partition(mut self, partition: Partition) -> Self {
        self.partition = partition;
        self
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn id(&self) -> &KeyId {
        &self.id
    }

    pub fn parent(&self) -> Option<&Key> {
        self.parent.as_deref()
    }

    pub fn partition(&self) -> &Partition {
        &self.partition
    }

    /// Replaces the kind, leaving id, parent and partition untouched.
    pub fn set_kind(&mut self, kind: impl Into<String>) {
        self.kind = kind.into();
    }

    /// Returns the chain of keys from the root ancestor down to this key.
    pub fn path(&self) -> Vec<&Key> {
        let mut chain = Vec::new();
        let mut cursor = Some(self);
        while let Some(key) = cursor {
            chain.push(key);
            cursor = key.parent();
        }
        chain.reverse();
        chain
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, key) in self.path().into_iter().enumerate() {
            if i > 0 {
                f.write_str("/")?;
            }
            write!(f, "{}({})", key.kind, key.id)?;
        }
        Ok(())
    }
}
