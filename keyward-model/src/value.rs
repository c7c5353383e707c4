use crate::Entity;
use chrono::{DateTime, Utc};
use keyward_types::Key;
use serde::{Deserialize, Serialize};

/// Text and byte values at or above this many bytes cannot be indexed.
pub const MAX_INDEXED_BYTES: usize = 500;

/// Fixed-size property values. None of these ever exceed the index limit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scalar {
    Null,
    Bool(bool),
    Integer(i64),
    Double(f64),
    Timestamp(DateTime<Utc>),
    Key(Key),
}

/// A property value stored on an [`Entity`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Value {
    Scalar(Scalar),
    Text(String),
    Bytes(Vec<u8>),
    Entity(Box<Entity>),
    Array(Vec<Value>),
}

impl Value {
    pub const NULL: Value = Value::Scalar(Scalar::Null);

    /// Returns true if this value, or anything nested inside it, is a text or
    /// byte value of at least [`MAX_INDEXED_BYTES`] bytes.
    pub fn is_unindexable(&self) -> bool {
        match self {
            Self::Scalar(_) => false,
            Self::Text(s) => s.len() >= MAX_INDEXED_BYTES,
            Self::Bytes(b) => b.len() >= MAX_INDEXED_BYTES,
            Self::Entity(e) => e.values().any(Value::is_unindexable),
            Self::Array(items) => items.iter().any(Value::is_unindexable),
        }
    }

    /// Returns true if this value, or anything nested inside it, is a NaN or
    /// infinite double. JSON has no representation for those.
    pub fn has_non_finite(&self) -> bool {
        match self {
            Self::Scalar(Scalar::Double(n)) => !n.is_finite(),
            Self::Scalar(_) | Self::Text(_) | Self::Bytes(_) => false,
            Self::Entity(e) => e.values().any(Value::has_non_finite),
            Self::Array(items) => items.iter().any(Value::has_non_finite),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Scalar(Scalar::Integer(n)) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Scalar(Scalar::Bool(b)) => Some(*b),
            _ => None,
        }
    }

    pub fn as_entity(&self) -> Option<&Entity> {
        match self {
            Self::Entity(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_timestamp(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Scalar(Scalar::Timestamp(ts)) => Some(*ts),
            _ => None,
        }
    }
}

impl From<Scalar> for Value {
    fn from(s: Scalar) -> Self {
        Self::Scalar(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Scalar(Scalar::Bool(b))
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Self::Scalar(Scalar::Integer(n))
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Self::Scalar(Scalar::Double(n))
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(ts: DateTime<Utc>) -> Self {
        Self::Scalar(Scalar::Timestamp(ts))
    }
}

impl From<Key> for Value {
    fn from(key: Key) -> Self {
        Self::Scalar(Scalar::Key(key))
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<Vec<u8>> for Value {
    fn from(b: Vec<u8>) -> Self {
        Self::Bytes(b)
    }
}

impl From<Entity> for Value {
    fn from(e: Entity) -> Self {
        Self::Entity(Box::new(e))
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Self::Array(items)
    }
}
