//! Key resolution.
//!
//! Keys reach the helpers as structured [`Key`]s from trusted code, as legacy
//! tokens from older API surfaces, or as bare ids and names. [`KeyResolver`]
//! turns all of these into one canonical key in the configured partition and
//! enforces the expected kind.

use crate::config::{HelperConfig, NamespacePolicy};
use crate::error::{HelperError, HelperResult};
use keyward_types::{parse_key_token, Key, KeyId, Partition};
use std::collections::BTreeSet;
use tracing::trace;

/// The forms a key can be given in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyInput {
    Key(Key),
    /// A legacy token, or failing that an id (all digits) or a name.
    Text(String),
    Id(i64),
}

impl From<Key> for KeyInput {
    fn from(key: Key) -> Self {
        Self::Key(key)
    }
}

impl From<&Key> for KeyInput {
    fn from(key: &Key) -> Self {
        Self::Key(key.clone())
    }
}

impl From<&str> for KeyInput {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for KeyInput {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<i64> for KeyInput {
    fn from(id: i64) -> Self {
        Self::Id(id)
    }
}

impl TryFrom<&serde_json::Value> for KeyInput {
    type Error = HelperError;

    /// Accepts JSON integers and strings; everything else is unsupported.
    fn try_from(value: &serde_json::Value) -> Result<Self, Self::Error> {
        use serde_json::Value as Json;

        let found = match value {
            Json::String(s) => return Ok(Self::Text(s.clone())),
            Json::Number(n) => match n.as_i64() {
                Some(id) => return Ok(Self::Id(id)),
                None => "non-integer number",
            },
            Json::Null => "null",
            Json::Bool(_) => "bool",
            Json::Array(_) => "array",
            Json::Object(_) => "object",
        };
        Err(HelperError::UnsupportedKeyType {
            found: found.to_string(),
        })
    }
}

/// Kind constraints for [`KeyResolver::resolve`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolveOptions {
    /// Kinds accepted in addition to the target kind.
    pub additional_kinds: BTreeSet<String>,
    /// Rewrite a mismatching kind to the target kind instead of failing.
    pub adjust_kind: bool,
}

impl ResolveOptions {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn allow_kind(mut self, kind: impl Into<String>) -> Self {
        self.additional_kinds.insert(kind.into());
        self
    }

    #[must_use]
    pub fn adjust_kind(mut self) -> Self {
        self.adjust_kind = true;
        self
    }
}

/// Normalizes keys into one partition and checks their kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyResolver {
    partition: Partition,
    policy: NamespacePolicy,
}

impl KeyResolver {
    pub fn new(partition: Partition, policy: NamespacePolicy) -> Self {
        Self { partition, policy }
    }

    pub fn from_config(config: &HelperConfig) -> Self {
        Self::new(config.partition(), config.namespace_policy)
    }

    pub fn partition(&self) -> &Partition {
        &self.partition
    }

    pub fn policy(&self) -> NamespacePolicy {
        self.policy
    }

    fn partition_for(&self, current: &Partition) -> Partition {
        match self.policy {
            NamespacePolicy::Rewrite => self.partition.clone(),
            NamespacePolicy::PreserveForeign => Partition {
                application: self.partition.application.clone(),
                namespace: current
                    .namespace
                    .clone()
                    .or_else(|| self.partition.namespace.clone()),
            },
        }
    }

    /// Rebuilds `key` and its parent chain in the configured partition.
    /// Kinds and ids are left untouched.
    pub fn normalize_key(&self, key: &Key) -> Key {
        let mut normalized =
            Key::new(key.kind(), key.id().clone()).in_partition(self.partition_for(key.partition()));
        if let Some(parent) = key.parent() {
            normalized = normalized.with_parent(self.normalize_key(parent));
        }
        normalized
    }

    /// [`normalize_key`](Self::normalize_key) lifted over `Option`.
    pub fn normalize(&self, key: Option<&Key>) -> Option<Key> {
        key.map(|k| self.normalize_key(k))
    }

    /// Resolves `input` to a canonical key of `target_kind`.
    ///
    /// Structured keys (and decoded tokens) keep their id and parent chain;
    /// their kind must be `target_kind` or one of
    /// [`ResolveOptions::additional_kinds`], unless
    /// [`ResolveOptions::adjust_kind`] is set. Ids and names always produce a
    /// root key of `target_kind`.
    ///
    /// # Errors
    ///
    /// [`HelperError::KindMismatch`] for a disallowed kind,
    /// [`HelperError::InvalidKey`] for an empty string.
    pub fn resolve(
        &self,
        input: impl Into<KeyInput>,
        target_kind: &str,
        options: &ResolveOptions,
    ) -> HelperResult<Key> {
        match input.into() {
            KeyInput::Key(key) => self.check_kind(self.normalize_key(&key), target_kind, options),
            KeyInput::Text(text) => {
                if let Some(decoded) = parse_key_token(&text) {
                    return self.check_kind(self.normalize_key(&decoded), target_kind, options);
                }
                trace!(input = %text, "Not a key token, treating as id or name");
                let id = plain_id(&text)?;
                Ok(self.root_key(target_kind, id))
            }
            KeyInput::Id(id) => Ok(self.root_key(target_kind, KeyId::Id(id))),
        }
    }

    fn root_key(&self, kind: &str, id: KeyId) -> Key {
        Key::new(kind, id).in_partition(self.partition.clone())
    }

    fn check_kind(&self, mut key: Key, target_kind: &str, options: &ResolveOptions) -> HelperResult<Key> {
        if key.kind() == target_kind || options.additional_kinds.contains(key.kind()) {
            return Ok(key);
        }
        if !options.adjust_kind {
            return Err(HelperError::KindMismatch {
                found: key.kind().to_string(),
                expected: target_kind.to_string(),
                allowed: options.additional_kinds.iter().cloned().collect(),
            });
        }
        key.set_kind(target_kind);
        Ok(key)
    }
}

/// Interprets a non-token string: ASCII digits that fit an `i64` are an id,
/// anything else is a name.
///
/// Only `0`-`9` count as digits. Strings of other Unicode decimal digits
/// (`"١٢٣"`, fullwidth `"１２３"`) are names, not ids.
fn plain_id(text: &str) -> HelperResult<KeyId> {
    if text.is_empty() {
        return Err(HelperError::InvalidKey("empty key string".to_string()));
    }
    if text.bytes().all(|b| b.is_ascii_digit()) {
        if let Ok(id) = text.parse::<i64>() {
            return Ok(KeyId::Id(id));
        }
    }
    Ok(KeyId::Name(text.to_string()))
}

/// Returns the legacy string form of `key`.
pub fn encode_key(key: &Key) -> String {
    key.to_legacy_token()
}
