//! Legacy string tokens for keys.
//!
//! Older API surfaces hand keys around as opaque URL-safe strings. A token is
//! `base64url(json)` without padding, where the JSON document is:
//!
//! ```json
//! {"app": "my-app", "ns": null, "path": [["Person", 12], ["Address", "home"]]}
//! ```
//!
//! The path is ordered root-first. The partition in the token applies to every
//! key in the path.

use crate::key::{Key, KeyId, Partition};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors produced while decoding a legacy token.
#[derive(Debug, Error)]
pub enum TokenError {
    #[error("token is not url-safe base64: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("token payload is not a key document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("token has an empty key path")]
    EmptyPath,

    #[error("token contains an empty kind")]
    EmptyKind,
}

#[derive(Serialize, Deserialize)]
struct TokenBody {
    app: String,
    #[serde(default)]
    ns: Option<String>,
    path: Vec<(String, KeyId)>,
}

impl Key {
    /// Encodes this key as a legacy token, using the partition of this key
    /// for the whole path.
    ///
    /// The format carries a single partition, so ancestors in a different
    /// partition than the leaf are encoded in the leaf's partition and do not
    /// round-trip. Keys normalized by a resolver always share one partition.
    pub fn to_legacy_token(&self) -> String {
        let body = TokenBody {
            app: self.partition().application.clone(),
            ns: self.partition().namespace.clone(),
            path: self
                .path()
                .into_iter()
                .map(|k| (k.kind().to_string(), k.id().clone()))
                .collect(),
        };
        // Serializing a struct of strings and integers cannot fail.
        let json = serde_json::to_vec(&body).unwrap_or_default();
        URL_SAFE_NO_PAD.encode(json)
    }

    /// Decodes a legacy token.
    ///
    /// # Errors
    ///
    /// Returns an error if the token is not base64, does not hold a key
    /// document, or describes an empty path or kind.
    pub fn from_legacy_token(token: &str) -> Result<Key, TokenError> {
        let bytes = URL_SAFE_NO_PAD.decode(token.trim())?;
        let body: TokenBody = serde_json::from_slice(&bytes)?;
        let partition = Partition {
            application: body.app,
            namespace: body.ns,
        };

        let mut key: Option<Key> = None;
        for (kind, id) in body.path {
            if kind.is_empty() {
                return Err(TokenError::EmptyKind);
            }
            let mut next = Key::new(kind, id).in_partition(partition.clone());
            if let Some(parent) = key.take() {
                next = next.with_parent(parent);
            }
            key = Some(next);
        }
        key.ok_or(TokenError::EmptyPath)
    }
}

/// Attempts to read `token` as a legacy key token.
///
/// Returns `None` for anything that is not a well-formed token, so callers can
/// decide how to treat plain ids and names.
pub fn parse_key_token(token: &str) -> Option<Key> {
    Key::from_legacy_token(token).ok()
}
