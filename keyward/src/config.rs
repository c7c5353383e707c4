//! Helper layer configuration.

use crate::error::{HelperError, HelperResult};
use crate::resolver::KeyResolver;
use keyward_storage::{Datastore, DatastoreClient, RetryConfig};
use keyward_types::Partition;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

/// How key normalization treats a namespace the key already carries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NamespacePolicy {
    /// Always install the configured application and namespace.
    #[default]
    Rewrite,
    /// Install the configured application but keep a namespace the key
    /// already has. Keys without one get the configured namespace.
    PreserveForeign,
}

/// Configuration for the helper layer.
///
/// Every field has a default, so a partial JSON document is accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HelperConfig {
    /// Application every normalized key is placed in.
    pub application: String,
    /// Namespace every normalized key is placed in (`None` = default).
    pub namespace: Option<String>,
    pub namespace_policy: NamespacePolicy,
    /// Retry policy for transactions opened by the helpers.
    pub retry: RetryConfig,
}

impl Default for HelperConfig {
    fn default() -> Self {
        Self {
            application: "default".to_string(),
            namespace: None,
            namespace_policy: NamespacePolicy::default(),
            retry: RetryConfig::default(),
        }
    }
}

impl HelperConfig {
    /// Parses a configuration from JSON.
    pub fn from_json_str(json: &str) -> HelperResult<Self> {
        serde_json::from_str(json).map_err(|e| HelperError::Config(format!("invalid config: {e}")))
    }

    /// Reads a JSON configuration file.
    pub fn load(path: impl AsRef<Path>) -> HelperResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| HelperError::Config(format!("failed to read {}: {e}", path.display())))?;
        Self::from_json_str(&json)
    }

    /// The partition normalized keys are placed in.
    pub fn partition(&self) -> Partition {
        Partition {
            application: self.application.clone(),
            namespace: self.namespace.clone(),
        }
    }

    pub fn resolver(&self) -> KeyResolver {
        KeyResolver::from_config(self)
    }

    /// Builds a client over `backend` using this config's retry policy.
    pub fn client(&self, backend: Arc<dyn Datastore>) -> DatastoreClient {
        DatastoreClient::new(backend, self.retry.clone())
    }
}
