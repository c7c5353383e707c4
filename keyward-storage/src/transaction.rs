//! Transaction handles and retry configuration.

use keyward_model::Entity;
use keyward_types::{Key, TransactionId};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

/// State of one optimistic transaction attempt.
///
/// Reads record the version they observed (0 for an absent key); writes are
/// buffered until commit. The backend validates the read set and applies the
/// write set atomically.
#[derive(Debug, Clone, Default)]
pub struct TransactionHandle {
    id: TransactionId,
    reads: HashMap<Key, u64>,
    writes: BTreeMap<Key, Entity>,
    marker_written: bool,
}

impl TransactionHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn id(&self) -> TransactionId {
        self.id
    }

    /// Versions observed by reads in this transaction.
    pub fn reads(&self) -> &HashMap<Key, u64> {
        &self.reads
    }

    /// Entities buffered for commit, by key.
    pub fn writes(&self) -> &BTreeMap<Key, Entity> {
        &self.writes
    }

    /// Returns the entity this transaction has buffered for `key`.
    pub fn buffered(&self, key: &Key) -> Option<&Entity> {
        self.writes.get(key)
    }

    /// Only the first read of a key is recorded; later reads in the same
    /// transaction must validate against the same version.
    pub(crate) fn record_read(&mut self, key: Key, version: u64) {
        self.reads.entry(key).or_insert(version);
    }

    pub(crate) fn buffer_write(&mut self, key: Key, entity: Entity) {
        self.writes.insert(key, entity);
    }

    /// Whether a success marker was already written in this transaction.
    pub fn marker_written(&self) -> bool {
        self.marker_written
    }

    pub fn set_marker_written(&mut self) {
        self.marker_written = true;
    }
}

/// Configuration for transaction retry behavior.
///
/// Only commit conflicts are retried. Errors returned by the unit of work
/// abort the transaction immediately.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Maximum number of retry attempts (0 = no retries).
    pub max_retries: usize,
    /// Base delay between retries in milliseconds (exponential backoff).
    pub base_delay_ms: u64,
    /// Maximum delay between retries in milliseconds.
    pub max_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay_ms: 10,
            max_delay_ms: 100,
        }
    }
}

impl RetryConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// A config that never retries.
    pub fn no_retry() -> Self {
        Self {
            max_retries: 0,
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_max_retries(mut self, max_retries: usize) -> Self {
        self.max_retries = max_retries;
        self
    }

    #[must_use]
    pub fn with_base_delay_ms(mut self, base_delay_ms: u64) -> Self {
        self.base_delay_ms = base_delay_ms;
        self
    }

    #[must_use]
    pub fn with_max_delay_ms(mut self, max_delay_ms: u64) -> Self {
        self.max_delay_ms = max_delay_ms;
        self
    }

    /// Total attempts including the first one.
    pub fn attempts(&self) -> usize {
        self.max_retries.saturating_add(1)
    }

    /// Delay before retrying after failed attempt number `attempt` (0-based).
    pub fn delay_for(&self, attempt: usize) -> Duration {
        let factor = 1u64.checked_shl(attempt.min(32) as u32).unwrap_or(u64::MAX);
        let delay = self.base_delay_ms.saturating_mul(factor).min(self.max_delay_ms);
        Duration::from_millis(delay)
    }
}
