//! Per-request state: the current transaction and the read access log.
//!
//! A [`RequestContext`] is owned by exactly one logical request and passed
//! `&mut` through every datastore call. Nothing in it is shared between
//! requests, so there is no ambient state to leak.

use crate::transaction::TransactionHandle;
use keyward_types::Key;
use std::collections::HashSet;

/// One entry of an access log: a structured key or a raw key string.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum KeyRef {
    Key(Key),
    Raw(String),
}

impl From<Key> for KeyRef {
    fn from(key: Key) -> Self {
        Self::Key(key)
    }
}

impl From<&Key> for KeyRef {
    fn from(key: &Key) -> Self {
        Self::Key(key.clone())
    }
}

impl From<String> for KeyRef {
    fn from(raw: String) -> Self {
        Self::Raw(raw)
    }
}

impl From<&str> for KeyRef {
    fn from(raw: &str) -> Self {
        Self::Raw(raw.to_string())
    }
}

/// The set of keys read during a logical scope.
pub type AccessLog = HashSet<KeyRef>;

/// Request-scoped datastore state.
#[derive(Debug, Default)]
pub struct RequestContext {
    transaction: Option<TransactionHandle>,
    /// `None` means access logging is disabled.
    access_log: Option<AccessLog>,
}

impl RequestContext {
    /// Creates a context with no transaction and logging disabled.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn in_transaction(&self) -> bool {
        self.transaction.is_some()
    }

    pub fn transaction(&self) -> Option<&TransactionHandle> {
        self.transaction.as_ref()
    }

    pub fn transaction_mut(&mut self) -> Option<&mut TransactionHandle> {
        self.transaction.as_mut()
    }

    /// Installs `txn` in the transaction slot, returning the previous value.
    pub(crate) fn enter_transaction(&mut self, txn: TransactionHandle) -> Option<TransactionHandle> {
        self.transaction.replace(txn)
    }

    /// Restores `prior` into the transaction slot, returning the handle that
    /// was active.
    pub(crate) fn leave_transaction(
        &mut self,
        prior: Option<TransactionHandle>,
    ) -> Option<TransactionHandle> {
        std::mem::replace(&mut self.transaction, prior)
    }

    pub fn access_log(&self) -> Option<&AccessLog> {
        self.access_log.as_ref()
    }

    pub fn is_logging(&self) -> bool {
        self.access_log.is_some()
    }

    /// Swaps the access-log slot, returning its previous value.
    pub fn replace_access_log(&mut self, log: Option<AccessLog>) -> Option<AccessLog> {
        std::mem::replace(&mut self.access_log, log)
    }

    /// Records an access if logging is enabled.
    pub fn record_access(&mut self, entry: impl Into<KeyRef>) {
        if let Some(log) = self.access_log.as_mut() {
            log.insert(entry.into());
        }
    }
}
