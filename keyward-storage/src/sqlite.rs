//! SQLite backend.
//!
//! One table holds every entity as a JSON body next to its version. The key
//! column is the JSON encoding of the full [`Key`], so keys that differ only
//! in an ancestor's partition stay distinct.

use crate::backend::{Datastore, Versioned};
use crate::error::{StorageError, StorageResult};
use crate::transaction::TransactionHandle;
use keyward_model::Entity;
use keyward_types::Key;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::debug;

/// A [`Datastore`] persisted in a SQLite database.
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    /// Opens (or creates) a store at the given path.
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        let path = path.as_ref();
        let conn = Connection::open(path)?;
        debug!(path = %path.display(), "Opened SQLite store");
        Self::with_connection(conn)
    }

    /// Opens an in-memory store (for testing).
    pub fn open_in_memory() -> StorageResult<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> StorageResult<Self> {
        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS entities (
                key TEXT PRIMARY KEY,
                version INTEGER NOT NULL,
                body TEXT NOT NULL
            );
            ",
        )?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    fn lock(&self) -> StorageResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| StorageError::LockPoisoned(e.to_string()))
    }

    /// Number of stored entities.
    pub fn len(&self) -> StorageResult<usize> {
        let conn = self.lock()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM entities", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    pub fn is_empty(&self) -> StorageResult<bool> {
        Ok(self.len()? == 0)
    }
}

fn key_column(key: &Key) -> StorageResult<String> {
    Ok(serde_json::to_string(key)?)
}

fn current_version(conn: &Connection, key: &str) -> StorageResult<u64> {
    let version: Option<i64> = conn
        .query_row(
            "SELECT version FROM entities WHERE key = ?1",
            params![key],
            |row| row.get(0),
        )
        .optional()?;
    Ok(version.map_or(0, |v| v as u64))
}

fn upsert(conn: &Connection, key: &Key, entity: &Entity) -> StorageResult<u64> {
    // serde_json writes non-finite doubles as `null`, which would not read back.
    if let Some(property) = entity.find_non_finite() {
        return Err(StorageError::NonFinite { property });
    }
    let column = key_column(key)?;
    let version = current_version(conn, &column)? + 1;
    let body = serde_json::to_string(entity)?;
    conn.execute(
        "INSERT OR REPLACE INTO entities (key, version, body) VALUES (?1, ?2, ?3)",
        params![column, version as i64, body],
    )?;
    Ok(version)
}

impl Datastore for SqliteStore {
    fn lookup(&self, key: &Key) -> StorageResult<Option<Versioned>> {
        let conn = self.lock()?;
        let row: Option<(i64, String)> = conn
            .query_row(
                "SELECT version, body FROM entities WHERE key = ?1",
                params![key_column(key)?],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;

        match row {
            Some((version, body)) => Ok(Some(Versioned {
                entity: serde_json::from_str(&body)?,
                version: version as u64,
            })),
            None => Ok(None),
        }
    }

    fn write(&self, entity: &Entity) -> StorageResult<u64> {
        let key = entity.key().ok_or(StorageError::MissingKey)?;
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        let version = upsert(&tx, key, entity)?;
        tx.commit()?;
        Ok(version)
    }

    fn commit(&self, txn: &TransactionHandle) -> StorageResult<()> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        for (key, seen) in txn.reads() {
            if current_version(&tx, &key_column(key)?)? != *seen {
                // Dropping `tx` rolls back.
                return Err(StorageError::Conflict(key.to_string()));
            }
        }
        for (key, entity) in txn.writes() {
            upsert(&tx, key, entity)?;
        }
        tx.commit()?;
        Ok(())
    }
}
