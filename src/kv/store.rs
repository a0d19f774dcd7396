//! SQLite-backed key-value store.

use super::error::{KvError, Result};
use crate::sql::{Row, SqlError, SqliteAdapter, Value};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

const INIT_SQL: &str = "CREATE TABLE IF NOT EXISTS kv (
  key VARCHAR UNIQUE,
  value VARCHAR
);";

/// A single key-value pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KvEntry {
    pub key: String,
    pub value: String,
}

impl TryFrom<Row> for KvEntry {
    type Error = KvError;

    fn try_from(row: Row) -> Result<Self> {
        let mut values = row.into_values().into_iter();
        match (values.next(), values.next()) {
            (Some(key), Some(value)) => Ok(Self {
                key: text(key)?,
                value: text(value)?,
            }),
            _ => Err(KvError::Corrupt("expected key and value columns".to_string())),
        }
    }
}

/// Key-value store over the single `kv` table of a SQLite file.
///
/// Keys are unique. `set` is an upsert; `delete` is idempotent; `rename`
/// refuses to overwrite an existing key.
///
/// # Example
///
/// ```ignore
/// use sqlkv::kv::KvStore;
///
/// let store = KvStore::open("data/kv.db")?;
/// store.set("greeting", "hello")?;
/// assert_eq!(store.get("greeting")?.as_deref(), Some("hello"));
/// ```
pub struct KvStore {
    db: SqliteAdapter,
}

impl KvStore {
    /// Opens or creates a store at the given path.
    ///
    /// Creates parent directories if needed and ensures the schema exists.
    /// Safe to call repeatedly against the same file.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Parent directory cannot be created
    /// - Database file cannot be opened or created
    /// - Schema creation fails
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)
                .map_err(|e| KvError::io(format!("create {}", parent.display()), e))?;
        }

        Self::from_adapter(SqliteAdapter::open(path)?)
    }

    /// Opens a store backed by a private in-memory database.
    ///
    /// # Errors
    ///
    /// Returns an error if the in-memory database cannot be created.
    pub fn memory() -> Result<Self> {
        Self::from_adapter(SqliteAdapter::memory()?)
    }

    /// Wraps an existing adapter, creating the `kv` table if missing.
    ///
    /// # Errors
    ///
    /// Returns an error if schema creation fails.
    pub fn from_adapter(db: SqliteAdapter) -> Result<Self> {
        db.execute_batch(INIT_SQL)?;
        debug!(path = %db.path().display(), "KV store ready");
        Ok(Self { db })
    }

    /// The underlying adapter, for queries outside the key-value surface.
    pub fn adapter(&self) -> &SqliteAdapter {
        &self.db
    }

    /// Retrieves a value by key. Absent keys return `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying query fails.
    pub fn get(&self, key: &str) -> Result<Option<String>> {
        self.db
            .query_values("SELECT value FROM kv WHERE key = ?1", &[key.into()])?
            .into_iter()
            .next()
            .and_then(|row| row.into_iter().next())
            .map(text)
            .transpose()
    }

    /// Stores a value, overwriting any existing value for the key.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying statement fails.
    pub fn set(&self, key: &str, value: &str) -> Result<()> {
        self.db.execute(
            "INSERT INTO kv (key, value) VALUES (?1, ?2) ON CONFLICT(key) DO UPDATE SET value = ?2",
            &[key.into(), value.into()],
        )?;
        debug!(key, bytes = value.len(), "Set key");
        Ok(())
    }

    /// Deletes a key.
    ///
    /// Returns `Ok(true)` if the key existed, `Ok(false)` otherwise.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying statement fails.
    pub fn delete(&self, key: &str) -> Result<bool> {
        let removed = self
            .db
            .execute("DELETE FROM kv WHERE key = ?1", &[key.into()])?;
        debug!(key, removed = removed > 0, "Deleted key");
        Ok(removed > 0)
    }

    /// Renames `from` to `to`, keeping its value.
    ///
    /// Returns `Ok(false)` if `from` does not exist. If `to` already exists
    /// the statement fails as a whole and both rows stay as they were. Runs
    /// as a single statement, so it composes inside
    /// [`SqliteAdapter::transaction`].
    ///
    /// # Errors
    ///
    /// Returns [`SqlError::Constraint`] (wrapped in [`KvError::Sql`]) when
    /// `to` is taken, or any other statement failure.
    pub fn rename(&self, from: &str, to: &str) -> Result<bool> {
        let renamed = self
            .db
            .execute("UPDATE kv SET key = ?1 WHERE key = ?2", &[to.into(), from.into()])?;
        debug!(from, to, renamed = renamed > 0, "Renamed key");
        Ok(renamed > 0)
    }

    /// Lists all keys in storage order.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying query fails.
    pub fn keys(&self) -> Result<Vec<String>> {
        self.db
            .query_values("SELECT key FROM kv", &[])?
            .into_iter()
            .filter_map(|row| row.into_iter().next())
            .map(text)
            .collect()
    }

    /// Returns a snapshot of every entry in storage order.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying query fails.
    pub fn all(&self) -> Result<Vec<KvEntry>> {
        self.db
            .query_rows("SELECT key, value FROM kv", &[])?
            .into_iter()
            .map(KvEntry::try_from)
            .collect()
    }

    /// Checks whether a key exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying query fails.
    pub fn exists(&self, key: &str) -> Result<bool> {
        Ok(self
            .db
            .query_row("SELECT 1 FROM kv WHERE key = ?1", &[key.into()])?
            .is_some())
    }

    /// Number of stored entries.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying query fails.
    pub fn len(&self) -> Result<usize> {
        match self.db.query_values("SELECT COUNT(*) FROM kv", &[])?.as_slice() {
            [row] => match row.as_slice() {
                [Value::Integer(n)] => Ok(usize::try_from(*n).unwrap_or_default()),
                _ => Err(KvError::Corrupt("COUNT(*) returned a non-integer".to_string())),
            },
            _ => Ok(0),
        }
    }

    /// Whether the store holds no entries.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying query fails.
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    /// Closes the underlying connection.
    ///
    /// # Errors
    ///
    /// Returns an error if SQLite refuses to close.
    pub fn close(self) -> std::result::Result<(), SqlError> {
        self.db.close()
    }
}

/// Keys and values are stored as text; `NULL` reads back as an empty string.
fn text(value: Value) -> Result<String> {
    match value {
        Value::Text(s) => Ok(s),
        Value::Null => Ok(String::new()),
        Value::Integer(i) => Ok(i.to_string()),
        Value::Real(r) => Ok(r.to_string()),
        Value::Boolean(b) => Ok(b.to_string()),
        Value::Blob(b) => String::from_utf8(b)
            .map_err(|_| KvError::Corrupt("value is not valid UTF-8".to_string())),
    }
}
