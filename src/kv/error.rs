//! Error types for the key-value store.

use crate::sql::SqlError;

/// Result type for key-value operations.
pub type Result<T> = std::result::Result<T, KvError>;

/// Errors surfaced by [`KvStore`](super::KvStore) and the directory transfer helpers.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum KvError {
    /// Adapter failure, passed through unchanged.
    #[error(transparent)]
    Sql(#[from] SqlError),

    /// IO error with context.
    #[error("IO error in {context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    /// A key that cannot be used as a file name during export.
    #[error("key '{0}' is not a valid file name")]
    UnsafeKey(String),

    /// A row that does not look like a key-value pair.
    #[error("unexpected kv row: {0}")]
    Corrupt(String),
}

impl KvError {
    /// Create an IO error with context.
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Returns true when the failure is a uniqueness violation.
    pub fn is_constraint(&self) -> bool {
        matches!(self, Self::Sql(e) if e.is_constraint())
    }
}
