//! Error taxonomy for the SQL adapter.
//!
//! Every variant keeps the engine's own error as its source and repeats its
//! message in `Display`, so diagnostics survive any number of wrapping layers.

use rusqlite::ErrorCode;
use std::path::PathBuf;

/// Result type for adapter operations.
pub type Result<T> = std::result::Result<T, SqlError>;

/// Errors surfaced by [`SqliteAdapter`](super::SqliteAdapter) and [`Statement`](super::Statement).
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum SqlError {
    /// The database file could not be opened (missing directory, permissions, corrupt file).
    #[error("failed to open database {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// The SQL text failed to compile.
    #[error("{source}")]
    Compile {
        sql: String,
        #[source]
        source: rusqlite::Error,
    },

    /// A statement failed while running (type mismatch, readonly violation, ...).
    #[error("{0}")]
    Execution(#[source] rusqlite::Error),

    /// A uniqueness or other constraint was violated.
    #[error("{0}")]
    Constraint(#[source] rusqlite::Error),

    /// A transaction could not be started or committed, including nesting.
    #[error("transaction error: {0}")]
    Transaction(#[source] rusqlite::Error),
}

impl SqlError {
    /// Create an open error for the given path.
    pub fn open(path: impl Into<PathBuf>, source: rusqlite::Error) -> Self {
        Self::Open {
            path: path.into(),
            source,
        }
    }

    /// Create a compile error for the given SQL text.
    pub fn compile(sql: impl Into<String>, source: rusqlite::Error) -> Self {
        Self::Compile {
            sql: sql.into(),
            source,
        }
    }

    /// Classify a runtime failure as a constraint or generic execution error.
    pub fn execution(source: rusqlite::Error) -> Self {
        if source.sqlite_error_code() == Some(ErrorCode::ConstraintViolation) {
            Self::Constraint(source)
        } else {
            Self::Execution(source)
        }
    }

    /// Returns true for uniqueness/constraint violations.
    pub fn is_constraint(&self) -> bool {
        matches!(self, Self::Constraint(_))
    }

}
