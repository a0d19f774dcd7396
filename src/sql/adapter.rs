//! SQLite-backed adapter owning one database connection.

use super::error::{Result, SqlError};
use super::statement::Statement;
use super::types::{Row, Value};
use rusqlite::{Connection, OpenFlags};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Options applied when opening a database file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OpenOptions {
    /// Open the file with the engine's read-only flag. Writes are rejected by SQLite itself.
    pub readonly: bool,
}

impl OpenOptions {
    /// Read-write options (the default).
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the readonly flag.
    #[must_use]
    pub fn readonly(mut self, readonly: bool) -> Self {
        self.readonly = readonly;
        self
    }
}

/// Minimal SQL access over a single SQLite file.
///
/// The adapter exclusively owns its connection. It is `Send` but not `Sync`:
/// use one adapter per thread or per request.
///
/// # Example
///
/// ```ignore
/// use sqlkv::sql::{SqliteAdapter, Value};
///
/// let db = SqliteAdapter::open("data.db")?;
/// db.execute("CREATE TABLE t (n INTEGER)", &[])?;
/// db.execute("INSERT INTO t VALUES (?1)", &[Value::Integer(1)])?;
/// let rows = db.query_values("SELECT n FROM t", &[])?;
/// ```
pub struct SqliteAdapter {
    conn: Connection,
    path: PathBuf,
    readonly: bool,
}

impl SqliteAdapter {
    /// Opens (or creates) a database file for reading and writing.
    ///
    /// # Errors
    ///
    /// Returns [`SqlError::Open`] if the file cannot be opened or is not a database.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with(path, OpenOptions::default())
    }

    /// Opens a database file with the given options.
    ///
    /// A readonly open never creates the file, so a missing path fails here.
    /// The schema header is read once so corrupt files are rejected at open
    /// time rather than on first query.
    ///
    /// # Errors
    ///
    /// Returns [`SqlError::Open`] if the file cannot be opened or is not a database.
    pub fn open_with<P: AsRef<Path>>(path: P, options: OpenOptions) -> Result<Self> {
        let path = path.as_ref();
        let flags = if options.readonly {
            OpenFlags::SQLITE_OPEN_READ_ONLY
                | OpenFlags::SQLITE_OPEN_URI
                | OpenFlags::SQLITE_OPEN_NO_MUTEX
        } else {
            OpenFlags::default()
        };

        let conn =
            Connection::open_with_flags(path, flags).map_err(|e| SqlError::open(path, e))?;
        conn.query_row("PRAGMA schema_version", [], |row| row.get::<_, i64>(0))
            .map_err(|e| SqlError::open(path, e))?;

        debug!(path = %path.display(), readonly = options.readonly, "Opened database");

        Ok(Self {
            conn,
            path: path.to_path_buf(),
            readonly: options.readonly,
        })
    }

    /// Opens a private in-memory database.
    ///
    /// # Errors
    ///
    /// Returns [`SqlError::Open`] if the in-memory database cannot be created.
    pub fn memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|e| SqlError::open(":memory:", e))?;
        Ok(Self {
            conn,
            path: PathBuf::from(":memory:"),
            readonly: false,
        })
    }

    /// Path this adapter was opened against.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the connection was opened readonly.
    pub fn is_readonly(&self) -> bool {
        self.readonly
    }

    /// Runs one statement that returns no rows (DDL/DML).
    ///
    /// Returns the number of rows affected.
    ///
    /// # Errors
    ///
    /// Returns [`SqlError::Compile`] for malformed SQL, [`SqlError::Constraint`]
    /// on constraint violations and [`SqlError::Execution`] for other runtime failures.
    pub fn execute(&self, sql: &str, params: &[Value]) -> Result<usize> {
        self.prepare(sql)?.execute(params)
    }

    /// Runs several `;`-separated statements without parameters.
    ///
    /// Meant for trusted SQL such as schema definitions.
    ///
    /// # Errors
    ///
    /// Returns an error if any statement in the batch fails.
    pub fn execute_batch(&self, sql: &str) -> Result<()> {
        self.conn.execute_batch(sql).map_err(SqlError::execution)
    }

    /// Compiles `sql` into an independent statement handle.
    ///
    /// # Errors
    ///
    /// Returns [`SqlError::Compile`] if the SQL is malformed.
    pub fn prepare(&self, sql: &str) -> Result<Statement<'_>> {
        self.conn
            .prepare(sql)
            .map(Statement::new)
            .map_err(|e| SqlError::compile(sql, e))
    }

    /// One-shot form of `prepare(sql)?.row(params)`.
    ///
    /// # Errors
    ///
    /// Returns an error if compilation or execution fails.
    pub fn query_row(&self, sql: &str, params: &[Value]) -> Result<Option<Row>> {
        self.prepare(sql)?.row(params)
    }

    /// One-shot form of `prepare(sql)?.rows(params)`.
    ///
    /// # Errors
    ///
    /// Returns an error if compilation or execution fails.
    pub fn query_rows(&self, sql: &str, params: &[Value]) -> Result<Vec<Row>> {
        self.prepare(sql)?.rows(params)
    }

    /// One-shot form of `prepare(sql)?.values(params)`.
    ///
    /// # Errors
    ///
    /// Returns an error if compilation or execution fails.
    pub fn query_values(&self, sql: &str, params: &[Value]) -> Result<Vec<Vec<Value>>> {
        self.prepare(sql)?.values(params)
    }

    /// Runs `body` inside a transaction.
    ///
    /// Commits when `body` returns `Ok`. Rolls back when it returns `Err`
    /// (the error is returned unchanged) or panics. Only one transaction may
    /// be active per connection; starting another from inside `body` fails
    /// with [`SqlError::Transaction`].
    ///
    /// # Errors
    ///
    /// Returns the body's error, or [`SqlError::Transaction`] if the
    /// transaction cannot begin or commit.
    ///
    /// # Example
    ///
    /// ```ignore
    /// db.transaction(|tx| {
    ///     tx.execute("DELETE FROM kv WHERE key = ?1", &["a".into()])?;
    ///     tx.execute("INSERT INTO kv (key, value) VALUES (?1, ?2)", &["b".into(), "2".into()])?;
    ///     Ok::<_, SqlError>(())
    /// })?;
    /// ```
    pub fn transaction<T, E, F>(&self, body: F) -> std::result::Result<T, E>
    where
        F: FnOnce(&Self) -> std::result::Result<T, E>,
        E: From<SqlError>,
    {
        self.conn
            .execute_batch("BEGIN")
            .map_err(SqlError::Transaction)?;
        let guard = TransactionGuard {
            conn: &self.conn,
            active: true,
        };

        let value = body(self)?;
        guard.commit()?;
        Ok(value)
    }

    /// Closes the connection, releasing the file handle.
    ///
    /// # Errors
    ///
    /// Returns [`SqlError::Execution`] if SQLite refuses to close.
    pub fn close(self) -> Result<()> {
        let path = self.path;
        self.conn.close().map_err(|(_, e)| SqlError::Execution(e))?;
        debug!(path = %path.display(), "Closed database");
        Ok(())
    }
}

/// Rolls back the open transaction unless `commit` succeeded.
struct TransactionGuard<'conn> {
    conn: &'conn Connection,
    active: bool,
}

impl TransactionGuard<'_> {
    fn commit(mut self) -> Result<()> {
        self.conn
            .execute_batch("COMMIT")
            .map_err(SqlError::Transaction)?;
        self.active = false;
        Ok(())
    }
}

impl Drop for TransactionGuard<'_> {
    fn drop(&mut self) {
        if self.active
            && let Err(e) = self.conn.execute_batch("ROLLBACK")
        {
            warn!(error = %e, "Failed to roll back transaction");
        }
    }
}
