//! Minimal SQL access layer over an embedded SQLite file.
//!
//! # Example
//!
//! ```ignore
//! use sqlkv::sql::{OpenOptions, SqliteAdapter, Value};
//!
//! let db = SqliteAdapter::open("data.db")?;
//! db.execute("CREATE TABLE IF NOT EXISTS users (id INTEGER PRIMARY KEY, name TEXT)", &[])?;
//! db.execute("INSERT INTO users (name) VALUES (?1)", &[Value::Text("Alice".into())])?;
//!
//! // Reusable statement handle
//! let mut stmt = db.prepare("SELECT id, name FROM users WHERE id = ?1")?;
//! let row = stmt.row(&[Value::Integer(1)])?;
//!
//! // Readonly handle: writes are rejected by the engine
//! let ro = SqliteAdapter::open_with("data.db", OpenOptions::new().readonly(true))?;
//! assert!(ro.execute("DELETE FROM users", &[]).is_err());
//! ```

mod adapter;
mod error;
mod statement;
mod types;


// Re-export the public API
pub use adapter::{OpenOptions, SqliteAdapter};
pub use error::{Result, SqlError};
pub use statement::Statement;
pub use types::{Row, Value};
