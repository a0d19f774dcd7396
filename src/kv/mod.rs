//! Key-value store on top of the SQL adapter.
//!
//! A single table `kv(key UNIQUE, value)` holds every entry. The schema is
//! created on first open and the call is idempotent across repeated opens.
//!
//! # Example
//!
//! ```ignore
//! use sqlkv::kv::KvStore;
//!
//! let store = KvStore::open("kv.db")?;
//! store.set("a", "1")?;
//! store.rename("a", "b")?;
//! for entry in store.all()? {
//!     println!("{} = {}", entry.key, entry.value);
//! }
//! ```

mod error;
mod store;
mod transfer;

#[cfg(test)]
mod tests;

// Re-export the public API
pub use error::{KvError, Result};
pub use store::{KvEntry, KvStore};
pub use transfer::{export_dir, import_dir};
