//! Shared defaults.

/// Default key-value database file for local commands.
pub const DEFAULT_KV_PATH: &str = "kv.db";

/// Default output directory for `export`.
pub const DEFAULT_EXPORT_DIR: &str = "kv-data";

/// Default query server listen host.
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default query server port.
pub const DEFAULT_PORT: u16 = 3601;

/// Default request body limit for the query server (16 MiB).
pub const DEFAULT_MAX_BODY_BYTES: usize = 16 * 1024 * 1024;
