//! Key-value store and remote query server over an embedded SQLite file.
//!
//! - [`sql`] - minimal adapter: open, execute, prepared statements, transactions
//! - [`kv`] - single-table key-value store with upsert semantics
//! - [`server`] - HTTP endpoint that runs caller-supplied SQL per request
//! - [`commands`] - CLI command implementations

pub mod cli;
pub mod commands;
pub mod config;
pub mod constants;
pub mod env;
pub mod kv;
pub mod logging;
pub mod server;
pub mod sql;
