//! HTTP endpoint that runs caller-supplied SQL against a fixed database file.
//!
//! Protocol:
//!
//! - Any path, method `POST`; other methods get an empty `404`.
//! - Body: `{"sql": "...", "params": [...], "type": "values" | "object"}`
//!   (`params` defaults to `[]`, `type` to `"values"`).
//! - Success: `200 {"result": [...]}`. Any failure: `500 {"error": "..."}`.
//!
//! Each request opens its own connection and closes it before responding.
//! There is no pooling: concurrent writers are serialized (or rejected) by
//! SQLite's file locking, and a readonly server cannot write at all because
//! the file is opened with the engine's readonly flag. This costs an open per
//! request in exchange for no shared state between requests.

mod error;
mod handler;
mod types;


use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Router;
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::config::ServerConfig;

pub use error::ServerError;
pub use handler::execute_request;
pub use types::{QueryRequest, QueryResponse, QueryResult, ResultShape};

/// Build the router. Every path is served by the same handler.
pub fn router(config: ServerConfig) -> Router {
    Router::new()
        .fallback(handler::handle_query)
        .with_state(Arc::new(config))
}

/// Bind and serve until Ctrl-C.
///
/// # Errors
///
/// Returns an error if the listener cannot bind or the server fails.
pub async fn serve(config: ServerConfig) -> Result<()> {
    let addr = config.addr();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    if !config.database.exists() {
        warn!(
            database = %config.database.display(),
            "Database file does not exist yet"
        );
    }
    info!(
        addr = %listener.local_addr().map_or(addr.clone(), |a| a.to_string()),
        database = %config.database.display(),
        readonly = config.readonly,
        "Query server listening"
    );

    axum::serve(listener, router(config))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Query server failed")?;

    info!("Query server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
}
