//! Error types for the query server.

use crate::sql::SqlError;

/// Everything that can go wrong while serving one request.
///
/// On the wire every variant becomes the same `{"error": "<message>"}`
/// envelope with status 500; the variants only matter for logging and tests.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ServerError {
    /// The request body could not be read.
    #[error("failed to read request body: {0}")]
    Body(String),

    /// The body is not a valid query request.
    #[error("invalid request body: {0}")]
    InvalidRequest(#[from] serde_json::Error),

    /// Opening, compiling or running the statement failed.
    #[error(transparent)]
    Sql(#[from] SqlError),

    /// The blocking worker panicked or was cancelled.
    #[error("query task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}
