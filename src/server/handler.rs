//! Per-request query execution.
//!
//! Every request walks `received -> parsed -> executing -> responded`:
//! the method is checked first, then the body is parsed, then a fresh
//! connection is opened, one statement runs, and the connection is closed
//! before the response is written. Nothing survives between requests.

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use axum::{
    Json,
    body::Body,
    extract::{Request, State},
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
};
use tracing::{debug, warn};

use super::error::ServerError;
use super::types::{QueryRequest, QueryResponse, QueryResult, ResultShape};
use crate::config::ServerConfig;
use crate::sql::{OpenOptions, SqliteAdapter};

/// Parses `body` and runs it against a connection opened just for this call.
///
/// The connection is closed on both the success and the failure path.
///
/// # Errors
///
/// Returns [`ServerError::InvalidRequest`] for a malformed body and
/// [`ServerError::Sql`] for open, compile or execution failures.
pub fn execute_request(
    database: &Path,
    readonly: bool,
    body: &[u8],
) -> Result<QueryResult, ServerError> {
    let request: QueryRequest = serde_json::from_slice(body)?;
    let db = SqliteAdapter::open_with(database, OpenOptions::new().readonly(readonly))?;

    let result = run_query(&db, &request);
    match (result, db.close()) {
        (Ok(result), Ok(())) => Ok(result),
        (Err(e), closed) => {
            if let Err(close_err) = closed {
                warn!(error = %close_err, "Failed to close database after query error");
            }
            Err(e)
        },
        (Ok(_), Err(e)) => Err(e.into()),
    }
}

fn run_query(db: &SqliteAdapter, request: &QueryRequest) -> Result<QueryResult, ServerError> {
    let mut stmt = db.prepare(&request.sql)?;
    let result = match request.shape {
        ResultShape::Values => QueryResult::Values(stmt.values(&request.params)?),
        ResultShape::Object => QueryResult::Rows(stmt.rows(&request.params)?),
    };
    Ok(result)
}

/// Fallback handler for every path: `POST` runs a query, anything else is 404.
pub(crate) async fn handle_query(
    State(config): State<Arc<ServerConfig>>,
    request: Request,
) -> Response {
    if *request.method() != Method::POST {
        debug!(method = %request.method(), "Rejected non-POST request");
        return StatusCode::NOT_FOUND.into_response();
    }

    let started = Instant::now();
    match run(config, request.into_body()).await {
        Ok(result) => {
            debug!(
                rows = result.len(),
                elapsed_ms = started.elapsed().as_millis(),
                "Query succeeded"
            );
            Json(QueryResponse::Result(result)).into_response()
        },
        Err(e) => {
            warn!(error = %e, elapsed_ms = started.elapsed().as_millis(), "Query failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(QueryResponse::Error(e.to_string())),
            )
                .into_response()
        },
    }
}

async fn run(config: Arc<ServerConfig>, body: Body) -> Result<QueryResult, ServerError> {
    let body = axum::body::to_bytes(body, config.max_body_bytes)
        .await
        .map_err(|e| ServerError::Body(e.to_string()))?;

    tokio::task::spawn_blocking(move || {
        execute_request(&config.database, config.readonly, &body)
    })
    .await?
}
