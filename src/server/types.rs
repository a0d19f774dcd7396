//! Wire types for the query server.

use crate::sql::{Row, Value};
use serde::{Deserialize, Serialize};

/// Result encoding requested by the client.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultShape {
    /// Positional rows: `[[v1, v2], ...]`
    #[default]
    Values,
    /// Field-name keyed rows: `[{"col": v1}, ...]`
    Object,
}

/// Request body: `{"sql": "...", "params": [...], "type": "values" | "object"}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryRequest {
    pub sql: String,
    #[serde(default)]
    pub params: Vec<Value>,
    #[serde(default, rename = "type")]
    pub shape: ResultShape,
}

impl QueryRequest {
    pub fn new(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            params: Vec::new(),
            shape: ResultShape::default(),
        }
    }

    #[must_use]
    pub fn with_params(mut self, params: Vec<Value>) -> Self {
        self.params = params;
        self
    }

    #[must_use]
    pub fn with_shape(mut self, shape: ResultShape) -> Self {
        self.shape = shape;
        self
    }
}

/// Rows in the encoding selected by [`ResultShape`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum QueryResult {
    Values(Vec<Vec<Value>>),
    Rows(Vec<Row>),
}

impl QueryResult {
    /// Number of rows returned.
    pub fn len(&self) -> usize {
        match self {
            Self::Values(rows) => rows.len(),
            Self::Rows(rows) => rows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Response envelope: `{"result": ...}` or `{"error": "..."}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryResponse {
    Result(QueryResult),
    Error(String),
}
