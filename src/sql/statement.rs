//! Prepared statement handle.

use super::error::{Result, SqlError};
use super::types::{Row, Value};
use rusqlite::params_from_iter;

/// A compiled SQL statement bound to one [`SqliteAdapter`](super::SqliteAdapter).
///
/// Each accessor binds a fresh parameter list and re-runs the statement, so
/// results always reflect the most recent parameters. Parameters bind
/// positionally to `?`/`?N` placeholders.
///
/// The handle borrows its adapter; it cannot outlive the connection.
pub struct Statement<'conn> {
    inner: rusqlite::Statement<'conn>,
    columns: Vec<String>,
}

impl<'conn> Statement<'conn> {
    pub(super) fn new(inner: rusqlite::Statement<'conn>) -> Self {
        let columns = inner
            .column_names()
            .into_iter()
            .map(str::to_string)
            .collect();
        Self { inner, columns }
    }

    /// Result column names in order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Runs the statement and returns the first row, if any.
    ///
    /// # Errors
    ///
    /// Returns [`SqlError::Execution`] or [`SqlError::Constraint`] if binding or stepping fails.
    pub fn row(&mut self, params: &[Value]) -> Result<Option<Row>> {
        let columns = self.columns.clone();
        let mut first = None;
        self.for_each(params, |values| {
            first = Some(Row::new(columns.clone(), values));
            false
        })?;
        Ok(first)
    }

    /// Runs the statement and returns every row as a field-name keyed record.
    ///
    /// # Errors
    ///
    /// Returns [`SqlError::Execution`] or [`SqlError::Constraint`] if binding or stepping fails.
    pub fn rows(&mut self, params: &[Value]) -> Result<Vec<Row>> {
        let columns = self.columns.clone();
        let mut rows = Vec::new();
        self.for_each(params, |values| {
            rows.push(Row::new(columns.clone(), values));
            true
        })?;
        Ok(rows)
    }

    /// Runs the statement and returns every row as positional values.
    ///
    /// # Errors
    ///
    /// Returns [`SqlError::Execution`] or [`SqlError::Constraint`] if binding or stepping fails.
    pub fn values(&mut self, params: &[Value]) -> Result<Vec<Vec<Value>>> {
        let mut rows = Vec::new();
        self.for_each(params, |values| {
            rows.push(values);
            true
        })?;
        Ok(rows)
    }

    /// Runs a statement that returns no rows, yielding the affected row count.
    ///
    /// # Errors
    ///
    /// Returns [`SqlError::Execution`] or [`SqlError::Constraint`] if the statement fails.
    pub fn execute(&mut self, params: &[Value]) -> Result<usize> {
        self.inner
            .execute(params_from_iter(params))
            .map_err(SqlError::execution)
    }

    /// Steps through the result set, handing each row's values to `f` until it returns false.
    fn for_each<F>(&mut self, params: &[Value], mut f: F) -> Result<()>
    where
        F: FnMut(Vec<Value>) -> bool,
    {
        let width = self.columns.len();
        let mut rows = self
            .inner
            .query(params_from_iter(params))
            .map_err(SqlError::execution)?;

        while let Some(row) = rows.next().map_err(SqlError::execution)? {
            let values = (0..width)
                .map(|idx| row.get_ref(idx).map(Value::from))
                .collect::<rusqlite::Result<Vec<_>>>()
                .map_err(SqlError::execution)?;
            if !f(values) {
                break;
            }
        }
        Ok(())
    }
}
