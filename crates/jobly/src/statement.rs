//! Splice fragments into complete parameterized statements.
//!
//! Table, column and `RETURNING` lists are caller-supplied SQL and are
//! concatenated verbatim; only fragment values are bound.

use crate::error::{JoblyError, JoblyResult};
use crate::fragment::SqlFragment;
use crate::update::NO_DATA;
use crate::value::SqlValue;
use std::fmt;
use tokio_postgres::types::ToSql;

/// A full SQL statement with its bind values.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    sql: String,
    params: Vec<SqlValue>,
}

impl Statement {
    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn params(&self) -> &[SqlValue] {
        &self.params
    }

    /// Parameter references for tokio-postgres.
    pub fn params_ref(&self) -> Vec<&(dyn ToSql + Sync)> {
        self.params
            .iter()
            .map(|v| v as &(dyn ToSql + Sync))
            .collect()
    }

    pub fn into_parts(self) -> (String, Vec<SqlValue>) {
        (self.sql, self.params)
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.sql)
    }
}

/// `UPDATE <table> SET <set> WHERE <key_column> = $k RETURNING <returning>`.
///
/// The key binds to the placeholder after the last `SET` value. An empty
/// `set` fails with `BadRequest("No data")`.
pub fn update_returning(
    table: &str,
    set: SqlFragment,
    key_column: &str,
    key: impl Into<SqlValue>,
    returning: &str,
) -> JoblyResult<Statement> {
    if set.is_empty() {
        return Err(JoblyError::bad_request(NO_DATA));
    }

    let key_idx = set.next_placeholder();
    let (set_clause, mut params) = set.into_parts();
    params.push(key.into());

    let mut sql = format!("UPDATE {table} SET {set_clause} WHERE {key_column} = ${key_idx}");
    if !returning.is_empty() {
        sql.push_str(" RETURNING ");
        sql.push_str(returning);
    }

    tracing::debug!(target: "jobly.sql", kind = "update", param_count = params.len(), sql = %sql);
    Ok(Statement { sql, params })
}

/// `SELECT <columns> FROM <table> [WHERE <filter>] [ORDER BY <order_by>]`.
///
/// `None` or an empty filter selects every row.
pub fn select_where(
    table: &str,
    columns: &str,
    filter: Option<SqlFragment>,
    order_by: &str,
) -> Statement {
    let mut sql = format!("SELECT {columns} FROM {table}");
    let mut params = Vec::new();

    if let Some(filter) = filter.filter(|f| !f.is_empty()) {
        let (where_clause, values) = filter.into_parts();
        sql.push_str(" WHERE ");
        sql.push_str(&where_clause);
        params = values;
    }

    if !order_by.is_empty() {
        sql.push_str(" ORDER BY ");
        sql.push_str(order_by);
    }

    tracing::debug!(target: "jobly.sql", kind = "select", param_count = params.len(), sql = %sql);
    Statement { sql, params }
}

/// Map a zero-row result to `NotFound("No <entity>: <key>")`.
pub fn found_or_not_found<T>(row: Option<T>, entity: &str, key: impl fmt::Display) -> JoblyResult<T> {
    row.ok_or_else(|| JoblyError::not_found(format!("No {entity}: {key}")))
}
