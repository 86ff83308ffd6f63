//! Partial-update `SET` clause builder.
//!
//! A "partial update" only touches the fields present in the request body:
//!
//! ```ignore
//! use jobly::{ColumnAliases, sql_for_partial_update};
//! use serde_json::json;
//!
//! let frag = sql_for_partial_update(
//!     &json!({ "firstName": "Aliya", "age": 32 }),
//!     &ColumnAliases::new().alias("firstName", "first_name"),
//! )?;
//! assert_eq!(frag.clause(), r#""first_name"=$1, "age"=$2"#);
//! # Ok::<(), jobly::JoblyError>(())
//! ```

use crate::error::{JoblyError, JoblyResult};
use crate::fragment::SqlFragment;
use crate::value::SqlValue;
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Message of the error raised for an absent or empty update body.
pub const NO_DATA: &str = "No data";

/// Logical field name -> physical column name.
///
/// Fields without an entry map to a column of the same name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnAliases {
    columns: HashMap<String, String>,
}

impl ColumnAliases {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an alias (builder style).
    pub fn alias(mut self, field: impl Into<String>, column: impl Into<String>) -> Self {
        self.columns.insert(field.into(), column.into());
        self
    }

    /// Column for a logical field name.
    pub fn resolve<'a>(&'a self, field: &'a str) -> &'a str {
        self.columns.get(field).map_or(field, String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Aliases for the `companies` table.
    pub fn companies() -> Self {
        Self::new()
            .alias("numEmployees", "num_employees")
            .alias("logoUrl", "logo_url")
    }

    /// Aliases for the `jobs` table.
    pub fn jobs() -> Self {
        Self::new().alias("companyHandle", "company_handle")
    }

    /// Aliases for the `users` table.
    pub fn users() -> Self {
        Self::new()
            .alias("firstName", "first_name")
            .alias("lastName", "last_name")
            .alias("isAdmin", "is_admin")
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ColumnAliases {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            columns: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Double-quote a column name, doubling embedded quotes.
fn quote_column(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 2);
    out.push('"');
    for ch in name.chars() {
        if ch == '"' {
            out.push('"');
        }
        out.push(ch);
    }
    out.push('"');
    out
}

/// Build a `SET` fragment from a JSON request body.
///
/// `changes` must be a non-empty JSON object; `null`, any other JSON type, or
/// `{}` fail with `BadRequest("No data")`. Assignments follow the body's key
/// order and are numbered from `$1`.
pub fn sql_for_partial_update(
    changes: &Value,
    aliases: &ColumnAliases,
) -> JoblyResult<SqlFragment> {
    match changes.as_object() {
        Some(data) => sql_for_update_map(data, aliases),
        None => {
            tracing::debug!(target: "jobly.sql", kind = "update", "rejected non-object update body");
            Err(JoblyError::bad_request(NO_DATA))
        }
    }
}

/// Build a `SET` fragment from an already-extracted field map.
pub fn sql_for_update_map(
    data: &Map<String, Value>,
    aliases: &ColumnAliases,
) -> JoblyResult<SqlFragment> {
    if data.is_empty() {
        tracing::debug!(target: "jobly.sql", kind = "update", "rejected empty update body");
        return Err(JoblyError::bad_request(NO_DATA));
    }

    let mut frag = SqlFragment::assignments();
    for (field, value) in data {
        let column = quote_column(aliases.resolve(field));
        frag.push_bind(&format!("{column}="), SqlValue::from(value));
    }

    tracing::debug!(
        target: "jobly.sql",
        kind = "update",
        param_count = frag.param_count(),
        sql = %frag,
    );
    Ok(frag)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_aliases_resolve_with_identity_fallback() {
        let aliases = ColumnAliases::users();
        assert_eq!(aliases.resolve("firstName"), "first_name");
        assert_eq!(aliases.resolve("email"), "email");
        assert!(ColumnAliases::new().is_empty());
    }

    #[test]
    fn test_aliases_from_iterator() {
        let aliases: ColumnAliases = [("logoUrl", "logo_url")].into_iter().collect();
        assert_eq!(aliases, ColumnAliases::new().alias("logoUrl", "logo_url"));
    }

    #[test]
    fn test_quotes_are_doubled() {
        assert_eq!(quote_column("name"), "\"name\"");
        assert_eq!(quote_column("we\"ird"), "\"we\"\"ird\"");
    }

    #[test]
    fn test_single_field() {
        let frag = sql_for_partial_update(&json!({"title": "New Job"}), &ColumnAliases::jobs())
            .unwrap();
        assert_eq!(frag.clause(), "\"title\"=$1");
        assert_eq!(frag.values(), &[SqlValue::from("New Job")]);
    }

    #[test]
    fn test_null_values_are_kept() {
        let frag = sql_for_partial_update(
            &json!({"title": "New Job", "salary": 10000, "equity": null}),
            &ColumnAliases::jobs(),
        )
        .unwrap();
        assert_eq!(frag.clause(), "\"title\"=$1, \"salary\"=$2, \"equity\"=$3");
        assert_eq!(
            frag.values(),
            &[SqlValue::from("New Job"), SqlValue::Int(10000), SqlValue::Null]
        );
    }

    #[test]
    fn test_company_aliases_apply() {
        let frag = sql_for_partial_update(
            &json!({"numEmployees": 10, "logoUrl": "http://x.png"}),
            &ColumnAliases::companies(),
        )
        .unwrap();
        assert_eq!(frag.clause(), "\"num_employees\"=$1, \"logo_url\"=$2");
    }

    #[test]
    fn test_non_object_bodies_are_no_data() {
        for body in [json!(null), json!([]), json!("x"), json!(3), json!({})] {
            let err = sql_for_partial_update(&body, &ColumnAliases::new()).unwrap_err();
            assert_eq!(err, JoblyError::bad_request(NO_DATA));
            assert_eq!(err.status(), 400);
        }
    }

    #[test]
    fn test_empty_map_is_no_data() {
        let err = sql_for_update_map(&Map::new(), &ColumnAliases::new()).unwrap_err();
        assert_eq!(err.message(), "No data");
    }
}
