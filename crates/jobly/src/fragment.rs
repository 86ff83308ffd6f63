//! SQL fragments: a clause plus its positionally-aligned bind values.

use crate::value::SqlValue;
use std::fmt;
use tokio_postgres::types::ToSql;

/// A snippet of SQL meant for splicing into a larger statement.
///
/// Holds an ordered list of assignment or predicate strings (joined with the
/// fragment's separator when rendered) and the bind values they reference.
/// Placeholders are numbered `$1, $2, ...` in the order values are pushed, so
/// `values()[i]` always binds to `$(i + 1)`.
#[derive(Debug, Clone, PartialEq)]
pub struct SqlFragment {
    parts: Vec<String>,
    values: Vec<SqlValue>,
    separator: &'static str,
}

impl SqlFragment {
    /// Fragment for a `SET` list (`a=$1, b=$2`).
    pub fn assignments() -> Self {
        Self::with_separator(", ")
    }

    /// Fragment for a `WHERE` conjunction (`a>=$1 AND b ILIKE $2`).
    pub fn predicates() -> Self {
        Self::with_separator(" AND ")
    }

    fn with_separator(separator: &'static str) -> Self {
        Self {
            parts: Vec::new(),
            values: Vec::new(),
            separator,
        }
    }

    /// Append `sql_prefix` followed by the next placeholder, binding `value`.
    ///
    /// `push_bind("salary>=", 5000)` appends `salary>=$n`.
    pub fn push_bind(&mut self, sql_prefix: &str, value: impl Into<SqlValue>) -> &mut Self {
        let placeholder = self.next_placeholder();
        self.parts.push(format!("{sql_prefix}${placeholder}"));
        self.values.push(value.into());
        self
    }

    /// Append a part that binds no value.
    pub fn push_raw(&mut self, sql: impl Into<String>) -> &mut Self {
        self.parts.push(sql.into());
        self
    }

    /// The rendered clause, parts joined by the separator.
    pub fn clause(&self) -> String {
        self.parts.join(self.separator)
    }

    /// The individual parts, in order.
    pub fn parts(&self) -> &[String] {
        &self.parts
    }

    /// Bind values, index-aligned to placeholders.
    pub fn values(&self) -> &[SqlValue] {
        &self.values
    }

    /// Consume the fragment into its rendered clause and values.
    pub fn into_parts(self) -> (String, Vec<SqlValue>) {
        (self.clause(), self.values)
    }

    /// Number of parts (assignments or predicates).
    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Number of bound parameters.
    pub fn param_count(&self) -> usize {
        self.values.len()
    }

    /// Index of the next placeholder a caller may append after this fragment.
    pub fn next_placeholder(&self) -> usize {
        self.values.len() + 1
    }

    /// Parameter references for tokio-postgres.
    pub fn params_ref(&self) -> Vec<&(dyn ToSql + Sync)> {
        self.values
            .iter()
            .map(|v| v as &(dyn ToSql + Sync))
            .collect()
    }
}

impl fmt::Display for SqlFragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.clause())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assignments_join_with_comma() {
        let mut frag = SqlFragment::assignments();
        frag.push_bind("\"first_name\"=", "Test")
            .push_bind("\"email\"=", "a@b.com");
        assert_eq!(frag.clause(), "\"first_name\"=$1, \"email\"=$2");
        assert_eq!(frag.values(), &[SqlValue::from("Test"), SqlValue::from("a@b.com")]);
    }

    #[test]
    fn test_raw_parts_do_not_consume_placeholders() {
        let mut frag = SqlFragment::predicates();
        frag.push_bind("title ILIKE ", "%j%")
            .push_raw("equity > 0")
            .push_bind("salary>=", 5000);
        assert_eq!(frag.clause(), "title ILIKE $1 AND equity > 0 AND salary>=$2");
        assert_eq!(frag.len(), 3);
        assert_eq!(frag.param_count(), 2);
        assert_eq!(frag.next_placeholder(), 3);
        assert_eq!(frag.params_ref().len(), 2);
    }

    #[test]
    fn test_empty_fragment() {
        let frag = SqlFragment::predicates();
        assert!(frag.is_empty());
        assert_eq!(frag.clause(), "");
        assert_eq!(frag.next_placeholder(), 1);
    }

    #[test]
    fn test_display_matches_clause() {
        let mut frag = SqlFragment::predicates();
        frag.push_bind("name ILIKE ", "%c%");
        assert_eq!(frag.to_string(), "name ILIKE $1");
        let (clause, values) = frag.into_parts();
        assert_eq!(clause, "name ILIKE $1");
        assert_eq!(values, vec![SqlValue::from("%c%")]);
    }
}
