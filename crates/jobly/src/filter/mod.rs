//! Partial-filter `WHERE` clause builder.
//!
//! Search endpoints accept any subset of a fixed set of filters. Each endpoint
//! is described by a [`FilterSet`]: a table of [`FilterField`]s saying which
//! predicate a filter emits and how its raw value is transformed. One engine
//! evaluates every table:
//!
//! - falsy values (`""`, `0`, `null`, `false`) drop the filter silently
//! - value-bearing predicates get the next placeholder, in input order
//! - flag predicates (`hasEquity`) bind nothing and do not consume a placeholder
//! - strict sets reject unknown keys and require at least one usable filter
//!
//! The input map is never modified.

pub mod fields;

use crate::error::{JoblyError, JoblyResult};
use crate::fragment::SqlFragment;
use crate::value::SqlValue;
use serde_json::{Map, Value};

/// How a filter's raw value becomes its bind value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transform {
    /// Bind as given.
    Identity,
    /// Wrap in `%...%` for a substring `ILIKE`.
    Contains,
    /// Coerce to a number; non-numeric input is a bad request.
    Number,
}

/// SQL emitted by a filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Predicate {
    /// `sql_prefix` followed by the next placeholder (`salary>=$2`).
    Bind(&'static str),
    /// Fixed predicate chosen by a `"true"` / `"false"` value. Binds nothing;
    /// any other value drops the filter.
    Flag {
        when_true: &'static str,
        when_false: &'static str,
    },
}

/// One recognized filter name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterField {
    pub name: &'static str,
    pub predicate: Predicate,
    pub transform: Transform,
}

impl FilterField {
    pub const fn bind(name: &'static str, sql_prefix: &'static str, transform: Transform) -> Self {
        Self {
            name,
            predicate: Predicate::Bind(sql_prefix),
            transform,
        }
    }

    pub const fn flag(name: &'static str, when_true: &'static str, when_false: &'static str) -> Self {
        Self {
            name,
            predicate: Predicate::Flag {
                when_true,
                when_false,
            },
            transform: Transform::Identity,
        }
    }

    /// Whether this filter binds a value.
    pub fn requires_value(&self) -> bool {
        matches!(self.predicate, Predicate::Bind(_))
    }

    /// Whitespace-only text counts as an absent number.
    fn is_blank_number(&self, raw: &SqlValue) -> bool {
        self.transform == Transform::Number && raw.as_str().is_some_and(|s| s.trim().is_empty())
    }

    /// Evaluate against a raw value. `Ok(None)` means the filter is dropped.
    fn evaluate(&self, raw: &SqlValue) -> JoblyResult<Option<Clause>> {
        match self.predicate {
            Predicate::Flag {
                when_true,
                when_false,
            } => Ok(flag_value(raw).map(|on| Clause::Raw(if on { when_true } else { when_false }))),
            Predicate::Bind(prefix) => {
                if !raw.is_truthy() || self.is_blank_number(raw) {
                    return Ok(None);
                }
                let value = match self.transform {
                    Transform::Identity => raw.clone(),
                    Transform::Contains => SqlValue::Text(format!("%{}%", as_text(raw))),
                    Transform::Number => raw.to_number().ok_or_else(|| {
                        JoblyError::bad_request(format!("{} must be a number", self.name))
                    })?,
                };
                Ok(Some(Clause::Bind(prefix, value)))
            }
        }
    }
}

/// A predicate that survived evaluation, before placeholder numbering.
enum Clause {
    Bind(&'static str, SqlValue),
    Raw(&'static str),
}

fn flag_value(raw: &SqlValue) -> Option<bool> {
    match raw {
        SqlValue::Bool(b) => Some(*b),
        SqlValue::Text(s) if s == "true" => Some(true),
        SqlValue::Text(s) if s == "false" => Some(false),
        _ => None,
    }
}

fn as_text(raw: &SqlValue) -> String {
    match raw {
        SqlValue::Text(s) => s.clone(),
        SqlValue::Int(i) => i.to_string(),
        SqlValue::Float(f) => f.to_string(),
        SqlValue::Bool(b) => b.to_string(),
        SqlValue::Null => String::new(),
    }
}

/// The filters accepted by one search endpoint.
#[derive(Debug, Clone, Copy)]
pub struct FilterSet {
    fields: &'static [FilterField],
    strict: bool,
}

impl FilterSet {
    /// Build a set over a field table.
    ///
    /// Strict sets reject unrecognized keys and require at least one usable
    /// filter; lenient sets ignore both conditions.
    pub const fn new(fields: &'static [FilterField], strict: bool) -> Self {
        Self { fields, strict }
    }

    /// `nameLike`, `minEmployees`, `maxEmployees`; lenient.
    pub const fn generic() -> Self {
        Self::new(fields::GENERIC, false)
    }

    /// `minEmployees`, `maxEmployees`, `nameLike`; strict.
    pub const fn company() -> Self {
        Self::new(fields::COMPANY, true)
    }

    /// `title`, `minSalary`, `hasEquity`; strict.
    pub const fn job() -> Self {
        Self::new(fields::JOB, true)
    }

    pub fn fields(&self) -> &'static [FilterField] {
        self.fields
    }

    /// Look up a recognized filter by name.
    pub fn field(&self, name: &str) -> Option<&'static FilterField> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Recognized names, comma separated, as shown in error messages.
    pub fn allowed(&self) -> String {
        self.fields
            .iter()
            .map(|f| f.name)
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Build the `WHERE` fragment for `filters`.
    pub fn build(&self, filters: &Map<String, Value>) -> JoblyResult<SqlFragment> {
        if self.strict {
            if let Some(key) = filters.keys().find(|k| self.field(k).is_none()) {
                tracing::debug!(target: "jobly.sql", kind = "filter", key = %key, "unrecognized filter");
                return Err(JoblyError::bad_request(format!(
                    "Filter does not match allowed methods: {}",
                    self.allowed()
                )));
            }
        }

        let mut clauses = Vec::new();
        for (key, raw) in filters {
            let Some(field) = self.field(key) else {
                continue;
            };
            if let Some(clause) = field.evaluate(&SqlValue::from(raw))? {
                clauses.push(clause);
            }
        }

        if self.strict && clauses.is_empty() {
            tracing::debug!(target: "jobly.sql", kind = "filter", "no usable filter");
            return Err(JoblyError::bad_request(format!(
                "Must use at least one filter: {}",
                self.allowed()
            )));
        }

        // A compound predicate must not leak its OR into the conjunction.
        let compound = clauses.len() > 1;
        let mut frag = SqlFragment::predicates();
        for clause in clauses {
            match clause {
                Clause::Bind(prefix, value) => {
                    frag.push_bind(prefix, value);
                }
                Clause::Raw(sql) if compound && sql.contains(" OR ") => {
                    frag.push_raw(format!("({sql})"));
                }
                Clause::Raw(sql) => {
                    frag.push_raw(sql);
                }
            }
        }

        tracing::debug!(
            target: "jobly.sql",
            kind = "filter",
            param_count = frag.param_count(),
            sql = %frag,
        );
        Ok(frag)
    }

    /// Like [`FilterSet::build`], but an empty map yields `None` ("no filtering")
    /// instead of an error.
    pub fn build_if_any(&self, filters: &Map<String, Value>) -> JoblyResult<Option<SqlFragment>> {
        if filters.is_empty() {
            return Ok(None);
        }
        self.build(filters).map(Some)
    }

    /// Build from a JSON value. `null` and non-object values count as no filters.
    pub fn build_json(&self, filters: &Value) -> JoblyResult<SqlFragment> {
        match filters.as_object() {
            Some(map) => self.build(map),
            None => self.build(&Map::new()),
        }
    }
}

/// Collect query-string pairs into a filter map. A repeated key keeps its
/// first position and last value.
pub fn query_to_map<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Map<String, Value> {
    pairs
        .into_iter()
        .map(|(k, v)| (k.to_string(), Value::String(v.to_string())))
        .collect()
}

/// Lenient company filter (`nameLike`, `minEmployees`, `maxEmployees`).
pub fn sql_for_partial_filter(filters: &Value) -> JoblyResult<SqlFragment> {
    FilterSet::generic().build_json(filters)
}

/// Strict company filter.
pub fn sql_for_company_filter(filters: &Value) -> JoblyResult<SqlFragment> {
    FilterSet::company().build_json(filters)
}

/// Strict job filter.
pub fn sql_for_job_filter(filters: &Value) -> JoblyResult<SqlFragment> {
    FilterSet::job().build_json(filters)
}
