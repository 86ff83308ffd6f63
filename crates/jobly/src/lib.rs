//! # jobly
//!
//! Parameterized SQL fragment builders for the jobly jobs-board API.
//!
//! Request handlers receive partial data: a `PATCH` body with any subset of a
//! record's fields, or a search with any subset of the supported filters. This
//! crate turns that data into SQL fragments with `$n` placeholders and an
//! aligned list of bind values, ready to splice into one statement:
//!
//! ```ignore
//! use jobly::{ColumnAliases, sql_for_partial_update, statement};
//! use serde_json::json;
//!
//! let set = sql_for_partial_update(
//!     &json!({ "numEmployees": 12, "logoUrl": null }),
//!     &ColumnAliases::companies(),
//! )?;
//! // "num_employees"=$1, "logo_url"=$2
//! let stmt = statement::update_returning("companies", set, "handle", "c1", "handle, name")?;
//! let rows = client.query(stmt.sql(), &stmt.params_ref()).await?;
//! let row = statement::found_or_not_found(rows.into_iter().next(), "company", "c1")?;
//! ```
//!
//! Search filters are table driven:
//!
//! ```ignore
//! let frag = jobly::sql_for_job_filter(&json!({ "title": "j", "minSalary": 5000, "hasEquity": "true" }))?;
//! assert_eq!(frag.clause(), "title ILIKE $1 AND salary>=$2 AND equity > 0");
//! ```
//!
//! All builder failures are [`JoblyError::BadRequest`] (HTTP 400). Builders
//! never modify their input.

pub mod config;
pub mod error;
pub mod filter;
pub mod fragment;
pub mod statement;
pub mod update;
pub mod value;

pub use config::{Config, Environment};
pub use error::{JoblyError, JoblyResult};
pub use filter::{
    FilterField, FilterSet, Predicate, Transform, query_to_map, sql_for_company_filter,
    sql_for_job_filter, sql_for_partial_filter,
};
pub use fragment::SqlFragment;
pub use statement::Statement;
pub use update::{ColumnAliases, sql_for_partial_update, sql_for_update_map};
pub use value::SqlValue;
