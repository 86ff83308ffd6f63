//! Filter field tables for each search endpoint.

use super::{FilterField, Transform};

pub const NAME_LIKE: FilterField = FilterField::bind("nameLike", "name ILIKE ", Transform::Contains);
pub const MIN_EMPLOYEES: FilterField =
    FilterField::bind("minEmployees", "num_employees>=", Transform::Number);
pub const MAX_EMPLOYEES: FilterField =
    FilterField::bind("maxEmployees", "num_employees<=", Transform::Number);

pub const TITLE: FilterField = FilterField::bind("title", "title ILIKE ", Transform::Contains);
pub const MIN_SALARY: FilterField = FilterField::bind("minSalary", "salary>=", Transform::Number);
pub const HAS_EQUITY: FilterField =
    FilterField::flag("hasEquity", "equity > 0", "equity = 0 OR equity ISNULL");

/// Lenient company search: unknown keys are ignored.
pub const GENERIC: &[FilterField] = &[NAME_LIKE, MIN_EMPLOYEES, MAX_EMPLOYEES];

/// `GET /companies` filters. Order is the order listed in error messages.
pub const COMPANY: &[FilterField] = &[MIN_EMPLOYEES, MAX_EMPLOYEES, NAME_LIKE];

/// `GET /jobs` filters.
pub const JOB: &[FilterField] = &[TITLE, MIN_SALARY, HAS_EQUITY];
