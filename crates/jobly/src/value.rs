//! Bind values produced by the fragment builders.
//!
//! [`SqlValue`] is a small dynamically-typed value that carries request data
//! (JSON bodies, query-string parameters) into a parameterized statement. It
//! implements [`ToSql`] and adapts to the column type Postgres reports for the
//! placeholder, so an integer bound to a `numeric` column or a numeric string
//! bound to an `int4` column both encode correctly.

use bytes::BytesMut;
use rust_decimal::Decimal;
use serde::Serialize;
use std::error::Error;
use tokio_postgres::types::{IsNull, ToSql, Type};

/// A single bind parameter.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SqlValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl SqlValue {
    /// Request-parameter truthiness.
    ///
    /// `null`, `false`, `0`, `NaN` and `""` are falsy. Any other string is
    /// truthy, including `"0"` and `"false"`.
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Null => false,
            Self::Bool(b) => *b,
            Self::Int(i) => *i != 0,
            Self::Float(f) => *f != 0.0 && !f.is_nan(),
            Self::Text(s) => !s.is_empty(),
        }
    }

    /// Coerce to a number.
    ///
    /// Strings are trimmed and parsed; integral results become [`SqlValue::Int`].
    /// Returns `None` for `null`, non-numeric strings and non-finite numbers.
    pub fn to_number(&self) -> Option<SqlValue> {
        match self {
            Self::Null => None,
            Self::Bool(b) => Some(Self::Int(i64::from(*b))),
            Self::Int(i) => Some(Self::Int(*i)),
            Self::Float(f) => f.is_finite().then_some(Self::Float(*f)),
            Self::Text(s) => parse_number(s.trim()),
        }
    }

    /// Returns the text if this is a [`SqlValue::Text`].
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the integer if this is a [`SqlValue::Int`].
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) => "integer",
            Self::Float(_) => "float",
            Self::Text(_) => "text",
        }
    }

    fn mismatch(&self, ty: &Type) -> Box<dyn Error + Sync + Send> {
        format!("cannot bind {} value to column of type {}", self.kind(), ty).into()
    }
}

fn parse_number(s: &str) -> Option<SqlValue> {
    if s.is_empty() {
        return None;
    }
    if let Ok(i) = s.parse::<i64>() {
        return Some(SqlValue::Int(i));
    }
    let f = s.parse::<f64>().ok().filter(|f| f.is_finite())?;
    if f.fract() == 0.0 && in_i64_range(f) {
        Some(SqlValue::Int(f as i64))
    } else {
        Some(SqlValue::Float(f))
    }
}

/// `i64::MAX as f64` rounds up to 2^63, so the upper bound is exclusive.
fn in_i64_range(f: f64) -> bool {
    f >= i64::MIN as f64 && f < i64::MAX as f64
}

fn is_text_type(ty: &Type) -> bool {
    matches!(
        *ty,
        Type::TEXT | Type::VARCHAR | Type::BPCHAR | Type::NAME | Type::UNKNOWN
    )
}

fn encode_int(
    value: i64,
    ty: &Type,
    out: &mut BytesMut,
) -> Result<IsNull, Box<dyn Error + Sync + Send>> {
    match *ty {
        Type::INT2 => i16::try_from(value)?.to_sql(ty, out),
        Type::INT4 => i32::try_from(value)?.to_sql(ty, out),
        Type::INT8 => value.to_sql(ty, out),
        Type::FLOAT4 => (value as f32).to_sql(ty, out),
        Type::FLOAT8 => (value as f64).to_sql(ty, out),
        Type::NUMERIC => Decimal::from(value).to_sql(ty, out),
        _ if is_text_type(ty) => value.to_string().to_sql(ty, out),
        _ => Err(SqlValue::Int(value).mismatch(ty)),
    }
}

fn encode_float(
    value: f64,
    ty: &Type,
    out: &mut BytesMut,
) -> Result<IsNull, Box<dyn Error + Sync + Send>> {
    match *ty {
        Type::FLOAT4 => (value as f32).to_sql(ty, out),
        Type::FLOAT8 => value.to_sql(ty, out),
        Type::NUMERIC => Decimal::try_from(value)?.to_sql(ty, out),
        Type::INT2 | Type::INT4 | Type::INT8 => {
            if value.fract() != 0.0 || !value.is_finite() || !in_i64_range(value) {
                return Err(format!("cannot bind {value} to integer column of type {ty}").into());
            }
            encode_int(value as i64, ty, out)
        }
        _ if is_text_type(ty) => value.to_string().to_sql(ty, out),
        _ => Err(SqlValue::Float(value).mismatch(ty)),
    }
}

fn encode_text(
    value: &str,
    ty: &Type,
    out: &mut BytesMut,
) -> Result<IsNull, Box<dyn Error + Sync + Send>> {
    match *ty {
        _ if is_text_type(ty) => value.to_sql(ty, out),
        Type::INT2 | Type::INT4 | Type::INT8 => {
            let parsed = value
                .trim()
                .parse::<i64>()
                .map_err(|e| format!("invalid integer {value:?}: {e}"))?;
            encode_int(parsed, ty, out)
        }
        Type::FLOAT4 | Type::FLOAT8 => {
            let parsed = value
                .trim()
                .parse::<f64>()
                .map_err(|e| format!("invalid float {value:?}: {e}"))?;
            encode_float(parsed, ty, out)
        }
        Type::NUMERIC => value.trim().parse::<Decimal>()?.to_sql(ty, out),
        Type::BOOL => value
            .trim()
            .parse::<bool>()
            .map_err(|e| format!("invalid boolean {value:?}: {e}"))?
            .to_sql(ty, out),
        _ => Err(SqlValue::Text(value.to_string()).mismatch(ty)),
    }
}

impl ToSql for SqlValue {
    fn to_sql(
        &self,
        ty: &Type,
        out: &mut BytesMut,
    ) -> Result<IsNull, Box<dyn Error + Sync + Send>> {
        match self {
            Self::Null => Ok(IsNull::Yes),
            Self::Bool(b) => match *ty {
                Type::BOOL => b.to_sql(ty, out),
                _ if is_text_type(ty) => b.to_string().to_sql(ty, out),
                _ => Err(self.mismatch(ty)),
            },
            Self::Int(i) => encode_int(*i, ty, out),
            Self::Float(f) => encode_float(*f, ty, out),
            Self::Text(s) => encode_text(s, ty, out),
        }
    }

    fn accepts(ty: &Type) -> bool {
        is_text_type(ty)
            || matches!(
                *ty,
                Type::BOOL
                    | Type::INT2
                    | Type::INT4
                    | Type::INT8
                    | Type::FLOAT4
                    | Type::FLOAT8
                    | Type::NUMERIC
            )
    }

    tokio_postgres::types::to_sql_checked!();
}

impl From<&serde_json::Value> for SqlValue {
    fn from(value: &serde_json::Value) -> Self {
        use serde_json::Value;

        match value {
            Value::Null => Self::Null,
            Value::Bool(b) => Self::Bool(*b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => Self::Int(i),
                None => n.as_f64().map_or(Self::Null, Self::Float),
            },
            Value::String(s) => Self::Text(s.clone()),
            // Composite values are stored as their JSON text.
            Value::Array(_) | Value::Object(_) => Self::Text(value.to_string()),
        }
    }
}

impl From<serde_json::Value> for SqlValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::String(s) => Self::Text(s),
            other => Self::from(&other),
        }
    }
}

impl From<&str> for SqlValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for SqlValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for SqlValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for SqlValue {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<f64> for SqlValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for SqlValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl<T: Into<SqlValue>> From<Option<T>> for SqlValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}
