//! Search-term coercion.
//!
//! Filter descriptors carry their search term as text. [`Operand::parse`]
//! turns that text into an owned, typed value for the field's terminal type.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::error::{QueryError, Result};
use crate::field::{FieldType, QueryTimestamp};
use crate::ordering::compare_values;
use crate::value::{Number, Timestamp, Value};

/// Owned comparison value stored in a predicate.
///
/// Unlike [`Value`], which borrows from the source struct, `Operand`
/// owns its data so it can be stored in built expressions.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    /// String value.
    String(String),
    /// Numeric value.
    Number(Number),
    /// Timestamp value.
    Timestamp(Timestamp),
    /// Boolean value.
    Bool(bool),
    /// UUID value.
    Uuid(Uuid),
}

impl Operand {
    /// Parses a search term into the given terminal type.
    ///
    /// | type | accepted input |
    /// |------|----------------|
    /// | string | any text, including the empty string |
    /// | integer / unsigned | integer literal |
    /// | single / double / decimal | `.`-separated decimal literal |
    /// | bool | `true`/`false` (any case), `1`/`0` |
    /// | datetime | RFC 3339, `YYYY-MM-DDTHH:MM:SS[.fff]`, `YYYY-MM-DD HH:MM:SS`, `YYYY-MM-DD` |
    /// | uuid | any form accepted by [`Uuid::parse_str`] |
    ///
    /// Surrounding whitespace is ignored for every type except string.
    pub fn parse(field_type: FieldType, term: &str) -> Result<Operand> {
        let text = term.trim();
        let parsed = match field_type {
            FieldType::String => Some(Operand::String(term.to_string())),
            FieldType::Integer => text.parse::<i64>().ok().map(Number::I64).map(Operand::Number),
            FieldType::Unsigned => text.parse::<u64>().ok().map(Number::U64).map(Operand::Number),
            FieldType::Single => text
                .parse::<f32>()
                .ok()
                .filter(|n| n.is_finite())
                .map(|n| Operand::Number(Number::from(n))),
            FieldType::Double => text
                .parse::<f64>()
                .ok()
                .filter(|n| n.is_finite())
                .map(|n| Operand::Number(Number::F64(n))),
            FieldType::Decimal => Decimal::from_str(text)
                .or_else(|_| Decimal::from_scientific(text))
                .ok()
                .map(|d| Operand::Number(Number::Decimal(d))),
            FieldType::Bool => parse_bool(text).map(Operand::Bool),
            FieldType::DateTime => parse_datetime(text).map(Operand::Timestamp),
            FieldType::Uuid => Uuid::parse_str(text).ok().map(Operand::Uuid),
            FieldType::Object => None,
        };

        parsed.ok_or_else(|| QueryError::InvalidTerm {
            term: term.to_string(),
            field_type,
        })
    }

    /// Borrows this operand as a runtime [`Value`].
    pub fn as_value(&self) -> Value<'_> {
        match self {
            Operand::String(s) => Value::String(s),
            Operand::Number(n) => Value::Number(*n),
            Operand::Timestamp(t) => Value::Timestamp(*t),
            Operand::Bool(b) => Value::Bool(*b),
            Operand::Uuid(u) => Value::Uuid(*u),
        }
    }

    /// Compares a field value against this operand.
    ///
    /// Returns `None` for null field values, type mismatches and NaN.
    pub fn compare_field(&self, field: &Value<'_>) -> Option<Ordering> {
        if field.is_none() {
            return None;
        }
        compare_values(field, &self.as_value())
    }
}

fn parse_bool(text: &str) -> Option<bool> {
    match text {
        "1" => Some(true),
        "0" => Some(false),
        _ if text.eq_ignore_ascii_case("true") => Some(true),
        _ if text.eq_ignore_ascii_case("false") => Some(false),
        _ => None,
    }
}

const NAIVE_DATETIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

fn parse_datetime(text: &str) -> Option<Timestamp> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.query_timestamp());
    }

    // Naive forms are taken to be UTC.
    NAIVE_DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
        .map(|dt| dt.query_timestamp())
        .or_else(|| {
            NaiveDate::parse_from_str(text, "%Y-%m-%d")
                .ok()
                .map(|d| d.query_timestamp())
        })
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::String(s) => write!(f, "{s:?}"),
            Operand::Number(n) => write!(f, "{n}"),
            Operand::Timestamp(t) => write!(f, "{t}"),
            Operand::Bool(b) => write!(f, "{b}"),
            Operand::Uuid(u) => write!(f, "{u}"),
        }
    }
}
