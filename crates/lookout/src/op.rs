//! Comparison operators for filter descriptors.
//!
//! The [`CompareOperator`] enum defines all supported comparison operators.
//! Not all operators are valid for all field types; see
//! [`CompareOperator::is_valid_for`].

use std::cmp::Ordering;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::QueryError;
use crate::field::FieldType;

/// Comparison operator for a filter descriptor.
///
/// Operators are grouped by the types they support:
/// - **Universal**: `Equal`, `NotEqual`
/// - **String and sequences**: `Contains`
/// - **Ordered types** (numbers, date/time): `GreaterThan`,
///   `GreaterThanOrEqual`, `LessThan`, `LessThanOrEqual`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CompareOperator {
    /// Equal (exact match).
    Equal,
    /// Not equal.
    NotEqual,
    /// Substring match for strings, membership for sequences.
    Contains,
    /// Greater than.
    GreaterThan,
    /// Greater than or equal.
    GreaterThanOrEqual,
    /// Less than.
    LessThan,
    /// Less than or equal.
    LessThanOrEqual,
}

impl CompareOperator {
    /// Returns `true` if this operator is valid for string comparisons.
    pub fn is_string_op(self) -> bool {
        matches!(
            self,
            CompareOperator::Equal | CompareOperator::NotEqual | CompareOperator::Contains
        )
    }

    /// Returns `true` if this operator is valid for numeric and date/time
    /// comparisons.
    pub fn is_ordered_op(self) -> bool {
        !matches!(self, CompareOperator::Contains)
    }

    /// Returns `true` if this operator is valid for booleans and UUIDs.
    pub fn is_equality_op(self) -> bool {
        matches!(self, CompareOperator::Equal | CompareOperator::NotEqual)
    }

    /// Returns `true` if this operator can be applied to a field with the
    /// given terminal type.
    ///
    /// Sequence fields only accept `Contains`, whatever their element type.
    pub fn is_valid_for(self, field_type: FieldType, enumerable: bool) -> bool {
        if field_type == FieldType::Object {
            return false;
        }
        if enumerable {
            return self == CompareOperator::Contains;
        }

        match field_type {
            FieldType::String => self.is_string_op(),
            FieldType::Bool | FieldType::Uuid => self.is_equality_op(),
            FieldType::Integer
            | FieldType::Unsigned
            | FieldType::Single
            | FieldType::Double
            | FieldType::Decimal
            | FieldType::DateTime => self.is_ordered_op(),
            FieldType::Object => false,
        }
    }

    /// Evaluates a comparison given an ordering result.
    ///
    /// The ordering is `field.cmp(operand)`. `Contains` is not ordering-based
    /// and always yields `false`.
    pub fn eval_ordering(self, ordering: Ordering) -> bool {
        match self {
            CompareOperator::Equal => ordering == Ordering::Equal,
            CompareOperator::NotEqual => ordering != Ordering::Equal,
            CompareOperator::GreaterThan => ordering == Ordering::Greater,
            CompareOperator::GreaterThanOrEqual => ordering != Ordering::Less,
            CompareOperator::LessThan => ordering == Ordering::Less,
            CompareOperator::LessThanOrEqual => ordering != Ordering::Greater,
            CompareOperator::Contains => false,
        }
    }

    /// Returns the short name of this operator.
    pub fn as_str(self) -> &'static str {
        match self {
            CompareOperator::Equal => "eq",
            CompareOperator::NotEqual => "ne",
            CompareOperator::Contains => "contains",
            CompareOperator::GreaterThan => "gt",
            CompareOperator::GreaterThanOrEqual => "gte",
            CompareOperator::LessThan => "lt",
            CompareOperator::LessThanOrEqual => "lte",
        }
    }

    /// Returns the symbol used when rendering expressions.
    pub fn symbol(self) -> &'static str {
        match self {
            CompareOperator::Equal => "==",
            CompareOperator::NotEqual => "!=",
            CompareOperator::Contains => "contains",
            CompareOperator::GreaterThan => ">",
            CompareOperator::GreaterThanOrEqual => ">=",
            CompareOperator::LessThan => "<",
            CompareOperator::LessThanOrEqual => "<=",
        }
    }
}

impl std::fmt::Display for CompareOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for CompareOperator {
    type Err = QueryError;

    /// Parses short names, symbols and full variant names, ignoring case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let op = match s.trim().to_ascii_lowercase().as_str() {
            "eq" | "==" | "equal" => CompareOperator::Equal,
            "ne" | "!=" | "notequal" => CompareOperator::NotEqual,
            "contains" => CompareOperator::Contains,
            "gt" | ">" | "greaterthan" => CompareOperator::GreaterThan,
            "gte" | ">=" | "greaterthanorequal" => CompareOperator::GreaterThanOrEqual,
            "lt" | "<" | "lessthan" => CompareOperator::LessThan,
            "lte" | "<=" | "lessthanorequal" => CompareOperator::LessThanOrEqual,
            _ => {
                return Err(QueryError::UnknownKeyword {
                    kind: "operator",
                    input: s.to_string(),
                })
            }
        };
        Ok(op)
    }
}
