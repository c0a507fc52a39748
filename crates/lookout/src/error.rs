//! Error types for the lookout crate.

use thiserror::Error;

use crate::field::FieldType;
use crate::op::CompareOperator;

/// Errors that can occur when building query expressions.
///
/// Filter building never returns these directly: a failing filter descriptor
/// is dropped and the reason is reported as a [`Rejection`](crate::Rejection).
/// Sort building propagates them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    /// The property name matches neither a mapping nor a field of the type.
    #[error("unknown field '{field}'")]
    UnknownField { field: String },

    /// Operator is not valid for the field's terminal type.
    #[error("operator '{op}' is not valid for {target} fields")]
    InvalidOperatorForType { op: CompareOperator, target: String },

    /// The search term could not be parsed into the field's terminal type.
    #[error("cannot parse '{term}' as {}", .field_type.as_str())]
    InvalidTerm { term: String, field_type: FieldType },

    /// A textual operator or sort direction was not recognised.
    #[error("unknown {kind} '{input}'")]
    UnknownKeyword { kind: &'static str, input: String },
}

/// Result type for lookout operations.
pub type Result<T> = std::result::Result<T, QueryError>;
