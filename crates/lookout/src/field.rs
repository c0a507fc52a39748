//! Type metadata for queryable structs.
//!
//! This module provides the [`Queryable`] trait, implemented by the
//! `#[derive(Queryable)]` macro from `lookout-macros` or by hand, which is
//! the only source of field names and types the engine ever consults.

use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone};
use serde::{Deserialize, Serialize};

use crate::value::{Timestamp, Value};

/// Terminal type of a field, used to pick parse and compare semantics.
///
/// Nullable wrappers are unwrapped and sequences report their element type,
/// so an `Option<i32>` and a `Vec<i32>` are both [`FieldType::Integer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldType {
    /// Text.
    String,
    /// Signed integer of any width.
    Integer,
    /// Unsigned integer of any width.
    Unsigned,
    /// 32-bit float.
    Single,
    /// 64-bit float.
    Double,
    /// Fixed-point decimal.
    Decimal,
    /// Boolean.
    Bool,
    /// Date and time.
    DateTime,
    /// Unique identifier.
    Uuid,
    /// Opaque value such as a nested struct. Sortable, never filterable;
    /// all present values rank equal.
    Object,
}

impl FieldType {
    /// Returns the display name of this type.
    pub fn as_str(self) -> &'static str {
        match self {
            FieldType::String => "string",
            FieldType::Integer => "integer",
            FieldType::Unsigned => "unsigned",
            FieldType::Single => "single",
            FieldType::Double => "double",
            FieldType::Decimal => "decimal",
            FieldType::Bool => "bool",
            FieldType::DateTime => "datetime",
            FieldType::Uuid => "uuid",
            FieldType::Object => "object",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Static description of one queryable field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDescriptor {
    /// Name used in filter and sort descriptors.
    pub name: &'static str,
    /// Terminal type of the field.
    pub field_type: FieldType,
    /// The field can hold no value (`Option<_>`).
    pub nullable: bool,
    /// The field is a sequence of `field_type` values.
    pub enumerable: bool,
}

impl FieldDescriptor {
    /// Describes a plain, non-nullable field.
    pub const fn new(name: &'static str, field_type: FieldType) -> Self {
        FieldDescriptor {
            name,
            field_type,
            nullable: false,
            enumerable: false,
        }
    }

    /// Marks the field as nullable.
    pub const fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    /// Marks the field as a sequence.
    pub const fn enumerable(mut self) -> Self {
        self.enumerable = true;
        self
    }
}

/// Trait for types that can be filtered and sorted by field name.
///
/// This trait is typically derived using `#[derive(Queryable)]` from the
/// `lookout-macros` crate, but can also be implemented manually.
///
/// # Derive Usage
///
/// ```ignore
/// use lookout::Queryable;
/// use lookout_macros::Queryable;
///
/// #[derive(Queryable)]
/// struct Task {
///     #[query(String)]
///     name: String,
///     #[query(Integer)]
///     priority: Option<i32>,
///     #[query(String)]
///     tags: Vec<String>,
/// }
/// ```
///
/// # Manual Implementation
///
/// ```
/// use lookout::{FieldDescriptor, FieldType, Queryable, Value};
///
/// struct Task {
///     name: String,
///     priority: Option<u8>,
/// }
///
/// impl Queryable for Task {
///     fn query_fields() -> &'static [FieldDescriptor] {
///         const FIELDS: &[FieldDescriptor] = &[
///             FieldDescriptor::new("name", FieldType::String),
///             FieldDescriptor::new("priority", FieldType::Unsigned).nullable(),
///         ];
///         FIELDS
///     }
///
///     fn query_value(&self, field: &str) -> Value<'_> {
///         match field {
///             "name" => Value::String(&self.name),
///             "priority" => self.priority.into(),
///             _ => Value::None,
///         }
///     }
/// }
///
/// assert_eq!(Task::field("Priority").map(|f| f.name), Some("priority"));
/// ```
pub trait Queryable {
    /// Returns the descriptors of every queryable field, in declaration order.
    fn query_fields() -> &'static [FieldDescriptor];

    /// Returns the value of a field for comparison.
    ///
    /// Returns [`Value::None`] if the field is null, doesn't exist or is not
    /// queryable.
    fn query_value(&self, field: &str) -> Value<'_>;

    /// Looks up a field descriptor by name.
    ///
    /// An exact match wins; otherwise the first ASCII case-insensitive match
    /// is returned.
    fn field(name: &str) -> Option<&'static FieldDescriptor> {
        let fields = Self::query_fields();
        fields
            .iter()
            .find(|f| f.name == name)
            .or_else(|| fields.iter().find(|f| f.name.eq_ignore_ascii_case(name)))
    }
}

/// Helper trait for converting types to timestamps.
///
/// The `#[derive(Queryable)]` macro uses this trait for fields marked with
/// `#[query(DateTime)]`. Implement it for your own datetime types.
///
/// # Example
///
/// ```
/// use lookout::{QueryTimestamp, Timestamp};
///
/// struct MyDateTime(i64);
///
/// impl QueryTimestamp for MyDateTime {
///     fn query_timestamp(&self) -> Timestamp {
///         Timestamp::from_millis(self.0)
///     }
/// }
/// ```
pub trait QueryTimestamp {
    /// Converts this value to a [`Timestamp`] for comparison.
    fn query_timestamp(&self) -> Timestamp;
}

impl QueryTimestamp for Timestamp {
    fn query_timestamp(&self) -> Timestamp {
        *self
    }
}

impl QueryTimestamp for i64 {
    fn query_timestamp(&self) -> Timestamp {
        Timestamp::from_millis(*self)
    }
}

impl QueryTimestamp for u64 {
    fn query_timestamp(&self) -> Timestamp {
        Timestamp::from_millis(*self as i64)
    }
}

impl<Tz: TimeZone> QueryTimestamp for DateTime<Tz> {
    fn query_timestamp(&self) -> Timestamp {
        Timestamp::from_millis(self.timestamp_millis())
    }
}

// Naive values are taken to be UTC.
impl QueryTimestamp for NaiveDateTime {
    fn query_timestamp(&self) -> Timestamp {
        Timestamp::from_millis(self.and_utc().timestamp_millis())
    }
}

impl QueryTimestamp for NaiveDate {
    fn query_timestamp(&self) -> Timestamp {
        Timestamp::from_millis(self.and_time(Default::default()).and_utc().timestamp_millis())
    }
}

impl QueryTimestamp for SystemTime {
    fn query_timestamp(&self) -> Timestamp {
        match self.duration_since(UNIX_EPOCH) {
            Ok(after) => Timestamp::from_millis(after.as_millis() as i64),
            Err(before) => Timestamp::from_millis(-(before.duration().as_millis() as i64)),
        }
    }
}
