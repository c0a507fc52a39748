//! Sort directions and value ordering.
//!
//! Provides [`SortOrder`] for sort descriptors and [`Dir`] for applied sort
//! conditions. [`compare_values`] is the partial order filters compare with;
//! [`sort_values`] extends it to the total order used when sorting.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::QueryError;
use crate::value::Value;

/// Sort direction requested by a sort descriptor.
///
/// `None` means the descriptor is not applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SortOrder {
    /// Not applied.
    #[default]
    None,
    /// Ascending order (smallest first).
    Ascending,
    /// Descending order (largest first).
    Descending,
}

impl SortOrder {
    /// Returns the applied direction, or `None` for [`SortOrder::None`].
    pub fn dir(self) -> Option<Dir> {
        match self {
            SortOrder::None => None,
            SortOrder::Ascending => Some(Dir::Asc),
            SortOrder::Descending => Some(Dir::Desc),
        }
    }

    /// Returns the display name of this sort order.
    pub fn as_str(self) -> &'static str {
        match self {
            SortOrder::None => "none",
            SortOrder::Ascending => "asc",
            SortOrder::Descending => "desc",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SortOrder {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "none" => Ok(SortOrder::None),
            "asc" | "ascending" => Ok(SortOrder::Ascending),
            "desc" | "descending" => Ok(SortOrder::Descending),
            _ => Err(QueryError::UnknownKeyword {
                kind: "sort order",
                input: s.to_string(),
            }),
        }
    }
}

/// Direction of an applied sort condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Dir {
    /// Ascending order (smallest first).
    #[default]
    Asc,
    /// Descending order (largest first).
    Desc,
}

impl Dir {
    /// Returns `true` if this is ascending order.
    pub fn is_asc(self) -> bool {
        matches!(self, Dir::Asc)
    }

    /// Returns `true` if this is descending order.
    pub fn is_desc(self) -> bool {
        matches!(self, Dir::Desc)
    }

    /// Applies this direction to an ordering.
    ///
    /// For `Asc`, returns the ordering unchanged.
    /// For `Desc`, reverses the ordering.
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Dir::Asc => ordering,
            Dir::Desc => ordering.reverse(),
        }
    }

    /// Returns the display name of this direction.
    pub fn as_str(self) -> &'static str {
        match self {
            Dir::Asc => "asc",
            Dir::Desc => "desc",
        }
    }
}

impl fmt::Display for Dir {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<Dir> for SortOrder {
    fn from(dir: Dir) -> Self {
        match dir {
            Dir::Asc => SortOrder::Ascending,
            Dir::Desc => SortOrder::Descending,
        }
    }
}

/// Compares two values of the same type.
///
/// `None` is the lowest value, so nulls come first in ascending order and
/// last in descending order. Sequences compare element by element.
///
/// Returns `None` if the types don't match or comparison is not possible (NaN).
pub fn compare_values(a: &Value<'_>, b: &Value<'_>) -> Option<Ordering> {
    match (a, b) {
        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        (Value::Number(a), Value::Number(b)) => a.compare(*b),
        (Value::Timestamp(a), Value::Timestamp(b)) => Some(a.cmp(b)),
        (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
        (Value::Uuid(a), Value::Uuid(b)) => Some(a.cmp(b)),
        (Value::List(a), Value::List(b)) => compare_lists(a, b),
        (Value::Object, Value::Object) => Some(Ordering::Equal),

        (Value::None, Value::None) => Some(Ordering::Equal),
        (Value::None, _) => Some(Ordering::Less),
        (_, Value::None) => Some(Ordering::Greater),

        // Type mismatch - cannot compare
        _ => None,
    }
}

fn compare_lists(a: &[Value<'_>], b: &[Value<'_>]) -> Option<Ordering> {
    for (x, y) in a.iter().zip(b) {
        match compare_values(x, y)? {
            Ordering::Equal => continue,
            other => return Some(other),
        }
    }
    Some(a.len().cmp(&b.len()))
}

/// Compares two values under the total order used for sorting.
///
/// Agrees with [`compare_values`] wherever that returns a result. NaN sorts
/// below every other number. Values of different types order by type rank:
/// null, bool, number, timestamp, string, uuid, list, object.
pub fn sort_values(a: &Value<'_>, b: &Value<'_>) -> Ordering {
    match (a, b) {
        (Value::Number(a), Value::Number(b)) => a.total_cmp(*b),
        (Value::List(a), Value::List(b)) => a
            .iter()
            .zip(b)
            .map(|(x, y)| sort_values(x, y))
            .find(|ordering| ordering.is_ne())
            .unwrap_or_else(|| a.len().cmp(&b.len())),
        _ => compare_values(a, b).unwrap_or_else(|| type_rank(a).cmp(&type_rank(b))),
    }
}

fn type_rank(value: &Value<'_>) -> u8 {
    match value {
        Value::None => 0,
        Value::Bool(_) => 1,
        Value::Number(_) => 2,
        Value::Timestamp(_) => 3,
        Value::String(_) => 4,
        Value::Uuid(_) => 5,
        Value::List(_) => 6,
        Value::Object => 7,
    }
}
