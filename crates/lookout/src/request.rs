//! Declarative query requests.
//!
//! A [`QueryRequest`] is plain data: an optional free-text search term, an
//! ordered list of [`FilterDescriptor`]s, an ordered list of
//! [`SortDescriptor`]s, and optional paging. Requests deserialize from JSON
//! with `camelCase` keys:
//!
//! ```
//! use lookout::{CompareOperator, QueryRequest, SortOrder};
//!
//! let request: QueryRequest = serde_json::from_str(r#"{
//!     "searchTerm": "duck",
//!     "filters": [
//!         { "propertyName": "lambda", "operator": "GreaterThan", "searchTerm": "5" }
//!     ],
//!     "sorts": [ { "propertyName": "beta", "direction": "Descending" } ],
//!     "take": 10
//! }"#).unwrap();
//!
//! assert_eq!(request.filters[0].operator, CompareOperator::GreaterThan);
//! assert_eq!(request.sorts[0].direction, SortOrder::Descending);
//! assert_eq!(request.skip, None);
//! ```

use serde::{Deserialize, Serialize};

use crate::op::CompareOperator;
use crate::ordering::SortOrder;

/// One declarative filter condition.
///
/// The search term is always text; it is coerced to the target field's
/// terminal type when the filter is built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterDescriptor {
    /// Logical or direct property name.
    pub property_name: String,
    /// Comparison operator.
    pub operator: CompareOperator,
    /// Search term as text.
    #[serde(default)]
    pub search_term: String,
}

impl FilterDescriptor {
    /// Creates a new filter descriptor.
    pub fn new(
        property_name: impl Into<String>,
        operator: CompareOperator,
        search_term: impl Into<String>,
    ) -> Self {
        FilterDescriptor {
            property_name: property_name.into(),
            operator,
            search_term: search_term.into(),
        }
    }
}

/// One declarative sort request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SortDescriptor {
    /// Logical or direct property name.
    pub property_name: String,
    /// Sort direction; `None` means not applied.
    #[serde(default)]
    pub direction: SortOrder,
}

impl SortDescriptor {
    /// Creates a new sort descriptor.
    pub fn new(property_name: impl Into<String>, direction: SortOrder) -> Self {
        SortDescriptor {
            property_name: property_name.into(),
            direction,
        }
    }

    /// Creates an ascending sort descriptor.
    pub fn asc(property_name: impl Into<String>) -> Self {
        SortDescriptor::new(property_name, SortOrder::Ascending)
    }

    /// Creates a descending sort descriptor.
    pub fn desc(property_name: impl Into<String>) -> Self {
        SortDescriptor::new(property_name, SortOrder::Descending)
    }
}

/// A complete declarative query.
///
/// Order of `filters` and `sorts` is significant: filters are combined with
/// AND in declaration order, sorts give primary, secondary, ... keys.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QueryRequest {
    /// Free-text term matched against every string field.
    pub search_term: Option<String>,
    /// Filter conditions.
    pub filters: Vec<FilterDescriptor>,
    /// Sort keys.
    pub sorts: Vec<SortDescriptor>,
    /// Number of results to skip after sorting.
    pub skip: Option<usize>,
    /// Maximum number of results to return.
    pub take: Option<usize>,
}

impl QueryRequest {
    /// Creates an empty request.
    pub fn new() -> Self {
        QueryRequest::default()
    }

    /// Sets the free-text search term.
    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search_term = Some(term.into());
        self
    }

    /// Appends a filter condition.
    pub fn filter(
        mut self,
        property_name: impl Into<String>,
        operator: CompareOperator,
        search_term: impl Into<String>,
    ) -> Self {
        self.filters
            .push(FilterDescriptor::new(property_name, operator, search_term));
        self
    }

    /// Appends a sort key.
    pub fn sort(mut self, property_name: impl Into<String>, direction: SortOrder) -> Self {
        self.sorts.push(SortDescriptor::new(property_name, direction));
        self
    }

    /// Sets the number of results to skip.
    pub fn skip(mut self, n: usize) -> Self {
        self.skip = Some(n);
        self
    }

    /// Sets the maximum number of results.
    pub fn take(mut self, n: usize) -> Self {
        self.take = Some(n);
        self
    }
}
