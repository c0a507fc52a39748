//! Query executor.
//!
//! The [`Query`] struct bundles built filter predicates, sort conditions and
//! paging, and executes them against slices.

use tracing::trace;

use crate::error::Result;
use crate::field::Queryable;
use crate::filter::{build_filters, Predicate};
use crate::order::{apply_order, build_orders, OrderCondition};
use crate::request::QueryRequest;
use crate::resolve::{FieldPath, PropertyMapping};

/// A query over a collection of `T`.
///
/// The match logic is:
/// ```text
/// match = every filter predicate matches (an empty list matches all)
/// ```
///
/// [`Query::filter`] then sorts the matches by the orderings (primary key
/// first) and applies `offset` and `limit`, in that order.
///
/// # Example
///
/// ```
/// use lookout::{CompareOperator, FieldDescriptor, FieldType, Query, QueryRequest, Queryable,
///     SortOrder, Value};
///
/// struct Task {
///     name: String,
///     priority: i32,
/// }
///
/// impl Queryable for Task {
///     fn query_fields() -> &'static [FieldDescriptor] {
///         const FIELDS: &[FieldDescriptor] = &[
///             FieldDescriptor::new("name", FieldType::String),
///             FieldDescriptor::new("priority", FieldType::Integer),
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
/// let tasks = vec![
///     Task { name: "Write docs".into(), priority: 3 },
///     Task { name: "Fix bug".into(), priority: 5 },
///     Task { name: "Old task".into(), priority: 1 },
/// ];
///
/// let request = QueryRequest::new()
///     .filter("priority", CompareOperator::GreaterThanOrEqual, "3")
///     .sort("priority", SortOrder::Descending);
/// let query = Query::<Task>::from_request(&request, None).unwrap();
///
/// let results = query.filter(&tasks);
/// assert_eq!(results.len(), 2);
/// assert_eq!(results[0].name, "Fix bug");
/// ```
pub struct Query<T> {
    filters: Vec<Predicate<T>>,
    orderings: Vec<OrderCondition<T>>,
    limit: Option<usize>,
    offset: Option<usize>,
}

impl<T> Query<T> {
    /// Creates a new empty query.
    ///
    /// An empty query matches all items.
    pub fn new() -> Self {
        Query {
            filters: Vec::new(),
            orderings: Vec::new(),
            limit: None,
            offset: None,
        }
    }

    // ========================================================================
    // Builders
    // ========================================================================

    /// Adds a filter predicate.
    ///
    /// All filter predicates must match for an item to be included.
    pub fn and_where(mut self, predicate: Predicate<T>) -> Self {
        self.filters.push(predicate);
        self
    }

    /// Adds a sort condition after the existing ones.
    pub fn order(mut self, condition: OrderCondition<T>) -> Self {
        self.orderings.push(condition);
        self
    }

    /// Adds an ascending sort condition.
    pub fn order_asc(self, path: FieldPath<T>) -> Self {
        self.order(OrderCondition::asc(path))
    }

    /// Adds a descending sort condition.
    pub fn order_desc(self, path: FieldPath<T>) -> Self {
        self.order(OrderCondition::desc(path))
    }

    /// Sets the maximum number of results to return.
    pub fn limit(mut self, n: usize) -> Self {
        self.limit = Some(n);
        self
    }

    /// Sets the number of results to skip.
    pub fn offset(mut self, n: usize) -> Self {
        self.offset = Some(n);
        self
    }

    // ========================================================================
    // Introspection
    // ========================================================================

    /// Returns the filter predicates.
    pub fn filters(&self) -> &[Predicate<T>] {
        &self.filters
    }

    /// Returns the sort conditions, primary first.
    pub fn orderings(&self) -> &[OrderCondition<T>] {
        &self.orderings
    }

    /// Returns the limit, if set.
    pub fn get_limit(&self) -> Option<usize> {
        self.limit
    }

    /// Returns the offset, if set.
    pub fn get_offset(&self) -> Option<usize> {
        self.offset
    }

    /// Returns `true` if this query has no filters (matches everything).
    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    // ========================================================================
    // Execution
    // ========================================================================

    /// Tests if a single item matches every filter.
    pub fn matches(&self, item: &T) -> bool {
        self.filters.iter().all(|predicate| predicate.matches(item))
    }

    /// Filters a slice, returning references to matching items.
    ///
    /// Results are sorted according to the query's orderings, then offset
    /// and limit are applied.
    pub fn filter<'a>(&self, items: &'a [T]) -> Vec<&'a T> {
        let matched = items.iter().filter(|item| self.matches(item));
        let mut results = apply_order(matched, &self.orderings);

        let offset = self.offset.unwrap_or(0);
        if offset > 0 {
            if offset >= results.len() {
                return Vec::new();
            }
            results.drain(..offset);
        }

        if let Some(limit) = self.limit {
            results.truncate(limit);
        }

        trace!(
            total = items.len(),
            returned = results.len(),
            "executed query"
        );
        results
    }

    /// Filters and clones matching items.
    pub fn filter_cloned(&self, items: &[T]) -> Vec<T>
    where
        T: Clone,
    {
        self.filter(items).into_iter().cloned().collect()
    }

    /// Filters a vector in place, keeping only matching items.
    ///
    /// Note: This does not apply ordering, offset, or limit.
    pub fn filter_mut(&self, items: &mut Vec<T>) {
        items.retain(|item| self.matches(item));
    }

    /// Counts the number of matching items, ignoring paging.
    pub fn count(&self, items: &[T]) -> usize {
        items.iter().filter(|item| self.matches(item)).count()
    }

    /// Returns `true` if any item matches.
    pub fn any(&self, items: &[T]) -> bool {
        items.iter().any(|item| self.matches(item))
    }

    /// Returns `true` if all items match.
    pub fn all(&self, items: &[T]) -> bool {
        items.iter().all(|item| self.matches(item))
    }

    /// Finds the first matching item in input order.
    pub fn find<'a>(&self, items: &'a [T]) -> Option<&'a T> {
        items.iter().find(|item| self.matches(item))
    }

    /// Finds the first matching item and returns its index.
    pub fn position(&self, items: &[T]) -> Option<usize> {
        items.iter().position(|item| self.matches(item))
    }
}

impl<T: Queryable + 'static> Query<T> {
    /// Builds a query from a declarative request.
    ///
    /// Inapplicable filters are dropped (see
    /// [`build_filters`](crate::build_filters)); `skip` and `take` become
    /// offset and limit.
    ///
    /// # Errors
    ///
    /// Fails when a sort property cannot be resolved.
    pub fn from_request(
        request: &QueryRequest,
        mappings: Option<&PropertyMapping<T>>,
    ) -> Result<Self> {
        Ok(Query {
            filters: build_filters(request, mappings),
            orderings: build_orders(&request.sorts, mappings)?,
            limit: request.take,
            offset: request.skip,
        })
    }
}

impl<T> Default for Query<T> {
    fn default() -> Self {
        Query::new()
    }
}

impl<T> Clone for Query<T> {
    fn clone(&self) -> Self {
        Query {
            filters: self.filters.clone(),
            orderings: self.orderings.clone(),
            limit: self.limit,
            offset: self.offset,
        }
    }
}

impl<T> std::fmt::Debug for Query<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Query")
            .field("filters", &self.filters)
            .field("orderings", &self.orderings)
            .field("limit", &self.limit)
            .field("offset", &self.offset)
            .finish()
    }
}
