//! Sort expressions.
//!
//! [`build_orders`] turns sort descriptors into [`OrderCondition`]s and
//! [`apply_order`] sorts a sequence by them: the first condition is the
//! primary key and each later condition only breaks ties left by the ones
//! before it. The sort is stable, so elements equal on every key keep their
//! input order.
//!
//! Unlike filters, an unresolvable sort property is an error: ordering must
//! be complete to be deterministic.

use std::cmp::Ordering;
use std::fmt;

use tracing::{debug, trace};

use crate::error::{QueryError, Result};
use crate::field::Queryable;
use crate::ordering::{sort_values, Dir, SortOrder};
use crate::request::SortDescriptor;
use crate::resolve::{resolve, FieldPath, PropertyMapping};
use crate::value::Value;

/// A built sort key: a path on `T` and a direction.
pub struct OrderCondition<T> {
    dir: Dir,
    path: FieldPath<T>,
}

impl<T> OrderCondition<T> {
    /// Creates a condition, or `None` when the sort order is
    /// [`SortOrder::None`].
    pub fn new(order: SortOrder, path: FieldPath<T>) -> Option<Self> {
        order.dir().map(|dir| OrderCondition { dir, path })
    }

    /// Creates an ascending condition.
    pub fn asc(path: FieldPath<T>) -> Self {
        OrderCondition { dir: Dir::Asc, path }
    }

    /// Creates a descending condition.
    pub fn desc(path: FieldPath<T>) -> Self {
        OrderCondition {
            dir: Dir::Desc,
            path,
        }
    }

    /// Returns the sort direction.
    pub fn dir(&self) -> Dir {
        self.dir
    }

    /// Returns the path the condition sorts by.
    pub fn path(&self) -> &FieldPath<T> {
        &self.path
    }

    /// Reads this condition's sort key from an element.
    pub fn key<'a>(&self, item: &'a T) -> Value<'a> {
        self.path.value(item)
    }

    /// Compares two elements by this condition alone.
    pub fn compare(&self, a: &T, b: &T) -> Ordering {
        self.compare_keys(&self.key(a), &self.key(b))
    }

    fn compare_keys(&self, a: &Value<'_>, b: &Value<'_>) -> Ordering {
        self.dir.apply(sort_values(a, b))
    }
}

impl<T> Clone for OrderCondition<T> {
    fn clone(&self) -> Self {
        OrderCondition {
            dir: self.dir,
            path: self.path.clone(),
        }
    }
}

impl<T> PartialEq for OrderCondition<T> {
    fn eq(&self, other: &Self) -> bool {
        self.dir == other.dir && self.path == other.path
    }
}

impl<T> fmt::Debug for OrderCondition<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OrderCondition")
            .field("dir", &self.dir)
            .field("path", &self.path.name())
            .finish()
    }
}

impl<T> fmt::Display for OrderCondition<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "p.{} {}", self.path.name(), self.dir)
    }
}

/// Builds one sort condition from a property name.
///
/// Returns `Ok(None)` for [`SortOrder::None`] without resolving the name.
/// When the name is mapped to several paths only the first is used.
///
/// # Errors
///
/// [`QueryError::UnknownField`] if the property cannot be resolved.
pub fn build_order_condition<T>(
    order: SortOrder,
    property: &str,
    mappings: Option<&PropertyMapping<T>>,
) -> Result<Option<OrderCondition<T>>>
where
    T: Queryable + 'static,
{
    if order == SortOrder::None {
        return Ok(None);
    }

    match resolve(property, mappings).into_iter().next() {
        Some(path) => Ok(OrderCondition::new(order, path)),
        None => {
            debug!(property, "cannot sort by unknown property");
            Err(QueryError::UnknownField {
                field: property.to_string(),
            })
        }
    }
}

/// Builds the sort conditions for a list of descriptors, in order.
///
/// Descriptors with [`SortOrder::None`] are skipped. An empty list yields no
/// conditions.
///
/// # Errors
///
/// [`QueryError::UnknownField`] for the first descriptor whose property
/// cannot be resolved; no partial result is returned.
pub fn build_orders<T>(
    sorts: &[SortDescriptor],
    mappings: Option<&PropertyMapping<T>>,
) -> Result<Vec<OrderCondition<T>>>
where
    T: Queryable + 'static,
{
    let mut conditions = Vec::with_capacity(sorts.len());
    for sort in sorts {
        if let Some(condition) =
            build_order_condition(sort.direction, &sort.property_name, mappings)?
        {
            conditions.push(condition);
        }
    }

    trace!(built = conditions.len(), "built sort conditions");
    Ok(conditions)
}

/// Sorts elements by a list of conditions.
///
/// The first condition is the primary key; later conditions only break ties.
/// The sort is stable. An empty condition list returns the elements in input
/// order.
pub fn apply_order<'a, T, I>(items: I, conditions: &[OrderCondition<T>]) -> Vec<&'a T>
where
    I: IntoIterator<Item = &'a T>,
{
    if conditions.is_empty() {
        return items.into_iter().collect();
    }

    // Read every key once up front rather than on each comparison.
    let mut keyed: Vec<(Vec<Value<'a>>, &'a T)> = items
        .into_iter()
        .map(|item| (conditions.iter().map(|c| c.key(item)).collect(), item))
        .collect();

    keyed.sort_by(|(a, _), (b, _)| {
        conditions
            .iter()
            .zip(a.iter().zip(b))
            .map(|(condition, (a, b))| condition.compare_keys(a, b))
            .find(|ordering| *ordering != Ordering::Equal)
            .unwrap_or(Ordering::Equal)
    });

    keyed.into_iter().map(|(_, item)| item).collect()
}

/// Starts an ordered sequence with a primary sort condition.
///
/// ```
/// use lookout::{order_by, FieldPath, FieldType, OrderCondition};
///
/// struct Row {
///     beta: i32,
///     rho: i32,
/// }
///
/// let beta = FieldPath::new("beta", FieldType::Integer, |r: &Row| r.beta.into());
/// let rho = FieldPath::new("rho", FieldType::Integer, |r: &Row| r.rho.into());
/// let rows = [Row { beta: 1, rho: 2 }, Row { beta: 1, rho: 1 }, Row { beta: 0, rho: 3 }];
///
/// let sorted = order_by(&rows, OrderCondition::desc(beta))
///     .then_by(OrderCondition::asc(rho))
///     .into_vec();
///
/// let rhos: Vec<i32> = sorted.iter().map(|r| r.rho).collect();
/// assert_eq!(rhos, [1, 2, 3]);
/// ```
pub fn order_by<'a, T, I>(items: I, condition: OrderCondition<T>) -> Ordered<'a, T>
where
    I: IntoIterator<Item = &'a T>,
{
    Ordered {
        items: items.into_iter().collect(),
        conditions: vec![condition],
    }
}

/// A sequence with a primary sort condition and optional tie-breakers.
///
/// Sorting happens once, when the sequence is consumed.
pub struct Ordered<'a, T> {
    items: Vec<&'a T>,
    conditions: Vec<OrderCondition<T>>,
}

impl<'a, T> Ordered<'a, T> {
    /// Adds a tie-break condition applied within groups equal on all
    /// previous conditions.
    pub fn then_by(mut self, condition: OrderCondition<T>) -> Self {
        self.conditions.push(condition);
        self
    }

    /// Returns the conditions, primary first.
    pub fn conditions(&self) -> &[OrderCondition<T>] {
        &self.conditions
    }

    /// Sorts and returns the elements.
    pub fn into_vec(self) -> Vec<&'a T> {
        apply_order(self.items, &self.conditions)
    }
}

impl<'a, T> IntoIterator for Ordered<'a, T> {
    type Item = &'a T;
    type IntoIter = std::vec::IntoIter<&'a T>;

    fn into_iter(self) -> Self::IntoIter {
        self.into_vec().into_iter()
    }
}
