//! Filter expressions.
//!
//! [`build_filters`] turns the filter part of a [`QueryRequest`] into an
//! ordered list of [`Predicate`]s. Descriptors that cannot be applied (unknown
//! property, unparseable term, operator not valid for the field type) are
//! dropped rather than reported as errors; use
//! [`build_filters_with_rejections`] to see what was dropped and why.
//!
//! # Type rules
//!
//! | terminal type | operators | null field |
//! |---------------|-----------|------------|
//! | string | `Equal`, `NotEqual`, `Contains` | never matches |
//! | integer, unsigned, single, double, decimal | all but `Contains` | matches `NotEqual` only |
//! | datetime | all but `Contains` | matches `NotEqual` only |
//! | bool, uuid | `Equal`, `NotEqual` | matches `NotEqual` only |
//! | sequence of any of the above | `Contains` | never matches |

use std::cmp::Ordering;
use std::fmt;

use tracing::{debug, trace};

use crate::error::QueryError;
use crate::field::{FieldType, Queryable};
use crate::op::CompareOperator;
use crate::operand::Operand;
use crate::request::{FilterDescriptor, QueryRequest};
use crate::resolve::{resolve, string_fields, FieldPath, PropertyMapping};
use crate::value::Value;

/// Name of the element binding used when rendering predicates.
pub const PARAMETER: &str = "p";

/// A built, type-safe boolean expression over elements of type `T`.
///
/// Every predicate built for one request is evaluated against the same
/// element binding (`&T`, rendered as `p`), so predicates compose freely.
pub enum Predicate<T> {
    /// Compares the value reached by a path against an operand.
    Compare {
        path: FieldPath<T>,
        op: CompareOperator,
        operand: Operand,
    },
    /// Matches when any inner predicate matches.
    Or(Vec<Predicate<T>>),
    /// Matches when every inner predicate matches.
    And(Vec<Predicate<T>>),
}

impl<T> Predicate<T> {
    /// Builds a comparison, checking the operator against the path's type
    /// and parsing the search term.
    pub fn compare(
        path: FieldPath<T>,
        op: CompareOperator,
        term: &str,
    ) -> Result<Self, QueryError> {
        if !op.is_valid_for(path.field_type(), path.is_enumerable()) {
            return Err(QueryError::InvalidOperatorForType {
                op,
                target: path.describe(),
            });
        }
        let operand = Operand::parse(path.field_type(), term)?;
        Ok(Predicate::Compare { path, op, operand })
    }

    /// Combines predicates with OR, unwrapping a single predicate.
    ///
    /// Returns `None` for an empty list.
    pub fn any(mut predicates: Vec<Predicate<T>>) -> Option<Self> {
        match predicates.len() {
            0 => None,
            1 => predicates.pop(),
            _ => Some(Predicate::Or(predicates)),
        }
    }

    /// Combines predicates with AND, unwrapping a single predicate.
    ///
    /// Returns `None` for an empty list.
    pub fn all(mut predicates: Vec<Predicate<T>>) -> Option<Self> {
        match predicates.len() {
            0 => None,
            1 => predicates.pop(),
            _ => Some(Predicate::And(predicates)),
        }
    }

    /// Tests whether an element satisfies this predicate.
    pub fn matches(&self, item: &T) -> bool {
        match self {
            Predicate::Compare { path, op, operand } => {
                eval_compare(path, *op, operand, &path.value(item))
            }
            Predicate::Or(inner) => inner.iter().any(|p| p.matches(item)),
            Predicate::And(inner) => inner.iter().all(|p| p.matches(item)),
        }
    }

    /// Returns references to the matching elements, in input order.
    pub fn filter<'a>(&self, items: &'a [T]) -> Vec<&'a T> {
        items.iter().filter(|item| self.matches(item)).collect()
    }

    fn is_guarded(&self) -> bool {
        match self {
            Predicate::Compare { path, op, .. } => {
                path.is_enumerable()
                    || (path.field_type() == FieldType::String
                        && matches!(op, CompareOperator::Contains | CompareOperator::NotEqual))
            }
            Predicate::Or(_) | Predicate::And(_) => true,
        }
    }
}

fn eval_compare<T>(
    path: &FieldPath<T>,
    op: CompareOperator,
    operand: &Operand,
    value: &Value<'_>,
) -> bool {
    if path.is_enumerable() {
        return match value {
            Value::List(items) => items
                .iter()
                .any(|item| operand.compare_field(item) == Some(Ordering::Equal)),
            _ => false,
        };
    }

    if let (CompareOperator::Contains, Operand::String(term)) = (op, operand) {
        return value.as_str().is_some_and(|s| s.contains(term.as_str()));
    }

    match operand.compare_field(value) {
        Some(ordering) => op.eval_ordering(ordering),
        // Null and NaN differ from every value, so only NotEqual holds.
        // Strings are guarded by a not-null check instead.
        None => op == CompareOperator::NotEqual && path.field_type() != FieldType::String,
    }
}

impl<T> Clone for Predicate<T> {
    fn clone(&self) -> Self {
        match self {
            Predicate::Compare { path, op, operand } => Predicate::Compare {
                path: path.clone(),
                op: *op,
                operand: operand.clone(),
            },
            Predicate::Or(inner) => Predicate::Or(inner.clone()),
            Predicate::And(inner) => Predicate::And(inner.clone()),
        }
    }
}

impl<T> PartialEq for Predicate<T> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (
                Predicate::Compare { path, op, operand },
                Predicate::Compare {
                    path: other_path,
                    op: other_op,
                    operand: other_operand,
                },
            ) => path == other_path && op == other_op && operand == other_operand,
            (Predicate::Or(a), Predicate::Or(b)) => a == b,
            (Predicate::And(a), Predicate::And(b)) => a == b,
            _ => false,
        }
    }
}

impl<T> fmt::Debug for Predicate<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Predicate::Compare { path, op, operand } => f
                .debug_struct("Compare")
                .field("path", &path.name())
                .field("op", op)
                .field("operand", operand)
                .finish(),
            Predicate::Or(inner) => f.debug_tuple("Or").field(inner).finish(),
            Predicate::And(inner) => f.debug_tuple("And").field(inner).finish(),
        }
    }
}

/// Renders the predicate as an expression over `p`, e.g.
/// `p.gamma != null && p.gamma.contains("QuackFu")`.
impl<T> fmt::Display for Predicate<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Predicate::Compare { path, op, operand } => {
                let member = format!("{PARAMETER}.{}", path.name());
                if path.is_enumerable() || *op == CompareOperator::Contains {
                    write!(f, "{member} != null && {member}.contains({operand})")
                } else if self.is_guarded() {
                    write!(f, "{member} != null && {member} {} {operand}", op.symbol())
                } else {
                    write!(f, "{member} {} {operand}", op.symbol())
                }
            }
            Predicate::Or(inner) => write_joined(f, inner, " || "),
            Predicate::And(inner) => write_joined(f, inner, " && "),
        }
    }
}

fn write_joined<T>(
    f: &mut fmt::Formatter<'_>,
    inner: &[Predicate<T>],
    separator: &str,
) -> fmt::Result {
    for (i, predicate) in inner.iter().enumerate() {
        if i > 0 {
            f.write_str(separator)?;
        }
        if predicate.is_guarded() {
            write!(f, "({predicate})")?;
        } else {
            write!(f, "{predicate}")?;
        }
    }
    Ok(())
}

/// A filter descriptor, or one path of it, that was dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection {
    /// Property name from the descriptor.
    pub property: String,
    /// Resolved path that failed, if resolution succeeded.
    pub path: Option<String>,
    /// Why it was dropped.
    pub reason: QueryError,
}

/// Builds the filter predicates for a request.
///
/// The global search predicate, if any, comes first, followed by one
/// predicate per applicable filter descriptor in declaration order.
/// Inapplicable descriptors are silently dropped.
pub fn build_filters<T>(
    request: &QueryRequest,
    mappings: Option<&PropertyMapping<T>>,
) -> Vec<Predicate<T>>
where
    T: Queryable + 'static,
{
    build_filters_with_rejections(request, mappings).0
}

/// Builds the filter predicates for a request and reports what was dropped.
///
/// A multi-path descriptor that keeps at least one path still yields a
/// predicate; the failing paths are reported as rejections alongside it.
pub fn build_filters_with_rejections<T>(
    request: &QueryRequest,
    mappings: Option<&PropertyMapping<T>>,
) -> (Vec<Predicate<T>>, Vec<Rejection>)
where
    T: Queryable + 'static,
{
    let mut predicates = Vec::with_capacity(request.filters.len() + 1);
    let mut rejections = Vec::new();

    if let Some(search) = request.search_term.as_deref().and_then(build_search::<T>) {
        predicates.push(search);
    }

    for descriptor in &request.filters {
        let (predicate, mut dropped) = build_filter(descriptor, mappings);
        predicates.extend(predicate);
        rejections.append(&mut dropped);
    }

    trace!(
        built = predicates.len(),
        dropped = rejections.len(),
        "built filter expressions"
    );
    (predicates, rejections)
}

/// Builds the free-text search predicate: a null-safe, case-sensitive
/// `contains` over every direct string field, combined with OR.
///
/// Returns `None` for an empty term or a type without string fields.
pub fn build_search<T>(term: &str) -> Option<Predicate<T>>
where
    T: Queryable + 'static,
{
    if term.is_empty() {
        return None;
    }

    let clauses = string_fields::<T>()
        .into_iter()
        .map(|path| Predicate::Compare {
            path,
            op: CompareOperator::Contains,
            operand: Operand::String(term.to_string()),
        })
        .collect::<Vec<_>>();

    match clauses.len() {
        0 => None,
        _ => Some(Predicate::Or(clauses)),
    }
}

/// Builds the predicate for a single filter descriptor.
///
/// Returns the predicate (if any path survived) and the rejections of the
/// paths that did not.
pub fn build_filter<T>(
    descriptor: &FilterDescriptor,
    mappings: Option<&PropertyMapping<T>>,
) -> (Option<Predicate<T>>, Vec<Rejection>)
where
    T: Queryable + 'static,
{
    let property = descriptor.property_name.as_str();
    let paths = resolve(property, mappings);

    if paths.is_empty() {
        debug!(property, "dropping filter on unknown property");
        let rejection = Rejection {
            property: property.to_string(),
            path: None,
            reason: QueryError::UnknownField {
                field: property.to_string(),
            },
        };
        return (None, vec![rejection]);
    }

    let mut clauses = Vec::with_capacity(paths.len());
    let mut rejections = Vec::new();

    for path in paths {
        let path_name = path.name().to_string();
        match Predicate::compare(path, descriptor.operator, &descriptor.search_term) {
            Ok(predicate) => clauses.push(predicate),
            Err(reason) => {
                debug!(
                    property,
                    path = %path_name,
                    op = %descriptor.operator,
                    %reason,
                    "dropping filter path"
                );
                rejections.push(Rejection {
                    property: property.to_string(),
                    path: Some(path_name),
                    reason,
                });
            }
        }
    }

    (Predicate::any(clauses), rejections)
}

/// Tests an element against a list of predicates combined with AND.
///
/// An empty list matches everything.
pub fn matches_all<T>(predicates: &[Predicate<T>], item: &T) -> bool {
    predicates.iter().all(|p| p.matches(item))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::FieldDescriptor;
    use crate::value::Number;

    struct Row {
        name: Option<String>,
        note: String,
        count: Option<i32>,
        flags: Option<Vec<bool>>,
    }

    impl Queryable for Row {
        fn query_fields() -> &'static [FieldDescriptor] {
            const FIELDS: &[FieldDescriptor] = &[
                FieldDescriptor::new("name", FieldType::String).nullable(),
                FieldDescriptor::new("note", FieldType::String),
                FieldDescriptor::new("count", FieldType::Integer).nullable(),
                FieldDescriptor::new("flags", FieldType::Bool)
                    .nullable()
                    .enumerable(),
            ];
            FIELDS
        }

        fn query_value(&self, field: &str) -> Value<'_> {
            match field {
                "name" => self.name.as_deref().into(),
                "note" => Value::String(&self.note),
                "count" => self.count.into(),
                "flags" => self.flags.as_ref().map_or(Value::None, |flags| {
                    Value::List(flags.iter().copied().map(Value::from).collect())
                }),
                _ => Value::None,
            }
        }
    }

    fn row(name: Option<&str>, count: Option<i32>) -> Row {
        Row {
            name: name.map(String::from),
            note: "note".into(),
            count,
            flags: None,
        }
    }

    fn path(name: &str) -> FieldPath<Row> {
        resolve::<Row>(name, None).remove(0)
    }

    #[test]
    fn compare_rejects_invalid_operator() {
        let err = Predicate::compare(path("name"), CompareOperator::GreaterThan, "a").unwrap_err();
        assert_eq!(
            err,
            QueryError::InvalidOperatorForType {
                op: CompareOperator::GreaterThan,
                target: "string".into()
            }
        );
        assert!(Predicate::compare(path("flags"), CompareOperator::Equal, "true").is_err());
    }

    #[test]
    fn string_null_never_matches() {
        let item = row(None, None);
        for op in [
            CompareOperator::Equal,
            CompareOperator::NotEqual,
            CompareOperator::Contains,
        ] {
            let predicate = Predicate::compare(path("name"), op, "x").unwrap();
            assert!(!predicate.matches(&item), "{op} matched null");
        }
    }

    #[test]
    fn nullable_scalar_null_only_matches_not_equal() {
        let item = row(None, None);
        let ne = Predicate::compare(path("count"), CompareOperator::NotEqual, "1").unwrap();
        let eq = Predicate::compare(path("count"), CompareOperator::Equal, "1").unwrap();
        let lt = Predicate::compare(path("count"), CompareOperator::LessThan, "1").unwrap();
        assert!(ne.matches(&item));
        assert!(!eq.matches(&item));
        assert!(!lt.matches(&item));
    }

    #[test]
    fn sequence_contains() {
        let mut item = row(None, None);
        let predicate = Predicate::compare(path("flags"), CompareOperator::Contains, "1").unwrap();
        assert!(!predicate.matches(&item));

        item.flags = Some(vec![false]);
        assert!(!predicate.matches(&item));

        item.flags = Some(vec![false, true]);
        assert!(predicate.matches(&item));
    }

    #[test]
    fn empty_search_term_builds_nothing() {
        assert!(build_search::<Row>("").is_none());
        let request = QueryRequest::new().search("");
        assert!(build_filters::<Row>(&request, None).is_empty());
    }

    #[test]
    fn search_covers_direct_string_fields() {
        let search = build_search::<Row>("ot").unwrap();
        assert_eq!(
            search.to_string(),
            r#"(p.name != null && p.name.contains("ot")) || (p.note != null && p.note.contains("ot"))"#
        );
        assert!(search.matches(&row(None, None)));
        assert!(!build_search::<Row>("zz").unwrap().matches(&row(Some("ab"), None)));
    }

    #[test]
    fn rejections_explain_drops() {
        let request = QueryRequest::new()
            .filter("missing", CompareOperator::Equal, "1")
            .filter("count", CompareOperator::Equal, "one")
            .filter("count", CompareOperator::Equal, "1");

        let (predicates, rejections) = build_filters_with_rejections::<Row>(&request, None);
        assert_eq!(predicates.len(), 1);
        assert_eq!(rejections.len(), 2);
        assert_eq!(
            rejections[0].reason,
            QueryError::UnknownField {
                field: "missing".into()
            }
        );
        assert_eq!(rejections[1].path.as_deref(), Some("count"));
        assert!(matches!(rejections[1].reason, QueryError::InvalidTerm { .. }));
    }

    #[test]
    fn display_renders_expressions() {
        let gt = Predicate::compare(path("count"), CompareOperator::GreaterThan, "5").unwrap();
        assert_eq!(gt.to_string(), "p.count > 5");

        let ne = Predicate::compare(path("name"), CompareOperator::NotEqual, "x").unwrap();
        assert_eq!(ne.to_string(), r#"p.name != null && p.name != "x""#);

        let flags = Predicate::compare(path("flags"), CompareOperator::Contains, "true").unwrap();
        assert_eq!(flags.to_string(), "p.flags != null && p.flags.contains(true)");
    }

    #[test]
    fn combinators_unwrap_singletons() {
        let gt = Predicate::compare(path("count"), CompareOperator::GreaterThan, "5").unwrap();
        assert_eq!(Predicate::any(vec![gt.clone()]), Some(gt.clone()));
        assert_eq!(Predicate::<Row>::all(vec![]), None);

        let both = Predicate::all(vec![gt.clone(), gt]).unwrap();
        assert!(both.matches(&row(None, Some(6))));
        assert!(!both.matches(&row(None, Some(5))));
    }

    #[test]
    fn matches_all_combines_with_and() {
        let predicates = vec![
            Predicate::compare(path("count"), CompareOperator::GreaterThan, "1").unwrap(),
            Predicate::compare(path("name"), CompareOperator::Equal, "a").unwrap(),
        ];
        assert!(matches_all(&predicates, &row(Some("a"), Some(2))));
        assert!(!matches_all(&predicates, &row(Some("b"), Some(2))));
        assert!(matches_all::<Row>(&[], &row(None, None)));
    }

    #[test]
    fn compare_uses_number_semantics() {
        let predicate = Predicate::compare(path("count"), CompareOperator::Equal, "7").unwrap();
        assert!(matches!(
            predicate,
            Predicate::Compare {
                operand: Operand::Number(Number::I64(7)),
                ..
            }
        ));
    }
}
