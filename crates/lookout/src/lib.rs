//! Lookout - declarative filtering and sorting for in-memory collections.
//!
//! Lookout turns a plain-data [`QueryRequest`] (a free-text search term, a
//! list of filter descriptors and a list of sort descriptors) into executable
//! predicates and sort conditions over any element type implementing
//! [`Queryable`]. It provides:
//!
//! - Field resolution by name, with optional logical-name mappings onto one
//!   or more (possibly nested) field paths
//! - Search-term coercion to the field's type: strings, integers, floats,
//!   decimals, booleans, date-times and UUIDs
//! - Null-safe comparisons for nullable fields and membership tests on
//!   sequence fields
//! - Stable multi-key sorting with tie-breakers
//!
//! # Quick Start
//!
//! ```rust
//! use lookout::{
//!     build_filters, build_orders, apply_order, matches_all, CompareOperator,
//!     FieldDescriptor, FieldType, QueryRequest, Queryable, SortOrder, Value,
//! };
//!
//! struct Duck {
//!     name: String,
//!     age: Option<i32>,
//! }
//!
//! impl Queryable for Duck {
//!     fn query_fields() -> &'static [FieldDescriptor] {
//!         const FIELDS: &[FieldDescriptor] = &[
//!             FieldDescriptor::new("name", FieldType::String),
//!             FieldDescriptor::new("age", FieldType::Integer).nullable(),
//!         ];
//!         FIELDS
//!     }
//!
//!     fn query_value(&self, field: &str) -> Value<'_> {
//!         match field {
//!             "name" => Value::String(&self.name),
//!             "age" => self.age.into(),
//!             _ => Value::None,
//!         }
//!     }
//! }
//!
//! let ducks = vec![
//!     Duck { name: "Donald".into(), age: Some(7) },
//!     Duck { name: "Daisy".into(), age: Some(6) },
//!     Duck { name: "Huey".into(), age: None },
//! ];
//!
//! let request = QueryRequest::new()
//!     .search("D")
//!     .filter("age", CompareOperator::GreaterThan, "5")
//!     .sort("age", SortOrder::Ascending);
//!
//! let filters = build_filters::<Duck>(&request, None);
//! let orders = build_orders::<Duck>(&request.sorts, None).unwrap();
//!
//! let matching = ducks.iter().filter(|d| matches_all(&filters, d));
//! let sorted = apply_order(matching, &orders);
//!
//! let names: Vec<_> = sorted.iter().map(|d| d.name.as_str()).collect();
//! assert_eq!(names, ["Daisy", "Donald"]);
//! ```
//!
//! The same request can be executed in one step with
//! [`Query::from_request`], which also applies `skip` and `take`.
//!
//! # Filter Semantics
//!
//! Every filter predicate must match (AND, in declaration order). A filter
//! descriptor that names several paths through a [`PropertyMapping`] matches
//! when any of its paths does (OR). Descriptors that cannot be applied are
//! dropped rather than failing the request: unknown properties, operators
//! that do not fit the field type, and search terms that do not parse. Use
//! [`build_filters_with_rejections`] to see what was dropped and why.
//!
//! # Field Types and Operators
//!
//! | Type | Operators |
//! |------|-----------|
//! | String | `Equal`, `NotEqual`, `Contains` |
//! | Numbers, DateTime | `Equal`, `NotEqual`, `GreaterThan`, `GreaterThanOrEqual`, `LessThan`, `LessThanOrEqual` |
//! | Bool, Uuid | `Equal`, `NotEqual` |
//! | Sequence of any type | `Contains` |
//! | Object | none (sort only) |
//!
//! # Null Handling
//!
//! String comparisons never match a null field. Other nullable fields follow
//! lifted comparison: null is unequal to every value and never ordered
//! against one. A float NaN is treated the same way.
//!
//! Sorting uses a total order: null is the lowest value, NaN sorts below
//! every other number, and opaque objects rank equal.

mod error;
mod field;
mod filter;
mod op;
mod operand;
mod order;
mod ordering;
mod query;
mod request;
mod resolve;
mod value;

// Re-export public API
pub use error::{QueryError, Result};
pub use field::{FieldDescriptor, FieldType, QueryTimestamp, Queryable};
pub use filter::{
    build_filter, build_filters, build_filters_with_rejections, build_search, matches_all,
    Predicate, Rejection, PARAMETER,
};
pub use op::CompareOperator;
pub use operand::Operand;
pub use order::{
    apply_order, build_order_condition, build_orders, order_by, OrderCondition, Ordered,
};
pub use ordering::{compare_values, sort_values, Dir, SortOrder};
pub use query::Query;
pub use request::{FilterDescriptor, QueryRequest, SortDescriptor};
pub use resolve::{resolve, string_fields, Accessor, FieldPath, PropertyMapping};
pub use value::{Number, Timestamp, Value};
