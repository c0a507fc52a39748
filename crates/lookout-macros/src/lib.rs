//! Proc macros for Lookout.
//!
//! # Available Macros
//!
//! - [`Queryable`] - Generate field descriptors and a field accessor so a
//!   struct can be filtered and sorted by `lookout`

mod query;

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

/// Derives the `Queryable` trait for filterable structs.
///
/// Every named field becomes queryable under its own name. `Option<_>`
/// fields are nullable and `Vec<_>`, `VecDeque<_>`, `HashSet<_>` or
/// `BTreeSet<_>` fields are sequences; both wrappers may be combined.
/// Fields of unrecognised types (nested structs, enums) are opaque: they can
/// be sorted by but all present values rank equal, and filters on them are
/// rejected. Reach their members through a `PropertyMapping`.
///
/// # Field Attributes
///
/// | Attribute | Description |
/// |-----------|-------------|
/// | `String` | Text (`String`, `&str`, `Cow<str>`); supports Equal, NotEqual, Contains |
/// | `Integer`, `Unsigned` | Signed and unsigned integers |
/// | `Single`, `Double`, `Decimal` | `f32`, `f64`, `rust_decimal::Decimal` |
/// | `DateTime` | Any type implementing `QueryTimestamp` |
/// | `Bool`, `Uuid` | Equality only |
/// | `Object` | Opaque; sortable only |
/// | `skip` | Exclude this field from queries |
/// | `rename = "..."` | Use a custom name for queries |
/// | `ty = "..."` | Type by name, e.g. `ty = "datetime"` |
///
/// The type attribute is only needed when the field's type name does not
/// reveal it, e.g. a newtype implementing `QueryTimestamp`.
///
/// # Generated Code
///
/// 1. Field name constants (e.g., `Task::NAME`, `Task::PRIORITY`)
/// 2. `Queryable::query_fields()` returning a static descriptor table
/// 3. `Queryable::query_value()` matching field names to values
///
/// # Example
///
/// ```ignore
/// use lookout::{CompareOperator, Query, QueryRequest};
/// use lookout_macros::Queryable;
///
/// #[derive(Queryable)]
/// struct Task {
///     name: String,
///     priority: Option<u8>,
///     tags: Vec<String>,
///     #[query(skip)]
///     internal_id: u64,
/// }
///
/// let tasks = vec![
///     Task { name: "Write docs".into(), priority: Some(3), tags: vec![], internal_id: 1 },
///     Task { name: "Fix bug".into(), priority: None, tags: vec![], internal_id: 2 },
/// ];
///
/// let request = QueryRequest::new().filter(Task::PRIORITY, CompareOperator::GreaterThan, "1");
/// let query = Query::<Task>::from_request(&request, None).unwrap();
///
/// let results = query.filter(&tasks);
/// assert_eq!(results.len(), 1);
/// assert_eq!(results[0].name, "Write docs");
/// ```
#[proc_macro_derive(Queryable, attributes(query))]
pub fn queryable_derive(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    query::queryable_derive_impl(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}
