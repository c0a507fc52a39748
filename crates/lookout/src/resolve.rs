//! Property resolution.
//!
//! A descriptor names a property by text. Resolution turns that name into
//! one or more [`FieldPath`]s: typed accessors that know the terminal type of
//! the value they reach. A [`PropertyMapping`] can redirect a logical name to
//! nested or aliased properties.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::field::{FieldDescriptor, FieldType, Queryable};
use crate::value::Value;

/// Shared accessor closure from an element to one of its values.
pub type Accessor<T> = Arc<dyn for<'a> Fn(&'a T) -> Value<'a> + Send + Sync>;

/// A resolved member-access path on element type `T`.
///
/// Paths are cheap to clone and can be shared across threads.
pub struct FieldPath<T> {
    name: String,
    field_type: FieldType,
    nullable: bool,
    enumerable: bool,
    accessor: Accessor<T>,
}

impl<T> FieldPath<T> {
    /// Creates a path from an accessor closure.
    ///
    /// The name is used for display and structural comparison only; it may
    /// be dotted to describe a nested member.
    ///
    /// ```
    /// use lookout::{FieldPath, FieldType, Value};
    ///
    /// struct Alpha {
    ///     scores: Vec<i32>,
    /// }
    ///
    /// let path = FieldPath::new("scores", FieldType::Integer, |a: &Alpha| {
    ///     Value::List(a.scores.iter().copied().map(Value::from).collect())
    /// })
    /// .enumerable();
    ///
    /// let alpha = Alpha { scores: vec![7, 5] };
    /// assert_eq!(path.value(&alpha).as_list().map(|l| l.len()), Some(2));
    /// ```
    pub fn new<F>(name: impl Into<String>, field_type: FieldType, accessor: F) -> Self
    where
        F: for<'a> Fn(&'a T) -> Value<'a> + Send + Sync + 'static,
    {
        FieldPath {
            name: name.into(),
            field_type,
            nullable: false,
            enumerable: false,
            accessor: Arc::new(accessor),
        }
    }

    /// Marks the path as able to yield no value.
    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    /// Marks the path as yielding a sequence of `field_type` values.
    pub fn enumerable(mut self) -> Self {
        self.enumerable = true;
        self
    }

    /// Returns the path name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the terminal type.
    pub fn field_type(&self) -> FieldType {
        self.field_type
    }

    /// Returns `true` if the path can yield no value.
    pub fn is_nullable(&self) -> bool {
        self.nullable
    }

    /// Returns `true` if the path yields a sequence.
    pub fn is_enumerable(&self) -> bool {
        self.enumerable
    }

    /// Reads the value this path reaches on an element.
    pub fn value<'a>(&self, item: &'a T) -> Value<'a> {
        (self.accessor)(item)
    }

    /// Describes the terminal type, e.g. `integer` or `sequence of integer`.
    pub fn describe(&self) -> String {
        if self.enumerable {
            format!("sequence of {}", self.field_type)
        } else {
            self.field_type.to_string()
        }
    }
}

impl<T: Queryable + 'static> FieldPath<T> {
    /// Creates a direct path to a field described by `T`'s metadata.
    pub fn from_descriptor(descriptor: &'static FieldDescriptor) -> Self {
        let name = descriptor.name;
        FieldPath {
            nullable: descriptor.nullable,
            enumerable: descriptor.enumerable,
            ..FieldPath::new(name, descriptor.field_type, move |item: &T| {
                item.query_value(name)
            })
        }
    }

    /// Creates a path through a nested queryable value.
    ///
    /// `get` reaches the nested value (returning `None` when it is absent);
    /// `inner` names a field of the nested type. The resulting path is named
    /// `outer.inner` and yields null whenever the nested value is absent.
    ///
    /// Returns `None` if `inner` is not a field of `U`.
    pub fn nested<U, G>(outer: &str, get: G, inner: &str) -> Option<Self>
    where
        U: Queryable + 'static,
        G: for<'a> Fn(&'a T) -> Option<&'a U> + Send + Sync + 'static,
    {
        let descriptor = U::field(inner)?;
        let inner_name = descriptor.name;
        let path = FieldPath::new(
            format!("{outer}.{inner_name}"),
            descriptor.field_type,
            move |item: &T| match get(item) {
                Some(nested) => nested.query_value(inner_name),
                None => Value::None,
            },
        );
        Some(FieldPath {
            nullable: true,
            enumerable: descriptor.enumerable,
            ..path
        })
    }
}

impl<T> Clone for FieldPath<T> {
    fn clone(&self) -> Self {
        FieldPath {
            name: self.name.clone(),
            field_type: self.field_type,
            nullable: self.nullable,
            enumerable: self.enumerable,
            accessor: Arc::clone(&self.accessor),
        }
    }
}

impl<T> fmt::Debug for FieldPath<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldPath")
            .field("name", &self.name)
            .field("field_type", &self.field_type)
            .field("nullable", &self.nullable)
            .field("enumerable", &self.enumerable)
            .finish_non_exhaustive()
    }
}

// Structural: two paths are equal when they describe the same member,
// whichever closure instance backs them.
impl<T> PartialEq for FieldPath<T> {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.field_type == other.field_type
            && self.nullable == other.nullable
            && self.enumerable == other.enumerable
    }
}

/// Maps logical field names to one or more concrete paths.
///
/// A filter on a mapped name checks every path (combined with OR); a sort on
/// a mapped name uses the first path only.
///
/// ```
/// use lookout::{FieldPath, FieldType, PropertyMapping, Value};
///
/// struct Contact {
///     email: Option<String>,
///     backup_email: Option<String>,
/// }
///
/// let mapping = PropertyMapping::new().with(
///     "mail",
///     vec![
///         FieldPath::new("email", FieldType::String, |c: &Contact| {
///             c.email.as_deref().into()
///         }),
///         FieldPath::new("backup_email", FieldType::String, |c: &Contact| {
///             c.backup_email.as_deref().into()
///         }),
///     ],
/// );
///
/// assert_eq!(mapping.get("mail").map(|paths| paths.len()), Some(2));
/// ```
pub struct PropertyMapping<T> {
    entries: BTreeMap<String, Vec<FieldPath<T>>>,
}

impl<T> PropertyMapping<T> {
    /// Creates an empty mapping.
    pub fn new() -> Self {
        PropertyMapping {
            entries: BTreeMap::new(),
        }
    }

    /// Maps a logical name to paths, replacing any previous entry.
    pub fn with(mut self, name: impl Into<String>, paths: Vec<FieldPath<T>>) -> Self {
        self.insert(name, paths);
        self
    }

    /// Maps a logical name to paths, replacing any previous entry.
    pub fn insert(&mut self, name: impl Into<String>, paths: Vec<FieldPath<T>>) {
        self.entries.insert(name.into(), paths);
    }

    /// Appends one path to a logical name.
    pub fn push(&mut self, name: impl Into<String>, path: FieldPath<T>) {
        self.entries.entry(name.into()).or_default().push(path);
    }

    /// Returns the paths mapped to a logical name.
    ///
    /// An exact match wins; otherwise the first ASCII case-insensitive match
    /// in byte order of the keys is used.
    pub fn get(&self, name: &str) -> Option<&[FieldPath<T>]> {
        self.entries
            .get(name)
            .or_else(|| {
                self.entries
                    .iter()
                    .find(|(key, _)| key.eq_ignore_ascii_case(name))
                    .map(|(_, paths)| paths)
            })
            .map(Vec::as_slice)
    }

    /// Returns the number of mapped logical names.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing is mapped.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T> Default for PropertyMapping<T> {
    fn default() -> Self {
        PropertyMapping::new()
    }
}

impl<T> Clone for PropertyMapping<T> {
    fn clone(&self) -> Self {
        PropertyMapping {
            entries: self.entries.clone(),
        }
    }
}

impl<T> fmt::Debug for PropertyMapping<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.entries.iter()).finish()
    }
}

/// Resolves a logical property name to concrete paths on `T`.
///
/// A mapping entry for the name takes precedence; otherwise the name is
/// looked up directly among `T`'s fields (single level). An unknown name
/// yields an empty vector and callers decide whether that is fatal.
pub fn resolve<T>(name: &str, mappings: Option<&PropertyMapping<T>>) -> Vec<FieldPath<T>>
where
    T: Queryable + 'static,
{
    if let Some(paths) = mappings.and_then(|m| m.get(name)) {
        return paths.to_vec();
    }

    T::field(name)
        .map(FieldPath::from_descriptor)
        .into_iter()
        .collect()
}

/// Returns direct paths to every non-sequence string field of `T`.
pub fn string_fields<T>() -> Vec<FieldPath<T>>
where
    T: Queryable + 'static,
{
    T::query_fields()
        .iter()
        .filter(|f| f.field_type == FieldType::String && !f.enumerable)
        .map(FieldPath::from_descriptor)
        .collect()
}
