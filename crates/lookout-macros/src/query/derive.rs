//! Implementation of the `#[derive(Queryable)]` macro.
//!
//! This macro generates an implementation of the `Queryable` trait (static
//! field descriptors plus a field accessor) and field name constants.

use std::collections::HashSet;

use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::{
    ext::IdentExt, spanned::Spanned, Data, DeriveInput, Error, Fields, GenericArgument,
    PathArguments, Result, Type,
};

use super::attrs::{parse_query_attrs, QueryType};

/// How a field wraps its terminal type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Shape {
    Plain,
    Optional,
    Sequence,
    OptionalSequence,
}

impl Shape {
    fn nullable(self) -> bool {
        matches!(self, Shape::Optional | Shape::OptionalSequence)
    }

    fn enumerable(self) -> bool {
        matches!(self, Shape::Sequence | Shape::OptionalSequence)
    }
}

/// Main implementation of the Queryable derive macro.
pub fn queryable_derive_impl(input: DeriveInput) -> Result<TokenStream> {
    let struct_name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => &named.named,
            _ => {
                return Err(Error::new(
                    input.span(),
                    "Queryable can only be derived for structs with named fields",
                ))
            }
        },
        _ => {
            return Err(Error::new(
                input.span(),
                "Queryable can only be derived for structs",
            ))
        }
    };

    let mut descriptors: Vec<TokenStream> = Vec::new();
    let mut field_matches: Vec<TokenStream> = Vec::new();
    let mut field_constants: Vec<TokenStream> = Vec::new();
    let mut seen = HashSet::new();

    for field in fields.iter() {
        let field_name = field
            .ident
            .as_ref()
            .ok_or_else(|| Error::new(field.span(), "expected named field"))?;

        let query_attrs = parse_query_attrs(&field.attrs)?;
        if query_attrs.skip {
            continue;
        }

        let (shape, terminal) = analyze(&field.ty);

        // Types with no terminal mapping (nested structs, enums) are opaque.
        let query_type = query_attrs
            .query_type
            .or_else(|| type_name(terminal).and_then(|name| QueryType::infer(&name)))
            .unwrap_or(QueryType::Object);

        let query_name = query_attrs
            .rename
            .unwrap_or_else(|| field_name.unraw().to_string());
        if !seen.insert(query_name.to_ascii_lowercase()) {
            return Err(Error::new(
                field.span(),
                format!("duplicate query field name '{}'", query_name),
            ));
        }

        let const_name = format_ident!("{}", to_screaming_snake_case(&query_name));
        field_constants.push(quote! {
            /// Query field name.
            pub const #const_name: &str = #query_name;
        });

        let field_type = query_type.field_type_tokens();
        let nullable = shape.nullable().then(|| quote! { .nullable() });
        let enumerable = shape.enumerable().then(|| quote! { .enumerable() });
        descriptors.push(quote! {
            ::lookout::FieldDescriptor::new(#query_name, #field_type) #nullable #enumerable
        });

        let place = quote! { self.#field_name };
        let value_expr = access_expr(shape, &place, terminal_expr(query_type));
        field_matches.push(quote! {
            #query_name => #value_expr,
        });
    }

    let expanded = quote! {
        impl #impl_generics #struct_name #ty_generics #where_clause {
            #(#field_constants)*
        }

        impl #impl_generics ::lookout::Queryable for #struct_name #ty_generics #where_clause {
            fn query_fields() -> &'static [::lookout::FieldDescriptor] {
                const FIELDS: &[::lookout::FieldDescriptor] = &[
                    #(#descriptors),*
                ];
                FIELDS
            }

            fn query_value(&self, field: &str) -> ::lookout::Value<'_> {
                match field {
                    #(#field_matches)*
                    _ => ::lookout::Value::None,
                }
            }
        }
    };

    Ok(expanded)
}

/// Converts a reference `v` to the terminal type into a `lookout::Value`.
fn terminal_expr(query_type: QueryType) -> TokenStream {
    match query_type {
        QueryType::String => {
            quote! { ::lookout::Value::String(::core::convert::AsRef::<str>::as_ref(v)) }
        }
        QueryType::Integer
        | QueryType::Unsigned
        | QueryType::Single
        | QueryType::Double
        | QueryType::Decimal => {
            quote! { ::lookout::Value::Number(::lookout::Number::from(*v)) }
        }
        QueryType::Bool => quote! { ::lookout::Value::Bool(*v) },
        QueryType::DateTime => {
            quote! {
                ::lookout::Value::Timestamp(::lookout::QueryTimestamp::query_timestamp(v))
            }
        }
        QueryType::Uuid => quote! { ::lookout::Value::Uuid(*v) },
        QueryType::Object => quote! {
            {
                let _ = v;
                ::lookout::Value::Object
            }
        },
    }
}

/// Wraps the terminal conversion according to the field's shape.
fn access_expr(shape: Shape, place: &TokenStream, terminal: TokenStream) -> TokenStream {
    match shape {
        Shape::Plain => quote! {
            {
                let v = &#place;
                #terminal
            }
        },
        Shape::Optional => quote! {
            match &#place {
                ::core::option::Option::Some(v) => #terminal,
                ::core::option::Option::None => ::lookout::Value::None,
            }
        },
        Shape::Sequence => quote! {
            ::lookout::Value::List(
                ::core::iter::IntoIterator::into_iter(&#place)
                    .map(|v| #terminal)
                    .collect()
            )
        },
        Shape::OptionalSequence => quote! {
            match &#place {
                ::core::option::Option::Some(items) => ::lookout::Value::List(
                    ::core::iter::IntoIterator::into_iter(items)
                        .map(|v| #terminal)
                        .collect()
                ),
                ::core::option::Option::None => ::lookout::Value::None,
            }
        },
    }
}

/// Splits a field type into its shape and terminal type.
fn analyze(ty: &Type) -> (Shape, &Type) {
    if let Some(inner) = generic_argument(ty, &["Option"]) {
        return match sequence_element(inner) {
            Some(element) => (Shape::OptionalSequence, element),
            None => (Shape::Optional, inner),
        };
    }
    match sequence_element(ty) {
        Some(element) => (Shape::Sequence, element),
        None => (Shape::Plain, ty),
    }
}

fn sequence_element(ty: &Type) -> Option<&Type> {
    generic_argument(ty, &["Vec", "VecDeque", "BTreeSet", "HashSet"])
}

/// Returns the first type argument of `ty` if its last path segment is one
/// of `wrappers`.
fn generic_argument<'a>(ty: &'a Type, wrappers: &[&str]) -> Option<&'a Type> {
    let Type::Path(type_path) = ty else {
        return None;
    };
    let segment = type_path.path.segments.last()?;
    if !wrappers.iter().any(|w| segment.ident == w) {
        return None;
    }
    match &segment.arguments {
        PathArguments::AngleBracketed(args) => args.args.iter().find_map(|arg| match arg {
            GenericArgument::Type(inner) => Some(inner),
            _ => None,
        }),
        _ => None,
    }
}

/// The last path segment of a type, looking through references.
fn type_name(ty: &Type) -> Option<String> {
    match ty {
        Type::Path(type_path) => type_path
            .path
            .segments
            .last()
            .map(|segment| segment.ident.to_string()),
        Type::Reference(reference) => type_name(&reference.elem),
        Type::Group(group) => type_name(&group.elem),
        _ => None,
    }
}

/// Convert a field name to SCREAMING_SNAKE_CASE.
///
/// Word boundaries are lower-to-upper transitions and the last capital of an
/// acronym followed by a lowercase letter.
fn to_screaming_snake_case(s: &str) -> String {
    let chars: Vec<char> = s.chars().collect();
    let mut result = String::with_capacity(s.len() + 4);

    for (i, &c) in chars.iter().enumerate() {
        if c == '-' || c == '_' {
            result.push('_');
            continue;
        }
        if c.is_uppercase() && i > 0 {
            let prev = chars[i - 1];
            let next_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            if prev.is_lowercase() || prev.is_ascii_digit() || (prev.is_uppercase() && next_lower)
            {
                result.push('_');
            }
        }
        result.extend(c.to_uppercase());
    }

    result
}
