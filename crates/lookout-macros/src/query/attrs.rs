//! Attribute parsing for the Queryable derive macro.
//!
//! This module provides parsers for the `#[query(...)]` field attributes
//! used by the `Queryable` derive macro.

use proc_macro2::{Span, TokenStream};
use quote::quote;
use syn::{
    parse::{Parse, ParseStream},
    punctuated::Punctuated,
    spanned::Spanned,
    Attribute, Error, Ident, Lit, Meta, Result, Token,
};

const EXPECTED: &str =
    "String, Integer, Unsigned, Single, Double, Decimal, Bool, DateTime, Uuid, Object";

/// The terminal type of a queryable field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryType {
    /// Text: `#[query(String)]`
    String,
    /// Signed integer: `#[query(Integer)]`
    Integer,
    /// Unsigned integer: `#[query(Unsigned)]`
    Unsigned,
    /// 32-bit float: `#[query(Single)]`
    Single,
    /// 64-bit float: `#[query(Double)]`
    Double,
    /// Decimal: `#[query(Decimal)]`
    Decimal,
    /// Boolean: `#[query(Bool)]`
    Bool,
    /// Date-time: `#[query(DateTime)]`
    DateTime,
    /// UUID: `#[query(Uuid)]`
    Uuid,
    /// Opaque value, sortable only: `#[query(Object)]`
    Object,
}

impl QueryType {
    /// Parse a query type from a name, accepting a few aliases.
    pub fn from_name(name: &str, span: Span) -> Result<Self> {
        match name {
            "String" | "string" | "str" => Ok(QueryType::String),
            "Integer" | "integer" | "int" => Ok(QueryType::Integer),
            "Unsigned" | "unsigned" => Ok(QueryType::Unsigned),
            "Single" | "single" | "f32" => Ok(QueryType::Single),
            "Double" | "double" | "f64" => Ok(QueryType::Double),
            "Decimal" | "decimal" => Ok(QueryType::Decimal),
            "Bool" | "bool" | "boolean" => Ok(QueryType::Bool),
            "DateTime" | "datetime" | "Timestamp" | "timestamp" => Ok(QueryType::DateTime),
            "Uuid" | "uuid" | "Guid" | "guid" => Ok(QueryType::Uuid),
            "Object" | "object" => Ok(QueryType::Object),
            other => Err(Error::new(
                span,
                format!("unknown query type: '{}'. Expected one of: {}", other, EXPECTED),
            )),
        }
    }

    /// Parse a query type from an identifier.
    pub fn from_ident(ident: &Ident) -> Result<Self> {
        QueryType::from_name(&ident.to_string(), ident.span())
    }

    /// Infers the query type from a Rust type name.
    ///
    /// Only the last path segment is considered, so `chrono::DateTime<Utc>`
    /// and `DateTime<Utc>` both map to [`QueryType::DateTime`].
    pub fn infer(type_name: &str) -> Option<Self> {
        let ty = match type_name {
            "String" | "str" | "Cow" => QueryType::String,
            "i8" | "i16" | "i32" | "i64" | "isize" => QueryType::Integer,
            "u8" | "u16" | "u32" | "u64" | "usize" => QueryType::Unsigned,
            "f32" => QueryType::Single,
            "f64" => QueryType::Double,
            "Decimal" => QueryType::Decimal,
            "bool" => QueryType::Bool,
            "DateTime" | "NaiveDateTime" | "NaiveDate" | "SystemTime" | "Timestamp" => {
                QueryType::DateTime
            }
            "Uuid" => QueryType::Uuid,
            _ => return None,
        };
        Some(ty)
    }

    /// Tokens naming the matching `lookout::FieldType` variant.
    pub fn field_type_tokens(self) -> TokenStream {
        match self {
            QueryType::String => quote! { ::lookout::FieldType::String },
            QueryType::Integer => quote! { ::lookout::FieldType::Integer },
            QueryType::Unsigned => quote! { ::lookout::FieldType::Unsigned },
            QueryType::Single => quote! { ::lookout::FieldType::Single },
            QueryType::Double => quote! { ::lookout::FieldType::Double },
            QueryType::Decimal => quote! { ::lookout::FieldType::Decimal },
            QueryType::Bool => quote! { ::lookout::FieldType::Bool },
            QueryType::DateTime => quote! { ::lookout::FieldType::DateTime },
            QueryType::Uuid => quote! { ::lookout::FieldType::Uuid },
            QueryType::Object => quote! { ::lookout::FieldType::Object },
        }
    }
}

/// Field-level attributes from `#[query(...)]`.
#[derive(Debug, Clone)]
pub struct QueryAttr {
    /// Explicit terminal type; inferred from the field type when absent.
    pub query_type: Option<QueryType>,
    /// Skip this field from querying.
    pub skip: bool,
    /// Custom field name for queries (default: field name).
    pub rename: Option<String>,
    /// The span for error reporting.
    pub span: Span,
}

impl Default for QueryAttr {
    fn default() -> Self {
        QueryAttr {
            query_type: None,
            skip: false,
            rename: None,
            span: Span::call_site(),
        }
    }
}

impl Parse for QueryAttr {
    fn parse(input: ParseStream) -> Result<Self> {
        let mut attr = QueryAttr::default();

        let content: Punctuated<Meta, Token![,]> = Punctuated::parse_terminated(input)?;

        for meta in content {
            match &meta {
                // Type identifier: query(String), query(Integer), etc.
                Meta::Path(p) => {
                    if p.is_ident("skip") {
                        attr.skip = true;
                    } else if let Some(ident) = p.get_ident() {
                        attr.query_type = Some(QueryType::from_ident(ident)?);
                        attr.span = ident.span();
                    } else {
                        return Err(Error::new(
                            p.span(),
                            format!("expected query type ({}) or skip", EXPECTED),
                        ));
                    }
                }

                // rename = "custom_name" or ty = "datetime"
                Meta::NameValue(nv) => {
                    let value = match &nv.value {
                        syn::Expr::Lit(syn::ExprLit {
                            lit: Lit::Str(s), ..
                        }) => s,
                        other => {
                            return Err(Error::new(
                                other.span(),
                                "attribute value must be a string literal",
                            ))
                        }
                    };

                    if nv.path.is_ident("rename") {
                        attr.rename = Some(value.value());
                    } else if nv.path.is_ident("ty") {
                        attr.query_type = Some(QueryType::from_name(&value.value(), value.span())?);
                        attr.span = value.span();
                    } else {
                        return Err(Error::new(
                            nv.path.span(),
                            "unknown attribute. Expected: rename or ty",
                        ));
                    }
                }

                _ => {
                    return Err(Error::new(
                        meta.span(),
                        "unknown query attribute. Expected a type, skip, rename = \"...\", or ty = \"...\"",
                    ));
                }
            }
        }

        Ok(attr)
    }
}

/// Extract `#[query(...)]` attributes from a field's attributes.
pub fn parse_query_attrs(attrs: &[Attribute]) -> Result<QueryAttr> {
    for attr in attrs {
        if attr.path().is_ident("query") {
            return attr.parse_args::<QueryAttr>();
        }
    }
    Ok(QueryAttr::default())
}
