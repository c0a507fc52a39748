//! Implementation of the `#[derive(Queryable)]` macro.
//!
//! This module generates the static field descriptors and the field accessor
//! the lookout engine resolves property names against.

mod attrs;
mod derive;

pub use derive::queryable_derive_impl;
