//! Implementation of the `#[derive(Listable)]` macro.
//!
//! Generates field accessors, field-name constants, search and sort field
//! lists, the id accessor and the default sort from `#[list(...)]`
//! annotations.

mod attrs;
mod derive;

pub use derive::listable_derive_impl;
