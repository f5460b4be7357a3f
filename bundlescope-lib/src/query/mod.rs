//! Declarative query evaluation over the model
//!
//! Queries are [CEL](https://cel.dev) expressions. A [`QueryEngine`] exposes three
//! variables to every query:
//!
//! - `files`: the normalized input documents, as a list
//! - `compilations`: every compilation of every input, flattened
//! - `data`: the explicit data argument of the call, or `files` when none is given
//!
//! plus the named methods of a [`MethodSet`] (`formatSize(x)`, `semverGT(a, b)`, ...).
//! Methods are called as global functions.
//!
//! # Implementation Model
//!
//! The method set is resolved once, when the engine is built: built-in methods first,
//! graph methods bound to the loaded documents next, and caller-supplied methods last.
//! A later method with the same name replaces an earlier one. The resulting CEL context
//! is immutable; each query runs in an inner scope that only adds `data`.

mod engine;
mod methods;
mod query;
mod value;

pub use engine::QueryEngine;
pub use methods::{Method, MethodSet};
pub use query::Query;
pub use value::{from_cel, to_cel};
