#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Core library for bundlescope
//!
//! This library ingests bundler build statistics, normalizes them into a canonical
//! entity model, and layers a query, diff, and validation engine on top.
//!
//! # Module Organization
//!
//! - [`extensions`]: Auxiliary data attached to stats documents
//! - [`graph`]: Generic directed graph with bounded path search
//! - [`versions`]: Semantic version parsing, comparison, and transition classification
//! - [`model`]: The canonical, read-only stats model
//! - [`normalize`]: Raw stats parsing and normalization
//! - [`helpers`]: Formatting and matching helpers shared by queries and rules
//! - [`diff`]: Diff items, limits, and structural document diffs
//! - [`query`]: Declarative query evaluation over the model
//! - [`validation`]: Rule execution and finding collection
//! - [`commands`]: Command-line interface and orchestration

pub type Result<T, E = ohno::AppError> = core::result::Result<T, E>;

pub(crate) type HashMap<K, V> = rustc_hash::FxHashMap<K, V>;
pub(crate) type HashSet<T> = rustc_hash::FxHashSet<T>;

pub mod commands;
pub mod diff;
pub mod extensions;
pub mod graph;
pub mod helpers;
pub mod model;
pub mod normalize;
pub mod query;
pub mod validation;
pub mod versions;

pub use crate::commands::{Host, run};
