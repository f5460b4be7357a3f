//! Raw stats parsing and normalization
//!
//! Converts a raw, bundler-version-specific stats document into a [`StatsDocument`].
//!
//! # Implementation Model
//!
//! Normalization runs in fixed phases for each compilation:
//!
//! 1. The stream is decoded into permissive raw views, the raw layout is detected, and
//!    the matching field mapping extracts modules, chunks, assets, and entrypoints.
//! 2. Entities are indexed by id; duplicates are merged or dropped.
//! 3. Cross references are resolved; references to unknown entities are dropped.
//! 4. Compressed sizes from the compressed-size extension are joined on the raw module
//!    ids and asset names. This only happens after the structure is final.
//! 5. Chunk and entrypoint sizes are aggregated, then packages are derived from module
//!    resource paths and versioned from the package-info extension.
//!
//! Child compilations go through the same phases. They join against their own
//! extension records when they carry any, and against the root records otherwise.
//!
//! [`StatsDocument`]: crate::model::StatsDocument

mod loader;
mod normalizer;
mod raw;
mod shape;
mod webpack4;
mod webpack5;

pub use loader::{load_files, normalize_file, normalize_reader};
pub use normalizer::normalize_value;
pub use shape::RawShapeVersion;
