//! The canonical stats model
//!
//! A [`StatsDocument`] is the normalized, bundler-version-independent view of one
//! build-stats input. It owns one collection per entity kind ([`Module`], [`Chunk`],
//! [`Asset`], [`Entrypoint`], [`Package`]) plus the nested child compilations.
//!
//! # Implementation Model
//!
//! Storage is arena-style: every cross-entity link (module to package, chunk to module,
//! asset to chunk, chunk to parent chunk) is stored as an id and resolved through the
//! document's lookup functions. No entity owns another, so a logically cyclic chunk
//! graph never creates an ownership cycle.
//!
//! Documents are only constructed by the normalization layer. Afterwards they are
//! read-only: all accessors hand out shared references, which is what makes it safe to
//! share documents between query and validation consumers without locking.

mod asset;
mod chunk;
mod entrypoint;
mod module;
mod package;
mod raw_id;
mod resource_size;
mod stats_document;

pub use asset::Asset;
pub use chunk::Chunk;
pub use entrypoint::Entrypoint;
pub use module::Module;
pub use package::{Package, PackageInstance};
pub use raw_id::RawId;
pub use resource_size::ResourceSize;
pub use stats_document::StatsDocument;

pub(crate) use stats_document::DocumentParts;

/// Identifier of a module, unique within one document.
pub type ModuleId = String;

/// Identifier of a chunk, unique within one document.
pub type ChunkId = String;
