//! Auxiliary data attached to stats documents
//!
//! Extensions are opaque payloads produced by external generators (compressed size
//! tables, package information, custom user reports) and carried alongside a stats
//! document. The core only defines the storage contract: records are keyed by an
//! [`ExtensionDescriptor`] and looked up by name, with the most recently registered
//! record for a name taking precedence.
//!
//! # Implementation Model
//!
//! [`ExtensionRegistry`] is an append-only list of [`ExtensionRecord`] values. Lookups
//! scan from the back so that later registrations shadow earlier ones without any
//! uniqueness bookkeeping. A missing extension is always represented as `None`.
//!
//! The well-known payload shapes are described by typed views that callers decode on
//! demand:
//!
//! - [`CompressedPayload`]: per-resource compressed sizes
//! - [`PackageInfoPayload`]: resolved package versions per installation path
//! - [`CustomReportsPayload`]: user-supplied reports, built with [`CustomReportsGenerator`]

mod compressed;
mod custom_reports;
mod descriptor;
mod package_info;
mod registry;

pub use compressed::{COMPRESSED_EXTENSION, CompressedCompilation, CompressedPayload, CompressedResource, CompressedSize};
pub use custom_reports::{CUSTOM_REPORTS_EXTENSION, CustomReport, CustomReportsGenerator, CustomReportsPayload};
pub use descriptor::{ExtensionDescriptor, ExtensionRecord};
pub use package_info::{PACKAGE_INFO_EXTENSION, PackageInfo, PackageInfoCompilation, PackageInfoInstance, PackageInfoPayload};
pub use registry::ExtensionRegistry;
