//! Diff items, limits, and structural document diffs
//!
//! [`DiffItem`] is the typed before/after pair used throughout reports, [`Limit`]
//! expresses a threshold on a [`ValueDiff`], and [`compare`] walks two documents to
//! produce a [`DocumentDiff`].

mod compare;
mod item;
mod limit;

pub use compare::{DiffEntry, DocumentDiff, EntityDiff, PackageChange, SizeChange, compare};
pub use item::{DiffItem, PluralHint, format_diff};
pub use limit::{Limit, LimitInput, ValueDiff, is_within_limit, normalize_limit};
