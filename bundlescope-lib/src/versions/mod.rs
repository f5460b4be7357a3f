//! Semantic version parsing, comparison, and transition classification
//!
//! Every function here fails softly: malformed versions or ranges yield `None` or
//! `false`, never an error. Build metadata is ignored when comparing.

mod compare;
mod range;
mod release_type;

pub use compare::{eq, gt, gte, lt, lte, parse};
pub use range::{parse_range, satisfies};
pub use release_type::{Direction, ReleaseType, VersionChange, diff};
