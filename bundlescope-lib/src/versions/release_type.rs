use super::compare::{compare, parse};
use core::cmp::Ordering;
use serde::Serialize;
use strum::{Display, EnumString};

/// Kind of version bump between two versions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ReleaseType {
    Major,
    Minor,
    Patch,
    Premajor,
    Preminor,
    Prepatch,
    Prerelease,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Upgrade,
    Downgrade,
}

/// A classified transition from one version to another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct VersionChange {
    pub release: ReleaseType,
    pub direction: Direction,
}

impl VersionChange {
    /// Classify the move from `from` to `to`; `None` when equal or unparseable.
    #[must_use]
    pub fn between(from: &str, to: &str) -> Option<Self> {
        let release = diff(from, to)?;
        let direction = if compare(from, to) == Some(Ordering::Greater) {
            Direction::Downgrade
        } else {
            Direction::Upgrade
        };

        Some(Self { release, direction })
    }
}

/// The release type separating two versions.
///
/// Returns `None` when the versions are equal or either cannot be parsed.
#[must_use]
pub fn diff(a: &str, b: &str) -> Option<ReleaseType> {
    let v1 = parse(a)?;
    let v2 = parse(b)?;

    let (high, low) = match v1.cmp_precedence(&v2) {
        Ordering::Equal => return None,
        Ordering::Greater => (&v1, &v2),
        Ordering::Less => (&v2, &v1),
    };

    let high_has_pre = !high.pre.is_empty();
    let low_has_pre = !low.pre.is_empty();

    if low_has_pre && !high_has_pre {
        // moving from a prerelease to its own release
        if low.patch == 0 && low.minor == 0 {
            return Some(ReleaseType::Major);
        }

        if (low.major, low.minor, low.patch) == (high.major, high.minor, high.patch) {
            return Some(if low.minor != 0 && low.patch == 0 {
                ReleaseType::Minor
            } else {
                ReleaseType::Patch
            });
        }
    }

    let release = if v1.major != v2.major {
        pick(high_has_pre, ReleaseType::Premajor, ReleaseType::Major)
    } else if v1.minor != v2.minor {
        pick(high_has_pre, ReleaseType::Preminor, ReleaseType::Minor)
    } else if v1.patch != v2.patch {
        pick(high_has_pre, ReleaseType::Prepatch, ReleaseType::Patch)
    } else {
        ReleaseType::Prerelease
    };

    Some(release)
}

const fn pick(pre: bool, if_pre: ReleaseType, otherwise: ReleaseType) -> ReleaseType {
    if pre { if_pre } else { otherwise }
}
