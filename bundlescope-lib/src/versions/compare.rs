use core::cmp::Ordering;
use semver::Version;

/// Parse a version, accepting a leading `v` or `=` and surrounding whitespace.
#[must_use]
pub fn parse(version: &str) -> Option<Version> {
    let trimmed = version.trim();
    let trimmed = trimmed.strip_prefix('=').unwrap_or(trimmed).trim_start();
    let trimmed = trimmed
        .strip_prefix('v')
        .or_else(|| trimmed.strip_prefix('V'))
        .unwrap_or(trimmed);

    Version::parse(trimmed).ok()
}

pub(super) fn compare(a: &str, b: &str) -> Option<Ordering> {
    Some(parse(a)?.cmp_precedence(&parse(b)?))
}

#[must_use]
pub fn gt(a: &str, b: &str) -> bool {
    compare(a, b) == Some(Ordering::Greater)
}

#[must_use]
pub fn gte(a: &str, b: &str) -> bool {
    matches!(compare(a, b), Some(Ordering::Greater | Ordering::Equal))
}

#[must_use]
pub fn lt(a: &str, b: &str) -> bool {
    compare(a, b) == Some(Ordering::Less)
}

#[must_use]
pub fn lte(a: &str, b: &str) -> bool {
    matches!(compare(a, b), Some(Ordering::Less | Ordering::Equal))
}

#[must_use]
pub fn eq(a: &str, b: &str) -> bool {
    compare(a, b) == Some(Ordering::Equal)
}
