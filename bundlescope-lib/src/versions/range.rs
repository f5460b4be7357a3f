use super::parse;
use semver::VersionReq;

/// Parse an npm-style range into the alternatives it accepts.
///
/// Supports `||` alternatives, hyphen ranges (`1.2.3 - 2.0.0`), space separated
/// comparators, and bare versions, which match exactly.
#[must_use]
pub fn parse_range(range: &str) -> Option<Vec<VersionReq>> {
    range.split("||").map(parse_comparator_set).collect()
}

/// Whether `version` satisfies the npm-style `range`.
#[must_use]
pub fn satisfies(version: &str, range: &str) -> bool {
    let (Some(version), Some(alternatives)) = (parse(version), parse_range(range)) else {
        return false;
    };

    alternatives.iter().any(|req| req.matches(&version))
}

fn parse_comparator_set(set: &str) -> Option<VersionReq> {
    let tokens: Vec<&str> = set.split_whitespace().collect();

    if let [low, "-", high] = tokens.as_slice() {
        return VersionReq::parse(&format!(">={}, <={}", strip_v(low), strip_v(high))).ok();
    }

    let mut comparators = Vec::new();
    let mut pending_op: Option<&str> = None;

    for token in tokens {
        if token.chars().all(|c| matches!(c, '<' | '>' | '=' | '~' | '^')) {
            // an operator separated from its version by whitespace
            pending_op = Some(token);
            continue;
        }

        let comparator = match pending_op.take() {
            Some(op) => format!("{op}{}", strip_v(token)),
            None => normalize_comparator(token),
        };

        comparators.push(comparator);
    }

    if pending_op.is_some() {
        return None;
    }

    if comparators.is_empty() {
        return Some(VersionReq::STAR);
    }

    VersionReq::parse(&comparators.join(", ")).ok()
}

fn normalize_comparator(token: &str) -> String {
    let op_len = token
        .find(|c: char| !matches!(c, '<' | '>' | '=' | '~' | '^'))
        .unwrap_or(token.len());
    let (op, version) = token.split_at(op_len);
    let version = strip_v(version);

    let is_wildcard = version.is_empty() || version.contains(['x', 'X', '*']);
    if op.is_empty() && !is_wildcard {
        format!("={version}")
    } else {
        format!("{op}{version}")
    }
}

fn strip_v(version: &str) -> &str {
    version
        .strip_prefix('v')
        .or_else(|| version.strip_prefix('V'))
        .unwrap_or(version)
}
