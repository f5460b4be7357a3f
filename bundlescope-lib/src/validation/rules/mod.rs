use super::Rule;
use crate::Result;
use ohno::IntoAppError;
use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;
use std::sync::Arc;

mod build_time;
mod entry_size;
mod restricted_modules;
mod restricted_packages;

#[cfg(test)]
mod test_support;

/// Names of the rules available without configuration code.
pub const BUILTIN_RULES: &[&str] = &[
    "restricted-modules",
    "restricted-packages",
    "entry-download-size-limits",
    "diff-entry-download-size-limits",
    "build-time-limits",
    "diff-build-time-limits",
];

/// Look up a built-in rule by name.
#[must_use]
pub fn builtin_rule(name: &str) -> Option<Arc<dyn Rule>> {
    let rule: Arc<dyn Rule> = match name {
        "restricted-modules" => Arc::new(restricted_modules::RestrictedModules),
        "restricted-packages" => Arc::new(restricted_packages::RestrictedPackages),
        "entry-download-size-limits" => Arc::new(entry_size::EntrySizeLimits),
        "diff-entry-download-size-limits" => Arc::new(entry_size::DiffEntrySizeLimits),
        "build-time-limits" => Arc::new(build_time::BuildTimeLimits),
        "diff-build-time-limits" => Arc::new(build_time::DiffBuildTimeLimits),
        _ => return None,
    };
    Some(rule)
}

/// Decode rule parameters; absent parameters decode to the default.
fn params<P: DeserializeOwned + Default>(rule: &str, params: &JsonValue) -> Result<P> {
    if params.is_null() {
        return Ok(P::default());
    }

    serde_json::from_value(params.clone()).into_app_err_with(|| format!("invalid parameters for rule '{rule}'"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_builtin_resolves() {
        for name in BUILTIN_RULES {
            assert!(builtin_rule(name).is_some(), "{name}");
        }
        assert!(builtin_rule("no-such-rule").is_none());
    }

    #[test]
    fn test_only_diff_rules_need_a_reference() {
        for name in BUILTIN_RULES {
            let rule = builtin_rule(name).unwrap();
            assert_eq!(rule.needs_reference(), name.starts_with("diff-"), "{name}");
        }
    }
}
