use super::{Api, Finding, FindingType};
use serde::Serialize;
use std::collections::BTreeMap;

/// Filename used for findings reported without one.
pub const UNKNOWN_FILE: &str = "unknown";

/// Findings of a run, grouped by filename.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FindingStorage {
    files: BTreeMap<String, Vec<Finding>>,
}

impl FindingStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, filename: Option<&str>, finding: Finding) {
        self.files
            .entry(filename.unwrap_or(UNKNOWN_FILE).to_string())
            .or_default()
            .push(finding);
    }

    /// A reporting handle that attributes findings to `rule`.
    pub fn api<'a>(&'a mut self, rule: &'a str) -> impl Api + 'a {
        RuleApi { storage: self, rule }
    }

    pub fn files(&self) -> impl Iterator<Item = (&str, &[Finding])> {
        self.files.iter().map(|(name, findings)| (name.as_str(), findings.as_slice()))
    }

    pub fn findings(&self) -> impl Iterator<Item = &Finding> {
        self.files.values().flatten()
    }

    #[must_use]
    pub fn count(&self, kind: FindingType) -> usize {
        self.findings().filter(|finding| finding.kind == kind).count()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.files.values().map(Vec::len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

struct RuleApi<'a> {
    storage: &'a mut FindingStorage,
    rule: &'a str,
}

impl Api for RuleApi<'_> {
    fn report(&mut self, kind: FindingType, message: &str, filename: Option<&str>) {
        self.storage.add(
            filename,
            Finding {
                kind,
                message: message.to_string(),
                rule: self.rule.to_string(),
            },
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grouping_and_counts() {
        let mut storage = FindingStorage::new();
        {
            let mut api = storage.api("r1");
            api.error("bad", Some("b.js"));
            api.warn("meh", Some("a.js"));
            api.info("fyi", None);
            api.error("worse", Some("b.js"));
        }

        let files: Vec<_> = storage.files().map(|(name, findings)| (name, findings.len())).collect();
        assert_eq!(files, [("a.js", 1), ("b.js", 2), (UNKNOWN_FILE, 1)]);
        assert_eq!(storage.count(FindingType::Error), 2);
        assert_eq!(storage.count(FindingType::Warn), 1);
        assert_eq!(storage.len(), 4);
        assert!(storage.findings().all(|finding| finding.rule == "r1"));
    }
}
