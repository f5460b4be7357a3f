use super::params;
use crate::Result;
use crate::diff::{Limit, LimitInput, ValueDiff, is_within_limit, normalize_limit};
use crate::helpers::{download_time, format_duration, format_size, js_number, to_fixed};
use crate::model::{Entrypoint, StatsDocument};
use crate::validation::{Api, Rule, RuleData};
use ohno::app_err;
use serde::Deserialize;
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;

const LOG_TARGET: &str = "   rules";

/// Limits the initial download of every entrypoint.
///
/// Limits are bytes, or milliseconds when a network type is set.
pub struct EntrySizeLimits;

/// Limits how much the initial download of an entrypoint may grow relative to the reference.
pub struct DiffEntrySizeLimits;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct EntryLimits<L> {
    global: Option<L>,
    by_name: BTreeMap<String, L>,
    compressor: Option<String>,
    network: Option<String>,
}

impl<L> Default for EntryLimits<L> {
    fn default() -> Self {
        Self {
            global: None,
            by_name: BTreeMap::new(),
            compressor: None,
            network: None,
        }
    }
}

impl<L: Copy> EntryLimits<L> {
    fn limit_for(&self, entry: &str) -> Option<L> {
        self.by_name.get(entry).copied().or(self.global)
    }
}

/// How an entrypoint is measured: compressed or raw bytes, optionally converted into a
/// download time.
struct Measure<'a> {
    compressor: Option<&'a str>,
    network: Option<&'a str>,
}

impl<'a> Measure<'a> {
    fn new<L>(limits: &'a EntryLimits<L>, data: &RuleData<'a>) -> Self {
        Self {
            compressor: limits.compressor.as_deref().or(data.compressor),
            network: limits.network.as_deref().or(data.network),
        }
    }

    fn of(&self, entry: &Entrypoint) -> Result<f64> {
        let compressor = self.compressor.filter(|&compressor| {
            let found = entry.size.get(Some(compressor)).is_some();
            if !found {
                log::debug!(target: LOG_TARGET, "No '{compressor}' size for entry '{}', using the raw size", entry.name);
            }
            found
        });

        self.convert(entry, compressor)
    }

    /// Measure both sides of a comparison with the same kind of size.
    ///
    /// The compressed size is used only when both entries have it.
    fn pair(&self, before: &Entrypoint, after: &Entrypoint) -> Result<(f64, f64)> {
        let compressor = self.compressor.filter(|&compressor| {
            let found = before.size.get(Some(compressor)).is_some() && after.size.get(Some(compressor)).is_some();
            if !found {
                log::debug!(target: LOG_TARGET, "No '{compressor}' size on both sides of entry '{}', comparing raw sizes", after.name);
            }
            found
        });

        Ok((self.convert(before, compressor)?, self.convert(after, compressor)?))
    }

    #[expect(clippy::cast_precision_loss, reason = "sizes stay far below 2^52")]
    fn convert(&self, entry: &Entrypoint, compressor: Option<&str>) -> Result<f64> {
        let size = compressor.and_then(|compressor| entry.size.get(Some(compressor))).unwrap_or(entry.size.raw) as f64;

        match self.network {
            None => Ok(size),
            Some(network) => download_time(size, network).ok_or_else(|| app_err!("unknown network type '{network}'")),
        }
    }

    const fn what(&self) -> &'static str {
        if self.network.is_some() { "download time" } else { "download size" }
    }

    fn format(&self, value: f64) -> String {
        if self.network.is_some() { format_duration(value) } else { format_size(value) }
    }

    fn format_limit(&self, limit: &Limit) -> String {
        match limit {
            Limit::Absolute { number } => self.format(*number),
            Limit::Percent { number } => format!("{}%", js_number(*number)),
        }
    }
}

fn compilations(input: &[StatsDocument]) -> impl Iterator<Item = &StatsDocument> {
    input.iter().flat_map(StatsDocument::compilations)
}

impl Rule for EntrySizeLimits {
    fn run(&self, params_value: &JsonValue, data: &RuleData<'_>, api: &mut dyn Api) -> Result<()> {
        let limits: EntryLimits<f64> = params("entry-download-size-limits", params_value)?;
        let measure = Measure::new(&limits, data);

        for compilation in compilations(data.input) {
            for entry in compilation.entrypoints() {
                let Some(limit) = limits.limit_for(&entry.name) else {
                    continue;
                };

                let value = measure.of(entry)?;
                if value > limit {
                    api.error(
                        &format!(
                            "Entry \"{}\": {} {} exceeds the limit of {}",
                            entry.name,
                            measure.what(),
                            measure.format(value),
                            measure.format(limit)
                        ),
                        Some(compilation.file()),
                    );
                }
            }
        }

        Ok(())
    }
}

impl Rule for DiffEntrySizeLimits {
    fn run(&self, params_value: &JsonValue, data: &RuleData<'_>, api: &mut dyn Api) -> Result<()> {
        let Some(reference) = data.reference else {
            return Ok(());
        };

        let limits: EntryLimits<LimitInput> = params("diff-entry-download-size-limits", params_value)?;
        let measure = Measure::new(&limits, data);

        for compilation in data.input {
            for entry in compilation.entrypoints() {
                let Some(limit) = normalize_limit(limits.limit_for(&entry.name)) else {
                    continue;
                };
                let Some(before) = reference.entrypoint(&entry.name) else {
                    continue;
                };

                let (before, after) = measure.pair(before, entry)?;
                let diff = ValueDiff::between(before, after);
                if !is_within_limit(&diff, Some(&limit)) {
                    api.error(
                        &format!(
                            "Entry \"{}\": {} grew by {} ({}%), exceeding the limit of {}",
                            entry.name,
                            measure.what(),
                            measure.format(diff.absolute),
                            to_fixed(diff.percent, 2),
                            measure.format_limit(&limit)
                        ),
                        Some(compilation.file()),
                    );
                }
            }
        }

        Ok(())
    }

    fn needs_reference(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{document, messages, run_rule};
    use super::*;
    use serde_json::json;

    fn stats(main_size: u64, admin_size: u64) -> StatsDocument {
        document(json!({
            "version": "5.0.0",
            "assets": [
                {"name": "main.js", "size": main_size},
                {"name": "admin.js", "size": admin_size}
            ],
            "entrypoints": {
                "main": {"name": "main", "assets": [{"name": "main.js", "size": main_size}]},
                "admin": {"name": "admin", "assets": [{"name": "admin.js", "size": admin_size}]}
            }
        }))
    }

    #[test]
    fn test_global_and_by_name_limits() {
        let doc = stats(300_000, 50_000);
        let storage = run_rule(
            &EntrySizeLimits,
            &json!({"global": 100_000, "byName": {"admin": 40_000}}),
            core::slice::from_ref(&doc),
            None,
        );

        let mut found = messages(&storage);
        found.sort();
        assert_eq!(
            found,
            [
                "Entry \"admin\": download size 48.83 kb exceeds the limit of 39.06 kb",
                "Entry \"main\": download size 292.97 kb exceeds the limit of 97.66 kb"
            ]
        );
    }

    #[test]
    fn test_download_time_limit() {
        let doc = stats(524_288, 1);
        let storage = run_rule(
            &EntrySizeLimits,
            &json!({"byName": {"main": 500}, "network": "3G Fast"}),
            core::slice::from_ref(&doc),
            None,
        );
        assert_eq!(messages(&storage), ["Entry \"main\": download time 1.0 sec exceeds the limit of 500 ms"]);
    }

    #[test]
    fn test_unknown_network_fails() {
        let doc = stats(1, 1);
        let engine = crate::query::QueryEngine::new(&[], crate::query::MethodSet::new()).unwrap();
        let data = RuleData {
            input: core::slice::from_ref(&doc),
            reference: None,
            engine: &engine,
            compressor: None,
            network: Some("Carrier Pigeon"),
        };
        let mut storage = crate::validation::FindingStorage::new();
        let result = EntrySizeLimits.run(&json!({"global": 1}), &data, &mut storage.api("test"));
        let _ = result.unwrap_err();
    }

    #[test]
    fn test_diff_limits() {
        let before = stats(100_000, 100_000);
        let after = stats(120_000, 101_000);

        let storage = run_rule(
            &DiffEntrySizeLimits,
            &json!({"global": {"type": "percent", "number": 5}}),
            core::slice::from_ref(&after),
            Some(&before),
        );
        assert_eq!(
            messages(&storage),
            ["Entry \"main\": download size grew by 19.53 kb (20.00%), exceeding the limit of 5%"]
        );

        let storage = run_rule(
            &DiffEntrySizeLimits,
            &json!({"global": 50_000}),
            core::slice::from_ref(&after),
            Some(&before),
        );
        assert!(storage.is_empty());
    }

    fn gzipped_stats(raw: u64, gzip: Option<u64>) -> StatsDocument {
        let extensions = gzip.map_or_else(Vec::new, |size| {
            vec![json!({
                "descriptor": {"name": crate::extensions::COMPRESSED_EXTENSION, "version": "1.0.0"},
                "payload": {"compilations": [{"resources": [{"id": "main.js", "size": {"compressor": "gzip", "size": size}}]}]}
            })]
        });

        document(json!({
            "version": "5.0.0",
            "assets": [{"name": "main.js", "size": raw}],
            "entrypoints": {"main": {"name": "main", "assets": [{"name": "main.js", "size": raw}]}},
            "__statoscope": {"extensions": extensions}
        }))
    }

    #[test]
    fn test_diff_compares_the_same_size_kind() {
        let params = json!({"global": {"type": "percent", "number": 5}, "compressor": "gzip"});

        // only the reference has gzip sizes, so raw sizes are compared: 4% growth
        let before = gzipped_stats(100_000, Some(20_000));
        let after = gzipped_stats(104_000, None);
        let storage = run_rule(&DiffEntrySizeLimits, &params, core::slice::from_ref(&after), Some(&before));
        assert!(storage.is_empty());

        // both sides have gzip sizes, so they are compared: 10% growth
        let after = gzipped_stats(104_000, Some(22_000));
        let storage = run_rule(&DiffEntrySizeLimits, &params, core::slice::from_ref(&after), Some(&before));
        assert_eq!(
            messages(&storage),
            ["Entry \"main\": download size grew by 1.95 kb (10.00%), exceeding the limit of 5%"]
        );
    }

    #[test]
    fn test_diff_without_reference_reports_nothing() {
        let after = stats(120_000, 101_000);
        let storage = run_rule(&DiffEntrySizeLimits, &json!({"global": 1}), core::slice::from_ref(&after), None);
        assert!(storage.is_empty());
    }
}
