use super::params;
use crate::Result;
use crate::diff::{Limit, LimitInput, ValueDiff, is_within_limit, normalize_limit};
use crate::helpers::{format_duration, js_number, to_fixed};
use crate::validation::{Api, Rule, RuleData};
use serde::Deserialize;
use serde_json::Value as JsonValue;

const LOG_TARGET: &str = "   rules";

/// Limits the build time of every input, in milliseconds.
pub struct BuildTimeLimits;

/// Limits how much the build time may grow relative to the reference.
pub struct DiffBuildTimeLimits;

/// Either a bare limit or `{ global = limit }`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TimeLimits<L> {
    Bare(L),
    Detailed { global: Option<L> },
}

impl<L> Default for TimeLimits<L> {
    fn default() -> Self {
        Self::Detailed { global: None }
    }
}

impl<L> TimeLimits<L> {
    fn global(self) -> Option<L> {
        match self {
            Self::Bare(limit) => Some(limit),
            Self::Detailed { global } => global,
        }
    }
}

#[expect(clippy::cast_precision_loss, reason = "build times stay far below 2^52 ms")]
fn millis(time: u64) -> f64 {
    time as f64
}

impl Rule for BuildTimeLimits {
    fn run(&self, params_value: &JsonValue, data: &RuleData<'_>, api: &mut dyn Api) -> Result<()> {
        let limits: TimeLimits<f64> = params("build-time-limits", params_value)?;
        let Some(limit) = limits.global() else {
            return Ok(());
        };

        for doc in data.input {
            let Some(time) = doc.time() else {
                log::debug!(target: LOG_TARGET, "No build time recorded in '{}'", doc.file());
                continue;
            };

            let time = millis(time);
            if time > limit {
                api.error(
                    &format!(
                        "Build time {} exceeds the limit of {}",
                        format_duration(time),
                        format_duration(limit)
                    ),
                    Some(doc.file()),
                );
            }
        }

        Ok(())
    }
}

impl Rule for DiffBuildTimeLimits {
    fn run(&self, params_value: &JsonValue, data: &RuleData<'_>, api: &mut dyn Api) -> Result<()> {
        let Some(before) = data.reference.and_then(|reference| reference.time()) else {
            return Ok(());
        };

        let limits: TimeLimits<LimitInput> = params("diff-build-time-limits", params_value)?;
        let Some(limit) = normalize_limit(limits.global()) else {
            return Ok(());
        };

        for doc in data.input {
            let Some(after) = doc.time() else {
                continue;
            };

            let diff = ValueDiff::between(millis(before), millis(after));
            if !is_within_limit(&diff, Some(&limit)) {
                let limit_text = match limit {
                    Limit::Absolute { number } => format_duration(number),
                    Limit::Percent { number } => format!("{}%", js_number(number)),
                };
                api.error(
                    &format!(
                        "Build time grew by {} ({}%), exceeding the limit of {limit_text}",
                        format_duration(diff.absolute),
                        to_fixed(diff.percent, 2)
                    ),
                    Some(doc.file()),
                );
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
    use crate::model::StatsDocument;
    use serde_json::json;

    fn stats(time: u64) -> StatsDocument {
        document(json!({"version": "5.0.0", "time": time, "modules": []}))
    }

    #[test]
    fn test_bare_and_detailed_params() {
        let doc = stats(12_000);
        for params in [json!(10_000), json!({"global": 10_000})] {
            let storage = run_rule(&BuildTimeLimits, &params, core::slice::from_ref(&doc), None);
            assert_eq!(messages(&storage), ["Build time 12.0 sec exceeds the limit of 10.0 sec"]);
        }

        let storage = run_rule(&BuildTimeLimits, &json!({"global": 20_000}), core::slice::from_ref(&doc), None);
        assert!(storage.is_empty());
    }

    #[test]
    fn test_diff_limit() {
        let before = stats(10_000);
        let after = stats(15_000);

        let storage = run_rule(
            &DiffBuildTimeLimits,
            &json!({"global": {"type": "percent", "number": 10}}),
            core::slice::from_ref(&after),
            Some(&before),
        );
        assert_eq!(
            messages(&storage),
            ["Build time grew by 5.0 sec (50.00%), exceeding the limit of 10%"]
        );

        let storage = run_rule(&DiffBuildTimeLimits, &json!(6_000), core::slice::from_ref(&after), Some(&before));
        assert!(storage.is_empty());
    }
}
