use super::{Api, FindingStorage, FindingType, QueryRule, Rule, RuleData, builtin_rule};
use crate::Result;
use crate::query::Query;
use ohno::app_err;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::sync::Arc;
use strum::{Display, EnumString};

const LOG_TARGET: &str = "  runner";

/// How a configured rule takes part in a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum RuleLevel {
    /// Findings are reported as the rule produced them.
    #[default]
    Error,

    /// Error findings are downgraded to warnings.
    Warn,

    /// The rule does not run.
    Off,
}

/// What happened to one rule during a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleOutcome {
    Completed,
    Skipped,
    Failed(String),
}

/// Result of running every configured rule.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub findings: FindingStorage,
    pub rules: Vec<(String, RuleOutcome)>,
    pub failed: bool,
}

impl RunOutcome {
    pub fn failed_rules(&self) -> impl Iterator<Item = (&str, &str)> {
        self.rules.iter().filter_map(|(name, outcome)| match outcome {
            RuleOutcome::Failed(error) => Some((name.as_str(), error.as_str())),
            RuleOutcome::Completed | RuleOutcome::Skipped => None,
        })
    }
}

struct ConfiguredRule {
    name: String,
    level: RuleLevel,
    params: JsonValue,
    rule: Arc<dyn Rule>,
}

/// Runs a list of configured rules over the same data.
#[derive(Default)]
pub struct RuleRunner {
    rules: Vec<ConfiguredRule>,
    warn_as_error: bool,
}

impl core::fmt::Debug for RuleRunner {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RuleRunner")
            .field("rules", &self.rules.iter().map(|rule| (&rule.name, rule.level)).collect::<Vec<_>>())
            .field("warn_as_error", &self.warn_as_error)
            .finish()
    }
}

impl RuleRunner {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail the run on warnings as well as errors.
    #[must_use]
    pub const fn warn_as_error(mut self, warn_as_error: bool) -> Self {
        self.warn_as_error = warn_as_error;
        self
    }

    pub fn add(&mut self, name: impl Into<String>, level: RuleLevel, params: JsonValue, rule: Arc<dyn Rule>) {
        self.rules.push(ConfiguredRule {
            name: name.into(),
            level,
            params,
            rule,
        });
    }

    /// Add a built-in rule by name.
    ///
    /// # Errors
    /// Returns an error if no built-in rule has that name.
    pub fn add_builtin(&mut self, name: &str, level: RuleLevel, params: JsonValue) -> Result<()> {
        let rule = builtin_rule(name).ok_or_else(|| app_err!("unknown rule '{name}'"))?;
        self.add(name, level, params, rule);
        Ok(())
    }

    /// Add a query rule; it runs at the error level with no parameters.
    pub fn add_query(&mut self, query: Query) {
        let name = query.name().to_string();
        self.add(name, RuleLevel::Error, JsonValue::Null, Arc::new(QueryRule::new(query)));
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Run every rule in order. A failing rule does not stop the run.
    #[must_use]
    pub fn run(&self, data: &RuleData<'_>) -> RunOutcome {
        let mut findings = FindingStorage::new();
        let mut rules = Vec::with_capacity(self.rules.len());

        for configured in &self.rules {
            let outcome = if configured.level == RuleLevel::Off {
                RuleOutcome::Skipped
            } else if configured.rule.needs_reference() && data.reference.is_none() {
                log::info!(target: LOG_TARGET, "Skipping rule '{}': no reference input", configured.name);
                RuleOutcome::Skipped
            } else {
                log::debug!(target: LOG_TARGET, "Running rule '{}'", configured.name);
                let mut api = LeveledApi {
                    inner: findings.api(&configured.name),
                    level: configured.level,
                };

                match configured.rule.run(&configured.params, data, &mut api) {
                    Ok(()) => RuleOutcome::Completed,
                    Err(e) => {
                        log::error!(target: LOG_TARGET, "Rule '{}' failed: {e}", configured.name);
                        RuleOutcome::Failed(e.to_string())
                    }
                }
            };

            rules.push((configured.name.clone(), outcome));
        }

        let failed = findings.count(FindingType::Error) > 0
            || (self.warn_as_error && findings.count(FindingType::Warn) > 0)
            || rules.iter().any(|(_, outcome)| matches!(outcome, RuleOutcome::Failed(_)));

        RunOutcome { findings, rules, failed }
    }
}

/// Applies a rule's level to the findings it reports.
struct LeveledApi<A> {
    inner: A,
    level: RuleLevel,
}

impl<A: Api> Api for LeveledApi<A> {
    fn report(&mut self, kind: FindingType, message: &str, filename: Option<&str>) {
        let kind = match (self.level, kind) {
            (RuleLevel::Warn, FindingType::Error) => FindingType::Warn,
            _ => kind,
        };
        self.inner.report(kind, message, filename);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{MethodSet, QueryEngine};
    use serde_json::json;

    fn run(runner: &RuleRunner, with_reference: bool) -> RunOutcome {
        let engine = QueryEngine::new(&[], MethodSet::new()).unwrap();
        let reference = crate::normalize::normalize_value(json!({"modules": []}), "ref.json", Vec::new()).unwrap();
        let data = RuleData {
            input: &[],
            reference: with_reference.then_some(&reference),
            engine: &engine,
            compressor: None,
            network: None,
        };
        runner.run(&data)
    }

    fn reporting(kind: FindingType) -> Arc<dyn Rule> {
        Arc::new(move |_: &JsonValue, _: &RuleData<'_>, api: &mut dyn Api| -> Result<()> {
            api.report(kind, "finding", Some("a.js"));
            Ok(())
        })
    }

    #[test]
    fn test_errors_fail_the_run() {
        let mut runner = RuleRunner::new();
        runner.add("r", RuleLevel::Error, JsonValue::Null, reporting(FindingType::Error));
        let outcome = run(&runner, false);
        assert!(outcome.failed);
        assert_eq!(outcome.findings.count(FindingType::Error), 1);
    }

    #[test]
    fn test_warn_level_downgrades_errors() {
        let mut runner = RuleRunner::new();
        runner.add("r", RuleLevel::Warn, JsonValue::Null, reporting(FindingType::Error));
        let outcome = run(&runner, false);
        assert!(!outcome.failed);
        assert_eq!(outcome.findings.count(FindingType::Warn), 1);

        let mut runner = RuleRunner::new().warn_as_error(true);
        runner.add("r", RuleLevel::Warn, JsonValue::Null, reporting(FindingType::Error));
        assert!(run(&runner, false).failed);
    }

    #[test]
    fn test_off_and_reference_skips() {
        let mut runner = RuleRunner::new();
        runner.add("off", RuleLevel::Off, JsonValue::Null, reporting(FindingType::Error));
        runner.add_builtin("diff-build-time-limits", RuleLevel::Error, json!(1)).unwrap();
        let outcome = run(&runner, false);
        assert!(!outcome.failed);
        assert_eq!(outcome.rules[0].1, RuleOutcome::Skipped);
        assert_eq!(outcome.rules[1].1, RuleOutcome::Skipped);

        let outcome = run(&runner, true);
        assert_eq!(outcome.rules[1].1, RuleOutcome::Completed);
    }

    #[test]
    fn test_failing_rule_does_not_stop_the_run() {
        let mut runner = RuleRunner::new();
        runner.add(
            "broken",
            RuleLevel::Error,
            JsonValue::Null,
            Arc::new(|_: &JsonValue, _: &RuleData<'_>, _: &mut dyn Api| -> Result<()> { Err(app_err!("boom")) }),
        );
        runner.add("info", RuleLevel::Error, JsonValue::Null, reporting(FindingType::Info));
        let outcome = run(&runner, false);

        assert!(outcome.failed);
        let failed: Vec<_> = outcome.failed_rules().collect();
        assert_eq!(failed.len(), 1);
        assert_eq!(failed[0].0, "broken");
        assert!(failed[0].1.contains("boom"));
        assert_eq!(outcome.rules[1].1, RuleOutcome::Completed);
        assert_eq!(outcome.findings.count(FindingType::Info), 1);
    }

    #[test]
    fn test_unknown_builtin() {
        let _ = RuleRunner::new().add_builtin("nope", RuleLevel::Error, JsonValue::Null).unwrap_err();
    }

    #[test]
    fn test_query_rules() {
        let mut runner = RuleRunner::new();
        runner.add_query(Query::new("q", None, r#"[{"message": "bad", "filename": "x.js"}]"#).unwrap());
        let outcome = run(&runner, false);
        assert!(!outcome.failed);
        assert_eq!(outcome.findings.count(FindingType::Info), 1);
    }
}
