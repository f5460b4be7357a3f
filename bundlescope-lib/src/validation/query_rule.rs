use super::{Api, FindingType, Rule, RuleData};
use crate::Result;
use crate::query::Query;
use core::str::FromStr;
use ohno::{EnrichableExt, app_err};
use serde_json::Value as JsonValue;

const LOG_TARGET: &str = "   rules";

/// A rule backed by a query producing `{ type?, message, filename?, assert? }` records.
///
/// - a record whose `assert` is truthy passes and reports nothing
/// - a record with neither `type` nor `assert` is informational
/// - a record with no `type` but an explicit falsy `assert` is an error
/// - an unknown `type` is treated as an error
#[derive(Debug, Clone)]
pub struct QueryRule {
    query: Query,
}

impl QueryRule {
    #[must_use]
    pub const fn new(query: Query) -> Self {
        Self { query }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        self.query.name()
    }
}

impl Rule for QueryRule {
    fn run(&self, params: &JsonValue, data: &RuleData<'_>, api: &mut dyn Api) -> Result<()> {
        let params = (!params.is_null()).then_some(params);
        let result = data
            .engine
            .execute(&self.query, params)
            .map_err(|e| e.enrich_with(|| format!("running query rule '{}'", self.name())))?;

        let JsonValue::Array(records) = result else {
            return Err(app_err!("query rule '{}' must produce a list, got {result}", self.name()));
        };

        for (index, record) in records.iter().enumerate() {
            if record.get("assert").is_some_and(is_truthy) {
                continue;
            }

            let Some(message) = record.get("message").and_then(JsonValue::as_str) else {
                return Err(app_err!("record {index} of query rule '{}' has no message", self.name()));
            };

            let kind = match record.get("type").and_then(JsonValue::as_str) {
                Some(name) => FindingType::from_str(name).unwrap_or_else(|_| {
                    log::warn!(target: LOG_TARGET, "Unknown finding type '{name}' in query rule '{}', reporting as error", self.name());
                    FindingType::Error
                }),
                None if record.get("assert").is_some() => FindingType::Error,
                None => FindingType::Info,
            };

            let filename = record.get("filename").and_then(JsonValue::as_str);
            api.report(kind, message, filename);
        }

        Ok(())
    }
}

fn is_truthy(value: &JsonValue) -> bool {
    match value {
        JsonValue::Null => false,
        JsonValue::Bool(b) => *b,
        JsonValue::Number(n) => n.as_f64().is_some_and(|n| n != 0.0 && !n.is_nan()),
        JsonValue::String(s) => !s.is_empty(),
        JsonValue::Array(_) | JsonValue::Object(_) => true,
    }
}
