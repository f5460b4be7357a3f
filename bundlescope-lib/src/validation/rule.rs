use super::Api;
use crate::Result;
use crate::model::StatsDocument;
use crate::query::QueryEngine;
use serde_json::Value as JsonValue;

/// Everything a rule may inspect.
#[derive(Debug, Clone, Copy)]
pub struct RuleData<'a> {
    /// The documents under validation.
    pub input: &'a [StatsDocument],

    /// The baseline compared against by diff rules.
    pub reference: Option<&'a StatsDocument>,

    /// Query engine over `input`.
    pub engine: &'a QueryEngine,

    /// Compressor used by size rules when their parameters name none.
    pub compressor: Option<&'a str>,

    /// Network type used by size rules when their parameters name none.
    pub network: Option<&'a str>,
}

/// A validation rule.
pub trait Rule: Send + Sync {
    /// Inspect `data` and report findings through `api`.
    ///
    /// # Errors
    /// Returns an error if the parameters are invalid or the rule cannot complete.
    fn run(&self, params: &JsonValue, data: &RuleData<'_>, api: &mut dyn Api) -> Result<()>;

    /// Rules that compare against a reference are skipped when there is none.
    fn needs_reference(&self) -> bool {
        false
    }
}

impl<F> Rule for F
where
    F: Fn(&JsonValue, &RuleData<'_>, &mut dyn Api) -> Result<()> + Send + Sync,
{
    fn run(&self, params: &JsonValue, data: &RuleData<'_>, api: &mut dyn Api) -> Result<()> {
        self(params, data, api)
    }
}
