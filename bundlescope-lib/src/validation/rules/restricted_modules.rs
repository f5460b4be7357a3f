use super::params;
use crate::Result;
use crate::helpers::Pattern;
use crate::validation::{Api, Rule, RuleData};
use serde_json::Value as JsonValue;

/// Reports every module whose name or resource matches one of the configured patterns.
pub struct RestrictedModules;

impl Rule for RestrictedModules {
    fn run(&self, params_value: &JsonValue, data: &RuleData<'_>, api: &mut dyn Api) -> Result<()> {
        let patterns: Vec<Pattern> = params("restricted-modules", params_value)?;
        if patterns.is_empty() {
            return Ok(());
        }

        for compilation in data.input.iter().flat_map(|doc| doc.compilations()) {
            for module in compilation.modules() {
                let restricted = patterns.iter().any(|pattern| {
                    pattern.is_match(&module.name) || module.resource.as_deref().is_some_and(|resource| pattern.is_match(resource))
                });

                if restricted {
                    api.error(&format!("Module {} should not be used", module.name), Some(compilation.file()));
                }
            }
        }

        Ok(())
    }
}
