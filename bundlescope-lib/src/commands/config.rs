use crate::{HashSet, Result};
use crate::query::Query;
use crate::validation::{BUILTIN_RULES, RuleLevel, RuleRunner};
use camino::{Utf8Path, Utf8PathBuf};
use ohno::{IntoAppError, app_err};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io;

/// The default configuration TOML content, embedded from `default_config.toml`
pub const DEFAULT_CONFIG_TOML: &str = include_str!("../../default_config.toml");

/// Name of the configuration file looked up in the working directory
pub const CONFIG_FILE_NAME: &str = "bundlescope.toml";

#[derive(Debug, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Fail validation when any warning is reported
    #[serde(default)]
    pub warn_as_error: bool,

    /// Built-in rules to run, keyed by rule name
    #[serde(default)]
    pub rules: BTreeMap<String, RuleSetting>,

    /// Query rules to run after the built-in rules
    #[serde(default)]
    pub query_rules: Vec<Query>,

    /// Compressor whose sizes are used by size-based rules
    #[serde(default = "default_compressor")]
    pub compressor: Option<String>,

    /// Network type used by size-based rules that do not name one
    #[serde(default)]
    pub network: Option<String>,
}

/// Level and parameters of one built-in rule.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RuleSetting {
    #[serde(default)]
    pub level: RuleLevel,

    #[serde(default)]
    pub params: Option<toml::Value>,
}

#[expect(clippy::unnecessary_wraps, reason = "serde default functions must return the field type")]
fn default_compressor() -> Option<String> {
    Some("gzip".to_string())
}

impl Config {
    /// Load configuration from a file or use defaults
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed
    pub fn load(base_path: &Utf8Path, config_path: Option<&Utf8PathBuf>) -> Result<Self> {
        let (final_path, text) = if let Some(path) = config_path {
            let text = fs::read_to_string(path).into_app_err_with(|| format!("reading configuration file '{path}'"))?;
            (path.clone(), text)
        } else {
            let path = base_path.join(CONFIG_FILE_NAME);
            match fs::read_to_string(&path) {
                Ok(text) => (path, text),
                Err(e) if e.kind() == io::ErrorKind::NotFound => {
                    return Ok(Self::default());
                }
                Err(e) => return Err(e).into_app_err_with(|| format!("reading configuration file '{path}'")),
            }
        };

        let config: Self = toml::from_str(&text).into_app_err_with(|| format!("parsing configuration file '{final_path}'"))?;
        config.validate()?;

        Ok(config)
    }

    /// Save the default configuration to a TOML file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written
    pub fn save_default(output_path: &Utf8Path) -> Result<()> {
        fs::write(output_path, DEFAULT_CONFIG_TOML).into_app_err_with(|| format!("writing default configuration to {output_path}"))?;
        Ok(())
    }

    /// Check that every configured rule exists and query rule names are unique
    ///
    /// # Errors
    ///
    /// Returns an error naming the first problem found
    pub fn validate(&self) -> Result<()> {
        if let Some(name) = self.rules.keys().find(|name| !BUILTIN_RULES.contains(&name.as_str())) {
            return Err(app_err!("unknown rule '{name}', expected one of: {}", BUILTIN_RULES.join(", ")));
        }

        let mut seen = HashSet::default();
        for query in &self.query_rules {
            if !seen.insert(query.name()) {
                return Err(app_err!("query rule '{}' is defined more than once", query.name()));
            }
        }

        Ok(())
    }

    /// Build a rule runner for the configured rules, with `extra` query rules appended
    ///
    /// # Errors
    ///
    /// Returns an error if a rule's parameters cannot be converted
    pub fn runner(&self, extra: impl IntoIterator<Item = Query>) -> Result<RuleRunner> {
        let mut runner = RuleRunner::new().warn_as_error(self.warn_as_error);

        for (name, setting) in &self.rules {
            let params = setting
                .params
                .as_ref()
                .map(serde_json::to_value)
                .transpose()
                .into_app_err_with(|| format!("converting parameters of rule '{name}'"))?
                .unwrap_or_default();
            runner.add_builtin(name, setting.level, params)?;
        }

        for query in self.query_rules.iter().cloned().chain(extra) {
            runner.add_query(query);
        }

        Ok(runner)
    }
}

impl Default for Config {
    fn default() -> Self {
        toml::from_str(DEFAULT_CONFIG_TOML).expect("default_config.toml should be valid TOML that deserializes to Config")
    }
}
