use super::params;
use crate::Result;
use crate::helpers::Pattern;
use crate::validation::{Api, Rule, RuleData};
use crate::versions;
use serde::Deserialize;
use serde_json::Value as JsonValue;

/// Reports every installation of a package matching one of the configured targets.
///
/// A target is written as `name`, `name@range` or `/regex/flags`, or as
/// `{ name, version? }` where `name` is any pattern.
pub struct RestrictedPackages;

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TargetSpec {
    Text(String),
    Detailed { name: Pattern, version: Option<String> },
}

#[derive(Debug)]
struct Target {
    name: Pattern,
    range: Option<String>,
}

impl TryFrom<TargetSpec> for Target {
    type Error = ohno::AppError;

    fn try_from(spec: TargetSpec) -> Result<Self> {
        match spec {
            TargetSpec::Detailed { name, version } => Ok(Self { name, range: version }),
            TargetSpec::Text(text) if text.starts_with('/') => Ok(Self {
                name: Pattern::parse(&text)?,
                range: None,
            }),
            TargetSpec::Text(text) => match text.rfind('@') {
                Some(at) if at > 0 => {
                    let (name, range) = text.split_at(at);
                    Ok(Self {
                        name: Pattern::exact(name),
                        range: Some(range.trim_start_matches('@').to_string()),
                    })
                }
                _ => Ok(Self {
                    name: Pattern::exact(text),
                    range: None,
                }),
            },
        }
    }
}

impl Target {
    fn matches(&self, name: &str, version: Option<&str>) -> bool {
        if !self.name.is_match(name) {
            return false;
        }

        match (&self.range, version) {
            (None, _) => true,
            (Some(range), Some(version)) => versions::satisfies(version, range),
            (Some(_), None) => false,
        }
    }
}

impl Rule for RestrictedPackages {
    fn run(&self, params_value: &JsonValue, data: &RuleData<'_>, api: &mut dyn Api) -> Result<()> {
        let specs: Vec<TargetSpec> = params("restricted-packages", params_value)?;
        let targets = specs.into_iter().map(Target::try_from).collect::<Result<Vec<_>>>()?;
        if targets.is_empty() {
            return Ok(());
        }

        for compilation in data.input.iter().flat_map(|doc| doc.compilations()) {
            for package in compilation.packages() {
                for instance in &package.instances {
                    let version = instance.version.as_deref();
                    if !targets.iter().any(|target| target.matches(&package.name, version)) {
                        continue;
                    }

                    let label = version.map_or_else(|| package.name.clone(), |version| format!("{}@{version}", package.name));
                    api.error(
                        &format!("Package {label} should not be used ({})", instance.path),
                        Some(compilation.file()),
                    );
                }
            }
        }

        Ok(())
    }
}
