use super::{ExtensionDescriptor, ExtensionRecord};
use serde::{Deserialize, Serialize};

/// Descriptor name of the custom-reports extension.
pub const CUSTOM_REPORTS_EXTENSION: &str = "@statoscope/stats-extension-custom-reports";

const GENERATOR_VERSION: &str = env!("CARGO_PKG_VERSION");

/// A user-defined report shown next to the built-in ones.
///
/// `data` and `view` are opaque to the core; a renderer interprets them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomReport {
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Hash of the compilation the report belongs to, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compilation: Option<String>,

    #[serde(default)]
    pub data: serde_json::Value,

    #[serde(default)]
    pub view: serde_json::Value,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CustomReportsPayload {
    #[serde(default)]
    pub items: Vec<CustomReport>,
}

impl CustomReportsPayload {
    pub fn for_compilation<'a>(&'a self, hash: Option<&'a str>) -> impl Iterator<Item = &'a CustomReport> + 'a {
        self.items
            .iter()
            .filter(move |report| report.compilation.is_none() || report.compilation.as_deref() == hash)
    }
}

/// Accumulates reports and produces the extension record carrying them.
#[derive(Debug, Clone, Default)]
pub struct CustomReportsGenerator {
    payload: CustomReportsPayload,
}

impl CustomReportsGenerator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a report, replacing any earlier report with the same id and compilation.
    pub fn handle_report(&mut self, report: CustomReport) {
        if let Some(existing) = self
            .payload
            .items
            .iter_mut()
            .find(|item| item.id == report.id && item.compilation == report.compilation)
        {
            *existing = report;
        } else {
            self.payload.items.push(report);
        }
    }

    #[must_use]
    pub fn get(&self) -> ExtensionRecord {
        let mut descriptor = ExtensionDescriptor::new(CUSTOM_REPORTS_EXTENSION, GENERATOR_VERSION);
        descriptor.description = Some("Custom user reports".to_string());

        ExtensionRecord::new(descriptor, serde_json::to_value(&self.payload).unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn report(id: &str, compilation: Option<&str>, data: serde_json::Value) -> CustomReport {
        CustomReport {
            id: id.to_string(),
            name: None,
            compilation: compilation.map(ToString::to_string),
            data,
            view: serde_json::Value::Null,
        }
    }

    #[test]
    fn test_generator_replaces_same_report() {
        let mut generator = CustomReportsGenerator::new();
        generator.handle_report(report("sizes", None, json!(1)));
        generator.handle_report(report("sizes", Some("abc"), json!(2)));
        generator.handle_report(report("sizes", None, json!(3)));

        let record = generator.get();
        assert_eq!(record.name(), CUSTOM_REPORTS_EXTENSION);

        let payload: CustomReportsPayload = serde_json::from_value(record.payload).unwrap();
        assert_eq!(payload.items.len(), 2);
        assert_eq!(payload.items[0].data, json!(3));
    }

    #[test]
    fn test_for_compilation_includes_unscoped_reports() {
        let payload = CustomReportsPayload {
            items: vec![
                report("global", None, json!(null)),
                report("scoped", Some("abc"), json!(null)),
                report("elsewhere", Some("def"), json!(null)),
            ],
        };

        let ids: Vec<_> = payload.for_compilation(Some("abc")).map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["global", "scoped"]);
    }
}
