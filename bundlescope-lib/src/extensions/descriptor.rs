use serde::{Deserialize, Serialize};

/// Identifies the generator that produced an extension payload.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExtensionDescriptor {
    pub name: String,
    pub version: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ExtensionDescriptor {
    #[must_use]
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            description: None,
        }
    }
}

/// A single extension payload together with its descriptor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtensionRecord {
    pub descriptor: ExtensionDescriptor,

    #[serde(default, alias = "data")]
    pub payload: serde_json::Value,
}

impl ExtensionRecord {
    #[must_use]
    pub const fn new(descriptor: ExtensionDescriptor, payload: serde_json::Value) -> Self {
        Self { descriptor, payload }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.descriptor.name
    }
}
