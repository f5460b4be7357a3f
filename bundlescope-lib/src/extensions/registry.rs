use super::{ExtensionDescriptor, ExtensionRecord};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

const LOG_TARGET: &str = "extensions";

/// Ordered collection of extension records attached to a stats document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExtensionRegistry {
    records: Vec<ExtensionRecord>,
}

impl ExtensionRegistry {
    #[must_use]
    pub const fn new() -> Self {
        Self { records: Vec::new() }
    }

    /// Store a payload under the given descriptor.
    ///
    /// Registering the same name again does not remove the earlier record, it only
    /// shadows it for [`get`](Self::get).
    pub fn register(&mut self, descriptor: ExtensionDescriptor, payload: serde_json::Value) {
        self.records.push(ExtensionRecord::new(descriptor, payload));
    }

    pub fn register_record(&mut self, record: ExtensionRecord) {
        self.records.push(record);
    }

    /// Latest record registered under `name`, if any.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ExtensionRecord> {
        self.records.iter().rev().find(|record| record.name() == name)
    }

    /// Decode the latest payload registered under `name` into a typed view.
    ///
    /// A payload that does not match the expected shape is treated like a missing
    /// extension.
    #[must_use]
    pub fn payload<T: DeserializeOwned>(&self, name: &str) -> Option<T> {
        let record = self.get(name)?;
        match serde_json::from_value(record.payload.clone()) {
            Ok(payload) => Some(payload),
            Err(e) => {
                log::warn!(target: LOG_TARGET, "Ignoring malformed payload for extension '{name}' v{}: {e}", record.descriptor.version);
                None
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &ExtensionRecord> {
        self.records.iter()
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl FromIterator<ExtensionRecord> for ExtensionRegistry {
    fn from_iter<I: IntoIterator<Item = ExtensionRecord>>(iter: I) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_get_missing_is_none() {
        let registry = ExtensionRegistry::new();
        assert!(registry.get("anything").is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_last_write_wins_per_name() {
        let mut registry = ExtensionRegistry::new();
        registry.register(ExtensionDescriptor::new("ext", "1.0.0"), json!({"value": 1}));
        registry.register(ExtensionDescriptor::new("other", "1.0.0"), json!({"value": 2}));
        registry.register(ExtensionDescriptor::new("ext", "2.0.0"), json!({"value": 3}));

        let record = registry.get("ext").unwrap();
        assert_eq!(record.descriptor.version, "2.0.0");
        assert_eq!(record.payload, json!({"value": 3}));
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn test_typed_payload() {
        #[derive(Deserialize)]
        struct Payload {
            value: u32,
        }

        let mut registry = ExtensionRegistry::new();
        registry.register(ExtensionDescriptor::new("ext", "1.0.0"), json!({"value": 7}));

        let payload: Payload = registry.payload("ext").unwrap();
        assert_eq!(payload.value, 7);
    }

    #[test]
    fn test_malformed_payload_is_absent() {
        #[derive(Debug, Deserialize)]
        #[expect(dead_code, reason = "only used to exercise decoding")]
        struct Payload {
            value: u32,
        }

        let mut registry = ExtensionRegistry::new();
        registry.register(ExtensionDescriptor::new("ext", "1.0.0"), json!({"value": "seven"}));

        assert!(registry.payload::<Payload>("ext").is_none());
    }

    #[test]
    fn test_serializes_as_list() {
        let mut registry = ExtensionRegistry::new();
        registry.register(ExtensionDescriptor::new("ext", "1.0.0"), json!(null));

        let value = serde_json::to_value(&registry).unwrap();
        assert!(value.is_array());
        assert_eq!(value[0]["descriptor"]["name"], "ext");
    }
}
