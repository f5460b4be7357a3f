use crate::HashMap;
use crate::model::RawId;
use serde::{Deserialize, Serialize};

/// Descriptor name of the compressed-size extension.
pub const COMPRESSED_EXTENSION: &str = "@statoscope/stats-extension-compressed";

/// Compressed sizes for every compilation that was measured.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompressedPayload {
    #[serde(default)]
    pub compilations: Vec<CompressedCompilation>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompressedCompilation {
    /// Compilation hash; `None` applies to the root compilation.
    #[serde(default)]
    pub id: Option<RawId>,

    #[serde(default)]
    pub resources: Vec<CompressedResource>,
}

/// Compressed size of one module or asset, keyed by its pre-normalization identifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompressedResource {
    pub id: RawId,
    pub size: CompressedSize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompressedSize {
    pub compressor: String,
    pub size: u64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<serde_json::Value>,
}

impl CompressedPayload {
    /// Find the entry for a compilation.
    ///
    /// An entry without an id only matches the root compilation.
    #[must_use]
    pub fn compilation(&self, hash: Option<&str>, is_root: bool) -> Option<&CompressedCompilation> {
        self.compilations.iter().find(|compilation| match (&compilation.id, hash) {
            (Some(id), Some(hash)) => id.as_str() == hash,
            (None, _) => is_root,
            (Some(_), None) => false,
        })
    }
}

impl CompressedCompilation {
    /// Index resources by identifier; each identifier may carry several compressors.
    #[must_use]
    pub fn by_resource(&self) -> HashMap<&str, Vec<&CompressedSize>> {
        let mut map: HashMap<&str, Vec<&CompressedSize>> = HashMap::default();
        for resource in &self.resources {
            map.entry(resource.id.as_str()).or_default().push(&resource.size);
        }
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload() -> CompressedPayload {
        serde_json::from_value(json!({
            "compilations": [
                {
                    "id": "abc",
                    "resources": [
                        {"id": "./src/a.js", "size": {"compressor": "gzip", "size": 10}},
                        {"id": 42, "size": {"compressor": "gzip", "size": 20}},
                        {"id": "./src/a.js", "size": {"compressor": "brotli", "size": 8}}
                    ]
                },
                {
                    "resources": [{"id": "root.js", "size": {"compressor": "gzip", "size": 5}}]
                }
            ]
        }))
        .unwrap()
    }

    #[test]
    fn test_compilation_lookup_by_hash() {
        let payload = payload();
        let compilation = payload.compilation(Some("abc"), false).unwrap();
        assert_eq!(compilation.resources.len(), 3);
    }

    #[test]
    fn test_compilation_without_id_matches_root_only() {
        let payload = payload();
        assert!(payload.compilation(Some("zzz"), false).is_none());

        let root = payload.compilation(Some("zzz"), true).unwrap();
        assert_eq!(root.resources[0].id.as_str(), "root.js");
    }

    #[test]
    fn test_by_resource_groups_compressors() {
        let payload = payload();
        let index = payload.compilations[0].by_resource();

        assert_eq!(index["./src/a.js"].len(), 2);
        assert_eq!(index["42"][0].size, 20);
    }
}
