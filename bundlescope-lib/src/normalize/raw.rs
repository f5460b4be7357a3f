//! Serde views over raw bundler stats.
//!
//! The views are permissive: every field is optional and unknown fields are ignored,
//! since the set of emitted fields depends on the bundler version and its stats options.
//! Top-level collections stay `Option` so that shape detection can tell an absent
//! section from an empty one.

use crate::extensions::ExtensionRecord;
use crate::model::RawId;
use serde::Deserialize;
use std::collections::BTreeMap;

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub(super) struct RawStats {
    pub version: Option<String>,
    pub name: Option<String>,
    pub hash: Option<String>,
    pub built_at: Option<i64>,
    pub time: Option<f64>,
    pub context: Option<String>,
    pub output_path: Option<String>,
    pub modules: Option<Vec<RawModule>>,
    pub chunks: Option<Vec<RawChunk>>,
    pub assets: Option<Vec<RawAsset>>,
    pub entrypoints: Option<BTreeMap<String, RawEntrypoint>>,
    pub children: Option<Vec<RawStats>>,

    #[serde(rename = "__statoscope")]
    pub statoscope: Option<RawMeta>,
}

impl RawStats {
    /// Whether any of the sections that identify a stats document is present.
    pub fn has_sections(&self) -> bool {
        self.modules.is_some() || self.chunks.is_some() || self.assets.is_some() || self.entrypoints.is_some() || self.children.is_some()
    }

    pub fn modules(&self) -> &[RawModule] {
        self.modules.as_deref().unwrap_or_default()
    }

    pub fn chunks(&self) -> &[RawChunk] {
        self.chunks.as_deref().unwrap_or_default()
    }

    pub fn assets(&self) -> &[RawAsset] {
        self.assets.as_deref().unwrap_or_default()
    }

    pub fn entrypoints(&self) -> impl Iterator<Item = (&String, &RawEntrypoint)> {
        self.entrypoints.iter().flatten()
    }
}

/// Metadata block written by the stats plugin.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(super) struct RawMeta {
    pub context: Option<String>,
    pub extensions: Vec<ExtensionRecord>,
}

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub(super) struct RawModule {
    pub identifier: Option<String>,
    pub id: Option<RawId>,
    pub name: Option<String>,
    pub name_for_condition: Option<String>,
    pub module_type: Option<String>,
    pub size: Option<f64>,
    pub chunks: Vec<RawId>,
    pub reasons: Vec<RawReason>,
    pub modules: Vec<RawModule>,
}

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub(super) struct RawReason {
    pub module_identifier: Option<String>,
    pub resolved_module_identifier: Option<String>,
    pub module_id: Option<RawId>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub(super) struct RawChunk {
    pub id: Option<RawId>,
    pub names: Vec<String>,
    pub size: Option<f64>,
    pub files: Vec<String>,
    pub parents: Vec<RawId>,
    pub children: Vec<RawId>,
    pub siblings: Vec<RawId>,
    pub initial: bool,
    pub entry: bool,
    pub modules: Vec<RawModule>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub(super) struct RawAsset {
    pub name: Option<String>,
    pub size: Option<f64>,
    pub chunks: Vec<RawId>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub(super) struct RawEntrypoint {
    pub name: Option<String>,
    pub chunks: Vec<RawId>,
    pub assets: Vec<RawEntryAsset>,
}

/// Entry assets are plain names in older stats and `{ name, size }` objects in newer ones.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(super) enum RawEntryAsset {
    Name(String),
    Detailed {
        name: String,
        #[serde(default)]
        size: Option<f64>,
    },
}

impl RawEntryAsset {
    pub fn name(&self) -> &str {
        match self {
            Self::Name(name) | Self::Detailed { name, .. } => name,
        }
    }

    /// Size reported next to the name, only available in the object form.
    pub const fn size(&self) -> Option<f64> {
        match self {
            Self::Name(_) => None,
            Self::Detailed { size, .. } => *size,
        }
    }
}

/// Clamp a raw size to a non-negative whole number of bytes.
#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss,
    reason = "value is clamped first"
)]
pub(super) fn byte_size(size: Option<f64>) -> u64 {
    match size {
        Some(size) if size.is_finite() && size > 0.0 => size.min(u64::MAX as f64).round() as u64,
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_byte_size_clamps() {
        assert_eq!(byte_size(Some(12.4)), 12);
        assert_eq!(byte_size(Some(-3.0)), 0);
        assert_eq!(byte_size(Some(f64::NAN)), 0);
        assert_eq!(byte_size(None), 0);
    }

    #[test]
    fn test_entry_assets_accept_both_forms() {
        let entry: RawEntrypoint = serde_json::from_value(json!({
            "assets": ["a.js", {"name": "b.js", "size": 10}]
        }))
        .unwrap();

        let names: Vec<&str> = entry.assets.iter().map(RawEntryAsset::name).collect();
        assert_eq!(names, ["a.js", "b.js"]);
        assert_eq!(entry.assets[0].size(), None);
        assert_eq!(entry.assets[1].size(), Some(10.0));
    }

    #[test]
    fn test_absent_and_empty_sections_differ() {
        let empty: RawStats = serde_json::from_value(json!({"modules": []})).unwrap();
        assert!(empty.has_sections());
        assert!(empty.modules().is_empty());

        let bare: RawStats = serde_json::from_value(json!({"hash": "abc"})).unwrap();
        assert!(!bare.has_sections());
        assert_eq!(bare.entrypoints().count(), 0);
    }

    #[test]
    fn test_unknown_fields_are_ignored() {
        let stats: RawStats = serde_json::from_value(json!({
            "hash": "abc",
            "warnings": [],
            "modules": [{"identifier": "x", "depth": 0, "chunks": [0, "named"]}]
        }))
        .unwrap();

        assert_eq!(stats.hash.as_deref(), Some("abc"));
        assert_eq!(stats.modules()[0].chunks[1].as_str(), "named");
    }
}
