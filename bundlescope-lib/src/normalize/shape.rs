use super::raw::{RawEntryAsset, RawModule, RawReason, RawStats, byte_size};
use super::{webpack4::Webpack4, webpack5::Webpack5};
use crate::model::{Asset, Chunk, Entrypoint, RawId};
use crate::{HashSet, Result};
use ohno::bail;
use serde::Serialize;
use strum::Display;

const LOG_TARGET: &str = "normalize";

/// Raw stats layout, selected by bundler major version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize)]
pub enum RawShapeVersion {
    Webpack4,
    Webpack5,
}

impl RawShapeVersion {
    /// Work out which layout a raw document uses.
    ///
    /// The declared bundler version wins. Without one, the form of entry assets decides,
    /// and anything else that looks like stats is treated as the newer layout.
    pub(super) fn detect(raw: &RawStats) -> Result<Self> {
        if !raw.has_sections() {
            bail!("unrecognized stats shape: none of modules, chunks, assets, entrypoints, children is present");
        }

        if let Some(major) = raw
            .version
            .as_deref()
            .and_then(|version| version.split('.').next())
            .and_then(|major| major.trim_start_matches('v').parse::<u64>().ok())
        {
            return Ok(if major <= 4 { Self::Webpack4 } else { Self::Webpack5 });
        }

        match raw.entrypoints().find_map(|(_, entry)| entry.assets.first()) {
            Some(RawEntryAsset::Name(_)) => Ok(Self::Webpack4),
            _ => Ok(Self::Webpack5),
        }
    }

    pub(super) fn extract(self, raw: &RawStats, context: Option<&str>) -> Extracted {
        match self {
            Self::Webpack4 => Webpack4.extract(raw, context),
            Self::Webpack5 => Webpack5.extract(raw, context),
        }
    }
}

/// A module as read from raw stats, before references are resolved.
#[derive(Debug, Clone)]
pub(super) struct ExtractedModule {
    /// Canonical id.
    pub key: String,

    /// Every other name by which raw stats may refer to this module.
    pub aliases: Vec<String>,
    pub name: String,
    pub resource: Option<String>,
    pub module_type: Option<String>,
    pub size: u64,
    pub chunks: Vec<String>,

    /// References to the modules that import this one.
    pub issuers: Vec<String>,
    pub inner: Vec<ExtractedModule>,
}

/// Entities of one compilation with references still expressed as raw keys.
#[derive(Debug, Default)]
pub(super) struct Extracted {
    pub modules: Vec<ExtractedModule>,

    /// Modules listed inside chunks; these usually repeat top-level modules.
    pub embedded: Vec<ExtractedModule>,
    pub chunks: Vec<Chunk>,
    pub assets: Vec<Asset>,
    pub entrypoints: Vec<Entrypoint>,
}

/// Field mapping for one raw layout.
///
/// Implementations only describe where a layout keeps each piece of module data; the
/// walk over the document is shared.
pub(super) trait ShapeExtractor {
    /// Resolved resource path of a module, relative to `context` when possible.
    fn module_resource(&self, module: &RawModule, context: Option<&str>) -> Option<String>;

    fn module_type(&self, module: &RawModule) -> Option<String>;

    /// Reference to the module that issued this reason.
    fn reason_issuer(&self, reason: &RawReason) -> Option<String>;

    fn extract(&self, raw: &RawStats, context: Option<&str>) -> Extracted {
        let mut extracted = Extracted {
            modules: raw.modules().iter().filter_map(|m| self.extract_module(m, context, &[])).collect(),
            ..Extracted::default()
        };

        for raw_chunk in raw.chunks() {
            let Some(id) = &raw_chunk.id else {
                log::debug!(target: LOG_TARGET, "Skipping chunk without an id");
                continue;
            };

            let mut chunk = Chunk::new(id.as_str());
            chunk.names.clone_from(&raw_chunk.names);
            chunk.size.raw = byte_size(raw_chunk.size);
            chunk.files.clone_from(&raw_chunk.files);
            chunk.parents = raw_chunk.parents.iter().map(|p| p.as_str().to_string()).collect();
            chunk.children = raw_chunk.children.iter().map(|c| c.as_str().to_string()).collect();
            chunk.siblings = raw_chunk.siblings.iter().map(|s| s.as_str().to_string()).collect();
            chunk.initial = raw_chunk.initial;
            chunk.entry = raw_chunk.entry;

            // modules embedded in the chunk, listed when module stats are per chunk
            for raw_module in &raw_chunk.modules {
                if let Some(module) = self.extract_module(raw_module, context, core::slice::from_ref(id)) {
                    chunk.modules.push(module.key.clone());
                    extracted.embedded.push(module);
                }
            }

            extracted.chunks.push(chunk);
        }

        for raw_asset in raw.assets() {
            let Some(name) = &raw_asset.name else {
                log::debug!(target: LOG_TARGET, "Skipping asset without a name");
                continue;
            };

            let mut asset = Asset::new(name.as_str(), byte_size(raw_asset.size));
            asset.chunks = raw_asset.chunks.iter().map(|c| c.as_str().to_string()).collect();
            extracted.assets.push(asset);
        }

        let mut known_assets: HashSet<String> = extracted.assets.iter().map(|a| a.name.clone()).collect();
        for (key, raw_entry) in raw.entrypoints() {
            let mut entry = Entrypoint::new(raw_entry.name.as_deref().unwrap_or(key));
            entry.chunks = raw_entry.chunks.iter().map(|c| c.as_str().to_string()).collect();
            entry.assets = raw_entry.assets.iter().map(|a| a.name().to_string()).collect();

            // stats emitted without the asset list still carry sizes on entry assets
            for raw_asset in &raw_entry.assets {
                if let Some(size) = raw_asset.size()
                    && known_assets.insert(raw_asset.name().to_string())
                {
                    log::debug!(target: LOG_TARGET, "Using the entry size of unlisted asset '{}'", raw_asset.name());
                    let mut asset = Asset::new(raw_asset.name(), byte_size(Some(size)));
                    asset.chunks.clone_from(&entry.chunks);
                    extracted.assets.push(asset);
                }
            }

            extracted.entrypoints.push(entry);
        }

        extracted
    }

    fn extract_module(&self, raw: &RawModule, context: Option<&str>, chunk_hint: &[RawId]) -> Option<ExtractedModule> {
        let key = raw
            .identifier
            .clone()
            .or_else(|| raw.id.as_ref().map(|id| id.as_str().to_string()))
            .or_else(|| raw.name.clone())?;

        let mut aliases = Vec::new();
        for alias in [raw.id.as_ref().map(RawId::as_str), raw.identifier.as_deref(), raw.name.as_deref()]
            .into_iter()
            .flatten()
        {
            if alias != key && !aliases.iter().any(|a| a == alias) {
                aliases.push(alias.to_string());
            }
        }

        let chunks = if raw.chunks.is_empty() { chunk_hint } else { raw.chunks.as_slice() };

        Some(ExtractedModule {
            name: raw.name.clone().unwrap_or_else(|| key.clone()),
            resource: self.module_resource(raw, context),
            module_type: self.module_type(raw),
            size: byte_size(raw.size),
            chunks: chunks.iter().map(|c| c.as_str().to_string()).collect(),
            issuers: raw.reasons.iter().filter_map(|r| self.reason_issuer(r)).collect(),
            inner: raw
                .modules
                .iter()
                .filter_map(|inner| self.extract_module(inner, context, chunks))
                .collect(),
            aliases,
            key,
        })
    }
}

/// Derive a resource path from a module name by dropping loaders, queries, and the
/// concatenation suffix.
pub(super) fn resource_from_name(name: &str) -> Option<String> {
    let name = name.rsplit('!').next().unwrap_or(name);
    let name = name.split('?').next().unwrap_or(name);
    let name = match name.find(" + ") {
        Some(index) if name.ends_with(" modules") || name.ends_with(" module") => &name[..index],
        _ => name,
    };

    let name = name.trim();
    if name.is_empty() || name.starts_with("webpack/") || name.starts_with("(webpack)") {
        return None;
    }

    Some(name.replace('\\', "/"))
}

/// Express an absolute path relative to the compilation context.
pub(super) fn relative_to_context(path: &str, context: Option<&str>) -> String {
    let path = path.replace('\\', "/");
    let Some(context) = context.map(|c| c.replace('\\', "/")) else {
        return path;
    };

    let context = context.trim_end_matches('/');
    match path.strip_prefix(context) {
        Some(rest) if !context.is_empty() && rest.starts_with('/') => format!(".{rest}"),
        _ => path,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    fn detect(value: Value) -> Option<RawShapeVersion> {
        let raw: RawStats = serde_json::from_value(value).ok()?;
        RawShapeVersion::detect(&raw).ok()
    }

    #[test]
    fn test_detect_by_version() {
        assert_eq!(detect(json!({"version": "4.46.0", "modules": []})), Some(RawShapeVersion::Webpack4));
        assert_eq!(detect(json!({"version": "5.88.2", "modules": []})), Some(RawShapeVersion::Webpack5));
    }

    #[test]
    fn test_detect_by_entry_assets() {
        let v4 = json!({"entrypoints": {"main": {"assets": ["main.js"]}}});
        let v5 = json!({"entrypoints": {"main": {"assets": [{"name": "main.js", "size": 1}]}}});
        assert_eq!(detect(v4), Some(RawShapeVersion::Webpack4));
        assert_eq!(detect(v5), Some(RawShapeVersion::Webpack5));
        assert_eq!(detect(json!({"chunks": []})), Some(RawShapeVersion::Webpack5));
    }

    #[test]
    fn test_detect_rejects_unknown_shapes() {
        assert_eq!(detect(json!([1, 2, 3])), None);
        assert_eq!(detect(json!({"hello": "world"})), None);
        assert_eq!(detect(json!("stats")), None);
    }

    #[test]
    fn test_entry_asset_sizes_fill_missing_assets() {
        let raw: RawStats = serde_json::from_value(json!({
            "chunks": [{"id": "main"}],
            "assets": [{"name": "main.js", "size": 100}],
            "entrypoints": {"main": {"chunks": ["main"], "assets": [
                {"name": "main.js", "size": 999},
                {"name": "vendor.js", "size": 40},
                "plain.js"
            ]}}
        }))
        .unwrap();

        let extracted = Webpack5.extract(&raw, None);
        let sizes: Vec<(&str, u64)> = extracted.assets.iter().map(|a| (a.name.as_str(), a.size.raw)).collect();
        assert_eq!(sizes, [("main.js", 100), ("vendor.js", 40)]);
        assert_eq!(extracted.assets[1].chunks, ["main"]);
        assert_eq!(extracted.entrypoints[0].assets, ["main.js", "vendor.js", "plain.js"]);
    }

    #[test]
    fn test_resource_from_name() {
        assert_eq!(resource_from_name("./src/index.js").as_deref(), Some("./src/index.js"));
        assert_eq!(
            resource_from_name("./node_modules/css-loader/index.js!./src/app.css?raw").as_deref(),
            Some("./src/app.css")
        );
        assert_eq!(resource_from_name("./src/index.js + 3 modules").as_deref(), Some("./src/index.js"));
        assert_eq!(resource_from_name("webpack/runtime/define property getters"), None);
    }

    #[test]
    fn test_relative_to_context() {
        assert_eq!(relative_to_context("/repo/src/a.js", Some("/repo")), "./src/a.js");
        assert_eq!(relative_to_context("/repo/src/a.js", Some("/repo/")), "./src/a.js");
        assert_eq!(relative_to_context("/repository/a.js", Some("/repo")), "/repository/a.js");
        assert_eq!(relative_to_context("C:\\repo\\a.js", Some("C:\\repo")), "./a.js");
        assert_eq!(relative_to_context("/x/a.js", None), "/x/a.js");
    }
}
