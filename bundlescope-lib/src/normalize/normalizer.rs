use super::raw::{RawMeta, RawStats, byte_size};
use super::shape::{ExtractedModule, RawShapeVersion};
use crate::extensions::{
    COMPRESSED_EXTENSION, CompressedPayload, ExtensionRecord, ExtensionRegistry, PACKAGE_INFO_EXTENSION, PackageInfoPayload,
};
use crate::model::{Asset, Chunk, DocumentParts, Entrypoint, Module, Package, PackageInstance, ResourceSize, StatsDocument};
use crate::{HashMap, HashSet, Result, versions};
use ohno::{EnrichableExt, IntoAppError};
use regex::Regex;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::LazyLock;

const LOG_TARGET: &str = "normalize";

static PACKAGE_PATH_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:^|[/\\])node_modules[/\\](@[^/\\]+[/\\])?([^/\\]+)").expect("invalid regex"));

/// Normalize a stats document that is already held as a JSON value.
///
/// `extra` records are registered after the ones embedded in the document, so they
/// take precedence on lookup.
pub fn normalize_value(value: Value, file: &str, extra: Vec<ExtensionRecord>) -> Result<StatsDocument> {
    let raw = RawStats::deserialize(value).into_app_err_with(|| format!("unable to read stats from '{file}'"))?;
    normalize_raw(raw, file, extra)
}

pub(super) fn normalize_raw(mut raw: RawStats, file: &str, extra: Vec<ExtensionRecord>) -> Result<StatsDocument> {
    let shape = RawShapeVersion::detect(&raw).map_err(|e| e.enrich_with(|| format!("unable to normalize '{file}'")))?;
    log::debug!(target: LOG_TARGET, "Detected {shape} stats layout in '{file}'");

    let (mut registry, meta_context) = take_meta(&mut raw);
    for record in extra {
        registry.register_record(record);
    }

    let join = registry.clone();
    let mut builder = Builder {
        file,
        shape,
        join: &join,
        next_index: 0,
    };

    Ok(builder.build(raw, registry, meta_context, true))
}

fn take_meta(raw: &mut RawStats) -> (ExtensionRegistry, Option<String>) {
    match raw.statoscope.take() {
        Some(RawMeta { context, extensions }) => (extensions.into_iter().collect(), context),
        None => (ExtensionRegistry::new(), None),
    }
}

struct Builder<'a> {
    file: &'a str,
    shape: RawShapeVersion,

    /// Registry of the root compilation, used by children that carry no extensions of their own.
    join: &'a ExtensionRegistry,
    next_index: usize,
}

impl Builder<'_> {
    fn build(&mut self, mut raw: RawStats, extensions: ExtensionRegistry, meta_context: Option<String>, is_root: bool) -> StatsDocument {
        let index = self.next_index;
        self.next_index += 1;

        let context = raw.context.take().or(meta_context);
        let id = raw.hash.clone().or_else(|| raw.name.clone()).unwrap_or_else(|| {
            if is_root {
                self.file.to_string()
            } else {
                format!("{}#{index}", self.file)
            }
        });

        let extracted = self.shape.extract(&raw, context.as_deref());
        let mut table = ModuleTable::default();
        for module in extracted.modules {
            let _ = table.add(module, true);
        }
        for module in extracted.embedded {
            let _ = table.add(module, false);
        }

        let mut chunks = dedupe(extracted.chunks, |c| c.id.clone(), "chunk");
        let mut assets = dedupe(extracted.assets, |a| a.name.clone(), "asset");
        let mut entrypoints = extracted.entrypoints;

        resolve_references(&mut table, &mut chunks, &mut assets, &mut entrypoints);

        // sizes are joined only once the structure is final
        self.attach_compressed_sizes(&extensions, raw.hash.as_deref(), is_root, &mut table, &mut assets);
        compute_aggregates(&table, &mut chunks, &assets, &mut entrypoints);

        let packages = self.derive_packages(&extensions, raw.hash.as_deref(), is_root, &mut table.modules);

        let children = raw
            .children
            .take()
            .unwrap_or_default()
            .into_iter()
            .map(|mut child| {
                let (registry, child_context) = take_meta(&mut child);
                self.build(child, registry, child_context, false)
            })
            .collect();

        log::debug!(
            target: LOG_TARGET,
            "Compilation '{id}' of '{}': {} modules, {} chunks, {} assets, {} packages",
            self.file,
            table.modules.len(),
            chunks.len(),
            assets.len(),
            packages.len()
        );

        StatsDocument::from_parts(DocumentParts {
            id,
            file: self.file.to_string(),
            name: raw.name,
            hash: raw.hash,
            bundler_version: raw.version,
            built_at: raw.built_at,
            time: raw.time.map(|time| byte_size(Some(time))),
            context,
            shape: self.shape,
            extensions,
            modules: table.modules,
            chunks,
            assets,
            entrypoints,
            packages,
            children,
        })
    }

    /// Payload of `name` for a compilation, plus whether entries without an id apply to it.
    ///
    /// The compilation's own records win; otherwise the root records are used, where
    /// id-less entries only describe the root.
    fn payload<T: DeserializeOwned>(&self, own: &ExtensionRegistry, name: &str, is_root: bool) -> Option<(T, bool)> {
        own.payload(name)
            .map(|payload| (payload, true))
            .or_else(|| self.join.payload(name).map(|payload| (payload, is_root)))
    }

    fn attach_compressed_sizes(
        &self,
        own: &ExtensionRegistry,
        hash: Option<&str>,
        is_root: bool,
        table: &mut ModuleTable,
        assets: &mut [Asset],
    ) {
        let Some((payload, own_root)) = self.payload::<CompressedPayload>(own, COMPRESSED_EXTENSION, is_root) else {
            return;
        };

        let Some(compilation) = payload.compilation(hash, own_root) else {
            return;
        };

        let sizes = compilation.by_resource();

        for (module, aliases) in table.modules.iter_mut().zip(&table.aliases) {
            let found = core::iter::once(&module.id)
                .chain(aliases)
                .find_map(|key| sizes.get(key.as_str()));

            for size in found.into_iter().flatten() {
                let _ = module.size.compressed.insert(size.compressor.clone(), size.size);
            }
        }

        for asset in assets {
            for size in sizes.get(asset.name.as_str()).into_iter().flatten() {
                let _ = asset.size.compressed.insert(size.compressor.clone(), size.size);
            }
        }
    }

    fn derive_packages(&self, own: &ExtensionRegistry, hash: Option<&str>, is_root: bool, modules: &mut [Module]) -> Vec<Package> {
        // package name -> instance path -> member modules
        let mut found: BTreeMap<String, BTreeMap<String, Vec<String>>> = BTreeMap::new();

        for module in modules.iter_mut() {
            let Some((name, path)) = module.resource.as_deref().and_then(package_of_path) else {
                continue;
            };

            found.entry(name.clone()).or_default().entry(path).or_default().push(module.id.clone());
            module.package = Some(name);
        }

        let info = self.payload::<PackageInfoPayload>(own, PACKAGE_INFO_EXTENSION, is_root);
        let info = info.as_ref().and_then(|(payload, own_root)| payload.compilation(hash, *own_root));

        found
            .into_iter()
            .map(|(name, instances)| {
                let instances: Vec<PackageInstance> = instances
                    .into_iter()
                    .map(|(path, modules)| PackageInstance {
                        version: info.and_then(|info| info.version_of(&name, &path)).map(str::to_string),
                        path,
                        modules,
                    })
                    .collect();

                let version = instances
                    .iter()
                    .filter(|instance| instance.version.is_some())
                    .min_by_key(|instance| (instance.path.matches("node_modules").count(), instance.path.len()))
                    .and_then(|instance| instance.version.clone());

                let mut all_versions: Vec<String> = instances.iter().filter_map(|instance| instance.version.clone()).collect();
                all_versions.sort_by_cached_key(|v| (versions::parse(v), v.clone()));
                all_versions.dedup();

                Package {
                    name,
                    version,
                    versions: all_versions,
                    instances,
                }
            })
            .collect()
    }
}

/// Package name and installation path for a resource inside a package directory.
///
/// The innermost `node_modules` segment wins, so nested installations are told apart.
pub(super) fn package_of_path(resource: &str) -> Option<(String, String)> {
    let captures = PACKAGE_PATH_REGEX.captures_iter(resource).last()?;
    let whole = captures.get(0)?;
    let name = captures.get(2)?.as_str();

    let name = match captures.get(1) {
        Some(scope) => format!("{}/{name}", scope.as_str().trim_end_matches(['/', '\\'])),
        None => name.to_string(),
    };

    let path = resource.get(..whole.end())?.replace('\\', "/");
    Some((name, path))
}

#[derive(Debug, Default)]
struct ModuleTable {
    modules: Vec<Module>,

    /// Alternative keys of each module, parallel to `modules`.
    aliases: Vec<Vec<String>>,

    /// Raw references to the modules importing each module, parallel to `modules`.
    issuers: Vec<Vec<String>>,

    /// Every key and alias mapped to its module position.
    lookup: HashMap<String, usize>,
}

impl ModuleTable {
    /// Insert a module and its inner modules, returning the canonical id.
    fn add(&mut self, extracted: ExtractedModule, warn_duplicates: bool) -> String {
        let ExtractedModule {
            key,
            aliases,
            name,
            resource,
            module_type,
            size,
            chunks,
            issuers,
            inner,
        } = extracted;

        let inner_ids: Vec<String> = inner.into_iter().map(|module| self.add(module, false)).collect();

        if let Some(&existing) = self.lookup.get(&key)
            && self.modules[existing].id == key
        {
            if warn_duplicates {
                log::warn!(target: LOG_TARGET, "Duplicate module id '{key}', merging its references");
            }

            let module = &mut self.modules[existing];
            merge_unique(&mut module.chunks, chunks);
            merge_unique(&mut module.modules, inner_ids);
            merge_unique(&mut self.issuers[existing], issuers);
            return key;
        }

        let position = self.modules.len();
        let _ = self.lookup.insert(key.clone(), position);
        for alias in &aliases {
            let _ = self.lookup.entry(alias.clone()).or_insert(position);
        }

        let mut module = Module::new(key.clone(), name);
        module.resource = resource;
        module.module_type = module_type;
        module.size = ResourceSize::new(size);
        module.chunks = chunks;
        module.modules = inner_ids;

        self.modules.push(module);
        self.aliases.push(aliases);
        self.issuers.push(issuers);
        key
    }

    fn resolve(&self, key: &str) -> Option<usize> {
        self.lookup.get(key).copied()
    }
}

fn merge_unique(target: &mut Vec<String>, items: Vec<String>) {
    for item in items {
        if !target.contains(&item) {
            target.push(item);
        }
    }
}

fn dedupe<T>(items: Vec<T>, key: impl Fn(&T) -> String, kind: &str) -> Vec<T> {
    let mut seen = HashSet::default();
    items
        .into_iter()
        .filter(|item| {
            let id = key(item);
            let fresh = seen.insert(id.clone());
            if !fresh {
                log::warn!(target: LOG_TARGET, "Duplicate {kind} id '{id}', keeping the first occurrence");
            }
            fresh
        })
        .collect()
}

/// Drop references to entities that do not exist and fill in the inverse links.
fn resolve_references(table: &mut ModuleTable, chunks: &mut [Chunk], assets: &mut [Asset], entrypoints: &mut [Entrypoint]) {
    let chunk_ids: HashSet<String> = chunks.iter().map(|c| c.id.clone()).collect();
    let asset_names: HashSet<String> = assets.iter().map(|a| a.name.clone()).collect();
    let mut dangling = 0usize;

    let mut retain_known = |list: &mut Vec<String>, known: &HashSet<String>| {
        let before = list.len();
        list.retain(|id| known.contains(id));
        dangling += before - list.len();
    };

    for module in &mut table.modules {
        retain_known(&mut module.chunks, &chunk_ids);
    }

    for chunk in chunks.iter_mut() {
        retain_known(&mut chunk.parents, &chunk_ids);
        retain_known(&mut chunk.children, &chunk_ids);
        retain_known(&mut chunk.siblings, &chunk_ids);
        retain_known(&mut chunk.files, &asset_names);
    }

    for asset in assets.iter_mut() {
        retain_known(&mut asset.chunks, &chunk_ids);
    }

    for entry in entrypoints.iter_mut() {
        retain_known(&mut entry.chunks, &chunk_ids);
        retain_known(&mut entry.assets, &asset_names);
    }

    // chunk membership: modules embedded in the chunk first, then modules naming the chunk
    let mut members: HashMap<&str, Vec<usize>> = HashMap::default();
    for (position, module) in table.modules.iter().enumerate() {
        for chunk in &module.chunks {
            members.entry(chunk.as_str()).or_default().push(position);
        }
    }

    for chunk in chunks.iter_mut() {
        let embedded = core::mem::take(&mut chunk.modules);
        let mut positions: Vec<usize> = Vec::new();
        for key in &embedded {
            match table.resolve(key) {
                Some(position) => positions.push(position),
                None => dangling += 1,
            }
        }
        positions.extend(members.get(chunk.id.as_str()).into_iter().flatten().copied());

        let mut seen = HashSet::default();
        chunk.modules = positions
            .into_iter()
            .filter(|position| seen.insert(*position))
            .map(|position| table.modules[position].id.clone())
            .collect();
    }

    // module references come from the reasons recorded on the referenced module
    let mut edges: Vec<(usize, usize)> = Vec::new();
    let mut seen_edges = HashSet::default();
    for (target, issuers) in table.issuers.iter().enumerate() {
        for issuer in issuers {
            match table.resolve(issuer) {
                Some(source) if source != target => {
                    if seen_edges.insert((source, target)) {
                        edges.push((source, target));
                    }
                }
                Some(_) => {}
                None => dangling += 1,
            }
        }
    }

    for (source, target) in edges {
        let target_id = table.modules[target].id.clone();
        let source_id = table.modules[source].id.clone();
        table.modules[source].dependencies.push(target_id);
        table.modules[target].dependents.push(source_id);
    }

    if dangling > 0 {
        log::debug!(target: LOG_TARGET, "Dropped {dangling} dangling references");
    }
}

fn compute_aggregates(table: &ModuleTable, chunks: &mut [Chunk], assets: &[Asset], entrypoints: &mut [Entrypoint]) {
    for chunk in chunks.iter_mut() {
        let summed = ResourceSize::sum(
            chunk
                .modules
                .iter()
                .filter_map(|id| table.resolve(id))
                .map(|position| &table.modules[position].size),
        );

        if chunk.size.raw == 0 {
            chunk.size.raw = summed.raw;
        }
        chunk.size.compressed = summed.compressed;
    }

    let by_name: HashMap<&str, &Asset> = assets.iter().map(|a| (a.name.as_str(), a)).collect();
    for entry in entrypoints.iter_mut() {
        entry.size = ResourceSize::sum(entry.assets.iter().filter_map(|name| by_name.get(name.as_str())).map(|a| &a.size));
    }
}
