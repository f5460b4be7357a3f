use super::{Asset, Chunk, Entrypoint, Module, Package};
use crate::HashMap;
use crate::extensions::ExtensionRegistry;
use crate::graph::Graph;
use crate::normalize::RawShapeVersion;
use serde::Serialize;

/// One normalized build-stats compilation.
///
/// The document produced for an input file is the root compilation; nested compilations
/// are available through [`children`](Self::children) and [`compilations`](Self::compilations).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsDocument {
    id: String,
    file: String,
    name: Option<String>,
    hash: Option<String>,
    bundler_version: Option<String>,
    built_at: Option<i64>,
    time: Option<u64>,
    context: Option<String>,
    shape: RawShapeVersion,
    extensions: ExtensionRegistry,
    modules: Vec<Module>,
    chunks: Vec<Chunk>,
    assets: Vec<Asset>,
    entrypoints: Vec<Entrypoint>,
    packages: Vec<Package>,
    children: Vec<StatsDocument>,

    #[serde(skip)]
    index: DocumentIndex,
}

/// Everything the normalizer assembles before the document is sealed.
#[derive(Debug)]
pub(crate) struct DocumentParts {
    pub id: String,
    pub file: String,
    pub name: Option<String>,
    pub hash: Option<String>,
    pub bundler_version: Option<String>,
    pub built_at: Option<i64>,
    pub time: Option<u64>,
    pub context: Option<String>,
    pub shape: RawShapeVersion,
    pub extensions: ExtensionRegistry,
    pub modules: Vec<Module>,
    pub chunks: Vec<Chunk>,
    pub assets: Vec<Asset>,
    pub entrypoints: Vec<Entrypoint>,
    pub packages: Vec<Package>,
    pub children: Vec<StatsDocument>,
}

#[derive(Debug, Clone, Default, PartialEq)]
struct DocumentIndex {
    modules: HashMap<String, usize>,
    chunks: HashMap<String, usize>,
    assets: HashMap<String, usize>,
    entrypoints: HashMap<String, usize>,
    packages: HashMap<String, usize>,
}

fn index_by<T>(items: &[T], key: impl Fn(&T) -> &str) -> HashMap<String, usize> {
    items.iter().enumerate().map(|(i, item)| (key(item).to_string(), i)).collect()
}

impl StatsDocument {
    pub(crate) fn from_parts(parts: DocumentParts) -> Self {
        let index = DocumentIndex {
            modules: index_by(&parts.modules, |m| &m.id),
            chunks: index_by(&parts.chunks, |c| &c.id),
            assets: index_by(&parts.assets, |a| &a.name),
            entrypoints: index_by(&parts.entrypoints, |e| &e.name),
            packages: index_by(&parts.packages, |p| &p.name),
        };

        Self {
            id: parts.id,
            file: parts.file,
            name: parts.name,
            hash: parts.hash,
            bundler_version: parts.bundler_version,
            built_at: parts.built_at,
            time: parts.time,
            context: parts.context,
            shape: parts.shape,
            extensions: parts.extensions,
            modules: parts.modules,
            chunks: parts.chunks,
            assets: parts.assets,
            entrypoints: parts.entrypoints,
            packages: parts.packages,
            children: parts.children,
            index,
        }
    }

    /// Compilation id: the hash when present, otherwise a name derived from the input.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Name of the input file this compilation came from.
    #[must_use]
    pub fn file(&self) -> &str {
        &self.file
    }

    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    #[must_use]
    pub fn hash(&self) -> Option<&str> {
        self.hash.as_deref()
    }

    #[must_use]
    pub fn bundler_version(&self) -> Option<&str> {
        self.bundler_version.as_deref()
    }

    /// Compile timestamp in milliseconds since the Unix epoch.
    #[must_use]
    pub const fn built_at(&self) -> Option<i64> {
        self.built_at
    }

    /// Build duration in milliseconds.
    #[must_use]
    pub const fn time(&self) -> Option<u64> {
        self.time
    }

    #[must_use]
    pub fn context(&self) -> Option<&str> {
        self.context.as_deref()
    }

    #[must_use]
    pub const fn shape(&self) -> RawShapeVersion {
        self.shape
    }

    #[must_use]
    pub const fn extensions(&self) -> &ExtensionRegistry {
        &self.extensions
    }

    #[must_use]
    pub fn modules(&self) -> &[Module] {
        &self.modules
    }

    #[must_use]
    pub fn chunks(&self) -> &[Chunk] {
        &self.chunks
    }

    #[must_use]
    pub fn assets(&self) -> &[Asset] {
        &self.assets
    }

    #[must_use]
    pub fn entrypoints(&self) -> &[Entrypoint] {
        &self.entrypoints
    }

    #[must_use]
    pub fn packages(&self) -> &[Package] {
        &self.packages
    }

    #[must_use]
    pub fn children(&self) -> &[Self] {
        &self.children
    }

    /// This compilation followed by all nested compilations, depth first.
    #[must_use]
    pub fn compilations(&self) -> Vec<&Self> {
        let mut result = vec![self];
        for child in &self.children {
            result.extend(child.compilations());
        }
        result
    }

    #[must_use]
    pub fn module(&self, id: &str) -> Option<&Module> {
        self.index.modules.get(id).and_then(|&i| self.modules.get(i))
    }

    #[must_use]
    pub fn chunk(&self, id: &str) -> Option<&Chunk> {
        self.index.chunks.get(id).and_then(|&i| self.chunks.get(i))
    }

    #[must_use]
    pub fn asset(&self, name: &str) -> Option<&Asset> {
        self.index.assets.get(name).and_then(|&i| self.assets.get(i))
    }

    #[must_use]
    pub fn entrypoint(&self, name: &str) -> Option<&Entrypoint> {
        self.index.entrypoints.get(name).and_then(|&i| self.entrypoints.get(i))
    }

    #[must_use]
    pub fn package(&self, name: &str) -> Option<&Package> {
        self.index.packages.get(name).and_then(|&i| self.packages.get(i))
    }

    #[must_use]
    pub fn module_package(&self, module: &Module) -> Option<&Package> {
        module.package.as_deref().and_then(|name| self.package(name))
    }

    /// Directed graph of module references, from a module to its dependencies.
    #[must_use]
    pub fn module_graph(&self) -> Graph<String> {
        let mut graph = Graph::new();
        for module in &self.modules {
            let _ = graph.add_node(&module.id, module.name.clone());
        }
        for module in &self.modules {
            for dependency in &module.dependencies {
                let _ = graph.add_edge(&module.id, dependency);
            }
        }
        graph
    }

    /// Directed graph of chunks, from a parent chunk to its children.
    #[must_use]
    pub fn chunk_graph(&self) -> Graph<String> {
        let mut graph = Graph::new();
        for chunk in &self.chunks {
            let _ = graph.add_node(&chunk.id, chunk.display_name().to_string());
        }
        for chunk in &self.chunks {
            for child in &chunk.children {
                let _ = graph.add_edge(&chunk.id, child);
            }
        }
        graph
    }
}
