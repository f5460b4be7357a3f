use super::{ChunkId, ModuleId, ResourceSize};
use serde::{Deserialize, Serialize};

/// A unit of source content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Module {
    pub id: ModuleId,
    pub name: String,

    /// Resolved resource path, with loaders and query strings removed.
    pub resource: Option<String>,
    pub module_type: Option<String>,
    pub size: ResourceSize,

    /// Modules this module references.
    pub dependencies: Vec<ModuleId>,

    /// Modules referencing this module.
    pub dependents: Vec<ModuleId>,

    /// Inner modules of a concatenated module.
    pub modules: Vec<ModuleId>,
    pub chunks: Vec<ChunkId>,

    /// Name of the owning package, resolved through [`StatsDocument::package`](super::StatsDocument::package).
    pub package: Option<String>,
}

impl Module {
    #[must_use]
    pub fn new(id: impl Into<ModuleId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            resource: None,
            module_type: None,
            size: ResourceSize::default(),
            dependencies: Vec::new(),
            dependents: Vec::new(),
            modules: Vec::new(),
            chunks: Vec::new(),
            package: None,
        }
    }
}
