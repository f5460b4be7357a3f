use super::{ChunkId, ModuleId, ResourceSize};
use serde::{Deserialize, Serialize};

/// A deployable grouping of modules.
///
/// `parents`, `children` and `siblings` are non-owning links. Raw input may contain
/// cycles among them and they are kept as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chunk {
    pub id: ChunkId,
    pub names: Vec<String>,
    pub size: ResourceSize,
    pub modules: Vec<ModuleId>,
    pub parents: Vec<ChunkId>,
    pub children: Vec<ChunkId>,
    pub siblings: Vec<ChunkId>,

    /// Names of the assets emitted for this chunk.
    pub files: Vec<String>,
    pub initial: bool,
    pub entry: bool,
}

impl Chunk {
    #[must_use]
    pub fn new(id: impl Into<ChunkId>) -> Self {
        Self {
            id: id.into(),
            names: Vec::new(),
            size: ResourceSize::default(),
            modules: Vec::new(),
            parents: Vec::new(),
            children: Vec::new(),
            siblings: Vec::new(),
            files: Vec::new(),
            initial: false,
            entry: false,
        }
    }

    /// The first chunk name, falling back to the id.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.names.first().map_or(&self.id, String::as_str)
    }
}
