use super::{ChunkId, ResourceSize};
use serde::{Deserialize, Serialize};

/// A named entry of the build and the initial assets needed to load it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entrypoint {
    pub name: String,
    pub chunks: Vec<ChunkId>,
    pub assets: Vec<String>,

    /// Combined size of the entry assets.
    pub size: ResourceSize,
}

impl Entrypoint {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            chunks: Vec::new(),
            assets: Vec::new(),
            size: ResourceSize::default(),
        }
    }
}
