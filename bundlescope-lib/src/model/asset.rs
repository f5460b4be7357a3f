use super::{ChunkId, ResourceSize};
use serde::{Deserialize, Serialize};

/// An emitted output file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Asset {
    pub name: String,
    pub size: ResourceSize,
    pub chunks: Vec<ChunkId>,
}

impl Asset {
    #[must_use]
    pub fn new(name: impl Into<String>, size: u64) -> Self {
        Self {
            name: name.into(),
            size: ResourceSize::new(size),
            chunks: Vec::new(),
        }
    }
}
