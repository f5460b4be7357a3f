use serde::Serialize;

/// A graph node: caller data plus adjacency to other nodes of the same graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Node<T> {
    pub(super) id: String,
    pub(super) data: T,

    #[serde(skip)]
    pub(super) outgoing: Vec<usize>,

    #[serde(skip)]
    pub(super) incoming: Vec<usize>,
}

impl<T> Node<T> {
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[must_use]
    pub const fn data(&self) -> &T {
        &self.data
    }

    /// Number of outgoing edges.
    #[must_use]
    pub const fn out_degree(&self) -> usize {
        self.outgoing.len()
    }

    /// Number of incoming edges.
    #[must_use]
    pub const fn in_degree(&self) -> usize {
        self.incoming.len()
    }
}
