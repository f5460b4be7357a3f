use serde::Serialize;

/// Paths found between two nodes, each listed from source to destination as node ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PathSolution {
    pub paths: Vec<Vec<String>>,
}

impl PathSolution {
    #[must_use]
    pub const fn len(&self) -> usize {
        self.paths.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// The first path in discovery order.
    #[must_use]
    pub fn first(&self) -> Option<&[String]> {
        self.paths.first().map(Vec::as_slice)
    }
}
