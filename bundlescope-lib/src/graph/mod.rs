//! Generic directed graph with bounded path search
//!
//! Nodes are stored in an arena owned by the [`Graph`] and addressed by string ids.
//! Adjacency is kept as index lists in edge insertion order, so searches are
//! deterministic.

mod digraph;
mod node;
mod path_solution;

pub use digraph::Graph;
pub use node::Node;
pub use path_solution::PathSolution;
