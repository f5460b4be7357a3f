use super::{Node, PathSolution};
use crate::{HashMap, HashSet};

/// Directed graph owning all of its nodes.
#[derive(Debug, Clone)]
pub struct Graph<T> {
    nodes: Vec<Node<T>>,
    index: HashMap<String, usize>,
    edges: HashSet<(usize, usize)>,
}

impl<T> Default for Graph<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Graph<T> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            index: HashMap::default(),
            edges: HashSet::default(),
        }
    }

    /// Add a node, returning `false` when a node with this id already exists.
    ///
    /// An existing node keeps its data.
    pub fn add_node(&mut self, id: &str, data: T) -> bool {
        if self.index.contains_key(id) {
            return false;
        }

        let _ = self.index.insert(id.to_string(), self.nodes.len());
        self.nodes.push(Node {
            id: id.to_string(),
            data,
            outgoing: Vec::new(),
            incoming: Vec::new(),
        });

        true
    }

    /// Add an edge between two existing nodes.
    ///
    /// Returns `false` when either end is unknown or the edge already exists.
    pub fn add_edge(&mut self, from: &str, to: &str) -> bool {
        let (Some(&from), Some(&to)) = (self.index.get(from), self.index.get(to)) else {
            return false;
        };

        if !self.edges.insert((from, to)) {
            return false;
        }

        self.nodes[from].outgoing.push(to);
        self.nodes[to].incoming.push(from);
        true
    }

    #[must_use]
    pub fn get_node(&self, id: &str) -> Option<&Node<T>> {
        self.index.get(id).map(|&i| &self.nodes[i])
    }

    #[must_use]
    pub fn has_edge(&self, from: &str, to: &str) -> bool {
        match (self.index.get(from), self.index.get(to)) {
            (Some(&from), Some(&to)) => self.edges.contains(&(from, to)),
            _ => false,
        }
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Node<T>> {
        self.nodes.iter()
    }

    pub fn outgoing<'a>(&'a self, node: &'a Node<T>) -> impl Iterator<Item = &'a Node<T>> + 'a {
        node.outgoing.iter().map(|&i| &self.nodes[i])
    }

    pub fn incoming<'a>(&'a self, node: &'a Node<T>) -> impl Iterator<Item = &'a Node<T>> + 'a {
        node.incoming.iter().map(|&i| &self.nodes[i])
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Enumerate simple paths from `from` to `to` in depth-first discovery order.
    ///
    /// No path visits a node twice and a path ends as soon as it reaches `to`. The search
    /// stops after `max` paths when a bound is given. Returns `None` when either node is
    /// unknown or no path exists.
    #[must_use]
    pub fn find_paths(&self, from: &str, to: &str, max: Option<usize>) -> Option<PathSolution> {
        let &start = self.index.get(from)?;
        let &target = self.index.get(to)?;

        if max == Some(0) {
            return None;
        }

        let mut paths = Vec::new();
        if start == target {
            paths.push(vec![self.nodes[start].id.clone()]);
            return Some(PathSolution { paths });
        }

        // each frame is a node on the current path and the next outgoing edge to try
        let mut stack: Vec<(usize, usize)> = vec![(start, 0)];
        let mut on_path: HashSet<usize> = HashSet::default();
        let _ = on_path.insert(start);

        while let Some(frame) = stack.last_mut() {
            let (node, cursor) = *frame;
            let Some(&next) = self.nodes[node].outgoing.get(cursor) else {
                let _ = on_path.remove(&node);
                let _ = stack.pop();
                continue;
            };

            frame.1 += 1;

            if next == target {
                let mut path: Vec<String> = stack.iter().map(|&(i, _)| self.nodes[i].id.clone()).collect();
                path.push(self.nodes[target].id.clone());
                paths.push(path);

                if max.is_some_and(|max| paths.len() >= max) {
                    break;
                }
            } else if on_path.insert(next) {
                stack.push((next, 0));
            }
        }

        if paths.is_empty() { None } else { Some(PathSolution { paths }) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph(edges: &[(&str, &str)]) -> Graph<()> {
        let mut g = Graph::new();
        for (from, to) in edges {
            let _ = g.add_node(from, ());
            let _ = g.add_node(to, ());
        }
        for (from, to) in edges {
            let _ = g.add_edge(from, to);
        }
        g
    }

    #[test]
    fn test_get_node_missing() {
        let g = graph(&[("a", "b")]);
        assert!(g.get_node("a").is_some());
        assert!(g.get_node("z").is_none());
    }

    #[test]
    fn test_add_edge_is_idempotent() {
        let mut g = graph(&[("a", "b")]);
        assert!(!g.add_edge("a", "b"));
        assert!(!g.add_edge("a", "missing"));
        assert_eq!(g.get_node("a").unwrap().out_degree(), 1);
        assert_eq!(g.get_node("b").unwrap().in_degree(), 1);
        assert!(g.has_edge("a", "b"));
        assert!(!g.has_edge("b", "a"));
    }

    #[test]
    fn test_add_node_keeps_first() {
        let mut g = Graph::new();
        assert!(g.add_node("a", 1));
        assert!(!g.add_node("a", 2));
        assert_eq!(*g.get_node("a").unwrap().data(), 1);
        assert_eq!(g.len(), 1);
    }

    #[test]
    fn test_find_paths_in_discovery_order() {
        let g = graph(&[("a", "b"), ("a", "c"), ("b", "d"), ("c", "d"), ("a", "d")]);
        let solution = g.find_paths("a", "d", None).unwrap();

        assert_eq!(
            solution.paths,
            vec![vec!["a", "b", "d"], vec!["a", "c", "d"], vec!["a", "d"]]
        );
    }

    #[test]
    fn test_find_paths_respects_max() {
        let g = graph(&[("a", "b"), ("a", "c"), ("b", "d"), ("c", "d"), ("a", "d")]);
        let solution = g.find_paths("a", "d", Some(2)).unwrap();
        assert_eq!(solution.len(), 2);
        assert_eq!(solution.first().unwrap(), ["a", "b", "d"]);
    }

    #[test]
    fn test_find_paths_disconnected_is_none() {
        let g = graph(&[("a", "b"), ("c", "d")]);
        assert!(g.find_paths("a", "d", None).is_none());
        assert!(g.find_paths("a", "missing", None).is_none());
        assert!(g.find_paths("b", "a", None).is_none());
    }

    #[test]
    fn test_find_paths_tolerates_cycles() {
        let g = graph(&[("a", "b"), ("b", "a"), ("b", "c"), ("c", "a"), ("c", "d")]);
        let solution = g.find_paths("a", "d", None).unwrap();

        assert_eq!(solution.paths, vec![vec!["a", "b", "c", "d"]]);
        for path in &solution.paths {
            let unique: HashSet<&String> = path.iter().collect();
            assert_eq!(unique.len(), path.len());
        }
    }

    #[test]
    fn test_find_paths_to_self() {
        let g = graph(&[("a", "b")]);
        let solution = g.find_paths("a", "a", None).unwrap();
        assert_eq!(solution.paths, vec![vec!["a"]]);
    }

    #[test]
    fn test_find_paths_zero_max() {
        let g = graph(&[("a", "b")]);
        assert!(g.find_paths("a", "b", Some(0)).is_none());
    }
}
