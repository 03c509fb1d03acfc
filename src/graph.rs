//! A module for working with graphs.

use std::{
    collections::{BTreeMap, BTreeSet, HashSet},
    fmt::Debug,
    hash::Hash,
};

use crate::{edge::Edge, network::Network};

/// Identifies an edge in a [`Graph`], stable across insertions and removals.
pub type EdgeId = usize;

/// An in-memory multigraph, made up of vertices and edges.
///
/// Parallel edges, self-loops and isolated vertices are all allowed, which is the common case for
/// the real-world networks this crate is meant for.
#[derive(Clone, Debug)]
pub struct Graph<T> {
    /// The vertices in the graph.
    ///
    /// The use of a `BTreeSet` means we need the `Ord` bound on `T`. The sorted collection allows
    /// us to maintain some form of order between computations, which keeps results reproducible.
    vertices: BTreeSet<T>,
    /// The edges in the graph, keyed by their id.
    edges: BTreeMap<EdgeId, Edge<T>>,
    /// The id handed out to the next inserted edge.
    next_id: EdgeId,
    /// Edge ids leaving each vertex, in insertion order.
    outgoing: BTreeMap<T, Vec<EdgeId>>,
    /// Edge ids pointing to each vertex, in insertion order.
    incoming: BTreeMap<T, Vec<EdgeId>>,
}

impl<T> Default for Graph<T>
where
    T: Copy + Eq + Hash + Ord + Debug,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Graph<T>
where
    T: Copy + Eq + Hash + Ord + Debug,
{
    /// Creates an empty graph.
    ///
    /// # Examples
    ///
    /// ```
    /// use netanalyzer::graph::Graph;
    ///
    /// let graph: Graph<&str> = Graph::new();
    /// ```
    pub fn new() -> Self {
        Self {
            vertices: Default::default(),
            edges: Default::default(),
            next_id: 0,
            outgoing: Default::default(),
            incoming: Default::default(),
        }
    }

    /// Adds a vertex without any edges, returns whether it was newly added.
    pub fn add_vertex(&mut self, vertex: T) -> bool {
        self.vertices.insert(vertex)
    }

    /// Inserts an edge into the graph, adding its vertices if needed.
    ///
    /// Inserting the same edge twice creates two parallel edges.
    pub fn insert(&mut self, edge: Edge<T>) -> EdgeId {
        let id = self.next_id;
        self.next_id += 1;

        let (source, target) = (*edge.source(), *edge.target());
        self.vertices.insert(source);
        self.vertices.insert(target);
        self.outgoing.entry(source).or_default().push(id);
        self.incoming.entry(target).or_default().push(id);
        self.edges.insert(id, edge);

        id
    }

    /// Inserts a subset of `(hub, leaf)` edges into the graph.
    pub fn insert_subset(&mut self, hub: T, leaves: &[T]) -> Vec<EdgeId> {
        leaves
            .iter()
            .map(|leaf| self.insert(Edge::new(hub, *leaf)))
            .collect()
    }

    /// Makes the `(hub, leaf)` edges leaving the hub match `leaves` exactly: edges leaving the hub
    /// to vertices not in `leaves` are removed and missing ones are inserted.
    pub fn update_subset(&mut self, hub: T, leaves: &[T]) {
        let wanted: HashSet<T> = leaves.iter().copied().collect();

        let stale: Vec<EdgeId> = self
            .out_edges(hub)
            .into_iter()
            .filter(|id| {
                self.edges
                    .get(id)
                    .map_or(false, |edge| !wanted.contains(edge.target()))
            })
            .collect();
        for id in stale {
            self.remove(id);
        }

        for leaf in wanted {
            if !self.contains(&Edge::new(hub, leaf)) {
                self.insert(Edge::new(hub, leaf));
            }
        }
    }

    /// Removes an edge from the graph and returns it if it was present. Its vertices are kept.
    ///
    /// # Examples
    ///
    /// ```
    /// use netanalyzer::edge::Edge;
    /// use netanalyzer::graph::Graph;
    ///
    /// let mut graph = Graph::new();
    /// let id = graph.insert(Edge::new("a", "b"));
    ///
    /// assert_eq!(graph.remove(id), Some(Edge::new("a", "b")));
    /// assert_eq!(graph.remove(id), None);
    /// assert_eq!(graph.vertex_count(), 2);
    /// ```
    pub fn remove(&mut self, id: EdgeId) -> Option<Edge<T>> {
        let edge = self.edges.remove(&id)?;

        if let Some(ids) = self.outgoing.get_mut(edge.source()) {
            ids.retain(|&other| other != id);
        }
        if let Some(ids) = self.incoming.get_mut(edge.target()) {
            ids.retain(|&other| other != id);
        }

        Some(edge)
    }

    /// Checks if the graph contains at least one edge from `edge.source()` to `edge.target()`.
    pub fn contains(&self, edge: &Edge<T>) -> bool {
        self.outgoing
            .get(edge.source())
            .into_iter()
            .flatten()
            .any(|id| self.edges.get(id) == Some(edge))
    }

    /// Returns the edge with the given id.
    pub fn edge(&self, id: EdgeId) -> Option<&Edge<T>> {
        self.edges.get(&id)
    }

    /// Returns the vertex count of the graph.
    ///
    /// # Examples
    ///
    /// ```
    /// use netanalyzer::edge::Edge;
    /// use netanalyzer::graph::Graph;
    ///
    /// let mut graph = Graph::new();
    /// graph.insert(Edge::new("a", "b"));
    /// graph.add_vertex("c");
    ///
    /// assert_eq!(graph.vertex_count(), 3);
    /// ```
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Returns the edge count of the graph, parallel edges are counted individually.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Returns whether two or more edges share the same source and target.
    ///
    /// This is what callers pass on as `has_duplicate_edges` when requesting a directed
    /// analysis.
    ///
    /// # Examples
    ///
    /// ```
    /// use netanalyzer::edge::Edge;
    /// use netanalyzer::graph::Graph;
    ///
    /// let mut graph = Graph::new();
    /// graph.insert(Edge::new("a", "b"));
    /// graph.insert(Edge::new("b", "a"));
    /// assert!(!graph.has_parallel_edges());
    ///
    /// graph.insert(Edge::new("a", "b"));
    /// assert!(graph.has_parallel_edges());
    /// ```
    pub fn has_parallel_edges(&self) -> bool {
        let mut seen = HashSet::new();
        self.edges.values().any(|edge| !seen.insert(*edge))
    }
}

impl<T> Network for Graph<T>
where
    T: Copy + Eq + Hash + Ord + Debug,
{
    type Node = T;
    type Edge = EdgeId;

    fn nodes(&self) -> Vec<T> {
        self.vertices.iter().copied().collect()
    }

    fn in_edges(&self, node: T) -> Vec<EdgeId> {
        self.incoming.get(&node).cloned().unwrap_or_default()
    }

    fn out_edges(&self, node: T) -> Vec<EdgeId> {
        self.outgoing.get(&node).cloned().unwrap_or_default()
    }

    fn edges(&self, node: T) -> Vec<EdgeId> {
        let mut edges = self.out_edges(node);
        // Self-loops are already listed as outgoing.
        edges.extend(
            self.in_edges(node)
                .into_iter()
                .filter(|id| self.edges.get(id).is_some_and(|edge| !edge.is_self_loop())),
        );

        edges
    }

    // Edge ids handed to the analyzer all come from `in_edges` and `out_edges`, so they're
    // guaranteed to be present.
    fn source(&self, edge: EdgeId) -> T {
        *self.edges[&edge].source()
    }

    fn target(&self, edge: EdgeId) -> T {
        *self.edges[&edge].target()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new() {
        let _: Graph<()> = Graph::new();
    }

    #[test]
    fn insert() {
        let mut graph = Graph::new();
        let edge = Edge::new("a", "b");

        let first = graph.insert(edge);
        let second = graph.insert(edge);

        // Parallel edges are kept apart.
        assert_ne!(first, second);
        assert_eq!(graph.edge_count(), 2);
        assert_eq!(graph.vertex_count(), 2);
    }

    #[test]
    fn insert_subset() {
        let mut graph = Graph::new();

        let (a, b, c, d) = ("a", "b", "c", "d");

        graph.insert(Edge::new(a, b));
        graph.insert(Edge::new(a, c));

        let ids = graph.insert_subset(a, &[b, d]);

        assert_eq!(ids.len(), 2);
        assert!(graph.contains(&Edge::new(a, b)));
        assert!(graph.contains(&Edge::new(a, c)));
        assert!(graph.contains(&Edge::new(a, d)));

        assert_eq!(graph.edge_count(), 4);
    }

    #[test]
    fn update_subset() {
        let mut graph = Graph::new();

        let (a, b, c, d) = ("a", "b", "c", "d");

        graph.insert(Edge::new(a, b));
        graph.insert(Edge::new(a, c));
        graph.insert(Edge::new(b, c));

        graph.update_subset(a, &[b, d]);

        assert!(graph.contains(&Edge::new(a, b)));
        assert!(!graph.contains(&Edge::new(a, c)));
        assert!(graph.contains(&Edge::new(b, c)));
        assert!(graph.contains(&Edge::new(a, d)));

        assert_eq!(graph.edge_count(), 3);
    }

    #[test]
    fn remove() {
        let mut graph = Graph::new();
        let id = graph.insert(Edge::new("a", "b"));

        assert_eq!(graph.remove(id), Some(Edge::new("a", "b")));
        assert!(!graph.contains(&Edge::new("a", "b")));
        assert!(graph.out_edges("a").is_empty());
        assert!(graph.in_edges("b").is_empty());
    }

    #[test]
    fn contains() {
        let mut graph = Graph::new();
        let edge = Edge::new("a", "b");

        graph.insert(edge);

        assert!(graph.contains(&edge));
        assert!(!graph.contains(&Edge::new("b", "a")));
        assert!(!graph.contains(&Edge::new("b", "c")));
    }

    #[test]
    fn vertex_count() {
        let mut graph = Graph::new();
        assert_eq!(graph.vertex_count(), 0);

        // Verify two new vertices get added when they don't yet exist in the graph.
        graph.insert(Edge::new("a", "b"));
        assert_eq!(graph.vertex_count(), 2);

        // Verify only one new vertex is added when one of them already exists in the graph.
        graph.insert(Edge::new("a", "c"));
        assert_eq!(graph.vertex_count(), 3);

        assert!(!graph.add_vertex("a"));
        assert!(graph.add_vertex("d"));
        assert_eq!(graph.vertex_count(), 4);
    }

    #[test]
    fn network_adjacency() {
        let (a, b, c) = ("a", "b", "c");
        let graph = graph!([a, b, c]);

        assert_eq!(graph.nodes(), vec![a, b, c]);
        assert_eq!(graph.out_edges(a), vec![0]);
        assert_eq!(graph.in_edges(b), vec![0]);
        assert_eq!(graph.out_edges(b), vec![1]);
        assert_eq!(graph.source(1), b);
        assert_eq!(graph.target(1), c);
        assert_eq!(graph.edges(b), vec![1, 0]);
    }

    #[test]
    fn self_loop_listed_once() {
        let (a, b) = ("a", "b");
        let graph = graph!([a, a, b], [b, a]);

        assert_eq!(graph.edges(a), vec![0, 1, 2]);
        assert_eq!(graph.edges(b), vec![2, 1]);
    }

    #[test]
    fn parallel_edges() {
        let (a, b) = ("a", "b");
        let mut graph = graph!([a, b, a]);
        assert!(!graph.has_parallel_edges());

        graph.insert(Edge::new(b, a));
        assert!(graph.has_parallel_edges());
    }
}
