//! The read-only view of a network the analyzer works on.

use std::{collections::HashMap, fmt::Debug, hash::Hash};

use tracing::debug;

/// Read access to a host network.
///
/// The analyzer never mutates the network and only holds on to it for the duration of a run.
/// Implementations must iterate in the same order every time they are called during a run.
pub trait Network {
    type Node: Copy + Eq + Hash + Debug;
    type Edge: Copy + Eq + Hash + Debug;

    /// All the nodes in the network.
    fn nodes(&self) -> Vec<Self::Node>;

    /// The edges pointing to `node`.
    fn in_edges(&self, node: Self::Node) -> Vec<Self::Edge>;

    /// The edges leaving `node`.
    fn out_edges(&self, node: Self::Node) -> Vec<Self::Edge>;

    /// The node `edge` leaves from.
    fn source(&self, edge: Self::Edge) -> Self::Node;

    /// The node `edge` points to.
    fn target(&self, edge: Self::Edge) -> Self::Node;

    /// All the edges touching `node`, ignoring direction. A self-loop is only listed once.
    fn edges(&self, node: Self::Node) -> Vec<Self::Edge> {
        let mut edges = self.out_edges(node);
        for edge in self.in_edges(node) {
            if self.source(edge) != node {
                edges.push(edge);
            }
        }

        edges
    }
}

/// One end of an edge as seen from a node: the edge's index and the node at its other end.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Link {
    pub edge: usize,
    pub node: usize,
}

/// A dense snapshot of a network taken at the start of a run.
///
/// Nodes are indexed `0..n` in the network's iteration order and edges `0..m` in the order
/// they were first discovered, which keeps every computation over the snapshot reproducible.
#[derive(Clone, Debug)]
pub struct Topology<N, E> {
    nodes: Vec<N>,
    index: HashMap<N, usize>,
    edges: Vec<E>,
    endpoints: Vec<(usize, usize)>,
    incoming: Vec<Vec<Link>>,
    outgoing: Vec<Vec<Link>>,
    incident: Vec<Vec<Link>>,
}

impl<N, E> Topology<N, E>
where
    N: Copy + Eq + Hash + Debug,
    E: Copy + Eq + Hash + Debug,
{
    /// Takes a snapshot of the network.
    pub fn new<G>(network: &G) -> Self
    where
        G: Network<Node = N, Edge = E>,
    {
        let nodes = network.nodes();
        let index: HashMap<N, usize> = nodes
            .iter()
            .enumerate()
            .map(|(i, &node)| (node, i))
            .collect();

        let n = nodes.len();
        let mut edges = Vec::new();
        let mut edge_index: HashMap<E, usize> = HashMap::new();
        let mut endpoints = Vec::new();

        // Edges are discovered from either end so hosts that only fill one side still work.
        for &node in &nodes {
            for edge in network
                .out_edges(node)
                .into_iter()
                .chain(network.in_edges(node))
            {
                if edge_index.contains_key(&edge) {
                    continue;
                }

                let (source, target) = (network.source(edge), network.target(edge));
                match (index.get(&source), index.get(&target)) {
                    (Some(&s), Some(&t)) => {
                        edge_index.insert(edge, edges.len());
                        edges.push(edge);
                        endpoints.push((s, t));
                    }
                    _ => debug!(?edge, "ignoring edge with an endpoint outside the network"),
                }
            }
        }

        let mut incoming = vec![Vec::new(); n];
        let mut outgoing = vec![Vec::new(); n];
        let mut incident = vec![Vec::new(); n];

        for (edge, &(s, t)) in endpoints.iter().enumerate() {
            outgoing[s].push(Link { edge, node: t });
            incoming[t].push(Link { edge, node: s });
            incident[s].push(Link { edge, node: t });
            if s != t {
                incident[t].push(Link { edge, node: s });
            }
        }

        Self {
            nodes,
            index,
            edges,
            endpoints,
            incoming,
            outgoing,
            incident,
        }
    }

    /// The host identifier of the node at `index`.
    pub fn node(&self, index: usize) -> N {
        self.nodes[index]
    }

    /// The dense index of a host node, if it's part of the snapshot.
    pub fn index_of(&self, node: &N) -> Option<usize> {
        self.index.get(node).copied()
    }

    /// The host identifier of the edge at `index`.
    pub fn edge(&self, index: usize) -> E {
        self.edges[index]
    }
}

impl<N, E> Topology<N, E> {
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// The `(source, target)` node indices of the edge at `index`.
    pub fn endpoints(&self, index: usize) -> (usize, usize) {
        self.endpoints[index]
    }

    /// Links from the sources of the edges pointing to `node`.
    pub fn incoming(&self, node: usize) -> &[Link] {
        &self.incoming[node]
    }

    /// Links to the targets of the edges leaving `node`.
    pub fn outgoing(&self, node: usize) -> &[Link] {
        &self.outgoing[node]
    }

    /// Links across every edge touching `node`, self-loops are listed once.
    pub fn incident(&self, node: usize) -> &[Link] {
        &self.incident[node]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{edge::Edge, graph::Graph};

    #[test]
    fn snapshot_indices() {
        let mut graph = Graph::new();
        graph.insert(Edge::new("a", "b"));
        graph.insert(Edge::new("b", "c"));
        graph.insert(Edge::new("c", "c"));

        let topology = Topology::new(&graph);

        assert_eq!(topology.node_count(), 3);
        assert_eq!(topology.edge_count(), 3);
        assert_eq!(topology.index_of(&"b"), Some(1));
        assert_eq!(topology.index_of(&"z"), None);
        assert_eq!(topology.node(2), "c");
        assert_eq!(topology.endpoints(0), (0, 1));

        assert_eq!(topology.outgoing(0), &[Link { edge: 0, node: 1 }]);
        assert_eq!(topology.incoming(1), &[Link { edge: 0, node: 0 }]);
        assert_eq!(topology.incident(1).len(), 2);

        // The self-loop shows up once per side.
        assert_eq!(topology.incident(2).len(), 2);
        assert_eq!(topology.incoming(2).len(), 2);
        assert_eq!(topology.outgoing(2).len(), 1);
    }

    #[test]
    fn undirected_edges_list_self_loops_once() {
        let mut graph = Graph::new();
        let looped = graph.insert(Edge::new("a", "a"));
        let other = graph.insert(Edge::new("b", "a"));

        assert_eq!(graph.edges("a"), vec![looped, other]);
    }
}
