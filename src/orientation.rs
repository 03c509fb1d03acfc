//! How edge direction is interpreted during a run.
//!
//! Direction changes which edges are traversed at a handful of well-defined points: the
//! shortest path searches, the clustering coefficient and the degree-specific statistics. It is
//! decided once when a run starts by picking one of the two policies below.

use std::fmt::Debug;

use crate::{
    local::{DirectedLocal, LocalPass, UndirectedLocal},
    network::{Link, Topology},
};

/// An edge direction policy.
pub trait Orientation: Copy + Debug + Default + 'static {
    /// Whether edges are followed from source to target only.
    const DIRECTED: bool;
    /// How many times the all-sources searches visit each pair of connected nodes.
    const PAIR_MULTIPLICITY: u32;

    /// The degree-specific part of the per-node pass.
    type Local: LocalPass;

    /// The links a search may follow when leaving `node`.
    fn successors<N, E>(topology: &Topology<N, E>, node: usize) -> &[Link];
}

/// Edges are followed from their source to their target.
#[derive(Clone, Copy, Debug, Default)]
pub struct Directed;

/// Edges are followed both ways.
#[derive(Clone, Copy, Debug, Default)]
pub struct Undirected;

impl Orientation for Directed {
    const DIRECTED: bool = true;
    const PAIR_MULTIPLICITY: u32 = 1;

    type Local = DirectedLocal;

    fn successors<N, E>(topology: &Topology<N, E>, node: usize) -> &[Link] {
        topology.outgoing(node)
    }
}

impl Orientation for Undirected {
    const DIRECTED: bool = false;
    // Every unordered pair is reached once from each end.
    const PAIR_MULTIPLICITY: u32 = 2;

    type Local = UndirectedLocal;

    fn successors<N, E>(topology: &Topology<N, E>, node: usize) -> &[Link] {
        topology.incident(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{edge::Edge, graph::Graph};

    #[test]
    fn successors() {
        let mut graph = Graph::new();
        graph.insert(Edge::new("a", "b"));
        let topology = Topology::new(&graph);

        assert_eq!(Directed::successors(&topology, 0).len(), 1);
        assert!(Directed::successors(&topology, 1).is_empty());
        assert_eq!(Undirected::successors(&topology, 1), &[Link { edge: 0, node: 0 }]);
    }
}
