//! Partitioning a network into connected components.

use std::{collections::VecDeque, fmt::Debug, hash::Hash};

use crate::network::{Network, Topology};

/// A maximal set of nodes mutually reachable when edge direction is ignored.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Component {
    /// Dense node indices into the topology, ascending.
    nodes: Vec<usize>,
}

impl Component {
    pub fn nodes(&self) -> &[usize] {
        &self.nodes
    }

    pub fn size(&self) -> usize {
        self.nodes.len()
    }

    pub fn contains(&self, node: usize) -> bool {
        self.nodes.binary_search(&node).is_ok()
    }
}

/// Computes the connected components of a topology.
///
/// Components are ordered by their lowest node index and every node, isolated ones included,
/// belongs to exactly one of them.
pub fn components<N, E>(topology: &Topology<N, E>) -> Vec<Component> {
    let n = topology.node_count();
    let mut assigned = vec![false; n];
    let mut components = Vec::new();
    let mut queue = VecDeque::new();

    for start in 0..n {
        if assigned[start] {
            continue;
        }

        assigned[start] = true;
        queue.push_back(start);
        let mut nodes = Vec::new();

        while let Some(node) = queue.pop_front() {
            nodes.push(node);
            for link in topology.incident(node) {
                if !assigned[link.node] {
                    assigned[link.node] = true;
                    queue.push_back(link.node);
                }
            }
        }

        nodes.sort_unstable();
        components.push(Component { nodes });
    }

    components
}

/// Computes the connected components of a network, as sets of its own node identifiers.
///
/// # Examples
///
/// ```
/// use netanalyzer::components::find_components;
/// use netanalyzer::edge::Edge;
/// use netanalyzer::graph::Graph;
///
/// let mut graph = Graph::new();
/// graph.insert(Edge::new("a", "b"));
/// graph.insert(Edge::new("c", "d"));
/// graph.add_vertex("e");
///
/// assert_eq!(
///     find_components(&graph),
///     vec![vec!["a", "b"], vec!["c", "d"], vec!["e"]]
/// );
/// ```
pub fn find_components<G>(network: &G) -> Vec<Vec<G::Node>>
where
    G: Network,
    G::Node: Copy + Eq + Hash + Debug,
{
    let topology = Topology::new(network);

    components(&topology)
        .iter()
        .map(|component| {
            component
                .nodes()
                .iter()
                .map(|&index| topology.node(index))
                .collect()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::{edge::Edge, graph::Graph};

    #[test]
    fn ignores_direction() {
        let mut graph = Graph::new();
        graph.insert(Edge::new("a", "b"));
        graph.insert(Edge::new("c", "b"));

        assert_eq!(find_components(&graph), vec![vec!["a", "b", "c"]]);
    }

    #[test]
    fn isolated_nodes_are_singletons() {
        let mut graph = Graph::new();
        graph.add_vertex("a");
        graph.insert(Edge::new("b", "b"));

        assert_eq!(find_components(&graph), vec![vec!["a"], vec!["b"]]);
    }

    #[test]
    fn partition_is_total_and_disjoint() {
        let mut graph = Graph::new();
        for (a, b) in [(0, 1), (1, 2), (3, 4), (5, 5), (6, 7), (7, 6), (2, 0)] {
            graph.insert(Edge::new(a, b));
        }
        graph.add_vertex(8);

        let topology = Topology::new(&graph);
        let components = components(&topology);

        let total: usize = components.iter().map(Component::size).sum();
        assert_eq!(total, topology.node_count());

        let mut seen = HashSet::new();
        for component in &components {
            for &node in component.nodes() {
                assert!(seen.insert(node));
                assert!(component.contains(node));
            }
        }

        assert_eq!(components.len(), 5);
    }

    #[test]
    fn empty() {
        let graph: Graph<u8> = Graph::new();
        assert!(find_components(&graph).is_empty());
    }
}
