//! Node betweenness, edge betweenness and stress, following Brandes' accumulation scheme.
//!
//! Sources are processed one at a time within a connected component. The per-node search state
//! is allocated once per component and reset between sources, the cumulative scores live in
//! separate accumulators which are only normalised once every source in the component has run.
//!
//! References:
//!
//! 1. [Brandes](https://pdodds.w3.uvm.edu/research/papers/others/2001/brandes2001a.pdf)
//! 2. Newman and Girvan, "Finding and evaluating community structure in networks" (2004) for the
//!    edge variant.

use std::collections::{BTreeMap, VecDeque};

use crate::{
    network::{Link, Topology},
    orientation::Orientation,
};

/// A shortest path count went past `i64::MAX`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PathCountOverflow;

/// What the search knows about a node while processing a single source.
#[derive(Clone, Debug)]
pub struct NodeBetweennessState {
    /// Distance from the current source, `-1` when not reached yet.
    distance: i64,
    /// Number of shortest paths from the current source.
    path_count: i64,
    dependency: f64,
    stress_dependency: i64,
    /// Links back to the predecessors on shortest paths, `node` is a component-local index.
    predecessors: Vec<Link>,
    /// Edges leaving this node in the current source's shortest path DAG.
    forward_edges: Vec<usize>,
    /// The sum of the edge dependencies over `forward_edges`.
    forward_dependency: f64,
}

impl Default for NodeBetweennessState {
    fn default() -> Self {
        Self {
            distance: -1,
            path_count: 0,
            dependency: 0.0,
            stress_dependency: 0,
            predecessors: Vec::new(),
            forward_edges: Vec::new(),
            forward_dependency: 0.0,
        }
    }
}

impl NodeBetweennessState {
    fn reset(&mut self) {
        self.distance = -1;
        self.path_count = 0;
        self.dependency = 0.0;
        self.stress_dependency = 0;
        self.predecessors.clear();
        self.forward_edges.clear();
        self.forward_dependency = 0.0;
    }
}

/// The normalisation applied to betweenness scores in a component of `size` nodes.
///
/// # Examples
///
/// ```
/// use netanalyzer::betweenness::normalization_factor;
///
/// assert_eq!(normalization_factor(2), 1.0);
/// assert_eq!(normalization_factor(4), 2.0 / 6.0);
/// ```
pub fn normalization_factor(size: usize) -> f64 {
    if size > 2 {
        2.0 / ((size - 1) * (size - 2)) as f64
    } else {
        1.0
    }
}

/// Normalised scores of one connected component.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ComponentBetweenness {
    /// `(node, betweenness, stress)` for every node of the component, ascending.
    pub nodes: Vec<(usize, f64, i64)>,
    /// `(edge, betweenness)` for every edge of the component, ascending.
    pub edges: Vec<(usize, f64)>,
}

/// Accumulates betweenness and stress over the sources of a single component.
#[derive(Clone, Debug)]
pub struct BetweennessPass {
    /// Topology indices of the component's nodes, ascending.
    nodes: Vec<usize>,
    states: Vec<NodeBetweennessState>,
    order: Vec<usize>,
    queue: VecDeque<usize>,
    node_betweenness: Vec<f64>,
    stress: Vec<i64>,
    edge_betweenness: BTreeMap<usize, f64>,
}

impl BetweennessPass {
    pub fn new<N, E>(topology: &Topology<N, E>, nodes: &[usize]) -> Self {
        let edge_betweenness = nodes
            .iter()
            .flat_map(|&node| topology.outgoing(node))
            .map(|link| (link.edge, 0.0))
            .collect();

        Self {
            nodes: nodes.to_vec(),
            states: vec![NodeBetweennessState::default(); nodes.len()],
            order: Vec::with_capacity(nodes.len()),
            queue: VecDeque::with_capacity(nodes.len()),
            node_betweenness: vec![0.0; nodes.len()],
            stress: vec![0; nodes.len()],
            edge_betweenness,
        }
    }

    fn local(&self, node: usize) -> Option<usize> {
        self.nodes.binary_search(&node).ok()
    }

    /// Adds the shortest paths leaving `source` to the accumulated scores.
    ///
    /// Fails when a path count overflows, the accumulated scores are then no longer meaningful.
    pub fn accumulate<O, N, E>(
        &mut self,
        topology: &Topology<N, E>,
        source: usize,
    ) -> Result<(), PathCountOverflow>
    where
        O: Orientation,
    {
        let Some(s) = self.local(source) else {
            return Ok(());
        };

        let result = self
            .search::<O, N, E>(topology, s)
            .and_then(|()| self.back_propagate(s));

        for &node in &self.order {
            self.states[node].reset();
        }
        self.order.clear();
        self.queue.clear();

        result
    }

    /// Breadth-first search building the shortest path DAG rooted at `s`.
    fn search<O, N, E>(
        &mut self,
        topology: &Topology<N, E>,
        s: usize,
    ) -> Result<(), PathCountOverflow>
    where
        O: Orientation,
    {
        self.states[s].distance = 0;
        self.states[s].path_count = 1;
        self.queue.push_back(s);

        while let Some(u) = self.queue.pop_front() {
            self.order.push(u);

            for link in O::successors(topology, self.nodes[u]) {
                let Some(w) = self.local(link.node) else {
                    continue;
                };

                let distance = self.states[u].distance + 1;
                if self.states[w].distance < 0 {
                    self.states[w].distance = distance;
                    self.queue.push_back(w);
                }

                if self.states[w].distance == distance {
                    self.states[w].path_count = self.states[w]
                        .path_count
                        .checked_add(self.states[u].path_count)
                        .ok_or(PathCountOverflow)?;
                    self.states[w].predecessors.push(Link {
                        edge: link.edge,
                        node: u,
                    });
                    self.states[u].forward_edges.push(link.edge);
                }
            }
        }

        Ok(())
    }

    /// Walks the DAG from the furthest nodes back to `s`, accumulating dependencies.
    fn back_propagate(&mut self, s: usize) -> Result<(), PathCountOverflow> {
        for i in (0..self.order.len()).rev() {
            let current = self.order[i];
            let predecessors = std::mem::take(&mut self.states[current].predecessors);

            let state = &self.states[current];
            let path_count = state.path_count as f64;
            let dependency = state.dependency;
            let stress_dependency = state.stress_dependency;
            let is_leaf = state.forward_edges.is_empty();
            let forward_dependency = state.forward_dependency;

            for link in &predecessors {
                let p = &mut self.states[link.node];
                let ratio = p.path_count as f64 / path_count;

                p.dependency += (1.0 + dependency) * ratio;
                p.stress_dependency = p
                    .stress_dependency
                    .checked_add(1)
                    .and_then(|value| value.checked_add(stress_dependency))
                    .ok_or(PathCountOverflow)?;

                let contribution = if is_leaf {
                    ratio
                } else {
                    (1.0 + forward_dependency) * ratio
                };
                p.forward_dependency += contribution;
                *self.edge_betweenness.entry(link.edge).or_insert(0.0) += contribution;
            }

            self.states[current].predecessors = predecessors;

            if current != s {
                let paths = self.states[current]
                    .path_count
                    .checked_mul(stress_dependency)
                    .ok_or(PathCountOverflow)?;
                self.stress[current] = self.stress[current]
                    .checked_add(paths)
                    .ok_or(PathCountOverflow)?;
                self.node_betweenness[current] += dependency;
            }
        }

        Ok(())
    }

    /// Normalises the accumulated scores.
    ///
    /// Pairs visited more than once by the orientation are counted once, then node and edge
    /// betweenness are scaled by the component's [`normalization_factor`].
    pub fn finish<O>(self) -> ComponentBetweenness
    where
        O: Orientation,
    {
        let factor = normalization_factor(self.nodes.len());
        let multiplicity = O::PAIR_MULTIPLICITY;
        let normalise = |value: f64| {
            let value = value / f64::from(multiplicity) * factor;
            if value.is_nan() {
                0.0
            } else {
                value
            }
        };

        let nodes = self
            .nodes
            .iter()
            .zip(&self.node_betweenness)
            .zip(&self.stress)
            .map(|((&node, &betweenness), &stress)| {
                (node, normalise(betweenness), stress / i64::from(multiplicity))
            })
            .collect();

        let edges = self
            .edge_betweenness
            .into_iter()
            .map(|(edge, betweenness)| (edge, normalise(betweenness)))
            .collect();

        ComponentBetweenness { nodes, edges }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        components::components,
        edge::Edge,
        graph::Graph,
        orientation::{Directed, Undirected},
    };

    fn betweenness<O: Orientation>(
        graph: &Graph<&str>,
    ) -> Result<ComponentBetweenness, PathCountOverflow> {
        let topology = Topology::new(graph);
        let nodes: Vec<usize> = (0..topology.node_count()).collect();
        let mut pass = BetweennessPass::new(&topology, &nodes);

        for &source in &nodes {
            pass.accumulate::<O, _, _>(&topology, source)?;
        }

        Ok(pass.finish::<O>())
    }

    fn node_scores(result: &ComponentBetweenness) -> Vec<f64> {
        result.nodes.iter().map(|(_, score, _)| *score).collect()
    }

    fn stress(result: &ComponentBetweenness) -> Vec<i64> {
        result.nodes.iter().map(|(_, _, stress)| *stress).collect()
    }

    #[test]
    fn normalization() {
        assert_eq!(normalization_factor(0), 1.0);
        assert_eq!(normalization_factor(1), 1.0);
        assert_eq!(normalization_factor(2), 1.0);
        assert_eq!(normalization_factor(3), 1.0);
        assert_eq!(normalization_factor(5), 2.0 / 12.0);
    }

    #[test]
    fn directed_path() {
        let (a, b, c) = ("a", "b", "c");
        let result = betweenness::<Directed>(&graph!([a, b, c])).unwrap();

        assert_eq!(node_scores(&result), vec![0.0, 1.0, 0.0]);
        assert_eq!(stress(&result), vec![0, 1, 0]);
        assert_eq!(result.edges, vec![(0, 2.0), (1, 2.0)]);
    }

    #[test]
    fn undirected_path() {
        let (a, b, c, d) = ("a", "b", "c", "d");
        let result = betweenness::<Undirected>(&graph!([a, b, c, d])).unwrap();

        // b lies on a-c and a-d, c on b-d and a-d, out of three pairs excluding each of them.
        assert_eq!(node_scores(&result), vec![0.0, 2.0 / 3.0, 2.0 / 3.0, 0.0]);
        assert_eq!(stress(&result), vec![0, 2, 2, 0]);

        // The middle edge is on four of the six shortest paths, the outer ones on three.
        assert_eq!(result.edges, vec![(0, 1.0), (1, 4.0 / 3.0), (2, 1.0)]);
    }

    #[test]
    fn two_shortest_paths_share_the_load() {
        let (a, b, c, d) = ("a", "b", "c", "d");
        let result = betweenness::<Undirected>(&graph!([a, b, c], [a, d, c])).unwrap();

        // a-c has two shortest paths, through b and through d.
        assert_eq!(node_scores(&result), vec![0.5 / 3.0, 0.5 / 3.0, 0.5 / 3.0, 0.5 / 3.0]);
        assert_eq!(stress(&result), vec![1, 1, 1, 1]);
    }

    #[test]
    fn star_centre() {
        let mut graph = Graph::new();
        for leaf in ["b", "c", "d", "e"] {
            graph.insert(Edge::new("a", leaf));
        }

        let result = betweenness::<Undirected>(&graph).unwrap();

        assert_eq!(node_scores(&result), vec![1.0, 0.0, 0.0, 0.0, 0.0]);
        assert_eq!(stress(&result), vec![6, 0, 0, 0, 0]);
    }

    #[test]
    fn state_is_reset_between_components() {
        let (a, b, c, d, e) = ("a", "b", "c", "d", "e");
        let graph = graph!([a, b, c], [d, e]);
        let topology = Topology::new(&graph);

        let results: Vec<ComponentBetweenness> = components(&topology)
            .iter()
            .map(|component| {
                let mut pass = BetweennessPass::new(&topology, component.nodes());
                for &source in component.nodes() {
                    pass.accumulate::<Undirected, _, _>(&topology, source).unwrap();
                }
                pass.finish::<Undirected>()
            })
            .collect();

        assert_eq!(node_scores(&results[0]), vec![0.0, 1.0, 0.0]);
        assert_eq!(node_scores(&results[1]), vec![0.0, 0.0]);
        assert_eq!(results[1].edges, vec![(2, 1.0)]);
    }

    #[test]
    fn path_count_overflow() {
        // Each diamond doubles the number of shortest paths, 64 of them overflow an i64.
        let mut graph = Graph::new();
        for stage in 0..64u32 {
            let (from, to) = (stage * 3, (stage + 1) * 3);
            graph.insert(Edge::new(from, from + 1));
            graph.insert(Edge::new(from, from + 2));
            graph.insert(Edge::new(from + 1, to));
            graph.insert(Edge::new(from + 2, to));
        }

        let topology = Topology::new(&graph);
        let nodes: Vec<usize> = (0..topology.node_count()).collect();
        let mut pass = BetweennessPass::new(&topology, &nodes);
        let source = topology.index_of(&0).unwrap();

        assert_eq!(
            pass.accumulate::<Directed, _, _>(&topology, source),
            Err(PathCountOverflow)
        );
    }
}
