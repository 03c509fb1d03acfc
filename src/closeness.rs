//! Shortest path lengths: eccentricity, closeness, diameter and radius.

use std::collections::VecDeque;

use crate::{
    accumulators::{round_to, Buckets, Histogram, PathLengthData},
    network::Topology,
    orientation::Orientation,
    statistics::{StatValue, Statistics},
};

/// Reusable search buffers, sized to the topology.
#[derive(Clone, Debug)]
pub struct PathSearch {
    visited: Vec<bool>,
    touched: Vec<usize>,
    /// `None` marks the boundary between two search levels.
    queue: VecDeque<Option<usize>>,
}

impl PathSearch {
    pub fn new(node_count: usize) -> Self {
        Self {
            visited: vec![false; node_count],
            touched: Vec::new(),
            queue: VecDeque::new(),
        }
    }

    /// Runs a breadth-first search from `source`, recording the level each newly reached node
    /// was found at into `lengths` as well as into the returned per-source aggregate.
    pub fn run<O, N, E>(
        &mut self,
        topology: &Topology<N, E>,
        source: usize,
        lengths: &mut Histogram,
    ) -> PathLengthData
    where
        O: Orientation,
    {
        let mut data = PathLengthData::new();
        let mut level = 1;

        self.mark(source);
        self.queue.push_back(Some(source));
        self.queue.push_back(None);

        while let Some(entry) = self.queue.pop_front() {
            match entry {
                Some(node) => {
                    for link in O::successors(topology, node) {
                        if !self.visited[link.node] {
                            self.mark(link.node);
                            self.queue.push_back(Some(link.node));
                            lengths.increment(level);
                            data.add(level);
                        }
                    }
                }
                None => {
                    if self.queue.is_empty() {
                        break;
                    }
                    level += 1;
                    self.queue.push_back(None);
                }
            }
        }

        for node in self.touched.drain(..) {
            self.visited[node] = false;
        }

        data
    }

    fn mark(&mut self, node: usize) {
        self.visited[node] = true;
        self.touched.push(node);
    }
}

/// The shortest path results of a single source.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SourcePaths {
    pub eccentricity: usize,
    pub average_length: f64,
    pub closeness: f64,
}

impl From<PathLengthData> for SourcePaths {
    fn from(data: PathLengthData) -> Self {
        let average_length = data.average();
        let closeness = if average_length > 0.0 {
            1.0 / average_length
        } else {
            0.0
        };

        Self {
            eccentricity: data.max(),
            average_length,
            closeness,
        }
    }
}

/// Shortest path statistics accumulated over many sources.
#[derive(Clone, Debug, Default)]
pub struct PathTally {
    /// Frequencies of every shortest path length found, over all sources.
    lengths: Histogram,
    diameter: usize,
    /// The smallest nonzero eccentricity.
    radius: Option<usize>,
    closeness: Buckets,
}

impl PathTally {
    /// Searches from `source` and records the results, `neighbours` is the source's neighbour
    /// count used to bucket its closeness.
    pub fn visit<O, N, E>(
        &mut self,
        search: &mut PathSearch,
        topology: &Topology<N, E>,
        source: usize,
        neighbours: usize,
    ) -> SourcePaths
    where
        O: Orientation,
    {
        let paths = SourcePaths::from(search.run::<O, _, _>(topology, source, &mut self.lengths));

        self.diameter = self.diameter.max(paths.eccentricity);
        if paths.eccentricity > 0 {
            self.radius = Some(
                self.radius
                    .map_or(paths.eccentricity, |radius| radius.min(paths.eccentricity)),
            );
        }
        self.closeness.add(neighbours, paths.closeness);

        paths
    }

    pub fn merge(&mut self, other: &Self) {
        self.lengths.merge(&other.lengths);
        self.diameter = self.diameter.max(other.diameter);
        self.radius = match (self.radius, other.radius) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        };
        self.closeness.merge(&other.closeness);
    }

    pub fn diameter(&self) -> usize {
        self.diameter
    }

    pub fn radius(&self) -> Option<usize> {
        self.radius
    }

    /// The number of ordered pairs connected by a path.
    pub fn connected_pairs(&self) -> u64 {
        (1..=self.diameter).map(|d| self.lengths.get(d)).sum()
    }

    /// The mean shortest path length over all connected pairs.
    pub fn average_length(&self) -> Option<f64> {
        let pairs = self.connected_pairs();
        if pairs == 0 {
            return None;
        }

        let total: u64 = (1..=self.diameter)
            .map(|d| d as u64 * self.lengths.get(d))
            .sum();
        Some(total as f64 / pairs as f64)
    }

    pub fn emit(&self, stats: &mut Statistics, digits: u32) {
        stats.set_integer("diameter", self.diameter as i64);
        if let Some(radius) = self.radius {
            stats.set_integer("radius", radius as i64);
        }

        stats.set_integer("connPairs", self.connected_pairs() as i64);
        if let Some(average) = self.average_length() {
            stats.set_scalar("avSpl", round_to(average, digits));
        }

        if self.diameter > 1 {
            stats.set("splDist", StatValue::Histogram(self.lengths.clone()));
        }
        if !self.closeness.is_empty() {
            stats.set(
                "closenessCent",
                StatValue::Points(self.closeness.to_points(digits)),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        graph::Graph,
        orientation::{Directed, Undirected},
    };

    fn tally<O: Orientation>(graph: &Graph<&str>) -> (PathTally, Vec<SourcePaths>) {
        let topology = Topology::new(graph);
        let mut search = PathSearch::new(topology.node_count());
        let mut tally = PathTally::default();

        let paths = (0..topology.node_count())
            .map(|node| tally.visit::<O, _, _>(&mut search, &topology, node, 1))
            .collect();

        (tally, paths)
    }

    #[test]
    fn directed_path() {
        let (a, b, c) = ("a", "b", "c");
        let (tally, paths) = tally::<Directed>(&graph!([a, b, c]));

        assert_eq!(paths[0].eccentricity, 2);
        assert_eq!(paths[0].average_length, 1.5);
        assert_eq!(paths[0].closeness, 1.0 / 1.5);
        assert_eq!(paths[1].eccentricity, 1);
        assert_eq!(paths[2], SourcePaths {
            eccentricity: 0,
            average_length: 0.0,
            closeness: 0.0,
        });

        assert_eq!(tally.diameter(), 2);
        assert_eq!(tally.radius(), Some(1));
        assert_eq!(tally.connected_pairs(), 3);
        assert_eq!(tally.average_length(), Some(4.0 / 3.0));
    }

    #[test]
    fn undirected_cycle() {
        let (a, b, c, d) = ("a", "b", "c", "d");
        let (tally, paths) = tally::<Undirected>(&graph!([a, b, c, d, a]));

        for paths in &paths {
            assert_eq!(paths.eccentricity, 2);
            assert_eq!(paths.average_length, 4.0 / 3.0);
        }

        // Every source reaches two nodes at distance 1 and one at distance 2.
        assert_eq!(tally.lengths.get(1), 8);
        assert_eq!(tally.lengths.get(2), 4);
        assert_eq!(tally.connected_pairs(), 12);
        assert_eq!(tally.radius(), Some(2));
    }

    #[test]
    fn search_buffers_are_reset() {
        let (a, b, c) = ("a", "b", "c");
        let graph = graph!([a, b, c]);
        let topology = Topology::new(&graph);
        let mut search = PathSearch::new(topology.node_count());
        let mut lengths = Histogram::default();

        let first = search.run::<Undirected, _, _>(&topology, 0, &mut lengths);
        let second = search.run::<Undirected, _, _>(&topology, 0, &mut lengths);

        assert_eq!(first, second);
        assert_eq!(lengths.get(1), 2);
        assert_eq!(lengths.get(2), 2);
    }

    #[test]
    fn isolated_node_sets_no_radius() {
        let mut graph = Graph::new();
        graph.add_vertex("a");

        let (tally, _) = tally::<Undirected>(&graph);
        let mut stats = Statistics::new();
        tally.emit(&mut stats, 8);

        assert_eq!(stats.integer("diameter"), Some(0));
        assert!(!stats.contains("radius"));
        assert!(!stats.contains("avSpl"));
        assert!(!stats.contains("splDist"));
        assert_eq!(stats.integer("connPairs"), Some(0));
    }

    #[test]
    fn merge_keeps_the_largest_diameter() {
        let (a, b, c, d, e) = ("a", "b", "c", "d", "e");
        let (short, _) = tally::<Undirected>(&graph!([a, b]));
        let (long, _) = tally::<Undirected>(&graph!([c, d, e]));

        let mut merged = short.clone();
        merged.merge(&long);

        assert_eq!(merged.diameter(), 2);
        assert_eq!(merged.radius(), Some(1));
        assert_eq!(merged.connected_pairs(), 2 + 6);
    }
}
