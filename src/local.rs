//! The per-node pass: degrees, neighbours, clustering and neighbourhood connectivity.
//!
//! None of these need more than a node's two-hop neighbourhood, so they're computed for subset
//! runs too.

use std::{collections::BTreeMap, fmt::Debug};

use itertools::Itertools;

use crate::{
    accumulators::{round_to, Buckets, Histogram},
    analyzer::NodeMetrics,
    network::{Link, Topology},
    orientation::Orientation,
    statistics::{StatValue, Statistics},
};

/// The distinct neighbours of every node, self excluded, each list ascending.
#[derive(Clone, Debug)]
pub struct Neighbourhoods {
    inbound: Vec<Vec<usize>>,
    outbound: Vec<Vec<usize>>,
    all: Vec<Vec<usize>>,
}

impl Neighbourhoods {
    pub fn new<N, E>(topology: &Topology<N, E>) -> Self {
        let n = topology.node_count();

        Self {
            inbound: (0..n)
                .map(|v| distinct(v, topology.incoming(v)))
                .collect(),
            outbound: (0..n)
                .map(|v| distinct(v, topology.outgoing(v)))
                .collect(),
            all: (0..n)
                .map(|v| distinct(v, topology.incident(v)))
                .collect(),
        }
    }

    /// Sources of the edges pointing to `node`.
    pub fn inbound(&self, node: usize) -> &[usize] {
        &self.inbound[node]
    }

    /// Targets of the edges leaving `node`.
    pub fn outbound(&self, node: usize) -> &[usize] {
        &self.outbound[node]
    }

    /// Every node sharing an edge with `node`.
    pub fn all(&self, node: usize) -> &[usize] {
        &self.all[node]
    }
}

fn distinct(node: usize, links: &[Link]) -> Vec<usize> {
    links
        .iter()
        .map(|link| link.node)
        .filter(|&other| other != node)
        .sorted_unstable()
        .dedup()
        .collect()
}

/// What a local pass reads.
pub struct LocalContext<'a, N, E> {
    pub topology: &'a Topology<N, E>,
    pub neighbourhoods: &'a Neighbourhoods,
    /// Whether each node is part of the run.
    pub analyzed: &'a [bool],
}

/// Tallies shared by both orientations.
#[derive(Clone, Debug, Default)]
pub struct LocalTally {
    pub nodes: usize,
    pub isolated: usize,
    pub self_loops: usize,
    /// Counted from both ends of each multi-edged pair.
    pub multi_edge_partners: usize,
    pub clustering_total: f64,
    pub clustering: Buckets,
    pub connectivity: Buckets,
    pub neighbour_total: u64,
    pub neighbour_square_total: u64,
    pub max_neighbours: usize,
}

impl LocalTally {
    pub fn merge(&mut self, other: &Self) {
        self.nodes += other.nodes;
        self.isolated += other.isolated;
        self.self_loops += other.self_loops;
        self.multi_edge_partners += other.multi_edge_partners;
        self.clustering_total += other.clustering_total;
        self.clustering.merge(&other.clustering);
        self.connectivity.merge(&other.connectivity);
        self.neighbour_total += other.neighbour_total;
        self.neighbour_square_total += other.neighbour_square_total;
        self.max_neighbours = self.max_neighbours.max(other.max_neighbours);
    }

    /// Emits the network-wide local statistics. `connections` is the orientation's neighbour
    /// total used as the density numerator.
    pub fn emit(&self, stats: &mut Statistics, connections: u64, digits: u32) {
        let n = self.nodes as f64;

        stats.set_integer("isolated", self.isolated as i64);
        stats.set_integer("numSelfLoops", self.self_loops as i64);
        stats.set_integer("multiEdgePartners", (self.multi_edge_partners / 2) as i64);

        if self.nodes == 0 {
            return;
        }

        stats.set_scalar("cc", round_to(self.clustering_total / n, digits));

        let mean = self.neighbour_total as f64 / n;
        stats.set_scalar("avNeighbors", round_to(mean, digits));

        if self.nodes > 1 {
            let density = connections as f64 / (n * (n - 1.0));
            stats.set_scalar("density", round_to(density, digits));

            if self.nodes > 2 {
                let centralization =
                    n / (n - 2.0) * (self.max_neighbours as f64 / (n - 1.0) - density);
                stats.set_scalar("centralization", round_to(centralization, digits));
            }
        }

        if mean > 0.0 {
            let variance = (self.neighbour_square_total as f64 / n - mean * mean).max(0.0);
            stats.set_scalar("heterogeneity", round_to(variance.sqrt() / mean, digits));
        }

        if !self.clustering.is_empty() {
            stats.set("cksDist", StatValue::Points(self.clustering.to_points(digits)));
        }
        if self.connectivity.len() > 1 {
            stats.set("nconDist", StatValue::Points(self.connectivity.to_points(digits)));
        }
    }
}

/// The part of the per-node pass that depends on the orientation.
pub trait LocalPass: Clone + Debug + Default {
    fn visit<N, E>(&mut self, ctx: &LocalContext<'_, N, E>, node: usize, metrics: &mut NodeMetrics);

    fn merge(&mut self, other: &Self);

    /// The numerator of the network density.
    fn connections(&self, tally: &LocalTally) -> u64;

    fn emit(&self, stats: &mut Statistics, digits: u32);
}

/// Runs the per-node pass for `node`.
pub fn visit<O, N, E>(
    ctx: &LocalContext<'_, N, E>,
    node: usize,
    tally: &mut LocalTally,
    local: &mut O::Local,
    metrics: &mut NodeMetrics,
) where
    O: Orientation,
{
    let topology = ctx.topology;
    let neighbours = ctx.neighbourhoods.all(node);
    let k = neighbours.len();

    // Parallel edges to each neighbour, direction ignored.
    let mut parallel = vec![0usize; k];
    for link in topology.incident(node) {
        if let Ok(i) = neighbours.binary_search(&link.node) {
            parallel[i] += 1;
        }
    }
    let partners = parallel.iter().filter(|&&count| count > 1).count();

    let self_loops = topology
        .incoming(node)
        .iter()
        .filter(|link| link.node == node)
        .count();

    let clustering = clustering_coefficient::<O, _, _>(topology, neighbours);
    if k > 1 {
        tally.clustering.add(k, clustering);
    }

    let connectivity = connectivity(neighbours, |u| ctx.neighbourhoods.all(u).len());
    if let Some(connectivity) = connectivity {
        tally.connectivity.add(k, connectivity);
    }

    tally.nodes += 1;
    tally.isolated += usize::from(k == 0);
    tally.self_loops += self_loops;
    tally.multi_edge_partners += partners;
    tally.clustering_total += clustering;
    tally.neighbour_total += k as u64;
    tally.neighbour_square_total += (k * k) as u64;
    tally.max_neighbours = tally.max_neighbours.max(k);

    metrics.self_loops = self_loops;
    metrics.isolated = k == 0;
    metrics.multi_edge_partners = partners;
    metrics.clustering_coefficient = clustering;
    metrics.neighborhood_connectivity = connectivity.unwrap_or(0.0);

    local.visit(ctx, node, metrics);
}

/// The fraction of possible links among `neighbours` that exist.
///
/// Links are counted as ordered pairs `(u, w)` of distinct neighbours with an edge the search may
/// follow from `u` to `w`, so an undirected edge counts both ways and parallel edges count once.
/// Exactly `0.0` with fewer than two neighbours.
pub fn clustering_coefficient<O, N, E>(topology: &Topology<N, E>, neighbours: &[usize]) -> f64
where
    O: Orientation,
{
    let k = neighbours.len();
    if k <= 1 {
        return 0.0;
    }

    let linked: usize = neighbours
        .iter()
        .map(|&u| {
            O::successors(topology, u)
                .iter()
                .map(|link| link.node)
                .filter(|&w| w != u && neighbours.binary_search(&w).is_ok())
                .sorted_unstable()
                .dedup()
                .count()
        })
        .sum();

    linked as f64 / (k * (k - 1)) as f64
}

/// The mean of `degree` over `neighbours`, `None` when there are none.
fn connectivity(neighbours: &[usize], degree: impl Fn(usize) -> usize) -> Option<f64> {
    if neighbours.is_empty() {
        return None;
    }

    let total: usize = neighbours.iter().map(|&u| degree(u)).sum();
    Some(total as f64 / neighbours.len() as f64)
}

/// The directed statistics: in and out degrees and the matching neighbourhood connectivities.
#[derive(Clone, Debug, Default)]
pub struct DirectedLocal {
    in_degrees: Histogram,
    out_degrees: Histogram,
    in_connectivity: Buckets,
    out_connectivity: Buckets,
    in_total: u64,
    out_total: u64,
}

impl LocalPass for DirectedLocal {
    fn visit<N, E>(&mut self, ctx: &LocalContext<'_, N, E>, node: usize, metrics: &mut NodeMetrics) {
        let hoods = ctx.neighbourhoods;
        let in_degree = ctx.topology.incoming(node).len();
        let out_degree = ctx.topology.outgoing(node).len();

        self.in_degrees.increment(in_degree);
        self.out_degrees.increment(out_degree);

        let inbound = hoods.inbound(node);
        let outbound = hoods.outbound(node);
        self.in_total += inbound.len() as u64;
        self.out_total += outbound.len() as u64;

        if let Some(value) = connectivity(inbound, |u| hoods.inbound(u).len()) {
            self.in_connectivity.add(inbound.len(), value);
        }
        if let Some(value) = connectivity(outbound, |u| hoods.outbound(u).len()) {
            self.out_connectivity.add(outbound.len(), value);
        }

        metrics.degree = in_degree + out_degree;
        metrics.in_degree = Some(in_degree);
        metrics.out_degree = Some(out_degree);
    }

    fn merge(&mut self, other: &Self) {
        self.in_degrees.merge(&other.in_degrees);
        self.out_degrees.merge(&other.out_degrees);
        self.in_connectivity.merge(&other.in_connectivity);
        self.out_connectivity.merge(&other.out_connectivity);
        self.in_total += other.in_total;
        self.out_total += other.out_total;
    }

    fn connections(&self, _tally: &LocalTally) -> u64 {
        self.in_total + self.out_total
    }

    fn emit(&self, stats: &mut Statistics, digits: u32) {
        stats.set("inDegDist", StatValue::Histogram(self.in_degrees.clone()));
        stats.set("outDegDist", StatValue::Histogram(self.out_degrees.clone()));

        if self.in_connectivity.len() > 1 {
            stats.set(
                "inNconDist",
                StatValue::Points(self.in_connectivity.to_points(digits)),
            );
        }
        if self.out_connectivity.len() > 1 {
            stats.set(
                "outNconDist",
                StatValue::Points(self.out_connectivity.to_points(digits)),
            );
        }
    }
}

/// The undirected statistics: degrees, topological coefficients and shared neighbours.
#[derive(Clone, Debug, Default)]
pub struct UndirectedLocal {
    degrees: Histogram,
    topological: Buckets,
    shared: Histogram,
}

impl LocalPass for UndirectedLocal {
    fn visit<N, E>(&mut self, ctx: &LocalContext<'_, N, E>, node: usize, metrics: &mut NodeMetrics) {
        let hoods = ctx.neighbourhoods;
        let neighbours = hoods.all(node);
        let k = neighbours.len();

        let degree = ctx.topology.incident(node).len();
        self.degrees.increment(degree);
        metrics.degree = degree;

        // Nodes two hops away, mapped to the number of neighbours they share with `node`.
        let mut shared: BTreeMap<usize, usize> = BTreeMap::new();
        for &u in neighbours {
            for &w in hoods.all(u) {
                if w != node {
                    *shared.entry(w).or_default() += 1;
                }
            }
        }

        // Each pair is recorded once, by its lower end unless the other end isn't analyzed.
        for (&other, &count) in &shared {
            if other > node || !ctx.analyzed[other] {
                self.shared.increment(count);
            }
        }

        let coefficient = if k > 1 && !shared.is_empty() {
            let total: usize = shared
                .iter()
                .map(|(other, &count)| count + usize::from(neighbours.binary_search(other).is_ok()))
                .sum();
            total as f64 / shared.len() as f64 / k as f64
        } else {
            0.0
        };

        if k > 1 {
            self.topological.add(k, coefficient);
        }
        metrics.topological_coefficient = Some(coefficient);
    }

    fn merge(&mut self, other: &Self) {
        self.degrees.merge(&other.degrees);
        self.topological.merge(&other.topological);
        self.shared.merge(&other.shared);
    }

    fn connections(&self, tally: &LocalTally) -> u64 {
        tally.neighbour_total
    }

    fn emit(&self, stats: &mut Statistics, digits: u32) {
        stats.set("degreeDist", StatValue::Histogram(self.degrees.clone()));

        if !self.topological.is_empty() {
            stats.set("topCoefs", StatValue::Points(self.topological.to_points(digits)));
        }
        if !self.shared.is_empty() {
            stats.set(
                "sharedNeighborsDist",
                StatValue::Histogram(self.shared.clone()),
            );
        }
    }
}
