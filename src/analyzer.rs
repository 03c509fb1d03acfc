//! The analysis run: components first, then the per-node passes, then the emitted statistics.

use std::{
    fmt::Debug,
    hash::Hash,
    time::{Duration, Instant},
};

use serde::Serialize;
use tracing::{debug, info, trace, warn};

use crate::{
    accumulators::{round_to, Buckets, LogHistogram},
    betweenness::BetweennessPass,
    closeness::{PathSearch, PathTally},
    components::components,
    config::{AnalysisRequest, AnalyzerSettings},
    control::AnalysisHandle,
    error::{AnalysisError, Result},
    local::{self, LocalContext, LocalPass, LocalTally, Neighbourhoods},
    network::{Network, Topology},
    orientation::{Directed, Orientation, Undirected},
    statistics::{StatValue, Statistics},
};

/// How often, in visited nodes, progress is traced.
const PROGRESS_INTERVAL: usize = 100;

/// The results computed for a single node.
///
/// The `Option` fields are `None` when the run didn't compute them: in and out degrees and the
/// topological coefficient depend on the orientation, the path metrics are skipped for subset
/// runs and betweenness and stress can be disabled altogether.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct NodeMetrics {
    /// The number of edge ends at the node, a self-loop counts once in undirected runs.
    pub degree: usize,
    pub in_degree: Option<usize>,
    pub out_degree: Option<usize>,
    pub self_loops: usize,
    /// The node has no neighbours other than itself.
    pub isolated: bool,
    /// The number of neighbours sharing more than one edge with the node.
    pub multi_edge_partners: usize,
    pub clustering_coefficient: f64,
    pub neighborhood_connectivity: f64,
    pub topological_coefficient: Option<f64>,
    pub eccentricity: Option<usize>,
    pub average_shortest_path_length: Option<f64>,
    pub closeness_centrality: Option<f64>,
    pub betweenness_centrality: Option<f64>,
    pub stress: Option<i64>,
}

impl NodeMetrics {
    fn round(&mut self, digits: u32) {
        let round = |value: f64| round_to(value, digits);

        self.clustering_coefficient = round(self.clustering_coefficient);
        self.neighborhood_connectivity = round(self.neighborhood_connectivity);
        self.topological_coefficient = self.topological_coefficient.map(round);
        self.average_shortest_path_length = self.average_shortest_path_length.map(round);
        self.closeness_centrality = self.closeness_centrality.map(round);
        self.betweenness_centrality = self.betweenness_centrality.map(round);
    }
}

/// Everything a run produced.
#[derive(Clone, Debug)]
pub struct AnalysisReport<N, E> {
    /// The network-wide statistics, in emission order.
    pub statistics: Statistics,
    /// Per-node results, in the network's node order.
    pub nodes: Vec<(N, NodeMetrics)>,
    /// Per-edge betweenness, empty when betweenness wasn't computed.
    pub edges: Vec<(E, f64)>,
    pub directed: bool,
    /// The run stopped early, only the components completed beforehand are reported.
    pub cancelled: bool,
    /// A shortest path count overflowed and betweenness and stress were disabled.
    pub betweenness_overflowed: bool,
    pub elapsed: Duration,
}

impl<N, E> AnalysisReport<N, E>
where
    N: PartialEq,
    E: PartialEq,
{
    /// The results for `node`, if it was analysed.
    pub fn node(&self, node: &N) -> Option<&NodeMetrics> {
        self.nodes
            .iter()
            .find(|(other, _)| other == node)
            .map(|(_, metrics)| metrics)
    }

    /// The betweenness of `edge`, if it was computed.
    pub fn edge_betweenness(&self, edge: &E) -> Option<f64> {
        self.edges
            .iter()
            .find(|(other, _)| other == edge)
            .map(|&(_, betweenness)| betweenness)
    }
}

/// Computes the topological parameters of a network.
///
/// # Examples
///
/// ```
/// use netanalyzer::{edge::Edge, graph::Graph, AnalysisRequest, NetworkAnalyzer};
///
/// let mut graph = Graph::new();
/// graph.insert(Edge::new("a", "b"));
/// graph.insert(Edge::new("b", "c"));
///
/// let report = NetworkAnalyzer::new(&graph, AnalysisRequest::directed())
///     .unwrap()
///     .run();
///
/// assert_eq!(report.statistics.integer("diameter"), Some(2));
/// assert_eq!(report.node(&"b").unwrap().betweenness_centrality, Some(1.0));
/// ```
pub struct NetworkAnalyzer<N, E> {
    topology: Topology<N, E>,
    /// Whether each node of the topology is part of the run.
    analyzed: Vec<bool>,
    directed: bool,
    global: bool,
    betweenness: bool,
    settings: AnalyzerSettings,
    handle: AnalysisHandle,
}

impl<N, E> NetworkAnalyzer<N, E>
where
    N: Copy + Eq + Hash + Debug,
    E: Copy + Eq + Hash + Debug,
{
    /// Snapshots the network and validates the request.
    ///
    /// Fails if there's nothing to analyse or if the subset names a node outside the network.
    pub fn new<G>(network: &G, request: AnalysisRequest<N>) -> Result<Self>
    where
        G: Network<Node = N, Edge = E>,
    {
        let topology = Topology::new(network);
        if topology.node_count() == 0 {
            return Err(AnalysisError::EmptyNetwork);
        }

        let global = request.computes_global_metrics();
        let betweenness = request.computes_betweenness();

        let analyzed = match &request.node_subset {
            None => vec![true; topology.node_count()],
            Some(subset) => {
                let mut analyzed = vec![false; topology.node_count()];
                for node in subset {
                    let index = topology
                        .index_of(node)
                        .ok_or_else(|| AnalysisError::UnknownNode(format!("{node:?}")))?;
                    analyzed[index] = true;
                }
                analyzed
            }
        };

        let total = analyzed.iter().filter(|&&analyzed| analyzed).count();
        if total == 0 {
            return Err(AnalysisError::EmptyNetwork);
        }

        Ok(Self {
            topology,
            analyzed,
            directed: request.directed,
            global,
            betweenness,
            settings: AnalyzerSettings::default(),
            handle: AnalysisHandle::new(total),
        })
    }

    /// Replaces the default settings.
    pub fn with_settings(mut self, settings: AnalyzerSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn settings(&self) -> &AnalyzerSettings {
        &self.settings
    }

    /// A handle to cancel the run or follow its progress from another thread.
    pub fn handle(&self) -> AnalysisHandle {
        self.handle.clone()
    }

    /// Runs the analysis to completion, or until it's cancelled.
    pub fn run(self) -> AnalysisReport<N, E> {
        if self.directed {
            self.analyze::<Directed>()
        } else {
            self.analyze::<Undirected>()
        }
    }

    //
    // Private
    //

    fn analyze<O: Orientation>(&self) -> AnalysisReport<N, E> {
        let start = Instant::now();
        let topology = &self.topology;
        let digits = self.settings.rounding_digits;

        info!(
            nodes = self.handle.total(),
            edges = topology.edge_count(),
            directed = O::DIRECTED,
            subset = !self.global,
            "starting network analysis"
        );

        let neighbourhoods = Neighbourhoods::new(topology);
        let ctx = LocalContext {
            topology,
            neighbourhoods: &neighbourhoods,
            analyzed: &self.analyzed,
        };
        let mut search = PathSearch::new(topology.node_count());
        let mut run = Run::<O>::new(topology.edge_count());
        let mut betweenness = self.betweenness;

        for (index, component) in components(topology).iter().enumerate() {
            let members: Vec<usize> = component
                .nodes()
                .iter()
                .copied()
                .filter(|&node| self.analyzed[node])
                .collect();
            if members.is_empty() {
                continue;
            }

            debug!(
                component = index,
                size = component.size(),
                betweenness,
                "analysing component"
            );

            let mut part = Run::<O>::new(0);
            let mut pass = betweenness.then(|| BetweennessPass::new(topology, component.nodes()));
            let mut metrics = Vec::with_capacity(members.len());

            for &node in &members {
                if self.handle.is_cancelled() {
                    run.cancelled = true;
                    break;
                }

                let mut node_metrics = NodeMetrics::default();
                local::visit::<O, _, _>(
                    &ctx,
                    node,
                    &mut part.tally,
                    &mut part.local,
                    &mut node_metrics,
                );

                if self.global {
                    let neighbours = neighbourhoods.all(node).len();
                    let paths = part
                        .paths
                        .visit::<O, _, _>(&mut search, topology, node, neighbours);
                    node_metrics.eccentricity = Some(paths.eccentricity);
                    node_metrics.average_shortest_path_length = Some(paths.average_length);
                    node_metrics.closeness_centrality = Some(paths.closeness);
                }

                let overflowed = pass
                    .as_mut()
                    .is_some_and(|pass| pass.accumulate::<O, _, _>(topology, node).is_err());
                if overflowed {
                    warn!(
                        source = ?topology.node(node),
                        "shortest path count overflow, betweenness and stress are disabled"
                    );
                    pass = None;
                    betweenness = false;
                    run.overflowed = true;
                }

                metrics.push((node, node_metrics));

                let progress = self.handle.tick();
                if progress % PROGRESS_INTERVAL == 0 {
                    trace!(progress, total = self.handle.total(), "visited nodes");
                }
            }

            if run.cancelled {
                warn!(
                    component = index,
                    progress = self.handle.progress(),
                    "analysis cancelled, discarding the interrupted component"
                );
                break;
            }

            if let Some(pass) = pass {
                let scores = pass.finish::<O>();
                // Betweenness only runs on whole networks, so every component node is a member.
                for ((node, node_metrics), &(_, score, stress)) in
                    metrics.iter_mut().zip(&scores.nodes)
                {
                    node_metrics.betweenness_centrality = Some(score);
                    node_metrics.stress = Some(stress);
                    part.betweenness
                        .add(neighbourhoods.all(*node).len(), round_to(score, digits));
                    part.stress.increment(stress.unsigned_abs());
                }
                part.edges.extend(
                    scores
                        .edges
                        .into_iter()
                        .map(|(edge, score)| (edge, round_to(score, digits))),
                );
            }

            for &node in &members {
                for link in topology.incident(node) {
                    if !run.counted[link.edge] {
                        run.counted[link.edge] = true;
                        run.edge_count += 1;
                    }
                }
            }

            for (_, node_metrics) in &mut metrics {
                node_metrics.round(digits);
            }
            part.nodes = metrics;
            run.commit(part);
        }

        let statistics = run.emit(self.global, betweenness, digits);
        let elapsed = start.elapsed();

        info!(
            ?elapsed,
            components = run.components,
            cancelled = run.cancelled,
            "network analysis finished"
        );

        let mut nodes = run.nodes;
        nodes.sort_unstable_by_key(|&(node, _)| node);

        AnalysisReport {
            statistics,
            nodes: nodes
                .into_iter()
                .map(|(node, metrics)| (topology.node(node), metrics))
                .collect(),
            edges: run
                .edges
                .into_iter()
                .map(|(edge, score)| (topology.edge(edge), score))
                .collect(),
            directed: O::DIRECTED,
            cancelled: run.cancelled,
            betweenness_overflowed: run.overflowed,
            elapsed,
        }
    }
}

/// The accumulated state of a run, or of a single component before it's committed.
struct Run<O: Orientation> {
    tally: LocalTally,
    local: O::Local,
    paths: PathTally,
    betweenness: Buckets,
    stress: LogHistogram,
    nodes: Vec<(usize, NodeMetrics)>,
    edges: Vec<(usize, f64)>,
    components: usize,
    edge_count: usize,
    /// Edges already counted towards `edge_count`.
    counted: Vec<bool>,
    cancelled: bool,
    overflowed: bool,
}

impl<O: Orientation> Run<O> {
    fn new(edges: usize) -> Self {
        Self {
            tally: LocalTally::default(),
            local: O::Local::default(),
            paths: PathTally::default(),
            betweenness: Buckets::default(),
            stress: LogHistogram::default(),
            nodes: Vec::new(),
            edges: Vec::new(),
            components: 0,
            edge_count: 0,
            counted: vec![false; edges],
            cancelled: false,
            overflowed: false,
        }
    }

    fn commit(&mut self, part: Self) {
        self.tally.merge(&part.tally);
        self.local.merge(&part.local);
        self.paths.merge(&part.paths);
        self.betweenness.merge(&part.betweenness);
        self.stress.merge(&part.stress);
        self.nodes.extend(part.nodes);
        self.edges.extend(part.edges);
        self.components += 1;
    }

    fn emit(&self, global: bool, betweenness: bool, digits: u32) -> Statistics {
        let mut stats = Statistics::new();

        stats.set_integer("nodeCount", self.tally.nodes as i64);
        stats.set_integer("edgeCount", self.edge_count as i64);
        stats.set_integer("ncc", self.components as i64);

        self.tally
            .emit(&mut stats, self.local.connections(&self.tally), digits);
        self.local.emit(&mut stats, digits);

        if global {
            self.paths.emit(&mut stats, digits);
        }

        if betweenness && !self.betweenness.is_empty() {
            stats.set(
                "nodeBetween",
                StatValue::Points(self.betweenness.to_points(digits)),
            );
            stats.set("stressDist", StatValue::LogHistogram(self.stress.clone()));
        }

        stats
    }
}
