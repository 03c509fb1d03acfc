//! Writing per-node and per-edge results back into a host's attribute store.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::{analyzer::AnalysisReport, config::AnalyzerSettings};

/// A single attribute value.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Float(f64),
    Integer(i64),
    Boolean(bool),
}

impl From<f64> for AttributeValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<usize> for AttributeValue {
    fn from(value: usize) -> Self {
        Self::Integer(value as i64)
    }
}

impl From<i64> for AttributeValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<bool> for AttributeValue {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

/// Somewhere to put per-node and per-edge results, usually the host's attribute tables.
pub trait AttributeStore<N, E> {
    fn set_node_value(&mut self, node: &N, name: &str, value: AttributeValue);

    fn set_edge_value(&mut self, edge: &E, name: &str, value: AttributeValue);
}

/// An in-memory [`AttributeStore`], ordered by identifier then attribute name.
#[derive(Clone, Debug, PartialEq)]
pub struct AttributeTable<N, E> {
    nodes: BTreeMap<N, BTreeMap<String, AttributeValue>>,
    edges: BTreeMap<E, BTreeMap<String, AttributeValue>>,
}

impl<N, E> Default for AttributeTable<N, E> {
    fn default() -> Self {
        Self {
            nodes: BTreeMap::new(),
            edges: BTreeMap::new(),
        }
    }
}

impl<N: Ord, E: Ord> AttributeTable<N, E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node_value(&self, node: &N, name: &str) -> Option<AttributeValue> {
        self.nodes.get(node)?.get(name).copied()
    }

    pub fn edge_value(&self, edge: &E, name: &str) -> Option<AttributeValue> {
        self.edges.get(edge)?.get(name).copied()
    }

    /// The attributes set on `node`, by name.
    pub fn node_attributes(&self, node: &N) -> Option<&BTreeMap<String, AttributeValue>> {
        self.nodes.get(node)
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }
}

impl<N, E> AttributeStore<N, E> for AttributeTable<N, E>
where
    N: Ord + Clone,
    E: Ord + Clone,
{
    fn set_node_value(&mut self, node: &N, name: &str, value: AttributeValue) {
        self.nodes
            .entry(node.clone())
            .or_default()
            .insert(name.to_owned(), value);
    }

    fn set_edge_value(&mut self, edge: &E, name: &str, value: AttributeValue) {
        self.edges
            .entry(edge.clone())
            .or_default()
            .insert(name.to_owned(), value);
    }
}

impl<N, E> AnalysisReport<N, E> {
    /// Writes the per-node and per-edge results into `store`, as allowed by `settings`.
    ///
    /// Only the values the run computed are written.
    ///
    /// # Examples
    ///
    /// ```
    /// use netanalyzer::{
    ///     attributes::{AttributeTable, AttributeValue},
    ///     edge::Edge,
    ///     graph::Graph,
    ///     AnalysisRequest, AnalyzerSettings, NetworkAnalyzer,
    /// };
    ///
    /// let mut graph = Graph::new();
    /// graph.insert(Edge::new("a", "b"));
    ///
    /// let report = NetworkAnalyzer::new(&graph, AnalysisRequest::undirected())
    ///     .unwrap()
    ///     .run();
    ///
    /// let mut table = AttributeTable::new();
    /// report.write_attributes(&mut table, &AnalyzerSettings::default());
    ///
    /// assert_eq!(table.node_value(&"a", "Degree"), Some(AttributeValue::Integer(1)));
    /// assert_eq!(table.edge_value(&0, "EdgeBetweenness"), Some(AttributeValue::Float(1.0)));
    /// ```
    pub fn write_attributes<S>(&self, store: &mut S, settings: &AnalyzerSettings)
    where
        S: AttributeStore<N, E>,
    {
        if settings.write_node_attributes {
            for (node, metrics) in &self.nodes {
                let mut set = |name: &str, value: AttributeValue| {
                    store.set_node_value(node, name, value)
                };

                set("Degree", metrics.degree.into());
                if let Some(in_degree) = metrics.in_degree {
                    set("Indegree", in_degree.into());
                }
                if let Some(out_degree) = metrics.out_degree {
                    set("Outdegree", out_degree.into());
                }
                set("SelfLoops", metrics.self_loops.into());
                set("IsSingleNode", metrics.isolated.into());
                set(
                    "PartnerOfMultiEdgedNodePairs",
                    metrics.multi_edge_partners.into(),
                );
                set(
                    "ClusteringCoefficient",
                    metrics.clustering_coefficient.into(),
                );
                set(
                    "NeighborhoodConnectivity",
                    metrics.neighborhood_connectivity.into(),
                );

                let optional = [
                    ("TopologicalCoefficient", metrics.topological_coefficient),
                    ("AverageShortestPathLength", metrics.average_shortest_path_length),
                    ("ClosenessCentrality", metrics.closeness_centrality),
                    ("BetweennessCentrality", metrics.betweenness_centrality),
                ];
                for (name, value) in optional {
                    if let Some(value) = value {
                        set(name, value.into());
                    }
                }

                if let Some(eccentricity) = metrics.eccentricity {
                    set("Eccentricity", eccentricity.into());
                }
                if let Some(stress) = metrics.stress {
                    set("Stress", stress.into());
                }
            }
        }

        if settings.write_edge_attributes {
            for (edge, betweenness) in &self.edges {
                store.set_edge_value(edge, "EdgeBetweenness", (*betweenness).into());
            }
        }
    }
}
