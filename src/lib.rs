//! Netanalyzer computes the topological parameters of large real-world networks, directed or
//! undirected, with parallel edges, self-loops and disconnected components all treated as the
//! common case.
//!
//! # Basic usage
//!
//! The analyzer reads networks through the [`Network`] trait, which the in-memory
//! [`Graph`](graph::Graph) implements. A run is described by an [`AnalysisRequest`] and produces
//! an [`AnalysisReport`] holding the network-wide [`Statistics`] along with the results for every
//! node and edge.
//!
//! ```rust
//! use std::net::SocketAddr;
//!
//! use netanalyzer::edge::Edge;
//! use netanalyzer::graph::Graph;
//! use netanalyzer::{AnalysisRequest, NetworkAnalyzer};
//!
//! // Construct the graph instance.
//! let mut graph = Graph::new();
//!
//! // Create some addresses to be part of a network topology.
//! let addrs: Vec<SocketAddr> = (0..3)
//!     .map(|i| format!("127.0.0.1:{i}").parse().unwrap())
//!     .collect();
//! let (a, b, c) = (addrs[0], addrs[1], addrs[2]);
//!
//! // Insert some edges, note the IDs can be any type that is `Copy + Eq + Hash + Ord + Debug`.
//! graph.insert(Edge::new(a, b));
//! graph.insert(Edge::new(a, c));
//!
//! // Analyse the graph, treating the connections as undirected.
//! let analyzer = NetworkAnalyzer::new(&graph, AnalysisRequest::undirected()).unwrap();
//! let report = analyzer.run();
//!
//! assert_eq!(report.statistics.integer("ncc"), Some(1));
//! assert_eq!(report.statistics.integer("diameter"), Some(2));
//! assert_eq!(report.node(&a).unwrap().betweenness_centrality, Some(1.0));
//!
//! // The statistics can be exported as JSON...
//! println!("{}", report.statistics.to_json().unwrap());
//! // ...outputs:
//! // [["nodeCount",{"type":"integer","value":3}],["edgeCount",{"type":"integer","value":2}],...]
//! ```
//!
//! Runs restricted to a subset of the nodes only compute the local parameters, the ones needing
//! global reachability (shortest paths, closeness, betweenness and stress) are left out of the
//! report rather than reported as zero.

#[cfg(test)]
#[macro_use]
mod macros;

pub mod accumulators;
pub mod analyzer;
pub mod attributes;
pub mod betweenness;
pub mod closeness;
pub mod components;
pub mod config;
pub mod control;
pub mod edge;
pub mod error;
pub mod graph;
pub mod local;
pub mod network;
pub mod orientation;
pub mod statistics;

pub use analyzer::{AnalysisReport, NetworkAnalyzer, NodeMetrics};
pub use config::{AnalysisRequest, AnalyzerSettings};
pub use control::AnalysisHandle;
pub use error::{AnalysisError, Result};
pub use network::Network;
pub use statistics::{StatValue, Statistics};
