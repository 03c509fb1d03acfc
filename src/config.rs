//! Run requests and analyzer settings.

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Describes a single analysis run over a network.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AnalysisRequest<N> {
    /// Restricts the run to a subset of the nodes. When set, only local metrics are computed.
    pub node_subset: Option<Vec<N>>,
    /// Whether edges are interpreted as directed.
    pub directed: bool,
    /// The caller knows the network has duplicate parallel directed edges, which makes
    /// unweighted shortest path counting ambiguous and disables betweenness and stress.
    pub has_duplicate_edges: bool,
}

impl<N> AnalysisRequest<N> {
    /// A whole-network request treating edges as directed.
    ///
    /// # Examples
    ///
    /// ```
    /// use netanalyzer::config::AnalysisRequest;
    ///
    /// let request = AnalysisRequest::<&str>::directed();
    /// assert!(request.directed);
    /// assert!(request.node_subset.is_none());
    /// ```
    pub fn directed() -> Self {
        Self {
            node_subset: None,
            directed: true,
            has_duplicate_edges: false,
        }
    }

    /// A whole-network request treating edges as undirected.
    pub fn undirected() -> Self {
        Self {
            directed: false,
            ..Self::directed()
        }
    }

    /// Restricts the request to the given nodes.
    pub fn with_subset(mut self, nodes: Vec<N>) -> Self {
        self.node_subset = Some(nodes);
        self
    }

    /// Flags the network as containing duplicate parallel edges.
    pub fn with_duplicate_edges(mut self, has_duplicate_edges: bool) -> Self {
        self.has_duplicate_edges = has_duplicate_edges;
        self
    }

    /// Whether the metrics requiring global reachability are computed for this request.
    pub fn computes_global_metrics(&self) -> bool {
        self.node_subset.is_none()
    }

    /// Whether betweenness and stress are computed for this request, before any overflow.
    pub fn computes_betweenness(&self) -> bool {
        self.computes_global_metrics() && !self.has_duplicate_edges
    }
}

/// Settings that control how results are rounded and written back.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerSettings {
    /// Write per-node results into the attribute store.
    pub write_node_attributes: bool,
    /// Write per-edge results into the attribute store.
    pub write_edge_attributes: bool,
    /// The number of decimal places floating point results are rounded to.
    pub rounding_digits: u32,
}

impl Default for AnalyzerSettings {
    fn default() -> Self {
        Self {
            write_node_attributes: true,
            write_edge_attributes: true,
            rounding_digits: 8,
        }
    }
}

impl AnalyzerSettings {
    /// Parses settings from JSON, missing fields take their default value.
    ///
    /// # Examples
    ///
    /// ```
    /// use netanalyzer::config::AnalyzerSettings;
    ///
    /// let settings = AnalyzerSettings::from_json(r#"{ "write_edge_attributes": false }"#).unwrap();
    /// assert!(settings.write_node_attributes);
    /// assert!(!settings.write_edge_attributes);
    /// assert_eq!(settings.rounding_digits, 8);
    /// ```
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AnalysisError;

    #[test]
    fn global_metrics_gate() {
        let request = AnalysisRequest::<u8>::undirected();
        assert!(request.computes_global_metrics());
        assert!(request.computes_betweenness());

        let request = request.with_duplicate_edges(true);
        assert!(request.computes_global_metrics());
        assert!(!request.computes_betweenness());

        let request = AnalysisRequest::directed().with_subset(vec![1u8]);
        assert!(!request.computes_global_metrics());
        assert!(!request.computes_betweenness());
    }

    #[test]
    fn settings_defaults() {
        let settings = AnalyzerSettings::from_json("{}").unwrap();
        assert_eq!(settings, AnalyzerSettings::default());
    }

    #[test]
    fn settings_invalid() {
        assert!(matches!(
            AnalyzerSettings::from_json("{ \"rounding_digits\": -1 }"),
            Err(AnalysisError::InvalidSettings(_))
        ));
    }
}
