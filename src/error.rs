//! Errors reported by the analyzer.

use thiserror::Error;

/// The conditions under which a request is rejected before any computation starts.
///
/// Disconnected components, parallel edges, numeric overflow and cancellation are all absorbed
/// by the analyzer as degraded outcomes and never surface as errors.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// The network, or the requested subset of it, contains no nodes.
    #[error("the network to analyse contains no nodes")]
    EmptyNetwork,
    /// A node in the requested subset isn't part of the network.
    #[error("node {0} is not part of the network")]
    UnknownNode(String),
    /// The analyzer settings couldn't be parsed.
    #[error("invalid analyzer settings: {0}")]
    InvalidSettings(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, AnalysisError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display() {
        assert_eq!(
            AnalysisError::EmptyNetwork.to_string(),
            "the network to analyse contains no nodes"
        );
        assert_eq!(
            AnalysisError::UnknownNode("\"z\"".to_string()).to_string(),
            "node \"z\" is not part of the network"
        );
    }
}
