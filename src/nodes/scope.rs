use std::fmt;
use std::str::FromStr;

use super::error::NodeError;

/// Which nodes a list shows: every node, or the nodes of one network.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeScope {
    All,
    Network(u64),
}

impl NodeScope {
    /// Key of the cached read behind this scope.
    pub fn path(&self) -> String {
        match self {
            NodeScope::All => "/nodes".to_string(),
            NodeScope::Network(id) => format!("/network/{}", id),
        }
    }
}

impl FromStr for NodeScope {
    type Err = NodeError;

    /// Parses the route segment of `/nodes/network/{scope}`.
    fn from_str(segment: &str) -> Result<Self, Self::Err> {
        if segment == "all" {
            return Ok(NodeScope::All);
        }
        segment
            .parse()
            .map(NodeScope::Network)
            .map_err(|_| NodeError::Scope(segment.to_string()))
    }
}

impl fmt::Display for NodeScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeScope::All => f.write_str("all"),
            NodeScope::Network(id) => write!(f, "{}", id),
        }
    }
}
