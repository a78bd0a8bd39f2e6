use serde::{Deserialize, Serialize};

use super::user::{LinkedUser, User};

/// A virtual network definition. The CIDR and connection token are opaque
/// to the dashboard.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Network {
    #[serde(rename = "ID", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub cidr: String,
    #[serde(default)]
    pub connection_config: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nodes: Option<Vec<NetworkNode>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,
    #[serde(rename = "linkedUsers", alias = "linkedusers", default)]
    pub linked_users: Vec<LinkedUser>,
}

impl Network {
    /// Initial state of the network form.
    pub fn blank() -> Self {
        Self {
            user: Some(User::default()),
            ..Self::default()
        }
    }
}

/// A host joined to a network.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NetworkNode {
    #[serde(rename = "ID", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    #[serde(rename = "PeerID", default, skip_serializing_if = "Option::is_none")]
    pub peer_id: Option<String>,
    #[serde(rename = "Hostname", default, skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,
    #[serde(rename = "OS", default, skip_serializing_if = "Option::is_none")]
    pub os: Option<String>,
    #[serde(rename = "Arch", default, skip_serializing_if = "Option::is_none")]
    pub arch: Option<String>,
    #[serde(rename = "IP", default, skip_serializing_if = "Option::is_none")]
    pub ip: Option<String>,
    #[serde(rename = "Version", default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(rename = "LocalRoutes", default, skip_serializing_if = "Option::is_none")]
    pub local_routes: Option<Vec<String>>,
}

/// Body of a node listing: `/nodes` answers a bare array, `/network/{id}`
/// answers the network with its nodes embedded.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum NodeListing {
    Nodes(Vec<NetworkNode>),
    Network(Network),
}

impl NodeListing {
    pub fn into_nodes(self) -> Vec<NetworkNode> {
        match self {
            NodeListing::Nodes(nodes) => nodes,
            NodeListing::Network(network) => network.nodes.unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_node_listing_accepts_both_shapes() {
        let bare: NodeListing = serde_json::from_value(json!([
            {"ID": 1, "Hostname": "edge", "OS": "linux", "Arch": "amd64", "IP": "10.1.0.1/24"}
        ]))
        .unwrap();
        assert_eq!(bare.into_nodes()[0].hostname.as_deref(), Some("edge"));

        let embedded: NodeListing = serde_json::from_value(json!({
            "ID": 3, "name": "lab", "cidr": "10.1.0.0/24",
            "nodes": [{"ID": 2, "Hostname": "mac", "OS": "darwin"}]
        }))
        .unwrap();
        assert_eq!(embedded.into_nodes()[0].os.as_deref(), Some("darwin"));
    }

    #[test]
    fn test_blank_network_body() {
        let body = serde_json::to_value(Network::blank()).unwrap();
        assert_eq!(
            body,
            json!({"name": "", "cidr": "", "connection_config": "", "user": {}, "linkedUsers": []})
        );
    }
}
