// ── Exposure domain types ──
//
// Plain, already-validated data handed in by the orchestration layer.
// Nothing here talks to the control plane.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Transport protocol of a service port.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum Protocol {
    #[default]
    Tcp,
    Udp,
    Sctp,
}

/// One externally exposed port and the worker port it forwards to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortSpec {
    /// Port name; may be empty for single-port exposures.
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub protocol: Protocol,
    pub external_port: u16,
    pub worker_port: u16,
}

/// The unit of reconciliation: a set of external address/port mappings
/// backed by the worker pool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Exposure {
    /// Opaque, caller-assigned identity. Immutable for the exposure's lifetime.
    pub uid: String,
    #[serde(default)]
    pub external_addresses: Vec<String>,
    #[serde(default)]
    pub ports: Vec<PortSpec>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeAddressType {
    #[serde(rename = "InternalIP")]
    InternalIp,
    #[serde(rename = "ExternalIP")]
    ExternalIp,
    Hostname,
    #[serde(rename = "InternalDNS")]
    InternalDns,
    #[serde(rename = "ExternalDNS")]
    ExternalDns,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeAddress {
    #[serde(rename = "type")]
    pub kind: NodeAddressType,
    pub address: String,
}

/// A worker node that can back a pool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerNode {
    pub name: String,
    #[serde(default)]
    pub addresses: Vec<NodeAddress>,
}

impl WorkerNode {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            addresses: Vec::new(),
        }
    }

    pub fn with_address(mut self, kind: NodeAddressType, address: impl Into<String>) -> Self {
        self.addresses.push(NodeAddress {
            kind,
            address: address.into(),
        });
        self
    }

    /// The first `InternalIP` address; the only one pool members use.
    pub fn internal_address(&self) -> Option<&str> {
        self.addresses
            .iter()
            .find(|a| a.kind == NodeAddressType::InternalIp && !a.address.is_empty())
            .map(|a| a.address.as_str())
    }
}

/// An externally reachable socket realized for an exposure.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExposedAddress {
    pub ip: String,
    pub port: u16,
    pub protocol: Protocol,
}

/// Read-only view of an exposure's live state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExposureStatus {
    pub addresses: Vec<ExposedAddress>,
    pub exists: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn internal_address_takes_first_internal_ip() {
        let node = WorkerNode::new("worker-1")
            .with_address(NodeAddressType::Hostname, "worker-1")
            .with_address(NodeAddressType::ExternalIp, "198.51.100.9")
            .with_address(NodeAddressType::InternalIp, "10.0.0.1")
            .with_address(NodeAddressType::InternalIp, "10.0.0.2");
        assert_eq!(node.internal_address(), Some("10.0.0.1"));
    }

    #[test]
    fn node_without_internal_ip() {
        let node = WorkerNode::new("edge").with_address(NodeAddressType::ExternalIp, "198.51.100.1");
        assert_eq!(node.internal_address(), None);
    }

    #[test]
    fn exposure_decodes_from_camel_case() {
        let exposure: Exposure = serde_json::from_value(json!({
            "uid": "abc",
            "externalAddresses": ["203.0.113.5"],
            "ports": [{ "name": "http", "protocol": "TCP", "externalPort": 80, "workerPort": 30080 }]
        }))
        .unwrap_or_else(|e| panic!("{e}"));

        assert_eq!(exposure.ports[0].protocol, Protocol::Tcp);
        assert_eq!(exposure.ports[0].worker_port, 30080);
    }

    #[test]
    fn node_decodes_kubernetes_address_types() {
        let node: WorkerNode = serde_json::from_value(json!({
            "name": "n1",
            "addresses": [
                { "type": "Hostname", "address": "n1" },
                { "type": "InternalIP", "address": "10.0.0.7" },
                { "type": "SomethingNew", "address": "x" }
            ]
        }))
        .unwrap_or_else(|e| panic!("{e}"));

        assert_eq!(node.addresses[2].kind, NodeAddressType::Other);
        assert_eq!(node.internal_address(), Some("10.0.0.7"));
    }

    #[test]
    fn protocol_parses_case_insensitively() {
        assert_eq!("tcp".parse::<Protocol>().ok(), Some(Protocol::Tcp));
        assert_eq!(Protocol::Udp.to_string(), "UDP");
    }
}
