// Data Plane API configuration models
//
// Only the fields the reconciler reads or writes are modelled explicitly.
// Everything else the API returns lands in `extra`, so objects created by
// other actors survive a list/decode without loss.

use serde::{Deserialize, Serialize};

use crate::objects::{ConfigObject, ObjectKind};

// ── Response envelopes ───────────────────────────────────────────────

/// List payload. v3 returns a bare array; v2 wrapped it as
/// `{ "_version": n, "data": [...] }`. Both are accepted.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum ListBody<T> {
    Enveloped { data: Vec<T> },
    Bare(Vec<T>),
}

impl<T> ListBody<T> {
    pub(crate) fn into_items(self) -> Vec<T> {
        match self {
            Self::Enveloped { data } | Self::Bare(data) => data,
        }
    }
}

/// Single-object payload, same v2/v3 split as [`ListBody`].
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum ItemBody<T> {
    Enveloped { data: T },
    Bare(T),
}

impl<T> ItemBody<T> {
    pub(crate) fn into_item(self) -> T {
        match self {
            Self::Enveloped { data } | Self::Bare(data) => data,
        }
    }
}

// ── Shared enums ─────────────────────────────────────────────────────

/// Proxy mode. Portico only ever writes `tcp`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProxyMode {
    Tcp,
    Http,
    Log,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BalanceAlgorithm {
    #[serde(rename = "roundrobin")]
    RoundRobin,
    #[serde(rename = "static-rr")]
    StaticRoundRobin,
    #[serde(rename = "leastconn")]
    LeastConn,
    #[serde(rename = "first")]
    First,
    #[serde(rename = "source")]
    Source,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Balance {
    pub algorithm: BalanceAlgorithm,
}

// ── Backend ──────────────────────────────────────────────────────────

/// A routing group of servers (`configuration/backends`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Backend {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<ProxyMode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub balance: Option<Balance>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Backend {
    /// A round-robin TCP pass-through backend.
    pub fn tcp_round_robin(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            mode: Some(ProxyMode::Tcp),
            balance: Some(Balance {
                algorithm: BalanceAlgorithm::RoundRobin,
            }),
            extra: serde_json::Map::new(),
        }
    }
}

impl ConfigObject for Backend {
    const KIND: ObjectKind = ObjectKind::Backend;

    fn name(&self) -> &str {
        &self.name
    }
}

// ── Server ───────────────────────────────────────────────────────────

/// One endpoint inside a backend (`configuration/backends/{b}/servers`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Server {
    pub name: String,
    pub address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Server {
    pub fn new(name: impl Into<String>, address: impl Into<String>, port: u16) -> Self {
        Self {
            name: name.into(),
            address: address.into(),
            port: Some(port),
            extra: serde_json::Map::new(),
        }
    }
}

impl ConfigObject for Server {
    const KIND: ObjectKind = ObjectKind::Server;

    fn name(&self) -> &str {
        &self.name
    }
}

// ── Frontend ─────────────────────────────────────────────────────────

/// A listener group (`configuration/frontends`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frontend {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<ProxyMode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_backend: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Frontend {
    /// A TCP frontend routing everything to `backend`.
    pub fn tcp(name: impl Into<String>, backend: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            mode: Some(ProxyMode::Tcp),
            default_backend: Some(backend.into()),
            extra: serde_json::Map::new(),
        }
    }
}

impl ConfigObject for Frontend {
    const KIND: ObjectKind = ObjectKind::Frontend;

    fn name(&self) -> &str {
        &self.name
    }
}

// ── Bind ─────────────────────────────────────────────────────────────

/// A listening socket inside a frontend (`configuration/frontends/{f}/binds`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bind {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Bind {
    pub fn new(name: impl Into<String>, address: impl Into<String>, port: u16) -> Self {
        Self {
            name: name.into(),
            address: Some(address.into()),
            port: Some(port),
            extra: serde_json::Map::new(),
        }
    }
}

impl ConfigObject for Bind {
    const KIND: ObjectKind = ObjectKind::Bind;

    fn name(&self) -> &str {
        &self.name
    }
}
