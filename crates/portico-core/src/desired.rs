// ── Desired-state builder ──
//
// Pure function from (exposure, nodes) to the full object graph portico
// wants on the control plane. No network access; calling it twice with
// the same inputs yields identical graphs.

use std::collections::{BTreeSet, HashSet};

use portico_api::{Backend, Bind, Frontend, ObjectKind, Server};
use tracing::debug;

use crate::error::CoreError;
use crate::model::{ExposedAddress, Exposure, Protocol, WorkerNode};
use crate::naming;

/// One backend and its servers.
#[derive(Debug, Clone, PartialEq)]
pub struct PoolPlan {
    pub backend: Backend,
    pub members: Vec<Server>,
}

/// One frontend and its binds.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupPlan {
    pub frontend: Frontend,
    pub binds: Vec<Bind>,
}

/// Everything an exposure should own on the control plane.
#[derive(Debug, Clone, PartialEq)]
pub struct TargetGraph {
    pub pools: Vec<PoolPlan>,
    pub groups: Vec<GroupPlan>,
    /// One entry per (external address × port), in address-major order.
    pub exposed: Vec<ExposedAddress>,
}

impl TargetGraph {
    /// `(kind, parent/name)` for every object in the graph.
    pub fn object_names(&self) -> BTreeSet<(ObjectKind, String)> {
        let mut names = BTreeSet::new();
        for pool in &self.pools {
            names.insert((ObjectKind::Backend, pool.backend.name.clone()));
            for member in &pool.members {
                names.insert((
                    ObjectKind::Server,
                    format!("{}/{}", pool.backend.name, member.name),
                ));
            }
        }
        for group in &self.groups {
            names.insert((ObjectKind::Frontend, group.frontend.name.clone()));
            for bind in &group.binds {
                names.insert((
                    ObjectKind::Bind,
                    format!("{}/{}", group.frontend.name, bind.name),
                ));
            }
        }
        names
    }

    pub fn object_count(&self) -> usize {
        self.pools.iter().map(|p| 1 + p.members.len()).sum::<usize>()
            + self.groups.iter().map(|g| 1 + g.binds.len()).sum::<usize>()
    }
}

/// Compute the target graph for `exposure` backed by `nodes`.
///
/// Fails without a partial graph when the exposure has no external
/// address or a non-TCP port. Nodes without an internal address are
/// skipped, so a node list with none yields pools with no members.
pub fn build(exposure: &Exposure, nodes: &[WorkerNode]) -> Result<TargetGraph, CoreError> {
    validate(exposure)?;

    let uid = exposure.uid.as_str();
    let addresses = distinct(&exposure.external_addresses);

    let eligible: Vec<(&WorkerNode, &str)> = nodes
        .iter()
        .filter_map(|node| node.internal_address().map(|addr| (node, addr)))
        .collect();
    if eligible.len() < nodes.len() {
        debug!(
            uid,
            skipped = nodes.len() - eligible.len(),
            "nodes without an internal address excluded from pools"
        );
    }

    let mut pools = Vec::with_capacity(exposure.ports.len());
    let mut groups = Vec::with_capacity(exposure.ports.len());

    for port in &exposure.ports {
        let backend = Backend::tcp_round_robin(naming::pool_name(uid, port));
        let members = eligible
            .iter()
            .enumerate()
            .map(|(ordinal, (node, addr))| {
                Server::new(
                    naming::member_name(uid, &node.name, port.worker_port, ordinal),
                    *addr,
                    port.worker_port,
                )
            })
            .collect();

        let frontend = Frontend::tcp(naming::group_name(uid, port), backend.name.clone());
        let binds = addresses
            .iter()
            .enumerate()
            .map(|(ordinal, ip)| {
                Bind::new(
                    naming::bind_name(uid, port.external_port, ordinal),
                    *ip,
                    port.external_port,
                )
            })
            .collect();

        pools.push(PoolPlan { backend, members });
        groups.push(GroupPlan { frontend, binds });
    }

    let exposed = addresses
        .iter()
        .flat_map(|ip| {
            exposure.ports.iter().map(move |port| ExposedAddress {
                ip: (*ip).to_owned(),
                port: port.external_port,
                protocol: port.protocol,
            })
        })
        .collect();

    Ok(TargetGraph {
        pools,
        groups,
        exposed,
    })
}

fn validate(exposure: &Exposure) -> Result<(), CoreError> {
    if exposure.external_addresses.iter().all(|a| a.trim().is_empty()) {
        return Err(CoreError::NoExternalAddress {
            uid: exposure.uid.clone(),
        });
    }
    if let Some(port) = exposure
        .ports
        .iter()
        .find(|p| p.protocol != Protocol::Tcp)
    {
        return Err(CoreError::UnsupportedProtocol {
            port: if port.name.is_empty() {
                port.external_port.to_string()
            } else {
                port.name.clone()
            },
            protocol: port.protocol,
        });
    }
    Ok(())
}

/// Non-empty addresses, first occurrence wins.
fn distinct(addresses: &[String]) -> Vec<&str> {
    let mut seen = HashSet::new();
    addresses
        .iter()
        .map(|a| a.trim())
        .filter(|a| !a.is_empty() && seen.insert(*a))
        .collect()
}
