// ── Live-state scanner ──
//
// Reads what an exposure currently owns on the control plane. Ownership is
// recovered purely from name prefixes, so objects left behind by older
// revisions of the exposure show up here too and get cleaned up by the
// next pass.

use std::collections::BTreeSet;

use tokio_util::sync::CancellationToken;
use tracing::debug;

use portico_api::{
    Backend, Bind, ConfigObject, DataplaneClient, Frontend, ObjectKind, Scope, Server,
};

use crate::error::CoreError;
use crate::naming;

/// A child object together with the name of the object it lives under.
#[derive(Debug, Clone, PartialEq)]
pub struct Nested<T> {
    pub parent: String,
    pub object: T,
}

/// Every object an exposure owns right now.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LiveGraph {
    pub backends: Vec<Backend>,
    pub servers: Vec<Nested<Server>>,
    pub frontends: Vec<Frontend>,
    pub binds: Vec<Nested<Bind>>,
}

impl LiveGraph {
    pub fn is_empty(&self) -> bool {
        self.backends.is_empty()
            && self.servers.is_empty()
            && self.frontends.is_empty()
            && self.binds.is_empty()
    }

    pub fn object_count(&self) -> usize {
        self.backends.len() + self.servers.len() + self.frontends.len() + self.binds.len()
    }

    /// `(kind, parent/name)` for every object, comparable with
    /// [`TargetGraph::object_names`](crate::desired::TargetGraph::object_names).
    pub fn object_names(&self) -> BTreeSet<(ObjectKind, String)> {
        let mut names = BTreeSet::new();
        names.extend(
            self.backends
                .iter()
                .map(|b| (ObjectKind::Backend, b.name.clone())),
        );
        names.extend(
            self.servers
                .iter()
                .map(|s| (ObjectKind::Server, format!("{}/{}", s.parent, s.object.name))),
        );
        names.extend(
            self.frontends
                .iter()
                .map(|f| (ObjectKind::Frontend, f.name.clone())),
        );
        names.extend(
            self.binds
                .iter()
                .map(|b| (ObjectKind::Bind, format!("{}/{}", b.parent, b.object.name))),
        );
        names
    }
}

/// List owned objects of kind `T` in `scope`.
async fn owned<T: ConfigObject>(
    client: &DataplaneClient,
    uid: &str,
    scope: Scope<'_>,
    txn: Option<&str>,
    cancel: &CancellationToken,
) -> Result<Vec<T>, CoreError> {
    if cancel.is_cancelled() {
        return Err(CoreError::Cancelled);
    }
    let prefix = naming::ownership_prefix(T::KIND, uid);
    let all: Vec<T> = client.list(scope, txn).await?;
    let total = all.len();
    let mine: Vec<T> = all
        .into_iter()
        .filter(|o| o.name().starts_with(&prefix))
        .collect();
    debug!(kind = %T::KIND, total, owned = mine.len(), "listed");
    Ok(mine)
}

/// Owned listener groups and their binds. Enough to answer a status query.
pub async fn scan_listeners(
    client: &DataplaneClient,
    uid: &str,
    txn: Option<&str>,
    cancel: &CancellationToken,
) -> Result<(Vec<Frontend>, Vec<Nested<Bind>>), CoreError> {
    let frontends: Vec<Frontend> = owned(client, uid, Scope::Root, txn, cancel).await?;
    let mut binds = Vec::new();
    for frontend in &frontends {
        let children: Vec<Bind> =
            owned(client, uid, Scope::Parent(&frontend.name), txn, cancel).await?;
        binds.extend(children.into_iter().map(|object| Nested {
            parent: frontend.name.clone(),
            object,
        }));
    }
    Ok((frontends, binds))
}

/// Full scan: backends, their servers, frontends, their binds.
///
/// Children are only listed under owned parents, so an exposure never
/// reads another exposure's pools.
pub async fn scan(
    client: &DataplaneClient,
    uid: &str,
    txn: Option<&str>,
    cancel: &CancellationToken,
) -> Result<LiveGraph, CoreError> {
    let backends: Vec<Backend> = owned(client, uid, Scope::Root, txn, cancel).await?;
    let mut servers = Vec::new();
    for backend in &backends {
        let children: Vec<Server> =
            owned(client, uid, Scope::Parent(&backend.name), txn, cancel).await?;
        servers.extend(children.into_iter().map(|object| Nested {
            parent: backend.name.clone(),
            object,
        }));
    }

    let (frontends, binds) = scan_listeners(client, uid, txn, cancel).await?;

    let graph = LiveGraph {
        backends,
        servers,
        frontends,
        binds,
    };
    debug!(uid, objects = graph.object_count(), "scan complete");
    Ok(graph)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_graph_reports_empty() {
        let graph = LiveGraph::default();
        assert!(graph.is_empty());
        assert_eq!(graph.object_count(), 0);
        assert!(graph.object_names().is_empty());
    }

    #[test]
    fn nested_names_carry_parent() {
        let graph = LiveGraph {
            backends: vec![Backend::tcp_round_robin("backend-u3-abc-http-tcp")],
            servers: vec![Nested {
                parent: "backend-u3-abc-http-tcp".into(),
                object: Server::new("server-u3-abc-n-30080-0", "10.0.0.1", 30080),
            }],
            frontends: Vec::new(),
            binds: Vec::new(),
        };
        assert!(!graph.is_empty());
        let names = graph.object_names();
        assert!(names.contains(&(
            ObjectKind::Server,
            "backend-u3-abc-http-tcp/server-u3-abc-n-30080-0".to_string()
        )));
        assert_eq!(names.len(), 2);
    }
}
