// ── Reconciler ──
//
// One pass replaces everything an exposure owns inside a single Data Plane
// transaction:
//
//   Idle ─► TransactionOpen ─► Deleting ─► Creating ─► Committed
//    │            │               │           │
//    └────────────┴───────────────┴───────────┴──────► Aborted
//
// Deletes run children-first and creates parents-first, so no object ever
// references one that is missing inside the transaction. Nothing is
// applied until commit; any failure after the transaction opens closes it,
// which discards every staged change.

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use portico_api::{Backend, Bind, DataplaneClient, Frontend, Scope, Server, Transaction};

use crate::desired::TargetGraph;
use crate::error::CoreError;
use crate::scanner::{self, LiveGraph};

/// Where a pass currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum PassState {
    Idle,
    TransactionOpen,
    Deleting,
    Creating,
    Committed,
    Aborted,
}

impl PassState {
    /// Legal transitions. A remove-only pass commits straight from `Deleting`.
    pub fn can_advance_to(self, next: Self) -> bool {
        use PassState::{Aborted, Committed, Creating, Deleting, Idle, TransactionOpen};
        matches!(
            (self, next),
            (Idle, TransactionOpen)
                | (TransactionOpen, Deleting)
                | (Deleting, Creating | Committed)
                | (Creating, Committed)
                | (Idle | TransactionOpen | Deleting | Creating, Aborted)
        )
    }
}

/// What a pass should leave behind.
#[derive(Debug, Clone, Copy)]
pub enum Plan<'a> {
    /// Delete everything owned, then create the target graph.
    Replace(&'a TargetGraph),
    /// Delete everything owned.
    Remove,
}

/// Summary of a committed pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PassOutcome {
    pub transaction_id: String,
    /// Configuration version the transaction was opened against.
    pub version: i64,
    pub deleted: usize,
    pub created: usize,
}

pub struct Reconciler<'a> {
    client: &'a DataplaneClient,
    cancel: &'a CancellationToken,
    state: PassState,
}

impl<'a> Reconciler<'a> {
    pub fn new(client: &'a DataplaneClient, cancel: &'a CancellationToken) -> Self {
        Self {
            client,
            cancel,
            state: PassState::Idle,
        }
    }

    pub fn state(&self) -> PassState {
        self.state
    }

    fn advance(&mut self, next: PassState) {
        debug_assert!(
            self.state.can_advance_to(next),
            "illegal pass transition {} -> {next}",
            self.state
        );
        debug!(from = %self.state, to = %next, "pass state");
        self.state = next;
    }

    fn checkpoint(&self) -> Result<(), CoreError> {
        if self.cancel.is_cancelled() {
            Err(CoreError::Cancelled)
        } else {
            Ok(())
        }
    }

    /// Run one pass for the exposure identified by `uid`.
    ///
    /// Every call starts a fresh pass from `Idle`. Failing to read the
    /// version or open the transaction leaves nothing to undo. Any later
    /// failure, cancellation included, closes the transaction before the
    /// error is returned. Either way the pass ends in `Aborted`.
    pub async fn run(&mut self, uid: &str, plan: Plan<'_>) -> Result<PassOutcome, CoreError> {
        self.state = PassState::Idle;

        let (version, txn) = match self.open().await {
            Ok(opened) => opened,
            Err(err) => {
                self.advance(PassState::Aborted);
                return Err(err);
            }
        };
        self.advance(PassState::TransactionOpen);
        debug!(uid, transaction = %txn.id, version, "transaction open");

        match self.apply(uid, plan, &txn.id).await {
            Ok((deleted, created)) => {
                self.advance(PassState::Committed);
                info!(
                    uid,
                    transaction = %txn.id,
                    deleted,
                    created,
                    "transaction committed"
                );
                Ok(PassOutcome {
                    transaction_id: txn.id,
                    version,
                    deleted,
                    created,
                })
            }
            Err(err) => {
                self.advance(PassState::Aborted);
                self.abort(&txn.id, &err).await;
                Err(err)
            }
        }
    }

    async fn open(&self) -> Result<(i64, Transaction), CoreError> {
        self.checkpoint()?;
        let version = self.client.configuration_version().await?;
        self.checkpoint()?;
        let txn = self.client.begin_transaction(version).await?;
        Ok((version, txn))
    }

    async fn apply(
        &mut self,
        uid: &str,
        plan: Plan<'_>,
        txn: &str,
    ) -> Result<(usize, usize), CoreError> {
        let live = scanner::scan(self.client, uid, Some(txn), self.cancel).await?;

        self.advance(PassState::Deleting);
        let deleted = self.delete_all(&live, txn).await?;

        let created = match plan {
            Plan::Replace(target) => {
                self.advance(PassState::Creating);
                self.create_all(target, txn).await?
            }
            Plan::Remove => 0,
        };

        self.checkpoint()?;
        self.client.commit_transaction(txn).await?;
        Ok((deleted, created))
    }

    async fn delete_all(&self, live: &LiveGraph, txn: &str) -> Result<usize, CoreError> {
        let txn = Some(txn);
        for bind in &live.binds {
            self.checkpoint()?;
            self.client
                .delete::<Bind>(Scope::Parent(&bind.parent), &bind.object.name, txn)
                .await?;
        }
        for frontend in &live.frontends {
            self.checkpoint()?;
            self.client
                .delete::<Frontend>(Scope::Root, &frontend.name, txn)
                .await?;
        }
        for server in &live.servers {
            self.checkpoint()?;
            self.client
                .delete::<Server>(Scope::Parent(&server.parent), &server.object.name, txn)
                .await?;
        }
        for backend in &live.backends {
            self.checkpoint()?;
            self.client
                .delete::<Backend>(Scope::Root, &backend.name, txn)
                .await?;
        }
        Ok(live.object_count())
    }

    async fn create_all(&self, target: &TargetGraph, txn: &str) -> Result<usize, CoreError> {
        let txn = Some(txn);
        for pool in &target.pools {
            self.checkpoint()?;
            self.client.create(Scope::Root, &pool.backend, txn).await?;
        }
        for pool in &target.pools {
            for member in &pool.members {
                self.checkpoint()?;
                self.client
                    .create(Scope::Parent(&pool.backend.name), member, txn)
                    .await?;
            }
        }
        for group in &target.groups {
            self.checkpoint()?;
            self.client.create(Scope::Root, &group.frontend, txn).await?;
        }
        for group in &target.groups {
            for bind in &group.binds {
                self.checkpoint()?;
                self.client
                    .create(Scope::Parent(&group.frontend.name), bind, txn)
                    .await?;
            }
        }
        Ok(target.object_count())
    }

    /// Best-effort close. The original error always wins.
    async fn abort(&self, txn: &str, cause: &CoreError) {
        match self.client.close_transaction(txn).await {
            Ok(()) => warn!(transaction = %txn, error = %cause, "transaction aborted"),
            Err(close_err) => warn!(
                transaction = %txn,
                error = %cause,
                close_error = %close_err,
                "failed to close aborted transaction"
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use portico_api::{Credentials, TransportConfig};
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn forward_path_is_legal() {
        let path = [
            PassState::Idle,
            PassState::TransactionOpen,
            PassState::Deleting,
            PassState::Creating,
            PassState::Committed,
        ];
        for pair in path.windows(2) {
            assert!(pair[0].can_advance_to(pair[1]), "{} -> {}", pair[0], pair[1]);
        }
    }

    #[test]
    fn remove_pass_commits_after_deleting() {
        assert!(PassState::Deleting.can_advance_to(PassState::Committed));
        assert!(!PassState::TransactionOpen.can_advance_to(PassState::Committed));
    }

    #[test]
    fn abort_from_any_unfinished_state() {
        assert!(PassState::Idle.can_advance_to(PassState::Aborted));
        assert!(PassState::TransactionOpen.can_advance_to(PassState::Aborted));
        assert!(PassState::Creating.can_advance_to(PassState::Aborted));
        assert!(!PassState::Committed.can_advance_to(PassState::Aborted));
    }

    #[test]
    fn finished_states_go_nowhere() {
        for next in [
            PassState::Idle,
            PassState::TransactionOpen,
            PassState::Deleting,
            PassState::Creating,
            PassState::Committed,
            PassState::Aborted,
        ] {
            assert!(!PassState::Committed.can_advance_to(next));
            assert!(!PassState::Aborted.can_advance_to(next));
        }
    }

    #[test]
    fn states_render_snake_case() {
        assert_eq!(PassState::TransactionOpen.to_string(), "transaction_open");
    }

    // ── Running passes ───────────────────────────────────────────

    fn client_for(uri: &str) -> DataplaneClient {
        let credentials = Credentials::new("admin", "adminpwd".to_string().into());
        DataplaneClient::new(uri, credentials, &TransportConfig::default())
            .unwrap_or_else(|e| panic!("{e}"))
    }

    /// An address nothing listens on.
    fn closed_endpoint() -> String {
        let listener =
            std::net::TcpListener::bind("127.0.0.1:0").unwrap_or_else(|e| panic!("{e}"));
        let addr = listener.local_addr().unwrap_or_else(|e| panic!("{e}"));
        drop(listener);
        format!("http://{addr}")
    }

    async fn empty_dataplane() -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v3/services/haproxy/configuration/version"))
            .respond_with(ResponseTemplate::new(200).set_body_string("7"))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/v3/services/haproxy/transactions"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "_version": 7, "id": "txn-1", "status": "in_progress"
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v3/services/haproxy/configuration/backends"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v3/services/haproxy/configuration/frontends"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&server)
            .await;
        Mock::given(method("PUT"))
            .and(path("/v3/services/haproxy/transactions/txn-1"))
            .respond_with(ResponseTemplate::new(202).set_body_json(json!({
                "_version": 8, "id": "txn-1", "status": "success"
            })))
            .mount(&server)
            .await;
        server
    }

    #[tokio::test]
    async fn failed_open_ends_aborted() {
        let client = client_for(&closed_endpoint());
        let cancel = CancellationToken::new();
        let mut reconciler = Reconciler::new(&client, &cancel);

        let result = reconciler.run("abc", Plan::Remove).await;

        assert!(
            matches!(result, Err(CoreError::ConnectionFailed { .. })),
            "got {result:?}"
        );
        assert_eq!(reconciler.state(), PassState::Aborted);
    }

    #[tokio::test]
    async fn cancelled_before_open_ends_aborted() {
        let client = client_for(&closed_endpoint());
        let cancel = CancellationToken::new();
        cancel.cancel();
        let mut reconciler = Reconciler::new(&client, &cancel);

        let result = reconciler.run("abc", Plan::Remove).await;

        assert!(matches!(result, Err(CoreError::Cancelled)), "got {result:?}");
        assert_eq!(reconciler.state(), PassState::Aborted);
    }

    #[tokio::test]
    async fn reconciler_runs_more_than_one_pass() {
        let server = empty_dataplane().await;
        let client = client_for(&server.uri());
        let cancel = CancellationToken::new();
        let mut reconciler = Reconciler::new(&client, &cancel);

        for _ in 0..2 {
            let outcome = reconciler
                .run("abc", Plan::Remove)
                .await
                .unwrap_or_else(|e| panic!("{e}"));
            assert_eq!(outcome.transaction_id, "txn-1");
            assert_eq!(outcome.version, 7);
            assert_eq!(reconciler.state(), PassState::Committed);
        }
    }

    #[tokio::test]
    async fn pass_after_failure_starts_fresh() {
        let server = empty_dataplane().await;
        let client = client_for(&server.uri());
        let cancel = CancellationToken::new();
        let mut reconciler = Reconciler::new(&client, &cancel);
        reconciler.state = PassState::Aborted;

        let outcome = reconciler.run("abc", Plan::Remove).await;

        assert!(outcome.is_ok(), "got {outcome:?}");
        assert_eq!(reconciler.state(), PassState::Committed);
    }
}
