// ── Exposure controller ──
//
// The surface an orchestration layer drives. Each call is one independent
// pass against the control plane: build the target graph, then run the
// reconciler, or rescan for status. No state is kept between calls, so
// the controller can be shared freely across tasks reconciling different
// exposures.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use portico_api::DataplaneClient;

use crate::config::DataplaneConfig;
use crate::desired;
use crate::error::CoreError;
use crate::model::{ExposedAddress, Exposure, ExposureStatus, Protocol, WorkerNode};
use crate::naming;
use crate::reconciler::{PassOutcome, Plan, Reconciler};
use crate::scanner;

/// Reconciles exposures against one Data Plane API endpoint.
///
/// Cheaply cloneable via `Arc<ControllerInner>`. Clones share the
/// cancellation token, so [`shutdown`](Self::shutdown) stops passes
/// started from any clone.
#[derive(Clone)]
pub struct ExposureController {
    inner: Arc<ControllerInner>,
}

struct ControllerInner {
    client: DataplaneClient,
    cancel: CancellationToken,
}

impl ExposureController {
    pub fn new(client: DataplaneClient) -> Self {
        Self::with_cancellation(client, CancellationToken::new())
    }

    /// Use a caller-owned token, typically a child of the process-wide
    /// shutdown token.
    pub fn with_cancellation(client: DataplaneClient, cancel: CancellationToken) -> Self {
        Self {
            inner: Arc::new(ControllerInner { client, cancel }),
        }
    }

    pub fn from_config(config: &DataplaneConfig) -> Result<Self, CoreError> {
        Ok(Self::new(config.build_client()?))
    }

    pub fn client(&self) -> &DataplaneClient {
        &self.inner.client
    }

    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.inner.cancel
    }

    /// Stop in-flight passes at their next call boundary. Open
    /// transactions are closed, never committed.
    pub fn shutdown(&self) {
        self.inner.cancel.cancel();
    }

    // ── Operations ───────────────────────────────────────────────

    /// Make the control plane match `exposure` backed by `nodes`.
    ///
    /// Returns one address per (external address × port). Preconditions
    /// are checked before any control-plane call.
    pub async fn ensure_exposure(
        &self,
        exposure: &Exposure,
        nodes: &[WorkerNode],
    ) -> Result<Vec<ExposedAddress>, CoreError> {
        let target = desired::build(exposure, nodes)?;
        let outcome = self
            .reconciler()
            .run(&exposure.uid, Plan::Replace(&target))
            .await?;
        log_outcome("ensure", &exposure.uid, &outcome);
        Ok(target.exposed)
    }

    /// Same as [`ensure_exposure`](Self::ensure_exposure). Every pass
    /// rebuilds from scratch, so there is no incremental path.
    pub async fn update_exposure(
        &self,
        exposure: &Exposure,
        nodes: &[WorkerNode],
    ) -> Result<Vec<ExposedAddress>, CoreError> {
        self.ensure_exposure(exposure, nodes).await
    }

    /// Delete everything `exposure` owns. Succeeds when nothing is owned.
    pub async fn ensure_exposure_removed(&self, exposure: &Exposure) -> Result<(), CoreError> {
        let outcome = self.reconciler().run(&exposure.uid, Plan::Remove).await?;
        log_outcome("remove", &exposure.uid, &outcome);
        Ok(())
    }

    /// Read what is currently exposed. Makes no changes.
    ///
    /// `exists` is true when any owned frontend is present; addresses come
    /// from the owned binds.
    pub async fn get_exposure_status(
        &self,
        exposure: &Exposure,
    ) -> Result<ExposureStatus, CoreError> {
        let (frontends, binds) =
            scanner::scan_listeners(&self.inner.client, &exposure.uid, None, &self.inner.cancel)
                .await?;

        let addresses = binds
            .into_iter()
            .filter_map(|bind| {
                let ip = bind.object.address?;
                let port = bind.object.port?;
                // Only TCP listeners are ever created.
                Some(ExposedAddress {
                    ip,
                    port,
                    protocol: Protocol::Tcp,
                })
            })
            .collect::<Vec<_>>();

        debug!(
            uid = %exposure.uid,
            frontends = frontends.len(),
            addresses = addresses.len(),
            "status scanned"
        );
        Ok(ExposureStatus {
            exists: !frontends.is_empty(),
            addresses,
        })
    }

    /// Display name of the load balancer backing `exposure`.
    pub fn exposure_name(exposure: &Exposure) -> String {
        naming::exposure_name(&exposure.uid)
    }

    fn reconciler(&self) -> Reconciler<'_> {
        Reconciler::new(&self.inner.client, &self.inner.cancel)
    }
}

fn log_outcome(op: &str, uid: &str, outcome: &PassOutcome) {
    info!(
        op,
        uid,
        transaction = %outcome.transaction_id,
        version = outcome.version,
        deleted = outcome.deleted,
        created = outcome.created,
        "exposure reconciled"
    );
}
