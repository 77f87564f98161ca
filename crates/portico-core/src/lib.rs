// portico-core: Exposure reconciliation engine on top of portico-api.

pub mod config;
pub mod controller;
pub mod desired;
pub mod error;
pub mod model;
pub mod naming;
pub mod reconciler;
pub mod scanner;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{DataplaneConfig, TlsVerification};
pub use controller::ExposureController;
pub use desired::{GroupPlan, PoolPlan, TargetGraph};
pub use error::CoreError;
pub use reconciler::{PassOutcome, PassState, Plan, Reconciler};
pub use scanner::{LiveGraph, Nested};

pub use model::{
    ExposedAddress, Exposure, ExposureStatus, NodeAddress, NodeAddressType, PortSpec, Protocol,
    WorkerNode,
};

// Callers building a controller by hand need the client types too.
pub use portico_api::{Credentials, DataplaneClient};
pub use tokio_util::sync::CancellationToken;
