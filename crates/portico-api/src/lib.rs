// portico-api: Async Rust client for the HAProxy Data Plane API (configuration + transactions)

pub mod auth;
pub mod client;
pub mod error;
pub mod models;
pub mod objects;
pub mod transaction;
pub mod transport;

pub use auth::Credentials;
pub use client::DataplaneClient;
pub use error::Error;
pub use models::{Backend, Balance, BalanceAlgorithm, Bind, Frontend, ProxyMode, Server};
pub use objects::{ConfigObject, ObjectKind, Scope};
pub use transaction::{Transaction, TransactionStatus};
pub use transport::{TlsMode, TransportConfig};
