// ── Runtime connection configuration ──
//
// These types describe *how* to reach the Data Plane API. They carry
// credential data and connection tuning, but never touch disk.
// portico-config (or any embedding controller) builds a `DataplaneConfig`
// and hands it in.

use std::time::Duration;

use secrecy::SecretString;
use url::Url;

use portico_api::transport::{TlsMode, TransportConfig};
use portico_api::{Credentials, DataplaneClient};

use crate::error::CoreError;

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(std::path::PathBuf),
    /// Skip verification (self-signed certs).
    DangerAcceptInvalid,
}

/// Configuration for connecting to a single Data Plane API endpoint.
#[derive(Debug, Clone)]
pub struct DataplaneConfig {
    /// Data Plane endpoint (e.g., `http://lb.internal:5555`).
    pub url: Url,
    pub username: String,
    pub password: SecretString,
    /// TLS verification strategy.
    pub tls: TlsVerification,
    /// Per-request deadline. The engine applies no other timeout.
    pub timeout: Duration,
}

impl DataplaneConfig {
    /// Build a client for this endpoint.
    pub fn build_client(&self) -> Result<DataplaneClient, CoreError> {
        let transport = build_transport(self);
        let credentials = Credentials::new(self.username.clone(), self.password.clone());
        Ok(DataplaneClient::new(
            self.url.as_str(),
            credentials,
            &transport,
        )?)
    }
}

fn build_transport(config: &DataplaneConfig) -> TransportConfig {
    let tls = match &config.tls {
        TlsVerification::SystemDefaults => TlsMode::System,
        TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
        TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
    };
    TransportConfig {
        tls,
        timeout: config.timeout,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_client_with_service_root() {
        let config = DataplaneConfig {
            url: Url::parse("http://lb.internal:5555").unwrap_or_else(|e| panic!("{e}")),
            username: "admin".into(),
            password: SecretString::from("secret".to_string()),
            tls: TlsVerification::default(),
            timeout: Duration::from_secs(5),
        };
        let client = config.build_client().unwrap_or_else(|e| panic!("{e}"));
        assert_eq!(
            client.base_url().as_str(),
            "http://lb.internal:5555/v3/services/haproxy/"
        );
    }
}
