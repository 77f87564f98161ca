// ── Core error types ──
//
// Errors surfaced to whoever drives reconciliation. Transport-layer
// failures from portico-api are translated by the `From` impl below so
// callers can branch on precondition vs. retryable failures without
// inspecting HTTP details.

use thiserror::Error;

use crate::model::Protocol;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Preconditions (no control-plane call made) ───────────────────
    #[error(
        "Exposure {uid} has no external address; automatic address assignment is not supported"
    )]
    NoExternalAddress { uid: String },

    #[error("Port '{port}' uses {protocol}; only TCP pass-through is supported")]
    UnsupportedProtocol { port: String, protocol: Protocol },

    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot connect to Data Plane API at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    #[error("Data Plane API request timed out")]
    Timeout,

    // ── Control-plane errors ─────────────────────────────────────────
    #[error("Configuration version {version} changed before the transaction opened: {message}")]
    VersionConflict { version: i64, message: String },

    #[error("Data Plane API error: {message}")]
    Api {
        message: String,
        /// Data Plane error code from the response body, if any.
        code: Option<i64>,
        /// HTTP status code (if applicable).
        status: Option<u16>,
    },

    // ── Pass control ─────────────────────────────────────────────────
    #[error("Reconciliation cancelled")]
    Cancelled,

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Rejected before any control-plane call; retrying won't help until
    /// the exposure itself changes.
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            Self::NoExternalAddress { .. } | Self::UnsupportedProtocol { .. }
        )
    }

    /// Worth retrying on the next reconciliation cycle.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::ConnectionFailed { .. } | Self::Timeout | Self::VersionConflict { .. } => true,
            Self::Api {
                status: Some(status),
                ..
            } => *status >= 500,
            _ => false,
        }
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<portico_api::Error> for CoreError {
    fn from(err: portico_api::Error) -> Self {
        match err {
            portico_api::Error::Authentication { message } => {
                CoreError::AuthenticationFailed { message }
            }
            portico_api::Error::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout
                } else if e.is_connect() {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map_or_else(|| "<unknown>".into(), ToString::to_string),
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::Api {
                        message: e.to_string(),
                        code: None,
                        status: e.status().map(|s| s.as_u16()),
                    }
                }
            }
            portico_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            portico_api::Error::Tls(msg) => CoreError::ConnectionFailed {
                url: String::new(),
                reason: format!("TLS error: {msg}"),
            },
            portico_api::Error::Api {
                message,
                code,
                status,
            } => CoreError::Api {
                message,
                code,
                status: Some(status),
            },
            portico_api::Error::VersionConflict { version, message } => {
                CoreError::VersionConflict { version, message }
            }
            portico_api::Error::InvalidVersion { raw } => CoreError::Api {
                message: format!("Data Plane returned an invalid configuration version: {raw:?}"),
                code: None,
                status: None,
            },
            portico_api::Error::Deserialization { message, body: _ } => {
                CoreError::Internal(format!("Deserialization error: {message}"))
            }
            err @ (portico_api::Error::MissingParent { .. }
            | portico_api::Error::UnexpectedParent { .. }) => {
                CoreError::Internal(err.to_string())
            }
        }
    }
}
