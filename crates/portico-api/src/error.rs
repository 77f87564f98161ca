use thiserror::Error;

use crate::objects::ObjectKind;

/// Top-level error type for the `portico-api` crate.
///
/// Covers every failure mode of a single Data Plane API call:
/// authentication, transport, API-level rejections, and payload decoding.
/// `portico-core` maps these into reconciliation diagnostics.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// Credentials rejected (HTTP 401) or not encodable as a header.
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, timeout, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS setup or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Data Plane API ──────────────────────────────────────────────
    /// Non-2xx response, parsed from the `{ code, message }` error body.
    #[error("Data Plane API error (HTTP {status}): {message}")]
    Api {
        message: String,
        code: Option<i64>,
        status: u16,
    },

    /// The configuration version moved between reading it and opening
    /// a transaction against it.
    #[error("Configuration version {version} is stale: {message}")]
    VersionConflict { version: i64, message: String },

    /// `configuration/version` returned something that isn't an integer.
    #[error("Invalid configuration version: {raw:?}")]
    InvalidVersion { raw: String },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },

    // ── Request construction ────────────────────────────────────────
    /// A nested object kind was addressed without its parent.
    #[error("{kind} objects live under a {parent}, but no parent was given")]
    MissingParent {
        kind: ObjectKind,
        parent: ObjectKind,
    },

    /// A top-level object kind was addressed with a parent.
    #[error("{kind} objects are top-level, got parent '{parent}'")]
    UnexpectedParent { kind: ObjectKind, parent: String },
}

impl Error {
    /// HTTP status code of the failed response, if there was one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            Self::Api { status, .. } => Some(*status),
            Self::VersionConflict { .. } => Some(409),
            Self::Authentication { .. } => Some(401),
            _ => None,
        }
    }

    /// Returns `true` if this is a transient error worth retrying on the
    /// next reconciliation cycle.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            Self::VersionConflict { .. } => true,
            Self::Api { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// Returns `true` if this is a "not found" error.
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}
