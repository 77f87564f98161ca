//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use portico_config::ConfigError;
use portico_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const PRECONDITION: i32 = 5;
    pub const CONFLICT: i32 = 6;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
    pub const CANCELLED: i32 = 130;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not connect to the Data Plane API at {url}: {reason}")]
    #[diagnostic(
        code(portico::connection_failed),
        help(
            "Check that the Data Plane API is running and reachable.\n\
             Try: portico version --endpoint <URL>"
        )
    )]
    ConnectionFailed { url: String, reason: String },

    #[error("Request timed out")]
    #[diagnostic(
        code(portico::timeout),
        help("Increase the timeout with --timeout or check Data Plane responsiveness.")
    )]
    Timeout,

    // ── Authentication ───────────────────────────────────────────────
    #[error("Authentication failed")]
    #[diagnostic(
        code(portico::auth_failed),
        help(
            "Verify the Data Plane username and password for profile '{profile}'.\n\
             Set PORTICO_PASSWORD or password_env in the profile."
        )
    )]
    AuthFailed { profile: String },

    #[error("No credentials configured for profile '{profile}'")]
    #[diagnostic(
        code(portico::no_credentials),
        help(
            "Pass --username and --password, set PORTICO_USERNAME / PORTICO_PASSWORD,\n\
             or add username and password_env to the profile."
        )
    )]
    NoCredentials { profile: String },

    // ── Reconciliation ───────────────────────────────────────────────
    #[error("{message}")]
    #[diagnostic(
        code(portico::precondition),
        help("Fix the exposure file; nothing was sent to the Data Plane.")
    )]
    Precondition { message: String },

    #[error("Configuration version {version} changed while opening the transaction")]
    #[diagnostic(
        code(portico::version_conflict),
        help("Another writer updated HAProxy concurrently. Re-run the command.")
    )]
    VersionConflict { version: i64 },

    #[error("Interrupted; the open transaction was discarded")]
    #[diagnostic(code(portico::cancelled))]
    Cancelled,

    // ── API ──────────────────────────────────────────────────────────
    #[error("Data Plane error{}: {message}", .status.map(|s| format!(" ({s})")).unwrap_or_default())]
    #[diagnostic(code(portico::api_error))]
    ApiError {
        status: Option<u16>,
        message: String,
    },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(portico::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(portico::profile_not_found),
        help("Available profiles: {available}")
    )]
    ProfileNotFound { name: String, available: String },

    #[error("No Data Plane endpoint configured")]
    #[diagnostic(
        code(portico::no_config),
        help(
            "Pass --endpoint, set PORTICO_ENDPOINT, or create a profile.\n\
             Expected config at: {path}"
        )
    )]
    NoConfig { path: String },

    #[error(transparent)]
    #[diagnostic(code(portico::config))]
    Config(ConfigError),

    // ── IO / Serialization ───────────────────────────────────────────
    #[error("Could not read {path}: {source}")]
    #[diagnostic(code(portico::io))]
    ReadFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid exposure file {path}: {reason}")]
    #[diagnostic(
        code(portico::exposure_file),
        help("Expected top-level `exposure` (uid, externalAddresses, ports) and `nodes`.")
    )]
    ExposureFile { path: String, reason: String },

    #[error("Failed to render output: {0}")]
    #[diagnostic(code(portico::render))]
    Render(String),

    #[error("Internal error: {0}")]
    #[diagnostic(code(portico::internal))]
    Internal(String),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::AuthFailed { .. } | Self::NoCredentials { .. } => exit_code::AUTH,
            Self::ProfileNotFound { .. } => exit_code::NOT_FOUND,
            Self::Precondition { .. } => exit_code::PRECONDITION,
            Self::VersionConflict { .. } => exit_code::CONFLICT,
            Self::Timeout => exit_code::TIMEOUT,
            Self::Cancelled => exit_code::CANCELLED,
            Self::Validation { .. } | Self::ExposureFile { .. } => exit_code::USAGE,
            Self::ApiError {
                status: Some(404), ..
            } => exit_code::NOT_FOUND,
            Self::ApiError {
                status: Some(409), ..
            } => exit_code::CONFLICT,
            _ => exit_code::GENERAL,
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::NoCredentials { profile } => CliError::NoCredentials { profile },
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            other => CliError::Config(other),
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        if err.is_precondition() {
            return CliError::Precondition {
                message: err.to_string(),
            };
        }
        match err {
            CoreError::ConnectionFailed { url, reason } => CliError::ConnectionFailed { url, reason },

            CoreError::AuthenticationFailed { message: _ } => CliError::AuthFailed {
                profile: "current".into(),
            },

            CoreError::Timeout => CliError::Timeout,

            CoreError::VersionConflict { version, .. } => CliError::VersionConflict { version },

            CoreError::Cancelled => CliError::Cancelled,

            CoreError::Api {
                message, status, ..
            } => CliError::ApiError { status, message },

            CoreError::Config { message } => CliError::Validation {
                field: "config".into(),
                reason: message,
            },

            other => CliError::Internal(other.to_string()),
        }
    }
}
