//! Configuration for the portico CLI and embedding controllers.
//!
//! TOML profiles, credential resolution (env + keyring + plaintext),
//! and translation to `portico_core::DataplaneConfig`. Callers layer
//! their own overrides (CLI flags) on top through [`Overrides`].

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use portico_core::{DataplaneConfig, TlsVerification};

/// Keyring service name; entries are keyed `{profile}/password`.
const KEYRING_SERVICE: &str = "portico";
const PASSWORD_ENV: &str = "PORTICO_PASSWORD";
const USERNAME_ENV: &str = "PORTICO_USERNAME";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("profile '{name}' not found in config")]
    UnknownProfile { name: String },

    #[error("no credentials configured for profile '{profile}'")]
    NoCredentials { profile: String },

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Default profile name.
    pub default_profile: Option<String>,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named Data Plane endpoints.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
        }
    }
}

impl Config {
    /// Look up `name`, or the default profile when `name` is `None`.
    pub fn profile(&self, name: Option<&str>) -> Result<(&str, &Profile), ConfigError> {
        let name = name
            .or(self.default_profile.as_deref())
            .unwrap_or("default");
        self.profiles
            .get_key_value(name)
            .map(|(k, v)| (k.as_str(), v))
            .ok_or_else(|| ConfigError::UnknownProfile { name: name.into() })
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default)]
    pub insecure: bool,

    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            insecure: false,
            timeout: default_timeout(),
        }
    }
}

fn default_timeout() -> u64 {
    30
}

/// A named Data Plane API endpoint.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Profile {
    /// Data Plane base URL (e.g., "http://lb.internal:5555").
    pub endpoint: String,

    /// Basic-auth username.
    pub username: Option<String>,

    /// Plaintext password. Keyring or env var take precedence.
    pub password: Option<String>,

    /// Environment variable name containing the password.
    pub password_env: Option<String>,

    /// Path to custom CA certificate.
    pub ca_cert: Option<PathBuf>,

    /// Override insecure TLS setting.
    pub insecure: Option<bool>,

    /// Override timeout (seconds).
    pub timeout: Option<u64>,
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("io", "portico", "portico").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("portico");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load from an explicit file. A missing file yields the defaults.
///
/// Environment variables override file values; nested keys use a double
/// underscore (`PORTICO_DEFAULTS__TIMEOUT=5`).
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("PORTICO_").split("__").ignore(&["password", "username"]));

    let config: Config = figment.extract()?;
    Ok(config)
}

// ── Credential resolution (without CLI flags) ───────────────────────

/// Resolve the Basic-auth username: profile, then `PORTICO_USERNAME`.
fn resolve_username(profile: &Profile, profile_name: &str) -> Result<String, ConfigError> {
    profile
        .username
        .clone()
        .or_else(|| std::env::var(USERNAME_ENV).ok())
        .ok_or_else(|| ConfigError::NoCredentials {
            profile: profile_name.into(),
        })
}

/// Resolve the password from the credential chain.
fn resolve_password(
    profile: &Profile,
    profile_name: &str,
) -> Result<SecretString, ConfigError> {
    resolve_password_from(
        profile,
        profile_name,
        |var| std::env::var(var).ok(),
        |account| {
            keyring::Entry::new(KEYRING_SERVICE, account)
                .and_then(|entry| entry.get_password())
                .ok()
        },
    )
}

/// The chain itself, with the environment and keyring lookups supplied.
fn resolve_password_from(
    profile: &Profile,
    profile_name: &str,
    env: impl Fn(&str) -> Option<String>,
    keyring: impl Fn(&str) -> Option<String>,
) -> Result<SecretString, ConfigError> {
    // 1. Profile's password_env → env var lookup
    if let Some(val) = profile.password_env.as_deref().and_then(&env) {
        return Ok(SecretString::from(val));
    }

    // 2. Global env var
    if let Some(val) = env(PASSWORD_ENV) {
        return Ok(SecretString::from(val));
    }

    // 3. System keyring
    if let Some(secret) = keyring(&format!("{profile_name}/password")) {
        return Ok(SecretString::from(secret));
    }

    // 4. Plaintext in config
    if let Some(ref pw) = profile.password {
        return Ok(SecretString::from(pw.clone()));
    }

    Err(ConfigError::NoCredentials {
        profile: profile_name.into(),
    })
}

// ── Profile → DataplaneConfig ───────────────────────────────────────

/// Values that win over the profile, typically CLI flags.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub endpoint: Option<String>,
    pub username: Option<String>,
    pub password: Option<SecretString>,
    pub insecure: bool,
    pub timeout: Option<u64>,
}

/// Build a `DataplaneConfig` from a profile with `overrides` applied.
///
/// Credentials fall back to the shared chain only when no override is
/// given, so an explicit password never touches the keyring.
pub fn profile_to_dataplane_config(
    profile: &Profile,
    profile_name: &str,
    defaults: &Defaults,
    overrides: &Overrides,
) -> Result<DataplaneConfig, ConfigError> {
    let endpoint = overrides.endpoint.as_deref().unwrap_or(&profile.endpoint);
    let url: url::Url = endpoint.parse().map_err(|_| ConfigError::Validation {
        field: "endpoint".into(),
        reason: format!("invalid URL: {endpoint}"),
    })?;

    let username = match overrides.username {
        Some(ref u) => u.clone(),
        None => resolve_username(profile, profile_name)?,
    };
    let password = match overrides.password {
        Some(ref p) => p.clone(),
        None => resolve_password(profile, profile_name)?,
    };

    let tls = if overrides.insecure || profile.insecure.unwrap_or(defaults.insecure) {
        TlsVerification::DangerAcceptInvalid
    } else if let Some(ref ca_path) = profile.ca_cert {
        TlsVerification::CustomCa(ca_path.clone())
    } else {
        TlsVerification::SystemDefaults
    };

    let timeout = overrides
        .timeout
        .or(profile.timeout)
        .unwrap_or(defaults.timeout);

    Ok(DataplaneConfig {
        url,
        username,
        password,
        tls,
        timeout: Duration::from_secs(timeout),
    })
}
