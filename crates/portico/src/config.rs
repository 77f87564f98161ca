//! CLI configuration: a thin wrapper around `portico_config` shared types.
//!
//! Turns `GlobalOpts` flags (--endpoint, --username, --password,
//! --insecure, --timeout) into `portico_config::Overrides` and lets the
//! shared resolver do the rest.

use secrecy::SecretString;

use portico_config::{
    ConfigError, Overrides, Profile, config_path, load_config, profile_to_dataplane_config,
};
use portico_core::DataplaneConfig;

use crate::cli::GlobalOpts;
use crate::error::CliError;

fn overrides(global: &GlobalOpts) -> Overrides {
    Overrides {
        endpoint: global.endpoint.clone(),
        username: global.username.clone(),
        password: global.password.clone().map(SecretString::from),
        insecure: global.insecure,
        timeout: global.timeout,
    }
}

/// Build a `DataplaneConfig` from the config file, profile, and CLI overrides.
///
/// A malformed config file is reported, never silently replaced by defaults.
pub fn build_dataplane_config(global: &GlobalOpts) -> Result<DataplaneConfig, CliError> {
    let cfg = load_config()?;
    let overrides = overrides(global);

    let profile_name = match cfg.profile(global.profile.as_deref()) {
        Ok((name, profile)) => {
            return Ok(profile_to_dataplane_config(
                profile,
                name,
                &cfg.defaults,
                &overrides,
            )?);
        }
        Err(ConfigError::UnknownProfile { name }) => name,
        Err(other) => return Err(other.into()),
    };

    // An explicitly requested profile must exist
    if global.profile.is_some() {
        let mut available: Vec<&str> = cfg.profiles.keys().map(String::as_str).collect();
        available.sort_unstable();
        return Err(CliError::ProfileNotFound {
            name: profile_name,
            available: if available.is_empty() {
                "(none)".into()
            } else {
                available.join(", ")
            },
        });
    }

    // No profile found -- build from CLI flags / env vars alone
    let endpoint = global.endpoint.clone().ok_or_else(|| CliError::NoConfig {
        path: config_path().display().to_string(),
    })?;
    if overrides.username.is_none() || overrides.password.is_none() {
        return Err(CliError::NoCredentials {
            profile: profile_name,
        });
    }

    let adhoc = Profile {
        endpoint,
        username: None,
        password: None,
        password_env: None,
        ca_cert: None,
        insecure: None,
        timeout: None,
    };
    Ok(profile_to_dataplane_config(
        &adhoc,
        &profile_name,
        &cfg.defaults,
        &overrides,
    )?)
}
