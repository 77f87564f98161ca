//! Shared helpers for command handlers.

use std::path::Path;

use serde::Deserialize;
use tabled::Tabled;

use portico_core::{ExposedAddress, Exposure, WorkerNode};

use crate::error::CliError;

/// On-disk shape of an exposure file.
#[derive(Debug, Deserialize)]
pub struct ExposureFile {
    pub exposure: Exposure,
    #[serde(default)]
    pub nodes: Vec<WorkerNode>,
}

/// Read an exposure file. `.json` files parse as JSON, anything else as YAML.
pub fn load_exposure_file(path: &Path) -> Result<ExposureFile, CliError> {
    let display = path.display().to_string();
    let raw = std::fs::read_to_string(path).map_err(|source| CliError::ReadFile {
        path: display.clone(),
        source,
    })?;

    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    let parsed = if is_json {
        serde_json::from_str(&raw).map_err(|e| e.to_string())
    } else {
        serde_yaml::from_str(&raw).map_err(|e| e.to_string())
    };
    parsed.map_err(|reason| CliError::ExposureFile {
        path: display,
        reason,
    })
}

#[derive(Tabled)]
pub struct AddressRow {
    #[tabled(rename = "Address")]
    pub ip: String,
    #[tabled(rename = "Port")]
    pub port: u16,
    #[tabled(rename = "Protocol")]
    pub protocol: String,
}

pub fn address_row(a: &ExposedAddress) -> AddressRow {
    AddressRow {
        ip: a.ip.clone(),
        port: a.port,
        protocol: a.protocol.to_string(),
    }
}

pub fn address_id(a: &ExposedAddress) -> String {
    format!("{}:{}", a.ip, a.port)
}
