//! `portico version` -- print the Data Plane configuration version.

use portico_core::{CoreError, ExposureController};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

pub async fn handle(controller: &ExposureController, global: &GlobalOpts) -> Result<(), CliError> {
    let version = controller
        .client()
        .configuration_version()
        .await
        .map_err(CoreError::from)?;
    output::print_output(&version.to_string(), global.quiet);
    Ok(())
}
