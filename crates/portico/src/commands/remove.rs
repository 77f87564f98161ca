//! `portico remove` -- delete everything an exposure owns.

use portico_core::ExposureController;

use crate::cli::{ExposureFileArgs, GlobalOpts};
use crate::error::CliError;

use super::util;

pub async fn handle(
    controller: &ExposureController,
    args: &ExposureFileArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let file = util::load_exposure_file(&args.file)?;
    controller.ensure_exposure_removed(&file.exposure).await?;
    if !global.quiet {
        eprintln!(
            "Exposure {} removed",
            ExposureController::exposure_name(&file.exposure)
        );
    }
    Ok(())
}
