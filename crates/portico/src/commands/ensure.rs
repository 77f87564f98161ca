//! `portico ensure` -- reconcile an exposure and print its addresses.

use portico_core::ExposureController;

use crate::cli::{ExposureFileArgs, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::util;

pub async fn handle(
    controller: &ExposureController,
    args: &ExposureFileArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let file = util::load_exposure_file(&args.file)?;
    let addresses = controller
        .ensure_exposure(&file.exposure, &file.nodes)
        .await?;

    let out = output::render_list(
        global.output,
        &addresses,
        util::address_row,
        util::address_id,
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}
