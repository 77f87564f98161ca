//! `portico status` -- read-only view of an exposure's live listeners.

use std::fmt::Write as _;

use portico_core::{ExposureController, ExposureStatus};

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
    let status = controller.get_exposure_status(&file.exposure).await?;
    let name = ExposureController::exposure_name(&file.exposure);

    let out = output::render_single(
        global.output,
        &status,
        |s| detail(&name, s),
        |s| {
            s.addresses
                .iter()
                .map(util::address_id)
                .collect::<Vec<_>>()
                .join("\n")
        },
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}

fn detail(name: &str, status: &ExposureStatus) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Name:    {name}");
    let _ = writeln!(
        out,
        "Exists:  {}",
        if status.exists { "yes" } else { "no" }
    );
    if status.addresses.is_empty() {
        out.push_str("Addresses: (none)");
    } else {
        let rows: Vec<_> = status.addresses.iter().map(util::address_row).collect();
        out.push_str(&output::render_table(&rows));
    }
    out
}
