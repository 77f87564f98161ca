//! Command dispatch: bridges CLI args -> controller calls -> output formatting.

pub mod ensure;
pub mod name;
pub mod plan;
pub mod remove;
pub mod status;
pub mod util;
pub mod version;

use portico_core::ExposureController;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a Data Plane-bound command to the appropriate handler.
pub async fn dispatch(
    cmd: Command,
    controller: &ExposureController,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Ensure(args) => ensure::handle(controller, &args, global).await,
        Command::Remove(args) => remove::handle(controller, &args, global).await,
        Command::Status(args) => status::handle(controller, &args, global).await,
        Command::Version => version::handle(controller, global).await,
        // Plan and Name are offline and handled before dispatch
        Command::Plan(_) | Command::Name(_) => unreachable!(),
    }
}
