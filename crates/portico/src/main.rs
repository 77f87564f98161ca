mod cli;
mod commands;
mod config;
mod error;
mod output;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use portico_core::ExposureController;

use crate::cli::{Cli, Command};
use crate::error::CliError;

#[tokio::main]
async fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup tracing based on verbosity
    init_tracing(cli.global.verbose);

    // Dispatch and handle errors with proper exit codes
    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        // Offline commands don't need a Data Plane connection
        Command::Plan(ref args) => commands::plan::handle(args, &cli.global),
        Command::Name(ref args) => {
            commands::name::handle(args, &cli.global);
            Ok(())
        }

        // All other commands talk to the Data Plane API
        cmd => {
            let dataplane = config::build_dataplane_config(&cli.global)?;
            let controller = ExposureController::from_config(&dataplane)?;

            // Ctrl-C stops the pass at the next call boundary; the open
            // transaction is closed instead of committed.
            let cancel = controller.cancellation_token().clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    tracing::warn!("interrupt received, aborting");
                    cancel.cancel();
                }
            });

            tracing::debug!(command = ?cmd, endpoint = %dataplane.url, "dispatching command");
            commands::dispatch(cmd, &controller, &cli.global).await
        }
    }
}
