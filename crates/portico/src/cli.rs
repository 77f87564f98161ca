//! Clap derive structures for the `portico` CLI.
//!
//! Defines the command tree, global flags, and shared types.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// portico -- reconcile load-balancer exposures on HAProxy
#[derive(Debug, Parser)]
#[command(
    name = "portico",
    version,
    about = "Reconcile load-balancer exposures against the HAProxy Data Plane API",
    long_about = "Drives the portico reconciliation engine by hand.\n\n\
        Each exposure file holds one exposure and the worker nodes backing it.\n\
        Every change runs inside a single Data Plane transaction.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Data Plane profile to use
    #[arg(long, short = 'p', env = "PORTICO_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Data Plane API endpoint (overrides profile)
    #[arg(long, short = 'e', env = "PORTICO_ENDPOINT", global = true)]
    pub endpoint: Option<String>,

    /// Basic-auth username (overrides profile)
    #[arg(long, short = 'u', env = "PORTICO_USERNAME", global = true)]
    pub username: Option<String>,

    /// Basic-auth password
    #[arg(long, env = "PORTICO_PASSWORD", global = true, hide_env_values = true)]
    pub password: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "PORTICO_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', env = "PORTICO_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds (overrides profile)
    #[arg(long, env = "PORTICO_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

// ── Commands ─────────────────────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Create or update an exposure and print its addresses
    #[command(alias = "apply")]
    Ensure(ExposureFileArgs),

    /// Delete every object an exposure owns
    #[command(alias = "rm")]
    Remove(ExposureFileArgs),

    /// Show what an exposure currently has on the Data Plane
    Status(ExposureFileArgs),

    /// List the objects an exposure would own, without contacting the Data Plane
    Plan(ExposureFileArgs),

    /// Print the load balancer name for an exposure UID
    Name(NameArgs),

    /// Print the Data Plane configuration version
    Version,
}

#[derive(Debug, Args)]
pub struct ExposureFileArgs {
    /// Exposure file (YAML or JSON) holding `exposure` and `nodes`
    pub file: PathBuf,
}

#[derive(Debug, Args)]
pub struct NameArgs {
    /// Exposure UID
    #[arg(long)]
    pub uid: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_tree_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_global_overrides_after_subcommand() {
        let cli = Cli::try_parse_from([
            "portico",
            "status",
            "web.yaml",
            "--endpoint",
            "http://lb:5555",
            "-o",
            "json",
            "-vv",
        ])
        .unwrap_or_else(|e| panic!("{e}"));
        assert_eq!(cli.global.endpoint.as_deref(), Some("http://lb:5555"));
        assert!(matches!(cli.global.output, OutputFormat::Json));
        assert_eq!(cli.global.verbose, 2);
        assert!(matches!(cli.command, Command::Status(ref a) if a.file == PathBuf::from("web.yaml")));
    }
}
