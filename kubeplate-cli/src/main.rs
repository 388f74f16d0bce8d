//! kubeplate — render parameterized resource templates and apply them.
//!
//! # Usage
//!
//! ```text
//! kubeplate process <TEMPLATE> [-p NAME=VALUE]... [--param-file FILE] [--kind KIND]...
//!                              [--namespaces-only | --skip-namespaces] [-o yaml|json]
//! kubeplate apply <TEMPLATE> [rendering flags] [--context CTX] [-n NS] [--dry-run]
//! ```

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{apply::ApplyArgs, process::ProcessArgs};

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "kubeplate",
    version,
    about = "Render parameterized resource templates and apply them to a cluster",
    long_about = None,
)]
struct Cli {
    /// Log at debug level unless RUST_LOG says otherwise.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Render a template and print the resulting objects.
    Process(ProcessArgs),

    /// Render a template and create or update its objects in the cluster.
    Apply(ApplyArgs),
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.command {
        Commands::Process(args) => args.run(),
        Commands::Apply(args) => args.run().await,
    }
}

fn init_tracing(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
