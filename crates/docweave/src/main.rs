//! docweave CLI - multi-source documentation site resolver.
//!
//! Provides commands for:
//! - `build`: Resolve the site and write the route manifest
//! - `check`: Resolve the site and report problems without writing output
//! - `routes`: Print the composed route table

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{BuildArgs, CheckArgs, RoutesArgs};
use output::Output;

/// docweave - compose versioned documentation sources into one site.
#[derive(Parser)]
#[command(name = "docweave", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve the site and write the route manifest.
    Build(BuildArgs),
    /// Resolve the site and check links without writing output.
    Check(CheckArgs),
    /// Print the composed route table.
    Routes(RoutesArgs),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    let verbose = match &cli.command {
        Commands::Build(args) => args.common.verbose,
        Commands::Check(args) => args.common.verbose,
        Commands::Routes(args) => args.common.verbose,
    };

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Build(args) => args.execute(),
        Commands::Check(args) => args.execute(),
        Commands::Routes(args) => args.execute(),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}
