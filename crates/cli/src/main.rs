//! gqltest CLI - Main Entry Point
//!
//! Runs declarative GraphQL test suites against an engine and checks the
//! results, plus helpers to canonicalize and compare JSON documents.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;
mod config;
mod output;

use commands::{canon, diff, init, run};
use config::{GqlTestConfig, DEFAULT_CONFIG_FILE};

/// gqltest - GraphQL result verification
#[derive(Parser)]
#[command(name = "gqltest")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Configuration file
    #[arg(short, long, default_value = DEFAULT_CONFIG_FILE, global = true)]
    config: PathBuf,

    /// Output format
    #[arg(long, default_value = "table", global = true)]
    format: output::OutputFormat,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run test suites
    Run(run::RunArgs),

    /// Print the canonical form of JSON files
    Canon(canon::CanonArgs),

    /// Compare two JSON files
    Diff(diff::DiffArgs),

    /// Write a default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with_target(false)
        .init();

    match dispatch(cli) {
        Ok(true) => std::process::exit(0),
        Ok(false) => std::process::exit(1),
        Err(e) => {
            output::print_error(&format!("{:#}", e));
            std::process::exit(2);
        }
    }
}

/// Returns whether the command succeeded
fn dispatch(cli: Cli) -> anyhow::Result<bool> {
    match cli.command {
        Commands::Run(args) => {
            let config = GqlTestConfig::load(&cli.config)?;
            run::execute(args, config, cli.format)
        }
        Commands::Canon(args) => canon::execute(args).map(|_| true),
        Commands::Diff(args) => {
            let config = GqlTestConfig::load(&cli.config)?;
            diff::execute(args, (&config.diff).into())
        }
        Commands::Init { force } => init::execute(&cli.config, force).map(|_| true),
    }
}
