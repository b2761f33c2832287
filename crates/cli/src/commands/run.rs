//! Run YAML test suites against a GraphQL engine

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Args;
use tracing::info;

use gqltest::diff::{DiffConfig, SystemDiff};
use gqltest::{CommandExecutor, HttpExecutor, TestRunner, TestSuiteResult, Verifier};

use crate::config::GqlTestConfig;
use crate::output::{print_summary, OutputFormat};

#[derive(Args)]
pub struct RunArgs {
    /// Path to test suites directory
    #[arg(short, long)]
    pub specs: Option<PathBuf>,

    /// Run only suites matching this tag
    #[arg(short, long, conflicts_with = "name")]
    pub tag: Option<String>,

    /// Run only a specific suite by name
    #[arg(short, long)]
    pub name: Option<String>,

    /// GraphQL HTTP endpoint
    #[arg(long, conflicts_with = "command")]
    pub endpoint: Option<String>,

    /// Extra request header, as NAME=VALUE
    #[arg(long = "header", value_parser = parse_header)]
    pub headers: Vec<(String, String)>,

    /// Engine program reading requests on stdin
    #[arg(long)]
    pub command: Option<PathBuf>,

    /// Arguments for the engine program
    #[arg(last = true)]
    pub command_args: Vec<String>,

    /// Never run the diff program; print both documents instead
    #[arg(long)]
    pub no_diff: bool,

    /// Diff program to use
    #[arg(long)]
    pub diff_program: Option<String>,

    /// Output directory for results
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

fn parse_header(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
        .filter(|(k, _)| !k.is_empty())
        .ok_or_else(|| format!("invalid header '{}', expected NAME=VALUE", raw))
}

/// Returns whether every case passed
pub fn execute(args: RunArgs, mut config: GqlTestConfig, format: OutputFormat) -> Result<bool> {
    apply_overrides(&args, &mut config);

    let verifier = build_verifier(&config)?;
    let runner = TestRunner::new(verifier, &config.specs_dir);
    info!("Loading suites from {}", config.specs_dir.display());

    let summary: TestSuiteResult = match (&args.name, &args.tag) {
        (Some(name), _) => runner.run_suite(name)?,
        (None, Some(tag)) => runner.run_tagged(tag)?,
        (None, None) => runner.run_all()?,
    };

    print_summary(&summary, format);
    summary.write_results(&config.output_dir)?;

    Ok(summary.success())
}

fn apply_overrides(args: &RunArgs, config: &mut GqlTestConfig) {
    if let Some(specs) = &args.specs {
        config.specs_dir = specs.clone();
    }
    if let Some(output) = &args.output {
        config.output_dir = output.clone();
    }
    if let Some(endpoint) = &args.endpoint {
        config.http.endpoint = Some(endpoint.clone());
        config.command.program = None;
    }
    for (name, value) in &args.headers {
        config.http.headers.insert(name.clone(), value.clone());
    }
    if let Some(command) = &args.command {
        config.command.program = Some(command.clone());
        config.command.args = args.command_args.clone();
        config.http.endpoint = None;
    }
    if args.no_diff {
        config.diff.enabled = false;
    }
    if let Some(program) = &args.diff_program {
        config.diff.program = program.clone();
    }
}

fn build_verifier(config: &GqlTestConfig) -> Result<Verifier> {
    let verifier = match (&config.command.program, config.http.to_http_config()) {
        (Some(program), _) => {
            info!("Executing queries with {}", program.display());
            Verifier::new(CommandExecutor::new(program, config.command.args.clone()))
        }
        (None, Some(http)) => {
            info!("Executing queries against {}", http.endpoint);
            let executor = HttpExecutor::new(http)?;
            Verifier::new(executor)
        }
        (None, None) => bail!("no engine configured: pass --endpoint or --command"),
    };

    Ok(verifier.with_diff_tool(SystemDiff::with_config(DiffConfig::from(&config.diff))))
}
