//! Compare two JSON documents the way test payloads are compared

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;

use gqltest::diff::{report_diff, DiffConfig, SystemDiff};

#[derive(Args)]
pub struct DiffArgs {
    /// Expected document
    pub expected: PathBuf,

    /// Actual document
    pub actual: PathBuf,

    /// Print both documents instead of running diff
    #[arg(long)]
    pub no_diff: bool,
}

/// Returns whether the documents are equal as JSON
pub fn execute(args: DiffArgs, diff: DiffConfig) -> Result<bool> {
    let want = canonical(&args.expected)?;
    let got = canonical(&args.actual)?;

    if got == want {
        println!("Documents are equal");
        return Ok(true);
    }

    let tool = SystemDiff::with_config(DiffConfig {
        enabled: diff.enabled && !args.no_diff,
        ..diff
    });
    let report = report_diff(&tool, &want, &got)?;
    println!("{}", report);
    Ok(false)
}

fn canonical(path: &Path) -> Result<Vec<u8>> {
    let data = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    gqltest::canonicalize(&data).with_context(|| format!("{}: invalid JSON", path.display()))
}
