//! Print the canonical form of JSON documents

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

#[derive(Args)]
pub struct CanonArgs {
    /// JSON files to canonicalize
    #[arg(required = true)]
    pub files: Vec<PathBuf>,
}

pub fn execute(args: CanonArgs) -> Result<()> {
    for path in &args.files {
        let data = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
        let canonical = gqltest::canonicalize(&data)
            .with_context(|| format!("{}: invalid JSON", path.display()))?;
        println!("{}", String::from_utf8_lossy(&canonical));
    }
    Ok(())
}
