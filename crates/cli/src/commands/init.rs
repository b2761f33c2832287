//! Write a default configuration file

use std::path::Path;

use anyhow::{bail, Result};

use crate::config::GqlTestConfig;
use crate::output::print_success;

pub fn execute(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        bail!("{} already exists (use --force to overwrite)", path.display());
    }
    GqlTestConfig::default().save(path)?;
    print_success(&format!("Wrote {}", path.display()));
    Ok(())
}
