//! Human-readable diffs of canonical JSON
//!
//! The system `diff` utility is used when it can be found on `PATH`;
//! otherwise both documents are reported side by side.

use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Command;

use once_cell::sync::OnceCell;
use tracing::debug;

use crate::error::VerifyError;

/// Availability of the default `diff` program, probed once per process
static DIFF_ON_PATH: OnceCell<bool> = OnceCell::new();

const DEFAULT_PROGRAM: &str = "diff";

/// Something that can explain how two documents differ
pub trait DiffTool {
    /// Whether the tool can be used at all
    fn is_available(&self) -> bool;

    /// Produce a unified diff. Only called on inputs known to differ.
    fn unified_diff(&self, expected: &[u8], actual: &[u8]) -> Result<String, VerifyError>;
}

/// How a data mismatch is presented
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiffReport {
    /// Output of a diff tool
    Unified(String),
    /// Both documents, verbatim
    Paired { got: String, want: String },
}

impl fmt::Display for DiffReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiffReport::Unified(text) => f.write_str(text),
            DiffReport::Paired { got, want } => write!(f, "got:  {}\nwant: {}", got, want),
        }
    }
}

/// Describe the difference between two canonical buffers
pub fn report_diff(
    tool: &dyn DiffTool,
    expected: &[u8],
    actual: &[u8],
) -> Result<DiffReport, VerifyError> {
    if !tool.is_available() {
        return Ok(DiffReport::Paired {
            got: String::from_utf8_lossy(actual).into_owned(),
            want: String::from_utf8_lossy(expected).into_owned(),
        });
    }
    tool.unified_diff(expected, actual).map(DiffReport::Unified)
}

/// The host's `diff` program
#[derive(Debug, Clone)]
pub struct SystemDiff {
    program: String,
    enabled: bool,
    temp_dir: Option<PathBuf>,
}

impl SystemDiff {
    pub fn new() -> Self {
        Self::with_config(DiffConfig::default())
    }

    pub fn with_config(config: DiffConfig) -> Self {
        Self {
            program: config.program,
            enabled: config.enabled,
            temp_dir: config.temp_dir,
        }
    }
}

impl Default for SystemDiff {
    fn default() -> Self {
        Self::new()
    }
}

impl DiffTool for SystemDiff {
    fn is_available(&self) -> bool {
        if !self.enabled {
            return false;
        }
        if self.program == DEFAULT_PROGRAM {
            *DIFF_ON_PATH.get_or_init(|| {
                let found = find_on_path(DEFAULT_PROGRAM);
                debug!("diff available on this system: {}", found);
                found
            })
        } else {
            find_on_path(&self.program)
        }
    }

    fn unified_diff(&self, expected: &[u8], actual: &[u8]) -> Result<String, VerifyError> {
        // Removed when dropped, on every return path.
        let mut builder = tempfile::Builder::new();
        builder.prefix("gqltest-diff");
        let tmp_dir = match &self.temp_dir {
            Some(root) => builder.tempdir_in(root)?,
            None => builder.tempdir()?,
        };

        let expected_path = tmp_dir.path().join("expected.json");
        let received_path = tmp_dir.path().join("received.json");
        std::fs::write(&expected_path, expected)?;
        std::fs::write(&received_path, actual)?;

        let output = Command::new(&self.program)
            .arg("-u")
            .arg("-Lexpected.json")
            .arg("-Lactual.json")
            .arg(&expected_path)
            .arg(&received_path)
            .output()
            .map_err(|e| VerifyError::DiffEngine(format!("failed to run {}: {}", self.program, e)))?;

        match output.status.code() {
            Some(1) => Ok(String::from_utf8_lossy(&output.stdout).into_owned()),
            Some(0) => Err(VerifyError::DiffEngine(
                "diff reported no difference; it should only be called on mismatched output"
                    .to_string(),
            )),
            _ => Err(VerifyError::DiffEngine(format!(
                "{} exited with {}: {}",
                self.program,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            ))),
        }
    }
}

/// Configuration for the system diff tool
#[derive(Debug, Clone)]
pub struct DiffConfig {
    /// Program name or path
    pub program: String,

    /// When false, mismatches are always reported side by side
    pub enabled: bool,

    /// Parent of the per-call scratch directory
    pub temp_dir: Option<PathBuf>,
}

impl Default for DiffConfig {
    fn default() -> Self {
        Self {
            program: DEFAULT_PROGRAM.to_string(),
            enabled: true,
            temp_dir: None,
        }
    }
}

/// Look `program` up the way a shell would
fn find_on_path(program: &str) -> bool {
    let candidate = Path::new(program);
    if candidate.components().count() > 1 {
        return is_executable(candidate);
    }

    let Some(paths) = std::env::var_os("PATH") else {
        return false;
    };
    std::env::split_paths(&paths).any(|dir| {
        let full = dir.join(program);
        is_executable(&full) || (cfg!(windows) && is_executable(&full.with_extension("exe")))
    })
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;

    std::fs::metadata(path)
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}
