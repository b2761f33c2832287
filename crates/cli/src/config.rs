//! gqltest configuration

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use gqltest::diff::DiffConfig;
use gqltest::executor::HttpConfig;

/// Default config file, looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "gqltest.toml";

/// Runner configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GqlTestConfig {
    /// Directory searched for YAML suites
    pub specs_dir: PathBuf,

    /// Directory receiving `test-results.json`
    pub output_dir: PathBuf,

    /// Diff tool configuration
    pub diff: DiffSection,

    /// HTTP engine configuration
    pub http: HttpSection,

    /// Subprocess engine configuration
    pub command: CommandSection,
}

impl Default for GqlTestConfig {
    fn default() -> Self {
        Self {
            specs_dir: PathBuf::from("tests/graphql"),
            output_dir: PathBuf::from("test-results"),
            diff: DiffSection::default(),
            http: HttpSection::default(),
            command: CommandSection::default(),
        }
    }
}

/// `[diff]` section
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DiffSection {
    /// Use the diff program when it is installed
    pub enabled: bool,

    /// Program name or path
    pub program: String,

    /// Where scratch files for the diff program go; the system temp dir if unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temp_dir: Option<PathBuf>,
}

impl Default for DiffSection {
    fn default() -> Self {
        let defaults = DiffConfig::default();
        Self {
            enabled: defaults.enabled,
            program: defaults.program,
            temp_dir: defaults.temp_dir,
        }
    }
}

impl From<&DiffSection> for DiffConfig {
    fn from(section: &DiffSection) -> Self {
        DiffConfig {
            program: section.program.clone(),
            enabled: section.enabled,
            temp_dir: section.temp_dir.clone(),
        }
    }
}

/// `[http]` section
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpSection {
    /// GraphQL endpoint URL
    pub endpoint: Option<String>,

    /// Request timeout in seconds
    pub timeout_secs: Option<u64>,

    /// Headers sent with every request
    pub headers: BTreeMap<String, String>,
}

impl HttpSection {
    /// HTTP executor settings, if an endpoint is configured
    pub fn to_http_config(&self) -> Option<HttpConfig> {
        let endpoint = self.endpoint.clone()?;
        let defaults = HttpConfig::default();
        Some(HttpConfig {
            endpoint,
            headers: self.headers.clone(),
            timeout: self
                .timeout_secs
                .map(Duration::from_secs)
                .unwrap_or(defaults.timeout),
        })
    }
}

/// `[command]` section
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CommandSection {
    /// Engine program
    pub program: Option<PathBuf>,

    /// Engine arguments; the request is written to stdin
    pub args: Vec<String>,
}

impl GqlTestConfig {
    /// Load configuration from file, falling back to defaults when missing
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Self = toml::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to file
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let content = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        Ok(())
    }
}
