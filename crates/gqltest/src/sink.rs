//! Pass/fail signalling
//!
//! A [`Sink`] is the surface of the enclosing test runner: it can mark the
//! current unit failed, log a message against it, and run a named sub-unit.
//! [`Recorder`] is the stock implementation; it collects everything into a
//! serializable [`CaseResult`] tree.

use std::path::{Path, PathBuf};
use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::GqlTestResult;

/// Test-runner primitives
pub trait Sink {
    /// Mark the current unit failed; execution continues
    fn fail(&mut self);

    /// Attach a message to the current unit
    fn log(&mut self, message: &str);

    /// Run `body` as a named sub-unit. A failing sub-unit fails its parent.
    fn run(&mut self, name: &str, body: &mut dyn FnMut(&mut dyn Sink));
}

/// Outcome of one unit and its sub-units
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseResult {
    pub name: String,
    pub success: bool,
    pub duration_ms: u64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub messages: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub subtests: Vec<CaseResult>,
}

impl CaseResult {
    /// Units without sub-units, depth first
    pub fn leaves(&self) -> Vec<&CaseResult> {
        if self.subtests.is_empty() {
            return vec![self];
        }
        self.subtests.iter().flat_map(|s| s.leaves()).collect()
    }

    /// Every message of every failed unit, prefixed by its name
    pub fn failure_messages(&self) -> Vec<String> {
        let mut out = Vec::new();
        self.collect_failures(&mut out);
        out
    }

    fn collect_failures(&self, out: &mut Vec<String>) {
        if !self.success {
            for message in &self.messages {
                out.push(format!("{}: {}", self.name, message));
            }
        }
        for sub in &self.subtests {
            sub.collect_failures(out);
        }
    }
}

/// A [`Sink`] that records results in memory
pub struct Recorder {
    name: String,
    failed: bool,
    messages: Vec<String>,
    subtests: Vec<CaseResult>,
    started: Instant,
}

impl Recorder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            failed: false,
            messages: Vec::new(),
            subtests: Vec::new(),
            started: Instant::now(),
        }
    }

    pub fn failed(&self) -> bool {
        self.failed
    }

    pub fn finish(self) -> CaseResult {
        CaseResult {
            name: self.name,
            success: !self.failed,
            duration_ms: self.started.elapsed().as_millis() as u64,
            messages: self.messages,
            subtests: self.subtests,
        }
    }
}

impl Sink for Recorder {
    fn fail(&mut self) {
        self.failed = true;
    }

    fn log(&mut self, message: &str) {
        self.messages.push(message.to_string());
    }

    fn run(&mut self, name: &str, body: &mut dyn FnMut(&mut dyn Sink)) {
        let mut child = Recorder::new(format!("{}/{}", self.name, name));
        body(&mut child);

        if child.failed {
            self.failed = true;
        }
        self.subtests.push(child.finish());
    }
}

/// Summary of a whole run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestSuiteResult {
    pub started_at: DateTime<Utc>,
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub duration_ms: u64,
    pub results: Vec<CaseResult>,
}

impl TestSuiteResult {
    /// Count leaf units across `results`
    pub fn from_results(started_at: DateTime<Utc>, results: Vec<CaseResult>) -> Self {
        let leaves: Vec<&CaseResult> = results.iter().flat_map(|r| r.leaves()).collect();
        let passed = leaves.iter().filter(|r| r.success).count();
        let total = leaves.len();
        let duration_ms = results.iter().map(|r| r.duration_ms).sum();

        Self {
            started_at,
            total,
            passed,
            failed: total - passed,
            duration_ms,
            results,
        }
    }

    pub fn success(&self) -> bool {
        self.failed == 0
    }

    /// Log every failure and the totals
    pub fn log_summary(&self) {
        for result in &self.results {
            for message in result.failure_messages() {
                warn!("{}", message);
            }
        }
        info!(
            "Test Results: {} passed, {} failed ({} ms)",
            self.passed, self.failed, self.duration_ms
        );
    }

    /// Write the results as `test-results.json` below `output_dir`
    pub fn write_results(&self, output_dir: &Path) -> GqlTestResult<PathBuf> {
        std::fs::create_dir_all(output_dir)?;

        let path = output_dir.join("test-results.json");
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(&path, json)?;

        info!("Results written to: {}", path.display());
        Ok(path)
    }
}
