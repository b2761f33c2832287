//! Batch execution of test cases and YAML suites

use std::path::PathBuf;

use chrono::Utc;
use tracing::{debug, error, info, warn};

use crate::case::{TestCase, TestSuite};
use crate::error::{GqlTestError, GqlTestResult};
use crate::sink::{CaseResult, Recorder, Sink, TestSuiteResult};
use crate::verify::Verifier;

/// Run one test case, reporting its outcome to `sink`
pub fn run_one(sink: &mut dyn Sink, verifier: &Verifier, case: &TestCase) {
    if let Err(e) = verifier.verify(case) {
        sink.log(&e.to_string());
        sink.fail();
    }
}

/// Run every case; more than one case are run as sub-units named `1..n`
pub fn run_all(sink: &mut dyn Sink, verifier: &Verifier, cases: &[TestCase]) {
    if let [case] = cases {
        run_one(sink, verifier, case);
        return;
    }

    for (i, case) in cases.iter().enumerate() {
        sink.run(&(i + 1).to_string(), &mut |sub| run_one(sub, verifier, case));
    }
}

/// Run `cases` and panic with every failure if any of them failed.
///
/// Meant to be called from a `#[test]` function.
pub fn run_tests(verifier: &Verifier, cases: &[TestCase]) {
    let mut recorder = Recorder::new("gqltest");
    run_all(&mut recorder, verifier, cases);

    let result = recorder.finish();
    if !result.success {
        panic!("{}", result.failure_messages().join("\n"));
    }
}

/// Runs YAML suites from a directory
pub struct TestRunner {
    verifier: Verifier,
    specs_dir: PathBuf,
}

impl TestRunner {
    pub fn new(verifier: Verifier, specs_dir: impl Into<PathBuf>) -> Self {
        Self {
            verifier,
            specs_dir: specs_dir.into(),
        }
    }

    /// Run all suites in the specs directory
    pub fn run_all(&self) -> GqlTestResult<TestSuiteResult> {
        let suites = self.load()?;
        Ok(self.run_suites(&suites))
    }

    /// Run suites carrying `tag`
    pub fn run_tagged(&self, tag: &str) -> GqlTestResult<TestSuiteResult> {
        let suites = self.load()?;
        let filtered: Vec<TestSuite> = TestSuite::filter_by_tag(&suites, tag)
            .into_iter()
            .cloned()
            .collect();
        if filtered.is_empty() {
            warn!("No suite tagged '{}'", tag);
        }
        Ok(self.run_suites(&filtered))
    }

    /// Run a specific suite by name
    pub fn run_suite(&self, name: &str) -> GqlTestResult<TestSuiteResult> {
        let suites = self.load()?;
        let suite = suites
            .into_iter()
            .find(|s| s.name == name)
            .ok_or_else(|| GqlTestError::SpecParse(format!("Suite not found: {}", name)))?;
        Ok(self.run_suites(std::slice::from_ref(&suite)))
    }

    fn load(&self) -> GqlTestResult<Vec<TestSuite>> {
        let suites = TestSuite::load_all(&self.specs_dir)?;
        if suites.is_empty() {
            return Err(GqlTestError::NoSuites(self.specs_dir.clone()));
        }
        Ok(suites)
    }

    /// Run a list of suites, one result tree per suite
    pub fn run_suites(&self, suites: &[TestSuite]) -> TestSuiteResult {
        let started_at = Utc::now();
        info!("Running {} suite(s)...", suites.len());

        let results: Vec<CaseResult> = suites
            .iter()
            .map(|suite| {
                debug!("Running suite: {}", suite.name);
                let mut recorder = Recorder::new(suite.name.clone());
                run_all(&mut recorder, &self.verifier, &suite.cases);

                let result = recorder.finish();
                if result.success {
                    info!("✓ {} ({} ms)", result.name, result.duration_ms);
                } else {
                    error!("✗ {}", result.name);
                }
                result
            })
            .collect();

        let summary = TestSuiteResult::from_results(started_at, results);
        summary.log_summary();
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::DiffTool;
    use crate::error::VerifyError;
    use crate::executor::{Context, ExecutionResult};
    use serde_json::{Map, Value};

    struct NoDiff;

    impl DiffTool for NoDiff {
        fn is_available(&self) -> bool {
            false
        }

        fn unified_diff(&self, _: &[u8], _: &[u8]) -> Result<String, VerifyError> {
            unreachable!()
        }
    }

    fn echo_verifier() -> Verifier {
        // Every query is answered with `{"q": <query>}`.
        Verifier::new(|_: &Context, query: &str, _: &str, _: &Map<String, Value>| {
            ExecutionResult::data(serde_json::json!({ "q": query }).to_string())
        })
        .with_diff_tool(NoDiff)
    }

    #[test]
    fn test_single_case_runs_without_subunit() {
        let mut recorder = Recorder::new("t");
        run_all(&mut recorder, &echo_verifier(), &[TestCase::new("a", r#"{"q":"b"}"#)]);

        let result = recorder.finish();
        assert!(!result.success);
        assert!(result.subtests.is_empty());
        assert!(result.messages[0].starts_with("Did not get what we want"));
    }

    #[test]
    fn test_batch_names_subunits_and_continues_after_failure() {
        let cases = vec![
            TestCase::new("a", r#"{"q":"wrong"}"#),
            TestCase::new("b", r#"{"q":"b"}"#),
            TestCase::new("c", "{not json"),
        ];
        let mut recorder = Recorder::new("t");
        run_all(&mut recorder, &echo_verifier(), &cases);

        let result = recorder.finish();
        assert!(!result.success);
        let names: Vec<&str> = result.subtests.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["t/1", "t/2", "t/3"]);
        let outcomes: Vec<bool> = result.subtests.iter().map(|s| s.success).collect();
        assert_eq!(outcomes, vec![false, true, false]);
        assert!(result.subtests[2].messages[0].starts_with("want: invalid JSON"));
    }

    #[test]
    fn test_empty_batch_passes() {
        let mut recorder = Recorder::new("t");
        run_all(&mut recorder, &echo_verifier(), &[]);
        assert!(recorder.finish().success);
    }

    #[test]
    fn test_runner_rejects_missing_or_empty_specs_dir() {
        let dir = tempfile::tempdir().unwrap();

        let runner = TestRunner::new(echo_verifier(), dir.path().join("typo"));
        assert!(matches!(runner.run_all(), Err(GqlTestError::Walk(_))));

        let runner = TestRunner::new(echo_verifier(), dir.path());
        assert!(matches!(runner.run_all(), Err(GqlTestError::NoSuites(_))));
        assert!(matches!(runner.run_tagged("smoke"), Err(GqlTestError::NoSuites(_))));
    }

    #[test]
    fn test_run_tests_passes() {
        run_tests(
            &echo_verifier(),
            &[
                TestCase::new("a", r#"{"q":"a"}"#),
                TestCase::new("b", r#"{"q":"b"}"#),
            ],
        );
    }

    #[test]
    #[should_panic(expected = "gqltest/2")]
    fn test_run_tests_panics_on_failure() {
        run_tests(
            &echo_verifier(),
            &[
                TestCase::new("a", r#"{"q":"a"}"#),
                TestCase::new("b", r#"{"q":"a"}"#),
            ],
        );
    }
}
