//! Loading and running YAML suites

use std::path::{Path, PathBuf};

use gqltest::diff::DiffTool;
use gqltest::{
    Context, ExecutionResult, QueryError, Schemas, TestRunner, TestSuite, Verifier, VerifyError,
};
use serde_json::{json, Map, Value};

struct SideBySide;

impl DiffTool for SideBySide {
    fn is_available(&self) -> bool {
        false
    }

    fn unified_diff(&self, _: &[u8], _: &[u8]) -> Result<String, VerifyError> {
        unreachable!()
    }
}

fn fixtures() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/suites")
}

/// Echoes the query and operation name back as data
fn echo(_: &Context, query: &str, operation_name: &str, _: &Map<String, Value>) -> ExecutionResult {
    let mut data = json!({ "query": query });
    if !operation_name.is_empty() {
        data["operation"] = json!(operation_name);
    }
    ExecutionResult::data(data.to_string())
}

/// Fails every query at two paths, in reverse path order
fn failing(_: &Context, _: &str, _: &str, _: &Map<String, Value>) -> ExecutionResult {
    ExecutionResult::errors(vec![
        QueryError::new("x").with_path(["b"]),
        QueryError::new("y").with_path(["a"]),
    ])
}

fn runner() -> TestRunner {
    let mut schemas = Schemas::new(echo);
    schemas.register("failing", failing);
    TestRunner::new(Verifier::with_schemas(schemas).with_diff_tool(SideBySide), fixtures())
}

#[test]
fn load_all_walks_subdirectories() {
    let suites = TestSuite::load_all(&fixtures()).expect("load fixtures");
    let names: Vec<&str> = suites.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["hero", "errors"]);

    let errors = &suites[1];
    assert_eq!(errors.cases[0].schema.as_deref(), Some("failing"));
}

#[test]
fn filter_by_tag() {
    let suites = TestSuite::load_all(&fixtures()).expect("load fixtures");
    let smoke = TestSuite::filter_by_tag(&suites, "smoke");
    assert_eq!(smoke.len(), 1);
    assert_eq!(smoke[0].name, "hero");
    assert!(TestSuite::filter_by_tag(&suites, "none").is_empty());
}

#[test]
fn fixture_suites_pass() {
    let summary = runner().run_all().expect("run fixtures");
    assert_eq!(summary.total, 3, "{:#?}", summary);
    assert_eq!(summary.failed, 0, "{:#?}", summary);
    assert!(summary.success());
}

#[test]
fn run_tagged_and_by_name() {
    let tagged = runner().run_tagged("errors").expect("run tagged");
    assert_eq!(tagged.total, 1);
    assert_eq!(tagged.results[0].name, "errors");

    let named = runner().run_suite("hero").expect("run named");
    assert_eq!(named.results.len(), 1);
    assert_eq!(named.results[0].subtests.len(), 2);
    assert_eq!(named.results[0].subtests[1].name, "hero/2");

    assert!(runner().run_suite("missing").is_err());
}

#[test]
fn failures_are_recorded_with_messages() {
    let suite = TestSuite::from_yaml(
        r#"
name: broken
cases:
  - query: '{ a }'
    expected_result: '{"query": "{ b }"}'
  - query: '{ a }'
    expected_result: '{"query": "{ a }"}'
"#,
    )
    .expect("parse suite");

    let summary = runner().run_suites(&[suite]);
    assert_eq!(summary.total, 2);
    assert_eq!(summary.failed, 1);

    let failures = summary.results[0].failure_messages();
    assert_eq!(failures.len(), 1);
    assert!(failures[0].starts_with("broken/1: Did not get what we want"));
}

#[test]
fn results_are_written_as_json() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let summary = runner().run_all().expect("run fixtures");
    let path = summary.write_results(dir.path()).expect("write results");

    let written: Value =
        serde_json::from_str(&std::fs::read_to_string(path).expect("read results")).expect("parse");
    assert_eq!(written["total"], 3);
    assert_eq!(written["results"][0]["name"], "hero");
}

#[cfg(unix)]
#[test]
fn command_executor_round_trip() {
    use gqltest::{CommandExecutor, Executor};

    let executor = CommandExecutor::new(
        "sh",
        vec![
            "-c".to_string(),
            r#"cat > /dev/null; echo '{"data":{"ok":true},"errors":[{"message":"warn","path":["ok"]}]}'"#
                .to_string(),
        ],
    );
    let result = executor.execute(&Context::default(), "{ ok }", "", &Map::new());
    assert_eq!(result.data.as_deref(), Some(&br#"{"ok":true}"#[..]));
    assert_eq!(result.errors, vec![QueryError::new("warn").with_path(["ok"])]);

    let failing = CommandExecutor::new("sh", vec!["-c".to_string(), "echo nope >&2; exit 3".to_string()]);
    let result = failing.execute(&Context::default(), "{ ok }", "", &Map::new());
    assert!(result.data.is_none());
    assert!(result.errors[0].message.contains("nope"));
}
