//! End-to-end verification scenarios
//!
//! Each test drives `Verifier` through a stub executor and asserts on the
//! outcome reported for the case.

use gqltest::diff::DiffTool;
use gqltest::{
    run_all, Context, DiffReport, ExecutionResult, QueryError, Recorder, Side, TestCase,
    Verifier, VerifyError,
};
use serde_json::{Map, Value};
use test_case::test_case;

/// Reports mismatches side by side regardless of the host
struct SideBySide;

impl DiffTool for SideBySide {
    fn is_available(&self) -> bool {
        false
    }

    fn unified_diff(&self, _: &[u8], _: &[u8]) -> Result<String, VerifyError> {
        unreachable!("side-by-side reporting never runs a diff")
    }
}

fn engine(result: ExecutionResult) -> Verifier {
    Verifier::new(move |_: &Context, _: &str, _: &str, _: &Map<String, Value>| result.clone())
        .with_diff_tool(SideBySide)
}

#[test]
fn matching_payload_without_errors_passes() {
    let verifier = engine(ExecutionResult::data(r#"{"a":1}"#));
    verifier
        .verify(&TestCase::new("{ a }", r#"{"a":1}"#))
        .expect("identical payloads must pass");
}

#[test]
fn differing_payload_shows_canonical_got_and_want() {
    let verifier = engine(ExecutionResult::data(r#"{"a":1}"#));
    let err = verifier
        .verify(&TestCase::new("{ a }", r#"{"a":2}"#))
        .expect_err("different payloads must fail");

    let VerifyError::DataMismatch(report) = &err else {
        panic!("expected a data mismatch, got {:?}", err);
    };
    assert_eq!(
        report,
        &DiffReport::Paired {
            got: "{\n  \"a\": 1\n}".to_string(),
            want: "{\n  \"a\": 2\n}".to_string(),
        }
    );
    assert!(err.to_string().contains("got:  {\n  \"a\": 1\n}"));
}

#[test_case(r#"{"a":1,"b":2}"#, r#"{"b":2,"a":1}"# ; "reordered keys")]
#[test_case(r#"{"a":[1,2]}"#, "{\n    \"a\": [ 1, 2 ]\n}" ; "reindented")]
#[test_case(r#"{"a":1.0}"#, r#"{"a":1}"# ; "numeric spelling")]
#[test_case(r#"{"a":{"c":null,"b":"x"}}"#, r#"{"a":{"b":"x","c":null}}"# ; "nested objects")]
fn textual_differences_are_ignored(got: &str, want: &str) {
    let verifier = engine(ExecutionResult::data(got.to_string()));
    verifier
        .verify(&TestCase::new("{ a }", want))
        .expect("equal JSON must pass");
}

#[test]
fn array_order_is_significant() {
    let verifier = engine(ExecutionResult::data(r#"{"a":[1,2]}"#));
    assert!(verifier.verify(&TestCase::new("{ a }", r#"{"a":[2,1]}"#)).is_err());
}

#[test]
fn errors_are_compared_after_sorting_by_path() {
    let verifier = engine(ExecutionResult::errors(vec![
        QueryError::new("x").with_path(["b"]),
        QueryError::new("y").with_path(["a"]),
    ]));
    let case = TestCase::new("{ a b }", "").with_errors(vec![
        QueryError::new("y").with_path(["a"]),
        QueryError::new("x").with_path(["b"]),
    ]);
    verifier.verify(&case).expect("same error set must pass");
}

#[test]
fn error_field_difference_reports_both_collections() {
    let verifier = engine(ExecutionResult::errors(vec![
        QueryError::new("x").with_path(["b"]),
        QueryError::new("y").with_path(["a"]),
    ]));
    let case = TestCase::new("{ a b }", "").with_errors(vec![
        QueryError::new("y").with_path(["a"]),
        QueryError::new("x").with_path(["c"]),
    ]);

    match verifier.verify(&case) {
        Err(VerifyError::ErrorSetMismatch { got, want }) => {
            assert_eq!(got.len(), 2);
            assert_eq!(want.len(), 2);
            assert_eq!(got[1].path_key(), "[b]");
            assert_eq!(want[1].path_key(), "[c]");
        }
        other => panic!("expected an error set mismatch, got {:?}", other),
    }
}

#[test]
fn empty_expectation_rejects_empty_object() {
    let verifier = engine(ExecutionResult::data("{}"));
    let err = verifier.verify(&TestCase::new("{ a }", "")).unwrap_err();
    assert!(matches!(err, VerifyError::UnexpectedPayload(_)));
}

#[test]
fn malformed_expectation_is_reported_as_want() {
    let verifier = engine(ExecutionResult::data(r#"{"a":1}"#));
    let err = verifier.verify(&TestCase::new("{ a }", "{not json")).unwrap_err();
    assert!(matches!(err, VerifyError::MalformedInput { side: Side::Want, .. }));
}

#[test]
fn malformed_payload_is_reported_as_got() {
    let verifier = engine(ExecutionResult::data("{not json"));
    let err = verifier.verify(&TestCase::new("{ a }", "{}")).unwrap_err();
    assert!(matches!(err, VerifyError::MalformedInput { side: Side::Got, .. }));
}

#[test]
fn batch_isolates_failures() {
    let verifier = engine(ExecutionResult::data(r#"{"a":1}"#));
    let cases = vec![
        TestCase::new("{ a }", r#"{"a":2}"#),
        TestCase::new("{ a }", ""),
        TestCase::new("{ a }", r#"{"a":1}"#),
    ];

    let mut recorder = Recorder::new("batch");
    run_all(&mut recorder, &verifier, &cases);
    let result = recorder.finish();

    let outcomes: Vec<(&str, bool)> = result
        .subtests
        .iter()
        .map(|s| (s.name.as_str(), s.success))
        .collect();
    assert_eq!(
        outcomes,
        vec![("batch/1", false), ("batch/2", false), ("batch/3", true)]
    );
    assert!(!result.success);
}

#[test]
fn system_diff_is_used_when_present() {
    let verifier = Verifier::new(|_: &Context, _: &str, _: &str, _: &Map<String, Value>| {
        ExecutionResult::data(r#"{"a":1}"#)
    });
    if !gqltest::SystemDiff::new().is_available() {
        eprintln!("Skipping: diff not available in PATH");
        return;
    }

    match verifier.verify(&TestCase::new("{ a }", r#"{"a":2}"#)) {
        Err(VerifyError::DataMismatch(DiffReport::Unified(diff))) => {
            assert!(diff.contains("--- expected.json"));
            assert!(diff.contains("+++ actual.json"));
        }
        other => panic!("expected a unified diff, got {:?}", other),
    }
}
