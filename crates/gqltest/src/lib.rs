//! gqltest: result verification for GraphQL execution tests
//!
//! A test case declares a query, its variables, the expected `data` payload
//! and the expected `errors`. The crate executes the query through an
//! [`Executor`] and decides pass or fail:
//! - errors are compared as a set, ordered by their result path;
//! - data is compared as JSON, after both sides are brought into a
//!   canonical form;
//! - a data mismatch is explained with a unified diff when the system
//!   `diff` tool is available, or by printing both documents otherwise.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        Batch runner                         │
//! │    run_all(sink, verifier, cases) / run_tests(...)          │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Verifier::verify(case)                                     │
//! │    ├── Executor::execute(ctx, query, op, vars)              │
//! │    ├── compare_errors(want, got)                            │
//! │    ├── canonicalize(got) / canonicalize(want)               │
//! │    └── report_diff(tool, want, got) -> DiffReport           │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Sink: fail / log / run(name)      Recorder -> CaseResult   │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use gqltest::{run_tests, Context, ExecutionResult, TestCase, Verifier};
//! use serde_json::{Map, Value};
//!
//! let verifier = Verifier::new(|_: &Context, _: &str, _: &str, _: &Map<String, Value>| {
//!     ExecutionResult::data(r#"{"hero":{"name":"R2-D2"}}"#)
//! });
//! run_tests(&verifier, &[TestCase::new("{ hero { name } }", r#"{"hero": {"name": "R2-D2"}}"#)]);
//! ```

pub mod canonical;
pub mod case;
pub mod diff;
pub mod error;
pub mod executor;
pub mod query_error;
pub mod runner;
pub mod sink;
pub mod verify;

pub use canonical::canonicalize;
pub use case::{TestCase, TestSuite};
pub use diff::{DiffReport, DiffTool, SystemDiff};
pub use error::{GqlTestError, GqlTestResult, Side, VerifyError};
pub use executor::{CommandExecutor, Context, ExecutionResult, Executor, HttpExecutor, Schemas};
pub use query_error::{compare_errors, PathSegment, QueryError};
pub use runner::{run_all, run_one, run_tests, TestRunner};
pub use sink::{CaseResult, Recorder, Sink, TestSuiteResult};
pub use verify::Verifier;
