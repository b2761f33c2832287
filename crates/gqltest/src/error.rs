//! Error types for GraphQL result verification

use std::fmt;

use thiserror::Error;

use crate::diff::DiffReport;
use crate::query_error::QueryError;

/// Which side of a comparison a value came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    /// The payload returned by the executor
    Got,
    /// The expectation declared by the test case
    Want,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Got => f.write_str("got"),
            Side::Want => f.write_str("want"),
        }
    }
}

/// Why a single test case failed.
///
/// Every variant is terminal for its case and never for the batch.
#[derive(Error, Debug)]
pub enum VerifyError {
    #[error("{side}: invalid JSON: {source}")]
    MalformedInput {
        side: Side,
        #[source]
        source: serde_json::Error,
    },

    #[error("unexpected error: got {got:?}, want {want:?}")]
    ErrorSetMismatch {
        got: Vec<QueryError>,
        want: Vec<QueryError>,
    },

    #[error("Did not get what we want:\n{0}")]
    DataMismatch(DiffReport),

    #[error("got: {0}\nwant: null")]
    UnexpectedPayload(String),

    #[error("Diff engine error: {0}")]
    DiffEngine(String),

    #[error("Unknown schema: {0}")]
    UnknownSchema(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised while loading test cases or writing results
#[derive(Error, Debug)]
pub enum GqlTestError {
    #[error("Test case parse error: {0}")]
    SpecParse(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Cannot read test suites: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("No test suites found in {}", .0.display())]
    NoSuites(std::path::PathBuf),
}

pub type GqlTestResult<T> = Result<T, GqlTestError>;
