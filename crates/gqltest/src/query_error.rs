//! Structured query errors and order-insensitive comparison

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::VerifyError;

/// One segment of a result path
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PathSegment {
    Index(usize),
    Field(String),
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Index(i) => write!(f, "{}", i),
            PathSegment::Field(name) => f.write_str(name),
        }
    }
}

impl From<&str> for PathSegment {
    fn from(name: &str) -> Self {
        PathSegment::Field(name.to_string())
    }
}

impl From<usize> for PathSegment {
    fn from(index: usize) -> Self {
        PathSegment::Index(index)
    }
}

/// Position of an error in the query document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub line: u32,
    pub column: u32,
}

/// An entry of a GraphQL response's `errors` list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryError {
    pub message: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub locations: Vec<Location>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub path: Vec<PathSegment>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extensions: Option<Map<String, Value>>,
}

impl QueryError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            locations: Vec::new(),
            path: Vec::new(),
            extensions: None,
        }
    }

    pub fn with_path<I, S>(mut self, path: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<PathSegment>,
    {
        self.path = path.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_location(mut self, line: u32, column: u32) -> Self {
        self.locations.push(Location { line, column });
        self
    }

    pub fn with_extension(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extensions
            .get_or_insert_with(Map::new)
            .insert(key.into(), value);
        self
    }

    /// The path rendered as `[a 0 b]`, used as the sort key
    pub fn path_key(&self) -> String {
        let segments: Vec<String> = self.path.iter().map(ToString::to_string).collect();
        format!("[{}]", segments.join(" "))
    }
}

impl fmt::Display for QueryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}", self.message, self.path_key())
    }
}

/// Order errors by path; ties fall back to message, then the full record.
pub fn sort_errors(errors: &mut [QueryError]) {
    if errors.len() <= 1 {
        return;
    }
    errors.sort_by(|a, b| {
        a.path_key()
            .cmp(&b.path_key())
            .then_with(|| a.message.cmp(&b.message))
            .then_with(|| tie_break(a, b))
    });
}

fn tie_break(a: &QueryError, b: &QueryError) -> Ordering {
    let render = |e: &QueryError| serde_json::to_string(e).unwrap_or_default();
    render(a).cmp(&render(b))
}

/// Compare two error collections regardless of their order.
///
/// The inputs are left untouched; the sorted copies are returned inside the
/// mismatch error.
pub fn compare_errors(want: &[QueryError], got: &[QueryError]) -> Result<(), VerifyError> {
    let mut want = want.to_vec();
    let mut got = got.to_vec();
    sort_errors(&mut want);
    sort_errors(&mut got);

    if got != want {
        return Err(VerifyError::ErrorSetMismatch { got, want });
    }
    Ok(())
}
