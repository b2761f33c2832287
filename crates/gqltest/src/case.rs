//! Test cases and declarative YAML suites

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::path::Path;

use crate::error::{GqlTestError, GqlTestResult};
use crate::executor::Context;
use crate::query_error::QueryError;

/// A single GraphQL test case
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TestCase {
    /// Optional label used in reports
    #[serde(default)]
    pub name: Option<String>,

    /// Request context; the empty background context when unset
    #[serde(default)]
    pub context: Option<Context>,

    /// Schema to execute against; the default schema when unset
    #[serde(default)]
    pub schema: Option<String>,

    pub query: String,

    #[serde(default)]
    pub operation_name: String,

    #[serde(default)]
    pub variables: Map<String, Value>,

    /// Expected `data` as JSON text. Empty means the payload must be null.
    #[serde(default, deserialize_with = "expected_result_text")]
    pub expected_result: String,

    #[serde(default)]
    pub expected_errors: Vec<QueryError>,
}

impl TestCase {
    pub fn new(query: impl Into<String>, expected_result: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            expected_result: expected_result.into(),
            ..Default::default()
        }
    }

    pub fn with_operation(mut self, operation_name: impl Into<String>) -> Self {
        self.operation_name = operation_name.into();
        self
    }

    pub fn with_variables(mut self, variables: Map<String, Value>) -> Self {
        self.variables = variables;
        self
    }

    pub fn with_errors(mut self, errors: Vec<QueryError>) -> Self {
        self.expected_errors = errors;
        self
    }

    pub fn with_context(mut self, context: Context) -> Self {
        self.context = Some(context);
        self
    }

    pub fn with_schema(mut self, schema: impl Into<String>) -> Self {
        self.schema = Some(schema.into());
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// Accepts either JSON text or a structured value, which is re-encoded
fn expected_result_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => String::new(),
        Value::String(text) => text,
        other => other.to_string(),
    })
}

/// A file of test cases sharing a schema and tags
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestSuite {
    /// Unique name for this suite
    pub name: String,

    /// Human-readable description
    #[serde(default)]
    pub description: String,

    /// Tags for filtering suites
    #[serde(default)]
    pub tags: Vec<String>,

    /// Schema applied to cases that don't name one
    #[serde(default)]
    pub schema: Option<String>,

    pub cases: Vec<TestCase>,
}

impl TestSuite {
    /// Parse a suite from a YAML string
    pub fn from_yaml(yaml: &str) -> GqlTestResult<Self> {
        let mut suite: Self = serde_yaml::from_str(yaml)?;
        if suite.cases.is_empty() {
            return Err(GqlTestError::SpecParse(format!(
                "suite '{}' has no cases",
                suite.name
            )));
        }
        if let Some(schema) = &suite.schema {
            for case in suite.cases.iter_mut().filter(|c| c.schema.is_none()) {
                case.schema = Some(schema.clone());
            }
        }
        Ok(suite)
    }

    /// Parse a suite from a YAML file
    pub fn from_file(path: &Path) -> GqlTestResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
            .map_err(|e| GqlTestError::SpecParse(format!("{}: {}", path.display(), e)))
    }

    /// Load all suites below a directory, in path order
    pub fn load_all(dir: &Path) -> GqlTestResult<Vec<Self>> {
        let mut suites = Vec::new();

        for entry in walkdir::WalkDir::new(dir).sort_by_file_name() {
            let entry = entry?;
            let is_yaml = entry
                .path()
                .extension()
                .map(|ext| ext == "yaml" || ext == "yml")
                .unwrap_or(false);
            if is_yaml && entry.file_type().is_file() {
                suites.push(Self::from_file(entry.path())?);
            }
        }

        Ok(suites)
    }

    /// Filter suites by tag
    pub fn filter_by_tag<'a>(suites: &'a [Self], tag: &str) -> Vec<&'a Self> {
        suites.iter().filter(|s| s.tags.iter().any(|t| t == tag)).collect()
    }
}
