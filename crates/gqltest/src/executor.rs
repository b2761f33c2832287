//! Query executors
//!
//! An [`Executor`] runs one query and returns its data payload and errors.
//! Failures to reach the engine are reported as a single [`QueryError`]
//! rather than a Rust error, so a broken transport surfaces as an error-set
//! mismatch in the test that hit it.

use std::collections::{BTreeMap, HashMap};
use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::GqlTestResult;
use crate::query_error::QueryError;

/// Name under which [`Schemas::new`] registers its executor
pub const DEFAULT_SCHEMA: &str = "default";

/// Request-scoped values handed to the executor
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Context {
    /// Extra request headers (HTTP executors only)
    #[serde(default)]
    pub headers: BTreeMap<String, String>,

    /// Free-form values forwarded as the request's `extensions`
    #[serde(default)]
    pub extensions: Map<String, Value>,
}

/// Output of one query execution
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExecutionResult {
    /// Raw JSON of the `data` member; `None` when absent
    pub data: Option<Vec<u8>>,
    pub errors: Vec<QueryError>,
}

impl ExecutionResult {
    pub fn data(json: impl Into<Vec<u8>>) -> Self {
        Self {
            data: Some(json.into()),
            errors: Vec::new(),
        }
    }

    pub fn errors(errors: Vec<QueryError>) -> Self {
        Self { data: None, errors }
    }

    pub fn with_errors(mut self, errors: Vec<QueryError>) -> Self {
        self.errors = errors;
        self
    }

    /// Whether the payload is missing or the JSON literal `null`
    pub fn data_is_null(&self) -> bool {
        match &self.data {
            None => true,
            Some(bytes) => {
                let trimmed = String::from_utf8_lossy(bytes);
                let trimmed = trimmed.trim();
                trimmed.is_empty() || trimmed == "null"
            }
        }
    }

    fn transport_failure(message: String) -> Self {
        Self::errors(vec![QueryError::new(message)])
    }
}

/// Runs GraphQL queries
pub trait Executor {
    fn execute(
        &self,
        ctx: &Context,
        query: &str,
        operation_name: &str,
        variables: &Map<String, Value>,
    ) -> ExecutionResult;
}

impl<F> Executor for F
where
    F: Fn(&Context, &str, &str, &Map<String, Value>) -> ExecutionResult,
{
    fn execute(
        &self,
        ctx: &Context,
        query: &str,
        operation_name: &str,
        variables: &Map<String, Value>,
    ) -> ExecutionResult {
        self(ctx, query, operation_name, variables)
    }
}

/// Executors addressable by schema name
pub struct Schemas {
    executors: HashMap<String, Box<dyn Executor>>,
}

impl Schemas {
    /// Registry whose default schema is served by `executor`
    pub fn new(executor: impl Executor + 'static) -> Self {
        let mut schemas = Self {
            executors: HashMap::new(),
        };
        schemas.register(DEFAULT_SCHEMA, executor);
        schemas
    }

    pub fn register(&mut self, name: impl Into<String>, executor: impl Executor + 'static) {
        self.executors.insert(name.into(), Box::new(executor));
    }

    /// Look up a schema; `None` selects the default
    pub fn get(&self, name: Option<&str>) -> Option<&dyn Executor> {
        self.executors
            .get(name.unwrap_or(DEFAULT_SCHEMA))
            .map(|e| e.as_ref())
    }
}

/// Body of a GraphQL-over-HTTP request
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GraphQlRequest<'a> {
    query: &'a str,
    #[serde(skip_serializing_if = "str::is_empty")]
    operation_name: &'a str,
    variables: &'a Map<String, Value>,
    #[serde(skip_serializing_if = "Map::is_empty")]
    extensions: &'a Map<String, Value>,
}

impl<'a> GraphQlRequest<'a> {
    fn new(ctx: &'a Context, query: &'a str, operation_name: &'a str, variables: &'a Map<String, Value>) -> Self {
        Self {
            query,
            operation_name,
            variables,
            extensions: &ctx.extensions,
        }
    }
}

/// Body of a GraphQL response
#[derive(Debug, Deserialize)]
struct GraphQlResponse {
    #[serde(default)]
    data: Option<Value>,
    #[serde(default)]
    errors: Vec<QueryError>,
}

impl GraphQlResponse {
    fn parse(body: &[u8]) -> ExecutionResult {
        match serde_json::from_slice::<GraphQlResponse>(body) {
            Ok(response) => ExecutionResult {
                data: response
                    .data
                    .filter(|v| !v.is_null())
                    .map(|v| v.to_string().into_bytes()),
                errors: response.errors,
            },
            Err(e) => ExecutionResult::transport_failure(format!("invalid response: {}", e)),
        }
    }
}

/// Executes queries against a GraphQL HTTP endpoint
pub struct HttpExecutor {
    endpoint: String,
    headers: BTreeMap<String, String>,
    client: reqwest::Client,
    runtime: tokio::runtime::Runtime,
}

impl HttpExecutor {
    pub fn new(config: HttpConfig) -> GqlTestResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;

        Ok(Self {
            endpoint: config.endpoint,
            headers: config.headers,
            client,
            runtime,
        })
    }

    async fn post(&self, ctx: &Context, body: &GraphQlRequest<'_>) -> Result<Vec<u8>, reqwest::Error> {
        let mut request = self.client.post(&self.endpoint).json(body);
        for (name, value) in self.headers.iter().chain(ctx.headers.iter()) {
            request = request.header(name.as_str(), value.as_str());
        }
        let response = request.send().await?;
        debug!("{} responded {}", self.endpoint, response.status());
        Ok(response.bytes().await?.to_vec())
    }
}

impl Executor for HttpExecutor {
    fn execute(
        &self,
        ctx: &Context,
        query: &str,
        operation_name: &str,
        variables: &Map<String, Value>,
    ) -> ExecutionResult {
        let body = GraphQlRequest::new(ctx, query, operation_name, variables);
        match self.runtime.block_on(self.post(ctx, &body)) {
            Ok(bytes) => GraphQlResponse::parse(&bytes),
            Err(e) => ExecutionResult::transport_failure(format!("request to {} failed: {}", self.endpoint, e)),
        }
    }
}

/// Configuration for [`HttpExecutor`]
#[derive(Debug, Clone)]
pub struct HttpConfig {
    pub endpoint: String,
    pub headers: BTreeMap<String, String>,
    pub timeout: Duration,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://127.0.0.1:8080/graphql".to_string(),
            headers: BTreeMap::new(),
            timeout: Duration::from_secs(30),
        }
    }
}

/// Executes queries by piping a JSON request through a subprocess.
///
/// The request is written to stdin as `{"query", "operationName",
/// "variables", "extensions"}` and the process must print a GraphQL response
/// object on stdout.
#[derive(Debug, Clone)]
pub struct CommandExecutor {
    program: PathBuf,
    args: Vec<String>,
}

impl CommandExecutor {
    pub fn new(program: impl Into<PathBuf>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    fn run(&self, request: &[u8]) -> std::io::Result<std::process::Output> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(request)?;
        }
        child.wait_with_output()
    }
}

impl Executor for CommandExecutor {
    fn execute(
        &self,
        ctx: &Context,
        query: &str,
        operation_name: &str,
        variables: &Map<String, Value>,
    ) -> ExecutionResult {
        let body = GraphQlRequest::new(ctx, query, operation_name, variables);
        let request = match serde_json::to_vec(&body) {
            Ok(request) => request,
            Err(e) => return ExecutionResult::transport_failure(format!("invalid request: {}", e)),
        };

        match self.run(&request) {
            Ok(output) if output.status.success() => GraphQlResponse::parse(&output.stdout),
            Ok(output) => ExecutionResult::transport_failure(format!(
                "{} exited with {}: {}",
                self.program.display(),
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )),
            Err(e) => ExecutionResult::transport_failure(format!(
                "failed to run {}: {}",
                self.program.display(),
                e
            )),
        }
    }
}
