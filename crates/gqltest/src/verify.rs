//! Verification of a single test case

use tracing::{debug, warn};

use crate::canonical::canonicalize;
use crate::case::TestCase;
use crate::diff::{report_diff, DiffTool, SystemDiff};
use crate::error::{Side, VerifyError};
use crate::executor::{Context, Executor, Schemas};
use crate::query_error::compare_errors;

/// Executes test cases and checks their results
pub struct Verifier {
    schemas: Schemas,
    diff: Box<dyn DiffTool>,
}

impl Verifier {
    /// Verifier for a single default schema, diffing with the system tool
    pub fn new(executor: impl Executor + 'static) -> Self {
        Self::with_schemas(Schemas::new(executor))
    }

    pub fn with_schemas(schemas: Schemas) -> Self {
        Self {
            schemas,
            diff: Box::new(SystemDiff::new()),
        }
    }

    /// Replace the tool used to explain data mismatches
    pub fn with_diff_tool(mut self, diff: impl DiffTool + 'static) -> Self {
        self.diff = Box::new(diff);
        self
    }

    /// Run `case` and compare the outcome with its expectations
    pub fn verify(&self, case: &TestCase) -> Result<(), VerifyError> {
        let result = self.check(case);
        if let Err(e) = &result {
            warn!("{}: {}", case_label(case), e);
        }
        result
    }

    fn check(&self, case: &TestCase) -> Result<(), VerifyError> {
        let background = Context::default();
        let ctx = case.context.as_ref().unwrap_or(&background);

        let executor = self
            .schemas
            .get(case.schema.as_deref())
            .ok_or_else(|| VerifyError::UnknownSchema(case.schema.clone().unwrap_or_default()))?;

        debug!("Executing {}", case_label(case));
        let result = executor.execute(ctx, &case.query, &case.operation_name, &case.variables);

        compare_errors(&case.expected_errors, &result.errors)?;

        if case.expected_result.is_empty() {
            if !result.data_is_null() {
                let payload = result.data.as_deref().unwrap_or_default();
                return Err(VerifyError::UnexpectedPayload(
                    String::from_utf8_lossy(payload).into_owned(),
                ));
            }
            return Ok(());
        }

        // An absent payload is not valid JSON and fails as `got`.
        let got = canonicalize(result.data.as_deref().unwrap_or_default()).map_err(|source| {
            VerifyError::MalformedInput {
                side: Side::Got,
                source,
            }
        })?;
        let want = canonicalize(case.expected_result.as_bytes()).map_err(|source| {
            VerifyError::MalformedInput {
                side: Side::Want,
                source,
            }
        })?;

        if got == want {
            return Ok(());
        }

        let report = report_diff(self.diff.as_ref(), &want, &got)?;
        Err(VerifyError::DataMismatch(report))
    }
}

fn case_label(case: &TestCase) -> String {
    match &case.name {
        Some(name) => name.clone(),
        None => {
            let query = case.query.trim();
            let cut = query
                .char_indices()
                .nth(40)
                .map(|(i, _)| i)
                .unwrap_or(query.len());
            format!("query '{}'", &query[..cut])
        }
    }
}
