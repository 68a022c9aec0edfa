// src/analyzer/report.rs

use serde::Serialize;

use crate::check::{EvalError, Failure, Verdict};
use crate::diagnostics::{Diagnostic, Diagnostics, SourceLocation};

/// What happened to one field before its checks ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldStatus {
    /// The node exists and has the declared type.
    Present,
    /// The node is absent and checks ran against the declared default.
    Defaulted,
    /// The node is absent and optional; nothing was checked.
    Skipped,
    /// The node is absent and required.
    Missing,
    /// The node (or default) could not be built as the declared type.
    TypeMismatch,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CheckOutcome {
    Passed,
    Failed {
        message: String,
        check_location: SourceLocation,
        config_location: Option<SourceLocation>,
    },
    /// The check could not be evaluated. Distinct from a failed verdict.
    Error {
        message: String,
        #[serde(rename = "error_location")]
        location: Option<SourceLocation>,
        internal: bool,
    },
    /// Not run because the field was absent or mistyped.
    Skipped,
}

impl CheckOutcome {
    pub fn from_result(result: Result<Verdict, EvalError>) -> Self {
        match result {
            Ok(Verdict::Pass) => CheckOutcome::Passed,
            Ok(Verdict::Fail(Failure {
                message,
                check_location,
                config_location,
            })) => CheckOutcome::Failed {
                message,
                check_location,
                config_location,
            },
            Err(err) => CheckOutcome::Error {
                message: err.to_string(),
                location: err.location().cloned(),
                internal: err.is_internal(),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckResult {
    pub check: String,
    pub location: SourceLocation,
    #[serde(flatten)]
    pub outcome: CheckOutcome,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldReport {
    pub field: String,
    #[serde(rename = "type")]
    pub field_type: String,
    pub location: SourceLocation,
    pub notes: Option<String>,
    pub status: FieldStatus,
    /// Missing-field or type problem, when `status` is one.
    pub problem: Option<Diagnostic>,
    pub checks: Vec<CheckResult>,
}

impl FieldReport {
    pub fn is_ok(&self) -> bool {
        self.problem.is_none()
            && self
                .checks
                .iter()
                .all(|c| matches!(c.outcome, CheckOutcome::Passed | CheckOutcome::Skipped))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    /// Semantic errors in the specifications.
    pub spec_errors: usize,
    pub fields: usize,
    pub field_problems: usize,
    pub checks: usize,
    pub passed: usize,
    pub failed: usize,
    pub errors: usize,
    pub skipped: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    pub spec_file: String,
    pub config_file: String,
    /// Specification errors that did not prevent analysis.
    pub diagnostics: Diagnostics,
    pub fields: Vec<FieldReport>,
}

impl AnalysisReport {
    pub fn summary(&self) -> Summary {
        let mut summary = Summary {
            spec_errors: self.diagnostics.len(),
            fields: self.fields.len(),
            ..Summary::default()
        };
        for field in &self.fields {
            if field.problem.is_some() {
                summary.field_problems += 1;
            }
            for check in &field.checks {
                summary.checks += 1;
                match check.outcome {
                    CheckOutcome::Passed => summary.passed += 1,
                    CheckOutcome::Failed { .. } => summary.failed += 1,
                    CheckOutcome::Error { .. } => summary.errors += 1,
                    CheckOutcome::Skipped => summary.skipped += 1,
                }
            }
        }
        summary
    }

    pub fn is_success(&self) -> bool {
        self.diagnostics.is_empty() && self.fields.iter().all(FieldReport::is_ok)
    }

    pub fn field(&self, name: &str) -> Option<&FieldReport> {
        self.fields.iter().find(|f| f.field == name)
    }
}
