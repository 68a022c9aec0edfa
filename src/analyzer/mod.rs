// src/analyzer/mod.rs

//! Whole-specification analysis.
//!
//! Every field is handled independently: locate its node in the target
//! configuration, build its typed value (or fall back to the declared
//! default), then evaluate its checks. With `parallel` set, fields are
//! spread over the rayon pool; results keep declaration order either way.

pub mod report;

use std::collections::BTreeMap;

use rayon::prelude::*;
use tracing::{debug, info};

use crate::check::{ConfigView, EvalContext, evaluate_check};
use crate::diagnostics::{Diagnostic, SourceLocation, Span};
use crate::project::Project;
use crate::spec::FieldSpec;
use crate::tree::Node;
use crate::types::{TypeError, TypedValue, infer, make_default, make_type};

pub use report::{AnalysisReport, CheckOutcome, CheckResult, FieldReport, FieldStatus, Summary};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalyzerOptions {
    pub parallel: bool,
}

impl Default for AnalyzerOptions {
    fn default() -> Self {
        Self { parallel: true }
    }
}

/// Outcome of locating and typing one field.
enum Resolved {
    Value {
        status: FieldStatus,
        value: TypedValue,
        origin: SourceLocation,
    },
    NotRun {
        status: FieldStatus,
        problem: Option<Diagnostic>,
    },
}

struct FieldAnalyzer<'a> {
    spec_file: &'a str,
    main: ConfigView<'a>,
    imports: &'a BTreeMap<String, ConfigView<'a>>,
}

pub fn analyze(project: &Project, options: AnalyzerOptions) -> AnalysisReport {
    let spec = project.spec();
    let imports = project.import_views();
    let analyzer = FieldAnalyzer {
        spec_file: &spec.source,
        main: project.main.view(),
        imports: &imports,
    };

    debug!(
        fields = spec.fields.len(),
        parallel = options.parallel,
        "analyzing specification"
    );

    let fields: Vec<FieldReport> = if options.parallel {
        spec.fields.par_iter().map(|f| analyzer.field(f)).collect()
    } else {
        spec.fields.iter().map(|f| analyzer.field(f)).collect()
    };

    let report = AnalysisReport {
        spec_file: spec.source.clone(),
        config_file: project.main.file.clone(),
        diagnostics: project.diagnostics(),
        fields,
    };
    let summary = report.summary();
    info!(
        spec_errors = summary.spec_errors,
        checks = summary.checks,
        passed = summary.passed,
        failed = summary.failed,
        errors = summary.errors,
        "analysis finished"
    );
    report
}

impl FieldAnalyzer<'_> {
    fn spec_location(&self, span: Span) -> SourceLocation {
        SourceLocation::new(self.spec_file, span)
    }

    fn field(&self, field: &FieldSpec) -> FieldReport {
        let resolved = self.resolve(field);

        let (status, problem, checks) = match resolved {
            Resolved::Value {
                status,
                value,
                origin,
            } => {
                let checks = field
                    .checks
                    .iter()
                    .map(|check| {
                        let ctx = EvalContext {
                            spec_file: self.spec_file,
                            field: &field.field,
                            self_value: &value,
                            self_origin: &origin,
                            main: self.main,
                            imports: self.imports,
                        };
                        CheckResult {
                            check: check.check.clone(),
                            location: self.spec_location(check.location),
                            outcome: CheckOutcome::from_result(evaluate_check(check, ctx)),
                        }
                    })
                    .collect();
                (status, None, checks)
            }
            Resolved::NotRun { status, problem } => {
                debug!(field = %field.field, ?status, "checks not run");
                let checks = field
                    .checks
                    .iter()
                    .map(|check| CheckResult {
                        check: check.check.clone(),
                        location: self.spec_location(check.location),
                        outcome: CheckOutcome::Skipped,
                    })
                    .collect();
                (status, problem, checks)
            }
        };

        FieldReport {
            field: field.field.clone(),
            field_type: field.field_type.clone(),
            location: self.spec_location(field.field_location),
            notes: field.notes.clone(),
            status,
            problem,
            checks,
        }
    }

    fn resolve(&self, field: &FieldSpec) -> Resolved {
        if let Some(node) = self.main.tree.lookup(&field.field) {
            let origin = SourceLocation::value_of(self.main.file, node);
            return typed(field, self.node_value(field, node), origin, FieldStatus::Present);
        }

        match &field.default {
            Some(default) => {
                let origin = self.spec_location(field.default_location);
                let value = make_default(field.declared_type(), default);
                typed(field, value, origin, FieldStatus::Defaulted)
            }
            None if field.optional => Resolved::NotRun {
                status: FieldStatus::Skipped,
                problem: None,
            },
            None => Resolved::NotRun {
                status: FieldStatus::Missing,
                problem: Some(Diagnostic::semantic(
                    format!("missing required field {}", field.field),
                    SourceLocation::top_of_file(self.main.file),
                )),
            },
        }
    }

    /// A field without a declared type (already reported by the compiler)
    /// is typed by its node alone.
    fn node_value(&self, field: &FieldSpec, node: &Node) -> Result<TypedValue, TypeError> {
        if field.field_type.is_empty() {
            Ok(infer(node))
        } else {
            make_type(self.main.registry, &field.field_type, node)
        }
    }
}

fn typed(
    field: &FieldSpec,
    value: Result<TypedValue, TypeError>,
    origin: SourceLocation,
    status: FieldStatus,
) -> Resolved {
    match value {
        Ok(value) => Resolved::Value {
            status,
            value,
            origin,
        },
        Err(err) => {
            let message = format!("field {}: {err}", field.field);
            let problem = if err.is_internal() {
                Diagnostic::internal(message, Some(origin))
            } else {
                Diagnostic::semantic(message, origin)
            };
            Resolved::NotRun {
                status: FieldStatus::TypeMismatch,
                problem: Some(problem),
            }
        }
    }
}
