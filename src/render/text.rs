// src/render/text.rs

use std::fmt::Write;

use crate::analyzer::{AnalysisReport, CheckOutcome, FieldReport, FieldStatus};
use crate::config::OutputSection;

/// Render a report for a terminal.
///
/// ```text
/// SPEC  duplicate notes metadata for field port
///       at app.spec:3:35
/// FAIL  port: port > 0 is false (-1 > 0)
///       at app.spec:4:12, config.toml:1:8
/// ```
pub fn render_text(report: &AnalysisReport, output: &OutputSection) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} -> {}", report.spec_file, report.config_file);

    for diagnostic in report.diagnostics.iter() {
        let _ = writeln!(out, "SPEC  {}", diagnostic.message);
        if let Some(location) = &diagnostic.location {
            let _ = writeln!(out, "      at {location}");
        }
    }

    for field in &report.fields {
        write_field(&mut out, field, output);
    }

    let s = report.summary();
    let _ = writeln!(
        out,
        "\n{} fields, {} checks: {} passed, {} failed, {} errors, {} skipped",
        s.fields, s.checks, s.passed, s.failed, s.errors, s.skipped
    );
    if s.spec_errors > 0 {
        let _ = writeln!(out, "{} specification error(s)", s.spec_errors);
    }
    if s.field_problems > 0 {
        let _ = writeln!(out, "{} field problem(s)", s.field_problems);
    }
    out
}

fn write_field(out: &mut String, field: &FieldReport, output: &OutputSection) {
    if let Some(problem) = &field.problem {
        let tag = match field.status {
            FieldStatus::Missing => "MISSING",
            _ => "TYPE",
        };
        let _ = writeln!(out, "{tag:<5} {}: {}", field.field, problem.message);
        if let Some(location) = &problem.location {
            let _ = writeln!(out, "      at {location}");
        }
    } else if field.status == FieldStatus::Skipped && output.show_passing {
        let _ = writeln!(out, "SKIP  {}: optional and absent", field.field);
    }

    for check in &field.checks {
        match &check.outcome {
            CheckOutcome::Passed if output.show_passing => {
                let _ = writeln!(out, "PASS  {}: {}", field.field, check.check);
            }
            CheckOutcome::Failed {
                message,
                check_location,
                config_location,
            } => {
                let _ = writeln!(out, "FAIL  {}: {message}", field.field);
                match config_location {
                    Some(config) => {
                        let _ = writeln!(out, "      at {check_location}, {config}");
                    }
                    None => {
                        let _ = writeln!(out, "      at {check_location}");
                    }
                }
            }
            CheckOutcome::Error {
                message,
                location,
                internal,
            } => {
                let tag = if *internal { "BUG" } else { "ERROR" };
                let _ = writeln!(out, "{tag:<5} {}: {message}", field.field);
                if let Some(location) = location {
                    let _ = writeln!(out, "      at {location}");
                }
            }
            _ => {}
        }
    }

    if output.show_notes
        && !field.is_ok()
        && let Some(notes) = &field.notes
    {
        let _ = writeln!(out, "      note: {notes}");
    }
}
