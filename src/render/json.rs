// src/render/json.rs

use anyhow::Context;
use serde::Serialize;

use crate::analyzer::{AnalysisReport, Summary};
use crate::errors::Result;

#[derive(Serialize)]
struct JsonReport<'a> {
    success: bool,
    summary: Summary,
    #[serde(flatten)]
    report: &'a AnalysisReport,
}

/// Pretty-printed JSON document with the full report and its summary.
pub fn render_json(report: &AnalysisReport) -> Result<String> {
    let doc = JsonReport {
        success: report.is_success(),
        summary: report.summary(),
        report,
    };
    let text = serde_json::to_string_pretty(&doc).context("serializing report")?;
    Ok(text)
}
