// src/render/mod.rs

//! Human-readable and machine-readable report output.

pub mod json;
pub mod text;

use crate::analyzer::AnalysisReport;
use crate::config::{OutputFormat, OutputSection};
use crate::errors::Result;

pub use json::render_json;
pub use text::render_text;

pub fn render(report: &AnalysisReport, format: OutputFormat, output: &OutputSection) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(render_text(report, output)),
        OutputFormat::Json => render_json(report),
    }
}
