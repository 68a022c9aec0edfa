// src/lib.rs

pub mod analyzer;
pub mod check;
pub mod cli;
pub mod config;
pub mod diagnostics;
pub mod errors;
pub mod fs;
pub mod logging;
pub mod parsers;
pub mod project;
pub mod render;
pub mod spec;
pub mod tree;
pub mod types;

use std::path::Path;

use anyhow::{Result, anyhow};
use tracing::debug;

use crate::analyzer::{AnalysisReport, AnalyzerOptions, analyze};
use crate::cli::CliArgs;
use crate::config::{Settings, load_settings};
use crate::diagnostics::Diagnostics;
use crate::errors::SpecmateError;
use crate::fs::{FileSystem, RealFileSystem};
use crate::parsers::ParserRegistry;
use crate::project::{load_project, load_spec};
use crate::render::render;
use crate::spec::{Specification, condense_list_type};
use crate::types::{TypeDescriptor, TypedValue, methods};

/// How a run ended, for the process exit status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    Success,
    /// Some check failed or errored, a field was missing or mistyped, or the
    /// specification had semantic errors.
    ChecksFailed,
}

/// High-level entry point used by `main.rs`.
pub fn run(args: CliArgs) -> Result<RunOutcome> {
    if let Some(type_name) = &args.methods {
        print_methods(type_name)?;
        return Ok(RunOutcome::Success);
    }

    let spec_path = args
        .spec
        .as_deref()
        .ok_or_else(|| anyhow!("--spec is required"))?;
    let spec_path = Path::new(spec_path);
    let settings = load_settings(args.settings.as_deref().map(Path::new))?;
    let fs = RealFileSystem;

    if args.dry_run {
        let (spec, diagnostics) = load_spec(&fs, spec_path)?;
        print_dry_run(&spec, &diagnostics);
        return Ok(if diagnostics.is_empty() {
            RunOutcome::Success
        } else {
            RunOutcome::ChecksFailed
        });
    }

    let report = check(&fs, &settings, spec_path)?;
    let format = args.format.unwrap_or(settings.output.format);
    println!("{}", render(&report, format, &settings.output)?);

    Ok(if report.is_success() {
        RunOutcome::Success
    } else {
        RunOutcome::ChecksFailed
    })
}

/// Load the specification at `spec_path` with everything it references and
/// analyze it.
pub fn check(
    fs: &dyn FileSystem,
    settings: &Settings,
    spec_path: &Path,
) -> errors::Result<AnalysisReport> {
    let mut parsers = ParserRegistry::with_builtin();
    for (alias, canonical) in settings.formats.iter() {
        parsers.add_alias(alias, canonical)?;
    }

    let project = load_project(fs, &parsers, spec_path)?;
    let options = AnalyzerOptions {
        parallel: settings.analysis.parallel,
    };
    Ok(analyze(&project, options))
}

fn print_methods(type_name: &str) -> errors::Result<()> {
    let descriptor = condense_list_type(type_name);
    if descriptor == "null" {
        for info in TypedValue::Null.methods() {
            println!("{}", methods::describe("null", info));
        }
        return Ok(());
    }

    let parsed = TypeDescriptor::parse(&descriptor)
        .map_err(|_| SpecmateError::UnknownType(type_name.to_string()))?;
    for info in methods::methods_for(&parsed) {
        println!("{}", methods::describe(&descriptor, info));
    }
    Ok(())
}

/// Dry-run output: target, imports and every field with its metadata.
fn print_dry_run(spec: &Specification, diagnostics: &Diagnostics) {
    println!("specmate dry-run");
    println!("  spec: {}", spec.source);
    println!("  file: {} ({})", spec.file, spec.file_format);
    for (alias, path) in spec.imports.iter() {
        println!("  import {alias}: {path}");
    }
    for object in spec.objects.iter() {
        println!("  object {} ({} properties)", object.name, object.properties.len());
    }
    println!();

    println!("fields ({}):", spec.fields.len());
    for field in spec.fields.iter() {
        println!("  - {}: {}", field.field, field.field_type);
        if field.optional {
            println!("      optional: true");
        }
        if let Some(ref default) = field.default {
            println!("      default: {default}");
        }
        if let Some(ref notes) = field.notes {
            println!("      notes: {notes}");
        }
        for check in field.checks.iter() {
            println!("      check: {}", check.check);
        }
    }

    if !diagnostics.is_empty() {
        println!();
        println!("specification errors ({}):", diagnostics.len());
        for diagnostic in diagnostics.iter() {
            println!("  - {diagnostic}");
        }
    }

    debug!("dry-run complete (no checks evaluated)");
}
