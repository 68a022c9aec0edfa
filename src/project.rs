// src/project.rs

//! Loading a specification together with every file it refers to.
//!
//! Paths in a specification (its target file and its imports) are relative
//! to the directory of the specification that names them. An imported
//! specification contributes its own target file, its declared field types
//! and its object types; its own imports are not followed.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::check::ConfigView;
use crate::diagnostics::{DiagnosticKind, Diagnostics, SourceLocation};
use crate::errors::{Result, SpecmateError};
use crate::fs::FileSystem;
use crate::parsers::ParserRegistry;
use crate::spec::{Specification, compile};
use crate::tree::Node;
use crate::types::TypeRegistry;

/// A parsed configuration file and the specification describing it.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    /// Path used in configuration-side locations.
    pub file: String,
    pub tree: Node,
    pub spec: Specification,
    /// Semantic errors found while compiling `spec`.
    pub diagnostics: Diagnostics,
    pub registry: TypeRegistry,
}

impl LoadedConfig {
    pub fn view(&self) -> ConfigView<'_> {
        ConfigView {
            file: &self.file,
            tree: &self.tree,
            spec: Some(&self.spec),
            registry: &self.registry,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Project {
    pub main: LoadedConfig,
    /// Import alias to the imported specification's target.
    pub imports: BTreeMap<String, LoadedConfig>,
}

impl Project {
    pub fn spec(&self) -> &Specification {
        &self.main.spec
    }

    pub fn import_views(&self) -> BTreeMap<String, ConfigView<'_>> {
        self.imports
            .iter()
            .map(|(alias, config)| (alias.clone(), config.view()))
            .collect()
    }

    /// Compile diagnostics of the main specification, then of each import.
    pub fn diagnostics(&self) -> Diagnostics {
        let mut all = self.main.diagnostics.clone();
        for config in self.imports.values() {
            all.extend(config.diagnostics.clone());
        }
        all
    }
}

/// Read and compile a specification.
///
/// Syntax and internal errors fail the load. Semantic errors come back with
/// the model extracted around them.
pub fn load_spec(fs: &dyn FileSystem, spec_path: &Path) -> Result<(Specification, Diagnostics)> {
    let source = fs.read_to_string(spec_path)?;
    let file = spec_path.display().to_string();
    let compilation = compile(&source, &file);

    let fatal = compilation.diagnostics.has_kind(DiagnosticKind::Syntax)
        || compilation.diagnostics.has_kind(DiagnosticKind::Internal);
    match compilation.spec {
        Some(spec) if !fatal => {
            if !compilation.diagnostics.is_empty() {
                debug!(
                    file = %file,
                    errors = compilation.diagnostics.len(),
                    "continuing past semantic errors"
                );
            }
            Ok((spec, compilation.diagnostics))
        }
        _ => Err(SpecmateError::Compile(compilation.diagnostics)),
    }
}

/// Load `spec_path`, its target configuration and all imports.
pub fn load_project(
    fs: &dyn FileSystem,
    parsers: &ParserRegistry,
    spec_path: &Path,
) -> Result<Project> {
    let (spec, diagnostics) = load_spec(fs, spec_path)?;
    let main = load_target(fs, parsers, spec_path, spec, diagnostics)?;

    let mut imports = BTreeMap::new();
    for (alias, import_path) in main.spec.imports.iter() {
        let path = relative_to(spec_path, import_path);
        debug!(%alias, path = %path.display(), "loading import");
        let span = main.spec.import_locations.get(alias).copied().unwrap_or_default();
        ensure_file(fs, &path, main.spec.location(span))?;
        let (imported, diagnostics) = load_spec(fs, &path)?;
        imports.insert(
            alias.clone(),
            load_target(fs, parsers, &path, imported, diagnostics)?,
        );
    }

    info!(
        spec = %spec_path.display(),
        target = %main.file,
        imports = imports.len(),
        "loaded project"
    );
    Ok(Project { main, imports })
}

fn load_target(
    fs: &dyn FileSystem,
    parsers: &ParserRegistry,
    spec_path: &Path,
    spec: Specification,
    diagnostics: Diagnostics,
) -> Result<LoadedConfig> {
    let parser = parsers.resolve(&spec.file_format)?;
    let path = relative_to(spec_path, &spec.file);
    ensure_file(fs, &path, spec.location(spec.file_location))?;
    let file = path.display().to_string();
    let source = fs.read_to_string(&path)?;
    let tree = parser
        .parse(&source, &file)
        .map_err(SpecmateError::ConfigParse)?;

    Ok(LoadedConfig {
        file,
        tree,
        registry: TypeRegistry::from_spec(&spec),
        spec,
        diagnostics,
    })
}

/// Fail with the referencing location when `path` is not a readable file.
fn ensure_file(fs: &dyn FileSystem, path: &Path, referenced_at: SourceLocation) -> Result<()> {
    if fs.is_file(path) {
        return Ok(());
    }
    Err(SpecmateError::MissingFile {
        path: path.display().to_string(),
        referenced_at: referenced_at.to_string(),
    })
}

/// Resolve `target` against the directory of `spec_path`.
pub fn relative_to(spec_path: &Path, target: &str) -> PathBuf {
    let target = Path::new(target);
    if target.is_absolute() {
        return target.to_path_buf();
    }
    match spec_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.join(target),
        _ => target.to_path_buf(),
    }
}
