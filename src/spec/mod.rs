// src/spec/mod.rs

//! Specification compiler.
//!
//! Turns specification-language source into a located [`Specification`]:
//! - [`lexer`] tokenizes the source.
//! - [`syntax`] builds a parse tree, collecting every syntax error.
//! - [`walker`] extracts the model from a clean parse tree, accumulating
//!   semantic errors (duplicate metadata, missing type, ...).
//! - [`normalize`] holds the cosmetic text / type-descriptor normalization.
//!
//! Check expressions are stored as raw text here; the evaluator in
//! [`crate::check`] compiles them on demand.

pub mod lexer;
pub mod normalize;
pub mod syntax;
pub mod walker;

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::debug;

use crate::diagnostics::{DiagnosticKind, Diagnostics, SourceLocation, Span};

pub use normalize::{clean_text, condense_list_type};

/// Compiled form of a specification file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Specification {
    /// Name of the specification file; used as the file of every
    /// specification-side location.
    pub source: String,

    /// Target configuration file, as written (relative to the specification).
    pub file: String,
    pub file_location: Span,

    /// Format identifier of the target file (e.g. `toml`).
    pub file_format: String,
    pub file_format_location: Span,

    /// Import alias to imported specification path.
    pub imports: BTreeMap<String, String>,
    pub import_locations: BTreeMap<String, Span>,

    /// Named object types declared with `object`.
    pub objects: Vec<ObjectDef>,

    /// Field specifications in declaration order (parents before children).
    pub fields: Vec<FieldSpec>,
}

impl Specification {
    pub fn field(&self, path: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.field == path)
    }

    pub fn object(&self, name: &str) -> Option<&ObjectDef> {
        self.objects.iter().find(|o| o.name == name)
    }

    /// Tag a span of this specification with its file name.
    pub fn location(&self, span: Span) -> SourceLocation {
        SourceLocation::new(self.source.as_str(), span)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ObjectDef {
    pub name: String,
    pub name_location: Span,
    pub properties: Vec<ObjectProperty>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ObjectProperty {
    pub name: String,
    /// Normalized type descriptor.
    pub type_name: String,
    pub optional: bool,
    pub location: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldSpec {
    /// Dotted field path.
    pub field: String,
    pub field_location: Span,

    /// Normalized type descriptor (`list:list:int`). Empty when the type
    /// declaration was missing, which is always reported as an error.
    pub field_type: String,
    pub field_type_location: Span,

    pub optional: bool,
    pub optional_location: Span,

    pub default: Option<String>,
    pub default_location: Span,

    pub notes: Option<String>,
    pub notes_location: Span,

    pub checks: Vec<CheckWithLocation>,
}

impl FieldSpec {
    pub fn new(field: impl Into<String>, field_location: Span) -> Self {
        Self {
            field: field.into(),
            field_location,
            field_type: String::new(),
            field_type_location: Span::zero(),
            optional: false,
            optional_location: Span::zero(),
            default: None,
            default_location: Span::zero(),
            notes: None,
            notes_location: Span::zero(),
            checks: Vec::new(),
        }
    }

    /// Type descriptor to build values with. A field whose type declaration
    /// is missing (already a compile error) accepts any value.
    pub fn declared_type(&self) -> &str {
        if self.field_type.is_empty() {
            "any"
        } else {
            &self.field_type
        }
    }
}

/// Raw, uncompiled check-expression text and where it was written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckWithLocation {
    pub check: String,
    pub location: Span,
}

/// Result of compiling one specification.
///
/// Syntax errors leave `spec` empty; semantic errors keep whatever could be
/// extracted. `spec` and `diagnostics` are never both empty.
#[derive(Debug, Clone)]
pub struct Compilation {
    pub spec: Option<Specification>,
    pub diagnostics: Diagnostics,
}

impl Compilation {
    pub fn is_clean(&self) -> bool {
        self.spec.is_some() && self.diagnostics.is_empty()
    }

    /// `true` when a grammar-guaranteed conversion failed; such diagnostics
    /// are defect reports rather than user errors.
    pub fn has_internal_errors(&self) -> bool {
        self.diagnostics.has_kind(DiagnosticKind::Internal)
    }

    pub fn into_result(self) -> Result<Specification, Diagnostics> {
        match self.spec {
            Some(spec) => self.diagnostics.into_result(spec),
            None => Err(self.diagnostics),
        }
    }
}

/// Compile specification source. `file` names the specification in every
/// reported location.
pub fn compile(source: &str, file: &str) -> Compilation {
    let (syntax, syntax_errors) = syntax::parse(source, file);

    if !syntax_errors.is_empty() {
        debug!(
            file,
            errors = syntax_errors.len(),
            "specification has syntax errors; skipping semantic walk"
        );
        return Compilation {
            spec: None,
            diagnostics: syntax_errors,
        };
    }

    let (spec, diagnostics) = walker::walk(syntax, file);
    debug!(
        file,
        fields = spec.as_ref().map(|s| s.fields.len()).unwrap_or(0),
        errors = diagnostics.len(),
        "compiled specification"
    );

    Compilation { spec, diagnostics }
}
