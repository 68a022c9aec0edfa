// src/diagnostics/mod.rs

//! Diagnostics shared by every stage.
//!
//! - [`span`] holds positions, spans and file-tagged locations.
//! - [`Diagnostic`] is one located problem; [`Diagnostics`] accumulates many
//!   of them so a single pass can report every independent problem at once.

pub mod span;

use std::fmt;

use serde::Serialize;

pub use span::{LineIndex, Position, SourceLocation, Span};

/// Error class of a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticKind {
    /// The grammar rejected the input.
    Syntax,
    /// The input parsed but is not meaningful (duplicates, missing type, ...).
    Semantic,
    /// A conversion the grammar guarantees failed anyway. This is a defect in
    /// the front end, not a user mistake.
    Internal,
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DiagnosticKind::Syntax => "syntax error",
            DiagnosticKind::Semantic => "error",
            DiagnosticKind::Internal => "internal error",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub message: String,
    pub location: Option<SourceLocation>,
}

impl Diagnostic {
    pub fn syntax(message: impl Into<String>, location: SourceLocation) -> Self {
        Self {
            kind: DiagnosticKind::Syntax,
            message: message.into(),
            location: Some(location),
        }
    }

    pub fn semantic(message: impl Into<String>, location: SourceLocation) -> Self {
        Self {
            kind: DiagnosticKind::Semantic,
            message: message.into(),
            location: Some(location),
        }
    }

    pub fn internal(message: impl Into<String>, location: Option<SourceLocation>) -> Self {
        Self {
            kind: DiagnosticKind::Internal,
            message: message.into(),
            location,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.location {
            Some(loc) => write!(f, "{loc}: {}: {}", self.kind, self.message),
            None => write!(f, "{}: {}", self.kind, self.message),
        }
    }
}

/// An ordered set of diagnostics reported to the caller as one unit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Diagnostics(Vec<Diagnostic>);

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.0.push(diagnostic);
    }

    pub fn extend(&mut self, other: Diagnostics) {
        self.0.extend(other.0);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.0.iter()
    }

    pub fn has_kind(&self, kind: DiagnosticKind) -> bool {
        self.0.iter().any(|d| d.kind == kind)
    }

    /// `Ok(value)` when nothing was recorded, the whole set otherwise.
    pub fn into_result<T>(self, value: T) -> Result<T, Diagnostics> {
        if self.is_empty() { Ok(value) } else { Err(self) }
    }
}

impl From<Diagnostic> for Diagnostics {
    fn from(diagnostic: Diagnostic) -> Self {
        Self(vec![diagnostic])
    }
}

impl From<Vec<Diagnostic>> for Diagnostics {
    fn from(diagnostics: Vec<Diagnostic>) -> Self {
        Self(diagnostics)
    }
}

impl IntoIterator for Diagnostics {
    type Item = Diagnostic;
    type IntoIter = std::vec::IntoIter<Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, diagnostic) in self.0.iter().enumerate() {
            if idx > 0 {
                writeln!(f)?;
            }
            write!(f, "{diagnostic}")?;
        }
        Ok(())
    }
}

impl std::error::Error for Diagnostics {}
