// src/diagnostics/span.rs

//! Span arithmetic shared by the compiler, the evaluator and the front ends.
//!
//! Lines and columns are 0-based everywhere inside the crate; `Display`
//! renders them 1-based for humans.

use std::fmt;

use serde::Serialize;

use crate::tree::Node;

/// A single line/column position in a source text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }

    /// Position reached after consuming `text` starting at `self`.
    pub fn advance(self, text: &str) -> Self {
        let mut pos = self;
        for ch in text.chars() {
            if ch == '\n' {
                pos.line += 1;
                pos.column = 0;
            } else {
                pos.column += 1;
            }
        }
        pos
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line + 1, self.column + 1)
    }
}

/// Start/end pair identifying a piece of source text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

impl Span {
    pub fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    /// Span of a token whose text starts at `(line, column)`.
    ///
    /// The end is derived from the token text, so multi-line tokens
    /// (triple-quoted strings) end on the right line.
    pub fn from_token(line: usize, column: usize, text: &str) -> Self {
        let start = Position::new(line, column);
        Self {
            start,
            end: start.advance(text),
        }
    }

    /// Zero span used for synthetic or top-of-file references.
    pub fn zero() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Smallest span covering both `self` and `other`.
    pub fn to(self, other: Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.start)
    }
}

/// A span tagged with the file it belongs to.
///
/// `file` is the display path of a configuration or specification file.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct SourceLocation {
    pub file: String,
    pub span: Span,
}

impl SourceLocation {
    pub fn new(file: impl Into<String>, span: Span) -> Self {
        Self {
            file: file.into(),
            span,
        }
    }

    /// Location of a node's value.
    pub fn value_of(file: &str, node: &Node) -> Self {
        Self::new(file, node.value_location)
    }

    /// Location of a node's key / table header.
    pub fn name_of(file: &str, node: &Node) -> Self {
        Self::new(file, node.name_location)
    }

    /// Placeholder pointing at the top of a file.
    pub fn top_of_file(file: &str) -> Self {
        Self::new(file, Span::zero())
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file, self.span)
    }
}

/// Byte offset to line/column conversion for one source text.
#[derive(Debug, Clone)]
pub struct LineIndex<'a> {
    text: &'a str,
    line_starts: Vec<usize>,
}

impl<'a> LineIndex<'a> {
    pub fn new(text: &'a str) -> Self {
        let mut line_starts = vec![0];
        for (idx, byte) in text.bytes().enumerate() {
            if byte == b'\n' {
                line_starts.push(idx + 1);
            }
        }
        Self { text, line_starts }
    }

    /// Position of a byte offset; columns count characters, not bytes.
    pub fn position(&self, offset: usize) -> Position {
        let offset = offset.min(self.text.len());
        let line = match self.line_starts.binary_search(&offset) {
            Ok(line) => line,
            Err(next) => next - 1,
        };
        let start = self.line_starts[line];
        let column = self
            .text
            .get(start..offset)
            .map(|s| s.chars().count())
            .unwrap_or(offset - start);
        Position::new(line, column)
    }

    pub fn span(&self, range: std::ops::Range<usize>) -> Span {
        Span::new(self.position(range.start), self.position(range.end))
    }
}
