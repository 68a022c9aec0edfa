// src/check/lexer.rs

//! Tokenizer for check expressions.
//!
//! Check text is a slice of the specification file, so the lexer starts at
//! the slice's position in that file and every span it produces is already
//! absolute.

use crate::diagnostics::{Diagnostic, Diagnostics, Position, SourceLocation, Span};
use crate::spec::lexer::{is_ident_continue, is_ident_start};

#[derive(Debug, Clone, PartialEq)]
pub enum Tok {
    Int(i64),
    Float(f64),
    Str(String),
    Ident(String),
    /// Operator or punctuation: `( ) , . ! - == != < <= > >= && ||`.
    Op(&'static str),
    Eof,
}

impl Tok {
    pub fn describe(&self) -> String {
        match self {
            Tok::Int(i) => format!("integer {i}"),
            Tok::Float(x) => format!("float {x}"),
            Tok::Str(_) => "string literal".to_string(),
            Tok::Ident(name) => format!("'{name}'"),
            Tok::Op(op) => format!("'{op}'"),
            Tok::Eof => "end of check".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub tok: Tok,
    pub span: Span,
}

const OPERATORS: &[&str] = &[
    "==", "!=", "<=", ">=", "&&", "||", "<", ">", "!", "-", "(", ")", ",", ".",
];

struct Lexer<'a> {
    src: &'a str,
    file: &'a str,
    offset: usize,
    pos: Position,
    tokens: Vec<Token>,
    errors: Diagnostics,
}

pub fn tokenize(src: &str, base: Position, file: &str) -> (Vec<Token>, Diagnostics) {
    let mut lexer = Lexer {
        src,
        file,
        offset: 0,
        pos: base,
        tokens: Vec::new(),
        errors: Diagnostics::new(),
    };
    lexer.run();
    (lexer.tokens, lexer.errors)
}

impl<'a> Lexer<'a> {
    fn peek(&self) -> Option<char> {
        self.src[self.offset..].chars().next()
    }

    fn peek_nth(&self, n: usize) -> Option<char> {
        self.src[self.offset..].chars().nth(n)
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.offset += ch.len_utf8();
        self.pos = self.pos.advance(ch.encode_utf8(&mut [0; 4]));
        Some(ch)
    }

    fn error(&mut self, message: impl Into<String>, start: Position) {
        let span = Span::new(start, self.pos);
        self.errors
            .push(Diagnostic::syntax(message, SourceLocation::new(self.file, span)));
    }

    fn push(&mut self, tok: Tok, start: Position) {
        self.tokens.push(Token {
            tok,
            span: Span::new(start, self.pos),
        });
    }

    fn after_dot(&self) -> bool {
        matches!(self.tokens.last(), Some(Token { tok: Tok::Op("."), .. }))
    }

    fn run(&mut self) {
        while let Some(ch) = self.peek() {
            let start = self.pos;

            if ch.is_whitespace() {
                self.bump();
            } else if ch == '"' {
                self.string(start);
            } else if ch.is_ascii_digit() {
                self.number(start);
            } else if is_ident_start(ch) {
                let from = self.offset;
                while self.peek().is_some_and(is_ident_continue) {
                    self.bump();
                }
                let name = self.src[from..self.offset].to_string();
                self.push(Tok::Ident(name), start);
            } else if let Some(op) = OPERATORS
                .iter()
                .find(|op| self.src[self.offset..].starts_with(**op))
            {
                for _ in 0..op.len() {
                    self.bump();
                }
                self.push(Tok::Op(*op), start);
            } else {
                self.bump();
                self.error(format!("unexpected character '{ch}' in check"), start);
            }
        }

        let end = self.pos;
        self.push(Tok::Eof, end);
    }

    fn string(&mut self, start: Position) {
        self.bump();
        let mut value = String::new();
        loop {
            match self.bump() {
                Some('"') => {
                    self.push(Tok::Str(value), start);
                    return;
                }
                Some('\\') => match self.bump() {
                    Some('n') => value.push('\n'),
                    Some('t') => value.push('\t'),
                    Some(other) => value.push(other),
                    None => break,
                },
                Some(ch) => value.push(ch),
                None => break,
            }
        }
        self.error("unterminated string literal in check", start);
    }

    /// Digits directly after a `.` are a path index, so `ports.0.1` never
    /// lexes as a float.
    fn number(&mut self, start: Position) {
        let from = self.offset;
        let index_only = self.after_dot();
        let mut is_float = false;

        self.digits();
        if !index_only {
            if self.peek() == Some('.') && self.peek_nth(1).is_some_and(|c| c.is_ascii_digit()) {
                is_float = true;
                self.bump();
                self.digits();
            }
            if matches!(self.peek(), Some('e') | Some('E')) {
                let signed = matches!(self.peek_nth(1), Some('+') | Some('-'));
                let digit_at = if signed { 2 } else { 1 };
                if self.peek_nth(digit_at).is_some_and(|c| c.is_ascii_digit()) {
                    is_float = true;
                    self.bump();
                    if signed {
                        self.bump();
                    }
                    self.digits();
                }
            }
        }

        let text = self.src[from..self.offset].replace('_', "");
        let tok = if is_float {
            text.parse::<f64>().ok().map(Tok::Float)
        } else {
            text.parse::<i64>().ok().map(Tok::Int)
        };
        match tok {
            Some(tok) => self.push(tok, start),
            None => self.error(format!("number {text} is out of range"), start),
        }
    }

    fn digits(&mut self) {
        while self.peek().is_some_and(|c| c.is_ascii_digit() || c == '_') {
            self.bump();
        }
    }
}
