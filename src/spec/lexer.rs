// src/spec/lexer.rs

//! Tokenizer for the specification language.
//!
//! Punctuation is emitted one character at a time; check expressions are
//! captured as raw source slices by the parser, so the lexer never needs to
//! understand their operators.

use crate::diagnostics::{Diagnostic, Diagnostics, Position, SourceLocation, Span};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Ident,
    Str,
    Number,
    Punct(char),
    Eof,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub span: Span,
    /// Byte range in the source text.
    pub start: usize,
    pub end: usize,
}

impl Token {
    pub fn is_punct(&self, ch: char) -> bool {
        self.kind == TokenKind::Punct(ch)
    }

    pub fn is_word(&self, word: &str) -> bool {
        self.kind == TokenKind::Ident && self.text == word
    }

    pub fn describe(&self) -> String {
        match self.kind {
            TokenKind::Eof => "end of input".to_string(),
            TokenKind::Str => "string literal".to_string(),
            _ => format!("'{}'", self.text),
        }
    }
}

pub fn is_ident_start(ch: char) -> bool {
    ch.is_ascii_alphabetic() || ch == '_'
}

pub fn is_ident_continue(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_' || ch == '-'
}

struct Lexer<'a> {
    src: &'a str,
    file: &'a str,
    offset: usize,
    pos: Position,
    tokens: Vec<Token>,
    errors: Diagnostics,
}

/// Tokenize `src`. Every lexical error is collected; the token stream is
/// always terminated by an `Eof` token.
pub fn tokenize(src: &str, file: &str) -> (Vec<Token>, Diagnostics) {
    let mut lexer = Lexer {
        src,
        file,
        offset: 0,
        pos: Position::default(),
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

    fn rest(&self) -> &'a str {
        &self.src[self.offset..]
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.offset += ch.len_utf8();
        if ch == '\n' {
            self.pos.line += 1;
            self.pos.column = 0;
        } else {
            self.pos.column += 1;
        }
        Some(ch)
    }

    fn error(&mut self, message: impl Into<String>, span: Span) {
        self.errors
            .push(Diagnostic::syntax(message, SourceLocation::new(self.file, span)));
    }

    fn push(&mut self, kind: TokenKind, start: usize, start_pos: Position) {
        self.tokens.push(Token {
            kind,
            text: self.src[start..self.offset].to_string(),
            span: Span::new(start_pos, self.pos),
            start,
            end: self.offset,
        });
    }

    fn run(&mut self) {
        while let Some(ch) = self.peek() {
            let start = self.offset;
            let start_pos = self.pos;

            if ch.is_whitespace() {
                self.bump();
            } else if self.rest().starts_with("//") {
                while let Some(c) = self.peek() {
                    if c == '\n' {
                        break;
                    }
                    self.bump();
                }
            } else if self.rest().starts_with("/*") {
                self.block_comment(start_pos);
            } else if ch == '"' {
                self.string(start, start_pos);
            } else if ch.is_ascii_digit()
                || (ch == '-' && self.peek_nth(1).is_some_and(|c| c.is_ascii_digit()))
            {
                self.number(start, start_pos);
            } else if is_ident_start(ch) {
                while self.peek().is_some_and(is_ident_continue) {
                    self.bump();
                }
                self.push(TokenKind::Ident, start, start_pos);
            } else if ch.is_ascii_punctuation() {
                self.bump();
                self.push(TokenKind::Punct(ch), start, start_pos);
            } else {
                self.bump();
                self.error(
                    format!("unexpected character '{ch}'"),
                    Span::new(start_pos, self.pos),
                );
            }
        }

        self.tokens.push(Token {
            kind: TokenKind::Eof,
            text: String::new(),
            span: Span::new(self.pos, self.pos),
            start: self.offset,
            end: self.offset,
        });
    }

    fn block_comment(&mut self, start_pos: Position) {
        self.bump();
        self.bump();
        loop {
            if self.rest().starts_with("*/") {
                self.bump();
                self.bump();
                return;
            }
            if self.bump().is_none() {
                self.error("unterminated block comment", Span::new(start_pos, self.pos));
                return;
            }
        }
    }

    fn string(&mut self, start: usize, start_pos: Position) {
        if self.rest().starts_with("\"\"\"") {
            for _ in 0..3 {
                self.bump();
            }
            loop {
                if self.rest().starts_with("\"\"\"") {
                    for _ in 0..3 {
                        self.bump();
                    }
                    self.push(TokenKind::Str, start, start_pos);
                    return;
                }
                if self.bump().is_none() {
                    self.error("unterminated string literal", Span::new(start_pos, self.pos));
                    return;
                }
            }
        }

        self.bump();
        loop {
            match self.bump() {
                Some('"') => {
                    self.push(TokenKind::Str, start, start_pos);
                    return;
                }
                Some('\\') => {
                    self.bump();
                }
                Some('\n') | None => {
                    self.error("unterminated string literal", Span::new(start_pos, self.pos));
                    return;
                }
                Some(_) => {}
            }
        }
    }

    fn number(&mut self, start: usize, start_pos: Position) {
        if self.peek() == Some('-') {
            self.bump();
        }
        self.digits();
        if self.peek() == Some('.') && self.peek_nth(1).is_some_and(|c| c.is_ascii_digit()) {
            self.bump();
            self.digits();
        }
        if matches!(self.peek(), Some('e') | Some('E')) {
            let signed = matches!(self.peek_nth(1), Some('+') | Some('-'));
            let digit_at = if signed { 2 } else { 1 };
            if self.peek_nth(digit_at).is_some_and(|c| c.is_ascii_digit()) {
                self.bump();
                if signed {
                    self.bump();
                }
                self.digits();
            }
        }
        self.push(TokenKind::Number, start, start_pos);
    }

    fn digits(&mut self) {
        while self.peek().is_some_and(|c| c.is_ascii_digit() || c == '_') {
            self.bump();
        }
    }
}
