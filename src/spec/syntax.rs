// src/spec/syntax.rs

//! Recursive-descent parser producing the specification parse tree.
//!
//! The parser recovers at statement and block boundaries so that one pass
//! reports every syntax error it can find. A tree produced alongside any
//! syntax error must not be walked for semantic extraction.

use crate::diagnostics::{Diagnostic, Diagnostics, SourceLocation, Span};
use crate::spec::lexer::{Token, TokenKind, tokenize};

#[derive(Debug, Clone)]
pub struct SpecSyntax {
    pub file: Option<FileDecl>,
    pub imports: Vec<ImportItem>,
    pub objects: Vec<ObjectDecl>,
    pub fields: Vec<FieldBlock>,
}

#[derive(Debug, Clone)]
pub struct FileDecl {
    pub path: Token,
    pub format: Token,
}

#[derive(Debug, Clone)]
pub struct ImportItem {
    pub alias: Token,
    pub path: Token,
}

#[derive(Debug, Clone)]
pub struct ObjectDecl {
    pub name: Token,
    pub properties: Vec<PropertyDecl>,
}

#[derive(Debug, Clone)]
pub struct PropertyDecl {
    pub name: Token,
    pub optional: bool,
    pub ty: TypeExpr,
}

/// A type expression with whitespace removed, e.g. `list<list<int>>`.
#[derive(Debug, Clone)]
pub struct TypeExpr {
    pub text: String,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct FieldBlock {
    /// Local name as written; may itself be dotted (`field a.b { ... }`).
    pub name: String,
    pub name_span: Span,
    pub items: Vec<FieldItem>,
}

#[derive(Debug, Clone)]
pub enum FieldItem {
    Metadata(MetadataItem),
    Check(RawCheck),
    Field(FieldBlock),
}

#[derive(Debug, Clone)]
pub enum MetadataItem {
    Type(TypeExpr),
    Optional(Token),
    Default(Token),
    Notes(Token),
}

/// Verbatim check-expression source with its span.
#[derive(Debug, Clone)]
pub struct RawCheck {
    pub text: String,
    pub span: Span,
}

type PResult<T> = Result<T, Diagnostic>;

/// Parse specification source into a syntax tree plus every lexical and
/// syntax error found.
pub fn parse(src: &str, file: &str) -> (SpecSyntax, Diagnostics) {
    let (tokens, mut errors) = tokenize(src, file);
    let mut parser = Parser {
        src,
        file,
        tokens,
        pos: 0,
        errors: Diagnostics::new(),
    };
    let syntax = parser.spec();
    errors.extend(parser.errors);
    (syntax, errors)
}

struct Parser<'a> {
    src: &'a str,
    file: &'a str,
    tokens: Vec<Token>,
    pos: usize,
    errors: Diagnostics,
}

impl<'a> Parser<'a> {
    fn cur(&self) -> &Token {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn nth(&self, n: usize) -> &Token {
        &self.tokens[(self.pos + n).min(self.tokens.len() - 1)]
    }

    fn at_eof(&self) -> bool {
        self.cur().kind == TokenKind::Eof
    }

    fn advance(&mut self) -> Token {
        let tok = self.cur().clone();
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        tok
    }

    fn err(&self, msg: impl Into<String>) -> Diagnostic {
        Diagnostic::syntax(msg, SourceLocation::new(self.file, self.cur().span))
    }

    fn expect_punct(&mut self, ch: char) -> PResult<Token> {
        if self.cur().is_punct(ch) {
            Ok(self.advance())
        } else {
            Err(self.err(format!("expected '{ch}', found {}", self.cur().describe())))
        }
    }

    fn eat_punct(&mut self, ch: char) -> bool {
        if self.cur().is_punct(ch) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn eat_separator(&mut self) {
        if self.cur().is_punct(';') || self.cur().is_punct(',') {
            self.advance();
        }
    }

    fn expect_ident(&mut self, what: &str) -> PResult<Token> {
        if self.cur().kind == TokenKind::Ident {
            Ok(self.advance())
        } else {
            Err(self.err(format!("expected {what}, found {}", self.cur().describe())))
        }
    }

    fn expect_word(&mut self, word: &str) -> PResult<Token> {
        if self.cur().is_word(word) {
            Ok(self.advance())
        } else {
            Err(self.err(format!("expected '{word}', found {}", self.cur().describe())))
        }
    }

    fn expect_string(&mut self, what: &str) -> PResult<Token> {
        if self.cur().kind == TokenKind::Str {
            Ok(self.advance())
        } else {
            Err(self.err(format!("expected {what}, found {}", self.cur().describe())))
        }
    }

    fn at_block_start(&self) -> bool {
        (self.cur().is_word("field") || self.cur().is_word("object"))
            && self.nth(1).kind == TokenKind::Ident
    }

    /// Skip to the next top-level `field` / `object` declaration.
    fn recover_top_level(&mut self) {
        let mut depth = 0i32;
        while !self.at_eof() {
            if depth <= 0 && self.at_block_start() {
                return;
            }
            if self.cur().is_punct('{') {
                depth += 1;
            } else if self.cur().is_punct('}') {
                depth -= 1;
            }
            self.advance();
        }
    }

    /// Skip the rest of a statement inside a block. Stops after a separator,
    /// or before the closing brace or a nested block.
    fn recover_statement(&mut self) {
        let mut depth = 0i32;
        while !self.at_eof() {
            let tok = self.cur();
            if depth == 0 {
                if tok.is_punct(';') || tok.is_punct(',') {
                    self.advance();
                    return;
                }
                if tok.is_punct('}') || self.at_block_start() {
                    return;
                }
            }
            if tok.is_punct('(') || tok.is_punct('[') || tok.is_punct('{') {
                depth += 1;
            } else if tok.is_punct(')') || tok.is_punct(']') || tok.is_punct('}') {
                depth -= 1;
            }
            self.advance();
        }
    }

    fn spec(&mut self) -> SpecSyntax {
        let mut syntax = SpecSyntax {
            file: None,
            imports: Vec::new(),
            objects: Vec::new(),
            fields: Vec::new(),
        };

        match self.file_decl() {
            Ok(decl) => syntax.file = Some(decl),
            Err(e) => {
                self.errors.push(e);
                if !self.cur().is_word("import") {
                    self.recover_top_level();
                }
            }
        }

        if self.cur().is_word("import") {
            if let Err(e) = self.import_block(&mut syntax.imports) {
                self.errors.push(e);
                self.recover_top_level();
            }
        }

        while !self.at_eof() {
            let result = if self.cur().is_word("object") {
                self.object_decl().map(|o| syntax.objects.push(o))
            } else if self.cur().is_word("field") {
                self.field_block().map(|f| syntax.fields.push(f))
            } else {
                let e = self.err(format!(
                    "expected 'field' or 'object', found {}",
                    self.cur().describe()
                ));
                self.advance();
                Err(e)
            };

            if let Err(e) = result {
                self.errors.push(e);
                self.recover_top_level();
            }
        }

        syntax
    }

    fn file_decl(&mut self) -> PResult<FileDecl> {
        self.expect_word("file")?;
        self.eat_punct(':');
        let path = self.expect_string("target file path")?;
        let format = self.expect_ident("file format")?;
        self.eat_punct(';');
        Ok(FileDecl { path, format })
    }

    fn import_block(&mut self, imports: &mut Vec<ImportItem>) -> PResult<()> {
        self.expect_word("import")?;
        self.expect_punct('{')?;
        loop {
            if self.eat_punct('}') {
                return Ok(());
            }
            if self.at_eof() {
                return Err(self.err("unclosed import block"));
            }
            match self.import_item() {
                Ok(item) => {
                    imports.push(item);
                    self.eat_separator();
                }
                Err(e) => {
                    self.errors.push(e);
                    self.recover_statement();
                }
            }
        }
    }

    fn import_item(&mut self) -> PResult<ImportItem> {
        let alias = self.expect_ident("import alias")?;
        self.expect_punct(':')?;
        let path = self.expect_string("import path")?;
        Ok(ImportItem { alias, path })
    }

    fn object_decl(&mut self) -> PResult<ObjectDecl> {
        self.expect_word("object")?;
        let name = self.expect_ident("object name")?;
        self.expect_punct('{')?;
        let mut properties = Vec::new();
        loop {
            if self.eat_punct('}') {
                return Ok(ObjectDecl { name, properties });
            }
            if self.at_eof() {
                return Err(self.err(format!("unclosed object block '{}'", name.text)));
            }
            match self.property_decl() {
                Ok(prop) => {
                    properties.push(prop);
                    self.eat_separator();
                }
                Err(e) => {
                    self.errors.push(e);
                    self.recover_statement();
                }
            }
        }
    }

    fn property_decl(&mut self) -> PResult<PropertyDecl> {
        let name = self.expect_ident("property name")?;
        let optional = self.eat_punct('?');
        self.expect_punct(':')?;
        let ty = self.type_expr()?;
        Ok(PropertyDecl { name, optional, ty })
    }

    fn field_block(&mut self) -> PResult<FieldBlock> {
        self.expect_word("field")?;
        let first = self.expect_ident("field name")?;
        let mut name = first.text.clone();
        let mut name_span = first.span;
        while self.cur().is_punct('.') {
            self.advance();
            let segment = self.expect_ident("field name segment")?;
            name.push('.');
            name.push_str(&segment.text);
            name_span = name_span.to(segment.span);
        }

        self.expect_punct('{')?;
        let mut items = Vec::new();
        loop {
            if self.eat_punct('}') {
                return Ok(FieldBlock {
                    name,
                    name_span,
                    items,
                });
            }
            if self.at_eof() {
                return Err(self.err(format!("unclosed field block '{name}'")));
            }

            let item = if self.cur().is_word("field") && self.nth(1).kind == TokenKind::Ident {
                self.field_block().map(FieldItem::Field)
            } else {
                self.field_item()
            };

            match item {
                Ok(item) => {
                    items.push(item);
                    self.eat_separator();
                }
                Err(e) => {
                    self.errors.push(e);
                    self.recover_statement();
                }
            }
        }
    }

    fn field_item(&mut self) -> PResult<FieldItem> {
        let key = self.expect_ident("'type', 'optional', 'default', 'notes', 'check' or 'field'")?;
        self.expect_punct(':')?;
        match key.text.as_str() {
            "type" => Ok(FieldItem::Metadata(MetadataItem::Type(self.type_expr()?))),
            "optional" => {
                if self.cur().is_word("true") || self.cur().is_word("false") {
                    Ok(FieldItem::Metadata(MetadataItem::Optional(self.advance())))
                } else {
                    Err(self.err(format!(
                        "expected 'true' or 'false', found {}",
                        self.cur().describe()
                    )))
                }
            }
            "default" => {
                let tok = self.cur();
                let literal = matches!(tok.kind, TokenKind::Str | TokenKind::Number)
                    || tok.is_word("true")
                    || tok.is_word("false");
                if literal {
                    Ok(FieldItem::Metadata(MetadataItem::Default(self.advance())))
                } else {
                    Err(self.err(format!(
                        "expected a string, number or boolean default, found {}",
                        tok.describe()
                    )))
                }
            }
            "notes" => Ok(FieldItem::Metadata(MetadataItem::Notes(
                self.expect_string("notes string")?,
            ))),
            "check" => Ok(FieldItem::Check(self.raw_check()?)),
            other => Err(Diagnostic::syntax(
                format!(
                    "unknown field item '{other}' (expected type, optional, default, notes, check or field)"
                ),
                SourceLocation::new(self.file, key.span),
            )),
        }
    }

    fn raw_check(&mut self) -> PResult<RawCheck> {
        let first = self.cur().clone();
        let mut last: Option<Token> = None;
        let mut depth = 0i32;

        while !self.at_eof() {
            let tok = self.cur();
            if depth == 0 && (tok.is_punct(';') || tok.is_punct(',') || tok.is_punct('}')) {
                break;
            }
            if tok.is_punct('(') || tok.is_punct('[') || tok.is_punct('{') {
                depth += 1;
            } else if tok.is_punct(')') || tok.is_punct(']') || tok.is_punct('}') {
                depth -= 1;
            }
            last = Some(self.advance());
        }

        match last {
            Some(last) => Ok(RawCheck {
                text: self.src[first.start..last.end].to_string(),
                span: Span::new(first.span.start, last.span.end),
            }),
            None => Err(self.err("empty check expression")),
        }
    }

    fn type_expr(&mut self) -> PResult<TypeExpr> {
        if self.cur().is_word("list") && self.nth(1).is_punct('<') {
            let list = self.advance();
            self.advance();
            let inner = self.type_expr()?;
            let close = self.expect_punct('>')?;
            return Ok(TypeExpr {
                text: format!("list<{}>", inner.text),
                span: list.span.to(close.span),
            });
        }
        let name = self.expect_ident("type name")?;
        Ok(TypeExpr {
            text: name.text,
            span: name.span,
        })
    }
}
