// src/check/parser.rs

//! Recursive-descent parser for check expressions.
//!
//! Precedence, loosest first: `||`, `&&`, comparisons (non-associative),
//! unary `!`/`-`, method-call postfix.

use crate::check::ast::{BinaryOp, Expr, ExprKind, Literal, UnaryOp};
use crate::check::lexer::{Tok, Token, tokenize};
use crate::diagnostics::{Diagnostic, Diagnostics, Position, SourceLocation, Span};

type PResult<T> = std::result::Result<T, Diagnostic>;

struct Parser<'a> {
    tokens: Vec<Token>,
    pos: usize,
    file: &'a str,
}

/// Parse check text written at `base` in the specification file `file`.
///
/// A check is a single expression, so parsing stops at the first syntax
/// error; lexical errors are all reported.
pub fn parse(text: &str, base: Position, file: &str) -> Result<Expr, Diagnostics> {
    let (tokens, errors) = tokenize(text, base, file);
    if !errors.is_empty() {
        return Err(errors);
    }

    let mut parser = Parser {
        tokens,
        pos: 0,
        file,
    };
    let expr = parser.expr().map_err(Diagnostics::from)?;
    if parser.peek().tok != Tok::Eof {
        let tok = parser.peek();
        let message = format!("unexpected {} after expression", tok.tok.describe());
        return Err(parser.error_at(message, tok.span).into());
    }
    Ok(expr)
}

impl<'a> Parser<'a> {
    fn peek(&self) -> &Token {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn peek_nth(&self, n: usize) -> &Tok {
        &self.tokens[(self.pos + n).min(self.tokens.len() - 1)].tok
    }

    fn advance(&mut self) -> Token {
        let tok = self.peek().clone();
        if tok.tok != Tok::Eof {
            self.pos += 1;
        }
        tok
    }

    fn at_op(&self, op: &str) -> bool {
        matches!(&self.peek().tok, Tok::Op(o) if *o == op)
    }

    fn eat_op(&mut self, op: &str) -> Option<Span> {
        if self.at_op(op) {
            Some(self.advance().span)
        } else {
            None
        }
    }

    fn error_at(&self, message: String, span: Span) -> Diagnostic {
        Diagnostic::syntax(message, SourceLocation::new(self.file, span))
    }

    fn expect_op(&mut self, op: &str) -> PResult<Span> {
        match self.eat_op(op) {
            Some(span) => Ok(span),
            None => {
                let tok = self.peek();
                Err(self.error_at(
                    format!("expected '{op}', found {}", tok.tok.describe()),
                    tok.span,
                ))
            }
        }
    }

    fn expr(&mut self) -> PResult<Expr> {
        self.or()
    }

    fn binary(op: BinaryOp, op_span: Span, left: Expr, right: Expr) -> Expr {
        let span = left.span.to(right.span);
        Expr {
            kind: ExprKind::Binary {
                op,
                op_span,
                left: Box::new(left),
                right: Box::new(right),
            },
            span,
        }
    }

    fn or(&mut self) -> PResult<Expr> {
        let mut left = self.and()?;
        while let Some(op_span) = self.eat_op("||") {
            let right = self.and()?;
            left = Self::binary(BinaryOp::Or, op_span, left, right);
        }
        Ok(left)
    }

    fn and(&mut self) -> PResult<Expr> {
        let mut left = self.comparison()?;
        while let Some(op_span) = self.eat_op("&&") {
            let right = self.comparison()?;
            left = Self::binary(BinaryOp::And, op_span, left, right);
        }
        Ok(left)
    }

    fn comparison(&mut self) -> PResult<Expr> {
        let left = self.unary()?;
        let op = match &self.peek().tok {
            Tok::Op(o) => BinaryOp::from_op(o),
            _ => None,
        };
        let Some(op) = op else {
            return Ok(left);
        };
        let op_span = self.advance().span;
        let right = self.unary()?;

        if let Tok::Op(o) = &self.peek().tok
            && BinaryOp::from_op(o).is_some()
        {
            let tok = self.peek();
            return Err(self.error_at(
                "comparison operators cannot be chained; use && or parentheses".to_string(),
                tok.span,
            ));
        }

        Ok(Self::binary(op, op_span, left, right))
    }

    fn unary(&mut self) -> PResult<Expr> {
        let op = if let Some(span) = self.eat_op("!") {
            Some((UnaryOp::Not, span))
        } else {
            self.eat_op("-").map(|span| (UnaryOp::Neg, span))
        };

        match op {
            Some((op, span)) => {
                let operand = self.unary()?;
                Ok(Expr {
                    span: span.to(operand.span),
                    kind: ExprKind::Unary {
                        op,
                        operand: Box::new(operand),
                    },
                })
            }
            None => self.postfix(),
        }
    }

    fn postfix(&mut self) -> PResult<Expr> {
        let mut expr = self.primary()?;

        while self.at_op(".") {
            self.advance();
            let name = self.advance();
            let method = match name.tok {
                Tok::Ident(method) => method,
                other => {
                    return Err(self.error_at(
                        format!("expected method name after '.', found {}", other.describe()),
                        name.span,
                    ));
                }
            };
            self.expect_op("(")?;
            let args = self.arguments()?;
            let close = self.expect_op(")")?;
            expr = Expr {
                span: expr.span.to(close),
                kind: ExprKind::MethodCall {
                    receiver: Box::new(expr),
                    method,
                    method_span: name.span,
                    args,
                },
            };
        }

        Ok(expr)
    }

    fn arguments(&mut self) -> PResult<Vec<Expr>> {
        let mut args = Vec::new();
        if self.at_op(")") {
            return Ok(args);
        }
        loop {
            args.push(self.expr()?);
            if self.eat_op(",").is_none() {
                return Ok(args);
            }
        }
    }

    fn primary(&mut self) -> PResult<Expr> {
        let token = self.advance();
        let literal = |lit: Literal| Expr {
            kind: ExprKind::Literal(lit),
            span: token.span,
        };

        match &token.tok {
            Tok::Int(i) => Ok(literal(Literal::Int(*i))),
            Tok::Float(x) => Ok(literal(Literal::Float(*x))),
            Tok::Str(s) => Ok(literal(Literal::String(s.clone()))),
            Tok::Ident(word) => match word.as_str() {
                "true" => Ok(literal(Literal::Bool(true))),
                "false" => Ok(literal(Literal::Bool(false))),
                "null" => Ok(literal(Literal::Null)),
                _ => Ok(self.path(word.clone(), token.span)),
            },
            Tok::Op("(") => {
                let inner = self.expr()?;
                let close = self.expect_op(")")?;
                Ok(Expr {
                    kind: inner.kind,
                    span: token.span.to(close),
                })
            }
            other => Err(self.error_at(
                format!("expected an expression, found {}", other.describe()),
                token.span,
            )),
        }
    }

    /// Extend a path with `.segment` while the segment is not a method name.
    fn path(&mut self, first: String, start: Span) -> Expr {
        let mut segments = vec![first];
        let mut span = start;

        while self.at_op(".") && *self.peek_nth(2) != Tok::Op("(") {
            let segment = match self.peek_nth(1) {
                Tok::Ident(name) => name.clone(),
                Tok::Int(i) if *i >= 0 => i.to_string(),
                _ => break,
            };
            self.advance();
            span = span.to(self.advance().span);
            segments.push(segment);
        }

        Expr {
            kind: ExprKind::Path(segments),
            span,
        }
    }
}
