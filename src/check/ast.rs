// src/check/ast.rs

use std::fmt;

use crate::diagnostics::Span;

#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Not,
    Neg,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Or,
    And,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl BinaryOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            BinaryOp::Or => "||",
            BinaryOp::And => "&&",
            BinaryOp::Eq => "==",
            BinaryOp::Ne => "!=",
            BinaryOp::Lt => "<",
            BinaryOp::Le => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::Ge => ">=",
        }
    }

    pub fn from_op(op: &str) -> Option<Self> {
        let op = match op {
            "==" => BinaryOp::Eq,
            "!=" => BinaryOp::Ne,
            "<" => BinaryOp::Lt,
            "<=" => BinaryOp::Le,
            ">" => BinaryOp::Gt,
            ">=" => BinaryOp::Ge,
            _ => return None,
        };
        Some(op)
    }

    pub fn is_comparison(&self) -> bool {
        !matches!(self, BinaryOp::Or | BinaryOp::And)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    Literal(Literal),
    /// Dotted reference. The first segment may be `self` or an import alias.
    Path(Vec<String>),
    MethodCall {
        receiver: Box<Expr>,
        method: String,
        method_span: Span,
        args: Vec<Expr>,
    },
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    Binary {
        op: BinaryOp,
        op_span: Span,
        left: Box<Expr>,
        right: Box<Expr>,
    },
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Null => f.write_str("null"),
            Literal::Bool(b) => write!(f, "{b}"),
            Literal::Int(i) => write!(f, "{i}"),
            Literal::Float(x) => write!(f, "{x:?}"),
            Literal::String(s) => write!(f, "{s:?}"),
        }
    }
}

/// Canonical source form, fully parenthesized only where precedence needs it.
impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ExprKind::Literal(lit) => write!(f, "{lit}"),
            ExprKind::Path(segments) => f.write_str(&segments.join(".")),
            ExprKind::MethodCall {
                receiver,
                method,
                args,
                ..
            } => {
                write!(f, "{receiver}.{method}(")?;
                for (idx, arg) in args.iter().enumerate() {
                    if idx > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{arg}")?;
                }
                f.write_str(")")
            }
            ExprKind::Unary { op, operand } => {
                let sym = match op {
                    UnaryOp::Not => "!",
                    UnaryOp::Neg => "-",
                };
                if matches!(operand.kind, ExprKind::Binary { .. }) {
                    write!(f, "{sym}({operand})")
                } else {
                    write!(f, "{sym}{operand}")
                }
            }
            ExprKind::Binary {
                op, left, right, ..
            } => {
                write_operand(f, left, *op)?;
                write!(f, " {} ", op.as_str())?;
                write_operand(f, right, *op)
            }
        }
    }
}

fn precedence(op: BinaryOp) -> u8 {
    match op {
        BinaryOp::Or => 1,
        BinaryOp::And => 2,
        _ => 3,
    }
}

fn write_operand(f: &mut fmt::Formatter<'_>, expr: &Expr, parent: BinaryOp) -> fmt::Result {
    match &expr.kind {
        ExprKind::Binary { op, .. } if precedence(*op) <= precedence(parent) && *op != parent => {
            write!(f, "({expr})")
        }
        ExprKind::Binary { op, .. } if parent.is_comparison() && op.is_comparison() => {
            write!(f, "({expr})")
        }
        _ => write!(f, "{expr}"),
    }
}
