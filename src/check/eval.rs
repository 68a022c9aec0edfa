// src/check/eval.rs

//! Bottom-up evaluation of check expressions.
//!
//! Evaluation only reads the configuration trees and the compiled
//! specification; every call owns its expression tree, so checks can run
//! concurrently.

use std::collections::BTreeMap;
use std::cmp::Ordering;

use thiserror::Error;
use tracing::trace;

use crate::check::ast::{BinaryOp, Expr, ExprKind, Literal, UnaryOp};
use crate::diagnostics::{Diagnostics, SourceLocation, Span};
use crate::spec::Specification;
use crate::tree::Node;
use crate::types::{TypeError, TypeRegistry, TypedValue, infer, make_default, make_type};

/// One loaded configuration file as seen by the evaluator.
#[derive(Debug, Clone, Copy)]
pub struct ConfigView<'a> {
    /// Display name used in configuration-side locations.
    pub file: &'a str,
    pub tree: &'a Node,
    /// Specification declaring the file's field types, if any.
    pub spec: Option<&'a Specification>,
    pub registry: &'a TypeRegistry,
}

impl<'a> ConfigView<'a> {
    /// Type `node` (found at `path`) with its declared field type, falling
    /// back to its intrinsic type.
    fn typed(&self, path: &str, node: &Node) -> Result<TypedValue, TypeError> {
        let declared = self
            .spec
            .and_then(|spec| spec.field(path))
            .filter(|field| !field.field_type.is_empty());
        match declared {
            Some(field) => make_type(self.registry, &field.field_type, node),
            None => Ok(infer(node)),
        }
    }
}

/// Everything a check of one field can see.
#[derive(Debug, Clone, Copy)]
pub struct EvalContext<'a> {
    /// Specification file the check text belongs to.
    pub spec_file: &'a str,
    /// Dotted path of the field under check.
    pub field: &'a str,
    /// Typed value of the field (or of its default).
    pub self_value: &'a TypedValue,
    /// Where `self_value` came from.
    pub self_origin: &'a SourceLocation,
    pub main: ConfigView<'a>,
    pub imports: &'a BTreeMap<String, ConfigView<'a>>,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    #[error("invalid check expression:\n{0}")]
    Syntax(Diagnostics),

    #[error("field {path} not found")]
    FieldNotFound {
        path: String,
        location: SourceLocation,
    },

    #[error("{source}")]
    Type {
        source: TypeError,
        location: SourceLocation,
    },

    #[error("check must evaluate to bool, found {found}")]
    NotBoolean {
        found: String,
        location: SourceLocation,
    },
}

impl EvalError {
    /// Location in the specification file.
    pub fn location(&self) -> Option<&SourceLocation> {
        match self {
            EvalError::Syntax(diagnostics) => {
                diagnostics.iter().find_map(|d| d.location.as_ref())
            }
            EvalError::FieldNotFound { location, .. }
            | EvalError::Type { location, .. }
            | EvalError::NotBoolean { location, .. } => Some(location),
        }
    }

    /// A front-end defect rather than a problem with the check or the data.
    pub fn is_internal(&self) -> bool {
        matches!(self, EvalError::Type { source, .. } if source.is_internal())
    }
}

/// A check that ran and did not hold.
#[derive(Debug, Clone, PartialEq)]
pub struct Failure {
    pub message: String,
    /// Failing sub-expression in the specification file.
    pub check_location: SourceLocation,
    /// Configuration data the failure is attributable to.
    pub config_location: Option<SourceLocation>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Verdict {
    Pass,
    Fail(Failure),
}

impl Verdict {
    pub fn passed(&self) -> bool {
        matches!(self, Verdict::Pass)
    }
}

/// A value plus the configuration location it was read from.
#[derive(Debug, Clone)]
struct Operand {
    value: TypedValue,
    origin: Option<SourceLocation>,
}

pub struct Evaluator<'a> {
    ctx: EvalContext<'a>,
}

impl<'a> Evaluator<'a> {
    pub fn new(ctx: EvalContext<'a>) -> Self {
        Self { ctx }
    }

    fn spec_location(&self, span: Span) -> SourceLocation {
        SourceLocation::new(self.ctx.spec_file, span)
    }

    fn type_error(&self, source: TypeError, span: Span) -> EvalError {
        EvalError::Type {
            source,
            location: self.spec_location(span),
        }
    }

    /// Evaluate `expr` as a whole check.
    pub fn verdict(&self, expr: &Expr) -> Result<Verdict, EvalError> {
        match &expr.kind {
            ExprKind::Binary {
                op: BinaryOp::And,
                left,
                right,
                ..
            } => match self.verdict(left)? {
                Verdict::Pass => self.verdict(right),
                fail => Ok(fail),
            },
            ExprKind::Binary {
                op: BinaryOp::Or,
                left,
                right,
                ..
            } => {
                let Verdict::Fail(left_failure) = self.verdict(left)? else {
                    return Ok(Verdict::Pass);
                };
                let Verdict::Fail(right_failure) = self.verdict(right)? else {
                    return Ok(Verdict::Pass);
                };
                Ok(Verdict::Fail(Failure {
                    message: format!(
                        "{expr} is false: {}; {}",
                        left_failure.message, right_failure.message
                    ),
                    check_location: self.spec_location(expr.span),
                    config_location: left_failure
                        .config_location
                        .or(right_failure.config_location),
                }))
            }
            _ => {
                let operand = self.eval(expr)?;
                match operand.value {
                    TypedValue::Bool(true) => Ok(Verdict::Pass),
                    TypedValue::Bool(false) => Ok(Verdict::Fail(Failure {
                        message: self.explain(expr),
                        check_location: self.spec_location(expr.span),
                        config_location: operand
                            .origin
                            .or_else(|| Some(self.ctx.self_origin.clone())),
                    })),
                    other => Err(EvalError::NotBoolean {
                        found: other.type_name(),
                        location: self.spec_location(expr.span),
                    }),
                }
            }
        }
    }

    /// Message for a false sub-expression. Comparisons show their operand
    /// values.
    fn explain(&self, expr: &Expr) -> String {
        if let ExprKind::Binary {
            op, left, right, ..
        } = &expr.kind
            && op.is_comparison()
            && let (Ok(l), Ok(r)) = (self.eval(left), self.eval(right))
        {
            return format!("{expr} is false ({} {} {})", l.value, op.as_str(), r.value);
        }
        format!("{expr} is false")
    }

    fn eval(&self, expr: &Expr) -> Result<Operand, EvalError> {
        match &expr.kind {
            ExprKind::Literal(lit) => Ok(Operand {
                value: literal_value(lit),
                origin: None,
            }),
            ExprKind::Path(segments) => self.resolve(segments, expr.span),
            ExprKind::MethodCall {
                receiver,
                method,
                method_span,
                args,
            } => {
                let receiver = self.eval(receiver)?;
                let args = args
                    .iter()
                    .map(|arg| self.eval(arg).map(|operand| operand.value))
                    .collect::<Result<Vec<_>, _>>()?;
                let value = receiver
                    .value
                    .call_method(method, &args)
                    .map_err(|e| self.type_error(e, *method_span))?;
                Ok(Operand {
                    value,
                    origin: receiver.origin,
                })
            }
            ExprKind::Unary { op, operand } => {
                let inner = self.eval(operand)?;
                let value = match (op, &inner.value) {
                    (UnaryOp::Not, TypedValue::Bool(b)) => TypedValue::Bool(!b),
                    (UnaryOp::Neg, TypedValue::Int(i)) => {
                        TypedValue::Int(i.checked_neg().ok_or_else(|| {
                            self.type_error(
                                TypeError::InvalidConversion {
                                    value: format!("-({i})"),
                                    target: "int".to_string(),
                                },
                                expr.span,
                            )
                        })?)
                    }
                    (UnaryOp::Neg, TypedValue::Float(x)) => TypedValue::Float(-x),
                    (op, other) => {
                        let expected = match op {
                            UnaryOp::Not => "bool",
                            UnaryOp::Neg => "int or float",
                        };
                        return Err(self.type_error(
                            TypeError::Mismatch {
                                expected: expected.to_string(),
                                found: other.type_name(),
                            },
                            operand.span,
                        ));
                    }
                };
                Ok(Operand {
                    value,
                    origin: inner.origin,
                })
            }
            ExprKind::Binary {
                op,
                op_span,
                left,
                right,
            } => self.binary(*op, *op_span, left, right),
        }
    }

    fn binary(
        &self,
        op: BinaryOp,
        op_span: Span,
        left: &Expr,
        right: &Expr,
    ) -> Result<Operand, EvalError> {
        let lhs = self.eval(left)?;

        type Compare = fn(&TypedValue, &TypedValue) -> Result<bool, TypeError>;
        let compare: Compare = match op {
            BinaryOp::And | BinaryOp::Or => return self.logical(op, lhs, left, right),
            BinaryOp::Eq => |l, r| l.equals(r),
            BinaryOp::Ne => |l, r| l.equals(r).map(|eq| !eq),
            BinaryOp::Lt => |l, r| l.ordering(r).map(Ordering::is_lt),
            BinaryOp::Le => |l, r| l.ordering(r).map(Ordering::is_le),
            BinaryOp::Gt => |l, r| l.ordering(r).map(Ordering::is_gt),
            BinaryOp::Ge => |l, r| l.ordering(r).map(Ordering::is_ge),
        };

        let rhs = self.eval(right)?;
        let result = compare(&lhs.value, &rhs.value).map_err(|e| self.type_error(e, op_span))?;

        Ok(Operand {
            value: TypedValue::Bool(result),
            origin: lhs.origin.or(rhs.origin),
        })
    }

    /// `&&` / `||` with short-circuiting; both operands must be bool.
    fn logical(
        &self,
        op: BinaryOp,
        lhs: Operand,
        left: &Expr,
        right: &Expr,
    ) -> Result<Operand, EvalError> {
        let l = self.expect_bool(&lhs, left)?;
        if (op == BinaryOp::And && !l) || (op == BinaryOp::Or && l) {
            return Ok(Operand {
                value: TypedValue::Bool(l),
                origin: lhs.origin,
            });
        }
        let rhs = self.eval(right)?;
        let r = self.expect_bool(&rhs, right)?;
        Ok(Operand {
            value: TypedValue::Bool(r),
            origin: rhs.origin.or(lhs.origin),
        })
    }

    fn expect_bool(&self, operand: &Operand, expr: &Expr) -> Result<bool, EvalError> {
        operand.value.as_bool().ok_or_else(|| {
            self.type_error(
                TypeError::Mismatch {
                    expected: "bool".to_string(),
                    found: operand.value.type_name(),
                },
                expr.span,
            )
        })
    }

    fn resolve(&self, segments: &[String], span: Span) -> Result<Operand, EvalError> {
        let (first, rest) = match segments.split_first() {
            Some(split) => split,
            None => {
                return Err(EvalError::FieldNotFound {
                    path: String::new(),
                    location: self.spec_location(span),
                });
            }
        };

        let (view, path): (ConfigView<'_>, Vec<&str>) = if first == "self" {
            if rest.is_empty() {
                return Ok(Operand {
                    value: self.ctx.self_value.clone(),
                    origin: Some(self.ctx.self_origin.clone()),
                });
            }
            let mut path: Vec<&str> = self.ctx.field.split('.').collect();
            path.extend(rest.iter().map(String::as_str));
            (self.ctx.main, path)
        } else if let Some(view) = self.ctx.imports.get(first.as_str()).filter(|_| !rest.is_empty()) {
            (*view, rest.iter().map(String::as_str).collect())
        } else {
            (self.ctx.main, segments.iter().map(String::as_str).collect())
        };

        let dotted = path.join(".");
        trace!(path = %dotted, file = view.file, "resolving reference");

        let Some(node) = view.tree.lookup_segments(path.iter().copied()) else {
            return self.absent(view, &dotted, segments, span);
        };

        let value = view
            .typed(&dotted, node)
            .map_err(|e| self.type_error(e, span))?;

        Ok(Operand {
            value,
            origin: Some(SourceLocation::value_of(view.file, node)),
        })
    }

    /// A reference with no configuration node. The field under check stands
    /// for its own value (which may be its default); any other declared
    /// default is converted from its literal.
    fn absent(
        &self,
        view: ConfigView<'_>,
        dotted: &str,
        segments: &[String],
        span: Span,
    ) -> Result<Operand, EvalError> {
        if std::ptr::eq(view.tree, self.ctx.main.tree) && dotted == self.ctx.field {
            return Ok(Operand {
                value: self.ctx.self_value.clone(),
                origin: Some(self.ctx.self_origin.clone()),
            });
        }

        let declared = view
            .spec
            .and_then(|spec| spec.field(dotted).map(|field| (spec, field)));
        if let Some((spec, field)) = declared
            && let Some(default) = &field.default
        {
            trace!(path = %dotted, "using declared default");
            let value = make_default(field.declared_type(), default)
                .map_err(|e| self.type_error(e, span))?;
            return Ok(Operand {
                value,
                origin: Some(spec.location(field.default_location)),
            });
        }

        Err(EvalError::FieldNotFound {
            path: segments.join("."),
            location: self.spec_location(span),
        })
    }
}

fn literal_value(lit: &Literal) -> TypedValue {
    match lit {
        Literal::Null => TypedValue::Null,
        Literal::Bool(b) => TypedValue::Bool(*b),
        Literal::Int(i) => TypedValue::Int(*i),
        Literal::Float(x) => TypedValue::Float(*x),
        Literal::String(s) => TypedValue::String(s.clone()),
    }
}
