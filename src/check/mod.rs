// src/check/mod.rs

//! Check-expression language.
//!
//! Checks are stored as raw text by the specification compiler and compiled
//! here on demand: [`parser`] builds an [`Expr`] whose spans are absolute in
//! the specification file, [`eval`] evaluates it against the configuration
//! trees through the type system.

pub mod ast;
pub mod eval;
pub mod lexer;
pub mod parser;

use tracing::debug;

use crate::spec::CheckWithLocation;

pub use ast::{BinaryOp, Expr, ExprKind, Literal, UnaryOp};
pub use eval::{ConfigView, EvalContext, EvalError, Evaluator, Failure, Verdict};

/// Compile a stored check.
pub fn compile_check(check: &CheckWithLocation, spec_file: &str) -> Result<Expr, EvalError> {
    parser::parse(&check.check, check.location.start, spec_file).map_err(EvalError::Syntax)
}

/// Compile and evaluate one check. Each call builds its own expression tree.
pub fn evaluate_check(check: &CheckWithLocation, ctx: EvalContext<'_>) -> Result<Verdict, EvalError> {
    let expr = compile_check(check, ctx.spec_file)?;
    let verdict = Evaluator::new(ctx).verdict(&expr);
    debug!(
        field = ctx.field,
        check = %check.check,
        passed = matches!(verdict, Ok(Verdict::Pass)),
        "evaluated check"
    );
    verdict
}
