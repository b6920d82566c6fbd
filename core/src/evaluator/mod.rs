//! The reduction engine: lazy evaluation of closed Core terms.
//!
//! ## Design principles
//!
//! - **Call-by-need**: every binding is a memoized thunk, evaluated at most
//!   once on first demand and shared by every later reference.
//! - **Black-hole loop detection**: forcing a thunk that is already being
//!   forced fails with an infinite-loop error instead of recursing forever.
//!   This catches direct self-reference, not general divergence.
//! - **Trusted input**: terms arrive well-formed from the type checker and
//!   desugarer; violated invariants surface as the distinct `Panic` error
//!   kind, never as silent misbehavior.
//! - **Stack-safe**: depth tracking bounds recursion on adversarially nested
//!   terms.

mod compare;
mod error;
mod eval;
mod prims;

#[cfg(test)]
mod eval_test;

pub use error::{EvalError, EvalErrorKind, FrameBinding, FrameReport};
pub use eval::Evaluator;

use crate::term::Term;
use crate::values::{Env, Value};
use std::rc::Rc;

/// Evaluation limits.
#[derive(Debug, Clone)]
pub struct EvaluatorOptions {
    /// Maximum evaluation recursion depth.
    pub max_depth: usize,
    /// Sample count for quantifier search over enumerable-but-infinite
    /// domains; finite domains are always searched exhaustively.
    pub search_limit: usize,
}

impl Default for EvaluatorOptions {
    fn default() -> EvaluatorOptions {
        EvaluatorOptions {
            max_depth: 1000,
            search_limit: 100,
        }
    }
}

/// Evaluate a closed Core term with default limits.
pub fn eval(term: &Rc<Term>) -> Result<Value, EvalError> {
    eval_with_options(term, EvaluatorOptions::default())
}

/// Evaluate a closed Core term with explicit limits.
pub fn eval_with_options(term: &Rc<Term>, options: EvaluatorOptions) -> Result<Value, EvalError> {
    Evaluator::new(options).eval_term(term, &Env::new())
}
