//! Evaluation-time errors.
//!
//! These are distinct from parse and type-check failures, which belong to
//! external phases. Every error aborts the current evaluation and propagates
//! to the nearest enclosing test frame (which annotates it with the frame's
//! variable bindings) or to the top-level driver; nothing is retried.
//!
//! `Panic` is the bug class: an invariant the type checker or desugarer was
//! supposed to guarantee did not hold. It is still surfaced as an error value
//! rather than a process abort, but drivers should flag it as
//! non-user-actionable.

use crate::term::{NameId, Ty};
use crate::values::Value;
use ecow::EcoString;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum EvalErrorKind {
    /// A variable with no binding in the active environment: a desugaring
    /// bug, but a defined failure path rather than undefined behavior.
    #[error("unbound name {0:?}")]
    Unbound(NameId),

    #[error("division by zero")]
    DivisionByZero,

    /// A natural-number subtraction would go negative.
    #[error("subtraction would yield a negative natural")]
    Underflow,

    /// An operand exceeds a range the language mandates to be bounded.
    #[error("operand exceeds the representable range")]
    Overflow,

    /// A case dispatch had no matching branch (reached via the `MatchErr`
    /// primitive that incomplete patterns desugar to).
    #[error("non-exhaustive match")]
    NonExhaustive,

    /// A thunk was forced while already being forced: evaluation depends
    /// directly on its own result.
    #[error("infinite loop: computation depends on its own result")]
    InfiniteLoop,

    /// The language-level `crash` primitive.
    #[error("crash: {0}")]
    Crash(EcoString),

    /// Evaluation recursion depth exceeded the configured limit.
    #[error("evaluation depth {depth} exceeds the limit of {max_depth}")]
    StackOverflow { depth: usize, max_depth: usize },

    /// An internal invariant violation: a bug in an earlier phase.
    #[error("internal invariant violated: {0}")]
    Panic(EcoString),
}

/// An evaluation error, annotated by every test frame it propagated through.
#[derive(Debug, Clone, Error)]
#[error("{kind}")]
pub struct EvalError {
    pub kind: EvalErrorKind,
    /// Innermost frame first.
    pub frames: Vec<FrameReport>,
}

impl EvalError {
    pub fn new(kind: EvalErrorKind) -> EvalError {
        EvalError {
            kind,
            frames: Vec::new(),
        }
    }

    pub fn panic(message: impl Into<EcoString>) -> EvalError {
        EvalError::new(EvalErrorKind::Panic(message.into()))
    }

    pub(crate) fn overflow() -> EvalError {
        EvalError::new(EvalErrorKind::Overflow)
    }
}

impl From<EvalErrorKind> for EvalError {
    fn from(kind: EvalErrorKind) -> EvalError {
        EvalError::new(kind)
    }
}

/// The variable bindings captured by one test frame when an error passed
/// through it.
#[derive(Debug, Clone)]
pub struct FrameReport {
    pub bindings: Vec<FrameBinding>,
}

/// One captured variable: its surface spelling, its type, and its value at
/// the time of failure — `None` when resolving the value itself failed.
#[derive(Debug, Clone)]
pub struct FrameBinding {
    pub display: EcoString,
    pub ty: Ty,
    pub value: Option<Value>,
}
