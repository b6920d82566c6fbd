//! The Core term algebra.
//!
//! Core is the desugared, untyped intermediate representation handed to the
//! evaluator. Terms are closed: the desugarer assigns every binder a unique
//! [`NameId`] and every variable occurrence refers to one, so evaluation
//! never compares name strings and never substitutes — environments are keyed
//! by id. An unbound id is still a defined runtime failure (the desugarer can
//! in principle be buggy), not undefined behavior.

mod op;
mod ty;

pub use op::{Op, arity};
pub use ty::{RationalDisplay, Ty};

use ecow::EcoString;
use num_bigint::BigInt;
use num_rational::BigRational;
use smallvec::SmallVec;
use std::rc::Rc;

/// A unique binder identifier, assigned at desugaring time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NameId(pub u32);

/// Injection tag for sums; also selects a pair component in projections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Side {
    L,
    R,
}

/// A variable captured by a test frame for diagnostic reporting.
#[derive(Debug, Clone, PartialEq)]
pub struct TestVar {
    /// Surface spelling, used only in failure reports.
    pub display: EcoString,
    pub ty: Ty,
    pub name: NameId,
}

/// A closed Core term.
#[derive(Debug, Clone, PartialEq)]
pub enum Term {
    Var(NameId),
    /// Exact rational literal with its display-mode annotation.
    Num(RationalDisplay, BigRational),
    Prim(Op),
    /// Tagged injection into a sum. The payload is evaluated; the tag is not.
    Inj(Side, Rc<Term>),
    /// Case split on a sum, binding the payload in the matching branch.
    Case {
        scrutinee: Rc<Term>,
        left: (NameId, Rc<Term>),
        right: (NameId, Rc<Term>),
    },
    Unit,
    /// Pairs are lazy per component: each side becomes a thunk.
    Pair(Rc<Term>, Rc<Term>),
    Proj(Side, Rc<Term>),
    /// Multi-argument lambda binding an ordered sequence of names.
    Abs(SmallVec<[NameId; 4]>, Rc<Term>),
    /// Application; argument count matches the binder count (guaranteed by
    /// the type checker).
    App(Rc<Term>, Vec<Rc<Term>>),
    /// A property-test frame: evaluates `body` and, on failure, reports the
    /// current values of `vars`.
    Test {
        vars: Vec<TestVar>,
        body: Rc<Term>,
    },
    /// First-class type literal, consumed by `enumerate`/`count`.
    TyLit(Ty),
    /// A delayed computation. The bound name refers to the computation's own
    /// thunk, so `Delay(x, Var(x))` is the canonical direct self-reference.
    Delay(NameId, Rc<Term>),
    /// Force a delayed computation produced by `Delay`.
    Force(Rc<Term>),
}

impl Term {
    /// Natural-number literal with fraction display.
    pub fn nat(n: u64) -> Term {
        Term::Num(
            RationalDisplay::Fraction,
            BigRational::from_integer(BigInt::from(n)),
        )
    }

    /// Integer literal with fraction display.
    pub fn int(n: i64) -> Term {
        Term::Num(
            RationalDisplay::Fraction,
            BigRational::from_integer(BigInt::from(n)),
        )
    }
}
