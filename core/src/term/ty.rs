//! Runtime type descriptors and the numeric display-mode annotation.
//!
//! Certain primitive operators (equality, ordering, membership, power set,
//! merge, …) behave differently depending on the type of their operands. The
//! type checker resolves that type during desugaring and bakes a [`Ty`] into
//! the operator itself, so the evaluator never performs polymorphic structural
//! comparison: it always runs the algorithm the descriptor asks for.

use std::rc::Rc;

/// How a rational number prefers to be shown: as a fraction (`3/2`) or as a
/// (possibly repeating) decimal (`1.5`).
///
/// The annotation is purely presentational; the underlying value is always an
/// exact rational. When arithmetic combines two numbers, their modes combine
/// with [`RationalDisplay::merge`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RationalDisplay {
    #[default]
    Fraction,
    Decimal,
}

impl RationalDisplay {
    /// Combine two display modes: `Decimal` wins if either side is `Decimal`.
    ///
    /// Commutative, associative, idempotent, with `Fraction` as identity.
    pub fn merge(self, other: RationalDisplay) -> RationalDisplay {
        match (self, other) {
            (RationalDisplay::Fraction, RationalDisplay::Fraction) => RationalDisplay::Fraction,
            _ => RationalDisplay::Decimal,
        }
    }
}

/// A runtime type descriptor.
///
/// Descriptors are compile-time-resolved tags carried by type-indexed
/// operators, and also the payload of first-class type values (used by
/// `enumerate`/`count`). They are *not* the checker's types: effects,
/// polymorphism and user-defined names have already been erased.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Ty {
    Void,
    Unit,
    Bool,
    /// Natural numbers (non-negative integers).
    Nat,
    /// Integers.
    Int,
    /// Exact rationals.
    Rat,
    Sum(Rc<Ty>, Rc<Ty>),
    Prod(Rc<Ty>, Rc<Ty>),
    Fn(Rc<Ty>, Rc<Ty>),
    List(Rc<Ty>),
    Bag(Rc<Ty>),
    Set(Rc<Ty>),
    Map(Rc<Ty>, Rc<Ty>),
    Graph(Rc<Ty>),
    Prop,
}

impl Ty {
    pub fn sum(l: Ty, r: Ty) -> Ty {
        Ty::Sum(Rc::new(l), Rc::new(r))
    }

    pub fn prod(l: Ty, r: Ty) -> Ty {
        Ty::Prod(Rc::new(l), Rc::new(r))
    }

    pub fn list(elem: Ty) -> Ty {
        Ty::List(Rc::new(elem))
    }

    pub fn bag(elem: Ty) -> Ty {
        Ty::Bag(Rc::new(elem))
    }

    pub fn set(elem: Ty) -> Ty {
        Ty::Set(Rc::new(elem))
    }
}
