//! Runtime values.

use super::{env::Env, thunk::Thunk};
use crate::containers::graph::GraphValue;
use crate::props::Prop;
use crate::term::{NameId, RationalDisplay, Side, Term, Ty};
use num_bigint::BigInt;
use num_rational::BigRational;
use smallvec::SmallVec;
use std::rc::Rc;

/// The result of evaluation.
///
/// Containers carry their canonical representation (sorted, deduplicated /
/// counted) so structural comparison under the element type's ordering is
/// all that value equality needs. Lists have no container representation of
/// their own: a runtime list is the usual sum/pair encoding with lazy tails.
#[derive(Debug, Clone)]
pub enum Value {
    Unit,
    Num(RationalDisplay, BigRational),
    Inj(Side, Rc<Value>),
    /// Lazy per component: projecting one side forces only that side.
    Pair(Rc<Thunk>, Rc<Thunk>),
    Closure {
        params: SmallVec<[NameId; 4]>,
        body: Rc<Term>,
        env: Env,
    },
    /// A primitive operator awaiting its bundled argument, e.g. the `+`
    /// passed to `reduce`.
    Prim(crate::term::Op),
    /// Sorted, duplicate-free elements under the element type's ordering.
    Set(Rc<Vec<Value>>),
    /// Sorted distinct elements with positive multiplicities.
    Bag(Rc<Vec<(Value, u64)>>),
    /// Sorted unique keys under the key type's ordering.
    Map(Rc<Vec<(Value, Value)>>),
    /// Algebraic graph; adjacency is computed on demand.
    Graph(Rc<GraphValue>),
    /// First-class type value.
    TyVal(Ty),
    Prop(Rc<Prop>),
    /// A delayed computation, produced by `Delay` and consumed by `Force`.
    Thunk(Rc<Thunk>),
}

impl Value {
    pub fn num(q: BigRational) -> Value {
        Value::Num(RationalDisplay::Fraction, q)
    }

    pub fn nat(n: u64) -> Value {
        Value::num(BigRational::from_integer(BigInt::from(n)))
    }

    pub fn int_value(n: BigInt) -> Value {
        Value::num(BigRational::from_integer(n))
    }

    /// Booleans are sums over unit: `false = left unit`, `true = right unit`.
    pub fn bool_val(b: bool) -> Value {
        let side = if b { Side::R } else { Side::L };
        Value::Inj(side, Rc::new(Value::Unit))
    }

    /// `left unit`, the "absent" half of an option encoding.
    pub fn none() -> Value {
        Value::Inj(Side::L, Rc::new(Value::Unit))
    }

    /// `right v`, the "present" half of an option encoding.
    pub fn some(v: Value) -> Value {
        Value::Inj(Side::R, Rc::new(v))
    }

    /// The empty list: `left unit`.
    pub fn nil() -> Value {
        Value::Inj(Side::L, Rc::new(Value::Unit))
    }

    /// Strict cons cell: `right (head, tail)` with already-evaluated sides.
    pub fn cons(head: Value, tail: Value) -> Value {
        Value::Inj(
            Side::R,
            Rc::new(Value::Pair(Thunk::done(head), Thunk::done(tail))),
        )
    }

    /// A strict pair of already-evaluated values.
    pub fn pair(a: Value, b: Value) -> Value {
        Value::Pair(Thunk::done(a), Thunk::done(b))
    }

    /// Build a strict list from front to back.
    pub fn list_from<I>(items: I) -> Value
    where
        I: IntoIterator<Item = Value>,
        I::IntoIter: DoubleEndedIterator,
    {
        let mut acc = Value::nil();
        for item in items.into_iter().rev() {
            acc = Value::cons(item, acc);
        }
        acc
    }

    pub fn empty_map() -> Value {
        Value::Map(Rc::new(Vec::new()))
    }

    pub fn empty_graph() -> Value {
        Value::Graph(Rc::new(GraphValue::Empty))
    }
}
