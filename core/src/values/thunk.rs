//! Memoized thunks.

use super::{env::Env, value::Value};
use crate::term::Term;
use std::cell::RefCell;
use std::rc::Rc;

/// The state of a thunk. Transitions are monotone and happen exactly once:
/// `Suspended` → `InProgress` → `Done`. A thunk is never reset.
#[derive(Debug, Clone)]
pub enum ThunkState {
    /// A suspended computation with its captured environment.
    Suspended { term: Rc<Term>, env: Env },
    /// The black hole: this thunk is currently being forced. Re-entering it
    /// means evaluation depends on its own result.
    InProgress,
    /// The cached result; forcing again returns this without recomputation.
    Done(Value),
}

/// A mutable memoization cell for a suspended computation.
///
/// A thunk is shared (`Rc`) by every reference arising from the same binding
/// occurrence, so a function argument is evaluated at most once and the
/// result is seen by all later references. Evaluation is single-threaded;
/// the `RefCell` discipline is single-writer by construction.
#[derive(Debug)]
pub struct Thunk {
    pub(crate) cell: RefCell<ThunkState>,
}

impl Thunk {
    /// Wrap an unevaluated computation. O(1), never fails.
    pub fn suspended(term: Rc<Term>, env: Env) -> Rc<Thunk> {
        Rc::new(Thunk {
            cell: RefCell::new(ThunkState::Suspended { term, env }),
        })
    }

    /// A thunk that is already evaluated.
    pub fn done(value: Value) -> Rc<Thunk> {
        Rc::new(Thunk {
            cell: RefCell::new(ThunkState::Done(value)),
        })
    }

    /// The cached value, if this thunk has been forced to completion.
    pub fn value(&self) -> Option<Value> {
        match &*self.cell.borrow() {
            ThunkState::Done(v) => Some(v.clone()),
            _ => None,
        }
    }
}
