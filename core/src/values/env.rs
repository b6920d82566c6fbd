//! Evaluation environments.

use super::thunk::Thunk;
use crate::term::NameId;
use std::rc::Rc;

/// A persistent map from binder id to thunk.
///
/// Names bind thunks, not values: looking a variable up forces its thunk, so
/// arguments are passed call-by-need. Extension returns a new environment;
/// cloning for closure capture is O(1).
#[derive(Debug, Clone, Default)]
pub struct Env {
    bindings: im::HashMap<NameId, Rc<Thunk>>,
}

impl Env {
    pub fn new() -> Env {
        Env::default()
    }

    pub fn lookup(&self, name: NameId) -> Option<&Rc<Thunk>> {
        self.bindings.get(&name)
    }

    /// Extend with one binding, shadowing any previous one.
    pub fn bind(&self, name: NameId, thunk: Rc<Thunk>) -> Env {
        Env {
            bindings: self.bindings.update(name, thunk),
        }
    }
}
