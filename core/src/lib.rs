//! Runtime core for the Rill teaching language.
//!
//! Rill programs are type-checked and desugared by external phases into a
//! small untyped intermediate representation ("Core", [`term::Term`]). This
//! crate reduces closed Core terms to values under call-by-need semantics:
//! every binding is a memoized thunk, forced at most once, with a black-hole
//! marker catching direct self-referential loops.
//!
//! ## Example
//!
//! ```
//! use std::rc::Rc;
//! use rill_core::{evaluator, term::{Op, Term}, values::Value};
//!
//! // 1 + 2, as the desugarer would emit it: Add applied to a bundled pair.
//! let one = Rc::new(Term::nat(1));
//! let two = Rc::new(Term::nat(2));
//! let sum = Rc::new(Term::App(
//!     Rc::new(Term::Prim(Op::Add)),
//!     vec![Rc::new(Term::Pair(one, two))],
//! ));
//! let value = evaluator::eval(&sum).unwrap();
//! assert!(matches!(value, Value::Num(..)));
//! ```

pub mod containers;
pub mod evaluator;
pub mod numeric;
pub mod props;
pub mod term;
pub mod values;
