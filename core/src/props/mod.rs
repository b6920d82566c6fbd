//! Propositions and quantifier search.
//!
//! A proposition is a first-class value: quantified props stay symbolic
//! until something demands a verdict. Resolution searches the quantified
//! domains in the deterministic order [`enumerate::domain`] defines,
//! stopping at the first decisive assignment. Finite domains are covered
//! completely; infinite ones are sampled up to the evaluator's search
//! limit, and the verdict records whether coverage was exhaustive.

pub mod enumerate;

use crate::evaluator::{EvalError, Evaluator};
use crate::term::{Side, Ty};
use crate::values::{Thunk, Value};
use std::rc::Rc;
use tracing::debug;

/// A proposition value.
#[derive(Debug, Clone)]
pub enum Prop {
    /// Already decided, no search needed.
    Done(TestResult),
    /// A quantifier over one or more domains, with the body captured as a
    /// function value taking one argument per domain.
    Quant {
        universal: bool,
        tys: Vec<Ty>,
        closure: Value,
    },
    Not(Rc<Prop>),
}

/// The verdict of resolving a proposition.
#[derive(Debug, Clone)]
pub struct TestResult {
    pub passed: bool,
    /// Whether the search covered the whole domain. A decisive assignment
    /// (a counterexample for `forall`, a witness for `exists`) is always
    /// definitive, so `exhaustive` is true in that case even when the
    /// domain is infinite.
    pub exhaustive: bool,
    /// The variable assignment behind the verdict, outermost quantifier
    /// first. For `should-eq` this holds both compared values.
    pub witness: Vec<(Ty, Value)>,
}

impl TestResult {
    pub fn certain(passed: bool) -> TestResult {
        TestResult {
            passed,
            exhaustive: true,
            witness: Vec::new(),
        }
    }
}

impl Evaluator {
    /// Decide a proposition, searching quantified domains as needed.
    pub fn resolve_prop(&mut self, prop: &Prop) -> Result<TestResult, EvalError> {
        match prop {
            Prop::Done(result) => Ok(result.clone()),
            Prop::Not(inner) => {
                let mut result = self.resolve_prop(inner)?;
                result.passed = !result.passed;
                Ok(result)
            }
            Prop::Quant {
                universal,
                tys,
                closure,
            } => {
                let mut bound = Vec::new();
                self.search(*universal, tys, closure, &mut bound)
            }
        }
    }

    /// Depth-first search over the remaining quantified domains. `bound`
    /// holds the assignment so far, outermost first.
    fn search(
        &mut self,
        universal: bool,
        tys: &[Ty],
        closure: &Value,
        bound: &mut Vec<(Ty, Value)>,
    ) -> Result<TestResult, EvalError> {
        let Some((ty, rest)) = tys.split_first() else {
            let args = bound
                .iter()
                .map(|(_, v)| Thunk::done(v.clone()))
                .collect();
            let outcome = self.apply_value(closure, args)?;
            let mut result = self.verdict(outcome)?;
            if result.passed != universal {
                // Decisive: record the assignment that got us here.
                let mut witness = bound.clone();
                witness.append(&mut result.witness);
                result.witness = witness;
            }
            return Ok(result);
        };

        let finite = enumerate::cardinality(ty).is_some();
        let limit = if finite {
            usize::MAX
        } else {
            self.options().search_limit
        };
        let mut exhaustive = true;
        let mut candidates = enumerate::domain(ty)?;
        let mut taken = 0;
        while let Some(candidate) = candidates.next() {
            if taken >= limit {
                debug!(limit, "quantifier search truncated on an infinite domain");
                exhaustive = false;
                break;
            }
            taken += 1;
            bound.push((ty.clone(), candidate));
            let sub = self.search(universal, rest, closure, bound)?;
            bound.pop();
            if sub.passed != universal {
                // Counterexample for forall, witness for exists.
                return Ok(sub);
            }
            if !sub.exhaustive {
                exhaustive = false;
            }
        }
        Ok(TestResult {
            passed: universal,
            exhaustive,
            witness: Vec::new(),
        })
    }

    /// Interpret a quantifier body's result: a nested prop is resolved
    /// recursively, a boolean stands for itself.
    fn verdict(&mut self, outcome: Value) -> Result<TestResult, EvalError> {
        match outcome {
            Value::Prop(prop) => self.resolve_prop(&prop),
            Value::Inj(side, _) => Ok(TestResult::certain(side == Side::R)),
            _ => Err(EvalError::panic(
                "a quantifier body must produce a boolean or a proposition",
            )),
        }
    }
}
