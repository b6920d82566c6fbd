//! Core evaluation logic.

use super::{EvalError, EvalErrorKind, EvaluatorOptions, FrameBinding, FrameReport};
use crate::term::{NameId, Op, Side, Term, TestVar, arity};
use crate::values::{Env, Thunk, ThunkState, Value};
use std::rc::Rc;
use tracing::trace;

/// Evaluator for closed Core terms.
pub struct Evaluator {
    options: EvaluatorOptions,
    depth: usize,
}

impl Evaluator {
    pub fn new(options: EvaluatorOptions) -> Evaluator {
        Evaluator { options, depth: 0 }
    }

    pub(crate) fn options(&self) -> &EvaluatorOptions {
        &self.options
    }

    /// Evaluate a term to a value (weak head normal form: pair components
    /// and delayed computations inside the result stay unevaluated).
    pub fn eval_term(&mut self, term: &Rc<Term>, env: &Env) -> Result<Value, EvalError> {
        // Check depth before recursing
        if self.depth >= self.options.max_depth {
            return Err(EvalErrorKind::StackOverflow {
                depth: self.depth,
                max_depth: self.options.max_depth,
            }
            .into());
        }

        self.depth += 1;
        let result = self.eval_inner(term, env);
        self.depth -= 1;

        result
    }

    /// Force a thunk to a value.
    ///
    /// Already-evaluated thunks return the cached value without any
    /// recomputation. A suspended thunk transitions to the black hole,
    /// evaluates, and caches the result. Forcing a thunk that is already in
    /// progress means the computation depends on its own result.
    pub fn force(&mut self, thunk: &Rc<Thunk>) -> Result<Value, EvalError> {
        {
            let state = thunk.cell.borrow();
            match &*state {
                ThunkState::Done(value) => return Ok(value.clone()),
                ThunkState::InProgress => {
                    return Err(EvalErrorKind::InfiniteLoop.into());
                }
                ThunkState::Suspended { .. } => {}
            }
        }

        let (term, env) = match thunk.cell.replace(ThunkState::InProgress) {
            ThunkState::Suspended { term, env } => (term, env),
            _ => unreachable!("thunk state changed between borrow and replace"),
        };
        trace!("forcing suspended thunk");
        let value = self.eval_term(&term, &env)?;
        thunk.cell.replace(ThunkState::Done(value.clone()));
        Ok(value)
    }

    fn eval_inner(&mut self, term: &Rc<Term>, env: &Env) -> Result<Value, EvalError> {
        match &**term {
            Term::Var(name) => match env.lookup(*name) {
                Some(thunk) => {
                    let thunk = thunk.clone();
                    self.force(&thunk)
                }
                None => Err(EvalErrorKind::Unbound(*name).into()),
            },

            Term::Num(display, q) => Ok(Value::Num(*display, q.clone())),

            Term::Unit => Ok(Value::Unit),

            Term::TyLit(ty) => Ok(Value::TyVal(ty.clone())),

            Term::Prim(op) => {
                if arity(op) == 0 {
                    self.eval_nullary(op)
                } else {
                    // A bare unary primitive is a function value, e.g. the
                    // `+` handed to `reduce`.
                    Ok(Value::Prim(op.clone()))
                }
            }

            Term::Inj(side, payload) => {
                let value = self.eval_term(payload, env)?;
                Ok(Value::Inj(*side, Rc::new(value)))
            }

            Term::Case {
                scrutinee,
                left,
                right,
            } => {
                let scrutinee = self.eval_term(scrutinee, env)?;
                let Value::Inj(side, payload) = scrutinee else {
                    return Err(EvalError::panic("case on a non-sum value"));
                };
                let (name, branch) = match side {
                    Side::L => left,
                    Side::R => right,
                };
                let env = env.bind(*name, Thunk::done((*payload).clone()));
                self.eval_term(branch, &env)
            }

            Term::Pair(a, b) => Ok(Value::Pair(
                Thunk::suspended(a.clone(), env.clone()),
                Thunk::suspended(b.clone(), env.clone()),
            )),

            Term::Proj(side, pair) => {
                let pair = self.eval_term(pair, env)?;
                let Value::Pair(l, r) = pair else {
                    return Err(EvalError::panic("projection from a non-pair value"));
                };
                let component = match side {
                    Side::L => l,
                    Side::R => r,
                };
                self.force(&component)
            }

            Term::Abs(params, body) => Ok(Value::Closure {
                params: params.clone(),
                body: body.clone(),
                env: env.clone(),
            }),

            Term::App(fun, args) => {
                let fun = self.eval_term(fun, env)?;
                // One fresh thunk per argument, over the caller's
                // environment: call-by-need, forced at most once.
                let args: Vec<Rc<Thunk>> = args
                    .iter()
                    .map(|arg| Thunk::suspended(arg.clone(), env.clone()))
                    .collect();
                self.apply_value(&fun, args)
            }

            Term::Test { vars, body } => match self.eval_term(body, env) {
                Ok(value) => Ok(value),
                Err(mut error) => {
                    error.frames.push(self.resolve_frame(vars, env));
                    Err(error)
                }
            },

            Term::Delay(name, body) => {
                // The delayed computation's environment binds the name to the
                // computation's own thunk, so `Delay(x, Var(x))` forces back
                // into itself and trips the black hole.
                let thunk = Rc::new(Thunk {
                    cell: std::cell::RefCell::new(ThunkState::InProgress),
                });
                let inner = env.bind(*name, thunk.clone());
                thunk.cell.replace(ThunkState::Suspended {
                    term: body.clone(),
                    env: inner,
                });
                Ok(Value::Thunk(thunk))
            }

            Term::Force(delayed) => {
                let value = self.eval_term(delayed, env)?;
                let Value::Thunk(thunk) = value else {
                    return Err(EvalError::panic("force of a non-delayed value"));
                };
                self.force(&thunk)
            }
        }
    }

    /// Apply a function value to already-allocated argument thunks.
    pub(crate) fn apply_value(
        &mut self,
        fun: &Value,
        args: Vec<Rc<Thunk>>,
    ) -> Result<Value, EvalError> {
        match fun {
            Value::Closure { params, body, env } => {
                if params.len() != args.len() {
                    return Err(EvalError::panic("arity mismatch in application"));
                }
                let mut env = env.clone();
                for (param, arg) in params.iter().zip(args) {
                    env = env.bind(*param, arg);
                }
                self.eval_term(&body.clone(), &env)
            }
            Value::Prim(op) => {
                let [arg] = args.as_slice() else {
                    return Err(EvalError::panic("primitive applied to wrong argument count"));
                };
                let arg = self.force(arg)?;
                self.eval_op(&op.clone(), arg)
            }
            _ => Err(EvalError::panic("application of a non-function value")),
        }
    }

    fn eval_nullary(&mut self, op: &Op) -> Result<Value, EvalError> {
        match op {
            Op::EmptyMap => Ok(Value::empty_map()),
            Op::EmptyGraph => Ok(Value::empty_graph()),
            Op::MatchErr => Err(EvalErrorKind::NonExhaustive.into()),
            _ => unreachable!("nullary dispatch on unary operator"),
        }
    }

    /// Resolve a test frame's captured variables, best-effort: a binding
    /// whose thunk fails to force is reported as unavailable rather than
    /// aborting the report.
    fn resolve_frame(&mut self, vars: &[TestVar], env: &Env) -> FrameReport {
        let bindings = vars
            .iter()
            .map(|var| FrameBinding {
                display: var.display.clone(),
                ty: var.ty.clone(),
                value: self.resolve_binding(var.name, env),
            })
            .collect();
        FrameReport { bindings }
    }

    fn resolve_binding(&mut self, name: NameId, env: &Env) -> Option<Value> {
        let thunk = env.lookup(name)?.clone();
        self.force(&thunk).ok()
    }
}
