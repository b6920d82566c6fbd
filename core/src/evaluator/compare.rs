//! Type-indexed comparison.
//!
//! Ordering in Core is not polymorphic structural comparison: `Eq`/`Lt`
//! carry the operand type resolved at desugaring time, and each type has its
//! own comparison algorithm — numeric for the numeric tower (display modes
//! are ignored), `left < right` for sums, lexicographic for products and
//! lists, canonical-sequence comparison for containers, adjacency-summary
//! comparison for graphs. Comparison forces lazy pair components and list
//! tails as it goes, so it can fail with any evaluation error.

use super::{EvalError, Evaluator};
use crate::containers::graph::summary;
use crate::term::{Side, Ty};
use crate::values::Value;
use std::cmp::Ordering;

impl Evaluator {
    pub(crate) fn values_equal(
        &mut self,
        ty: &Ty,
        a: &Value,
        b: &Value,
    ) -> Result<bool, EvalError> {
        Ok(self.compare_values(ty, a, b)? == Ordering::Equal)
    }

    pub(crate) fn compare_values(
        &mut self,
        ty: &Ty,
        a: &Value,
        b: &Value,
    ) -> Result<Ordering, EvalError> {
        match ty {
            Ty::Void | Ty::Unit => Ok(Ordering::Equal),

            Ty::Nat | Ty::Int | Ty::Rat => match (a, b) {
                (Value::Num(_, x), Value::Num(_, y)) => Ok(x.cmp(y)),
                _ => Err(shape_error("number")),
            },

            Ty::Bool => match (self.as_inj(a)?, self.as_inj(b)?) {
                ((sa, _), (sb, _)) => Ok(side_rank(sa).cmp(&side_rank(sb))),
            },

            Ty::Sum(lt, rt) => {
                let (sa, pa) = self.as_inj(a)?;
                let (sb, pb) = self.as_inj(b)?;
                match side_rank(sa).cmp(&side_rank(sb)) {
                    Ordering::Equal => {
                        let payload_ty = if sa == Side::L { lt } else { rt };
                        self.compare_values(payload_ty, &pa, &pb)
                    }
                    order => Ok(order),
                }
            }

            Ty::Prod(ta, tb) => {
                let (a1, a2) = self.pair_parts(a)?;
                let (b1, b2) = self.pair_parts(b)?;
                match self.compare_values(ta, &a1, &b1)? {
                    Ordering::Equal => self.compare_values(tb, &a2, &b2),
                    order => Ok(order),
                }
            }

            Ty::List(elem) => {
                let mut a = a.clone();
                let mut b = b.clone();
                loop {
                    let (sa, pa) = self.as_inj(&a)?;
                    let (sb, pb) = self.as_inj(&b)?;
                    match (sa, sb) {
                        (Side::L, Side::L) => return Ok(Ordering::Equal),
                        (Side::L, Side::R) => return Ok(Ordering::Less),
                        (Side::R, Side::L) => return Ok(Ordering::Greater),
                        (Side::R, Side::R) => {
                            let (ha, ta) = self.pair_parts(&pa)?;
                            let (hb, tb) = self.pair_parts(&pb)?;
                            match self.compare_values(elem, &ha, &hb)? {
                                Ordering::Equal => {
                                    a = ta;
                                    b = tb;
                                }
                                order => return Ok(order),
                            }
                        }
                    }
                }
            }

            Ty::Set(elem) => {
                let xs = expect_set(a)?;
                let ys = expect_set(b)?;
                for (x, y) in xs.iter().zip(ys.iter()) {
                    match self.compare_values(elem, x, y)? {
                        Ordering::Equal => continue,
                        order => return Ok(order),
                    }
                }
                Ok(xs.len().cmp(&ys.len()))
            }

            Ty::Bag(elem) => {
                let xs = expect_bag(a)?;
                let ys = expect_bag(b)?;
                for ((x, nx), (y, ny)) in xs.iter().zip(ys.iter()) {
                    match self.compare_values(elem, x, y)? {
                        Ordering::Equal => match nx.cmp(ny) {
                            Ordering::Equal => continue,
                            order => return Ok(order),
                        },
                        order => return Ok(order),
                    }
                }
                Ok(xs.len().cmp(&ys.len()))
            }

            Ty::Map(kt, vt) => {
                let xs = expect_map(a)?;
                let ys = expect_map(b)?;
                for ((ka, va), (kb, vb)) in xs.iter().zip(ys.iter()) {
                    match self.compare_values(kt, ka, kb)? {
                        Ordering::Equal => match self.compare_values(vt, va, vb)? {
                            Ordering::Equal => continue,
                            order => return Ok(order),
                        },
                        order => return Ok(order),
                    }
                }
                Ok(xs.len().cmp(&ys.len()))
            }

            Ty::Graph(elem) => {
                let (ga, gb) = match (a, b) {
                    (Value::Graph(ga), Value::Graph(gb)) => (ga.clone(), gb.clone()),
                    _ => return Err(shape_error("graph")),
                };
                let sa = {
                    let mut cmp =
                        |x: &Value, y: &Value| self.compare_values(elem, x, y);
                    summary(&ga, &mut cmp)?
                };
                let sb = {
                    let mut cmp =
                        |x: &Value, y: &Value| self.compare_values(elem, x, y);
                    summary(&gb, &mut cmp)?
                };
                for ((va, succ_a), (vb, succ_b)) in sa.iter().zip(sb.iter()) {
                    match self.compare_values(elem, va, vb)? {
                        Ordering::Equal => {}
                        order => return Ok(order),
                    }
                    for (x, y) in succ_a.iter().zip(succ_b.iter()) {
                        match self.compare_values(elem, x, y)? {
                            Ordering::Equal => continue,
                            order => return Ok(order),
                        }
                    }
                    match succ_a.len().cmp(&succ_b.len()) {
                        Ordering::Equal => continue,
                        order => return Ok(order),
                    }
                }
                Ok(sa.len().cmp(&sb.len()))
            }

            Ty::Fn(..) | Ty::Prop => Err(EvalError::panic(
                "comparison at an uncomparable type",
            )),
        }
    }

    /// Unwrap an injection, forcing through nothing: sums are strict.
    fn as_inj(&mut self, v: &Value) -> Result<(Side, Value), EvalError> {
        match v {
            Value::Inj(side, payload) => Ok((*side, (**payload).clone())),
            _ => Err(shape_error("sum")),
        }
    }

    /// Force both components of a pair value.
    pub(crate) fn pair_parts(&mut self, v: &Value) -> Result<(Value, Value), EvalError> {
        match v {
            Value::Pair(l, r) => {
                let l = l.clone();
                let r = r.clone();
                Ok((self.force(&l)?, self.force(&r)?))
            }
            _ => Err(shape_error("pair")),
        }
    }
}

fn side_rank(side: Side) -> u8 {
    match side {
        Side::L => 0,
        Side::R => 1,
    }
}

fn shape_error(expected: &str) -> EvalError {
    EvalError::panic(format!("comparison expected a {expected} value"))
}

pub(crate) fn expect_set(v: &Value) -> Result<std::rc::Rc<Vec<Value>>, EvalError> {
    match v {
        Value::Set(elems) => Ok(elems.clone()),
        _ => Err(EvalError::panic("expected a set value")),
    }
}

pub(crate) fn expect_bag(v: &Value) -> Result<std::rc::Rc<Vec<(Value, u64)>>, EvalError> {
    match v {
        Value::Bag(items) => Ok(items.clone()),
        _ => Err(EvalError::panic("expected a bag value")),
    }
}

pub(crate) fn expect_map(v: &Value) -> Result<std::rc::Rc<Vec<(Value, Value)>>, EvalError> {
    match v {
        Value::Map(entries) => Ok(entries.clone()),
        _ => Err(EvalError::panic("expected a map value")),
    }
}
