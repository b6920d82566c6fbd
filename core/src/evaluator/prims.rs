//! Primitive operator dispatch.
//!
//! Every unary primitive receives its single bundled argument already forced
//! to weak head normal form; multi-argument primitives take a nested pair
//! and unpack it here. Type-indexed operators dispatch on the `Ty`
//! descriptor baked into the operator, never on the runtime shape.

use super::compare::{expect_bag, expect_map, expect_set};
use super::error::{EvalError, EvalErrorKind};
use super::eval::Evaluator;
use crate::containers::graph::{GraphValue, summary};
use crate::containers::{
    align_counts, bag_contains, canonical_bag, canonical_set, map_insert, map_lookup, power_bag,
    power_set, set_contains,
};
use crate::numeric;
use crate::props::{Prop, TestResult, enumerate};
use crate::term::{Op, RationalDisplay, Side, Ty};
use crate::values::{Thunk, Value};
use ecow::EcoString;
use num_rational::BigRational;
use num_traits::{Signed, ToPrimitive};
use std::cmp::Ordering;
use std::rc::Rc;

impl Evaluator {
    pub(crate) fn eval_op(&mut self, op: &Op, arg: Value) -> Result<Value, EvalError> {
        match op {
            Op::Id => Ok(arg),
            Op::Crash => Err(EvalErrorKind::Crash(self.decode_message(&arg)?).into()),
            Op::EmptyMap | Op::EmptyGraph | Op::MatchErr => {
                Err(EvalError::panic("nullary constant applied as a function"))
            }

            Op::Add => {
                let ((da, a), (db, b)) = self.num_pair(&arg)?;
                Ok(Value::Num(da.merge(db), a + b))
            }
            Op::Neg => {
                let (d, q) = num_of(&arg)?;
                Ok(Value::Num(d, -q))
            }
            Op::Sub(ty) => {
                let ((da, a), (db, b)) = self.num_pair(&arg)?;
                let r = numeric::sub(&a, &b, matches!(ty, Ty::Nat))?;
                Ok(Value::Num(da.merge(db), r))
            }
            Op::Mul => {
                let ((da, a), (db, b)) = self.num_pair(&arg)?;
                Ok(Value::Num(da.merge(db), a * b))
            }
            Op::Div => {
                let ((da, a), (db, b)) = self.num_pair(&arg)?;
                Ok(Value::Num(da.merge(db), numeric::checked_div(&a, &b)?))
            }
            Op::Exp => {
                let ((da, base), (db, e)) = self.num_pair(&arg)?;
                Ok(Value::Num(da.merge(db), numeric::exp(&base, &e)?))
            }
            Op::Mod => {
                let ((da, a), (db, b)) = self.num_pair(&arg)?;
                Ok(Value::Num(da.merge(db), numeric::modulo(&a, &b)?))
            }
            Op::Divides => {
                let ((_, a), (_, b)) = self.num_pair(&arg)?;
                Ok(Value::bool_val(numeric::divides(&a, &b)))
            }
            Op::Sqrt => {
                let (d, q) = num_of(&arg)?;
                Ok(Value::Num(d, numeric::int_sqrt(&q)?))
            }
            Op::Floor => {
                let (d, q) = num_of(&arg)?;
                Ok(Value::Num(d, numeric::floor(&q)))
            }
            Op::Ceil => {
                let (d, q) = num_of(&arg)?;
                Ok(Value::Num(d, numeric::ceil(&q)))
            }
            Op::Abs => {
                let (d, q) = num_of(&arg)?;
                Ok(Value::Num(d, numeric::abs(&q)))
            }
            Op::Fact => {
                let (d, q) = num_of(&arg)?;
                Ok(Value::Num(d, numeric::factorial(&q)?))
            }
            Op::Multinom => {
                let (n, ks) = self.pair_parts(&arg)?;
                let (d, n) = num_of(&n)?;
                let ks = self
                    .list_values(&ks)?
                    .iter()
                    .map(|v| Ok(num_of(v)?.1))
                    .collect::<Result<Vec<BigRational>, EvalError>>()?;
                Ok(Value::Num(d, numeric::multinomial(&n, &ks)?))
            }
            Op::IsPrime => {
                let (_, q) = num_of(&arg)?;
                Ok(Value::bool_val(numeric::is_prime(&q)?))
            }
            Op::Factor => {
                let (_, q) = num_of(&arg)?;
                let items = numeric::factor(&q)?
                    .into_iter()
                    .map(|(p, n)| (Value::num(BigRational::from_integer(p)), n))
                    .collect();
                // Factors come out ascending and distinct, so this is already
                // canonical bag form.
                Ok(Value::Bag(Rc::new(items)))
            }

            Op::Eq(ty) => {
                let (a, b) = self.pair_parts(&arg)?;
                Ok(Value::bool_val(self.values_equal(ty, &a, &b)?))
            }
            Op::Lt(ty) => {
                let (a, b) = self.pair_parts(&arg)?;
                Ok(Value::bool_val(
                    self.compare_values(ty, &a, &b)? == Ordering::Less,
                ))
            }

            Op::Enumerate => {
                let ty = type_arg(&arg)?;
                if enumerate::cardinality(&ty).is_none() {
                    return Err(EvalError::panic("cannot enumerate an infinite type"));
                }
                Ok(Value::list_from(
                    enumerate::domain(&ty)?.collect::<Vec<Value>>(),
                ))
            }
            Op::Count => {
                let ty = type_arg(&arg)?;
                match enumerate::cardinality(&ty) {
                    Some(n) => Ok(Value::num(BigRational::from_integer(n))),
                    None => Err(EvalError::panic("cannot count an infinite type")),
                }
            }

            Op::Size => match &arg {
                Value::Set(elems) => Ok(Value::nat(elems.len() as u64)),
                Value::Map(entries) => Ok(Value::nat(entries.len() as u64)),
                // Canonical bags hold one entry per distinct element.
                Value::Bag(items) => Ok(Value::nat(items.len() as u64)),
                Value::Inj(..) => {
                    let n = self.list_values(&arg)?.len() as u64;
                    Ok(Value::nat(n))
                }
                _ => Err(EvalError::panic("size of a non-container value")),
            },

            Op::ListToSet(ty) => {
                let elems = self.list_values(&arg)?;
                let mut cmp = |a: &Value, b: &Value| self.compare_values(ty, a, b);
                Ok(Value::Set(Rc::new(canonical_set(elems, &mut cmp)?)))
            }
            Op::ListToBag(ty) => {
                let items = self
                    .list_values(&arg)?
                    .into_iter()
                    .map(|v| (v, 1))
                    .collect();
                let mut cmp = |a: &Value, b: &Value| self.compare_values(ty, a, b);
                Ok(Value::Bag(Rc::new(canonical_bag(items, &mut cmp)?)))
            }
            Op::SetToList => {
                let elems = expect_set(&arg)?;
                Ok(Value::list_from(elems.iter().cloned().collect::<Vec<_>>()))
            }
            Op::BagToList => {
                let items = expect_bag(&arg)?;
                let mut out = Vec::new();
                for (v, n) in items.iter() {
                    for _ in 0..*n {
                        out.push(v.clone());
                    }
                }
                Ok(Value::list_from(out))
            }
            Op::BagToSet => {
                let items = expect_bag(&arg)?;
                Ok(Value::Set(Rc::new(
                    items.iter().map(|(v, _)| v.clone()).collect(),
                )))
            }
            Op::SetToBag => {
                let elems = expect_set(&arg)?;
                Ok(Value::Bag(Rc::new(
                    elems.iter().map(|v| (v.clone(), 1)).collect(),
                )))
            }
            Op::BagToCounts(_) => {
                let items = expect_bag(&arg)?;
                // Distinct first components keep the pair ordering canonical.
                Ok(Value::Set(Rc::new(
                    items
                        .iter()
                        .map(|(v, n)| Value::pair(v.clone(), Value::nat(*n)))
                        .collect(),
                )))
            }
            Op::CountsToBag(ty) => {
                let pairs = expect_set(&arg)?;
                let mut items = Vec::with_capacity(pairs.len());
                for entry in pairs.iter() {
                    let (elem, count) = self.pair_parts(entry)?;
                    items.push((elem, count_of(&count)?));
                }
                let mut cmp = |a: &Value, b: &Value| self.compare_values(ty, a, b);
                Ok(Value::Bag(Rc::new(canonical_bag(items, &mut cmp)?)))
            }
            Op::MapToSet => {
                let entries = expect_map(&arg)?;
                Ok(Value::Set(Rc::new(
                    entries
                        .iter()
                        .map(|(k, v)| Value::pair(k.clone(), v.clone()))
                        .collect(),
                )))
            }
            Op::SetToMap(key_ty) => {
                let pairs = expect_set(&arg)?;
                let mut entries: Vec<(Value, Value)> = Vec::new();
                for entry in pairs.iter() {
                    let (k, v) = self.pair_parts(entry)?;
                    let mut cmp = |a: &Value, b: &Value| self.compare_values(key_ty, a, b);
                    // Insert replaces, so a key duplicated in the set keeps
                    // its last binding in canonical order.
                    entries = map_insert(&entries, k, v, &mut cmp)?;
                }
                Ok(Value::Map(Rc::new(entries)))
            }
            Op::Insert(key_ty) => {
                let (k, rest) = self.pair_parts(&arg)?;
                let (v, m) = self.pair_parts(&rest)?;
                let entries = expect_map(&m)?;
                let mut cmp = |a: &Value, b: &Value| self.compare_values(key_ty, a, b);
                Ok(Value::Map(Rc::new(map_insert(&entries, k, v, &mut cmp)?)))
            }
            Op::Lookup(key_ty) => {
                let (k, m) = self.pair_parts(&arg)?;
                let entries = expect_map(&m)?;
                let mut cmp = |a: &Value, b: &Value| self.compare_values(key_ty, a, b);
                Ok(match map_lookup(&entries, &k, &mut cmp)? {
                    Some(v) => Value::some(v),
                    None => Value::none(),
                })
            }
            Op::Elem(ty) => {
                let (x, container) = self.pair_parts(&arg)?;
                match &container {
                    Value::Set(elems) => {
                        let elems = elems.clone();
                        let mut cmp = |a: &Value, b: &Value| self.compare_values(ty, a, b);
                        Ok(Value::bool_val(set_contains(&elems, &x, &mut cmp)?))
                    }
                    Value::Bag(items) => {
                        let items = items.clone();
                        let mut cmp = |a: &Value, b: &Value| self.compare_values(ty, a, b);
                        Ok(Value::bool_val(bag_contains(&items, &x, &mut cmp)?))
                    }
                    Value::Inj(..) => {
                        for v in self.list_values(&container)? {
                            if self.values_equal(ty, &x, &v)? {
                                return Ok(Value::bool_val(true));
                            }
                        }
                        Ok(Value::bool_val(false))
                    }
                    _ => Err(EvalError::panic("membership test on a non-container")),
                }
            }
            Op::Power(ty) => match &arg {
                Value::Set(elems) => {
                    let subsets: Vec<Value> = power_set(elems)
                        .into_iter()
                        .map(|s| Value::Set(Rc::new(s)))
                        .collect();
                    let set_ty = Ty::set(ty.clone());
                    let mut cmp = |a: &Value, b: &Value| self.compare_values(&set_ty, a, b);
                    Ok(Value::Set(Rc::new(canonical_set(subsets, &mut cmp)?)))
                }
                Value::Bag(items) => {
                    let subs: Vec<(Value, u64)> = power_bag(items)?
                        .into_iter()
                        .map(|(sub, mult)| (Value::Bag(Rc::new(sub)), mult))
                        .collect();
                    let bag_ty = Ty::bag(ty.clone());
                    let mut cmp = |a: &Value, b: &Value| self.compare_values(&bag_ty, a, b);
                    Ok(Value::Bag(Rc::new(canonical_bag(subs, &mut cmp)?)))
                }
                _ => Err(EvalError::panic("power of a non-set, non-bag value")),
            },
            Op::Merge(ty) => {
                let (f, rest) = self.pair_parts(&arg)?;
                let (c1, c2) = self.pair_parts(&rest)?;
                match (&c1, &c2) {
                    (Value::Set(xs), Value::Set(ys)) => {
                        let xs: Vec<(Value, u64)> =
                            xs.iter().map(|v| (v.clone(), 1)).collect();
                        let ys: Vec<(Value, u64)> =
                            ys.iter().map(|v| (v.clone(), 1)).collect();
                        let merged = self.merge_with(ty, &f, &xs, &ys)?;
                        Ok(Value::Set(Rc::new(
                            merged.into_iter().map(|(v, _)| v).collect(),
                        )))
                    }
                    (Value::Bag(xs), Value::Bag(ys)) => {
                        let xs = xs.as_ref().clone();
                        let ys = ys.as_ref().clone();
                        Ok(Value::Bag(Rc::new(self.merge_with(ty, &f, &xs, &ys)?)))
                    }
                    _ => Err(EvalError::panic("merge expects two sets or two bags")),
                }
            }
            Op::Each(out_ty) => {
                let (f, container) = self.pair_parts(&arg)?;
                match &container {
                    Value::Inj(..) => {
                        let mut out = Vec::new();
                        for v in self.list_values(&container)? {
                            out.push(self.apply1(&f, v)?);
                        }
                        Ok(Value::list_from(out))
                    }
                    Value::Set(elems) => {
                        let inputs = elems.as_ref().clone();
                        let mut mapped = Vec::with_capacity(inputs.len());
                        for v in inputs {
                            mapped.push(self.apply1(&f, v)?);
                        }
                        let mut cmp = |a: &Value, b: &Value| self.compare_values(out_ty, a, b);
                        Ok(Value::Set(Rc::new(canonical_set(mapped, &mut cmp)?)))
                    }
                    Value::Bag(items) => {
                        let inputs = items.as_ref().clone();
                        let mut mapped = Vec::with_capacity(inputs.len());
                        for (v, n) in inputs {
                            mapped.push((self.apply1(&f, v)?, n));
                        }
                        let mut cmp = |a: &Value, b: &Value| self.compare_values(out_ty, a, b);
                        Ok(Value::Bag(Rc::new(canonical_bag(mapped, &mut cmp)?)))
                    }
                    _ => Err(EvalError::panic("each over a non-container value")),
                }
            }
            Op::Reduce => {
                let (f, rest) = self.pair_parts(&arg)?;
                let (z, container) = self.pair_parts(&rest)?;
                let mut acc = z;
                for v in self.container_elems(&container)? {
                    acc = self.apply1(&f, Value::pair(acc, v))?;
                }
                Ok(acc)
            }
            Op::Filter => {
                let (p, container) = self.pair_parts(&arg)?;
                match &container {
                    Value::Inj(..) => {
                        let mut out = Vec::new();
                        for v in self.list_values(&container)? {
                            if bool_of(&self.apply1(&p, v.clone())?)? {
                                out.push(v);
                            }
                        }
                        Ok(Value::list_from(out))
                    }
                    // A subsequence of a canonical sequence stays canonical.
                    Value::Set(elems) => {
                        let inputs = elems.as_ref().clone();
                        let mut out = Vec::new();
                        for v in inputs {
                            if bool_of(&self.apply1(&p, v.clone())?)? {
                                out.push(v);
                            }
                        }
                        Ok(Value::Set(Rc::new(out)))
                    }
                    Value::Bag(items) => {
                        let inputs = items.as_ref().clone();
                        let mut out = Vec::new();
                        for (v, n) in inputs {
                            if bool_of(&self.apply1(&p, v.clone())?)? {
                                out.push((v, n));
                            }
                        }
                        Ok(Value::Bag(Rc::new(out)))
                    }
                    _ => Err(EvalError::panic("filter over a non-container value")),
                }
            }
            Op::Join(ty) => match &arg {
                Value::Inj(..) => {
                    let mut out = Vec::new();
                    for inner in self.list_values(&arg)? {
                        out.extend(self.list_values(&inner)?);
                    }
                    Ok(Value::list_from(out))
                }
                Value::Set(sets) => {
                    let mut elems = Vec::new();
                    for inner in sets.iter() {
                        elems.extend(expect_set(inner)?.iter().cloned());
                    }
                    let mut cmp = |a: &Value, b: &Value| self.compare_values(ty, a, b);
                    Ok(Value::Set(Rc::new(canonical_set(elems, &mut cmp)?)))
                }
                Value::Bag(bags) => {
                    let mut items = Vec::new();
                    for (inner, outer_n) in bags.iter() {
                        for (v, n) in expect_bag(inner)?.iter() {
                            let scaled =
                                n.checked_mul(*outer_n).ok_or(EvalError::overflow())?;
                            items.push((v.clone(), scaled));
                        }
                    }
                    let mut cmp = |a: &Value, b: &Value| self.compare_values(ty, a, b);
                    Ok(Value::Bag(Rc::new(canonical_bag(items, &mut cmp)?)))
                }
                _ => Err(EvalError::panic("join of a non-container value")),
            },

            Op::Vertex => Ok(Value::Graph(Rc::new(GraphValue::Vertex(arg)))),
            Op::Overlay => {
                let (a, b) = self.pair_parts(&arg)?;
                Ok(Value::Graph(Rc::new(GraphValue::Overlay(
                    graph_of(&a)?,
                    graph_of(&b)?,
                ))))
            }
            Op::Connect => {
                let (a, b) = self.pair_parts(&arg)?;
                Ok(Value::Graph(Rc::new(GraphValue::Connect(
                    graph_of(&a)?,
                    graph_of(&b)?,
                ))))
            }
            Op::Summary(ty) => {
                let graph = graph_of(&arg)?;
                let adjacency = {
                    let mut cmp = |a: &Value, b: &Value| self.compare_values(ty, a, b);
                    summary(&graph, &mut cmp)?
                };
                Ok(Value::Map(Rc::new(
                    adjacency
                        .into_iter()
                        .map(|(v, succ)| (v, Value::Set(Rc::new(succ))))
                        .collect(),
                )))
            }

            Op::Forall(tys) => Ok(Value::Prop(Rc::new(Prop::Quant {
                universal: true,
                tys: tys.clone(),
                closure: arg,
            }))),
            Op::Exists(tys) => Ok(Value::Prop(Rc::new(Prop::Quant {
                universal: false,
                tys: tys.clone(),
                closure: arg,
            }))),
            Op::Holds => {
                let prop = prop_of(&arg)?;
                let result = self.resolve_prop(&prop)?;
                Ok(Value::bool_val(result.passed))
            }
            Op::NotProp => Ok(Value::Prop(Rc::new(Prop::Not(prop_of(&arg)?)))),
            Op::ShouldEq(ty) => {
                let (a, b) = self.pair_parts(&arg)?;
                let passed = self.values_equal(ty, &a, &b)?;
                Ok(Value::Prop(Rc::new(Prop::Done(TestResult {
                    passed,
                    exhaustive: true,
                    witness: vec![(ty.clone(), a), (ty.clone(), b)],
                }))))
            }
        }
    }

    /// Apply a function value to a single already-evaluated argument.
    pub(crate) fn apply1(&mut self, f: &Value, arg: Value) -> Result<Value, EvalError> {
        self.apply_value(f, vec![Thunk::done(arg)])
    }

    /// Align two bags and combine each count pair with the numeric function
    /// `f`, keeping elements whose combined count is positive.
    fn merge_with(
        &mut self,
        ty: &Ty,
        f: &Value,
        xs: &[(Value, u64)],
        ys: &[(Value, u64)],
    ) -> Result<Vec<(Value, u64)>, EvalError> {
        let aligned = {
            let mut cmp = |a: &Value, b: &Value| self.compare_values(ty, a, b);
            align_counts(xs, ys, &mut cmp)?
        };
        let mut out = Vec::with_capacity(aligned.len());
        for (elem, a, b) in aligned {
            let combined = self.apply1(f, Value::pair(Value::nat(a), Value::nat(b)))?;
            let n = count_of(&combined)?;
            if n > 0 {
                out.push((elem, n));
            }
        }
        Ok(out)
    }

    fn num_pair(
        &mut self,
        arg: &Value,
    ) -> Result<((RationalDisplay, BigRational), (RationalDisplay, BigRational)), EvalError> {
        let (a, b) = self.pair_parts(arg)?;
        Ok((num_of(&a)?, num_of(&b)?))
    }

    /// Materialize a list's spine, forcing tails (and heads, through the
    /// pair thunks) as it goes.
    pub(crate) fn list_values(&mut self, list: &Value) -> Result<Vec<Value>, EvalError> {
        let mut out = Vec::new();
        let mut cur = list.clone();
        loop {
            match &cur {
                Value::Inj(Side::L, _) => return Ok(out),
                Value::Inj(Side::R, cell) => {
                    let (head, tail) = self.pair_parts(cell)?;
                    out.push(head);
                    cur = tail;
                }
                _ => return Err(EvalError::panic("expected a list value")),
            }
        }
    }

    /// The elements a fold or membership walk sees: list order for lists,
    /// canonical order for sets, canonical order with each element repeated
    /// by its multiplicity for bags.
    fn container_elems(&mut self, container: &Value) -> Result<Vec<Value>, EvalError> {
        match container {
            Value::Inj(..) => self.list_values(container),
            Value::Set(elems) => Ok(elems.as_ref().clone()),
            Value::Bag(items) => {
                let mut out = Vec::new();
                for (v, n) in items.iter() {
                    for _ in 0..*n {
                        out.push(v.clone());
                    }
                }
                Ok(out)
            }
            _ => Err(EvalError::panic("expected a list, set or bag")),
        }
    }

    /// A crash message is a list of Unicode scalar values.
    fn decode_message(&mut self, arg: &Value) -> Result<EcoString, EvalError> {
        let mut msg = String::new();
        for v in self.list_values(arg)? {
            let (_, q) = num_of(&v)?;
            if !q.is_integer() {
                return Err(EvalError::panic("invalid character in crash message"));
            }
            let c = q
                .to_integer()
                .to_u32()
                .and_then(char::from_u32)
                .ok_or_else(|| EvalError::panic("invalid character in crash message"))?;
            msg.push(c);
        }
        Ok(msg.into())
    }
}

fn num_of(v: &Value) -> Result<(RationalDisplay, BigRational), EvalError> {
    match v {
        Value::Num(d, q) => Ok((*d, q.clone())),
        _ => Err(EvalError::panic("expected a number")),
    }
}

fn bool_of(v: &Value) -> Result<bool, EvalError> {
    match v {
        Value::Inj(side, _) => Ok(*side == Side::R),
        _ => Err(EvalError::panic("expected a boolean")),
    }
}

fn type_arg(v: &Value) -> Result<Ty, EvalError> {
    match v {
        Value::TyVal(ty) => Ok(ty.clone()),
        _ => Err(EvalError::panic("expected a type value")),
    }
}

fn graph_of(v: &Value) -> Result<Rc<GraphValue>, EvalError> {
    match v {
        Value::Graph(g) => Ok(g.clone()),
        _ => Err(EvalError::panic("expected a graph value")),
    }
}

fn prop_of(v: &Value) -> Result<Rc<Prop>, EvalError> {
    match v {
        Value::Prop(p) => Ok(p.clone()),
        _ => Err(EvalError::panic("expected a proposition value")),
    }
}

/// A count must be a natural that fits `u64`.
fn count_of(v: &Value) -> Result<u64, EvalError> {
    let (_, q) = num_of(v)?;
    if !q.is_integer() || q.is_negative() {
        return Err(EvalError::panic("count is not a natural number"));
    }
    q.to_integer().to_u64().ok_or(EvalError::overflow())
}
