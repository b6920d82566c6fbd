//! Deterministic enumeration of type domains.
//!
//! Quantifier search needs a reproducible order, so every domain enumerates
//! deterministically: naturals ascend from zero, integers alternate
//! `0, 1, -1, 2, -2, …`, rationals walk the Calkin–Wilf tree (each positive
//! rational exactly once) interleaved with negations, sums go left before
//! right, products zig-zag diagonally so infinite components still make
//! progress, and lists grow by length. For finite types the enumeration
//! order coincides with the type's canonical ordering.

use crate::containers::power_set;
use crate::evaluator::EvalError;
use crate::term::{Side, Ty};
use crate::values::Value;
use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, ToPrimitive, Zero};
use std::rc::Rc;

/// How many elements of an infinite element domain list/set enumeration
/// draws from. Lengths still grow without bound; only the alphabet is
/// truncated.
const ELEM_PREFIX: usize = 16;

/// Number of inhabitants of a type, or `None` when infinite (or too large to
/// distinguish from infinite).
pub fn cardinality(ty: &Ty) -> Option<BigInt> {
    match ty {
        Ty::Void => Some(BigInt::zero()),
        Ty::Unit => Some(BigInt::one()),
        Ty::Bool => Some(BigInt::from(2)),
        Ty::Nat | Ty::Int | Ty::Rat | Ty::Prop => None,
        Ty::Sum(l, r) => Some(cardinality(l)? + cardinality(r)?),
        Ty::Prod(l, r) => Some(cardinality(l)? * cardinality(r)?),
        Ty::Fn(a, b) => {
            let exponent = cardinality(a)?.to_u32()?;
            Some(cardinality(b)?.pow(exponent))
        }
        Ty::List(elem) | Ty::Bag(elem) | Ty::Graph(elem) => {
            if cardinality(elem)?.is_zero() {
                // Only the empty list/bag/graph exists.
                Some(BigInt::one())
            } else {
                None
            }
        }
        Ty::Set(elem) => {
            let n = cardinality(elem)?.to_u32()?;
            Some(BigInt::from(2).pow(n))
        }
        Ty::Map(k, v) => {
            let keys = cardinality(k)?.to_u32()?;
            Some((cardinality(v)? + BigInt::one()).pow(keys))
        }
    }
}

/// Enumerate the inhabitants of a type. Infinite domains yield an unbounded
/// iterator; the caller truncates. Fails for domains the runtime cannot
/// enumerate (functions, props, maps, graphs, containers of infinite types).
pub fn domain(ty: &Ty) -> Result<Box<dyn Iterator<Item = Value>>, EvalError> {
    match ty {
        Ty::Void => Ok(Box::new(std::iter::empty())),
        Ty::Unit => Ok(Box::new(std::iter::once(Value::Unit))),
        Ty::Bool => Ok(Box::new(
            [Value::bool_val(false), Value::bool_val(true)].into_iter(),
        )),

        Ty::Nat => Ok(Box::new(
            std::iter::successors(Some(BigInt::zero()), |n| Some(n + 1))
                .map(|n| Value::int_value(n)),
        )),

        Ty::Int => Ok(Box::new(
            std::iter::once(BigInt::zero())
                .chain(
                    std::iter::successors(Some(BigInt::one()), |n| Some(n + 1))
                        .flat_map(|n| [n.clone(), -n]),
                )
                .map(Value::int_value),
        )),

        Ty::Rat => {
            // Calkin–Wilf: q' = 1 / (2⌊q⌋ + 1 − q) visits every positive
            // rational exactly once, starting from 1.
            let positives = std::iter::successors(Some(BigRational::one()), |q| {
                let two_floor = q.floor() * BigRational::from_integer(BigInt::from(2));
                Some((two_floor + BigRational::one() - q).recip())
            });
            Ok(Box::new(
                std::iter::once(BigRational::zero())
                    .chain(positives.flat_map(|q| [q.clone(), -q]))
                    .map(Value::num),
            ))
        }

        Ty::Sum(l, r) => {
            let left = domain(l)?.map(|v| Value::Inj(Side::L, Rc::new(v)));
            let right = domain(r)?.map(|v| Value::Inj(Side::R, Rc::new(v)));
            if cardinality(l).is_some() {
                Ok(Box::new(left.chain(right)))
            } else {
                Ok(Box::new(Interleave {
                    a: Box::new(left),
                    b: Box::new(right),
                    from_a: true,
                    a_done: false,
                    b_done: false,
                }))
            }
        }

        Ty::Prod(l, r) => {
            if cardinality(l).is_some() && cardinality(r).is_some() {
                let rights: Vec<Value> = domain(r)?.collect();
                let left = domain(l)?;
                Ok(Box::new(left.flat_map(move |a| {
                    let a = a.clone();
                    rights
                        .clone()
                        .into_iter()
                        .map(move |b| Value::pair(a.clone(), b))
                })))
            } else {
                Ok(Box::new(Diagonal::new(domain(l)?, domain(r)?)))
            }
        }

        Ty::List(elem) => Ok(Box::new(Lists {
            elems: alphabet(elem)?,
            counters: Vec::new(),
            started: false,
        })),

        Ty::Set(elem) => {
            if cardinality(elem).is_none() {
                return Err(EvalError::panic(
                    "cannot enumerate sets over an infinite type",
                ));
            }
            let elems: Vec<Value> = domain(elem)?.collect();
            Ok(Box::new(
                power_set(&elems)
                    .into_iter()
                    .map(|subset| Value::Set(Rc::new(subset))),
            ))
        }

        Ty::Bag(_) | Ty::Map(..) | Ty::Graph(_) | Ty::Fn(..) | Ty::Prop => Err(
            EvalError::panic("cannot enumerate this type's inhabitants"),
        ),
    }
}

/// The element alphabet for list enumeration: everything for a finite
/// element type, a fixed prefix for an infinite one.
fn alphabet(elem: &Ty) -> Result<Vec<Value>, EvalError> {
    let iter = domain(elem)?;
    if cardinality(elem).is_some() {
        Ok(iter.collect())
    } else {
        Ok(iter.take(ELEM_PREFIX).collect())
    }
}

/// Fair interleaving of two iterators.
struct Interleave {
    a: Box<dyn Iterator<Item = Value>>,
    b: Box<dyn Iterator<Item = Value>>,
    from_a: bool,
    a_done: bool,
    b_done: bool,
}

impl Iterator for Interleave {
    type Item = Value;

    fn next(&mut self) -> Option<Value> {
        loop {
            if self.a_done && self.b_done {
                return None;
            }
            let take_a = if self.a_done {
                false
            } else if self.b_done {
                true
            } else {
                self.from_a
            };
            self.from_a = !self.from_a;
            let next = if take_a { self.a.next() } else { self.b.next() };
            match next {
                Some(v) => return Some(v),
                None => {
                    if take_a {
                        self.a_done = true;
                    } else {
                        self.b_done = true;
                    }
                }
            }
        }
    }
}

/// Cantor-style diagonal product: pairs appear in order of ascending index
/// sum, so both sides make progress even when infinite.
struct Diagonal {
    a: Box<dyn Iterator<Item = Value>>,
    b: Box<dyn Iterator<Item = Value>>,
    a_cache: Vec<Value>,
    b_cache: Vec<Value>,
    a_done: bool,
    b_done: bool,
    diag: usize,
    i: usize,
}

impl Diagonal {
    fn new(a: Box<dyn Iterator<Item = Value>>, b: Box<dyn Iterator<Item = Value>>) -> Diagonal {
        Diagonal {
            a,
            b,
            a_cache: Vec::new(),
            b_cache: Vec::new(),
            a_done: false,
            b_done: false,
            diag: 0,
            i: 0,
        }
    }
}

impl Iterator for Diagonal {
    type Item = Value;

    fn next(&mut self) -> Option<Value> {
        loop {
            if self.i > self.diag {
                self.diag += 1;
                self.i = 0;
                if self.a_done
                    && self.b_done
                    && self.diag > self.a_cache.len() + self.b_cache.len()
                {
                    return None;
                }
                if (self.a_done && self.a_cache.is_empty())
                    || (self.b_done && self.b_cache.is_empty())
                {
                    return None;
                }
            }
            let i = self.i;
            let j = self.diag - i;
            self.i += 1;

            while !self.a_done && self.a_cache.len() <= i {
                match self.a.next() {
                    Some(v) => self.a_cache.push(v),
                    None => self.a_done = true,
                }
            }
            while !self.b_done && self.b_cache.len() <= j {
                match self.b.next() {
                    Some(v) => self.b_cache.push(v),
                    None => self.b_done = true,
                }
            }
            if i < self.a_cache.len() && j < self.b_cache.len() {
                return Some(Value::pair(self.a_cache[i].clone(), self.b_cache[j].clone()));
            }
        }
    }
}

/// Lists in order of increasing length; within a length, an odometer over
/// the element alphabet.
struct Lists {
    elems: Vec<Value>,
    counters: Vec<usize>,
    started: bool,
}

impl Iterator for Lists {
    type Item = Value;

    fn next(&mut self) -> Option<Value> {
        if !self.started {
            self.started = true;
            return Some(Value::nil());
        }
        if self.elems.is_empty() {
            return None;
        }
        if self.counters.is_empty() {
            self.counters = vec![0];
        }
        let value = Value::list_from(self.counters.iter().map(|&i| self.elems[i].clone()));

        // Advance the odometer; on wraparound, grow the length.
        let mut pos = self.counters.len();
        let mut carried = true;
        while pos > 0 {
            pos -= 1;
            self.counters[pos] += 1;
            if self.counters[pos] < self.elems.len() {
                carried = false;
                break;
            }
            self.counters[pos] = 0;
        }
        if carried {
            self.counters = vec![0; self.counters.len() + 1];
        }
        Some(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_traits::ToPrimitive;

    fn as_int(v: &Value) -> i64 {
        match v {
            Value::Num(_, q) => q.to_integer().to_i64().unwrap(),
            _ => panic!("expected a number"),
        }
    }

    #[test]
    fn booleans_enumerate_false_then_true() {
        let vals: Vec<Value> = domain(&Ty::Bool).unwrap().collect();
        assert_eq!(vals.len(), 2);
        assert!(matches!(&vals[0], Value::Inj(Side::L, _)));
        assert!(matches!(&vals[1], Value::Inj(Side::R, _)));
    }

    #[test]
    fn naturals_ascend() {
        let vals: Vec<i64> = domain(&Ty::Nat).unwrap().take(5).map(|v| as_int(&v)).collect();
        assert_eq!(vals, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn integers_alternate() {
        let vals: Vec<i64> = domain(&Ty::Int).unwrap().take(5).map(|v| as_int(&v)).collect();
        assert_eq!(vals, vec![0, 1, -1, 2, -2]);
    }

    #[test]
    fn rationals_start_with_calkin_wilf() {
        let vals: Vec<BigRational> = domain(&Ty::Rat)
            .unwrap()
            .take(7)
            .map(|v| match v {
                Value::Num(_, q) => q,
                _ => panic!("expected a number"),
            })
            .collect();
        let q = |n: i64, d: i64| BigRational::new(BigInt::from(n), BigInt::from(d));
        // 0, then ±1, ±1/2, ±2, …
        assert_eq!(
            vals,
            vec![q(0, 1), q(1, 1), q(-1, 1), q(1, 2), q(-1, 2), q(2, 1), q(-2, 1)]
        );
    }

    #[test]
    fn finite_cardinalities() {
        assert_eq!(cardinality(&Ty::Void), Some(BigInt::zero()));
        assert_eq!(cardinality(&Ty::Bool), Some(BigInt::from(2)));
        let pair_of_bools = Ty::prod(Ty::Bool, Ty::Bool);
        assert_eq!(cardinality(&pair_of_bools), Some(BigInt::from(4)));
        assert_eq!(cardinality(&Ty::set(Ty::Bool)), Some(BigInt::from(4)));
        assert_eq!(cardinality(&Ty::Nat), None);
        assert_eq!(
            cardinality(&Ty::Map(Rc::new(Ty::Bool), Rc::new(Ty::Bool))),
            Some(BigInt::from(9))
        );
    }

    #[test]
    fn finite_products_are_lexicographic() {
        let vals: Vec<Value> = domain(&Ty::prod(Ty::Bool, Ty::Bool)).unwrap().collect();
        assert_eq!(vals.len(), 4);
    }

    #[test]
    fn diagonal_product_reaches_both_sides() {
        let pairs: Vec<Value> = domain(&Ty::prod(Ty::Nat, Ty::Nat)).unwrap().take(6).collect();
        assert_eq!(pairs.len(), 6);
        // The first pair is (0, 0).
        if let Value::Pair(l, r) = &pairs[0] {
            assert_eq!(as_int(&l.value().unwrap()), 0);
            assert_eq!(as_int(&r.value().unwrap()), 0);
        } else {
            panic!("expected a pair");
        }
    }

    #[test]
    fn lists_grow_by_length() {
        let lists: Vec<Value> = domain(&Ty::list(Ty::Bool)).unwrap().take(4).collect();
        // [], [false], [true], [false, false], …
        assert!(matches!(&lists[0], Value::Inj(Side::L, _)));
        assert!(matches!(&lists[1], Value::Inj(Side::R, _)));
    }

    #[test]
    fn void_lists_are_just_nil() {
        let lists: Vec<Value> = domain(&Ty::list(Ty::Void)).unwrap().collect();
        assert_eq!(lists.len(), 1);
        assert_eq!(cardinality(&Ty::list(Ty::Void)), Some(BigInt::one()));
    }
}
