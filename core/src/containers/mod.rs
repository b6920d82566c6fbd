//! Canonical container representations and their algebra.
//!
//! Sets are sorted duplicate-free sequences, bags are sorted sequences of
//! distinct elements with positive counts, maps are sorted by unique key.
//! "Sorted" always means sorted under the element type's canonical ordering,
//! which is type-indexed rather than structural, so every algorithm here is
//! parameterized by a fallible comparator supplied by the evaluator.

pub mod graph;

use crate::evaluator::EvalError;
use crate::values::Value;
use std::cmp::Ordering;

/// A type-indexed element comparator. Comparison may force thunks, so it can
/// fail with any evaluation error.
pub type Cmp<'a> = dyn FnMut(&Value, &Value) -> Result<Ordering, EvalError> + 'a;

/// Binary search in a slice sorted under `cmp`, projecting each entry to its
/// key with `key`. `Ok(i)` is a match at `i`, `Err(i)` the insertion point.
fn search_by<T>(
    sorted: &[T],
    key: impl Fn(&T) -> &Value,
    x: &Value,
    cmp: &mut Cmp,
) -> Result<Result<usize, usize>, EvalError> {
    let mut lo = 0;
    let mut hi = sorted.len();
    while lo < hi {
        let mid = lo + (hi - lo) / 2;
        match cmp(key(&sorted[mid]), x)? {
            Ordering::Less => lo = mid + 1,
            Ordering::Greater => hi = mid,
            Ordering::Equal => return Ok(Ok(mid)),
        }
    }
    Ok(Err(lo))
}

/// Sort and deduplicate into canonical set form.
pub fn canonical_set(elems: Vec<Value>, cmp: &mut Cmp) -> Result<Vec<Value>, EvalError> {
    let mut out: Vec<Value> = Vec::with_capacity(elems.len());
    for elem in elems {
        if let Err(pos) = search_by(&out, |v| v, &elem, cmp)? {
            out.insert(pos, elem);
        }
    }
    Ok(out)
}

/// Sort and coalesce into canonical bag form, dropping zero counts.
pub fn canonical_bag(
    items: Vec<(Value, u64)>,
    cmp: &mut Cmp,
) -> Result<Vec<(Value, u64)>, EvalError> {
    let mut out: Vec<(Value, u64)> = Vec::with_capacity(items.len());
    for (elem, count) in items {
        if count == 0 {
            continue;
        }
        match search_by(&out, |(v, _)| v, &elem, cmp)? {
            Ok(pos) => out[pos].1 += count,
            Err(pos) => out.insert(pos, (elem, count)),
        }
    }
    Ok(out)
}

/// Membership test in a canonical set.
pub fn set_contains(set: &[Value], x: &Value, cmp: &mut Cmp) -> Result<bool, EvalError> {
    Ok(search_by(set, |v| v, x, cmp)?.is_ok())
}

/// Membership test in a canonical bag.
pub fn bag_contains(bag: &[(Value, u64)], x: &Value, cmp: &mut Cmp) -> Result<bool, EvalError> {
    Ok(search_by(bag, |(v, _)| v, x, cmp)?.is_ok())
}

/// Union of two sorted duplicate-free sequences.
pub fn sorted_union(a: &[Value], b: &[Value], cmp: &mut Cmp) -> Result<Vec<Value>, EvalError> {
    let mut out = Vec::with_capacity(a.len() + b.len());
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        match cmp(&a[i], &b[j])? {
            Ordering::Less => {
                out.push(a[i].clone());
                i += 1;
            }
            Ordering::Greater => {
                out.push(b[j].clone());
                j += 1;
            }
            Ordering::Equal => {
                out.push(a[i].clone());
                i += 1;
                j += 1;
            }
        }
    }
    out.extend_from_slice(&a[i..]);
    out.extend_from_slice(&b[j..]);
    Ok(out)
}

/// Align two canonical bags element-wise: every element present in either
/// bag appears once, in canonical order, with its count on each side (0 when
/// absent). Union, intersection, difference and user-supplied merges are all
/// a combine pass over the alignment; keeping the combine step outside lets
/// it call back into the evaluator.
pub fn align_counts(
    xs: &[(Value, u64)],
    ys: &[(Value, u64)],
    cmp: &mut Cmp,
) -> Result<Vec<(Value, u64, u64)>, EvalError> {
    let mut out = Vec::with_capacity(xs.len() + ys.len());
    let (mut i, mut j) = (0, 0);
    while i < xs.len() && j < ys.len() {
        match cmp(&xs[i].0, &ys[j].0)? {
            Ordering::Less => {
                out.push((xs[i].0.clone(), xs[i].1, 0));
                i += 1;
            }
            Ordering::Greater => {
                out.push((ys[j].0.clone(), 0, ys[j].1));
                j += 1;
            }
            Ordering::Equal => {
                out.push((xs[i].0.clone(), xs[i].1, ys[j].1));
                i += 1;
                j += 1;
            }
        }
    }
    for (elem, n) in &xs[i..] {
        out.push((elem.clone(), *n, 0));
    }
    for (elem, n) in &ys[j..] {
        out.push((elem.clone(), 0, *n));
    }
    Ok(out)
}

/// All subsets of a canonical set. Each subset preserves canonical element
/// order; the outer collection is *not* sorted — the caller canonicalizes it
/// under the set type's ordering.
pub fn power_set(elems: &[Value]) -> Vec<Vec<Value>> {
    let mut out: Vec<Vec<Value>> = vec![Vec::new()];
    for elem in elems {
        let extended: Vec<Vec<Value>> = out
            .iter()
            .map(|s| {
                let mut s = s.clone();
                s.push(elem.clone());
                s
            })
            .collect();
        out.extend(extended);
    }
    out
}

/// All sub-bags of a canonical bag, each with the multiplicity of the ways it
/// can be drawn: taking `k` copies of an element present `n` times counts
/// `C(n, k)` ways, and a sub-bag's multiplicity is the product over elements.
pub fn power_bag(
    items: &[(Value, u64)],
) -> Result<Vec<(Vec<(Value, u64)>, u64)>, EvalError> {
    let mut out: Vec<(Vec<(Value, u64)>, u64)> = vec![(Vec::new(), 1)];
    for (elem, n) in items {
        let mut next = Vec::with_capacity(out.len() * (*n as usize + 1));
        for k in 0..=*n {
            let ways = binomial_u64(*n, k).ok_or(EvalError::overflow())?;
            for (sub, mult) in &out {
                let mult = mult.checked_mul(ways).ok_or(EvalError::overflow())?;
                let mut sub = sub.clone();
                if k > 0 {
                    sub.push((elem.clone(), k));
                }
                next.push((sub, mult));
            }
        }
        out = next;
    }
    Ok(out)
}

fn binomial_u64(n: u64, k: u64) -> Option<u64> {
    if k > n {
        return Some(0);
    }
    let k = k.min(n - k);
    let mut acc: u128 = 1;
    for i in 0..k {
        acc = acc.checked_mul((n - i) as u128)?;
        acc /= (i + 1) as u128;
    }
    u64::try_from(acc).ok()
}

/// Pure map insert: replaces any existing binding for an equal key.
pub fn map_insert(
    entries: &[(Value, Value)],
    key: Value,
    value: Value,
    cmp: &mut Cmp,
) -> Result<Vec<(Value, Value)>, EvalError> {
    let mut out = entries.to_vec();
    match search_by(&out, |(k, _)| k, &key, cmp)? {
        Ok(pos) => out[pos] = (key, value),
        Err(pos) => out.insert(pos, (key, value)),
    }
    Ok(out)
}

/// Optional lookup in a canonical map.
pub fn map_lookup(
    entries: &[(Value, Value)],
    key: &Value,
    cmp: &mut Cmp,
) -> Result<Option<Value>, EvalError> {
    Ok(match search_by(entries, |(k, _)| k, key, cmp)? {
        Ok(pos) => Some(entries[pos].1.clone()),
        Err(_) => None,
    })
}
