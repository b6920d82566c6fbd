//! Algebraic directed graphs.
//!
//! Graphs are built from four generators and nothing else: the empty graph,
//! a single vertex, overlay (union) and connect (directed product). The
//! algebraic structure *is* the canonical representation — no edge list is
//! materialized eagerly, which keeps the overlay/connect identities exact.
//! [`summary`] folds the structure into an adjacency view on demand.

use super::{Cmp, sorted_union};
use crate::evaluator::EvalError;
use crate::values::Value;
use std::cmp::Ordering;
use std::rc::Rc;

#[derive(Debug, Clone)]
pub enum GraphValue {
    Empty,
    Vertex(Value),
    /// Union of two graphs: vertices and edges of both.
    Overlay(Rc<GraphValue>, Rc<GraphValue>),
    /// Directed product: both graphs, plus an edge from every vertex of the
    /// left to every vertex of the right.
    Connect(Rc<GraphValue>, Rc<GraphValue>),
}

/// An adjacency view: vertices in canonical order, each with its sorted set
/// of successors.
pub type Adjacency = Vec<(Value, Vec<Value>)>;

/// Fold a graph into its adjacency view under the vertex type's ordering.
pub fn summary(graph: &GraphValue, cmp: &mut Cmp) -> Result<Adjacency, EvalError> {
    match graph {
        GraphValue::Empty => Ok(Vec::new()),
        GraphValue::Vertex(v) => Ok(vec![(v.clone(), Vec::new())]),
        GraphValue::Overlay(l, r) => {
            let sl = summary(l, cmp)?;
            let sr = summary(r, cmp)?;
            union_adjacency(&sl, &sr, cmp)
        }
        GraphValue::Connect(l, r) => {
            let sl = summary(l, cmp)?;
            let sr = summary(r, cmp)?;
            let targets: Vec<Value> = sr.iter().map(|(v, _)| v.clone()).collect();
            let mut connected = Vec::with_capacity(sl.len());
            for (v, succ) in &sl {
                connected.push((v.clone(), sorted_union(succ, &targets, cmp)?));
            }
            union_adjacency(&connected, &sr, cmp)
        }
    }
}

/// Merge two adjacency views, unioning successor sets of shared vertices.
fn union_adjacency(a: &Adjacency, b: &Adjacency, cmp: &mut Cmp) -> Result<Adjacency, EvalError> {
    let mut out = Vec::with_capacity(a.len() + b.len());
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        match cmp(&a[i].0, &b[j].0)? {
            Ordering::Less => {
                out.push(a[i].clone());
                i += 1;
            }
            Ordering::Greater => {
                out.push(b[j].clone());
                j += 1;
            }
            Ordering::Equal => {
                out.push((a[i].0.clone(), sorted_union(&a[i].1, &b[j].1, cmp)?));
                i += 1;
                j += 1;
            }
        }
    }
    out.extend_from_slice(&a[i..]);
    out.extend_from_slice(&b[j..]);
    Ok(out)
}
