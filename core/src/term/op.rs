//! The primitive-operator vocabulary of Core.
//!
//! Every operator has a fixed bundled-argument arity: 0 for the nullary
//! constants, 1 for everything else. Multi-argument primitives are uncurried
//! by the desugarer into a single nested-pair argument before they reach the
//! evaluator, so `merge(f, b1, b2)` arrives as `Merge ty (f, (b1, b2))`.

use super::ty::Ty;

/// A primitive operation.
///
/// Operators whose runtime behavior depends on the operand type carry the
/// resolved [`Ty`] descriptor; the evaluator dispatches on it rather than on
/// the runtime shape of the value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Op {
    /// The identity function.
    Id,
    /// Abort evaluation with a user-supplied message (a list of Unicode
    /// scalar values).
    Crash,
    /// Nullary: evaluating it raises the non-exhaustive-match error.
    /// Incomplete pattern matches desugar to a fallback branch of this.
    MatchErr,

    // Numeric operators. All take exact rationals; the display-mode
    // annotations of the operands merge into the result.
    Add,
    Neg,
    /// Subtraction, underflow-checked when the carried type is `Nat`.
    Sub(Ty),
    Mul,
    Div,
    /// Exponentiation by an integer exponent.
    Exp,
    Mod,
    /// `(a, b) -> a | b`.
    Divides,
    /// Integer square root of a natural.
    Sqrt,
    Floor,
    Ceil,
    Abs,
    Fact,
    /// Multinomial coefficient `(n, [k1, …, km]) -> n! / (k1! … km! r!)`.
    Multinom,
    IsPrime,
    /// Prime factorization of a positive integer, as a bag of primes.
    Factor,

    // Type-indexed comparisons.
    Eq(Ty),
    Lt(Ty),

    // First-class type values.
    /// All inhabitants of a finite type, as a list in canonical order.
    Enumerate,
    /// Cardinality of a finite type.
    Count,

    // Containers.
    /// Size of a container: distinct elements of a set, bag or map, length
    /// of a list.
    Size,
    ListToSet(Ty),
    ListToBag(Ty),
    SetToList,
    BagToList,
    BagToSet,
    SetToBag,
    /// Bag to set of `(element, count)` pairs.
    BagToCounts(Ty),
    /// Set of `(element, count)` pairs back to a bag, merging duplicates.
    CountsToBag(Ty),
    MapToSet,
    /// Set of key/value pairs to a map; carries the key type. A duplicated
    /// key keeps its last binding in canonical set order.
    SetToMap(Ty),
    /// `(k, (v, m))`: pure insert, replacing any existing binding.
    Insert(Ty),
    /// `(k, m)`: optional lookup, `right v` when present, `left unit` when not.
    Lookup(Ty),
    EmptyMap,
    /// Membership test for lists, bags and sets.
    Elem(Ty),
    /// Power set of a set, or power bag of a bag (sub-bags counted with
    /// binomial multiplicities).
    Power(Ty),
    /// `(f, (c1, c2))`: merge two bags/sets, combining per-element counts
    /// with the numeric function `f` and keeping positive results.
    Merge(Ty),
    /// `(f, c)`: map `f` over a list/bag/set. Carries the *output* element
    /// type so set and bag results can be re-canonicalized.
    Each(Ty),
    /// `(f, (z, c))`: fold `f` over the container in canonical order.
    Reduce,
    /// `(p, c)`: keep elements satisfying the boolean function `p`.
    Filter,
    /// Flatten a container of containers; carries the inner element type.
    Join(Ty),

    // Graphs, built algebraically.
    EmptyGraph,
    Vertex,
    Overlay,
    Connect,
    /// Adjacency view of a graph: a map from vertex to successor set,
    /// computed on demand by folding the algebraic structure.
    Summary(Ty),

    // Propositions.
    Forall(Vec<Ty>),
    Exists(Vec<Ty>),
    /// Run a proposition's search and produce a boolean.
    Holds,
    /// Flip a proposition's classification without re-running its search.
    NotProp,
    /// `(a, b)`: equality assertion producing a pass/fail proposition.
    ShouldEq(Ty),
}

/// The number of bundled arguments `op` expects: 0 for the nullary constants,
/// 1 for everything else.
pub fn arity(op: &Op) -> usize {
    match op {
        Op::EmptyMap | Op::EmptyGraph | Op::MatchErr => 0,
        _ => 1,
    }
}
