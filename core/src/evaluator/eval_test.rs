//! Unit tests for the evaluator.

use super::*;
use crate::term::{NameId, Op, RationalDisplay, Side, Term, TestVar, Ty};
use crate::test_utils::init_test_logging;
use crate::values::{Env, Thunk, ThunkState, Value};
use num_traits::ToPrimitive;
use pretty_assertions::assert_eq;
use smallvec::smallvec;
use std::rc::Rc;

// ============================================================================
// Term builders
// ============================================================================

fn name(id: u32) -> NameId {
    NameId(id)
}

fn var(id: u32) -> Rc<Term> {
    Rc::new(Term::Var(name(id)))
}

fn num(n: i64) -> Rc<Term> {
    Rc::new(Term::int(n))
}

fn unit() -> Rc<Term> {
    Rc::new(Term::Unit)
}

fn pair(a: Rc<Term>, b: Rc<Term>) -> Rc<Term> {
    Rc::new(Term::Pair(a, b))
}

fn abs1(id: u32, body: Rc<Term>) -> Rc<Term> {
    Rc::new(Term::Abs(smallvec![name(id)], body))
}

fn apply(fun: Rc<Term>, arg: Rc<Term>) -> Rc<Term> {
    Rc::new(Term::App(fun, vec![arg]))
}

fn op1(op: Op, arg: Rc<Term>) -> Rc<Term> {
    apply(Rc::new(Term::Prim(op)), arg)
}

fn op2(op: Op, a: Rc<Term>, b: Rc<Term>) -> Rc<Term> {
    op1(op, pair(a, b))
}

fn bool_term(b: bool) -> Rc<Term> {
    let side = if b { Side::R } else { Side::L };
    Rc::new(Term::Inj(side, unit()))
}

fn nil() -> Rc<Term> {
    Rc::new(Term::Inj(Side::L, unit()))
}

fn cons(head: Rc<Term>, tail: Rc<Term>) -> Rc<Term> {
    Rc::new(Term::Inj(Side::R, pair(head, tail)))
}

fn num_list(ns: &[i64]) -> Rc<Term> {
    let mut out = nil();
    for &n in ns.iter().rev() {
        out = cons(num(n), out);
    }
    out
}

/// A term that fails if it is ever evaluated.
fn poison() -> Rc<Term> {
    op2(Op::Div, num(1), num(0))
}

fn as_int(v: &Value) -> i64 {
    match v {
        Value::Num(_, q) => {
            assert!(q.is_integer(), "expected an integer, got {q}");
            q.to_integer().to_i64().unwrap()
        }
        _ => panic!("expected a number, got {v:?}"),
    }
}

fn as_bool(v: &Value) -> bool {
    match v {
        Value::Inj(side, _) => *side == Side::R,
        _ => panic!("expected a boolean, got {v:?}"),
    }
}

fn set_ints(v: &Value) -> Vec<i64> {
    match v {
        Value::Set(elems) => elems.iter().map(as_int).collect(),
        _ => panic!("expected a set, got {v:?}"),
    }
}

fn run(term: &Rc<Term>) -> Result<Value, EvalError> {
    eval(term)
}

// ============================================================================
// Constants and data
// ============================================================================

#[test]
fn test_number_literal() {
    assert_eq!(as_int(&run(&num(42)).unwrap()), 42);
}

#[test]
fn test_unit_literal() {
    assert!(matches!(run(&unit()).unwrap(), Value::Unit));
}

#[test]
fn test_projection_forces_only_one_side() {
    // The right component divides by zero but is never demanded.
    let term = Rc::new(Term::Proj(Side::L, pair(num(7), poison())));
    assert_eq!(as_int(&run(&term).unwrap()), 7);
}

#[test]
fn test_case_selects_branch_and_binds_payload() {
    let scrutinee = Rc::new(Term::Inj(Side::R, num(5)));
    let term = Rc::new(Term::Case {
        scrutinee,
        left: (name(1), num(0)),
        right: (name(2), op2(Op::Add, var(2), num(1))),
    });
    assert_eq!(as_int(&run(&term).unwrap()), 6);
}

#[test]
fn test_case_on_non_sum_is_a_panic() {
    let term = Rc::new(Term::Case {
        scrutinee: num(1),
        left: (name(1), num(0)),
        right: (name(2), num(0)),
    });
    let err = run(&term).unwrap_err();
    assert!(matches!(err.kind, EvalErrorKind::Panic(_)));
}

#[test]
fn test_unbound_variable() {
    let err = run(&var(99)).unwrap_err();
    assert!(matches!(err.kind, EvalErrorKind::Unbound(NameId(99))));
}

// ============================================================================
// Functions and laziness
// ============================================================================

#[test]
fn test_application_binds_parameter() {
    let term = apply(abs1(1, op2(Op::Mul, var(1), num(3))), num(4));
    assert_eq!(as_int(&run(&term).unwrap()), 12);
}

#[test]
fn test_unused_argument_is_never_evaluated() {
    init_test_logging();
    let term = apply(abs1(1, num(10)), poison());
    assert_eq!(as_int(&run(&term).unwrap()), 10);
}

#[test]
fn test_arity_mismatch_is_a_panic() {
    let two_params = Rc::new(Term::Abs(smallvec![name(1), name(2)], var(1)));
    let term = Rc::new(Term::App(two_params, vec![num(1)]));
    let err = run(&term).unwrap_err();
    assert!(matches!(err.kind, EvalErrorKind::Panic(_)));
}

#[test]
fn test_forcing_caches_the_result() {
    let thunk = Thunk::suspended(num(7), Env::new());
    let mut evaluator = Evaluator::new(EvaluatorOptions::default());
    assert_eq!(as_int(&evaluator.force(&thunk).unwrap()), 7);
    assert!(matches!(&*thunk.cell.borrow(), ThunkState::Done(_)));

    // A second force reads the cache rather than re-evaluating the term:
    // swap the cached value and observe the swap, not the term.
    thunk.cell.replace(ThunkState::Done(Value::nat(9)));
    assert_eq!(as_int(&evaluator.force(&thunk).unwrap()), 9);
}

#[test]
fn test_argument_shared_by_two_uses_evaluates_once() {
    // x + x where x is bound to a suspended computation: the second use
    // must see the memoized result, not a poisoned re-run. Observable
    // indirectly: a Delay body forces fine twice.
    let body = op2(
        Op::Add,
        Rc::new(Term::Force(var(1))),
        Rc::new(Term::Force(var(1))),
    );
    let term = apply(abs1(1, body), Rc::new(Term::Delay(name(2), num(3))));
    assert_eq!(as_int(&run(&term).unwrap()), 6);
}

#[test]
fn test_delay_then_force_round_trips() {
    let term = Rc::new(Term::Force(Rc::new(Term::Delay(name(1), num(5)))));
    assert_eq!(as_int(&run(&term).unwrap()), 5);
}

#[test]
fn test_self_referential_delay_is_an_infinite_loop() {
    // x = x: forcing the delayed computation re-enters its own thunk.
    let term = Rc::new(Term::Force(Rc::new(Term::Delay(name(1), var(1)))));
    let err = run(&term).unwrap_err();
    assert!(matches!(err.kind, EvalErrorKind::InfiniteLoop));
}

#[test]
fn test_depth_limit_stops_runaway_nesting() {
    let mut term = num(1);
    for _ in 0..100 {
        term = op1(Op::Neg, term);
    }
    let options = EvaluatorOptions {
        max_depth: 50,
        ..EvaluatorOptions::default()
    };
    let err = eval_with_options(&term, options).unwrap_err();
    assert!(matches!(err.kind, EvalErrorKind::StackOverflow { .. }));
}

// ============================================================================
// Arithmetic
// ============================================================================

#[test]
fn test_addition() {
    assert_eq!(as_int(&run(&op2(Op::Add, num(2), num(3))).unwrap()), 5);
}

#[test]
fn test_natural_subtraction_underflows() {
    let term = op2(Op::Sub(Ty::Nat), num(2), num(5));
    let err = run(&term).unwrap_err();
    assert!(matches!(err.kind, EvalErrorKind::Underflow));
}

#[test]
fn test_integer_subtraction_goes_negative() {
    let term = op2(Op::Sub(Ty::Int), num(2), num(5));
    assert_eq!(as_int(&run(&term).unwrap()), -3);
}

#[test]
fn test_division_by_zero() {
    let err = run(&poison()).unwrap_err();
    assert!(matches!(err.kind, EvalErrorKind::DivisionByZero));
}

#[test]
fn test_exponentiation() {
    assert_eq!(as_int(&run(&op2(Op::Exp, num(2), num(10))).unwrap()), 1024);
}

#[test]
fn test_modulo_follows_floor_division() {
    assert_eq!(as_int(&run(&op2(Op::Mod, num(-7), num(3))).unwrap()), 2);
}

#[test]
fn test_divides() {
    assert!(as_bool(&run(&op2(Op::Divides, num(3), num(12))).unwrap()));
    assert!(!as_bool(&run(&op2(Op::Divides, num(5), num(12))).unwrap()));
}

#[test]
fn test_integer_square_root() {
    assert_eq!(as_int(&run(&op1(Op::Sqrt, num(10))).unwrap()), 3);
}

#[test]
fn test_factorial() {
    assert_eq!(as_int(&run(&op1(Op::Fact, num(5))).unwrap()), 120);
}

#[test]
fn test_primality() {
    assert!(as_bool(&run(&op1(Op::IsPrime, num(97))).unwrap()));
    assert!(!as_bool(&run(&op1(Op::IsPrime, num(91))).unwrap()));
}

#[test]
fn test_factorization_is_a_bag_of_primes() {
    let value = run(&op1(Op::Factor, num(12))).unwrap();
    let Value::Bag(items) = value else {
        panic!("expected a bag");
    };
    let view: Vec<(i64, u64)> = items.iter().map(|(v, n)| (as_int(v), *n)).collect();
    assert_eq!(view, vec![(2, 2), (3, 1)]);
}

#[test]
fn test_display_mode_merges_through_exponentiation() {
    // A decimal exponent taints the result even though only the base's
    // magnitude survives.
    let decimal = Rc::new(Term::Num(
        RationalDisplay::Decimal,
        num_rational::BigRational::from_integer(3.into()),
    ));
    let value = run(&op2(Op::Exp, num(2), decimal)).unwrap();
    let Value::Num(display, q) = value else {
        panic!("expected a number");
    };
    assert_eq!(display, RationalDisplay::Decimal);
    assert_eq!(q.to_integer().to_i64().unwrap(), 8);
}

#[test]
fn test_display_mode_merges_through_arithmetic() {
    let decimal = Rc::new(Term::Num(
        RationalDisplay::Decimal,
        num_rational::BigRational::from_integer(1.into()),
    ));
    let value = run(&op2(Op::Add, decimal, num(2))).unwrap();
    let Value::Num(display, q) = value else {
        panic!("expected a number");
    };
    assert_eq!(display, RationalDisplay::Decimal);
    assert_eq!(q.to_integer().to_i64().unwrap(), 3);
}

// ============================================================================
// Comparison
// ============================================================================

#[test]
fn test_numeric_equality_ignores_display_mode() {
    let decimal = Rc::new(Term::Num(
        RationalDisplay::Decimal,
        num_rational::BigRational::from_integer(2.into()),
    ));
    assert!(as_bool(&run(&op2(Op::Eq(Ty::Rat), decimal, num(2))).unwrap()));
}

#[test]
fn test_list_comparison_is_lexicographic() {
    let a = num_list(&[1, 2]);
    let b = num_list(&[1, 2, 3]);
    assert!(as_bool(&run(&op2(Op::Lt(Ty::list(Ty::Nat)), a, b)).unwrap()));
}

#[test]
fn test_sum_comparison_orders_left_before_right() {
    let term = op2(Op::Lt(Ty::Bool), bool_term(false), bool_term(true));
    assert!(as_bool(&run(&term).unwrap()));
}

// ============================================================================
// Containers
// ============================================================================

#[test]
fn test_list_to_set_sorts_and_dedups() {
    let term = op1(Op::ListToSet(Ty::Nat), num_list(&[3, 1, 2, 1, 3]));
    assert_eq!(set_ints(&run(&term).unwrap()), vec![1, 2, 3]);
}

#[test]
fn test_set_to_list_is_canonical_order() {
    let set = op1(Op::ListToSet(Ty::Nat), num_list(&[2, 1, 2]));
    let value = run(&op1(Op::SetToList, set)).unwrap();
    let mut evaluator = Evaluator::new(EvaluatorOptions::default());
    let elems = evaluator.list_values(&value).unwrap();
    let view: Vec<i64> = elems.iter().map(as_int).collect();
    assert_eq!(view, vec![1, 2]);
}

#[test]
fn test_bag_size_counts_distinct_elements() {
    // {|1, 1, 2, 3|} has 3 distinct elements; multiplicity does not count.
    let bag = op1(Op::ListToBag(Ty::Nat), num_list(&[1, 1, 2, 3]));
    assert_eq!(as_int(&run(&op1(Op::Size, bag)).unwrap()), 3);
}

#[test]
fn test_reduce_folds_in_order() {
    let term = op1(
        Op::Reduce,
        pair(
            Rc::new(Term::Prim(Op::Add)),
            pair(num(0), num_list(&[1, 2, 3, 4])),
        ),
    );
    assert_eq!(as_int(&run(&term).unwrap()), 10);
}

#[test]
fn test_reduce_over_a_bag_sees_each_copy() {
    let bag = op1(Op::ListToBag(Ty::Nat), num_list(&[2, 2, 3]));
    let term = op1(
        Op::Reduce,
        pair(Rc::new(Term::Prim(Op::Add)), pair(num(0), bag)),
    );
    assert_eq!(as_int(&run(&term).unwrap()), 7);
}

#[test]
fn test_each_over_a_set_recanonicalizes() {
    // A non-injective map collapses the set.
    let constant_zero = abs1(1, num(0));
    let set = op1(Op::ListToSet(Ty::Nat), num_list(&[1, 2, 3]));
    let term = op1(Op::Each(Ty::Nat), pair(constant_zero, set));
    assert_eq!(set_ints(&run(&term).unwrap()), vec![0]);
}

#[test]
fn test_filter_keeps_matching_elements() {
    let is_even = abs1(1, op2(Op::Eq(Ty::Nat), op2(Op::Mod, var(1), num(2)), num(0)));
    let term = op1(Op::Filter, pair(is_even, num_list(&[1, 2, 3, 4])));
    let value = run(&term).unwrap();
    let mut evaluator = Evaluator::new(EvaluatorOptions::default());
    let view: Vec<i64> = evaluator
        .list_values(&value)
        .unwrap()
        .iter()
        .map(as_int)
        .collect();
    assert_eq!(view, vec![2, 4]);
}

#[test]
fn test_membership() {
    let set = op1(Op::ListToSet(Ty::Nat), num_list(&[1, 2, 3]));
    assert!(as_bool(
        &run(&op2(Op::Elem(Ty::Nat), num(2), set.clone())).unwrap()
    ));
    assert!(!as_bool(&run(&op2(Op::Elem(Ty::Nat), num(9), set)).unwrap()));
}

#[test]
fn test_power_set_size() {
    let set = op1(Op::ListToSet(Ty::Nat), num_list(&[1, 2, 3]));
    let value = run(&op1(Op::Power(Ty::Nat), set)).unwrap();
    let Value::Set(subsets) = value else {
        panic!("expected a set of sets");
    };
    assert_eq!(subsets.len(), 8);
}

#[test]
fn test_merge_bags_with_addition() {
    let xs = op1(Op::ListToBag(Ty::Nat), num_list(&[1, 1]));
    let ys = op1(Op::ListToBag(Ty::Nat), num_list(&[1, 2]));
    let term = op1(
        Op::Merge(Ty::Nat),
        pair(Rc::new(Term::Prim(Op::Add)), pair(xs, ys)),
    );
    let Value::Bag(items) = run(&term).unwrap() else {
        panic!("expected a bag");
    };
    let view: Vec<(i64, u64)> = items.iter().map(|(v, n)| (as_int(v), *n)).collect();
    assert_eq!(view, vec![(1, 3), (2, 1)]);
}

#[test]
fn test_map_insert_and_lookup() {
    let empty = Rc::new(Term::Prim(Op::EmptyMap));
    let m = op1(Op::Insert(Ty::Nat), pair(num(1), pair(num(10), empty)));
    let m = op1(Op::Insert(Ty::Nat), pair(num(1), pair(num(11), m)));
    let hit = run(&op2(Op::Lookup(Ty::Nat), num(1), m.clone())).unwrap();
    match hit {
        Value::Inj(Side::R, v) => assert_eq!(as_int(&v), 11),
        other => panic!("expected a present lookup, got {other:?}"),
    }
    let miss = run(&op2(Op::Lookup(Ty::Nat), num(9), m)).unwrap();
    assert!(matches!(miss, Value::Inj(Side::L, _)));
}

#[test]
fn test_join_flattens_bags_with_multiplicity() {
    // {| {|5|}, {|5|} |} flattens to {|5, 5|}.
    let inner = op1(Op::ListToBag(Ty::Nat), num_list(&[5]));
    let outer = op1(
        Op::ListToBag(Ty::bag(Ty::Nat)),
        cons(inner.clone(), cons(inner, nil())),
    );
    let Value::Bag(items) = run(&op1(Op::Join(Ty::Nat), outer)).unwrap() else {
        panic!("expected a bag");
    };
    let view: Vec<(i64, u64)> = items.iter().map(|(v, n)| (as_int(v), *n)).collect();
    assert_eq!(view, vec![(5, 2)]);
}

// ============================================================================
// Graphs
// ============================================================================

#[test]
fn test_graph_summary_of_connect() {
    let g = op2(Op::Connect, op1(Op::Vertex, num(1)), op1(Op::Vertex, num(2)));
    let value = run(&op1(Op::Summary(Ty::Nat), g)).unwrap();
    let Value::Map(entries) = value else {
        panic!("expected an adjacency map");
    };
    assert_eq!(entries.len(), 2);
    assert_eq!(as_int(&entries[0].0), 1);
    assert_eq!(set_ints(&entries[0].1), vec![2]);
    assert_eq!(set_ints(&entries[1].1), Vec::<i64>::new());
}

#[test]
fn test_empty_graph_has_empty_summary() {
    let g = Rc::new(Term::Prim(Op::EmptyGraph));
    let value = run(&op1(Op::Summary(Ty::Nat), g)).unwrap();
    let Value::Map(entries) = value else {
        panic!("expected an adjacency map");
    };
    assert!(entries.is_empty());
}

// ============================================================================
// Type values
// ============================================================================

#[test]
fn test_enumerate_booleans() {
    let term = op1(Op::Enumerate, Rc::new(Term::TyLit(Ty::Bool)));
    let value = run(&term).unwrap();
    let mut evaluator = Evaluator::new(EvaluatorOptions::default());
    let elems = evaluator.list_values(&value).unwrap();
    assert_eq!(elems.len(), 2);
    assert!(!as_bool(&elems[0]));
    assert!(as_bool(&elems[1]));
}

#[test]
fn test_count_finite_type() {
    let ty = Ty::set(Ty::prod(Ty::Bool, Ty::Bool));
    let term = op1(Op::Count, Rc::new(Term::TyLit(ty)));
    assert_eq!(as_int(&run(&term).unwrap()), 16);
}

#[test]
fn test_enumerate_infinite_type_is_a_panic() {
    let term = op1(Op::Enumerate, Rc::new(Term::TyLit(Ty::Nat)));
    let err = run(&term).unwrap_err();
    assert!(matches!(err.kind, EvalErrorKind::Panic(_)));
}

// ============================================================================
// Propositions
// ============================================================================

#[test]
fn test_forall_finds_a_counterexample() {
    init_test_logging();
    // forall x : Nat. x < 3 fails at x = 3.
    let body = abs1(1, op2(Op::Lt(Ty::Nat), var(1), num(3)));
    let prop = run(&op1(Op::Forall(vec![Ty::Nat]), body)).unwrap();
    let Value::Prop(prop) = prop else {
        panic!("expected a proposition");
    };
    let mut evaluator = Evaluator::new(EvaluatorOptions::default());
    let result = evaluator.resolve_prop(&prop).unwrap();
    assert!(!result.passed);
    assert!(result.exhaustive);
    assert_eq!(result.witness.len(), 1);
    assert_eq!(result.witness[0].0, Ty::Nat);
    assert_eq!(as_int(&result.witness[0].1), 3);
}

#[test]
fn test_forall_over_an_infinite_domain_is_inexhaustive() {
    // forall x : Nat. x < x + 1 holds on every sample but cannot be proved.
    let body = abs1(
        1,
        op2(Op::Lt(Ty::Nat), var(1), op2(Op::Add, var(1), num(1))),
    );
    let prop = run(&op1(Op::Forall(vec![Ty::Nat]), body)).unwrap();
    let Value::Prop(prop) = prop else {
        panic!("expected a proposition");
    };
    let mut evaluator = Evaluator::new(EvaluatorOptions::default());
    let result = evaluator.resolve_prop(&prop).unwrap();
    assert!(result.passed);
    assert!(!result.exhaustive);
}

#[test]
fn test_forall_over_a_finite_domain_is_exhaustive() {
    // forall b : Bool. b = b.
    let body = abs1(1, op2(Op::Eq(Ty::Bool), var(1), var(1)));
    let prop = run(&op1(Op::Forall(vec![Ty::Bool]), body)).unwrap();
    let Value::Prop(prop) = prop else {
        panic!("expected a proposition");
    };
    let mut evaluator = Evaluator::new(EvaluatorOptions::default());
    let result = evaluator.resolve_prop(&prop).unwrap();
    assert!(result.passed);
    assert!(result.exhaustive);
}

#[test]
fn test_exists_finds_a_witness() {
    // exists x : Nat. x * x = 9.
    let body = abs1(
        1,
        op2(Op::Eq(Ty::Nat), op2(Op::Mul, var(1), var(1)), num(9)),
    );
    let term = op1(Op::Holds, op1(Op::Exists(vec![Ty::Nat]), body));
    assert!(as_bool(&run(&term).unwrap()));
}

#[test]
fn test_two_variable_quantifier() {
    // forall a b : Bool. a = b fails at (false, true).
    let body = Rc::new(Term::Abs(
        smallvec![name(1), name(2)],
        op2(Op::Eq(Ty::Bool), var(1), var(2)),
    ));
    let prop = run(&op1(Op::Forall(vec![Ty::Bool, Ty::Bool]), body)).unwrap();
    let Value::Prop(prop) = prop else {
        panic!("expected a proposition");
    };
    let mut evaluator = Evaluator::new(EvaluatorOptions::default());
    let result = evaluator.resolve_prop(&prop).unwrap();
    assert!(!result.passed);
    assert_eq!(result.witness.len(), 2);
    assert!(!as_bool(&result.witness[0].1));
    assert!(as_bool(&result.witness[1].1));
}

#[test]
fn test_not_flips_a_verdict_without_research() {
    let body = abs1(1, op2(Op::Lt(Ty::Nat), var(1), num(3)));
    let term = op1(
        Op::Holds,
        op1(Op::NotProp, op1(Op::Forall(vec![Ty::Nat]), body)),
    );
    assert!(as_bool(&run(&term).unwrap()));
}

#[test]
fn test_should_eq_records_both_values() {
    let term = op2(Op::ShouldEq(Ty::Nat), num(2), num(3));
    let Value::Prop(prop) = run(&term).unwrap() else {
        panic!("expected a proposition");
    };
    let mut evaluator = Evaluator::new(EvaluatorOptions::default());
    let result = evaluator.resolve_prop(&prop).unwrap();
    assert!(!result.passed);
    assert!(result.exhaustive);
    assert_eq!(as_int(&result.witness[0].1), 2);
    assert_eq!(as_int(&result.witness[1].1), 3);
}

// ============================================================================
// Errors and test frames
// ============================================================================

#[test]
fn test_crash_carries_its_message() {
    let message = num_list(&[98, 111, 111, 109]);
    let err = run(&op1(Op::Crash, message)).unwrap_err();
    match err.kind {
        EvalErrorKind::Crash(msg) => assert_eq!(msg, "boom"),
        other => panic!("expected a crash, got {other:?}"),
    }
}

#[test]
fn test_crash_rejects_a_fractional_code_point() {
    let half = Rc::new(Term::Num(
        RationalDisplay::Fraction,
        num_rational::BigRational::new(97.into(), 2.into()),
    ));
    let message = cons(half, nil());
    let err = run(&op1(Op::Crash, message)).unwrap_err();
    assert!(matches!(err.kind, EvalErrorKind::Panic(_)));
}

#[test]
fn test_match_error_primitive() {
    let err = run(&Rc::new(Term::Prim(Op::MatchErr))).unwrap_err();
    assert!(matches!(err.kind, EvalErrorKind::NonExhaustive));
}

#[test]
fn test_failing_frame_reports_its_bindings() {
    let frame = Rc::new(Term::Test {
        vars: vec![TestVar {
            display: "x".into(),
            ty: Ty::Nat,
            name: name(1),
        }],
        body: poison(),
    });
    let term = apply(abs1(1, frame), num(5));
    let err = run(&term).unwrap_err();
    assert!(matches!(err.kind, EvalErrorKind::DivisionByZero));
    assert_eq!(err.frames.len(), 1);
    let binding = &err.frames[0].bindings[0];
    assert_eq!(binding.display, "x");
    assert_eq!(binding.ty, Ty::Nat);
    assert_eq!(as_int(binding.value.as_ref().unwrap()), 5);
}

#[test]
fn test_nested_frames_stack_innermost_first() {
    let inner = Rc::new(Term::Test {
        vars: vec![TestVar {
            display: "y".into(),
            ty: Ty::Nat,
            name: name(2),
        }],
        body: poison(),
    });
    let outer = Rc::new(Term::Test {
        vars: vec![TestVar {
            display: "x".into(),
            ty: Ty::Nat,
            name: name(1),
        }],
        body: apply(abs1(2, inner), num(2)),
    });
    let term = apply(abs1(1, outer), num(1));
    let err = run(&term).unwrap_err();
    assert_eq!(err.frames.len(), 2);
    assert_eq!(err.frames[0].bindings[0].display, "y");
    assert_eq!(err.frames[1].bindings[0].display, "x");
}
