//! End-to-end exploration tests: whole programs through the parser and the
//! symbolic engine

use imp_smt::SmtValue;
use imp_sym::{Diagnostic, Explorer, SymState};
use num_bigint::BigInt;
use z3::ast::{Ast, Int};
use z3::{Config, Context};

fn run_prog<'ctx>(
    ctx: &'ctx Context,
    src: &str,
) -> (Vec<SymState<'ctx>>, Vec<Diagnostic<'ctx>>) {
    let program = imp_core::parse(src).expect("program should parse");
    let mut explorer = Explorer::new(ctx);
    let states = explorer
        .run(&program, SymState::new(ctx))
        .expect("exploration should not hit a contract violation");
    (states, explorer.take_diagnostics())
}

fn int_value(state: &SymState<'_>, name: &str) -> BigInt {
    let concrete = state.concretize().expect("state should be satisfiable");
    match concrete.get(name) {
        Some(SmtValue::Int(v)) => v.clone(),
        other => panic!("expected an integer for {}, got {:?}", name, other),
    }
}

#[test]
fn terminal_states_are_satisfiable() {
    let cfg = Config::new();
    let ctx = Context::new(&cfg);
    let (states, _) = run_prog(&ctx, "havoc x; assume x > 10; if x > 20 then y := 1 else y := 2");
    assert!(!states.is_empty());
    for st in &states {
        assert!(st.concretize().is_some());
    }
}

#[test]
fn assignment_binds_a_fresh_symbol_per_write() {
    let cfg = Config::new();
    let ctx = Context::new(&cfg);
    let mut explorer = Explorer::new(&ctx);

    let first = imp_core::parse("x := 1").unwrap();
    let mut states = explorer.run(&first, SymState::new(&ctx)).unwrap();
    assert_eq!(states.len(), 1);
    let st = states.pop().unwrap();
    let symbol_before = st.get("x").unwrap().to_string();

    let second = imp_core::parse("x := x + 1").unwrap();
    let mut states = explorer.run(&second, st).unwrap();
    assert_eq!(states.len(), 1);
    let st = states.pop().unwrap();
    let symbol_after = st.get("x").unwrap().to_string();

    assert_ne!(symbol_before, symbol_after, "rewriting x must not reuse its symbol");
    assert_eq!(int_value(&st, "x"), BigInt::from(2));
}

#[test]
fn infeasible_then_branch_is_pruned() {
    let cfg = Config::new();
    let ctx = Context::new(&cfg);
    let (states, diags) = run_prog(&ctx, "x := 1; if x > 5 then skip");
    // only the implicit else survives
    assert_eq!(states.len(), 1);
    assert!(diags.is_empty());
    assert_eq!(int_value(&states[0], "x"), BigInt::from(1));
}

#[test]
fn then_states_precede_else_states() {
    let cfg = Config::new();
    let ctx = Context::new(&cfg);
    let (states, _) = run_prog(&ctx, "havoc x; if x > 0 then y := 1 else y := 2");
    assert_eq!(states.len(), 2);
    assert_eq!(int_value(&states[0], "y"), BigInt::from(1));
    assert_eq!(int_value(&states[1], "y"), BigInt::from(2));
}

#[test]
fn failing_assert_reports_and_halts_the_path() {
    let cfg = Config::new();
    let ctx = Context::new(&cfg);
    let (states, diags) = run_prog(&ctx, "x := 1; assert x > 5");
    assert_eq!(states.len(), 0);
    assert_eq!(diags.len(), 1);
    let Diagnostic::AssertViolation { state, .. } = &diags[0] else {
        panic!("expected an assertion violation");
    };
    assert!(state.is_error());
    assert!(state.concretize().is_some());
}

#[test]
fn passing_assert_keeps_the_path() {
    let cfg = Config::new();
    let ctx = Context::new(&cfg);
    let (states, diags) = run_prog(&ctx, "x := 1; assert x < 5");
    assert_eq!(states.len(), 1);
    assert!(diags.is_empty());
}

#[test]
fn assert_on_havoced_input_splits() {
    let cfg = Config::new();
    let ctx = Context::new(&cfg);
    let (states, diags) = run_prog(&ctx, "havoc x; assume x > 10; assert x > 15");
    // x in (10, 15] violates, x > 15 survives
    assert_eq!(states.len(), 1);
    assert_eq!(diags.len(), 1);
    assert!(diags[0].is_violation());
}

#[test]
fn assume_narrows_without_a_diagnostic() {
    let cfg = Config::new();
    let ctx = Context::new(&cfg);
    let (states, diags) = run_prog(&ctx, "y := 2; assume y > 5");
    assert_eq!(states.len(), 0);
    assert!(diags.is_empty());
}

#[test]
fn bounded_loop_runs_to_its_exit() {
    let cfg = Config::new();
    let ctx = Context::new(&cfg);
    let (states, diags) = run_prog(&ctx, "x := 1; while x < 5 do x := x + 1");
    assert_eq!(states.len(), 1);
    assert!(diags.is_empty());
    assert_eq!(int_value(&states[0], "x"), BigInt::from(5));
}

#[test]
fn unroll_bound_truncation_is_surfaced() {
    let cfg = Config::new();
    let ctx = Context::new(&cfg);
    let (states, diags) = run_prog(&ctx, "x := 0; while x >= 0 do x := x + 1");
    // the guard never goes false, so every exit branch is infeasible and the
    // frontier is still live when the cap hits
    assert_eq!(states.len(), 0);
    assert_eq!(diags.len(), 1);
    let Diagnostic::UnrollBoundExhausted { dropped, .. } = &diags[0] else {
        panic!("expected an unroll-bound diagnostic");
    };
    assert!(*dropped >= 1);
    assert!(!diags[0].is_violation());
}

#[test]
fn forked_states_are_independent() {
    let cfg = Config::new();
    let ctx = Context::new(&cfg);

    let mut st = SymState::new(&ctx);
    st.bind("x", imp_smt::fresh_int(&ctx, "x"));
    let (mut a, mut b) = st.fork();

    let ax = a.get("x").unwrap().as_int().unwrap();
    a.constrain(&ax._eq(&Int::from_i64(&ctx, 1)));
    let bx = b.get("x").unwrap().as_int().unwrap();
    b.constrain(&bx._eq(&Int::from_i64(&ctx, 2)));

    // contradictory constraints, yet both sides stay satisfiable
    assert!(!a.is_infeasible());
    assert!(!b.is_infeasible());
    assert_eq!(int_value(&a, "x"), BigInt::from(1));
    assert_eq!(int_value(&b, "x"), BigInt::from(2));

    // environment writes do not cross the fork either
    a.bind("y", imp_smt::fresh_int(&ctx, "y"));
    assert!(b.get("y").is_none());
    assert_eq!(a.path().len(), 1);
    assert_eq!(b.path().len(), 1);
}

#[test]
fn mark_error_is_idempotent_and_sticky() {
    let cfg = Config::new();
    let ctx = Context::new(&cfg);
    let mut st = SymState::new(&ctx);
    assert!(!st.is_error());
    st.mark_error();
    st.mark_error();
    assert!(st.is_error());
    // the flag travels through a fork
    let (a, b) = st.fork();
    assert!(a.is_error());
    assert!(b.is_error());
}

#[test]
fn exploration_is_deterministic() {
    const SRC: &str =
        "havoc x; assume x > 0; if x > 10 then { y := x + 1; assert y > 0 } else y := 2; \
         while y < 3 do y := y + 1";

    let render = || -> (Vec<String>, Vec<String>) {
        let cfg = Config::new();
        let ctx = Context::new(&cfg);
        let (states, diags) = run_prog(&ctx, SRC);
        (
            states.iter().map(|s| s.to_string()).collect(),
            diags.iter().map(|d| d.to_string()).collect(),
        )
    };

    let (states_a, diags_a) = render();
    let (states_b, diags_b) = render();
    assert_eq!(states_a, states_b);
    assert_eq!(diags_a, diags_b);
}

#[test]
fn sound_invariant_verifies_cleanly() {
    let cfg = Config::new();
    let ctx = Context::new(&cfg);
    let (states, diags) = run_prog(
        &ctx,
        "havoc x, y; assume y >= 0; c := 0; r := x; \
         while c < y inv r = x + c and c <= y do { r := r + 1; c := c + 1 }; \
         assert r = x + y",
    );
    assert!(
        diags.is_empty(),
        "sound invariant must produce no diagnostics"
    );
    // the abstracted exit (c = y, r = x + y) satisfies the final assertion
    assert_eq!(states.len(), 1);
    let concrete = states[0].concretize().expect("exit state is satisfiable");
    let (Some(SmtValue::Int(x)), Some(SmtValue::Int(y)), Some(SmtValue::Int(r))) =
        (concrete.get("x"), concrete.get("y"), concrete.get("r"))
    else {
        panic!("expected integer values for x, y, r");
    };
    assert_eq!(r.clone(), x + y);
}

#[test]
fn wrong_invariant_is_flagged() {
    let cfg = Config::new();
    let ctx = Context::new(&cfg);
    let (states, diags) = run_prog(
        &ctx,
        "havoc x, y; assume y >= 0; c := 0; r := x; \
         while c < y inv c > y do { r := r + 1; c := c + 1 }; \
         assert r = x + y",
    );
    // the entry check fails: c = 0 and y >= 0 refute c > y
    assert!(diags
        .iter()
        .any(|d| matches!(d, Diagnostic::InvariantEntry { .. })));
    // at least one diagnostic carries an error-flagged state
    assert!(diags
        .iter()
        .any(|d| d.state().is_some_and(|s| s.is_error())));
    assert_eq!(states.len(), 1);
}

#[test]
fn unpreserved_invariant_is_flagged() {
    let cfg = Config::new();
    let ctx = Context::new(&cfg);
    let (states, diags) = run_prog(&ctx, "c := 0; while c < 5 inv c >= 0 do c := c - 1");
    // holds on entry, broken by the decrementing body at c = 0
    assert!(diags
        .iter()
        .any(|d| matches!(d, Diagnostic::InvariantInduction { .. })));
    assert!(!diags
        .iter()
        .any(|d| matches!(d, Diagnostic::InvariantEntry { .. })));
    // exit state: c >= 5
    assert_eq!(states.len(), 1);
    assert!(int_value(&states[0], "c") >= BigInt::from(5));
}

#[test]
fn benchmark_export_carries_the_path_condition() {
    let cfg = Config::new();
    let ctx = Context::new(&cfg);
    let (states, _) = run_prog(&ctx, "x := 1; assume x > 0");
    assert_eq!(states.len(), 1);
    let benchmark = states[0].to_benchmark();
    assert!(benchmark.contains("(check-sat)"));
    assert!(benchmark.contains("assert"));
}

#[test]
fn state_dump_lists_bindings_and_path() {
    let cfg = Config::new();
    let ctx = Context::new(&cfg);
    let (states, _) = run_prog(&ctx, "a := 1; b := 2");
    let dump = states[0].to_string();
    assert!(dump.contains("a: "));
    assert!(dump.contains("b: "));
    assert!(dump.contains("pc: ["));
    // bindings print in name order
    assert!(dump.find("a: ").unwrap() < dump.find("b: ").unwrap());
}
