//! Path exploration over imp statements
//!
//! The explorer turns one entry state into an ordered sequence of exit
//! states, forking at every branch point and pruning branches whose path
//! condition is unsatisfiable. Assertions and loop invariants become proof
//! obligations checked by satisfiability of their negation: a feasible
//! negated branch is a possible violation, reported as a diagnostic and
//! flagged on the offending state without stopping sibling exploration.
//!
//! Loops without an invariant are unrolled up to a fixed bound; loops with
//! one are verified inductively (base case on entry, preservation across an
//! abstracted iteration) and summarized by a single exit state.

use crate::state::SymState;
use imp_core::ast::{Expr, Stmt};
use imp_core::defuse::assigned_vars;
use imp_smt::{eval, eval_bool, fresh_like, SmtResult, Sort};
use std::fmt;
use tracing::{debug, warn};
use z3::ast::Ast;
use z3::Context;

/// Rounds of guard-splitting applied to a loop without an invariant
///
/// Paths still running after this many rounds are discarded: exploration of
/// such loops is a deliberate under-approximation and makes no soundness
/// claim. The truncation is surfaced as a [`Diagnostic::UnrollBoundExhausted`].
pub const UNROLL_BOUND: usize = 10;

/// A reported verification event
///
/// Soft failures carry the offending state, already flagged as an error
/// state; exploration of sibling branches continues unaffected.
pub enum Diagnostic<'ctx> {
    /// An assertion's negation is satisfiable on some path
    AssertViolation {
        cond: String,
        state: SymState<'ctx>,
    },
    /// The loop invariant can fail before the first iteration
    InvariantEntry {
        inv: String,
        state: SymState<'ctx>,
    },
    /// The loop invariant can fail after an arbitrary iteration
    InvariantInduction {
        inv: String,
        state: SymState<'ctx>,
    },
    /// A bounded loop still had live paths when the unroll cap was hit
    UnrollBoundExhausted { cond: String, dropped: usize },
}

impl<'ctx> Diagnostic<'ctx> {
    /// The offending state, for diagnostics that have one
    pub fn state(&self) -> Option<&SymState<'ctx>> {
        match self {
            Diagnostic::AssertViolation { state, .. }
            | Diagnostic::InvariantEntry { state, .. }
            | Diagnostic::InvariantInduction { state, .. } => Some(state),
            Diagnostic::UnrollBoundExhausted { .. } => None,
        }
    }

    /// Is this a verification failure (as opposed to an incompleteness note)?
    pub fn is_violation(&self) -> bool {
        !matches!(self, Diagnostic::UnrollBoundExhausted { .. })
    }
}

impl fmt::Display for Diagnostic<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::AssertViolation { cond, state } => {
                writeln!(f, "assertion may be violated: {}", cond)?;
                write!(f, "{}", state)
            }
            Diagnostic::InvariantEntry { inv, state } => {
                writeln!(f, "invariant may not hold on loop entry: {}", inv)?;
                write!(f, "{}", state)
            }
            Diagnostic::InvariantInduction { inv, state } => {
                writeln!(f, "invariant may not be preserved by the loop body: {}", inv)?;
                write!(f, "{}", state)
            }
            Diagnostic::UnrollBoundExhausted { cond, dropped } => write!(
                f,
                "unroll bound of {} reached on `while {}`: {} live path(s) discarded",
                UNROLL_BOUND, cond, dropped
            ),
        }
    }
}

/// Statement-level symbolic execution engine
pub struct Explorer<'ctx> {
    ctx: &'ctx Context,
    diagnostics: Vec<Diagnostic<'ctx>>,
}

impl<'ctx> Explorer<'ctx> {
    pub fn new(ctx: &'ctx Context) -> Self {
        Explorer {
            ctx,
            diagnostics: Vec::new(),
        }
    }

    /// Explore every feasible path of `program` from `entry`
    ///
    /// Returns the terminal states in production order. Diagnostics raised
    /// along the way accumulate on the explorer across calls.
    pub fn run(
        &mut self,
        program: &Stmt,
        entry: SymState<'ctx>,
    ) -> SmtResult<Vec<SymState<'ctx>>> {
        self.exec(program, entry)
    }

    /// Diagnostics raised so far, in exploration order
    pub fn diagnostics(&self) -> &[Diagnostic<'ctx>] {
        &self.diagnostics
    }

    /// Drain the accumulated diagnostics
    pub fn take_diagnostics(&mut self) -> Vec<Diagnostic<'ctx>> {
        std::mem::take(&mut self.diagnostics)
    }

    fn exec(&mut self, stmt: &Stmt, mut st: SymState<'ctx>) -> SmtResult<Vec<SymState<'ctx>>> {
        match stmt {
            Stmt::Skip => Ok(vec![st]),

            Stmt::PrintState => {
                println!("{}", st);
                Ok(vec![st])
            }

            Stmt::Assign { var, rhs } => {
                let value = eval(self.ctx, st.env(), rhs)?;
                // a brand-new symbol per write: older constraints keep
                // referring to the variable's previous symbol
                let fresh = fresh_like(self.ctx, var, &value);
                st.bind(var, fresh.clone());
                st.constrain(&fresh._eq(&value));
                Ok(vec![st])
            }

            Stmt::Havoc { vars } => {
                for var in vars {
                    let fresh = match st.get(var).map(|term| imp_smt::sort_of(term)) {
                        Some(Some(Sort::Bool)) => imp_smt::fresh_bool(self.ctx, var),
                        _ => imp_smt::fresh_int(self.ctx, var),
                    };
                    // deliberately no equality: all prior knowledge about
                    // the variable is erased
                    st.bind(var, fresh);
                }
                Ok(vec![st])
            }

            Stmt::Assume(cond) => {
                let constraint = eval_bool(self.ctx, st.env(), cond)?;
                st.constrain(&constraint);
                if st.is_infeasible() {
                    debug!(cond = %cond, "assume narrowed the path to infeasibility");
                    Ok(vec![])
                } else {
                    Ok(vec![st])
                }
            }

            Stmt::Assert(cond) => {
                let constraint = eval_bool(self.ctx, st.env(), cond)?;
                let (mut holds, mut fails) = st.fork();
                holds.constrain(&constraint);
                fails.constrain(&constraint.not());
                if !fails.is_infeasible() {
                    fails.mark_error();
                    warn!(cond = %cond, "assertion may be violated");
                    self.diagnostics.push(Diagnostic::AssertViolation {
                        cond: cond.to_string(),
                        state: fails,
                    });
                }
                if holds.is_infeasible() {
                    Ok(vec![])
                } else {
                    Ok(vec![holds])
                }
            }

            Stmt::If {
                cond,
                then_branch,
                else_branch,
            } => {
                let guard = eval_bool(self.ctx, st.env(), cond)?;
                let (mut then_st, mut else_st) = st.fork();
                then_st.constrain(&guard);
                else_st.constrain(&guard.not());

                let mut out = Vec::new();
                if then_st.is_infeasible() {
                    debug!(cond = %cond, "then-branch infeasible, pruned");
                } else {
                    out.extend(self.exec(then_branch, then_st)?);
                }
                if else_st.is_infeasible() {
                    debug!(cond = %cond, "else-branch infeasible, pruned");
                } else {
                    match else_branch {
                        Some(else_branch) => out.extend(self.exec(else_branch, else_st)?),
                        // no else-clause: the negated-guard state passes
                        // through unchanged
                        None => out.push(else_st),
                    }
                }
                Ok(out)
            }

            Stmt::Block(stmts) => {
                let mut states = vec![st];
                for s in stmts {
                    let mut next = Vec::new();
                    for cur in states {
                        next.extend(self.exec(s, cur)?);
                    }
                    states = next;
                    if states.is_empty() {
                        break;
                    }
                }
                Ok(states)
            }

            Stmt::While {
                cond,
                inv: Some(inv),
                body,
            } => self.exec_loop_inductive(cond, inv, body, st),

            Stmt::While {
                cond,
                inv: None,
                body,
            } => self.exec_loop_bounded(cond, body, st),
        }
    }

    /// Bounded unrolling for loops without an invariant
    ///
    /// Each round forks every live state on the guard: exit branches become
    /// results immediately, continue branches run the body once and seed the
    /// next round.
    fn exec_loop_bounded(
        &mut self,
        cond: &Expr,
        body: &Stmt,
        st: SymState<'ctx>,
    ) -> SmtResult<Vec<SymState<'ctx>>> {
        let mut out = Vec::new();
        let mut frontier = vec![st];

        for round in 0..UNROLL_BOUND {
            if frontier.is_empty() {
                break;
            }
            debug!(round, live = frontier.len(), "unrolling loop");
            let mut next = Vec::new();
            for cur in frontier {
                let guard = eval_bool(self.ctx, cur.env(), cond)?;
                let (mut enter, mut exit) = cur.fork();
                enter.constrain(&guard);
                exit.constrain(&guard.not());
                if !exit.is_infeasible() {
                    out.push(exit);
                }
                if !enter.is_infeasible() {
                    next.extend(self.exec(body, enter)?);
                }
            }
            frontier = next;
        }

        if !frontier.is_empty() {
            warn!(
                dropped = frontier.len(),
                "loop still live after {} rounds; discarding remaining paths", UNROLL_BOUND
            );
            self.diagnostics.push(Diagnostic::UnrollBoundExhausted {
                cond: cond.to_string(),
                dropped: frontier.len(),
            });
        }
        Ok(out)
    }

    /// Inductive verification for loops annotated with an invariant
    ///
    /// Replaces unrolling with a base-case check on entry and a preservation
    /// check across one iteration of an abstracted state in which every
    /// variable the body assigns has been forgotten. The single exit state
    /// (guard false, invariant assumed) stands for any number of completed
    /// iterations.
    fn exec_loop_inductive(
        &mut self,
        cond: &Expr,
        inv: &Expr,
        body: &Stmt,
        st: SymState<'ctx>,
    ) -> SmtResult<Vec<SymState<'ctx>>> {
        // base case: can the invariant fail before the first iteration?
        let entry_inv = eval_bool(self.ctx, st.env(), inv)?.simplify();
        let (mut entry_fails, mut abstracted) = st.fork();
        entry_fails.constrain(&entry_inv.not());
        if !entry_fails.is_infeasible() {
            entry_fails.mark_error();
            warn!(inv = %inv, "invariant may not hold on loop entry");
            self.diagnostics.push(Diagnostic::InvariantEntry {
                inv: inv.to_string(),
                state: entry_fails,
            });
        }

        // abstraction: forget every variable the body can write, erasing
        // how many iterations have already run
        for var in assigned_vars(body) {
            let fresh = match abstracted.get(&var).map(imp_smt::sort_of) {
                Some(Some(Sort::Bool)) => imp_smt::fresh_bool(self.ctx, &var),
                _ => imp_smt::fresh_int(self.ctx, &var),
            };
            abstracted.bind(&var, fresh);
        }

        // inductive hypothesis
        let hyp = eval_bool(self.ctx, abstracted.env(), inv)?.simplify();
        abstracted.constrain(&hyp);

        let guard = eval_bool(self.ctx, abstracted.env(), cond)?;
        let (mut enter, mut exit) = abstracted.fork();
        enter.constrain(&guard);
        exit.constrain(&guard.not());

        // inductive step: run the body once; the invariant must be
        // unavoidable afterwards on every resulting path
        if !enter.is_infeasible() {
            for mut after in self.exec(body, enter)? {
                let post_inv = eval_bool(self.ctx, after.env(), inv)?.simplify();
                after.constrain(&post_inv.not());
                if !after.is_infeasible() {
                    after.mark_error();
                    warn!(inv = %inv, "invariant may not be preserved by the loop body");
                    self.diagnostics.push(Diagnostic::InvariantInduction {
                        inv: inv.to_string(),
                        state: after,
                    });
                }
            }
        }

        // the loop's sole exit: guard false, invariant holds
        if exit.is_infeasible() {
            debug!(cond = %cond, "loop exit branch infeasible");
            Ok(vec![])
        } else {
            Ok(vec![exit])
        }
    }
}
