//! Symbolic program states
//!
//! A symbolic state describes a set of concrete states: an environment
//! mapping each variable to its current symbolic term, plus the path
//! condition - the conjunction of every constraint added since program
//! entry. The environment is a persistent map, so forked states share
//! structure but can never observe each other's writes.
//!
//! Feasibility is never cached: `is_infeasible` issues a solver query every
//! time it is called. The state's incremental solver mirrors the path
//! exactly, one assertion per constraint.

use imp_smt::{extract_state, ConcreteState, Env};
use std::fmt;
use tracing::debug;
use z3::ast::{Bool, Dynamic};
use z3::{Context, SatResult, Solver};

/// One symbolic execution state
pub struct SymState<'ctx> {
    ctx: &'ctx Context,
    env: Env<'ctx>,
    path: Vec<Bool<'ctx>>,
    solver: Solver<'ctx>,
    error: bool,
}

impl<'ctx> SymState<'ctx> {
    /// The empty state at program entry: no bindings, no constraints
    pub fn new(ctx: &'ctx Context) -> Self {
        SymState {
            ctx,
            env: Env::new(),
            path: Vec::new(),
            solver: Solver::new(ctx),
            error: false,
        }
    }

    /// The solving context this state lives in
    pub fn ctx(&self) -> &'ctx Context {
        self.ctx
    }

    /// Current variable bindings
    pub fn env(&self) -> &Env<'ctx> {
        &self.env
    }

    /// Current term bound to a variable
    pub fn get(&self, name: &str) -> Option<&Dynamic<'ctx>> {
        self.env.get(name)
    }

    /// Bind a variable to a term, shadowing any previous binding
    ///
    /// The previous term stays alive in older constraints; rebinding never
    /// rewrites history.
    pub fn bind(&mut self, name: &str, term: Dynamic<'ctx>) {
        self.env.insert(name.to_string(), term);
    }

    /// Append a constraint to the path condition
    pub fn constrain(&mut self, constraint: &Bool<'ctx>) {
        self.path.push(constraint.clone());
        self.solver.assert(constraint);
    }

    /// Constraints added so far, in order
    pub fn path(&self) -> &[Bool<'ctx>] {
        &self.path
    }

    /// Does the path condition rule out every concrete state?
    ///
    /// `true` exactly when the solver reports unsat; callers must then drop
    /// the state. An `unknown` verdict is treated as feasible so that no
    /// path is silently hidden.
    pub fn is_infeasible(&self) -> bool {
        match self.solver.check() {
            SatResult::Unsat => true,
            SatResult::Sat => false,
            SatResult::Unknown => {
                debug!("solver returned unknown; treating path as feasible");
                false
            }
        }
    }

    /// Pick one concrete state consistent with this symbolic state
    ///
    /// `None` when the path condition is unsatisfiable (or the solver cannot
    /// produce a model).
    pub fn concretize(&self) -> Option<ConcreteState> {
        match self.solver.check() {
            SatResult::Sat => self
                .solver
                .get_model()
                .map(|model| extract_state(&model, &self.env)),
            _ => None,
        }
    }

    /// Split into two independent states for mutually exclusive branches
    ///
    /// Consumes the handle: there is no way to keep using a pre-fork state.
    /// Both results own the current environment and a fresh solver into
    /// which the path has been replayed; mutating one never affects the
    /// other.
    pub fn fork(self) -> (Self, Self) {
        let twin = self.replicate();
        (self, twin)
    }

    fn replicate(&self) -> Self {
        let solver = Solver::new(self.ctx);
        for constraint in &self.path {
            solver.assert(constraint);
        }
        SymState {
            ctx: self.ctx,
            env: self.env.clone(),
            path: self.path.clone(),
            solver,
            error: self.error,
        }
    }

    /// Flag this lineage as having failed a proof obligation
    ///
    /// Idempotent and irreversible.
    pub fn mark_error(&mut self) {
        self.error = true;
    }

    /// Has a proof obligation failed on this lineage?
    pub fn is_error(&self) -> bool {
        self.error
    }

    /// Export the accumulated path condition as an SMT-LIB benchmark
    pub fn to_benchmark(&self) -> String {
        format!("{}(check-sat)\n", self.solver)
    }
}

impl fmt::Display for SymState<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (name, term) in &self.env {
            writeln!(f, "{}: {}", name, term)?;
        }
        write!(f, "pc: [")?;
        for (i, constraint) in self.path.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", constraint)?;
        }
        write!(f, "]")?;
        if self.error {
            write!(f, "\n(error state)")?;
        }
        Ok(())
    }
}
