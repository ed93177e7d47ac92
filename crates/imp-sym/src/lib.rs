//! imp-sym - symbolic execution for imp programs
//!
//! Given a parsed program, the engine explores every feasible execution
//! path, pruning branches whose path condition the solver refutes, and
//! checks assertions and loop invariants along the way.
//!
//! # Example
//!
//! ```rust,ignore
//! use imp_sym::{Explorer, SymState};
//!
//! let program = imp_core::parse("x := 1; if x > 5 then skip")?;
//! let cfg = z3::Config::new();
//! let ctx = z3::Context::new(&cfg);
//! let mut explorer = Explorer::new(&ctx);
//! let states = explorer.run(&program, SymState::new(&ctx))?;
//! assert_eq!(states.len(), 1);
//! ```
//!
//! Exploration is single-threaded and deterministic: the same program
//! always produces the same sequence of terminal states and diagnostics.

pub mod exec;
pub mod state;

pub use exec::{Diagnostic, Explorer, UNROLL_BOUND};
pub use state::SymState;
