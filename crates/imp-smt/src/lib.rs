//! imp-smt - solver integration for imp
//!
//! This crate is the boundary between imp's AST and the Z3 solver:
//!
//! - Translation of imp expressions into integer- or boolean-sorted
//!   symbolic terms (`translate`)
//! - Fresh-symbol declaration, giving every variable write a unique
//!   identity
//! - Concrete model values and extraction (`value`)
//!
//! The solving context is always threaded explicitly as `&z3::Context`;
//! there is no process-wide solver handle.

pub mod error;
pub mod translate;
pub mod value;

pub use error::{SmtError, SmtResult};
pub use translate::{eval, eval_bool, eval_int, fresh_bool, fresh_int, fresh_like, sort_of, Env, Sort};
pub use value::{extract_state, ConcreteState, SmtValue};
