//! imp-core - front end for the imp language
//!
//! The imp language is a small imperative language with integer and boolean
//! expressions, assignment, conditionals, while-loops (optionally annotated
//! with a loop invariant), havoc, assert/assume, and sequencing.
//!
//! This crate provides:
//!
//! - The AST (`ast`) - a closed set of node kinds, consumed read-only by
//!   downstream analyses
//! - Lexer (`lexer`) and parser (`parser`) for the concrete syntax
//! - A pretty printer (`pretty`) rendering AST nodes back to source
//! - The def-use collector (`defuse`) reporting which variables a subtree
//!   assigns

pub mod ast;
pub mod defuse;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod pretty;

pub use ast::{ArithOp, BoolOp, Expr, RelOp, Stmt};
pub use defuse::assigned_vars;
pub use error::ParseError;
pub use parser::parse;
