//! Error types for symbolic-term construction
//!
//! These are programming-contract violations in the analyzed program's
//! representation (a malformed tree, a read of a never-assigned variable),
//! not properties being checked; evaluation aborts and the error propagates.

use crate::translate::Sort;
use thiserror::Error;

/// Result type alias for SMT operations
pub type SmtResult<T> = std::result::Result<T, SmtError>;

/// Errors that can occur while building symbolic terms
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SmtError {
    /// Lookup of a variable that was never assigned
    #[error("unknown variable: {0}")]
    UnknownVariable(String),

    /// An expression used at the wrong sort
    #[error("sort mismatch for `{expr}`: expected {expected}, got {actual}")]
    SortMismatch {
        expr: String,
        expected: Sort,
        actual: Sort,
    },

    /// `not` applied to other than one operand
    #[error("`not` takes exactly one operand, got {0}")]
    NotArity(usize),

    /// An n-ary operator with nothing to fold
    #[error("operator `{0}` applied to an empty operand list")]
    EmptyOperands(String),
}
