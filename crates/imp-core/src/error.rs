//! Error types for the imp front end

use thiserror::Error;

/// Result type alias for parsing
pub type ParseResult<T> = std::result::Result<T, ParseError>;

/// Errors produced while lexing or parsing an imp program
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParseError {
    /// Input that matches no token
    #[error("unrecognized input at byte {0}")]
    Lex(usize),

    /// Integer literal too large for the language's integer type
    #[error("integer literal out of range at byte {0}")]
    IntOutOfRange(usize),

    /// Token stream ended where more input was required
    #[error("unexpected end of input, expected {expected}")]
    UnexpectedEof { expected: String },

    /// A token that does not fit the grammar at this position
    #[error("unexpected `{found}` at byte {at}, expected {expected}")]
    Unexpected {
        found: String,
        at: usize,
        expected: String,
    },
}
