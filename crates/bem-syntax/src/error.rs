//! Parse error types for bem-syntax.
//!
//! The engine treats selector parse failures as a first-class outcome (a
//! degraded-coverage flag with one example selector), so these errors carry
//! enough context to be surfaced verbatim in a summary diagnostic.

use thiserror::Error;

/// Errors from the selector and stylesheet text parsers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("empty selector")]
    EmptySelector,

    #[error("unexpected '{found}' at offset {offset} in selector '{selector}'")]
    UnexpectedChar {
        found: char,
        offset: usize,
        selector: String,
    },

    #[error("unclosed '{delimiter}' in selector '{selector}'")]
    Unclosed { delimiter: char, selector: String },

    #[error("expected a declaration at line {line}, found '{text}'")]
    InvalidDeclaration { text: String, line: u32 },

    #[error("unexpected '}}' at line {line}")]
    UnexpectedClose { line: u32 },

    #[error("unclosed block opened at line {line}")]
    UnclosedBlock { line: u32 },

    #[error("unclosed comment opened at line {line}")]
    UnclosedComment { line: u32 },
}
