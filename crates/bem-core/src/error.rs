//! Error types for pattern compilation.

use thiserror::Error;

/// Why a custom override pattern was rejected.
///
/// Rejection is never fatal: the compiler reports the rejection as a config
/// issue and substitutes the generated default for that kind.
#[derive(Debug, Error)]
pub enum PatternError {
    /// The override did not compile as a regular expression.
    #[error("pattern for {kind} does not compile: {source}")]
    InvalidPattern {
        kind: &'static str,
        #[source]
        source: regex::Error,
    },
}
