//! Hostlist parse errors.

use thiserror::Error;

/// Result type alias for hostlist operations.
pub type HostlistResult<T> = Result<T, HostlistError>;

/// Errors produced while parsing a hostlist expression.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum HostlistError {
    #[error("unbalanced brackets in expression: {0}")]
    UnbalancedBrackets(String),

    #[error("empty range in expression: {0}")]
    EmptyRange(String),

    #[error("invalid range bound: {0}")]
    InvalidBound(String),

    #[error("reversed range: {start}-{end}")]
    ReversedRange { start: u64, end: u64 },
}
