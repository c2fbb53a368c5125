//! Remote scheduler API error types.

use thiserror::Error;

/// Result type alias for remote scheduler operations.
pub type RemoteResult<T> = Result<T, RemoteError>;

/// Errors returned by a [`RemoteClient`](crate::RemoteClient).
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RemoteError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("no content")]
    NoContent,

    #[error("api error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("http error: {0}")]
    Http(String),

    #[error("decode error: {0}")]
    Decode(String),
}

impl RemoteError {
    /// Whether this error means the object simply is not there.
    ///
    /// A node that has not registered with the scheduler yet surfaces as
    /// not-found/no-content; callers treat that as a zero-value result
    /// rather than a failure.
    pub fn is_absence(&self) -> bool {
        matches!(self, RemoteError::NotFound(_) | RemoteError::NoContent)
    }
}
