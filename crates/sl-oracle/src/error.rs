//! Error types for oracle calls.

use thiserror::Error;

/// Result type for oracle calls.
pub type OracleResult<T> = Result<T, OracleError>;

/// Errors that can occur while asking an oracle for a reply.
#[derive(Debug, Error)]
pub enum OracleError {
    /// The request could not be sent or the reply could not be read,
    /// including timeouts.
    #[error("oracle transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("oracle returned HTTP {0}")]
    Status(u16),

    /// The oracle is unavailable for another reason.
    #[error("oracle unavailable: {0}")]
    Unavailable(String),
}
