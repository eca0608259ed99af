//! Error types for the turn pipeline.

use std::path::PathBuf;

use thiserror::Error;

/// Result type for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;

/// Errors that can escape a turn.
///
/// Oracle failures never show up here; each stage absorbs them.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The game state could not be loaded, saved, or reset.
    #[error(transparent)]
    Store(#[from] sl_core::StoreError),

    /// A prompt file exists but could not be read.
    #[error("cannot read prompt {}: {source}", path.display())]
    Prompt {
        /// The prompt file.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },
}
