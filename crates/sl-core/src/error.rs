use std::path::PathBuf;

/// Alias for `Result<T, StoreError>`.
pub type StoreResult<T> = Result<T, StoreError>;

/// Alias for `Result<T, ImportError>`.
pub type ImportResult<T> = Result<T, ImportError>;

/// Errors raised at the state store boundary.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Neither the persisted record nor the template exists.
    #[error("game state not found: {}", path.display())]
    NotFound {
        /// The path that was looked up last.
        path: PathBuf,
    },

    /// Reading or writing a record failed.
    #[error("cannot access {}: {source}", path.display())]
    Io {
        /// The file being accessed.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// A record exists but is not a valid game state document.
    #[error("invalid game state in {}: {source}", path.display())]
    InvalidRecord {
        /// The offending file.
        path: PathBuf,
        /// The JSON decoding error.
        source: serde_json::Error,
    },

    /// The in-memory state could not be encoded as JSON.
    #[error("cannot encode game state: {0}")]
    Encode(serde_json::Error),
}

/// Errors raised while importing a reference document.
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    /// The source file has an extension the importer cannot read.
    #[error("unsupported source format: {0} (use .pdf, .txt, or .md)")]
    UnsupportedFormat(String),

    /// The source file does not exist.
    #[error("source file not found: {}", .0.display())]
    SourceNotFound(PathBuf),

    /// Text extraction produced nothing.
    #[error("extracted content is empty")]
    EmptyContent,

    /// The external PDF extractor failed or is not installed.
    #[error("text extraction failed: {0}")]
    Extraction(String),

    /// Reading the source or writing the cached text failed.
    #[error("cannot access {}: {source}", path.display())]
    Io {
        /// The file being accessed.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The game state could not be loaded or saved.
    #[error(transparent)]
    Store(#[from] StoreError),
}
