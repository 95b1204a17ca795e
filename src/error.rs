use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while loading, converting or plotting a matrix
#[derive(Debug, Error)]
pub enum SpyError {
    /// The matrix file could not be opened or read
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Malformed Matrix Market content (line numbers are 1-based)
    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },

    /// Well-formed but unsupported Matrix Market variant
    #[error("unsupported Matrix Market format: {0}")]
    UnsupportedFormat(String),

    /// The matrix has no rows or no columns, so there is nothing to lay out
    #[error("cannot plot a {rows} x {cols} matrix")]
    EmptyMatrix { rows: usize, cols: usize },

    /// Invalid figure parameters
    #[error("configuration error: {0}")]
    Config(String),

    /// Plotting backend failure
    #[error("render error: {0}")]
    Render(String),

    /// Window creation or event loop failure
    #[error("display error: {0}")]
    Display(String),
}

impl SpyError {
    pub(crate) fn parse(line: usize, message: impl Into<String>) -> Self {
        SpyError::Parse {
            line,
            message: message.into(),
        }
    }
}

/// Type alias for Results using SpyError
pub type Result<T> = std::result::Result<T, SpyError>;
