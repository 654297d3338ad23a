//! Error types for the export engine.

use std::path::PathBuf;

use repodump_repository::RepositoryError;
use thiserror::Error;

/// Errors that can occur while exporting.
#[derive(Debug, Error)]
pub enum ExportError {
    /// Repository access failed.
    #[error("repository error: {0}")]
    Repository(#[from] RepositoryError),

    /// An exclusion pattern does not compile.
    #[error("invalid exclusion pattern {pattern:?}: {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// The repository handed out something the export format cannot carry.
    #[error("invariant violation: {0}")]
    InvariantViolation(String),

    /// Writing a content file failed.
    #[error("content I/O error at {}: {source}", path.display())]
    ContentIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// XML writing error.
    #[error("XML error: {0}")]
    Xml(String),

    /// I/O error on the output document.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ExportError {
    /// Whether this error aborts the whole run.
    ///
    /// Only repository errors are recoverable; the property and object
    /// boundaries swallow them and carry on.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::Repository(_))
    }
}

/// Result type for export operations.
pub type Result<T> = std::result::Result<T, ExportError>;
