//! Error types for repodump-common.

use thiserror::Error;

/// Common error type for repodump operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid GUID format.
    #[error("invalid GUID format: {0}")]
    InvalidGuid(String),

    /// Qualified name without a `namespace:name` separator.
    #[error("invalid qualified name '{0}': expected 'namespace:name'")]
    InvalidQName(String),
}

/// Result type alias using the common Error type.
pub type Result<T> = std::result::Result<T, Error>;
