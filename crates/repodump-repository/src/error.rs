//! Error types for repository access.

use repodump_common::{ObjectId, QName};
use thiserror::Error;

use crate::DataType;

/// Errors reported by a repository or while building one.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// No object with this id can be fetched.
    #[error("object not found: {0}")]
    NotFound(ObjectId),

    /// The object's class does not declare or inherit the property.
    #[error("property {property} not found on object {object}")]
    PropertyNotFound { object: ObjectId, property: QName },

    /// Two objects share one id.
    #[error("duplicate object id: {0}")]
    DuplicateId(ObjectId),

    /// A stored value does not fit the property's declared type or cardinality.
    #[error("value of {property} on {object} does not match declared type {expected}")]
    ValueMismatch {
        object: ObjectId,
        property: QName,
        expected: DataType,
    },

    /// A builder handle that does not refer to anything in the builder.
    #[error("invalid {kind} handle: {index}")]
    InvalidHandle { kind: &'static str, index: u32 },

    /// Failure inside the backing store.
    #[error("repository backend error: {0}")]
    Backend(String),

    /// Malformed snapshot document.
    #[error("snapshot error: {0}")]
    Snapshot(String),

    /// JSON decoding error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Common library error.
    #[error("{0}")]
    Common(#[from] repodump_common::Error),
}

impl RepositoryError {
    /// Check if this is a "not found" failure.
    #[inline]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

/// Result type for repository operations.
pub type Result<T> = std::result::Result<T, RepositoryError>;
