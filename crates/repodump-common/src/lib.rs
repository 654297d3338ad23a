//! Common types for repodump.
//!
//! This crate provides the identity and naming primitives shared by the
//! repository model and the export engine:
//!
//! - [`ObjectId`] - Opaque object identity, unique within a repository
//! - [`QName`] - Namespace-qualified name (`namespace:name`)
//! - [`Guid`] - 16-byte globally unique identifier
//! - [`SYSTEM_NAMESPACE`] - The reserved namespace that is never exported as data

mod error;
mod guid;
mod id;
mod qname;

pub use error::{Error, Result};
pub use guid::Guid;
pub use id::ObjectId;
pub use qname::QName;

/// Namespace reserved for repository metadata.
///
/// Classes in this namespace are referenced by bare id and never exported as
/// full objects.
pub const SYSTEM_NAMESPACE: &str = "opendma";
