//! Repodump - export a repository object graph as one XML document.
//!
//! This crate bundles the repodump library crates behind one dependency.
//!
//! # Crates
//!
//! - [`repodump_common`] - Identifiers and qualified names
//! - [`repodump_repository`] - Repository traits, the in-memory backend and JSON snapshots
//! - [`repodump_export`] - The streaming XML exporter
//!
//! # Example
//!
//! ```no_run
//! use repodump::prelude::*;
//!
//! let repo = Snapshot::load("repository.json")?.into_repository()?;
//! let config = ExportConfig::new().with_exclude_class("custom:Audit.*");
//!
//! let stats = XmlExporter::new(&repo, config)?.export_to_file("OpenDMA.xml")?;
//! println!("Objects: {}", stats.objects);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub use repodump_common as common;
pub use repodump_export as export;
pub use repodump_repository as repository;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use repodump_common::{Guid, ObjectId, QName};
    pub use repodump_export::{ExportConfig, ExportError, ExportProgress, ExportStats, XmlExporter};
    pub use repodump_repository::{
        ClassDescriptor, DataObject, DataType, MemoryRepository, PropertyDescriptor, Repository,
        RepositoryBuilder, Snapshot,
    };
}

// Re-export commonly used types at the crate root
pub use repodump_export::XmlExporter;

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
