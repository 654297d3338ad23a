//! Repository model for repodump.
//!
//! This crate defines what the exporter needs from a repository: objects
//! with typed properties, a class hierarchy whose classes and property
//! descriptors are objects themselves, and lookup by id. It also ships an
//! in-memory implementation that can be assembled with a builder or loaded
//! from a JSON snapshot.
//!
//! # Quick Start
//!
//! ```
//! use repodump_repository::{DataType, PropertyValue, QName, Repository, RepositoryBuilder, Value};
//!
//! let mut builder = RepositoryBuilder::new("repo-1", "Documents");
//! let doc = builder.add_class("custom", "Doc", None);
//! let title = builder.add_property(doc, "custom", "title", DataType::String);
//! let a = builder.add_object("A", doc);
//! builder.set_string(a, title, "Hello");
//! let repo = builder.build()?;
//!
//! let object = repo.fetch(&"A".into())?;
//! if let PropertyValue::Single(Some(Value::String(s))) = object.property(&QName::new("custom", "title"))? {
//!     println!("title: {}", s);
//! }
//! # Ok::<(), repodump_repository::RepositoryError>(())
//! ```
//!
//! # Snapshots
//!
//! ```no_run
//! use repodump_repository::Snapshot;
//!
//! let repo = Snapshot::load("repository.json")?.into_repository()?;
//! println!("{} objects", repo.object_count());
//! # Ok::<(), repodump_repository::RepositoryError>(())
//! ```
//!
//! # System Schema
//!
//! Metadata lives in the `opendma` namespace. Every class derives from
//! `opendma:Object`, which declares the id, guid and class of an object;
//! class descriptors, property descriptors and the repository object are
//! instances of `opendma:Class`, `opendma:PropertyInfo` and
//! `opendma:Repository`. See [`schema`] for the property names.

mod builder;
mod error;
mod memory;
mod snapshot;
mod traits;
mod types;
mod value;

pub mod schema;

// Capability traits
pub use traits::{
    ClassDescriptor, ClassRef, ContentRef, DataObject, ObjectRef, PropertyDescriptor,
    PropertyInfoRef, ReferenceIter, Repository,
};

// Value model
pub use types::DataType;
pub use value::{Content, Literal, MemoryContent, PropertyValue, Value};

// In-memory repository
pub use builder::{ClassHandle, ObjectHandle, PropertyHandle, RepositoryBuilder};
pub use memory::MemoryRepository;
pub use snapshot::{ClassEntry, ObjectEntry, PropertyEntry, RepositoryEntry, Snapshot, DATETIME_FORMAT};

pub use error::{RepositoryError, Result};
pub use repodump_common::{Guid, ObjectId, QName, SYSTEM_NAMESPACE};
