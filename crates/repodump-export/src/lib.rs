//! Streaming XML export of a repository object graph.
//!
//! The exporter writes one document containing the repository object, every
//! non-system class and property descriptor, and every data object reachable
//! from them by reference. Each object is written as a full element at most
//! once. Objects of non-retrievable classes cannot be fetched later, so they
//! are embedded right after the element that first references them.
//!
//! # Quick Start
//!
//! ```
//! use repodump_export::{ExportConfig, XmlExporter};
//! use repodump_repository::{DataType, RepositoryBuilder};
//!
//! let mut builder = RepositoryBuilder::new("repo-1", "Documents");
//! let doc = builder.add_class("custom", "Doc", None);
//! let person = builder.add_class("custom", "Person", None);
//! let owner = builder.add_property(doc, "custom", "owner", DataType::Reference);
//! let a = builder.add_object("A", doc);
//! builder.set_reference(a, owner, "B");
//! builder.add_object("B", person);
//! builder.set_root_folder("A");
//! let repo = builder.build()?;
//!
//! let exporter = XmlExporter::new(&repo, ExportConfig::default())?;
//! let xml = exporter.export_to_string()?;
//! assert!(xml.contains("<Value>B</Value>"));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Exclusions and Content
//!
//! ```no_run
//! use repodump_export::{ExportConfig, XmlExporter};
//! use repodump_repository::Snapshot;
//!
//! let repo = Snapshot::load("repository.json")?.into_repository()?;
//! let config = ExportConfig::new()
//!     .with_exclude_class("custom:Audit.*")
//!     .with_exclude_id("system-user")
//!     .with_export_content(true)
//!     .with_content_directory("data");
//!
//! let stats = XmlExporter::new(&repo, config)?.export_with_progress(
//!     std::io::stdout(),
//!     |progress| eprintln!("{} exported, {} pending", progress.exported, progress.pending),
//! )?;
//! eprintln!("{} objects, {} content files", stats.objects, stats.content_files);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Errors
//!
//! Repository failures are recoverable: a property that cannot be read is
//! left empty and a queued reference that cannot be fetched is skipped, both
//! with a log event and a count in [`ExportStats`]. Content I/O failures,
//! output failures and values the format cannot carry abort the run.

mod config;
mod context;
mod dumper;
mod encode;
mod error;
mod exporter;
mod filter;
mod property;
mod state;
mod stats;
mod walker;
mod xml;

pub use config::{split_list, ExportConfig, DEFAULT_CONTENT_DIRECTORY};
pub use error::{ExportError, Result};
pub use exporter::XmlExporter;
pub use filter::ExclusionFilter;
pub use state::PendingQueue;
pub use stats::{ExportProgress, ExportStats};
pub use xml::{escape_text, XML_NAMESPACE};
