//! Mutable state of one export run.
//!
//! The behaviour is spread over several modules, each adding an `impl`
//! block: value encoding, property serialization, object dumping, the
//! class tree walk and the driver.

use std::io::Write;

use repodump_common::ObjectId;
use repodump_repository::Repository;

use crate::filter::ExclusionFilter;
use crate::state::{FxHashSet, PendingQueue};
use crate::xml::XmlSink;
use crate::{ExportConfig, ExportProgress, ExportStats};

pub(crate) struct ExportContext<'a, W: Write> {
    pub repository: &'a dyn Repository,
    pub config: &'a ExportConfig,
    pub filter: &'a ExclusionFilter,
    pub sink: XmlSink<W>,
    /// Ids written as full object elements.
    pub exported: FxHashSet<ObjectId>,
    pub pending: PendingQueue,
    /// Number of the next content file; starts at 1.
    pub next_content: u64,
    pub stats: ExportStats,
    progress: &'a mut dyn FnMut(ExportProgress),
}

impl<'a, W: Write> ExportContext<'a, W> {
    pub fn new(
        repository: &'a dyn Repository,
        config: &'a ExportConfig,
        filter: &'a ExclusionFilter,
        writer: W,
        progress: &'a mut dyn FnMut(ExportProgress),
    ) -> Self {
        Self {
            repository,
            config,
            filter,
            sink: XmlSink::new(writer),
            exported: FxHashSet::default(),
            pending: PendingQueue::new(),
            next_content: 1,
            stats: ExportStats::default(),
            progress,
        }
    }

    pub fn report_progress(&mut self) {
        let progress = ExportProgress {
            exported: self.exported.len(),
            pending: self.pending.len(),
        };
        (self.progress)(progress);
    }

    pub fn finish(mut self) -> crate::Result<(ExportStats, W)> {
        self.sink.flush()?;
        Ok((self.stats, self.sink.into_inner()))
    }
}
