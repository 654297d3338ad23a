//! Export driver.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use repodump_repository::Repository;
use tracing::{error, info, warn};

use crate::context::ExportContext;
use crate::filter::ExclusionFilter;
use crate::xml::{ROOT, XML_NAMESPACE};
use crate::{ExportConfig, ExportError, ExportProgress, ExportStats, Result};

/// Exports a whole repository as one XML document.
pub struct XmlExporter<'a> {
    repository: &'a dyn Repository,
    config: ExportConfig,
    filter: ExclusionFilter,
}

impl<'a> XmlExporter<'a> {
    /// Create an exporter. Fails if an exclusion pattern does not compile.
    pub fn new(repository: &'a dyn Repository, config: ExportConfig) -> Result<Self> {
        let filter = ExclusionFilter::from_config(&config)?;
        Ok(Self {
            repository,
            config,
            filter,
        })
    }

    pub fn config(&self) -> &ExportConfig {
        &self.config
    }

    /// Write the document to `writer`.
    pub fn export<W: Write>(&self, writer: W) -> Result<ExportStats> {
        self.export_with_progress(writer, |_| {})
    }

    /// Write the document to `writer`, reporting progress after each
    /// top-level object.
    pub fn export_with_progress<W, F>(&self, writer: W, mut progress: F) -> Result<ExportStats>
    where
        W: Write,
        F: FnMut(ExportProgress),
    {
        let mut context = ExportContext::new(
            self.repository,
            &self.config,
            &self.filter,
            writer,
            &mut progress,
        );
        context.run()?;
        let (stats, _) = context.finish()?;
        Ok(stats)
    }

    /// Export into a string.
    pub fn export_to_string(&self) -> Result<String> {
        let mut output = Vec::new();
        self.export(&mut output)?;
        String::from_utf8(output).map_err(|e| ExportError::Xml(e.to_string()))
    }

    /// Export into a file. The file is written in place; an aborted run
    /// leaves a truncated document behind.
    pub fn export_to_file(&self, path: impl AsRef<Path>) -> Result<ExportStats> {
        let file = File::create(path.as_ref())?;
        self.export(BufWriter::new(file))
    }
}

impl<W: Write> ExportContext<'_, W> {
    pub(crate) fn run(&mut self) -> Result<()> {
        self.sink.declaration()?;
        let repository_id = self.repository.id().to_string();
        self.sink.start(
            ROOT,
            &[("xmlns", XML_NAMESPACE), ("repositoryObjectId", repository_id.as_str())],
        )?;
        self.sink.newline()?;

        info!(repository = %repository_id, "exporting repository object");
        let repository_object = self.repository.repository_object()?;
        self.dump(&*repository_object)?;

        info!("exporting class hierarchy");
        let root = self.repository.root_class()?;
        self.walk_classes(root)?;

        info!(pending = self.pending.len(), "exporting referenced objects");
        self.drain_pending()?;

        self.sink.end(ROOT)?;
        self.sink.newline()?;

        info!(
            objects = self.stats.objects,
            content_files = self.stats.content_files,
            "export finished"
        );
        Ok(())
    }

    fn drain_pending(&mut self) -> Result<()> {
        while let Some((id, class)) = self.pending.pop() {
            info!(id = %id, class = %class, "exporting referenced object");

            match self.repository.fetch(&id) {
                Ok(object) => self.dump(&*object)?,
                Err(e) if e.is_not_found() => {
                    warn!(id = %id, "referenced object not found");
                    self.stats.fetch_misses += 1;
                }
                Err(e) => {
                    error!(id = %id, error = %e, "failed to fetch referenced object");
                    self.stats.fetch_failures += 1;
                }
            }
        }
        Ok(())
    }
}
