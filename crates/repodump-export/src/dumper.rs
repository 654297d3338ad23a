//! Object dumping.

use std::io::Write;

use repodump_repository::DataObject;
use tracing::{debug, warn};

use crate::context::ExportContext;
use crate::state::Frontier;
use crate::xml::{OBJECT, OBJECT_INDENT};
use crate::Result;

impl<W: Write> ExportContext<'_, W> {
    /// Export `object` as a full element, followed by every non-retrievable
    /// object it reaches, directly or transitively.
    pub(crate) fn dump(&mut self, object: &dyn DataObject) -> Result<()> {
        self.pending.remove(object.id());

        let mut frontier = Frontier::default();
        if self.write_object(object, &mut frontier)? {
            while let Some((id, inline)) = frontier.pop() {
                if self.pending.contains(&id) {
                    warn!(
                        id = %id,
                        "non-retrievable object is also queued for export; the repository may contain duplicate ids"
                    );
                }
                if self.write_object(&*inline, &mut frontier)? {
                    self.stats.inline_objects += 1;
                }
            }
        }

        self.report_progress();
        Ok(())
    }

    /// Write one `<OdmaObject>` element. Returns false if the object had
    /// already been exported and nothing was written.
    fn write_object(&mut self, object: &dyn DataObject, frontier: &mut Frontier) -> Result<bool> {
        let id = object.id();
        if self.exported.contains(id) {
            warn!(id = %id, "object already exported");
            self.stats.duplicate_dumps += 1;
            return Ok(false);
        }
        // Mark first so references back to this object are not queued again.
        self.exported.insert(id.clone());

        let class = object.class();
        debug!(id = %id, class = %class.qname(), "writing object");

        self.sink.indent(OBJECT_INDENT)?;
        self.sink.start(
            OBJECT,
            &[("classNamespace", class.namespace()), ("className", class.name())],
        )?;
        self.sink.newline()?;

        match class.properties() {
            Ok(properties) => {
                for info in &properties {
                    self.serialize_property(object, &**info, frontier)?;
                }
            }
            Err(e) => {
                warn!(id = %id, class = %class.qname(), error = %e, "failed to list properties");
                self.stats.property_failures += 1;
            }
        }

        self.sink.indent(OBJECT_INDENT)?;
        self.sink.end(OBJECT)?;
        self.sink.newline()?;

        self.stats.objects += 1;
        Ok(true)
    }
}
