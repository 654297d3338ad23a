//! Class hierarchy walk.
//!
//! Classes and their declared property descriptors are exported as ordinary
//! objects, in pre-order from the root class. System classes are not
//! exported themselves but their subtrees are still visited.

use std::io::Write;

use repodump_repository::ClassRef;
use tracing::{info, warn};

use crate::context::ExportContext;
use crate::Result;

impl<W: Write> ExportContext<'_, W> {
    pub(crate) fn walk_classes(&mut self, root: ClassRef) -> Result<()> {
        // Explicit stack; children are pushed in reverse to keep repository order.
        let mut stack = vec![root];

        while let Some(class) = stack.pop() {
            if !class.qname().is_system() {
                self.export_class(&class)?;
            }

            match class.sub_classes() {
                Ok(children) => stack.extend(children.into_iter().rev()),
                Err(e) => {
                    warn!(class = %class.qname(), error = %e, "failed to list subclasses");
                    self.stats.listing_failures += 1;
                }
            }
        }

        Ok(())
    }

    fn export_class(&mut self, class: &ClassRef) -> Result<()> {
        info!(class = %class.qname(), "exporting class");

        if !self.exported.contains(class.id()) {
            self.dump(class.as_object())?;
        }

        let declared = match class.declared_properties() {
            Ok(declared) => declared,
            Err(e) => {
                warn!(class = %class.qname(), error = %e, "failed to list declared properties");
                self.stats.listing_failures += 1;
                return Ok(());
            }
        };

        for info in &declared {
            if !self.exported.contains(info.id()) {
                self.dump(info.as_object())?;
            }
        }
        Ok(())
    }
}
