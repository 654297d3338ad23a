//! Property serialization.

use std::io::Write;

use repodump_common::QName;
use repodump_repository::{DataObject, DataType, PropertyDescriptor, PropertyValue, Value};
use tracing::{debug, warn};

use crate::context::ExportContext;
use crate::state::Frontier;
use crate::xml::{PROPERTY, PROPERTY_INDENT};
use crate::Result;

impl<W: Write> ExportContext<'_, W> {
    /// Write one `<Property>` element of `object`.
    ///
    /// Guid properties are skipped. A recoverable failure while reading the
    /// values is logged and leaves the element with whatever was written so
    /// far; the element is always closed.
    pub(crate) fn serialize_property(
        &mut self,
        object: &dyn DataObject,
        info: &dyn PropertyDescriptor,
        frontier: &mut Frontier,
    ) -> Result<()> {
        let data_type = info.data_type();
        if data_type == DataType::Guid {
            return Ok(());
        }

        let qname = info.qname();
        debug!(id = %object.id(), property = %qname, "writing property");

        self.sink.indent(PROPERTY_INDENT)?;
        self.sink.start(
            PROPERTY,
            &[
                ("namespace", qname.namespace()),
                ("name", qname.name()),
                ("type", data_type.as_str()),
                ("multiValue", if info.is_multi_value() { "true" } else { "false" }),
            ],
        )?;

        match self.write_values(object, qname, frontier) {
            Ok(()) => {}
            Err(e) if !e.is_fatal() => {
                let class = object.class();
                warn!(
                    id = %object.id(),
                    class = %class.qname(),
                    property = %qname,
                    error = %e,
                    "failed to export property"
                );
                self.stats.property_failures += 1;
            }
            Err(e) => return Err(e),
        }

        self.sink.end(PROPERTY)?;
        self.sink.newline()
    }

    fn write_values(&mut self, object: &dyn DataObject, qname: &QName, frontier: &mut Frontier) -> Result<()> {
        match object.property(qname)? {
            PropertyValue::Single(None) => {}
            PropertyValue::Single(Some(value)) => self.encode_value(value, frontier)?,
            PropertyValue::Multi(values) => {
                for value in values {
                    self.encode_value(value, frontier)?;
                }
            }
            PropertyValue::References(references) => {
                for reference in references {
                    self.encode_value(Value::Reference(reference?), frontier)?;
                }
            }
        }
        Ok(())
    }
}
