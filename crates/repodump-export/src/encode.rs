//! Value encoding.

use std::fmt::Display;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::PathBuf;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use repodump_repository::{Content, ObjectRef, Value, DATETIME_FORMAT};
use tracing::{debug, trace};

use crate::context::ExportContext;
use crate::state::Frontier;
use crate::{ExportError, Result};

impl<W: Write> ExportContext<'_, W> {
    /// Write one value as a `<Value>` element, or nothing when the value is
    /// suppressed (excluded reference, content with export disabled).
    pub(crate) fn encode_value(&mut self, value: Value, frontier: &mut Frontier) -> Result<()> {
        let text = match value {
            Value::String(s) => Some(s),
            Value::Integer(v) => Some(v.to_string()),
            Value::Short(v) => Some(v.to_string()),
            Value::Long(v) => Some(v.to_string()),
            Value::Float(v) => Some(format_float(v)),
            Value::Double(v) => Some(format_float(v)),
            Value::Boolean(v) => Some(if v { "true" } else { "false" }.to_string()),
            Value::DateTime(v) => Some(v.format(DATETIME_FORMAT).to_string()),
            Value::Blob(bytes) => Some(BASE64.encode(bytes)),
            Value::Id(id) => Some(id.to_string()),
            Value::Reference(object) => self.encode_reference(object, frontier),
            Value::Content(content) => self.encode_content(&*content)?,
            Value::Guid(guid) => {
                return Err(ExportError::InvariantViolation(format!(
                    "guid {} handed out as a property value",
                    guid
                )))
            }
        };

        match text {
            Some(text) => self.sink.value(&text),
            None => Ok(()),
        }
    }

    /// Returns the id to write, queueing the target for export as needed.
    fn encode_reference(&mut self, object: ObjectRef, frontier: &mut Frontier) -> Option<String> {
        let class = object.class();
        let id = object.id().clone();

        if class.qname().is_system() {
            return Some(id.to_string());
        }
        if !self.filter.is_followable(&id, class.qname()) {
            debug!(id = %id, class = %class.qname(), "reference excluded");
            return None;
        }

        let text = id.to_string();
        if !self.exported.contains(&id) {
            if class.is_retrievable() {
                if self.pending.push(id, class.qname().clone()) {
                    trace!(id = %text, "queued reference");
                }
            } else {
                frontier.insert(id, object);
            }
        }
        Some(text)
    }

    /// Copy content into the next numbered file and return its path.
    fn encode_content(&mut self, content: &dyn Content) -> Result<Option<String>> {
        if !self.config.export_content {
            return Ok(None);
        }

        let dir = &self.config.content_directory;
        fs::create_dir_all(dir).map_err(|source| ExportError::ContentIo {
            path: dir.clone(),
            source,
        })?;

        let number = self.next_content;
        self.next_content += 1;
        let name = format!("{}/content{}.dat", dir.display(), number);
        let path = PathBuf::from(&name);
        let content_error = |source: io::Error| ExportError::ContentIo {
            path: path.clone(),
            source,
        };

        let mut reader = content.open().map_err(content_error)?;
        let mut file = File::create(&path).map_err(content_error)?;
        let bytes = io::copy(&mut reader, &mut file).map_err(content_error)?;
        file.flush().map_err(content_error)?;

        debug!(path = %name, bytes, "wrote content file");
        self.stats.content_files += 1;
        Ok(Some(name))
    }
}

/// Shortest round-trip text for finite values; `NaN`, `Infinity` and
/// `-Infinity` otherwise.
fn format_float<T>(value: T) -> String
where
    T: Copy + Display + Into<f64>,
{
    let wide: f64 = value.into();
    if wide.is_nan() {
        "NaN".to_string()
    } else if wide.is_infinite() {
        if wide > 0.0 { "Infinity" } else { "-Infinity" }.to_string()
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_finite_floats() {
        assert_eq!(format_float(2.5f64), "2.5");
        assert_eq!(format_float(0.25f32), "0.25");
        assert_eq!(format_float(-3.0f64), "-3");
        assert_eq!(format_float(1e21f64), "1000000000000000000000");
    }

    #[test]
    fn test_format_non_finite_floats() {
        assert_eq!(format_float(f64::NAN), "NaN");
        assert_eq!(format_float(f32::INFINITY), "Infinity");
        assert_eq!(format_float(f64::NEG_INFINITY), "-Infinity");
    }
}
