//! Line-oriented XML output.
//!
//! The document is written through a quick-xml [`Writer`] without automatic
//! indentation: object and property elements get explicit newlines and
//! indents, while `Value` children stay inline inside their property.

use std::borrow::Cow;
use std::io::Write;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crate::{ExportError, Result};

pub(crate) const ROOT: &str = "OdmaXmlRepository";
pub(crate) const OBJECT: &str = "OdmaObject";
pub(crate) const PROPERTY: &str = "Property";
pub(crate) const VALUE: &str = "Value";

/// Namespace of the output document.
pub const XML_NAMESPACE: &str = "http://www.opendma.org/XMLRepository";

pub(crate) const OBJECT_INDENT: &str = "    ";
pub(crate) const PROPERTY_INDENT: &str = "        ";

/// Escape value text with fixed numeric character references.
///
/// Only `"`, `&`, `'`, `<` and `>` are replaced; everything else, non-ASCII
/// included, passes through.
pub fn escape_text(text: &str) -> Cow<'_, str> {
    if !text.contains(['"', '&', '\'', '<', '>']) {
        return Cow::Borrowed(text);
    }

    let mut escaped = String::with_capacity(text.len() + 16);
    for c in text.chars() {
        match c {
            '"' => escaped.push_str("&#x0022;"),
            '&' => escaped.push_str("&#x0026;"),
            '\'' => escaped.push_str("&#x0027;"),
            '<' => escaped.push_str("&#x003C;"),
            '>' => escaped.push_str("&#x003E;"),
            _ => escaped.push(c),
        }
    }
    Cow::Owned(escaped)
}

pub(crate) struct XmlSink<W: Write> {
    writer: Writer<W>,
}

impl<W: Write> XmlSink<W> {
    pub fn new(inner: W) -> Self {
        Self {
            writer: Writer::new(inner),
        }
    }

    pub fn declaration(&mut self) -> Result<()> {
        self.event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        self.newline()
    }

    pub fn start(&mut self, name: &str, attributes: &[(&str, &str)]) -> Result<()> {
        let mut elem = BytesStart::new(name);
        for &attribute in attributes {
            elem.push_attribute(attribute);
        }
        self.event(Event::Start(elem))
    }

    pub fn end(&mut self, name: &str) -> Result<()> {
        self.event(Event::End(BytesEnd::new(name)))
    }

    /// Write one `<Value>` element.
    pub fn value(&mut self, text: &str) -> Result<()> {
        self.start(VALUE, &[])?;
        self.event(Event::Text(BytesText::from_escaped(escape_text(text))))?;
        self.end(VALUE)
    }

    pub fn indent(&mut self, indent: &'static str) -> Result<()> {
        self.event(Event::Text(BytesText::from_escaped(indent)))
    }

    pub fn newline(&mut self) -> Result<()> {
        self.event(Event::Text(BytesText::from_escaped("\n")))
    }

    pub fn flush(&mut self) -> Result<()> {
        self.writer.get_mut().flush()?;
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }

    fn event(&mut self, event: Event<'_>) -> Result<()> {
        self.writer
            .write_event(event)
            .map_err(|e| ExportError::Xml(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_markup_characters() {
        assert_eq!(
            escape_text("a\"b&c'd<e>f"),
            "a&#x0022;b&#x0026;c&#x0027;d&#x003C;e&#x003E;f"
        );
    }

    #[test]
    fn test_escape_leaves_unicode_alone() {
        let text = "Grüße, 東京, ok";
        assert!(matches!(escape_text(text), Cow::Borrowed(t) if t == text));
    }

    #[test]
    fn test_sink_layout() {
        let mut sink = XmlSink::new(Vec::new());
        sink.indent(PROPERTY_INDENT).unwrap();
        sink.start(PROPERTY, &[("name", "a<b"), ("multiValue", "false")]).unwrap();
        sink.value("x&y").unwrap();
        sink.end(PROPERTY).unwrap();
        sink.newline().unwrap();

        let out = String::from_utf8(sink.into_inner()).unwrap();
        assert_eq!(
            out,
            "        <Property name=\"a&lt;b\" multiValue=\"false\"><Value>x&#x0026;y</Value></Property>\n"
        );
    }

    #[test]
    fn test_empty_element_is_not_collapsed() {
        let mut sink = XmlSink::new(Vec::new());
        sink.start(PROPERTY, &[]).unwrap();
        sink.end(PROPERTY).unwrap();
        assert_eq!(String::from_utf8(sink.into_inner()).unwrap(), "<Property></Property>");
    }

    #[test]
    fn test_declaration() {
        let mut sink = XmlSink::new(Vec::new());
        sink.declaration().unwrap();
        assert_eq!(
            String::from_utf8(sink.into_inner()).unwrap(),
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n"
        );
    }
}
