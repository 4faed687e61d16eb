//! Markup construction
//!
//! Thin wrapper over the `quick-xml` event writer with open / leaf / close
//! semantics. All text and attribute values are escaped on write; nesting
//! discipline is the caller's responsibility.

use std::fmt;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crate::error::{Error, Result};

/// Streaming XML document builder backed by an in-memory buffer.
pub struct XmlBuilder {
    writer: Writer<Vec<u8>>,
}

impl fmt::Debug for XmlBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("XmlBuilder").finish_non_exhaustive()
    }
}

impl XmlBuilder {
    /// Builder that indents nested elements with `indent_width` spaces.
    pub fn pretty(indent_width: usize) -> Self {
        Self {
            writer: Writer::new_with_indent(Vec::new(), b' ', indent_width),
        }
    }

    /// Builder without any whitespace between elements.
    pub fn compact() -> Self {
        Self {
            writer: Writer::new(Vec::new()),
        }
    }

    /// Writes the `<?xml version="1.0" encoding="UTF-8"?>` declaration.
    pub fn declaration(&mut self) -> Result<()> {
        self.writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        Ok(())
    }

    /// Opens an element.
    pub fn open(&mut self, tag: &str) -> Result<()> {
        self.writer.write_event(Event::Start(BytesStart::new(tag)))?;
        Ok(())
    }

    /// Opens an element carrying attributes.
    pub fn open_with(&mut self, tag: &str, attributes: &[(&str, &str)]) -> Result<()> {
        let mut element = BytesStart::new(tag);
        for attribute in attributes {
            element.push_attribute(*attribute);
        }
        self.writer.write_event(Event::Start(element))?;
        Ok(())
    }

    /// Writes `<tag>text</tag>`.
    pub fn leaf(&mut self, tag: &str, text: &str) -> Result<()> {
        self.open(tag)?;
        self.writer.write_event(Event::Text(BytesText::new(text)))?;
        self.close(tag)
    }

    /// Writes `<tag attr="..">text</tag>`.
    pub fn leaf_with(&mut self, tag: &str, text: &str, attributes: &[(&str, &str)]) -> Result<()> {
        self.open_with(tag, attributes)?;
        self.writer.write_event(Event::Text(BytesText::new(text)))?;
        self.close(tag)
    }

    /// Closes the element opened with `tag`.
    pub fn close(&mut self, tag: &str) -> Result<()> {
        self.writer.write_event(Event::End(BytesEnd::new(tag)))?;
        Ok(())
    }

    /// Finishes the document and returns it as a string.
    pub fn finish(self) -> Result<String> {
        String::from_utf8(self.writer.into_inner()).map_err(|err| Error::Xml(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compact_output_has_no_whitespace() {
        let mut builder = XmlBuilder::compact();
        builder.declaration().unwrap();
        builder.open("Doc").unwrap();
        builder.leaf("Nm", "Telekomiker AG").unwrap();
        builder.close("Doc").unwrap();
        assert_eq!(
            builder.finish().unwrap(),
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?><Doc><Nm>Telekomiker AG</Nm></Doc>"
        );
    }

    #[test]
    fn pretty_output_indents_and_keeps_leaves_on_one_line() {
        let mut builder = XmlBuilder::pretty(2);
        builder.declaration().unwrap();
        builder.open("Doc").unwrap();
        builder.open("GrpHdr").unwrap();
        builder.leaf("MsgId", "SEPA/20260823").unwrap();
        builder.close("GrpHdr").unwrap();
        builder.close("Doc").unwrap();
        let document = builder.finish().unwrap();
        assert!(document.contains("\n<Doc>"));
        assert!(document.contains("\n  <GrpHdr>"));
        assert!(document.contains("\n    <MsgId>SEPA/20260823</MsgId>"));
        assert!(document.contains("\n  </GrpHdr>"));
    }

    #[test]
    fn text_and_attributes_are_escaped() {
        let mut builder = XmlBuilder::compact();
        builder
            .leaf_with("Ustrd", "Rate <1> & more", &[("note", "a\"b")])
            .unwrap();
        let document = builder.finish().unwrap();
        assert!(document.contains("Rate &lt;1&gt; &amp; more"));
        assert!(document.contains("note=\"a&quot;b\""));
    }

    #[test]
    fn amount_attribute_rides_on_the_leaf() {
        let mut builder = XmlBuilder::compact();
        builder
            .leaf_with("InstdAmt", "102.50", &[("Ccy", "EUR")])
            .unwrap();
        assert_eq!(
            builder.finish().unwrap(),
            "<InstdAmt Ccy=\"EUR\">102.50</InstdAmt>"
        );
    }
}
