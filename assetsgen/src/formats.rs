//! Resource file formats understood by assetsgen.
//!
//! This module re-exports the main type of each format and holds the
//! quick-xml helpers shared by the XML based readers.

pub mod android_xml;
pub mod strings;
pub mod xliff;

use std::io::BufRead;

use quick_xml::{
    Reader,
    events::{BytesStart, Event},
};

// Reexporting the formats for easier access
pub use android_xml::{Format as AndroidStringsFormat, Node as AndroidNode};
pub use strings::{Content, Format as StringsFormat};
pub use xliff::{Format as XliffFormat, TransUnit, XliffFile};

use crate::Error;

/// Value of the attribute `key` on `e`, unescaped.
pub(crate) fn attribute_value(e: &BytesStart, key: &[u8]) -> Result<Option<String>, Error> {
    for attr in e.attributes().with_checks(false) {
        let attr = attr?;
        if attr.key.as_ref() == key {
            return Ok(Some(attr.unescape_value()?.to_string()));
        }
    }
    Ok(None)
}

/// Like [`attribute_value`], failing when the attribute is absent.
pub(crate) fn required_attribute(e: &BytesStart, key: &str, tag: &str) -> Result<String, Error> {
    attribute_value(e, key.as_bytes())?
        .ok_or_else(|| Error::InvalidResource(format!("{} tag missing '{}'", tag, key)))
}

/// Content of an element, read up to its closing tag.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct InnerContent {
    /// Text unescaped; nested markup kept as written.
    pub text: String,
    /// Everything as written in the document, entities included.
    pub markup: String,
    /// Whether a child element was present.
    pub has_elements: bool,
}

/// Reads everything up to the closing tag of the current element.
pub(crate) fn read_inner_content<R: BufRead>(
    xml_reader: &mut Reader<R>,
    tag: &str,
) -> Result<InnerContent, Error> {
    let mut buf = Vec::new();
    let mut content = InnerContent::default();
    let mut depth = 0usize;

    loop {
        match xml_reader.read_event_into(&mut buf)? {
            Event::Text(e) => {
                content.markup.push_str(&String::from_utf8_lossy(&e));
                content.text.push_str(&e.unescape()?);
            }
            Event::CData(e) => {
                let data = String::from_utf8_lossy(&e);
                content.markup.push_str("<![CDATA[");
                content.markup.push_str(&data);
                content.markup.push_str("]]>");
                content.text.push_str(&data);
            }
            Event::Start(e) => {
                depth += 1;
                content.has_elements = true;
                content.push_markup(&format!("<{}>", String::from_utf8_lossy(&e)));
            }
            Event::Empty(e) => {
                content.has_elements = true;
                content.push_markup(&format!("<{}/>", String::from_utf8_lossy(&e)));
            }
            Event::End(e) => {
                if depth == 0 {
                    break;
                }
                depth -= 1;
                content.push_markup(&format!("</{}>", String::from_utf8_lossy(e.name().as_ref())));
            }
            Event::Eof => {
                return Err(Error::InvalidResource(format!(
                    "unexpected EOF inside <{}>",
                    tag
                )));
            }
            _ => {}
        }
        buf.clear();
    }
    Ok(content)
}

impl InnerContent {
    fn push_markup(&mut self, tag: &str) {
        self.text.push_str(tag);
        self.markup.push_str(tag);
    }
}
