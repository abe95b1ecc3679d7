//! Support for Android `strings.xml` resources.
//!
//! `<string>` and `<string-array>` elements are supported, in document order.
//! A `<string>` with child elements (e.g. `<b>`, `<font>`) keeps its content exactly as
//! written, entities included, so it can be written back unescaped.

use quick_xml::{
    Reader, Writer,
    events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event},
};
use std::io::{BufRead, Write};
use unic_langid::LanguageIdentifier;

use crate::{
    error::Error,
    formats::{read_inner_content, required_attribute},
    language::LanguageKey,
    traits::Parser,
    types::{StringItem, StringType, StringValue},
};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Format {
    /// Language of the file; `strings.xml` does not carry it, so readers leave it empty.
    pub language: String,
    pub nodes: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    String(StringResource),
    StringArray(StringArrayResource),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StringResource {
    pub name: String,
    /// `None` for a self-closing `<string/>`.
    pub content: Option<String>,
    /// The content is XML markup and is written without escaping (attributed strings).
    pub raw: bool,
}

impl StringResource {
    /// Markup content, or no content at all: a self-closing `<string/>` has
    /// nothing that reads as plain text.
    pub fn is_attributed(&self) -> bool {
        self.raw || self.content.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StringArrayResource {
    pub name: String,
    pub items: Vec<String>,
}

impl Node {
    pub fn name(&self) -> &str {
        match self {
            Node::String(sr) => &sr.name,
            Node::StringArray(sa) => &sa.name,
        }
    }

    /// Converts the node into a string item holding one value for `lang`.
    pub fn to_item(&self, lang: &LanguageKey) -> StringItem {
        match self {
            Node::String(sr) => {
                let string_type = if sr.is_attributed() {
                    StringType::Attributed
                } else {
                    StringType::Single
                };
                let mut item = StringItem::new(sr.name.clone(), string_type);
                item.set(
                    StringValue::Single(sr.content.clone().unwrap_or_default()),
                    lang,
                );
                item
            }
            Node::StringArray(sa) => {
                let mut item = StringItem::new(sa.name.clone(), StringType::Array);
                item.set(StringValue::Array(sa.items.clone()), lang);
                item
            }
        }
    }
}

impl Parser for Format {
    /// Parse from any reader.
    fn from_reader<R: BufRead>(reader: R) -> Result<Self, Error> {
        let mut xml_reader = Reader::from_reader(reader);
        xml_reader.config_mut().trim_text(false);

        let mut buf = Vec::new();
        let mut nodes = Vec::new();

        loop {
            match xml_reader.read_event_into(&mut buf) {
                Ok(Event::Start(ref e)) if e.name().as_ref() == b"string" => {
                    let name = required_attribute(e, "name", "string")?;
                    let inner = read_inner_content(&mut xml_reader, "string")?;
                    let (content, raw) = if inner.has_elements {
                        (inner.markup, true)
                    } else {
                        (inner.text, false)
                    };
                    nodes.push(Node::String(StringResource {
                        name,
                        content: Some(content),
                        raw,
                    }));
                }
                Ok(Event::Empty(ref e)) if e.name().as_ref() == b"string" => {
                    let name = required_attribute(e, "name", "string")?;
                    nodes.push(Node::String(StringResource {
                        name,
                        content: None,
                        raw: false,
                    }));
                }
                Ok(Event::Start(ref e)) if e.name().as_ref() == b"string-array" => {
                    let name = required_attribute(e, "name", "string-array")?;
                    let items = read_array_items(&mut xml_reader)?;
                    nodes.push(Node::StringArray(StringArrayResource { name, items }));
                }
                Ok(Event::Empty(ref e)) if e.name().as_ref() == b"string-array" => {
                    let name = required_attribute(e, "name", "string-array")?;
                    nodes.push(Node::StringArray(StringArrayResource {
                        name,
                        items: Vec::new(),
                    }));
                }
                Ok(Event::Eof) => break,
                Ok(_) => {}
                Err(e) => return Err(Error::XmlParse(e)),
            }
            buf.clear();
        }
        Ok(Format {
            language: String::new(),
            nodes,
        })
    }

    /// Write to any writer (file, memory, etc.).
    fn to_writer<W: Write>(&self, mut writer: W) -> Result<(), Error> {
        let mut xml_writer = Writer::new_with_indent(&mut writer, b' ', 4);

        xml_writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;
        xml_writer.write_event(Event::Start(BytesStart::new("resources")))?;

        for node in &self.nodes {
            match node {
                Node::String(sr) => {
                    let mut elem = BytesStart::new("string");
                    elem.push_attribute(("name", sr.name.as_str()));
                    match &sr.content {
                        Some(content) => {
                            xml_writer.write_event(Event::Start(elem))?;
                            let text = if sr.raw {
                                BytesText::from_escaped(content.as_str())
                            } else {
                                BytesText::new(content)
                            };
                            xml_writer.write_event(Event::Text(text))?;
                            xml_writer.write_event(Event::End(BytesEnd::new("string")))?;
                        }
                        None => xml_writer.write_event(Event::Empty(elem))?,
                    }
                }
                Node::StringArray(sa) => {
                    let mut elem = BytesStart::new("string-array");
                    elem.push_attribute(("name", sa.name.as_str()));
                    xml_writer.write_event(Event::Start(elem))?;
                    for item in &sa.items {
                        xml_writer.write_event(Event::Start(BytesStart::new("item")))?;
                        xml_writer.write_event(Event::Text(BytesText::new(item)))?;
                        xml_writer.write_event(Event::End(BytesEnd::new("item")))?;
                    }
                    xml_writer.write_event(Event::End(BytesEnd::new("string-array")))?;
                }
            }
        }

        xml_writer.write_event(Event::End(BytesEnd::new("resources")))?;
        writer.write_all(b"\n")?;
        Ok(())
    }
}

/// Name of the `res/` directory holding `lang`'s strings.
///
/// The base language lives in `values`; other languages get a qualifier in
/// Android notation: `values-ar`, `values-en-rUS`, `values-b+zh+Hans`.
pub fn values_dir(lang: &LanguageKey, base_lang: &LanguageKey) -> String {
    let tag = lang.lang_value();
    if tag == base_lang.lang_value() {
        return "values".to_string();
    }
    match tag.parse::<LanguageIdentifier>() {
        Ok(id) if id.script.is_some() => {
            let mut qualifier = format!("b+{}", id.language.as_str());
            if let Some(script) = id.script {
                qualifier.push('+');
                qualifier.push_str(script.as_str());
            }
            if let Some(region) = id.region {
                qualifier.push('+');
                qualifier.push_str(region.as_str());
            }
            format!("values-{}", qualifier)
        }
        Ok(id) => match id.region {
            Some(region) => format!("values-{}-r{}", id.language.as_str(), region.as_str()),
            None => format!("values-{}", id.language.as_str()),
        },
        Err(_) => format!("values-{}", tag),
    }
}

fn read_array_items<R: BufRead>(xml_reader: &mut Reader<R>) -> Result<Vec<String>, Error> {
    let mut buf = Vec::new();
    let mut items = Vec::new();

    loop {
        match xml_reader.read_event_into(&mut buf)? {
            Event::Start(e) if e.name().as_ref() == b"item" => {
                items.push(read_inner_content(xml_reader, "item")?.text);
            }
            Event::Empty(e) if e.name().as_ref() == b"item" => items.push(String::new()),
            Event::End(e) if e.name().as_ref() == b"string-array" => break,
            Event::Eof => {
                return Err(Error::InvalidResource(
                    "unexpected EOF inside <string-array>".to_string(),
                ));
            }
            _ => {}
        }
        buf.clear();
    }
    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::language::Os;
    use crate::traits::Parser;

    #[test]
    fn test_parse_strings_and_arrays_in_order() {
        let xml = r#"<?xml version="1.0" encoding="utf-8"?>
        <resources>
            <string name="hello">Hello</string>
            <string-array name="days">
                <item>Mon</item>
                <item>Tue</item>
            </string-array>
            <string name="bye">Goodbye</string>
        </resources>
        "#;
        let format = Format::from_str(xml).unwrap();
        let names: Vec<&str> = format.nodes.iter().map(Node::name).collect();
        assert_eq!(names, vec!["hello", "days", "bye"]);
        assert_eq!(
            format.nodes[1],
            Node::StringArray(StringArrayResource {
                name: "days".to_string(),
                items: vec!["Mon".to_string(), "Tue".to_string()],
            })
        );
    }

    #[test]
    fn test_nested_markup_is_attributed() {
        let xml = r#"<resources><string name="bold">Hello <b>World</b></string></resources>"#;
        let format = Format::from_str(xml).unwrap();
        let Node::String(sr) = &format.nodes[0] else {
            panic!("expected a string node");
        };
        assert_eq!(sr.content.as_deref(), Some("Hello <b>World</b>"));
        assert!(sr.is_attributed());
        let item = format.nodes[0].to_item(&LanguageKey::parse("en"));
        assert_eq!(item.string_type, StringType::Attributed);
    }

    #[test]
    fn test_plain_string_is_single() {
        let xml = r#"<resources><string name="plain">5 &lt; 6</string></resources>"#;
        let format = Format::from_str(xml).unwrap();
        let item = format.nodes[0].to_item(&LanguageKey::parse("en"));
        assert_eq!(item.string_type, StringType::Single);
        assert_eq!(
            item.value(&LanguageKey::parse("en"), Os::Android),
            Some(&StringValue::from("5 < 6"))
        );
    }

    #[test]
    fn test_self_closing_string_is_attributed_and_empty() {
        let xml = r#"<resources><string name="empty"/></resources>"#;
        let format = Format::from_str(xml).unwrap();
        let item = format.nodes[0].to_item(&LanguageKey::parse("en"));
        assert_eq!(item.string_type, StringType::Attributed);
        assert_eq!(
            item.value(&LanguageKey::parse("en"), Os::Android),
            Some(&StringValue::from(""))
        );
    }

    #[test]
    fn test_values_dir_naming() {
        let base = LanguageKey::parse("en");
        assert_eq!(values_dir(&LanguageKey::parse("en"), &base), "values");
        assert_eq!(values_dir(&LanguageKey::parse("ar"), &base), "values-ar");
        assert_eq!(values_dir(&LanguageKey::parse("en-US"), &base), "values-en-rUS");
        assert_eq!(values_dir(&LanguageKey::parse("pt-br"), &base), "values-pt-rBR");
        assert_eq!(values_dir(&LanguageKey::parse("zh-Hans"), &base), "values-b+zh+Hans");
    }

    #[test]
    fn test_missing_name_attribute() {
        let xml = r#"<resources><string>No name attr</string></resources>"#;
        let result = Format::from_str(xml);
        let err = format!("{:?}", result.unwrap_err());
        assert!(err.contains("missing 'name'"));
    }

    #[test]
    fn test_plurals_are_ignored() {
        let xml = r#"
        <resources>
            <string name="hello">Hello</string>
            <plurals name="apples">
                <item quantity="one">One apple</item>
                <item quantity="other">%d apples</item>
            </plurals>
        </resources>
        "#;
        let format = Format::from_str(xml).unwrap();
        assert_eq!(format.nodes.len(), 1);
    }

    #[test]
    fn test_writer_escapes_single_and_keeps_attributed_raw() {
        let format = Format {
            language: "en".to_string(),
            nodes: vec![
                StringValue::from("Fish & Chips").render("food", StringType::Single),
                StringValue::from("<b>Bold</b>").render("bold", StringType::Attributed),
                StringValue::Array(vec!["A".to_string()]).render("list", StringType::Array),
            ],
        };
        let out = format.to_string_lossy().unwrap();
        assert!(out.contains(r#"<string name="food">Fish &amp; Chips</string>"#));
        assert!(out.contains(r#"<string name="bold"><b>Bold</b></string>"#));
        assert!(out.contains(r#"<string-array name="list">"#));
        assert!(out.contains("<item>A</item>"));

        let reparsed = Format::from_str(&out).unwrap();
        assert_eq!(reparsed.nodes.len(), 3);
        assert_eq!(reparsed.nodes[0].name(), "food");
    }

    #[test]
    fn test_escaped_text_is_not_markup() {
        let xml = r#"<resources><string name="tag">&lt;b&gt;hi&lt;/b&gt;</string></resources>"#;
        let format = Format::from_str(xml).unwrap();
        let item = format.nodes[0].to_item(&LanguageKey::parse("en"));
        assert_eq!(item.string_type, StringType::Single);

        let out = format.to_string_lossy().unwrap();
        assert!(out.contains(r#"<string name="tag">&lt;b&gt;hi&lt;/b&gt;</string>"#));
        assert_eq!(Format::from_str(&out).unwrap(), format);
    }

    #[test]
    fn test_attributed_entities_survive_read_write_read() {
        let xml = r#"<resources><string name="x">Tom &amp; <b>Jerry</b> 5 &lt; 6</string></resources>"#;
        let format = Format::from_str(xml).unwrap();
        let Node::String(sr) = &format.nodes[0] else {
            panic!("expected a string node");
        };
        assert!(sr.is_attributed());
        assert_eq!(sr.content.as_deref(), Some("Tom &amp; <b>Jerry</b> 5 &lt; 6"));

        // Through the item model, as gen-seed and gen-strings do.
        let lang = LanguageKey::parse("en");
        let item = format.nodes[0].to_item(&lang);
        let written = Format {
            language: "en".to_string(),
            nodes: vec![item.value(&lang, Os::Android).unwrap().render("x", item.string_type)],
        }
        .to_string_lossy()
        .unwrap();
        assert!(written.contains(r#"<string name="x">Tom &amp; <b>Jerry</b> 5 &lt; 6</string>"#));

        let reparsed = Format::from_str(&written).unwrap();
        assert_eq!(reparsed.nodes, format.nodes);
    }
}
