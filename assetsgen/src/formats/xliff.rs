//! XLIFF 1.2 translation documents, shaped the way Xcode exports them.
//!
//! One `<file>` per strings source; each `<trans-unit>` carries the key as
//! `id`, the source text, the current translation (if any) and the comment
//! as a `<note>`.

use std::io::{BufRead, Write};

use quick_xml::{
    Reader, Writer,
    events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event},
};

use crate::{
    error::Error,
    formats::{attribute_value, read_inner_content, required_attribute},
    language::LanguageKey,
    traits::Parser,
};

const XLIFF_NAMESPACE: &str = "urn:oasis:names:tc:xliff:document:1.2";
const XSI_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema-instance";
const XLIFF_VERSION: &str = "1.2";
const SCHEMA_LOCATION: &str = "urn:oasis:names:tc:xliff:document:1.2 http://docs.oasis-open.org/xliff/v1.2/os/xliff-core-1.2-strict.xsd";

/// A whole `.xliff` document.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Format {
    pub files: Vec<XliffFile>,
}

/// The `<tool>` element of a file header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tool {
    pub id: String,
    pub name: String,
    pub version: String,
    pub build_num: String,
}

impl Default for Tool {
    fn default() -> Self {
        Tool {
            id: "com.apple.dt.xcode".to_string(),
            name: "Xcode".to_string(),
            version: "11.3.1".to_string(),
            build_num: "11C504".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XliffFile {
    /// Path of the translated file, e.g. `MyApp/en.lproj/Common.strings.json`.
    pub original: String,
    pub source_language: String,
    pub target_language: String,
    pub datatype: String,
    pub tool: Tool,
    pub units: Vec<TransUnit>,
}

impl XliffFile {
    pub fn new(
        original: impl Into<String>,
        source_language: &LanguageKey,
        target_language: &LanguageKey,
        units: Vec<TransUnit>,
    ) -> Self {
        XliffFile {
            original: original.into(),
            source_language: source_language.lang_value().to_string(),
            target_language: target_language.lang_value().to_string(),
            datatype: "plaintext".to_string(),
            tool: Tool::default(),
            units,
        }
    }

    pub fn target_key(&self) -> LanguageKey {
        LanguageKey::parse(&self.target_language)
    }

    pub fn source_key(&self) -> LanguageKey {
        LanguageKey::parse(&self.source_language)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransUnit {
    pub id: String,
    pub source: String,
    pub target: Option<String>,
    pub note: Option<String>,
}

impl Parser for Format {
    fn from_reader<R: BufRead>(reader: R) -> Result<Self, Error> {
        let mut xml_reader = Reader::from_reader(reader);
        xml_reader.config_mut().trim_text(false);

        let mut buf = Vec::new();
        let mut files = Vec::new();
        let mut current_file: Option<XliffFile> = None;
        let mut current_unit: Option<TransUnit> = None;

        loop {
            match xml_reader.read_event_into(&mut buf) {
                Ok(Event::Start(ref e)) => match e.name().as_ref() {
                    b"file" => current_file = Some(file_from_attributes(e)?),
                    b"tool" => apply_tool(e, current_file.as_mut())?,
                    b"trans-unit" => {
                        current_unit = Some(TransUnit {
                            id: required_attribute(e, "id", "trans-unit")?,
                            source: String::new(),
                            target: None,
                            note: None,
                        });
                    }
                    b"source" => {
                        let text = read_inner_content(&mut xml_reader, "source")?.text;
                        if let Some(unit) = current_unit.as_mut() {
                            unit.source = text;
                        }
                    }
                    b"target" => {
                        let text = read_inner_content(&mut xml_reader, "target")?.text;
                        if let Some(unit) = current_unit.as_mut() {
                            unit.target = Some(text).filter(|t| !t.is_empty());
                        }
                    }
                    b"note" => {
                        let text = read_inner_content(&mut xml_reader, "note")?.text;
                        if let Some(unit) = current_unit.as_mut() {
                            unit.note = Some(text);
                        }
                    }
                    _ => {}
                },
                Ok(Event::Empty(ref e)) => match e.name().as_ref() {
                    b"tool" => apply_tool(e, current_file.as_mut())?,
                    b"trans-unit" => {
                        let id = required_attribute(e, "id", "trans-unit")?;
                        if let Some(file) = current_file.as_mut() {
                            file.units.push(TransUnit {
                                id,
                                source: String::new(),
                                target: None,
                                note: None,
                            });
                        }
                    }
                    _ => {}
                },
                Ok(Event::End(ref e)) => match e.name().as_ref() {
                    b"trans-unit" => {
                        if let (Some(unit), Some(file)) = (current_unit.take(), current_file.as_mut())
                        {
                            file.units.push(unit);
                        }
                    }
                    b"file" => {
                        if let Some(file) = current_file.take() {
                            files.push(file);
                        }
                    }
                    _ => {}
                },
                Ok(Event::Eof) => break,
                Ok(_) => {}
                Err(e) => return Err(Error::XmlParse(e)),
            }
            buf.clear();
        }

        Ok(Format { files })
    }

    fn to_writer<W: Write>(&self, mut writer: W) -> Result<(), Error> {
        let mut xml_writer = Writer::new_with_indent(&mut writer, b' ', 4);

        xml_writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

        let mut root = BytesStart::new("xliff");
        root.push_attribute(("xmlns", XLIFF_NAMESPACE));
        root.push_attribute(("xmlns:xsi", XSI_NAMESPACE));
        root.push_attribute(("version", XLIFF_VERSION));
        root.push_attribute(("xsi:schemaLocation", SCHEMA_LOCATION));
        xml_writer.write_event(Event::Start(root))?;

        for file in &self.files {
            let mut elem = BytesStart::new("file");
            elem.push_attribute(("original", file.original.as_str()));
            elem.push_attribute(("source-language", file.source_language.as_str()));
            elem.push_attribute(("target-language", file.target_language.as_str()));
            elem.push_attribute(("datatype", file.datatype.as_str()));
            xml_writer.write_event(Event::Start(elem))?;

            xml_writer.write_event(Event::Start(BytesStart::new("header")))?;
            let mut tool = BytesStart::new("tool");
            tool.push_attribute(("tool-id", file.tool.id.as_str()));
            tool.push_attribute(("tool-name", file.tool.name.as_str()));
            tool.push_attribute(("tool-version", file.tool.version.as_str()));
            tool.push_attribute(("build-num", file.tool.build_num.as_str()));
            xml_writer.write_event(Event::Empty(tool))?;
            xml_writer.write_event(Event::End(BytesEnd::new("header")))?;

            xml_writer.write_event(Event::Start(BytesStart::new("body")))?;
            for unit in &file.units {
                let mut elem = BytesStart::new("trans-unit");
                elem.push_attribute(("id", unit.id.as_str()));
                elem.push_attribute(("xml:space", "preserve"));
                xml_writer.write_event(Event::Start(elem))?;

                write_text_element(&mut xml_writer, "source", &unit.source)?;
                if let Some(target) = unit.target.as_deref().filter(|t| !t.is_empty()) {
                    write_text_element(&mut xml_writer, "target", target)?;
                }
                match unit.note.as_deref() {
                    Some(note) => write_text_element(&mut xml_writer, "note", note)?,
                    None => xml_writer.write_event(Event::Empty(BytesStart::new("note")))?,
                }

                xml_writer.write_event(Event::End(BytesEnd::new("trans-unit")))?;
            }
            xml_writer.write_event(Event::End(BytesEnd::new("body")))?;
            xml_writer.write_event(Event::End(BytesEnd::new("file")))?;
        }

        xml_writer.write_event(Event::End(BytesEnd::new("xliff")))?;
        writer.write_all(b"\n")?;
        Ok(())
    }
}

fn file_from_attributes(e: &BytesStart) -> Result<XliffFile, Error> {
    Ok(XliffFile {
        original: attribute_value(e, b"original")?.unwrap_or_default(),
        source_language: attribute_value(e, b"source-language")?.unwrap_or_default(),
        target_language: required_attribute(e, "target-language", "file")?,
        datatype: attribute_value(e, b"datatype")?.unwrap_or_else(|| "plaintext".to_string()),
        tool: Tool::default(),
        units: Vec::new(),
    })
}

fn apply_tool(e: &BytesStart, file: Option<&mut XliffFile>) -> Result<(), Error> {
    let Some(file) = file else {
        return Ok(());
    };
    let defaults = Tool::default();
    file.tool = Tool {
        id: attribute_value(e, b"tool-id")?.unwrap_or(defaults.id),
        name: attribute_value(e, b"tool-name")?.unwrap_or(defaults.name),
        version: attribute_value(e, b"tool-version")?.unwrap_or(defaults.version),
        build_num: attribute_value(e, b"build-num")?.unwrap_or(defaults.build_num),
    };
    Ok(())
}

fn write_text_element<W: Write>(
    xml_writer: &mut Writer<W>,
    name: &str,
    text: &str,
) -> Result<(), Error> {
    xml_writer.write_event(Event::Start(BytesStart::new(name)))?;
    xml_writer.write_event(Event::Text(BytesText::new(text)))?;
    xml_writer.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Format {
        Format {
            files: vec![XliffFile::new(
                "MyApp/en.lproj/Common.strings.json",
                &LanguageKey::parse("en"),
                &LanguageKey::parse("ar.ios"),
                vec![
                    TransUnit {
                        id: "hello".to_string(),
                        source: "Hello & welcome".to_string(),
                        target: Some("Marhaba".to_string()),
                        note: Some("Greeting".to_string()),
                    },
                    TransUnit {
                        id: "bye".to_string(),
                        source: "Bye".to_string(),
                        target: None,
                        note: None,
                    },
                ],
            )],
        }
    }

    #[test]
    fn test_writer_layout() {
        let out = sample().to_string_lossy().unwrap();
        assert!(out.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(out.contains(r#"version="1.2""#));
        assert!(out.contains(r#"xmlns="urn:oasis:names:tc:xliff:document:1.2""#));
        assert!(out.contains(r#"source-language="en""#));
        // The OS suffix is not part of the file language.
        assert!(out.contains(r#"target-language="ar""#));
        assert!(out.contains(r#"datatype="plaintext""#));
        assert!(out.contains(r#"tool-id="com.apple.dt.xcode""#));
        assert!(out.contains(r#"<trans-unit id="hello" xml:space="preserve">"#));
        assert!(out.contains("<source>Hello &amp; welcome</source>"));
        assert!(out.contains("<target>Marhaba</target>"));
        assert!(out.contains("<note>Greeting</note>"));
        assert!(out.contains("<note/>"));
    }

    #[test]
    fn test_empty_target_is_not_written() {
        let mut doc = sample();
        doc.files[0].units[0].target = Some(String::new());
        let out = doc.to_string_lossy().unwrap();
        assert!(!out.contains("<target"));
    }

    #[test]
    fn test_round_trip_preserves_units() {
        let doc = sample();
        let parsed = Format::from_str(&doc.to_string_lossy().unwrap()).unwrap();
        assert_eq!(parsed.files.len(), 1);
        let file = &parsed.files[0];
        assert_eq!(file.original, "MyApp/en.lproj/Common.strings.json");
        assert_eq!(file.target_key(), LanguageKey::parse("ar"));
        assert_eq!(file.tool, Tool::default());
        assert_eq!(file.units, doc.files[0].units);
    }

    #[test]
    fn test_parse_xcode_export() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<xliff xmlns="urn:oasis:names:tc:xliff:document:1.2" version="1.2">
  <file original="MyApp/en.lproj/Common.strings.json" source-language="en" target-language="fr" datatype="plaintext">
    <header>
      <tool tool-id="com.apple.dt.xcode" tool-name="Xcode" tool-version="15.0" build-num="15A240d"/>
    </header>
    <body>
      <trans-unit id="title" xml:space="preserve">
        <source>  Title  </source>
        <target>  Titre  </target>
        <note>Screen title</note>
      </trans-unit>
    </body>
  </file>
</xliff>"#;
        let doc = Format::from_str(xml).unwrap();
        let file = &doc.files[0];
        assert_eq!(file.tool.version, "15.0");
        assert_eq!(file.units[0].source, "  Title  ");
        assert_eq!(file.units[0].target.as_deref(), Some("  Titre  "));
        assert_eq!(file.units[0].note.as_deref(), Some("Screen title"));
    }

    #[test]
    fn test_file_without_target_language_fails() {
        let xml = r#"<xliff version="1.2"><file original="a"><body/></file></xliff>"#;
        assert!(Format::from_str(xml).is_err());
    }
}
