//! Writer for Apple `.strings` files.
//!
//! Values are rendered from [`Content`] blocks of a [`crate::StringsSource`]; there is no reader,
//! the JSON source stays the single source of truth.

use std::{io::Write, path::Path};

use indoc::indoc;
use lazy_static::lazy_static;
use regex::Regex;

use crate::{error::Error, language::LanguageKey};

lazy_static! {
    // `%s` and `%1$s`, any case.
    static ref STRING_SPECIFIER_REGEX: Regex = Regex::new(r"(?i)%(\d+\$)?s").unwrap();
}

/// The `.strings` rendering of one string for one language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Content {
    pub lang: LanguageKey,
    /// Comment without the comment markers.
    pub comment: String,
    pub key: String,
    /// Localizable value: quotes escaped, array items wrapped in `<item>` tags.
    pub value: String,
}

impl Content {
    /// The value as written into the file: newlines escaped and C string
    /// specifiers rewritten to object specifiers (`%s` → `%@`, `%2$s` → `%2$@`).
    pub fn formatted_value(&self) -> String {
        fix_format_specifiers(&self.value.replace('\n', "\\n"))
    }
}

impl std::fmt::Display for Content {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "/* {} */\n\"{}\" = \"{}\";",
            self.comment,
            self.key,
            self.formatted_value()
        )
    }
}

fn fix_format_specifiers(value: &str) -> String {
    STRING_SPECIFIER_REGEX
        .replace_all(value, |caps: &regex::Captures| {
            format!("%{}@", caps.get(1).map_or("", |m| m.as_str()))
        })
        .into_owned()
}

/// An Apple `.strings` file for one language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Format {
    pub language: String,
    pub contents: Vec<Content>,
}

impl Format {
    /// Body of the file: one block per content, separated by a blank line.
    pub fn body(&self) -> String {
        self.contents
            .iter()
            .map(Content::to_string)
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    pub fn to_writer<W: Write>(&self, mut writer: W) -> Result<(), Error> {
        let header = format!(
            indoc! {"
            // This file is automatically generated by assetsgen.
            // Do not edit it manually, as your changes will be overwritten.
            //
            //: Language: {}
            //

            "},
            self.language
        );

        writer.write_all(header.as_bytes())?;
        writer.write_all(self.body().as_bytes())?;
        writer.write_all(b"\n")?;
        Ok(())
    }

    pub fn write_to<P: AsRef<Path>>(&self, path: P) -> Result<(), Error> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let file = std::fs::File::create(path)?;
        self.to_writer(std::io::BufWriter::new(file))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn content(value: &str) -> Content {
        Content {
            lang: LanguageKey::parse("en"),
            comment: "Greeting".to_string(),
            key: "hello".to_string(),
            value: value.to_string(),
        }
    }

    #[test]
    fn test_content_block() {
        assert_eq!(
            content("Hello").to_string(),
            "/* Greeting */\n\"hello\" = \"Hello\";"
        );
    }

    #[test]
    fn test_string_specifiers_become_object_specifiers() {
        assert_eq!(
            content("%s has %d items, %1$s and %2$S").formatted_value(),
            "%@ has %d items, %1$@ and %2$@"
        );
    }

    #[test]
    fn test_newlines_are_escaped() {
        assert_eq!(content("a\nb").formatted_value(), "a\\nb");
    }

    #[test]
    fn test_body_separates_blocks_with_blank_line() {
        let format = Format {
            language: "en".to_string(),
            contents: vec![content("A"), content("B")],
        };
        assert_eq!(
            format.body(),
            "/* Greeting */\n\"hello\" = \"A\";\n\n/* Greeting */\n\"hello\" = \"B\";"
        );
    }

    #[test]
    fn test_writer_includes_language_header() {
        let format = Format {
            language: "ar".to_string(),
            contents: vec![content("A")],
        };
        let mut out = Vec::new();
        format.to_writer(&mut out).unwrap();
        let out = String::from_utf8(out).unwrap();
        assert!(out.contains("//: Language: ar"));
        assert!(out.ends_with("\"hello\" = \"A\";\n"));
    }
}
