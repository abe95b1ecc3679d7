//! A named, ordered string table: the JSON source of truth.

use std::{
    collections::BTreeSet,
    io::{BufRead, Write},
};

use serde::{Deserialize, Serialize};

use crate::{
    error::Error,
    formats::{
        android_xml::Format as AndroidStringsFormat,
        strings::{Content, Format as StringsFormat},
        xliff::{TransUnit, XliffFile},
    },
    language::LanguageKey,
    swift::SwiftCode,
    traits::Parser,
    types::StringItem,
};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct StringsSource {
    #[serde(rename = "fileName")]
    pub file_name: String,

    /// Name of the generated Swift enum; no code is generated without it.
    #[serde(rename = "codeName", default)]
    pub code_name: Option<String>,

    #[serde(default)]
    pub strings: Vec<StringItem>,
}

impl StringsSource {
    pub fn new(file_name: impl Into<String>, strings: Vec<StringItem>) -> Self {
        StringsSource {
            file_name: file_name.into(),
            code_name: None,
            strings,
        }
    }

    /// Every language with a plain (not OS-specific) value in any item, sorted.
    pub fn langs(&self) -> Vec<LanguageKey> {
        self.strings
            .iter()
            .flat_map(StringItem::langs)
            .cloned()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn item(&self, key: &str) -> Option<&StringItem> {
        self.strings.iter().find(|item| item.key == key)
    }

    pub fn item_mut(&mut self, key: &str) -> Option<&mut StringItem> {
        self.strings.iter_mut().find(|item| item.key == key)
    }

    /// `.strings` contents for `lang`, in item order. Items without a value are skipped.
    pub fn localized(&self, lang: &LanguageKey) -> Vec<Content> {
        self.strings
            .iter()
            .filter_map(|item| item.localizable(lang))
            .collect()
    }

    pub fn strings_format(&self, lang: &LanguageKey) -> StringsFormat {
        StringsFormat {
            language: lang.lang_value().to_string(),
            contents: self.localized(lang),
        }
    }

    /// `.strings` text for `lang`: one block per item, blank line separated.
    pub fn localized_content(&self, lang: &LanguageKey) -> String {
        self.strings_format(lang).body()
    }

    /// Android `strings.xml` document for `lang`.
    pub fn xml(&self, lang: &LanguageKey) -> AndroidStringsFormat {
        AndroidStringsFormat {
            language: lang.lang_value().to_string(),
            nodes: self
                .strings
                .iter()
                .filter_map(|item| item.xml(lang))
                .collect(),
        }
    }

    /// Translation request for `target_lang`.
    ///
    /// With `filter_existing`, keys already translated are left out. Returns
    /// `None` when there is nothing to translate, which is not an error.
    pub fn xliff_file(
        &self,
        source_lang: &LanguageKey,
        target_lang: &LanguageKey,
        project_name: &str,
        filter_existing: bool,
    ) -> Option<XliffFile> {
        let source_contents = self.localized(source_lang);
        let target_contents = self.localized(target_lang);
        let target_value = |key: &str| {
            target_contents
                .iter()
                .find(|content| content.key == key)
                .map(|content| content.value.clone())
        };

        let units: Vec<TransUnit> = source_contents
            .iter()
            .filter(|content| !filter_existing || target_value(&content.key).is_none())
            .map(|content| TransUnit {
                id: content.key.clone(),
                source: content.value.clone(),
                target: target_value(&content.key),
                note: Some(content.comment.clone()),
            })
            .collect();

        if units.is_empty() {
            return None;
        }

        let original = join_path(&[
            project_name,
            &format!("{}.lproj", source_lang.lang_value()),
            &self.file_name,
        ]);
        Some(XliffFile::new(original, source_lang, target_lang, units))
    }

    /// Table name used by `NSLocalizedString`: the file name without its last extension.
    pub fn table_name(&self) -> String {
        match self.file_name.rsplit_once('.') {
            Some((stem, _)) => stem.to_string(),
            None => self.file_name.clone(),
        }
    }

    /// Swift enum `name` with one accessor per item.
    pub fn swift_code(&self, name: &str, base_lang: &LanguageKey) -> Vec<SwiftCode> {
        let table_name = self.table_name();
        let content = self
            .strings
            .iter()
            .flat_map(|item| [item.swift_code(&table_name, base_lang), SwiftCode::Newline])
            .collect();
        vec![
            SwiftCode::Import("Foundation".to_string()),
            SwiftCode::Import("ZSWTaggedStringSwift".to_string()),
            SwiftCode::Newline,
            SwiftCode::Enum {
                name: name.to_string(),
                content,
            },
        ]
    }
}

// Joins non-empty path segments with `/`.
fn join_path(parts: &[&str]) -> String {
    parts
        .iter()
        .filter(|part| !part.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join("/")
}

impl Parser for StringsSource {
    fn from_reader<R: BufRead>(reader: R) -> Result<Self, Error> {
        serde_json::from_reader(reader).map_err(Error::Parse)
    }

    fn to_writer<W: Write>(&self, mut writer: W) -> Result<(), Error> {
        serde_json::to_writer_pretty(&mut writer, self).map_err(Error::Parse)?;
        writer.write_all(b"\n")?;
        Ok(())
    }
}
