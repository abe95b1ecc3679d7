use std::path::{Path, PathBuf};

use tracing::debug;

use crate::{
    formats::android_xml::Format as AndroidStringsFormat,
    generators::{read_or_warn, write_or_log},
    language::LanguageKey,
    source::StringsSource,
    types::StringItem,
};

/// Builds one string table out of per-language Android `strings.xml` exports.
///
/// The first language that defines a key fixes its position; later languages
/// only add their value to the existing item.
#[derive(Debug, Clone, Default)]
pub struct SeedParser {
    pub strings: Vec<StringItem>,
}

impl SeedParser {
    /// Reads `<input_path>/<lang><postfix>` for every language. Missing or
    /// malformed files are skipped.
    pub fn parse(input_path: &Path, postfix: &str, langs: &[LanguageKey]) -> Self {
        let mut parser = SeedParser::default();
        for lang in langs {
            let path = input_path.join(format!("{}{}", lang.lang_value(), postfix));
            if let Some(xml) = read_or_warn::<AndroidStringsFormat>(&path) {
                debug!(path = %path.display(), nodes = xml.nodes.len(), "merging seed strings");
                parser.merge(lang, &xml);
            }
        }
        parser
    }

    pub fn merge(&mut self, lang: &LanguageKey, xml: &AndroidStringsFormat) {
        for node in &xml.nodes {
            let new_item = node.to_item(lang);
            match self.strings.iter_mut().find(|item| item.key == new_item.key) {
                Some(item) => {
                    for element in new_item.values() {
                        item.set(element.value.clone(), &element.key);
                    }
                }
                None => self.strings.push(new_item),
            }
        }
    }

    /// The parsed items as a source named `<project>.strings`.
    pub fn source(&self, project_name: &str) -> StringsSource {
        StringsSource::new(format!("{}.strings", project_name), self.strings.clone())
    }

    /// Writes `seed.<project>.strings.json`.
    pub fn generate_seed(&self, output_path: &Path, project_name: &str) -> Vec<PathBuf> {
        let mut written = Vec::new();
        let path = output_path.join(format!("seed.{}.strings.json", project_name));
        write_or_log(&self.source(project_name), path, &mut written);
        written
    }
}
