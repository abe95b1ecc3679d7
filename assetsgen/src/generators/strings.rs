use std::path::{Path, PathBuf};

use tracing::{debug, error};

use crate::{
    formats::android_xml::values_dir,
    generators::{write_or_log, write_text_or_log},
    language::{LanguageKey, Os},
    source::StringsSource,
    swift,
};

/// Platform string resources for a set of sources.
///
/// iOS: `<lang>.lproj/<fileName>` per language, plus `<codeName>.generated.swift`
/// when code generation is on. Android: `<fileName>/res/values[-<qualifier>]/strings.xml`.
#[derive(Debug, Clone)]
pub struct StringsGenerator {
    pub sources: Vec<StringsSource>,
}

impl StringsGenerator {
    pub fn new(sources: Vec<StringsSource>) -> Self {
        StringsGenerator { sources }
    }

    pub fn generate(
        &self,
        base_lang: &LanguageKey,
        os: Os,
        code_gen: bool,
        output_path: &Path,
    ) -> Vec<PathBuf> {
        self.sources
            .iter()
            .flat_map(|source| Self::generate_source(source, base_lang, os, code_gen, output_path))
            .collect()
    }

    /// Outputs of one source; independent of every other source.
    pub fn generate_source(
        source: &StringsSource,
        base_lang: &LanguageKey,
        os: Os,
        code_gen: bool,
        output_path: &Path,
    ) -> Vec<PathBuf> {
        let mut written = Vec::new();
        let langs = source.langs();
        debug!(source = %source.file_name, langs = langs.len(), os = %os, "generating strings");

        match os {
            Os::Ios => {
                for lang in &langs {
                    let path = output_path
                        .join(format!("{}.lproj", lang.lang_value()))
                        .join(&source.file_name);
                    match source.strings_format(lang).write_to(&path) {
                        Ok(()) => written.push(path),
                        Err(e) => error!(path = %path.display(), error = %e, "failed to write output"),
                    }
                }
                if code_gen {
                    if let Some(code_name) = &source.code_name {
                        let code = swift::render(&source.swift_code(code_name, base_lang));
                        let path = output_path.join(swift::swift_file_name(code_name));
                        write_text_or_log(&format!("{}\n", code), path, &mut written);
                    }
                }
            }
            Os::Android => {
                for lang in &langs {
                    let path = output_path
                        .join(&source.file_name)
                        .join("res")
                        .join(values_dir(lang, base_lang))
                        .join("strings.xml");
                    write_or_log(&source.xml(lang), path, &mut written);
                }
            }
        }
        written
    }
}
