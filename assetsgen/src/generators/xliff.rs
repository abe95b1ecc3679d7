use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::{
    error::Error,
    formats::xliff::{Format as XliffFormat, XliffFile},
    generators::{read_or_warn, write_or_log},
    language::LanguageKey,
    reconcile::ReconcileContext,
    report::{ReportSink, XliffReconciliationRow},
    source::StringsSource,
    types::{StringValue, unescape_quotes},
};

/// Translation requests: one `<lang>.xliff` per target language.
#[derive(Debug, Clone)]
pub struct XliffGenerator {
    pub project_name: String,
    pub sources: Vec<StringsSource>,
}

impl XliffGenerator {
    pub fn new(project_name: impl Into<String>, sources: Vec<StringsSource>) -> Self {
        XliffGenerator {
            project_name: project_name.into(),
            sources,
        }
    }

    /// The document asking to translate every source from `source_lang` into `target_lang`.
    pub fn document(
        &self,
        source_lang: &LanguageKey,
        target_lang: &LanguageKey,
        filter_existing: bool,
    ) -> XliffFormat {
        XliffFormat {
            files: self
                .sources
                .iter()
                .filter_map(|source| {
                    source.xliff_file(source_lang, target_lang, &self.project_name, filter_existing)
                })
                .collect(),
        }
    }

    /// Writes `<lang>.xliff` for every target language except the base language.
    pub fn generate(
        &self,
        base_lang: &LanguageKey,
        target_langs: &[LanguageKey],
        filter_existing: bool,
        output_path: &Path,
    ) -> Vec<PathBuf> {
        let mut written = Vec::new();
        for target_lang in target_langs.iter().filter(|lang| *lang != base_lang) {
            let doc = self.document(base_lang, target_lang, filter_existing);
            debug!(lang = %target_lang, files = doc.files.len(), "generating translation request");
            let path = output_path.join(format!("{}.xliff", target_lang.lang_value()));
            write_or_log(&doc, path, &mut written);
        }
        written
    }
}

/// Applies translated XLIFF documents back onto their JSON sources.
#[derive(Debug, Clone)]
pub struct XliffParser {
    pub sources: Vec<StringsSource>,
}

impl XliffParser {
    pub fn new(sources: Vec<StringsSource>) -> Self {
        XliffParser { sources }
    }

    /// Merges every `<file>` of `doc` into the source whose file name its
    /// `original` path contains.
    ///
    /// Units whose `<source>` no longer matches the JSON value are reported,
    /// and still applied. A translation into the base language replaces all
    /// values of the item.
    pub fn apply(
        &mut self,
        doc: &XliffFormat,
        ctx: &ReconcileContext,
        sink: &mut dyn ReportSink,
    ) -> Result<(), Error> {
        for file in &doc.files {
            let Some(source) = self
                .sources
                .iter_mut()
                .find(|source| file.original.contains(source.file_name.as_str()))
            else {
                info!(original = %file.original, "no source matches translated file");
                continue;
            };
            apply_file(source, file, ctx, sink)?;
        }
        Ok(())
    }

    /// Reads `files` from `input_path`, applies them in order and writes every
    /// source to `<output_path>/<fileName>.json`.
    pub fn parse(
        &mut self,
        input_path: &Path,
        files: &[String],
        output_path: &Path,
        ctx: &ReconcileContext,
        sink: &mut dyn ReportSink,
    ) -> Result<Vec<PathBuf>, Error> {
        for file in files {
            if let Some(doc) = read_or_warn::<XliffFormat>(&input_path.join(file)) {
                self.apply(&doc, ctx, sink)?;
            }
        }

        let mut written = Vec::new();
        for source in &self.sources {
            let path = output_path.join(format!("{}.json", source.file_name));
            write_or_log(source, path, &mut written);
        }
        Ok(written)
    }
}

fn apply_file(
    source: &mut StringsSource,
    file: &XliffFile,
    ctx: &ReconcileContext,
    sink: &mut dyn ReportSink,
) -> Result<(), Error> {
    let source_lang = file.source_key();
    let target_lang = file.target_key();
    let is_base = target_lang.lang_value() == ctx.base_lang.lang_value();

    for unit in &file.units {
        let Some(item) = source.item_mut(&unit.id) else {
            continue;
        };

        if let Some(content) = item.localizable(&source_lang) {
            if unescape_quotes(&content.value) != unescape_quotes(&unit.source) {
                sink.xliff_reconciliation(XliffReconciliationRow {
                    key: unit.id.clone(),
                    json_base_value: content.value,
                    translated_base_value: unit.source.clone(),
                })?;
            }
        }

        let Some(target) = &unit.target else {
            continue;
        };
        // Sources are exported with `\"`; stored values keep plain quotes.
        let target = unescape_quotes(target);
        if is_base {
            item.reset_values(StringValue::from_localizable_text(&target), &target_lang);
        } else {
            item.set_text(&target, &target_lang);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        formats::xliff::TransUnit,
        report::MemoryReportSink,
        traits::Parser,
        types::{StringItem, StringType},
    };
    use std::fs;
    use tempfile::tempdir;

    fn source() -> StringsSource {
        StringsSource::new(
            "Common.strings",
            vec![
                StringItem::new("hello", StringType::Single)
                    .with_comment("Greeting")
                    .with_value("en", "Hello")
                    .with_value("en.ios", "Hi")
                    .with_value("ar", "مرحبا"),
                StringItem::new("bye", StringType::Single).with_value("en", "Bye"),
            ],
        )
    }

    fn translated(target_language: &str, units: Vec<TransUnit>) -> XliffFormat {
        XliffFormat {
            files: vec![XliffFile::new(
                "App/en.lproj/Common.strings",
                &LanguageKey::raw("en"),
                &LanguageKey::raw(target_language),
                units,
            )],
        }
    }

    fn unit(id: &str, source: &str, target: Option<&str>) -> TransUnit {
        TransUnit {
            id: id.to_string(),
            source: source.to_string(),
            target: target.map(str::to_string),
            note: None,
        }
    }

    #[test]
    fn test_generate_skips_base_language() {
        let dir = tempdir().unwrap();
        let generator = XliffGenerator::new("App", vec![source()]);
        let written = generator.generate(
            &LanguageKey::raw("en"),
            &[LanguageKey::raw("en"), LanguageKey::raw("ar"), LanguageKey::raw("fr")],
            false,
            dir.path(),
        );
        assert_eq!(written.len(), 2);
        assert!(!dir.path().join("en.xliff").exists());

        let doc = XliffFormat::read_from(dir.path().join("fr.xliff")).unwrap();
        let file = &doc.files[0];
        assert_eq!(file.original, "App/en.lproj/Common.strings");
        // iOS override wins in the exported source text.
        assert_eq!(file.units[0].source, "Hi");
        assert_eq!(file.units[0].target, None);
    }

    #[test]
    fn test_filter_existing_drops_translated_keys() {
        let generator = XliffGenerator::new("App", vec![source()]);
        let doc = generator.document(&LanguageKey::raw("en"), &LanguageKey::raw("ar"), true);
        let ids: Vec<&str> = doc.files[0].units.iter().map(|u| u.id.as_str()).collect();
        assert_eq!(ids, ["bye"]);
    }

    #[test]
    fn test_apply_sets_target_values() {
        let mut parser = XliffParser::new(vec![source()]);
        let mut sink = MemoryReportSink::default();
        let doc = translated("fr", vec![unit("hello", "Hi", Some("Salut")), unit("bye", "Bye", None)]);
        parser.apply(&doc, &ReconcileContext::default(), &mut sink).unwrap();

        let item = parser.sources[0].item("hello").unwrap();
        assert_eq!(item.get(&LanguageKey::raw("fr")), Some(&StringValue::Single("Salut".to_string())));
        assert_eq!(parser.sources[0].item("bye").unwrap().get(&LanguageKey::raw("fr")), None);
        assert!(sink.is_empty());
    }

    #[test]
    fn test_apply_reports_source_drift() {
        let mut parser = XliffParser::new(vec![source()]);
        let mut sink = MemoryReportSink::default();
        let doc = translated("fr", vec![unit("bye", "Goodbye", Some("Au revoir"))]);
        parser.apply(&doc, &ReconcileContext::default(), &mut sink).unwrap();

        assert_eq!(
            sink.xliff_reconciliations,
            vec![XliffReconciliationRow {
                key: "bye".to_string(),
                json_base_value: "Bye".to_string(),
                translated_base_value: "Goodbye".to_string(),
            }]
        );
        let item = parser.sources[0].item("bye").unwrap();
        assert!(item.get(&LanguageKey::raw("fr")).is_some());
    }

    #[test]
    fn test_base_language_translation_resets_values() {
        let mut parser = XliffParser::new(vec![source()]);
        let mut sink = MemoryReportSink::default();
        let doc = translated("en", vec![unit("hello", "Hi", Some("Hello there"))]);
        parser.apply(&doc, &ReconcileContext::default(), &mut sink).unwrap();

        let item = parser.sources[0].item("hello").unwrap();
        assert_eq!(item.values().len(), 1);
        assert_eq!(item.get(&LanguageKey::raw("en")), Some(&StringValue::Single("Hello there".to_string())));
    }

    #[test]
    fn test_parse_writes_json_per_source() {
        let input = tempdir().unwrap();
        let output = tempdir().unwrap();
        translated("ar", vec![unit("bye", "Bye", Some("مع السلامة"))])
            .write_to(input.path().join("ar.xliff"))
            .unwrap();

        let mut parser = XliffParser::new(vec![source()]);
        let mut sink = MemoryReportSink::default();
        let written = parser
            .parse(
                input.path(),
                &["ar.xliff".to_string(), "missing.xliff".to_string()],
                output.path(),
                &ReconcileContext::default(),
                &mut sink,
            )
            .unwrap();
        assert_eq!(written, vec![output.path().join("Common.strings.json")]);

        let json = fs::read_to_string(output.path().join("Common.strings.json")).unwrap();
        assert!(json.contains("مع السلامة"));
    }

    #[test]
    fn test_quoted_translation_is_stored_unescaped() {
        let quoted = StringsSource::new(
            "Common.strings",
            vec![StringItem::new("k", StringType::Single).with_value("en", "Say \"hi\"")],
        );
        let generator = XliffGenerator::new("App", vec![quoted.clone()]);
        let mut doc = generator.document(&LanguageKey::raw("en"), &LanguageKey::raw("fr"), false);
        let exported = doc.files[0].units[0].source.clone();
        assert_eq!(exported, "Say \\\"hi\\\"");
        doc.files[0].units[0].target = Some(exported);

        let mut parser = XliffParser::new(vec![quoted]);
        let mut sink = MemoryReportSink::default();
        parser.apply(&doc, &ReconcileContext::default(), &mut sink).unwrap();

        assert!(sink.is_empty());
        let fr = LanguageKey::raw("fr");
        assert_eq!(
            parser.sources[0].item("k").unwrap().get(&fr),
            Some(&StringValue::Single("Say \"hi\"".to_string()))
        );
        assert_eq!(
            parser.sources[0].localized_content(&fr),
            "/* No comments */\n\"k\" = \"Say \\\"hi\\\"\";"
        );
    }
}
