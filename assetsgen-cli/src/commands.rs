//! One function per subcommand. Each takes resolved [`Settings`] and returns
//! the files it wrote.

use std::{fs, path::PathBuf};

use assetsgen::{
    CsvReportSink, StringsSource, audit_duplicates,
    generators::{
        AssetsGenerator, SeedParser, StringsGenerator, XliffGenerator, XliffParser,
        XmlStringsReconciler, load_sources,
    },
    report::{CHANGESET_REPORTS, DUPLICATE_REPORTS, XLIFF_RECONCILIATION_FILE},
    traits::Parser,
};
use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::{
    options::{CommandError, Settings},
    path_glob::expand_file_globs,
};

/// Removes the output directory unless cleanup is disabled.
pub fn clean_output(settings: &Settings) -> Result<(), CommandError> {
    let Some(output) = &settings.output_path else {
        return Ok(());
    };
    if settings.cleanup && output.exists() {
        info!(path = %output.display(), "cleaning output");
        fs::remove_dir_all(output)?;
    }
    Ok(())
}

pub fn gen_strings(settings: &Settings) -> Result<Vec<PathBuf>, CommandError> {
    let input = settings.input_path()?;
    let output = settings.output_path()?;
    let files = expand_file_globs(input, &settings.files)?;
    let sources = load_sources(input, &files);
    debug!(sources = sources.len(), os = %settings.os, "loaded string sources");

    let written = sources
        .par_iter()
        .flat_map(|source| {
            StringsGenerator::generate_source(
                source,
                &settings.base_lang,
                settings.os,
                settings.code_gen,
                output,
            )
        })
        .collect();
    Ok(written)
}

pub fn gen_trans(settings: &Settings) -> Result<Vec<PathBuf>, CommandError> {
    let input = settings.input_path()?;
    let output = settings.output_path()?;
    let langs = settings.langs()?;
    let files = expand_file_globs(input, &settings.files)?;
    let generator = XliffGenerator::new(
        settings.project.clone().unwrap_or_default(),
        load_sources(input, &files),
    );
    Ok(generator.generate(&settings.base_lang, langs, settings.filter_keys, output))
}

pub fn parse_trans(settings: &Settings) -> Result<Vec<PathBuf>, CommandError> {
    let input = settings.input_path()?;
    let sources_path = settings.sources_path()?;
    let output = settings.output_path()?;
    let files = expand_file_globs(input, &settings.files)?;
    let sources = expand_file_globs(sources_path, &settings.sources)?;

    let mut parser = XliffParser::new(load_sources(sources_path, &sources));
    let mut sink = CsvReportSink::with_reports(output, &[XLIFF_RECONCILIATION_FILE]);
    let written = parser.parse(input, &files, output, &settings.context(), &mut sink)?;
    sink.flush()?;
    Ok(written)
}

pub fn gen_seed(settings: &Settings) -> Result<Vec<PathBuf>, CommandError> {
    let input = settings.input_path()?;
    let output = settings.output_path()?;
    let project = settings.project()?;
    let langs = settings.langs()?;
    let parser = SeedParser::parse(input, &settings.postfix, langs);
    Ok(parser.generate_seed(output, project))
}

/// Reconciles Android XML exports with `<sources-path>/<proj>.strings.json`
/// (or the first `--sources` entry). A missing JSON source counts as empty.
pub fn parse_xml(settings: &Settings) -> Result<Vec<PathBuf>, CommandError> {
    let input = settings.input_path()?;
    let sources_path = settings.sources_path()?;
    let output = settings.output_path()?;
    let project = settings.project()?;

    let file_name = settings
        .sources
        .first()
        .cloned()
        .unwrap_or_else(|| format!("{}.strings.json", project));
    let old = match StringsSource::read_from(sources_path.join(&file_name)) {
        Ok(source) => source,
        Err(e) => {
            warn!(file = %file_name, error = %e, "no previous source, every key is new");
            StringsSource::new(format!("{}.strings", project), Vec::new())
        }
    };

    let parsed = SeedParser::parse(input, &settings.postfix, &settings.base_first_langs());
    let reports = [CHANGESET_REPORTS.as_slice(), DUPLICATE_REPORTS.as_slice()].concat();
    let mut sink = CsvReportSink::with_reports(output, &reports);
    let written = XmlStringsReconciler::new(old).generate(
        parsed.strings,
        &settings.context(),
        &mut sink,
        output,
        project,
    )?;
    sink.flush()?;
    Ok(written)
}

pub fn analyze_strings(settings: &Settings) -> Result<Vec<PathBuf>, CommandError> {
    let input = settings.input_path()?;
    let output = settings.output_path()?;
    let files = expand_file_globs(input, &settings.files)?;
    let ctx = settings.context();

    let mut sink = CsvReportSink::with_reports(output, &DUPLICATE_REPORTS);
    for source in load_sources(input, &files) {
        audit_duplicates(&source, &ctx, &mut sink)?;
    }
    sink.flush()?;
    Ok(Vec::new())
}

pub fn gen_images(settings: &Settings) -> Result<Vec<PathBuf>, CommandError> {
    let manifest = settings.input_path()?;
    let resources = settings.resources_path()?;
    let output = settings.output_path()?;

    match AssetsGenerator::read_from(manifest) {
        Ok(generator) => Ok(generator.generate(output, resources, settings.code_gen)),
        Err(e) => {
            warn!(path = %manifest.display(), error = %e, "skipping unreadable assets manifest");
            Ok(Vec::new())
        }
    }
}
