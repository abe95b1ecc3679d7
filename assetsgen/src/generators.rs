//! File-level workflows behind the CLI commands.
//!
//! Generators never abort a batch on a single bad file: unreadable inputs are
//! logged with `warn!` and treated as absent, failed writes are logged with
//! `error!` and skipped. Every generator returns the paths it wrote.

pub mod images;
pub mod seed;
pub mod strings;
pub mod xliff;
pub mod xml_strings;

use std::path::{Path, PathBuf};

use tracing::{error, warn};

use crate::{source::StringsSource, traits::Parser};

pub use images::AssetsGenerator;
pub use seed::SeedParser;
pub use strings::StringsGenerator;
pub use xliff::{XliffGenerator, XliffParser};
pub use xml_strings::XmlStringsReconciler;

/// Reads `files` (relative to `input_path`) as JSON string sources, skipping
/// the ones that cannot be read.
pub fn load_sources(input_path: &Path, files: &[String]) -> Vec<StringsSource> {
    files
        .iter()
        .filter_map(|file| read_or_warn(&input_path.join(file)))
        .collect()
}

pub(crate) fn read_or_warn<T: Parser>(path: &Path) -> Option<T> {
    match T::read_from(path) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "skipping unreadable input");
            None
        }
    }
}

pub(crate) fn write_or_log<T: Parser>(value: &T, path: PathBuf, written: &mut Vec<PathBuf>) {
    match value.write_to(&path) {
        Ok(()) => written.push(path),
        Err(e) => error!(path = %path.display(), error = %e, "failed to write output"),
    }
}

pub(crate) fn write_text_or_log(contents: &str, path: PathBuf, written: &mut Vec<PathBuf>) {
    let result = path
        .parent()
        .map_or(Ok(()), std::fs::create_dir_all)
        .and_then(|()| std::fs::write(&path, contents));
    match result {
        Ok(()) => written.push(path),
        Err(e) => error!(path = %path.display(), error = %e, "failed to write output"),
    }
}
