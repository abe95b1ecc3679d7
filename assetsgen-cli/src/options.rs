use std::path::{Path, PathBuf};

use assetsgen::{LanguageKey, Os, ReconcileContext};
use clap::Args;
use thiserror::Error;

use crate::config::Config;

/// Failures that stop a command before or while it runs.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("missing required option --{0}")]
    MissingOption(&'static str),

    #[error("invalid config {path}: {message}")]
    Config { path: String, message: String },

    #[error("invalid glob pattern '{pattern}': {message}")]
    Glob { pattern: String, message: String },

    #[error(transparent)]
    Library(#[from] assetsgen::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Options shared by every generating command.
#[derive(Args, Debug, Clone, Default)]
pub struct Options {
    /// Generate corresponding Swift code
    #[arg(long)]
    pub code_gen: bool,

    /// Keep the output directory instead of removing it first
    #[arg(long)]
    pub no_cleanup: bool,

    /// Only put keys without a translation into translation requests
    #[arg(long)]
    pub filter_keys: bool,

    /// Directory holding image resources
    #[arg(long)]
    pub resources_path: Option<PathBuf>,

    /// Directory holding the JSON string sources
    #[arg(long)]
    pub sources_path: Option<PathBuf>,

    /// Input directory, or the manifest file for gen-images
    #[arg(long)]
    pub input_path: Option<PathBuf>,

    /// Directory to write the output to
    #[arg(long)]
    pub output_path: Option<PathBuf>,

    /// Name of the project
    #[arg(long = "proj")]
    pub project: Option<String>,

    /// Comma-separated input files, relative to --input-path; globs allowed
    #[arg(long, value_delimiter = ',')]
    pub files: Vec<String>,

    /// Comma-separated JSON sources, relative to --sources-path; globs allowed
    #[arg(long, value_delimiter = ',')]
    pub sources: Vec<String>,

    /// Comma-separated language keys
    #[arg(long, value_delimiter = ',')]
    pub langs: Vec<String>,

    /// Baseline language [default: en]
    #[arg(long)]
    pub base_lang: Option<String>,

    /// Target platform, ios or android [default: ios]
    #[arg(long)]
    pub os: Option<String>,

    /// Suffix of per-language Android XML files [default: .xml]
    #[arg(long)]
    pub postfix: Option<String>,

    /// Config file [default: ./assetsgen.toml when present]
    #[arg(long)]
    pub config: Option<PathBuf>,
}

/// Options after merging flags, config file and defaults.
#[derive(Debug, Clone)]
pub struct Settings {
    pub code_gen: bool,
    pub cleanup: bool,
    pub filter_keys: bool,
    pub resources_path: Option<PathBuf>,
    pub sources_path: Option<PathBuf>,
    pub input_path: Option<PathBuf>,
    pub output_path: Option<PathBuf>,
    pub project: Option<String>,
    pub files: Vec<String>,
    pub sources: Vec<String>,
    pub langs: Vec<LanguageKey>,
    pub base_lang: LanguageKey,
    pub os: Os,
    pub postfix: String,
}

fn list(values: &[String]) -> Vec<String> {
    values
        .iter()
        .map(|value| value.trim())
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .collect()
}

impl Options {
    /// Flags win over the config file, which wins over built-in defaults.
    pub fn resolve(&self, config: &Config) -> Result<Settings, CommandError> {
        let os = match self.os.as_deref().or(config.os.as_deref()) {
            Some(os) => os.parse::<Os>()?,
            None => Os::Ios,
        };
        let base_lang = self
            .base_lang
            .as_deref()
            .or(config.base_lang.as_deref())
            .unwrap_or("en");
        let langs = if self.langs.is_empty() {
            config.langs.clone().unwrap_or_default()
        } else {
            self.langs.clone()
        };

        Ok(Settings {
            code_gen: self.code_gen || config.code_gen.unwrap_or(false),
            cleanup: !self.no_cleanup,
            filter_keys: self.filter_keys,
            resources_path: self.resources_path.clone(),
            sources_path: self.sources_path.clone(),
            input_path: self.input_path.clone(),
            output_path: self.output_path.clone(),
            project: self
                .project
                .clone()
                .or_else(|| config.project.clone())
                .filter(|project| !project.is_empty()),
            files: list(&self.files),
            sources: list(&self.sources),
            langs: list(&langs).iter().map(|lang| LanguageKey::parse(lang)).collect(),
            base_lang: LanguageKey::parse(base_lang.trim()),
            os,
            postfix: self
                .postfix
                .clone()
                .or_else(|| config.postfix.clone())
                .unwrap_or_else(|| ".xml".to_string()),
        })
    }
}

impl Settings {
    pub fn input_path(&self) -> Result<&Path, CommandError> {
        self.input_path
            .as_deref()
            .ok_or(CommandError::MissingOption("input-path"))
    }

    pub fn output_path(&self) -> Result<&Path, CommandError> {
        self.output_path
            .as_deref()
            .ok_or(CommandError::MissingOption("output-path"))
    }

    pub fn sources_path(&self) -> Result<&Path, CommandError> {
        self.sources_path
            .as_deref()
            .ok_or(CommandError::MissingOption("sources-path"))
    }

    pub fn resources_path(&self) -> Result<&Path, CommandError> {
        self.resources_path
            .as_deref()
            .ok_or(CommandError::MissingOption("resources-path"))
    }

    pub fn project(&self) -> Result<&str, CommandError> {
        self.project
            .as_deref()
            .ok_or(CommandError::MissingOption("proj"))
    }

    pub fn langs(&self) -> Result<&[LanguageKey], CommandError> {
        if self.langs.is_empty() {
            return Err(CommandError::MissingOption("langs"));
        }
        Ok(&self.langs)
    }

    /// The base language followed by the other requested languages.
    pub fn base_first_langs(&self) -> Vec<LanguageKey> {
        let mut langs = vec![self.base_lang.clone()];
        langs.extend(
            self.langs
                .iter()
                .filter(|lang| **lang != self.base_lang)
                .cloned(),
        );
        langs
    }

    pub fn context(&self) -> ReconcileContext {
        ReconcileContext::new(self.base_lang.clone(), self.os)
    }
}
