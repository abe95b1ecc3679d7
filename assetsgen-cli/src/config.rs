use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::Deserialize;

use crate::options::CommandError;

pub const CONFIG_FILE_NAME: &str = "assetsgen.toml";

/// Project defaults read from `assetsgen.toml`.
///
/// ```toml
/// base_lang = "en"
/// os = "android"
/// project = "MyApp"
/// langs = ["en", "ar", "fr"]
/// code_gen = true
/// postfix = ".xml"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    pub base_lang: Option<String>,
    pub os: Option<String>,
    pub project: Option<String>,
    pub langs: Option<Vec<String>>,
    pub code_gen: Option<bool>,
    pub postfix: Option<String>,
}

impl Config {
    /// Loads `path`, or `./assetsgen.toml` when no path is given and the file
    /// exists. An explicit path that cannot be read is an error.
    pub fn load(path: Option<&Path>) -> Result<Self, CommandError> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => {
                let default = PathBuf::from(CONFIG_FILE_NAME);
                if !default.is_file() {
                    return Ok(Config::default());
                }
                default
            }
        };
        let text = fs::read_to_string(&path).map_err(|e| CommandError::Config {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::parse(&text).map_err(|message| CommandError::Config {
            path: path.display().to_string(),
            message,
        })
    }

    pub fn parse(text: &str) -> Result<Self, String> {
        toml::from_str(text).map_err(|e| e.to_string())
    }
}
