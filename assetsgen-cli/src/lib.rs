//! CLI library for testing purposes

pub mod commands;
pub mod config;
pub mod options;
pub mod path_glob;

pub use config::Config;
pub use options::{CommandError, Options, Settings};
pub use path_glob::expand_file_globs;
