//! All error types for the assetsgen crate.
//!
//! These are returned from all fallible operations (parsing, serialization, report writing, etc.).

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("XML parse error: {0}")]
    XmlParse(#[from] quick_xml::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid data: {0}")]
    DataMismatch(String),

    #[error("invalid resource: {0}")]
    InvalidResource(String),

    #[error("unknown os `{0}`, expected `ios` or `android`")]
    UnknownOs(String),
}

impl From<quick_xml::events::attributes::AttrError> for Error {
    fn from(value: quick_xml::events::attributes::AttrError) -> Self {
        Error::DataMismatch(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_parse_error() {
        let json_error = serde_json::from_str::<serde_json::Value>("{ invalid json }").unwrap_err();
        let error = Error::Parse(json_error);
        assert!(error.to_string().contains("parse error"));
    }

    #[test]
    fn test_io_error() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "File not found");
        let error = Error::Io(io_error);
        assert!(error.to_string().contains("I/O error"));
    }

    #[test]
    fn test_invalid_resource_error() {
        let error = Error::InvalidResource("string tag missing 'name'".to_string());
        assert_eq!(
            error.to_string(),
            "invalid resource: string tag missing 'name'"
        );
    }

    #[test]
    fn test_unknown_os_error() {
        let error = Error::UnknownOs("windows".to_string());
        assert_eq!(
            error.to_string(),
            "unknown os `windows`, expected `ios` or `android`"
        );
    }
}
