#![deny(unsafe_code)]

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("failed to read file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("source directory not found: {path}")]
    MissingSourceDir { path: PathBuf },

    #[error("failed to walk source directory {path}: {source}")]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("failed to parse YAML {path}: {source}")]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("sheet name {name:?} in {path} is neither lower nor upper case")]
    InvalidSheetName { path: PathBuf, name: String },

    #[error("invalid baseline XML at {location}: {source}")]
    Xml {
        location: String,
        #[source]
        source: quick_xml::Error,
    },

    #[error("unexpected element <{element}> in baseline at {location}")]
    UnexpectedElement { element: String, location: String },

    #[error("missing attribute {attribute} on <{element}> at {location}")]
    MissingAttribute {
        attribute: &'static str,
        element: String,
        location: String,
    },

    #[error("invalid date {value:?} on <{element}> at {location}")]
    InvalidDate {
        value: String,
        element: String,
        location: String,
    },

    #[error("baseline document has no root element")]
    EmptyBaseline,

    #[error("invalid rewrite rule {rule}: {message}")]
    InvalidRewriteRule { rule: String, message: String },
}

impl IngestError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
