//! Parameter tree output.
//!
//! The merged tree is written in the legacy parameter XML vocabulary, one
//! file per top-level node plus `__root__.xml` for the root element.

mod error;
mod parameter_xml;

pub use error::OutputError;
pub use parameter_xml::{ROOT_FILE_NAME, render_document, write_tree};
