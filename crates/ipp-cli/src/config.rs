//! Run configuration file.
//!
//! ```toml
//! [collect]
//! effective_date_field = "Date d'effet"
//! unknown_tokens = ["-", "nc"]
//! ```
//!
//! Every key is optional; missing ones keep the built-in vocabulary.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use ipp_ingest::CollectOptions;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunConfig {
    pub collect: CollectOptions,
}

impl RunConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("read config {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("parse config {}", path.display()))
    }

    pub fn parse(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }
}
