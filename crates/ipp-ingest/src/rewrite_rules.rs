//! Rewrite rule file.
//!
//! A YAML mapping from a dotted baseline path to its new dotted path, or to
//! `null` to drop the node. Rules are returned in file order.

use std::fs;
use std::path::Path;

use serde_yaml::{Mapping, Value};

use ipp_model::RewriteRule;

use crate::error::IngestError;

pub fn load_rewrite_rules(path: &Path) -> Result<Vec<RewriteRule>, IngestError> {
    let text = fs::read_to_string(path).map_err(|source| IngestError::io(path, source))?;
    parse_document(&text, path)
}

pub fn parse_rewrite_rules(yaml: &str) -> Result<Vec<RewriteRule>, IngestError> {
    parse_document(yaml, Path::new("<inline>"))
}

fn parse_document(text: &str, path: &Path) -> Result<Vec<RewriteRule>, IngestError> {
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }
    let document: Value = serde_yaml::from_str(text).map_err(|source| IngestError::Yaml {
        path: path.to_path_buf(),
        source,
    })?;
    rules_from_value(&document)
}

fn rules_from_value(document: &Value) -> Result<Vec<RewriteRule>, IngestError> {
    let mapping = match document {
        Value::Null => return Ok(Vec::new()),
        Value::Mapping(mapping) => mapping,
        other => {
            return Err(IngestError::InvalidRewriteRule {
                rule: format!("{other:?}"),
                message: "expected a mapping of dotted paths".to_string(),
            });
        }
    };
    rules_from_mapping(mapping)
}

fn rules_from_mapping(mapping: &Mapping) -> Result<Vec<RewriteRule>, IngestError> {
    let mut rules = Vec::with_capacity(mapping.len());
    for (old_path, new_path) in mapping {
        let Some(old_path) = old_path.as_str() else {
            return Err(IngestError::InvalidRewriteRule {
                rule: format!("{old_path:?}"),
                message: "the source path must be a string".to_string(),
            });
        };
        let new_path = match new_path {
            Value::Null => None,
            Value::String(new_path) => Some(new_path.as_str()),
            other => {
                return Err(IngestError::InvalidRewriteRule {
                    rule: old_path.to_string(),
                    message: format!("target must be a dotted path or null, found {other:?}"),
                });
            }
        };
        let rule = RewriteRule::from_dotted(old_path, new_path);
        if rule.old_path.is_empty() || rule.new_path.as_ref().is_some_and(Vec::is_empty) {
            return Err(IngestError::InvalidRewriteRule {
                rule: old_path.to_string(),
                message: "empty path".to_string(),
            });
        }
        rules.push(rule);
    }
    Ok(rules)
}
