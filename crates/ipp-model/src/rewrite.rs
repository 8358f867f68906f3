use std::fmt;

use serde::{Deserialize, Serialize};

/// Relocation of a baseline node before the merge.
///
/// Removes the node at `old_path`; when `new_path` is set the node is
/// reinserted there under the last segment of `new_path`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewriteRule {
    pub old_path: Vec<String>,
    pub new_path: Option<Vec<String>>,
}

impl RewriteRule {
    /// Build a rule from dotted paths (`a.b.c`).
    pub fn from_dotted(old_path: &str, new_path: Option<&str>) -> Self {
        Self {
            old_path: split_dotted(old_path),
            new_path: new_path.map(split_dotted),
        }
    }

    pub fn is_removal(&self) -> bool {
        self.new_path.is_none()
    }
}

impl fmt::Display for RewriteRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.new_path {
            Some(new_path) => write!(f, "{} -> {}", self.old_path.join("."), new_path.join(".")),
            None => write!(f, "{} -> (removed)", self.old_path.join(".")),
        }
    }
}

fn split_dotted(path: &str) -> Vec<String> {
    path.split('.')
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
        .collect()
}
