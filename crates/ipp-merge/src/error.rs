#[derive(Debug, thiserror::Error)]
pub enum RewriteError {
    #[error("rewrite {rule}: path {path} not found in baseline")]
    PathNotFound { rule: String, path: String },

    #[error("rewrite {rule}: path {path} already exists in baseline")]
    PathExists { rule: String, path: String },

    #[error("rewrite {rule}: {path} is a {kind}, not a group")]
    NotAGroup {
        rule: String,
        path: String,
        kind: &'static str,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum MergeError {
    #[error("at {path}: source node {found:?} does not match baseline node {expected:?}")]
    IdentifierMismatch {
        path: String,
        expected: String,
        found: String,
    },

    #[error("at {path}: source {found} differs from baseline {expected}")]
    KindMismatch {
        path: String,
        expected: &'static str,
        found: &'static str,
    },
}
