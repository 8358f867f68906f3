//! Reconciliation of the source tree with the baseline tree.
//!
//! - **rewrite**: relocation and removal of baseline nodes before the merge
//! - **merge**: recursive merge of the two trees
//! - **coverage**: the inclusion rule and conflict descriptors

pub mod coverage;
pub mod error;
pub mod merge;
pub mod rewrite;

pub use coverage::{coverage_conflicts, is_covered, uncovered_descriptor};
pub use error::{MergeError, RewriteError};
pub use merge::merge;
pub use rewrite::apply_rewrites;
