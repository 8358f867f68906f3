//! From collected source tables to a materialized parameter tree.
//!
//! - **intervals**: value intervals of one value path across dated rows
//! - **raw_tree**: all tables combined under their slugged paths
//! - **units**: unit inference, narrowing and gap filling of one series
//! - **materialize**: groups, scalars and bracket scales of the final tree

pub mod error;
pub mod intervals;
pub mod materialize;
pub mod raw_tree;
pub mod units;

pub use error::TreeError;
pub use intervals::{RawInterval, build_intervals};
pub use materialize::materialize;
pub use raw_tree::{RawLeaf, RawNode, RawTree};
pub use units::{fill_gaps, infer_series};

use ipp_ingest::CollectedTable;
use ipp_model::{Diagnostics, Node};
use tracing::info;

/// Assemble every table and materialize the result under the root group.
pub fn build_tree(
    tables: &[CollectedTable],
    diagnostics: &mut Diagnostics,
) -> Result<Node, TreeError> {
    let raw = RawTree::assemble(tables)?;
    let root = materialize(&raw, diagnostics);
    info!(
        tables = tables.len(),
        parameters = root.parameter_count(),
        "materialized source tree"
    );
    Ok(root)
}
