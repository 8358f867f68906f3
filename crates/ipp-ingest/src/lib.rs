//! Ingestion of the two inputs of a merge run.
//!
//! - **yaml_source**: discovery and loading of the source tables
//! - **collector**: dated rows and canonical value-path order per table
//! - **path_order**: the partial order used to reconcile path orders across rows
//! - **slug**: identifier normalization for tree fragments
//! - **baseline**: parsing of the baseline parameter document
//! - **rewrite_rules**: loading of baseline path relocations

pub mod baseline;
pub mod collector;
pub mod error;
pub mod options;
pub mod path_order;
pub mod rewrite_rules;
pub mod slug;
pub mod yaml_source;

pub use baseline::{load_baseline, parse_baseline};
pub use collector::{CollectedTable, collect_table};
pub use error::IngestError;
pub use options::CollectOptions;
pub use path_order::{PathOrder, canonical_order};
pub use rewrite_rules::{load_rewrite_rules, parse_rewrite_rules};
pub use slug::{STRUCTURAL_MARKERS, normalize_fragment, slugify};
pub use yaml_source::{load_source_tables, parse_source_table};
