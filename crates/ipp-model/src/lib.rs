//! Data model shared by every stage of the parameter merge.
//!
//! - **source**: raw records of a source table and the dated rows extracted from them
//! - **value**: raw cell values and materialized parameter values
//! - **interval**: validity intervals of a parameter series
//! - **tree**: the tagged parameter tree (groups, scalars, scales)
//! - **rewrite**: baseline path relocations applied before the merge
//! - **diagnostics**: the warning sink handed to each component

pub mod diagnostics;
pub mod interval;
pub mod rewrite;
pub mod source;
pub mod tree;
pub mod value;

pub use diagnostics::{Diagnostic, DiagnosticKind, Diagnostics};
pub use interval::{Interval, day_after, day_before};
pub use rewrite::RewriteRule;
pub use source::{ColumnPath, FieldMap, FieldValue, SourceRow, SourceTable};
pub use tree::{
    ConflictSet, Node, NodeKind, Origin, ROOT_CODE, Scale, Series, Slice, SliceComponent,
    ValueFormat, ValueType,
};
pub use value::{CellValue, ParamValue};
