//! Merge of the source tree into the baseline tree.
//!
//! Both trees are walked together. Codes and node kinds must agree at every
//! step. Baseline children missing from the source are carried over as they
//! are; shared parameters keep the source values and record, as conflicts,
//! every baseline interval the source does not reproduce.

use tracing::{debug, info};

use ipp_model::{Node, NodeKind, Scale, Series, SliceComponent, ValueType};

use crate::coverage::coverage_conflicts;
use crate::error::MergeError;

const SLICE_COUNT_CONFLICT: &str = "children:different-number-of-slices";

/// Merge `source` into `baseline`. The result keeps the source nodes.
pub fn merge(source: Node, baseline: Node) -> Result<Node, MergeError> {
    let merged = merge_node(source, baseline, &[])?;
    info!(
        parameters = merged.parameter_count(),
        conflicts = merged.conflict_count(),
        "merged baseline"
    );
    Ok(merged)
}

fn merge_node(mut source: Node, baseline: Node, parents: &[&str]) -> Result<Node, MergeError> {
    let path = parents
        .iter()
        .copied()
        .chain(std::iter::once(source.code.as_str()))
        .collect::<Vec<_>>()
        .join(".");
    if source.code != baseline.code {
        return Err(MergeError::IdentifierMismatch {
            path,
            expected: baseline.code,
            found: source.code,
        });
    }
    let expected = baseline.kind_name();
    let found = source.kind_name();
    if baseline.description.is_some() {
        source.description = baseline.description;
    }

    match (&mut source.kind, baseline.kind) {
        (
            NodeKind::Group { children },
            NodeKind::Group {
                children: baseline_children,
            },
        ) => {
            let child_parents: Vec<&str> = path.split('.').collect();
            for (code, baseline_child) in baseline_children {
                let merged = match children.remove(&code) {
                    Some(child) => merge_node(child, baseline_child, &child_parents)?,
                    None => {
                        debug!(path = %path, child = %code, "keeping baseline-only node");
                        baseline_child
                    }
                };
                children.insert(code, merged);
            }
        }
        (NodeKind::Scalar(series), NodeKind::Scalar(baseline_series)) => {
            merge_series(series, &baseline_series);
        }
        (NodeKind::Scale(scale), NodeKind::Scale(baseline_scale)) => {
            merge_scale(scale, baseline_scale);
        }
        _ => return Err(MergeError::KindMismatch { path, expected, found }),
    }
    Ok(source)
}

fn merge_series(series: &mut Series, baseline: &Series) {
    if let Some(conflict) = type_conflict(series.value_type.as_ref(), baseline.value_type.as_ref()) {
        series.conflicts.insert(conflict);
    }
    series
        .conflicts
        .extend(coverage_conflicts(&baseline.intervals, &series.intervals));
}

fn merge_scale(scale: &mut Scale, baseline: Scale) {
    if let Some(conflict) = type_conflict(scale.value_type.as_ref(), baseline.value_type.as_ref()) {
        scale.conflicts.insert(conflict);
    }

    let mut baseline_slices = baseline.slices;
    if baseline_slices
        .first()
        .is_some_and(|slice| slice.is_zero_placeholder())
    {
        baseline_slices.remove(0);
    }
    if baseline_slices.len() != scale.slices.len() {
        scale.conflicts.insert(SLICE_COUNT_CONFLICT);
        return;
    }

    for (slice, baseline_slice) in scale.slices.iter_mut().zip(&baseline_slices) {
        for component in [SliceComponent::Rate, SliceComponent::Threshold] {
            let Some(baseline_series) = baseline_slice.component(component) else {
                continue;
            };
            match slice.component_mut(component) {
                Some(series) => series
                    .conflicts
                    .extend(coverage_conflicts(&baseline_series.intervals, &series.intervals)),
                None => scale.conflicts.insert(format!(
                    "children:missing-{}(slice={})",
                    component.name(),
                    slice.code
                )),
            }
        }
    }
}

fn type_conflict(source: Option<&ValueType>, baseline: Option<&ValueType>) -> Option<String> {
    match (source, baseline) {
        (Some(source), Some(baseline)) if source != baseline => {
            Some(format!("attrib:type({})", baseline.as_str()))
        }
        _ => None,
    }
}
