//! Raw tree to parameter tree.
//!
//! A branch holding a `TYPE` leaf whose value is `BAREME` is a bracket scale:
//! its `SEUIL` / `MONTANT` / `TAUX` / `ASSIETTE` branches map slice names to
//! series. Every other branch is a group and every leaf a scalar. Nodes left
//! without any value are omitted.

use std::collections::BTreeMap;

use indexmap::IndexSet;
use tracing::debug;

use ipp_model::{
    Diagnostics, Node, NodeKind, Origin, ROOT_CODE, Scale, Slice, SliceComponent,
    ValueType,
};

use crate::raw_tree::{RawNode, RawTree};
use crate::units::infer_series;

const TYPE_MARKER: &str = "TYPE";
const SCALE_TYPE: &str = "BAREME";

/// Materialize the whole raw tree under the root group.
pub fn materialize(tree: &RawTree, diagnostics: &mut Diagnostics) -> Node {
    group_node(ROOT_CODE, materialize_children(tree, None, diagnostics))
}

fn group_node(code: &str, children: BTreeMap<String, Node>) -> Node {
    Node {
        code: code.to_string(),
        origin: Origin::NewSource,
        description: None,
        kind: NodeKind::Group { children },
    }
}

fn materialize_children(
    tree: &RawTree,
    parent_path: Option<&str>,
    diagnostics: &mut Diagnostics,
) -> BTreeMap<String, Node> {
    let mut children = BTreeMap::new();
    for (name, raw) in tree.iter() {
        let path = match parent_path {
            Some(parent) => format!("{parent}.{name}"),
            None => name.to_string(),
        };
        if let Some(child) = materialize_node(name, &path, raw, diagnostics) {
            children.insert(child.code.clone(), child);
        }
    }
    children
}

fn materialize_node(
    name: &str,
    path: &str,
    raw: &RawNode,
    diagnostics: &mut Diagnostics,
) -> Option<Node> {
    match raw {
        RawNode::Leaf(leaf) => {
            let series = infer_series(path, &leaf.intervals, diagnostics);
            (!series.is_empty()).then(|| Node::scalar(name, Origin::NewSource, series))
        }
        RawNode::Branch(tree) if is_scale(tree) => {
            let scale = materialize_scale(path, tree, diagnostics);
            (!scale.slices.is_empty()).then(|| Node::scale(name, Origin::NewSource, scale))
        }
        RawNode::Branch(tree) => {
            let children = materialize_children(tree, Some(path), diagnostics);
            (!children.is_empty()).then(|| group_node(name, children))
        }
    }
}

fn is_scale(tree: &RawTree) -> bool {
    match tree.get(TYPE_MARKER) {
        Some(RawNode::Leaf(leaf)) => leaf.intervals.iter().any(|interval| {
            interval
                .value
                .as_text()
                .is_some_and(|text| text.trim() == SCALE_TYPE)
        }),
        _ => false,
    }
}

fn materialize_scale(path: &str, tree: &RawTree, diagnostics: &mut Diagnostics) -> Scale {
    for (name, _) in tree.iter() {
        if name != TYPE_MARKER && SliceComponent::from_tag(name).is_none() {
            debug!(scale = path, entry = name, "ignoring entry of a scale");
        }
    }

    let component_branches: Vec<(SliceComponent, &RawTree)> = SliceComponent::ALL
        .into_iter()
        .filter_map(|component| match tree.get(component.tag()) {
            Some(RawNode::Branch(slices)) => Some((component, slices)),
            _ => None,
        })
        .collect();

    // Slices named by any component; thresholds set the order.
    let slice_names: IndexSet<&str> = component_branches
        .iter()
        .flat_map(|(_, slices)| slices.iter().map(|(name, _)| name))
        .collect();

    let mut scale = Scale::default();
    for slice_name in slice_names {
        let mut slice = Slice::new(slice_name);
        for (component, slices) in &component_branches {
            let Some(RawNode::Leaf(leaf)) = slices.get(slice_name) else {
                continue;
            };
            let series_path = format!("{path}.{}.{slice_name}", component.tag());
            let series = infer_series(&series_path, &leaf.intervals, diagnostics);
            if !series.is_empty() {
                slice.set_component(*component, series);
            }
        }
        if !slice.is_empty() {
            scale.slices.push(slice);
        }
    }

    let monetary_thresholds = scale.slices.iter().any(|slice| {
        slice
            .threshold
            .as_ref()
            .is_some_and(|series| series.value_type == Some(ValueType::Monetary))
    });
    if monetary_thresholds {
        scale.value_type = Some(ValueType::Monetary);
    }
    scale
}
