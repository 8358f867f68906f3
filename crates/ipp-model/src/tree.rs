//! The parameter tree.
//!
//! A tree is a [`Node`] whose [`NodeKind`] is one of:
//!
//! - `Group`: named children, kept sorted by code
//! - `Scalar`: one [`Series`] of intervals
//! - `Scale`: ordered [`Slice`]s of a bracket scale, each holding up to four series
//!
//! The same shape is used for the baseline document, the tree built from the
//! source tables, and the merged result. [`Origin`] tells them apart.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::interval::Interval;

/// Code of the implicit top-level group.
pub const ROOT_CODE: &str = "root";

/// Which input a node comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Origin {
    #[serde(rename = "baseline")]
    Baseline,
    #[serde(rename = "new-source")]
    NewSource,
}

impl Origin {
    pub fn as_str(&self) -> &'static str {
        match self {
            Origin::Baseline => "baseline",
            Origin::NewSource => "new-source",
        }
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Display format of a series' values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueFormat {
    Percent,
    Float,
    /// Any other format declared by the baseline (integer, bool, ...).
    #[serde(untagged)]
    Other(String),
}

impl ValueFormat {
    pub fn parse(raw: &str) -> Self {
        match raw.trim() {
            "percent" => ValueFormat::Percent,
            "float" => ValueFormat::Float,
            other => ValueFormat::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            ValueFormat::Percent => "percent",
            ValueFormat::Float => "float",
            ValueFormat::Other(other) => other,
        }
    }
}

/// Declared kind of quantity of a series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    Monetary,
    #[serde(untagged)]
    Other(String),
}

impl ValueType {
    pub fn parse(raw: &str) -> Self {
        match raw.trim() {
            "monetary" => ValueType::Monetary,
            other => ValueType::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            ValueType::Monetary => "monetary",
            ValueType::Other(other) => other,
        }
    }
}

/// Conflict descriptors recorded on a node during the merge.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConflictSet(BTreeSet<String>);

impl ConflictSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, descriptor: impl Into<String>) {
        self.0.insert(descriptor.into());
    }

    pub fn extend(&mut self, other: ConflictSet) {
        self.0.extend(other.0);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn contains(&self, descriptor: &str) -> bool {
        self.0.contains(descriptor)
    }

    /// The `conflicts` attribute value, absent when there is nothing to report.
    pub fn joined(&self) -> Option<String> {
        if self.0.is_empty() {
            None
        } else {
            Some(self.iter().collect::<Vec<_>>().join(","))
        }
    }
}

/// Intervals of one parameter, with their inferred presentation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Series {
    /// Chronological order.
    pub intervals: Vec<Interval>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<ValueFormat>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub value_type: Option<ValueType>,
    #[serde(skip_serializing_if = "ConflictSet::is_empty")]
    pub conflicts: ConflictSet,
}

impl Series {
    pub fn new(intervals: Vec<Interval>) -> Self {
        Self {
            intervals,
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    /// Every interval carries a zero value.
    pub fn is_all_zero(&self) -> bool {
        self.intervals.iter().all(|interval| interval.value.is_zero())
    }

    /// Intervals, most recent first.
    pub fn newest_first(&self) -> Vec<&Interval> {
        let mut ordered: Vec<&Interval> = self.intervals.iter().collect();
        ordered.sort_by(|a, b| b.start.cmp(&a.start));
        ordered
    }
}

/// The four series a slice of a scale may hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SliceComponent {
    Threshold,
    Amount,
    Rate,
    Base,
}

impl SliceComponent {
    /// Output order.
    pub const ALL: [SliceComponent; 4] = [
        SliceComponent::Threshold,
        SliceComponent::Amount,
        SliceComponent::Rate,
        SliceComponent::Base,
    ];

    /// Marker used both in source tables and in the XML vocabulary.
    pub fn tag(&self) -> &'static str {
        match self {
            SliceComponent::Threshold => "SEUIL",
            SliceComponent::Amount => "MONTANT",
            SliceComponent::Rate => "TAUX",
            SliceComponent::Base => "ASSIETTE",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|component| component.tag() == tag)
    }

    pub fn name(&self) -> &'static str {
        match self {
            SliceComponent::Threshold => "threshold",
            SliceComponent::Amount => "amount",
            SliceComponent::Rate => "rate",
            SliceComponent::Base => "base",
        }
    }
}

/// One bracket of a scale.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Slice {
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub threshold: Option<Series>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<Series>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rate: Option<Series>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base: Option<Series>,
}

impl Slice {
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            ..Self::default()
        }
    }

    pub fn component(&self, component: SliceComponent) -> Option<&Series> {
        match component {
            SliceComponent::Threshold => self.threshold.as_ref(),
            SliceComponent::Amount => self.amount.as_ref(),
            SliceComponent::Rate => self.rate.as_ref(),
            SliceComponent::Base => self.base.as_ref(),
        }
    }

    pub fn component_mut(&mut self, component: SliceComponent) -> Option<&mut Series> {
        match component {
            SliceComponent::Threshold => self.threshold.as_mut(),
            SliceComponent::Amount => self.amount.as_mut(),
            SliceComponent::Rate => self.rate.as_mut(),
            SliceComponent::Base => self.base.as_mut(),
        }
    }

    pub fn set_component(&mut self, component: SliceComponent, series: Series) {
        let slot = match component {
            SliceComponent::Threshold => &mut self.threshold,
            SliceComponent::Amount => &mut self.amount,
            SliceComponent::Rate => &mut self.rate,
            SliceComponent::Base => &mut self.base,
        };
        *slot = Some(series);
    }

    pub fn is_empty(&self) -> bool {
        SliceComponent::ALL
            .iter()
            .all(|component| self.component(*component).is_none())
    }

    /// Missing components count as all-zero.
    pub fn is_zero_placeholder(&self) -> bool {
        [SliceComponent::Threshold, SliceComponent::Rate]
            .iter()
            .all(|component| self.component(*component).is_none_or(Series::is_all_zero))
    }
}

/// A bracket scale.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Scale {
    pub slices: Vec<Slice>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub value_type: Option<ValueType>,
    #[serde(skip_serializing_if = "ConflictSet::is_empty")]
    pub conflicts: ConflictSet,
}

impl Scale {
    pub fn new(slices: Vec<Slice>) -> Self {
        Self {
            slices,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum NodeKind {
    Group { children: BTreeMap<String, Node> },
    Scalar(Series),
    Scale(Scale),
}

/// A node of the parameter tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub code: String,
    pub origin: Origin,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(flatten)]
    pub kind: NodeKind,
}

impl Node {
    pub fn group(code: impl Into<String>, origin: Origin) -> Self {
        Self {
            code: code.into(),
            origin,
            description: None,
            kind: NodeKind::Group {
                children: BTreeMap::new(),
            },
        }
    }

    pub fn scalar(code: impl Into<String>, origin: Origin, series: Series) -> Self {
        Self {
            code: code.into(),
            origin,
            description: None,
            kind: NodeKind::Scalar(series),
        }
    }

    pub fn scale(code: impl Into<String>, origin: Origin, scale: Scale) -> Self {
        Self {
            code: code.into(),
            origin,
            description: None,
            kind: NodeKind::Scale(scale),
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Short name of the node kind, for messages.
    pub fn kind_name(&self) -> &'static str {
        match self.kind {
            NodeKind::Group { .. } => "group",
            NodeKind::Scalar(_) => "scalar",
            NodeKind::Scale(_) => "scale",
        }
    }

    pub fn children(&self) -> Option<&BTreeMap<String, Node>> {
        match &self.kind {
            NodeKind::Group { children } => Some(children),
            _ => None,
        }
    }

    pub fn children_mut(&mut self) -> Option<&mut BTreeMap<String, Node>> {
        match &mut self.kind {
            NodeKind::Group { children } => Some(children),
            _ => None,
        }
    }

    /// Add a child to a group node. Returns the child back when `self` is not a group.
    pub fn insert_child(&mut self, child: Node) -> Result<(), Node> {
        match self.children_mut() {
            Some(children) => {
                children.insert(child.code.clone(), child);
                Ok(())
            }
            None => Err(child),
        }
    }

    /// Descendant at `path` (codes relative to this node).
    pub fn get(&self, path: &[&str]) -> Option<&Node> {
        let mut node = self;
        for code in path {
            node = node.children()?.get(*code)?;
        }
        Some(node)
    }

    /// Number of scalar and scale nodes below (and including) this node.
    pub fn parameter_count(&self) -> usize {
        match &self.kind {
            NodeKind::Group { children } => children.values().map(Node::parameter_count).sum(),
            NodeKind::Scalar(_) | NodeKind::Scale(_) => 1,
        }
    }

    /// Number of conflict descriptors below (and including) this node.
    pub fn conflict_count(&self) -> usize {
        match &self.kind {
            NodeKind::Group { children } => children.values().map(Node::conflict_count).sum(),
            NodeKind::Scalar(series) => series.conflicts.len(),
            NodeKind::Scale(scale) => {
                scale.conflicts.len()
                    + scale
                        .slices
                        .iter()
                        .flat_map(|slice| {
                            SliceComponent::ALL
                                .into_iter()
                                .filter_map(|component| slice.component(component))
                        })
                        .map(|series| series.conflicts.len())
                        .sum::<usize>()
            }
        }
    }
}
