//! All source tables combined into one tree of raw interval lists.
//!
//! A value path lands at `identifier_path + column path`, each fragment
//! slugged. Branches keep insertion order: the canonical path order of each
//! table, tables in load order. Two tables writing the same leaf is an error,
//! and so are two columns of one table whose labels slug to the same path.

use std::collections::HashMap;

use indexmap::IndexMap;
use indexmap::map::Entry;
use tracing::debug;

use ipp_ingest::{CollectedTable, normalize_fragment};
use ipp_model::ColumnPath;

use crate::error::TreeError;
use crate::intervals::{RawInterval, build_intervals};

#[derive(Debug, Clone, PartialEq)]
pub enum RawNode {
    Branch(RawTree),
    Leaf(RawLeaf),
}

#[derive(Debug, Clone, PartialEq)]
pub struct RawLeaf {
    pub intervals: Vec<RawInterval>,
    /// Table the leaf was built from.
    pub table: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTree {
    children: IndexMap<String, RawNode>,
}

impl RawTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn assemble(tables: &[CollectedTable]) -> Result<Self, TreeError> {
        let mut tree = Self::new();
        for table in tables {
            tree.insert_table(table)?;
        }
        Ok(tree)
    }

    pub fn insert_table(&mut self, table: &CollectedTable) -> Result<(), TreeError> {
        let table_name = table.name();
        let prefix: Vec<String> = table
            .identifier_path
            .iter()
            .map(|fragment| normalize_fragment(fragment))
            .collect();
        let mut columns: HashMap<Vec<String>, &ColumnPath> = HashMap::new();
        let mut leaves = 0usize;
        for path in &table.paths {
            let intervals = build_intervals(&table.rows, path);
            if intervals.is_empty() {
                continue;
            }
            let full_path: Vec<String> = prefix
                .iter()
                .cloned()
                .chain(
                    path.segments()
                        .iter()
                        .map(|fragment| normalize_fragment(fragment)),
                )
                .collect();
            if let Some(first) = columns.insert(full_path.clone(), path) {
                return Err(TreeError::SlugCollision {
                    table: table_name,
                    path: full_path.join("."),
                    first_column: first.to_string(),
                    second_column: path.to_string(),
                });
            }
            self.insert_leaf(
                &full_path,
                RawLeaf {
                    intervals,
                    table: table_name.clone(),
                },
            )?;
            leaves += 1;
        }
        debug!(table = %table_name, leaves, "added table to raw tree");
        Ok(())
    }

    fn insert_leaf(&mut self, path: &[String], leaf: RawLeaf) -> Result<(), TreeError> {
        let Some((name, parents)) = path.split_last() else {
            return Ok(());
        };
        let mut branch = self;
        for (depth, fragment) in parents.iter().enumerate() {
            let child = branch
                .children
                .entry(fragment.clone())
                .or_insert_with(|| RawNode::Branch(RawTree::new()));
            branch = match child {
                RawNode::Branch(tree) => tree,
                RawNode::Leaf(_) => {
                    return Err(TreeError::ShapeConflict {
                        path: path[..=depth].join("."),
                        table: leaf.table,
                    });
                }
            };
        }
        match branch.children.entry(name.clone()) {
            Entry::Vacant(slot) => {
                slot.insert(RawNode::Leaf(leaf));
                Ok(())
            }
            Entry::Occupied(slot) => match slot.get() {
                RawNode::Leaf(existing) => Err(TreeError::DuplicatePath {
                    path: path.join("."),
                    first: existing.table.clone(),
                    second: leaf.table,
                }),
                RawNode::Branch(_) => Err(TreeError::ShapeConflict {
                    path: path.join("."),
                    table: leaf.table,
                }),
            },
        }
    }

    pub fn get(&self, name: &str) -> Option<&RawNode> {
        self.children.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &RawNode)> {
        self.children.iter().map(|(name, node)| (name.as_str(), node))
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}
