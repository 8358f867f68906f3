//! Source tables as loaded, and the dated rows extracted from them.

use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::value::CellValue;

/// Location of a value inside a source record (nested field names).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ColumnPath(Vec<String>);

impl ColumnPath {
    pub fn new(segments: Vec<String>) -> Self {
        Self(segments)
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }
}

impl<S: Into<String>> FromIterator<S> for ColumnPath {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl fmt::Display for ColumnPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join(" / "))
    }
}

/// A field of a source record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FieldValue {
    Cell(CellValue),
    Date(NaiveDate),
    Map(FieldMap),
}

impl FieldValue {
    pub fn text(value: impl Into<String>) -> Self {
        FieldValue::Cell(CellValue::Text(value.into()))
    }

    pub fn number(value: f64) -> Self {
        FieldValue::Cell(CellValue::Number(value))
    }

    pub fn as_map(&self) -> Option<&FieldMap> {
        match self {
            FieldValue::Map(map) => Some(map),
            _ => None,
        }
    }
}

/// Ordered mapping of field names to values, as written in the source.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldMap {
    entries: Vec<(String, FieldValue)>,
}

impl FieldMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a field, replacing an existing one in place.
    pub fn insert(&mut self, name: impl Into<String>, value: FieldValue) {
        let name = name.into();
        if let Some(slot) = self.entries.iter_mut().find(|(key, _)| *key == name) {
            slot.1 = value;
        } else {
            self.entries.push((name, value));
        }
    }

    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: FieldValue) -> Self {
        self.insert(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.entries
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.entries.iter().map(|(key, value)| (key.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Every scalar leaf with its path, in traversal order.
    pub fn leaves(&self) -> Vec<(ColumnPath, &FieldValue)> {
        let mut leaves = Vec::new();
        collect_leaves(self, &mut Vec::new(), &mut leaves);
        leaves
    }
}

fn collect_leaves<'a>(
    map: &'a FieldMap,
    prefix: &mut Vec<String>,
    out: &mut Vec<(ColumnPath, &'a FieldValue)>,
) {
    for (name, value) in map.iter() {
        prefix.push(name.to_string());
        match value {
            FieldValue::Map(child) => collect_leaves(child, prefix, out),
            leaf => out.push((ColumnPath::new(prefix.clone()), leaf)),
        }
        prefix.pop();
    }
}

/// One source table: where it sits in the parameter tree and its records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceTable {
    pub identifier_path: Vec<String>,
    pub records: Vec<FieldMap>,
}

impl SourceTable {
    pub fn new(identifier_path: Vec<String>, records: Vec<FieldMap>) -> Self {
        Self {
            identifier_path,
            records,
        }
    }

    pub fn name(&self) -> String {
        self.identifier_path.join(".")
    }
}

/// A dated record: the values it states from `start` on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceRow {
    pub start: NaiveDate,
    pub cells: BTreeMap<ColumnPath, CellValue>,
}

impl SourceRow {
    pub fn get(&self, path: &ColumnPath) -> Option<&CellValue> {
        self.cells.get(path)
    }
}
