//! Dated rows of a source table.
//!
//! Each record gets a start date from the first date field present; records
//! without one are dropped. The remaining fields are flattened into value
//! paths, and the per-record path orders are reconciled into one canonical
//! order for the table (see [`crate::path_order`]).

use std::collections::BTreeMap;

use chrono::NaiveDate;
use tracing::debug;

use ipp_model::{CellValue, ColumnPath, DiagnosticKind, Diagnostics, FieldMap, FieldValue};
use ipp_model::{SourceRow, SourceTable};

use crate::options::CollectOptions;
use crate::path_order::canonical_order;

/// A source table reduced to its dated rows.
#[derive(Debug, Clone, PartialEq)]
pub struct CollectedTable {
    pub identifier_path: Vec<String>,
    /// Ordered by `start`, one row per date.
    pub rows: Vec<SourceRow>,
    /// Canonical value-path order across all rows.
    pub paths: Vec<ColumnPath>,
}

impl CollectedTable {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn name(&self) -> String {
        self.identifier_path.join(".")
    }
}

pub fn collect_table(
    table: &SourceTable,
    options: &CollectOptions,
    diagnostics: &mut Diagnostics,
) -> CollectedTable {
    let table_name = table.name();
    let mut dated: BTreeMap<NaiveDate, (SourceRow, Vec<ColumnPath>)> = BTreeMap::new();

    for record in &table.records {
        let Some(start) = resolve_start(record, options) else {
            continue;
        };
        let (cells, local_order) = extract_cells(record, options);
        let row = SourceRow { start, cells };
        if dated.insert(start, (row, local_order)).is_some() {
            diagnostics.warn(
                DiagnosticKind::DuplicateRowDate,
                table_name.clone(),
                format!("several records start on {start}; keeping the last one"),
            );
        }
    }

    if dated.is_empty() {
        diagnostics.warn(
            DiagnosticKind::UndatedTable,
            table_name,
            "no record carries a recognized date field; skipping table",
        );
        return CollectedTable {
            identifier_path: table.identifier_path.clone(),
            rows: Vec::new(),
            paths: Vec::new(),
        };
    }

    let (rows, local_orders): (Vec<SourceRow>, Vec<Vec<ColumnPath>>) =
        dated.into_values().unzip();
    let order = canonical_order(&local_orders);
    if order.cycles_broken > 0 {
        diagnostics.warn(
            DiagnosticKind::PathOrderCycle,
            table_name.clone(),
            format!(
                "records disagree on the order of value paths; broke {} cycle(s) using first appearance",
                order.cycles_broken
            ),
        );
    }
    debug!(
        table = %table_name,
        rows = rows.len(),
        paths = order.paths.len(),
        "collected table"
    );

    CollectedTable {
        identifier_path: table.identifier_path.clone(),
        rows,
        paths: order.paths,
    }
}

/// Start date of a record: the effective-date field first, then the fallbacks.
pub fn resolve_start(record: &FieldMap, options: &CollectOptions) -> Option<NaiveDate> {
    std::iter::once(&options.effective_date_field)
        .chain(options.date_fields.iter())
        .find_map(|field| record.get(field).and_then(|value| date_of(value, options)))
}

fn date_of(value: &FieldValue, options: &CollectOptions) -> Option<NaiveDate> {
    match value {
        FieldValue::Date(date) => Some(*date),
        FieldValue::Cell(CellValue::Text(text)) => parse_date_text(text),
        FieldValue::Cell(CellValue::Number(year)) => year_start(*year),
        // Fiscal year: the date is the start of the income year.
        FieldValue::Map(map) => map
            .get(&options.fiscal_year_field)
            .and_then(|year| match year {
                FieldValue::Map(_) => None,
                other => date_of(other, options),
            }),
        FieldValue::Cell(CellValue::Null | CellValue::Unknown) => None,
    }
}

fn parse_date_text(text: &str) -> Option<NaiveDate> {
    let trimmed = text.trim();
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .or_else(|| trimmed.parse::<f64>().ok().and_then(year_start))
}

fn year_start(year: f64) -> Option<NaiveDate> {
    if year.fract() != 0.0 || !(1.0..=9999.0).contains(&year) {
        return None;
    }
    NaiveDate::from_ymd_opt(year as i32, 1, 1)
}

/// Value cells of a record and their traversal order.
fn extract_cells(
    record: &FieldMap,
    options: &CollectOptions,
) -> (BTreeMap<ColumnPath, CellValue>, Vec<ColumnPath>) {
    let mut cells = BTreeMap::new();
    let mut order = Vec::new();
    for (path, leaf) in record.leaves() {
        if path
            .segments()
            .first()
            .is_some_and(|field| options.is_excluded_field(field))
        {
            continue;
        }
        let cell = match leaf {
            FieldValue::Cell(CellValue::Text(text)) if options.is_unknown_token(text) => {
                CellValue::Unknown
            }
            FieldValue::Cell(cell) => cell.clone(),
            FieldValue::Date(date) => CellValue::Text(date.to_string()),
            FieldValue::Map(_) => continue,
        };
        order.push(path.clone());
        cells.insert(path, cell);
    }
    (cells, order)
}
