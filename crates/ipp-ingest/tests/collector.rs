use chrono::NaiveDate;

use ipp_ingest::{CollectOptions, collect_table, collector::resolve_start};
use ipp_model::{
    CellValue, ColumnPath, DiagnosticKind, Diagnostics, FieldMap, FieldValue, SourceTable,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

fn path(segments: &[&str]) -> ColumnPath {
    segments.iter().copied().collect()
}

fn table(records: Vec<FieldMap>) -> SourceTable {
    SourceTable::new(vec!["impot".to_string(), "taux".to_string()], records)
}

#[test]
fn rows_are_ordered_by_date_and_exclude_metadata_fields() {
    let records = vec![
        FieldMap::new()
            .with("Date d'effet", FieldValue::Date(date(2021, 1, 1)))
            .with("Taux", FieldValue::text("12 %"))
            .with("Notes", FieldValue::text("revalorisation")),
        FieldMap::new()
            .with("Date d'effet", FieldValue::Date(date(2019, 1, 1)))
            .with("Taux", FieldValue::text("10 %"))
            .with("Parution au JO", FieldValue::Date(date(2018, 12, 30))),
    ];
    let mut diagnostics = Diagnostics::new();
    let collected = collect_table(&table(records), &CollectOptions::default(), &mut diagnostics);

    let starts: Vec<NaiveDate> = collected.rows.iter().map(|row| row.start).collect();
    assert_eq!(starts, vec![date(2019, 1, 1), date(2021, 1, 1)]);
    assert_eq!(collected.paths, vec![path(&["Taux"])]);
    assert_eq!(
        collected.rows[0].get(&path(&["Taux"])),
        Some(&CellValue::Text("10 %".to_string()))
    );
    assert!(diagnostics.is_empty());
}

#[test]
fn fallback_date_fields_and_fiscal_years_resolve() {
    let options = CollectOptions::default();
    let fallback = FieldMap::new().with("Date ISF", FieldValue::text("2007-07-01"));
    assert_eq!(resolve_start(&fallback, &options), Some(date(2007, 7, 1)));

    let fiscal = FieldMap::new().with(
        "Date d'effet",
        FieldValue::Map(FieldMap::new().with("Année Revenus", FieldValue::number(2015.0))),
    );
    assert_eq!(resolve_start(&fiscal, &options), Some(date(2015, 1, 1)));

    let bare_year = FieldMap::new().with("Date", FieldValue::text("1990"));
    assert_eq!(resolve_start(&bare_year, &options), Some(date(1990, 1, 1)));

    let undated = FieldMap::new().with("Taux", FieldValue::number(0.1));
    assert_eq!(resolve_start(&undated, &options), None);
}

#[test]
fn unknown_tokens_become_unknown_cells() {
    let records = vec![
        FieldMap::new()
            .with("Date", FieldValue::Date(date(2000, 1, 1)))
            .with("Plafond", FieldValue::text(" nc ")),
    ];
    let mut diagnostics = Diagnostics::new();
    let collected = collect_table(&table(records), &CollectOptions::default(), &mut diagnostics);
    assert_eq!(
        collected.rows[0].get(&path(&["Plafond"])),
        Some(&CellValue::Unknown)
    );
}

#[test]
fn table_without_dates_is_reported_and_empty() {
    let records = vec![FieldMap::new().with("Taux", FieldValue::number(0.1))];
    let mut diagnostics = Diagnostics::new();
    let collected = collect_table(&table(records), &CollectOptions::default(), &mut diagnostics);
    assert!(collected.is_empty());
    assert_eq!(diagnostics.count(DiagnosticKind::UndatedTable), 1);
    assert_eq!(diagnostics.entries()[0].path, "impot.taux");
}

#[test]
fn duplicate_dates_keep_the_later_record() {
    let records = vec![
        FieldMap::new()
            .with("Date", FieldValue::Date(date(2010, 1, 1)))
            .with("Taux", FieldValue::number(0.1)),
        FieldMap::new()
            .with("Date", FieldValue::Date(date(2010, 1, 1)))
            .with("Taux", FieldValue::number(0.2)),
    ];
    let mut diagnostics = Diagnostics::new();
    let collected = collect_table(&table(records), &CollectOptions::default(), &mut diagnostics);
    assert_eq!(collected.rows.len(), 1);
    assert_eq!(
        collected.rows[0].get(&path(&["Taux"])),
        Some(&CellValue::Number(0.2))
    );
    assert_eq!(diagnostics.count(DiagnosticKind::DuplicateRowDate), 1);
}

#[test]
fn nested_paths_keep_record_order_and_cycles_are_reported() {
    let record = |year: i32, names: &[&str]| {
        let bareme = names.iter().fold(FieldMap::new(), |map, name| {
            map.with(*name, FieldValue::number(1.0))
        });
        FieldMap::new()
            .with("Date", FieldValue::Date(date(year, 1, 1)))
            .with("Bareme", FieldValue::Map(bareme))
    };
    let records = vec![
        record(2001, &["a", "b"]),
        record(2002, &["b", "c"]),
        record(2003, &["c", "a"]),
    ];
    let mut diagnostics = Diagnostics::new();
    let collected = collect_table(&table(records), &CollectOptions::default(), &mut diagnostics);
    assert_eq!(
        collected.paths,
        vec![
            path(&["Bareme", "a"]),
            path(&["Bareme", "b"]),
            path(&["Bareme", "c"]),
        ]
    );
    assert_eq!(diagnostics.count(DiagnosticKind::PathOrderCycle), 1);
}
