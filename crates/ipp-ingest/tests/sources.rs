use std::fs;

use ipp_ingest::{IngestError, load_source_tables, parse_source_table};
use ipp_model::{CellValue, DiagnosticKind, Diagnostics, FieldValue};

const TABLE: &str = "\
Valeurs:
  - Date d'effet: 2021-01-01
    Taux: 12 %
    Plafond: null
  - Date d'effet: 2019-01-01
    Taux: 10 %
    Plafond: 1500
";

#[test]
fn discovers_lower_case_sheets_in_sorted_order() {
    let dir = tempfile::tempdir().expect("temp dir");
    fs::create_dir_all(dir.path().join("prelevements_sociaux")).expect("create dir");
    fs::write(dir.path().join("prelevements_sociaux/csg.yaml"), TABLE).expect("write");
    fs::write(dir.path().join("chomage.yaml"), TABLE).expect("write");
    fs::write(dir.path().join("SOMMAIRE.yaml"), "Titre: sommaire\n").expect("write");
    fs::write(dir.path().join("notes.txt"), "ignored").expect("write");

    let mut diagnostics = Diagnostics::new();
    let tables = load_source_tables(dir.path(), &mut diagnostics).expect("load tables");

    let names: Vec<String> = tables.iter().map(|table| table.name()).collect();
    assert_eq!(names, vec!["chomage", "prelevements_sociaux.csg"]);
    assert!(diagnostics.is_empty());

    let first = &tables[0].records[0];
    assert_eq!(first.get("Taux"), Some(&FieldValue::text("12 %")));
    assert_eq!(first.get("Plafond"), Some(&FieldValue::Cell(CellValue::Null)));
    assert!(matches!(first.get("Date d'effet"), Some(FieldValue::Date(_))));
}

#[test]
fn mixed_case_sheet_name_is_rejected() {
    let dir = tempfile::tempdir().expect("temp dir");
    fs::write(dir.path().join("Chomage.yaml"), TABLE).expect("write");

    let mut diagnostics = Diagnostics::new();
    let err = load_source_tables(dir.path(), &mut diagnostics).expect_err("mixed case");
    assert!(matches!(err, IngestError::InvalidSheetName { name, .. } if name == "Chomage"));
}

#[test]
fn missing_directory_is_fatal() {
    let dir = tempfile::tempdir().expect("temp dir");
    let mut diagnostics = Diagnostics::new();
    let err = load_source_tables(&dir.path().join("absent"), &mut diagnostics)
        .expect_err("missing dir");
    assert!(matches!(err, IngestError::MissingSourceDir { .. }));
}

#[test]
fn table_without_values_is_skipped_with_a_diagnostic() {
    let mut diagnostics = Diagnostics::new();
    let table = parse_source_table(vec!["smic".to_string()], "Notes: vide\n", &mut diagnostics)
        .expect("valid yaml");
    assert!(table.is_none());
    assert_eq!(diagnostics.count(DiagnosticKind::MissingValues), 1);
}

#[test]
fn fiscal_year_mappings_are_kept_nested() {
    let yaml = "\
Valeurs:
  - Date d'effet:
      Année Revenus: 2015
    Seuil: 9700
";
    let mut diagnostics = Diagnostics::new();
    let table = parse_source_table(vec!["ir".to_string()], yaml, &mut diagnostics)
        .expect("valid yaml")
        .expect("has values");
    let date_field = table.records[0]
        .get("Date d'effet")
        .and_then(FieldValue::as_map)
        .expect("fiscal year mapping");
    assert_eq!(date_field.get("Année Revenus"), Some(&FieldValue::number(2015.0)));
}
