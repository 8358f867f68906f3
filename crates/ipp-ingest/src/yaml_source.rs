//! Discovery and loading of the YAML source tables.
//!
//! A table is one `*.yaml` file. Its identifier path is the relative
//! directory segments followed by the file stem ("sheet name"). Sheets named
//! in upper case are auxiliary and skipped; records live under `Valeurs`.

use std::fs;
use std::path::Path;

use chrono::NaiveDate;
use serde_yaml::Value;
use tracing::{debug, info};
use walkdir::WalkDir;

use ipp_model::{CellValue, DiagnosticKind, Diagnostics, FieldMap, FieldValue, SourceTable};

use crate::error::IngestError;

const VALUES_KEY: &str = "Valeurs";

/// Load every source table below `source_dir`, in path order.
pub fn load_source_tables(
    source_dir: &Path,
    diagnostics: &mut Diagnostics,
) -> Result<Vec<SourceTable>, IngestError> {
    if !source_dir.is_dir() {
        return Err(IngestError::MissingSourceDir {
            path: source_dir.to_path_buf(),
        });
    }
    let mut tables = Vec::new();
    for entry in WalkDir::new(source_dir).sort_by_file_name() {
        let entry = entry.map_err(|source| IngestError::Walk {
            path: source_dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        if !entry.file_type().is_file() || path.extension().is_none_or(|ext| ext != "yaml") {
            continue;
        }
        let Some(sheet_name) = path.file_stem().and_then(|stem| stem.to_str()) else {
            continue;
        };
        if is_upper_case(sheet_name) {
            debug!(path = %path.display(), "skipping auxiliary sheet");
            continue;
        }
        if !is_lower_case(sheet_name) {
            return Err(IngestError::InvalidSheetName {
                path: path.to_path_buf(),
                name: sheet_name.to_string(),
            });
        }

        let mut identifier_path: Vec<String> = path
            .strip_prefix(source_dir)
            .unwrap_or(path)
            .parent()
            .map(|parent| {
                parent
                    .components()
                    .map(|component| component.as_os_str().to_string_lossy().into_owned())
                    .collect()
            })
            .unwrap_or_default();
        identifier_path.push(sheet_name.to_string());

        info!(path = %path.display(), "loading source table");
        let text = fs::read_to_string(path).map_err(|source| IngestError::io(path, source))?;
        let table = parse_source_table(identifier_path, &text, diagnostics).map_err(|source| {
            IngestError::Yaml {
                path: path.to_path_buf(),
                source,
            }
        })?;
        if let Some(table) = table {
            tables.push(table);
        }
    }
    Ok(tables)
}

/// Parse one table document. Returns `None` when it has no `Valeurs` list.
pub fn parse_source_table(
    identifier_path: Vec<String>,
    yaml: &str,
    diagnostics: &mut Diagnostics,
) -> Result<Option<SourceTable>, serde_yaml::Error> {
    let document: Value = if yaml.trim().is_empty() {
        Value::Null
    } else {
        serde_yaml::from_str(yaml)?
    };
    let Some(rows) = document.get(VALUES_KEY).and_then(Value::as_sequence) else {
        diagnostics.warn(
            DiagnosticKind::MissingValues,
            identifier_path.join("."),
            format!("no \"{VALUES_KEY}\" list; skipping file"),
        );
        return Ok(None);
    };
    let records = rows
        .iter()
        .filter_map(|row| match convert_value(row) {
            Some(FieldValue::Map(map)) => Some(map),
            _ => None,
        })
        .collect();
    Ok(Some(SourceTable::new(identifier_path, records)))
}

fn convert_value(value: &Value) -> Option<FieldValue> {
    let converted = match value {
        Value::Null => FieldValue::Cell(CellValue::Null),
        Value::Bool(flag) => FieldValue::text(flag.to_string()),
        Value::Number(number) => FieldValue::number(number.as_f64()?),
        Value::String(text) => match NaiveDate::parse_from_str(text.trim(), "%Y-%m-%d") {
            Ok(date) => FieldValue::Date(date),
            Err(_) => FieldValue::text(text.clone()),
        },
        Value::Sequence(items) => {
            let parts: Vec<String> = items.iter().filter_map(scalar_text).collect();
            FieldValue::text(parts.join(", "))
        }
        Value::Mapping(mapping) => {
            let mut map = FieldMap::new();
            for (key, child) in mapping {
                let (Some(name), Some(child)) = (scalar_text(key), convert_value(child)) else {
                    continue;
                };
                map.insert(name, child);
            }
            FieldValue::Map(map)
        }
        Value::Tagged(tagged) => return convert_value(&tagged.value),
    };
    Some(converted)
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        _ => None,
    }
}

fn is_upper_case(name: &str) -> bool {
    name.chars().any(char::is_alphabetic) && !name.chars().any(char::is_lowercase)
}

fn is_lower_case(name: &str) -> bool {
    name.chars().any(char::is_alphabetic) && !name.chars().any(char::is_uppercase)
}
