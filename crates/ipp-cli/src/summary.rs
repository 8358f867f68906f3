use std::collections::BTreeMap;

use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use ipp_cli::pipeline::RunResult;
use ipp_model::{DiagnosticKind, Origin};

pub fn print_summary(result: &RunResult) {
    println!("Source tables: {}", result.tables);
    if result.dry_run {
        println!("Dry run: no files written");
    } else {
        println!("Files written: {}", result.written.len());
    }

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Node"),
        header_cell("Origin"),
        header_cell("Parameters"),
        header_cell("Conflicts"),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Center);
    align_column(&mut table, 2, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Right);
    for branch in &result.branches {
        table.add_row(vec![
            node_cell(&branch.code, branch.origin),
            origin_cell(branch.origin),
            Cell::new(branch.parameters),
            count_cell(branch.conflicts, Color::Yellow),
        ]);
    }
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        dim_cell("-"),
        Cell::new(result.parameters()).add_attribute(Attribute::Bold),
        count_cell(result.conflicts(), Color::Yellow).add_attribute(Attribute::Bold),
    ]);
    println!("{table}");
    print_diagnostic_table(result);
}

fn print_diagnostic_table(result: &RunResult) {
    if result.diagnostics.is_empty() {
        return;
    }
    let mut by_kind: BTreeMap<DiagnosticKind, Vec<&str>> = BTreeMap::new();
    for diagnostic in &result.diagnostics {
        by_kind
            .entry(diagnostic.kind)
            .or_default()
            .push(diagnostic.path.as_str());
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Diagnostic"),
        header_cell("Count"),
        header_cell("Examples"),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    for (kind, paths) in by_kind {
        table.add_row(vec![
            Cell::new(kind).fg(Color::Yellow),
            Cell::new(paths.len()),
            Cell::new(examples(&paths)),
        ]);
    }
    println!();
    println!("Diagnostics:");
    println!("{table}");
}

fn examples(paths: &[&str]) -> String {
    const SHOWN: usize = 3;
    let mut text = paths
        .iter()
        .take(SHOWN)
        .copied()
        .collect::<Vec<_>>()
        .join(", ");
    if paths.len() > SHOWN {
        text.push_str(&format!(", ... (+{})", paths.len() - SHOWN));
    }
    text
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn node_cell(code: &str, origin: Origin) -> Cell {
    match origin {
        Origin::NewSource => Cell::new(code)
            .fg(Color::Blue)
            .add_attribute(Attribute::Bold),
        Origin::Baseline => Cell::new(code).fg(Color::DarkGrey),
    }
}

fn origin_cell(origin: Origin) -> Cell {
    match origin {
        Origin::NewSource => Cell::new(origin).fg(Color::Green),
        Origin::Baseline => dim_cell(origin),
    }
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
