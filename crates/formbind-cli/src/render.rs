//! Tabular and CSV rendering of command results.

use std::io;

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use formbind_model::{ColumnKind, NormalizedDataset, cell_text};
use formbind_path::Entry;
use formbind_resolve::FieldFailure;

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

/// Rows of a dataset, one column per dataset column. Key figures are
/// right-aligned and synthetic key columns dimmed.
pub fn dataset_table(dataset: &NormalizedDataset) -> Table {
    let mut table = Table::new();
    table.set_header(
        dataset
            .columns
            .iter()
            .map(|column| header_cell(&column.display_label))
            .collect::<Vec<_>>(),
    );
    apply_table_style(&mut table);
    for row in &dataset.rows {
        table.add_row(
            dataset
                .columns
                .iter()
                .map(|column| {
                    let cell = Cell::new(row.text(&column.key));
                    match (column.kind, column.is_synthetic_key) {
                        (_, true) => cell.add_attribute(Attribute::Dim),
                        (ColumnKind::KeyFigure, _) => cell.set_alignment(CellAlignment::Right),
                        _ => cell,
                    }
                })
                .collect::<Vec<_>>(),
        );
    }
    table
}

/// Column overview: key, label, kind, and distinct-value count.
pub fn columns_table(dataset: &NormalizedDataset) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Key"),
        header_cell("Label"),
        header_cell("Kind"),
        header_cell("Distinct"),
    ]);
    apply_table_style(&mut table);
    for column in &dataset.columns {
        let kind = if column.is_synthetic_key {
            "synthetic key".to_string()
        } else {
            column.kind.as_tag().to_string()
        };
        let is_primary = dataset.primary_axis_key.as_deref() == Some(column.key.as_str());
        let distinct = if is_primary {
            Cell::new("primary").fg(Color::Green)
        } else {
            match dataset.distinct_values(&column.key) {
                Some(values) => Cell::new(values.len()),
                None => Cell::new("-").add_attribute(Attribute::Dim),
            }
        };
        table.add_row(vec![
            Cell::new(&column.key),
            Cell::new(&column.display_label),
            Cell::new(kind),
            distinct.set_alignment(CellAlignment::Right),
        ]);
    }
    table
}

/// Writes the dataset as CSV with column keys as the header.
pub fn write_csv<W: io::Write>(dataset: &NormalizedDataset, writer: W) -> csv::Result<()> {
    let mut writer = csv::Writer::from_writer(writer);
    writer.write_record(dataset.columns.iter().map(|column| column.key.as_str()))?;
    for row in &dataset.rows {
        writer.write_record(dataset.columns.iter().map(|column| row.text(&column.key)))?;
    }
    writer.flush()?;
    Ok(())
}

/// Walk entries as `path | kind | value`.
pub fn entries_table<'a>(entries: impl IntoIterator<Item = Entry<'a>>) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Path"),
        header_cell("Kind"),
        header_cell("Value"),
    ]);
    apply_table_style(&mut table);
    for entry in entries {
        let value = match entry.value {
            Some(value) => Cell::new(cell_text(value)),
            None => Cell::new("-").add_attribute(Attribute::Dim),
        };
        table.add_row(vec![
            Cell::new(entry.path),
            Cell::new(entry.kind.as_str()),
            value,
        ]);
    }
    table
}

pub fn failures_table(failures: &[FieldFailure]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Field"), header_cell("Error")]);
    apply_table_style(&mut table);
    for failure in failures {
        table.add_row(vec![
            Cell::new(&failure.field).fg(Color::Red),
            Cell::new(&failure.message),
        ]);
    }
    table
}
