use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use dds_map::{ColumnSuggestions, ConfidenceLevel};
use dds_model::{CanonicalSchema, CellRecord, MappingSource, StandardizationResult};

use crate::commands::StandardizeOutcome;

pub fn print_summary(outcome: &StandardizeOutcome) {
    println!("Input: {}", outcome.input.display());
    println!("Data shape: {}", outcome.result.raw_data_shape);
    if let Some(path) = &outcome.record_path {
        println!("Record: {}", path.display());
    }
    if let Some(path) = &outcome.report_path {
        println!("Mapping report: {}", path.display());
    }
    if let Some(path) = &outcome.result_path {
        println!("Result: {}", path.display());
    }
    println!("{}", mapping_table(&outcome.result));
    if !outcome.result.unmapped_columns.is_empty() {
        println!();
        println!("Unmapped columns:");
        for column in &outcome.result.unmapped_columns {
            println!("- {column}");
        }
    }
    if let Some(record) = &outcome.record {
        println!();
        println!("{}", cycle_table(record));
    }
}

pub fn print_suggestions(suggestions: &[ColumnSuggestions]) {
    println!("{}", suggestion_table(suggestions));
}

pub fn print_fields(schema: &CanonicalSchema) {
    println!("{}", field_table(schema));
}

pub fn mapping_table(result: &StandardizationResult) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Column"),
        header_cell("Field"),
        header_cell("Score"),
        header_cell("Source"),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Center);
    for entry in &result.mapping_used {
        let source = match entry.source {
            MappingSource::Custom => Cell::new("custom").fg(Color::Magenta),
            MappingSource::Automatic => dim_cell("auto"),
        };
        table.add_row(vec![
            Cell::new(&entry.column),
            Cell::new(&entry.field)
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold),
            score_cell(entry.score),
            source,
        ]);
    }
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(format!(
            "{} mapped, {} unmapped",
            result.mapped_count(),
            result.unmapped_count()
        ))
        .add_attribute(Attribute::Bold),
        dim_cell("-"),
        dim_cell("-"),
    ]);
    table
}

pub fn cycle_table(record: &CellRecord) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Cycle"),
        header_cell("Points"),
        header_cell("Series"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    align_column(&mut table, 1, CellAlignment::Right);
    for cycle in &record.cycles {
        let series: Vec<&str> = cycle.series().into_iter().map(|(name, _)| name).collect();
        table.add_row(vec![
            Cell::new(cycle.cycle_number),
            Cell::new(cycle.data_points()),
            if series.is_empty() {
                dim_cell("-")
            } else {
                Cell::new(series.join(", "))
            },
        ]);
    }
    table.add_row(vec![
        Cell::new(format!("{} cycles", record.cycle_count()))
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(record.total_data_points()).add_attribute(Attribute::Bold),
        dim_cell("-"),
    ]);
    table
}

pub fn suggestion_table(suggestions: &[ColumnSuggestions]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Column"),
        header_cell("Rank"),
        header_cell("Field"),
        header_cell("Score"),
        header_cell("Confidence"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Right);
    align_column(&mut table, 4, CellAlignment::Center);
    for column in suggestions {
        for (rank, candidate) in column.candidates.iter().enumerate() {
            let column_cell = if rank == 0 {
                Cell::new(&column.column).add_attribute(Attribute::Bold)
            } else {
                Cell::new("")
            };
            table.add_row(vec![
                column_cell,
                Cell::new(rank + 1),
                Cell::new(&candidate.field),
                score_cell(candidate.score),
                confidence_cell(candidate.confidence),
            ]);
        }
    }
    table
}

pub fn field_table(schema: &CanonicalSchema) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Field"),
        header_cell("Group"),
        header_cell("Kind"),
        header_cell("Synonyms"),
    ]);
    apply_table_style(&mut table);
    for field in schema.fields() {
        table.add_row(vec![
            Cell::new(field.key())
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold),
            Cell::new(field.group()),
            Cell::new(field.kind().label()),
            Cell::new(field.synonyms().join(", ")),
        ]);
    }
    table
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::DynamicFullWidth)
        .set_width(120);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn score_cell(score: f64) -> Cell {
    let color = match ConfidenceLevel::from_score(score) {
        ConfidenceLevel::High => Color::Green,
        ConfidenceLevel::Medium => Color::Yellow,
        ConfidenceLevel::Low => Color::Red,
    };
    Cell::new(format!("{score:.3}")).fg(color)
}

fn confidence_cell(level: ConfidenceLevel) -> Cell {
    match level {
        ConfidenceLevel::High => Cell::new(level.label())
            .fg(Color::Green)
            .add_attribute(Attribute::Bold),
        ConfidenceLevel::Medium => Cell::new(level.label()).fg(Color::Yellow),
        ConfidenceLevel::Low => dim_cell(level.label()),
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
