use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use tau_cli::commands::default_columns;
use tau_cli::types::{ConvertResult, ValidateResult};

/// Failing rows listed individually before the list is cut off.
const MAX_LISTED_ROWS: usize = 20;

pub fn print_convert_summary(result: &ConvertResult) {
    println!("Input: {} ({} rows)", result.input.display(), result.input_rows);
    match &result.output_dir {
        Some(dir) => println!("Output: {} ({} files)", dir.display(), result.files.len()),
        None => println!("Output: dry run, nothing written"),
    }
    println!(
        "X: {} ({} samples x {} assays)",
        result.primary, result.n_obs, result.n_vars
    );
    if !result.uns_keys.is_empty() {
        println!("uns: {}", result.uns_keys.join(", "));
    }

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Layer"),
        header_cell("Kind"),
        header_cell("Filled"),
        header_cell("Missing"),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Right);
    for layer in &result.layers {
        let key_cell = if layer.key == result.primary {
            Cell::new(format!("{} (X)", layer.key))
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold)
        } else {
            Cell::new(&layer.key)
        };
        let kind = if layer.numeric { "numeric" } else { "text" };
        table.add_row(vec![
            key_cell,
            dim_cell(kind),
            Cell::new(layer.filled),
            count_cell(layer.missing, Color::Yellow),
        ]);
    }
    println!("{table}");
}

pub fn print_validate_summary(result: &ValidateResult) {
    let report = &result.report;
    println!("Input: {}", result.input.display());
    println!(
        "Level: {} ({} of {} rows checked)",
        report.level, report.rows_checked, result.total_rows
    );

    let mut table = Table::new();
    table.set_header(vec![header_cell("Rows"), header_cell("Count")]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    table.add_row(vec![Cell::new("valid"), Cell::new(report.valid_rows())]);
    table.add_row(vec![
        Cell::new("invalid"),
        count_cell(report.invalid_rows(), Color::Red),
    ]);
    println!("{table}");

    if report.is_valid() {
        return;
    }

    let mut fields = Table::new();
    fields.set_header(vec![header_cell("Field"), header_cell("Violations")]);
    apply_table_style(&mut fields);
    align_column(&mut fields, 1, CellAlignment::Right);
    let mut counts: Vec<(&String, &u64)> = report.field_counts.iter().collect();
    counts.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
    for (field, count) in counts {
        fields.add_row(vec![
            Cell::new(field),
            Cell::new(count).fg(Color::Red),
        ]);
    }
    println!();
    println!("Fields:");
    println!("{fields}");

    eprintln!("Invalid rows:");
    for failure in report.failures.iter().take(MAX_LISTED_ROWS) {
        eprintln!("- row {}: {}", failure.row, failure.error);
    }
    if report.failures.len() > MAX_LISTED_ROWS {
        eprintln!("- ... {} more", report.failures.len() - MAX_LISTED_ROWS);
    }
}

pub fn print_default_columns() {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Destination"), header_cell("Columns")]);
    apply_table_style(&mut table);
    for (destination, names) in default_columns() {
        table.add_row(vec![
            Cell::new(destination)
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold),
            Cell::new(names.join(", ")),
        ]);
    }
    println!("{table}");
}

fn apply_table_style(table: &mut Table) {
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
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(100);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
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
