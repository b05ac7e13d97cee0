use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use scrub_cli::clean::CleanResult;
use scrub_cli::logging::redact_value;
use scrub_transform::{StageReport, normalize_phone};

pub fn print_summary(result: &CleanResult) {
    println!("Input: {}", result.input.display());
    match &result.output {
        Some(path) => println!("Output: {}", path.display()),
        None => println!("Output: (dry run, nothing written)"),
    }
    println!("Columns: {}", result.columns.join(", "));
    let ingest = &result.ingest;
    if ingest.short_rows + ingest.long_rows + ingest.unparsed_numbers > 0 {
        println!(
            "Read warnings: {} short rows, {} long rows, {} unparsed numbers",
            ingest.short_rows, ingest.long_rows, ingest.unparsed_numbers
        );
    }

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Stage"),
        header_cell("Rows in"),
        header_cell("Rows out"),
        header_cell("Removed"),
        header_cell("Changed"),
        header_cell("Issues"),
        header_cell("Details"),
    ]);
    apply_summary_table_style(&mut table);
    for index in 1..=5 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    for stage in &result.report.stages {
        table.add_row(vec![
            Cell::new(stage.stage).add_attribute(Attribute::Bold),
            Cell::new(stage.rows_in),
            Cell::new(stage.rows_out),
            count_cell(stage.rows_removed(), Color::Yellow),
            count_cell(stage.cells_changed, Color::Green),
            count_cell(stage.issue_count(), Color::Yellow),
            details_cell(stage),
        ]);
    }
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(result.report.rows_in()).add_attribute(Attribute::Bold),
        Cell::new(result.report.rows_out()).add_attribute(Attribute::Bold),
        dim_cell("-"),
        Cell::new(result.report.cells_changed()).add_attribute(Attribute::Bold),
        Cell::new(result.report.issue_count()).add_attribute(Attribute::Bold),
        dim_cell("-"),
    ]);
    println!("{table}");
    print_issue_table(result);
}

fn print_issue_table(result: &CleanResult) {
    let mut issues = result.report.issues().peekable();
    if issues.peek().is_none() {
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Row"),
        header_cell("Column"),
        header_cell("Issue"),
        header_cell("Value"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    for issue in issues {
        table.add_row(vec![
            Cell::new(issue.row),
            Cell::new(&issue.column),
            Cell::new(issue.kind.label()).fg(Color::Yellow),
            dim_cell(redact_value(&issue.value)),
        ]);
    }
    println!("Issue samples:");
    println!("{table}");
}

pub fn print_phone_table(values: &[String]) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Input"),
        header_cell("Output"),
        header_cell("Status"),
    ]);
    apply_table_style(&mut table);
    for value in values {
        let normalized = normalize_phone(value);
        let status = if normalized.is_canonical() {
            Cell::new("normalized").fg(Color::Green)
        } else {
            Cell::new("unparsed").fg(Color::Yellow)
        };
        table.add_row(vec![
            Cell::new(value),
            Cell::new(normalized.as_str()),
            status,
        ]);
    }
    println!("{table}");
}

fn details_cell(stage: &StageReport) -> Cell {
    let mut parts = Vec::new();
    for (label, count) in [
        ("malformed splits", stage.malformed_splits),
        ("irrelevant", stage.irrelevant_rows),
        ("duplicates", stage.duplicate_rows),
        ("unmapped", stage.unmapped_strings),
        ("unparsed", stage.unparsed_phones),
        ("filled", stage.cells_filled()),
    ] {
        if count > 0 {
            parts.push(format!("{label}: {count}"));
        }
    }
    if parts.is_empty() {
        dim_cell("-")
    } else {
        Cell::new(parts.join(", "))
    }
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
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
