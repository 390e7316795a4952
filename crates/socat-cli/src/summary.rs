use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use socat_cli::types::{CheckResult, MergeResult};
use socat_sanity::UnitConverterRegistry;

pub fn print_merge_summary(result: &MergeResult) {
    println!("Sources: {}", result.sources.len());
    if let Some(path) = &result.output {
        println!("Merged metadata: {}", path.display());
    }
    if let Some(path) = &result.conflicts_output {
        println!("Conflicts: {}", path.display());
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Section"),
        header_cell("Variables"),
        header_cell("Conflicts"),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    align_column(&mut table, 2, CellAlignment::Right);
    let mut total_variables = 0usize;
    let mut total_conflicts = 0usize;
    for section in &result.sections {
        total_variables += section.variables;
        total_conflicts += section.conflicts;
        table.add_row(vec![
            Cell::new(&section.section),
            count_cell(section.variables, Color::Reset),
            count_cell(section.conflicts, Color::Red),
        ]);
    }
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(total_variables).add_attribute(Attribute::Bold),
        count_cell(total_conflicts, Color::Red).add_attribute(Attribute::Bold),
    ]);
    println!("{table}");
    if result.has_conflicts && result.conflicts_output.is_none() {
        eprintln!("Conflicting values found; use --conflicts to write them out.");
    }
}

pub fn print_check_summary(result: &CheckResult) {
    println!("Data file: {}", result.data_file.display());
    if let Some(path) = &result.output {
        println!("Normalized data: {}", path.display());
    }
    if let Some(path) = &result.report {
        println!("Issue report: {}", path.display());
    }
    println!(
        "Rows: {}  Issues: {}",
        result.table.rows.len(),
        result.table.issues.len()
    );
    if result.table.issues.is_empty() {
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Line"),
        header_cell("Column"),
        header_cell("Value"),
        header_cell("Message"),
    ]);
    apply_issue_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    for issue in &result.table.issues {
        table.add_row(vec![
            Cell::new(issue.line),
            Cell::new(&issue.column).fg(Color::Blue),
            if issue.value.is_empty() {
                dim_cell("-")
            } else {
                Cell::new(&issue.value)
            },
            Cell::new(&issue.message),
        ]);
    }
    println!();
    println!("Issues:");
    println!("{table}");
}

pub fn print_units(registry: &UnitConverterRegistry) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Converter"),
        header_cell("Canonical"),
        header_cell("Accepted units"),
    ]);
    apply_table_style(&mut table);
    for converter in registry.converters() {
        table.add_row(vec![
            Cell::new(converter.name())
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold),
            Cell::new(converter.canonical_unit()),
            Cell::new(converter.supported_units().join(", ")),
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

fn apply_issue_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::DynamicFullWidth)
        .set_width(160);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color)
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
