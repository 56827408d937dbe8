//! Result presentation shared by the query commands

use anyhow::Result;
use colored::Colorize;
use comfy_table::{presets, Cell, ContentArrangement, Table};
use serde::Serialize;

use hybrid_nl_search::core::value::{ResultSet, Value};

pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn print_heading(text: &str) {
    println!("{}", text.bold());
}

/// Heading followed by the result table, or a notice when there are no rows
pub fn print_result_set(heading: &str, results: &ResultSet) {
    print_heading(heading);

    if results.is_empty() {
        println!("{} No matching results found", "→".dimmed());
        return;
    }

    println!("{}", render_table(results));
    println!(
        "{}",
        format!("{} row(s)", results.len()).dimmed()
    );
}

pub fn render_table(results: &ResultSet) -> Table {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(results.columns.iter().map(|c| Cell::new(c)));

    for row in &results.rows {
        table.add_row(row.iter().map(cell));
    }
    table
}

fn cell(value: &Value) -> Cell {
    match value {
        Value::Null => Cell::new("NULL".dimmed()),
        other => Cell::new(other),
    }
}
