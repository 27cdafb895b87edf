//! Output formatting utilities

use colored::Colorize;
use comfy_table::{presets::UTF8_FULL_CONDENSED, Cell, CellAlignment, ContentArrangement, Table};
use helios_core::formatters;

/// Print a success message
pub fn success(msg: &str) {
    println!("{}", msg.green());
}

/// Print an error message
pub fn error(msg: &str) {
    eprintln!("{}", msg.red());
}

/// Print a warning message
pub fn warning(msg: &str) {
    eprintln!("{}", msg.yellow());
}

/// Print an info message
pub fn info(msg: &str) {
    println!("{}", msg.cyan());
}

/// Create a styled table
pub fn create_table() -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Two-column key/value table
pub fn summary_table(rows: &[(&str, String)]) -> Table {
    let mut table = create_table();
    for (label, value) in rows {
        table.add_row(vec![Cell::new(label), right(value.clone())]);
    }
    table
}

/// Right-aligned cell, for numbers
pub fn right(value: String) -> Cell {
    Cell::new(value).set_alignment(CellAlignment::Right)
}

/// Backend dates rendered as DD/MM/YYYY, falling back to the raw value
pub fn date(raw: &str) -> String {
    formatters::format_date(raw).unwrap_or_else(|_| raw.to_string())
}

pub fn kwh(value: f64) -> String {
    formatters::format_kwh(value)
}

pub fn currency(value: f64) -> String {
    formatters::format_currency(value)
}

pub fn percent(value: f64) -> String {
    formatters::format_percentage(value, 1)
}
