//! Output formatting for the Inkledger CLI.
//!
//! Supports table, JSON, and YAML output formats.

use anyhow::{Context, Result};
use clap::ValueEnum;
use colored::*;
use serde::Serialize;
use tabled::{
    settings::{object::Columns, Alignment, Modify, Style},
    Table, Tabled,
};

/// Output format selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    /// Render as a formatted table
    #[default]
    Table,
    /// Render as JSON
    Json,
    /// Render as YAML
    Yaml,
}

pub fn print_success(msg: &str) {
    println!("{} {}", "[OK]".green().bold(), msg);
}

pub fn print_error(msg: &str) {
    eprintln!("{} {}", "[ERROR]".red().bold(), msg);
}

pub fn print_info(msg: &str) {
    println!("{} {}", "[INFO]".blue().bold(), msg);
}

/// Print a list of rows. Tables use the `Tabled` row; JSON and YAML
/// serialize the row as well so every format shows the same columns.
pub fn print_list<T: Tabled + Serialize>(items: &[T], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => {
            if items.is_empty() {
                println!("{}", "No results found.".dimmed());
                return Ok(());
            }
            let table = Table::new(items)
                .with(Style::rounded())
                .with(Modify::new(Columns::first()).with(Alignment::left()))
                .to_string();
            println!("{}", table);
            Ok(())
        }
        _ => print_item(&items, format),
    }
}

/// Print a single item. Table mode falls back to pretty JSON.
pub fn print_item<T: Serialize + ?Sized>(item: &T, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table | OutputFormat::Json => {
            let json = serde_json::to_string_pretty(item).context("Failed to serialize JSON")?;
            println!("{}", json);
        }
        OutputFormat::Yaml => {
            let yaml = serde_yaml::to_string(item).context("Failed to serialize YAML")?;
            print!("{}", yaml);
        }
    }
    Ok(())
}

pub fn print_detail(key: &str, value: &str) {
    println!("  {}: {}", key.cyan(), value);
}

pub fn print_header(title: &str) {
    println!();
    println!("{}", title.bold().underline());
    println!();
}

/// Colour a unit status for table output.
pub fn status_badge(status: &str) -> String {
    match status {
        "INSTALLED" => status.green().to_string(),
        "IN_STOCK" => status.blue().to_string(),
        "DISPOSED" => status.dimmed().to_string(),
        other => other.to_string(),
    }
}

/// Render a missing value the way the dashboard does.
pub fn or_na(value: Option<&str>) -> String {
    value.filter(|v| !v.is_empty()).unwrap_or("N/A").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_or_na() {
        assert_eq!(or_na(None), "N/A");
        assert_eq!(or_na(Some("")), "N/A");
        assert_eq!(or_na(Some("VP-HCM-03")), "VP-HCM-03");
    }

    #[test]
    fn test_status_badge_plain() {
        colored::control::set_override(false);
        assert_eq!(status_badge("INSTALLED"), "INSTALLED");
        assert_eq!(status_badge("LOST"), "LOST");
    }
}
