//! Dashboard command: per-unit refill and drum statistics.

use anyhow::Result;
use clap::Args;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tabled::Tabled;

use crate::client::ApiClient;
use crate::output::{self, OutputFormat};

#[derive(Args)]
pub struct DashboardArgs {
    /// Only show units installed in this printer
    #[arg(short, long)]
    printer: Option<String>,
}

/// One dashboard row as the server sends it. Dates and the refill cycle
/// arrive either as values or as the string "N/A".
#[derive(Debug, Deserialize, Serialize)]
struct UnitSummary {
    unit_id: String,
    ink_code: String,
    display_name: String,
    status: String,
    printer: String,
    latest_refill_date: Value,
    total_refill_count: u64,
    latest_drum_date: Value,
    total_drum_count: u64,
    refills_after_drum: u64,
    avg_refill_cycle: Value,
}

#[derive(Debug, Serialize, Tabled)]
struct DashboardRow {
    #[tabled(rename = "Unit")]
    unit_id: String,
    #[tabled(rename = "Name")]
    display_name: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Printer")]
    printer: String,
    #[tabled(rename = "Last refill")]
    latest_refill: String,
    #[tabled(rename = "Refills")]
    refills: u64,
    #[tabled(rename = "Last drum")]
    latest_drum: String,
    #[tabled(rename = "Drums")]
    drums: u64,
    #[tabled(rename = "Since drum")]
    refills_after_drum: u64,
    #[tabled(rename = "Cycle (days)")]
    cycle: String,
}

fn cell(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "N/A".to_string(),
        other => other.to_string(),
    }
}

impl From<&UnitSummary> for DashboardRow {
    fn from(s: &UnitSummary) -> Self {
        Self {
            unit_id: s.unit_id.clone(),
            display_name: s.display_name.clone(),
            status: output::status_badge(&s.status),
            printer: s.printer.clone(),
            latest_refill: cell(&s.latest_refill_date),
            refills: s.total_refill_count,
            latest_drum: cell(&s.latest_drum_date),
            drums: s.total_drum_count,
            refills_after_drum: s.refills_after_drum,
            cycle: cell(&s.avg_refill_cycle),
        }
    }
}

pub async fn execute(args: DashboardArgs, client: &ApiClient, format: OutputFormat) -> Result<()> {
    let mut summaries: Vec<UnitSummary> = client.get("/dashboard").await?;

    if let Some(printer) = &args.printer {
        let printer = printer.to_lowercase();
        summaries.retain(|s| s.printer.to_lowercase().contains(&printer));
    }

    match format {
        OutputFormat::Table => {
            let rows: Vec<DashboardRow> = summaries.iter().map(DashboardRow::from).collect();
            output::print_list(&rows, format)
        }
        _ => output::print_item(&summaries, format),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_rendering() {
        assert_eq!(cell(&Value::from("N/A")), "N/A");
        assert_eq!(cell(&Value::from(7)), "7");
        assert_eq!(cell(&Value::Null), "N/A");
    }
}
