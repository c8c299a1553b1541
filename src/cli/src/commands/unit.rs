//! Unit management commands.
//!
//! List, inspect, register, patch and delete individual cartridge units.

use anyhow::Result;
use clap::{Args, Subcommand};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tabled::Tabled;

use super::event::{EventInfo, EventRow};
use crate::client::ApiClient;
use crate::output::{self, OutputFormat};

#[derive(Subcommand)]
pub enum UnitCommands {
    /// List units (in stock and installed by default)
    List {
        /// Comma-separated statuses, e.g. IN_STOCK,DISPOSED
        #[arg(short, long)]
        status: Option<String>,
    },

    /// Show one unit
    Show {
        unit_id: String,
    },

    /// Register a new unit
    Create {
        unit_id: String,

        /// Catalog code of the ink model
        #[arg(short, long)]
        ink: String,

        /// Free-form display name
        #[arg(short, long)]
        name: Option<String>,

        /// Initial status (defaults to IN_STOCK)
        #[arg(short, long)]
        status: Option<String>,

        /// Printer holding the unit; requires status INSTALLED
        #[arg(short, long)]
        printer: Option<String>,
    },

    /// Patch a unit; omitted fields are left unchanged
    Update(UpdateArgs),

    /// Delete a unit and its whole event history
    Delete {
        unit_id: String,

        /// Skip confirmation
        #[arg(short, long)]
        force: bool,
    },

    /// Show a unit's events, oldest first
    History {
        unit_id: String,
    },
}

#[derive(Args)]
pub struct UpdateArgs {
    unit_id: String,

    #[arg(short, long)]
    name: Option<String>,

    /// Clear the custom name
    #[arg(long, conflicts_with = "name")]
    clear_name: bool,

    #[arg(short, long)]
    ink: Option<String>,

    #[arg(short, long)]
    status: Option<String>,

    #[arg(short, long)]
    printer: Option<String>,

    /// Clear the held printer
    #[arg(long, conflicts_with = "printer")]
    clear_printer: bool,
}

impl UpdateArgs {
    /// Build the JSON patch. Cleared fields are sent as explicit `null`.
    fn to_patch(&self) -> Map<String, Value> {
        let mut patch = Map::new();
        if self.clear_name {
            patch.insert("custom_name".into(), Value::Null);
        } else if let Some(name) = &self.name {
            patch.insert("custom_name".into(), Value::from(name.as_str()));
        }
        if let Some(ink) = &self.ink {
            patch.insert("ink_code".into(), Value::from(ink.as_str()));
        }
        if let Some(status) = &self.status {
            patch.insert("status".into(), Value::from(status.to_uppercase()));
        }
        if self.clear_printer {
            patch.insert("current_printer_id".into(), Value::Null);
        } else if let Some(printer) = &self.printer {
            patch.insert("current_printer_id".into(), Value::from(printer.as_str()));
        }
        patch
    }
}

// ── API types ───────────────────────────────────────────────────────────────

#[derive(Serialize)]
struct CreateUnitRequest {
    unit_id: String,
    ink_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    custom_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    current_printer_id: Option<String>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct UnitInfo {
    pub unit_id: String,
    #[serde(default)]
    pub custom_name: Option<String>,
    pub ink_code: String,
    pub status: String,
    #[serde(default)]
    pub current_printer_id: Option<String>,
}

#[derive(Debug, Serialize, Tabled)]
struct UnitRow {
    #[tabled(rename = "Unit")]
    unit_id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Ink")]
    ink_code: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Printer")]
    printer: String,
}

impl UnitRow {
    fn from_info(info: &UnitInfo, format: OutputFormat) -> Self {
        let status = if format == OutputFormat::Table {
            output::status_badge(&info.status)
        } else {
            info.status.clone()
        };
        Self {
            unit_id: info.unit_id.clone(),
            name: output::or_na(info.custom_name.as_deref()),
            ink_code: info.ink_code.clone(),
            status,
            printer: output::or_na(info.current_printer_id.as_deref()),
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
struct DeletedUnit {
    unit_id: String,
    events_removed: u64,
}

fn print_unit(unit: &UnitInfo, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => {
            output::print_header(&format!("Unit {}", unit.unit_id));
            output::print_detail("Name", &output::or_na(unit.custom_name.as_deref()));
            output::print_detail("Ink", &unit.ink_code);
            output::print_detail("Status", &output::status_badge(&unit.status));
            output::print_detail("Printer", &output::or_na(unit.current_printer_id.as_deref()));
            Ok(())
        }
        _ => output::print_item(unit, format),
    }
}

pub async fn execute(cmd: UnitCommands, client: &ApiClient, format: OutputFormat) -> Result<()> {
    match cmd {
        UnitCommands::List { status } => {
            let path = match status {
                Some(status) => format!("/units?status={}", status.to_uppercase()),
                None => "/units".to_string(),
            };
            let units: Vec<UnitInfo> = client.get(&path).await?;
            let rows: Vec<UnitRow> = units.iter().map(|u| UnitRow::from_info(u, format)).collect();
            output::print_list(&rows, format)?;
        }

        UnitCommands::Show { unit_id } => {
            let unit: UnitInfo = client.get(&format!("/units/{}", unit_id)).await?;
            print_unit(&unit, format)?;
        }

        UnitCommands::Create {
            unit_id,
            ink,
            name,
            status,
            printer,
        } => {
            let req = CreateUnitRequest {
                unit_id,
                ink_code: ink,
                custom_name: name,
                status: status.map(|s| s.to_uppercase()),
                current_printer_id: printer,
            };
            let unit: UnitInfo = client.post("/units", &req).await?;
            match format {
                OutputFormat::Table => {
                    output::print_success(&format!("Unit {} registered", unit.unit_id))
                }
                _ => output::print_item(&unit, format)?,
            }
        }

        UnitCommands::Update(args) => {
            let patch = args.to_patch();
            if patch.is_empty() {
                output::print_info("Nothing to update.");
                return Ok(());
            }
            let unit: UnitInfo = client
                .put(&format!("/units/{}", args.unit_id), &patch)
                .await?;
            print_unit(&unit, format)?;
        }

        UnitCommands::Delete { unit_id, force } => {
            if !force {
                output::print_info(&format!(
                    "This deletes {} and all of its events. Use --force to confirm.",
                    unit_id
                ));
                return Ok(());
            }
            let deleted: DeletedUnit = client.delete(&format!("/units/{}", unit_id)).await?;
            match format {
                OutputFormat::Table => output::print_success(&format!(
                    "Deleted {} ({} events removed)",
                    deleted.unit_id, deleted.events_removed
                )),
                _ => output::print_item(&deleted, format)?,
            }
        }

        UnitCommands::History { unit_id } => {
            let events: Vec<EventInfo> = client.get(&format!("/units/{}/events", unit_id)).await?;
            let rows: Vec<EventRow> = events.iter().map(EventRow::from).collect();
            output::print_list(&rows, format)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> UpdateArgs {
        UpdateArgs {
            unit_id: "HP80A-STOCK-001".into(),
            name: None,
            clear_name: false,
            ink: None,
            status: None,
            printer: None,
            clear_printer: false,
        }
    }

    #[test]
    fn test_empty_patch() {
        assert!(args().to_patch().is_empty());
    }

    #[test]
    fn test_patch_clears_with_null() {
        let mut a = args();
        a.clear_printer = true;
        a.status = Some("in_stock".into());
        let patch = a.to_patch();

        assert_eq!(patch.get("current_printer_id"), Some(&Value::Null));
        assert_eq!(patch.get("status"), Some(&Value::from("IN_STOCK")));
        assert!(!patch.contains_key("custom_name"));
    }
}
