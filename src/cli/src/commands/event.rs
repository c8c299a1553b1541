//! Lifecycle event commands.

use anyhow::Result;
use chrono::{DateTime, Local, Utc};
use clap::{Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use tabled::Tabled;
use uuid::Uuid;

use super::unit::UnitInfo;
use crate::client::ApiClient;
use crate::output::{self, OutputFormat};

#[derive(Subcommand)]
pub enum EventCommands {
    /// Record an event and apply it to the unit
    Record {
        unit_id: String,

        /// What happened
        #[arg(short, long, value_enum)]
        kind: EventKindArg,

        /// Printer the event happened at
        #[arg(short, long)]
        printer: String,

        /// Free-form note
        #[arg(short, long)]
        detail: Option<String>,
    },

    /// List every event, newest first
    List {
        /// Only show events for this unit
        #[arg(short, long)]
        unit: Option<String>,

        /// Maximum number of rows
        #[arg(short, long, default_value = "50")]
        limit: usize,
    },

    /// Delete one event; unit state is not recomputed
    Delete {
        event_id: Uuid,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum EventKindArg {
    Install,
    Refill,
    DrumReplace,
    Dispose,
}

impl EventKindArg {
    fn wire_name(self) -> &'static str {
        match self {
            EventKindArg::Install => "INSTALL",
            EventKindArg::Refill => "REFILL",
            EventKindArg::DrumReplace => "DRUM_REPLACE",
            EventKindArg::Dispose => "DISPOSE",
        }
    }
}

// ── API types ───────────────────────────────────────────────────────────────

#[derive(Serialize)]
struct NewEventRequest<'a> {
    unit_id: &'a str,
    printer_id: &'a str,
    event_kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    detail: Option<&'a str>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct EventInfo {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub unit_id: String,
    pub printer_id: String,
    pub event_kind: String,
    #[serde(default)]
    pub detail: Option<String>,
}

#[derive(Debug, Deserialize, Serialize)]
struct RecordedEvent {
    event: EventInfo,
    unit: UnitInfo,
}

#[derive(Debug, Serialize, Tabled)]
pub struct EventRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "When")]
    when: String,
    #[tabled(rename = "Unit")]
    unit_id: String,
    #[tabled(rename = "Printer")]
    printer_id: String,
    #[tabled(rename = "Kind")]
    kind: String,
    #[tabled(rename = "Detail")]
    detail: String,
}

impl From<&EventInfo> for EventRow {
    fn from(e: &EventInfo) -> Self {
        Self {
            id: e.id.to_string(),
            when: e
                .timestamp
                .with_timezone(&Local)
                .format("%Y-%m-%d %H:%M")
                .to_string(),
            unit_id: e.unit_id.clone(),
            printer_id: e.printer_id.clone(),
            kind: e.event_kind.clone(),
            detail: e.detail.clone().unwrap_or_default(),
        }
    }
}

pub async fn execute(cmd: EventCommands, client: &ApiClient, format: OutputFormat) -> Result<()> {
    match cmd {
        EventCommands::Record {
            unit_id,
            kind,
            printer,
            detail,
        } => {
            let req = NewEventRequest {
                unit_id: &unit_id,
                printer_id: &printer,
                event_kind: kind.wire_name(),
                detail: detail.as_deref(),
            };
            let recorded: RecordedEvent = client.post("/events", &req).await?;
            match format {
                OutputFormat::Table => {
                    output::print_success(&format!(
                        "{} recorded for {}",
                        recorded.event.event_kind, recorded.unit.unit_id
                    ));
                    output::print_detail("Event", &recorded.event.id.to_string());
                    output::print_detail("Status", &output::status_badge(&recorded.unit.status));
                    output::print_detail(
                        "Printer",
                        &output::or_na(recorded.unit.current_printer_id.as_deref()),
                    );
                }
                _ => output::print_item(&recorded, format)?,
            }
        }

        EventCommands::List { unit, limit } => {
            let events: Vec<EventInfo> = client.get("/events").await?;
            let rows: Vec<EventRow> = events
                .iter()
                .filter(|e| unit.as_deref().map_or(true, |u| e.unit_id == u))
                .take(limit)
                .map(EventRow::from)
                .collect();
            output::print_list(&rows, format)?;
        }

        EventCommands::Delete { event_id } => {
            let _: serde_json::Value = client.delete(&format!("/events/{}", event_id)).await?;
            output::print_success(&format!("Event {} deleted", event_id));
            output::print_info("Unit status was not recomputed.");
        }
    }

    Ok(())
}
