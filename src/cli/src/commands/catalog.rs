//! Catalog lookups: ink models and printers.

use anyhow::Result;
use clap::Subcommand;
use serde::{Deserialize, Serialize};
use tabled::Tabled;

use crate::client::ApiClient;
use crate::output::{self, OutputFormat};

#[derive(Subcommand)]
pub enum CatalogCommands {
    /// List ink models, or show one by code
    Inks {
        code: Option<String>,
    },

    /// List printers, or show one by id
    Printers {
        printer_id: Option<String>,
    },
}

#[derive(Debug, Deserialize, Serialize, Tabled)]
struct InkRow {
    #[tabled(rename = "Code")]
    code: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Type")]
    ink_type: String,
    #[tabled(rename = "Color", display_with = "display_opt")]
    #[serde(default)]
    color: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Tabled)]
struct PrinterRow {
    #[tabled(rename = "Printer")]
    printer_id: String,
    #[tabled(rename = "Name")]
    name: String,
}

fn display_opt(value: &Option<String>) -> String {
    output::or_na(value.as_deref())
}

pub async fn execute(cmd: CatalogCommands, client: &ApiClient, format: OutputFormat) -> Result<()> {
    match cmd {
        CatalogCommands::Inks { code: None } => {
            let inks: Vec<InkRow> = client.get("/inks").await?;
            output::print_list(&inks, format)?;
        }
        CatalogCommands::Inks { code: Some(code) } => {
            let ink: InkRow = client.get(&format!("/inks/{}", code)).await?;
            output::print_list(&[ink], format)?;
        }
        CatalogCommands::Printers { printer_id: None } => {
            let printers: Vec<PrinterRow> = client.get("/printers").await?;
            output::print_list(&printers, format)?;
        }
        CatalogCommands::Printers {
            printer_id: Some(id),
        } => {
            let printer: PrinterRow = client.get(&format!("/printers/{}", id)).await?;
            output::print_list(&[printer], format)?;
        }
    }

    Ok(())
}
