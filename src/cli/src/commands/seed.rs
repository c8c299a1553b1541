//! Demo data reset.

use anyhow::Result;
use clap::Args;
use serde::{Deserialize, Serialize};

use crate::client::ApiClient;
use crate::output::{self, OutputFormat};

#[derive(Args)]
pub struct SeedArgs {
    /// Skip confirmation
    #[arg(short, long)]
    force: bool,
}

#[derive(Debug, Deserialize, Serialize)]
struct SeedResponse {
    message: String,
    inks: usize,
    printers: usize,
    units: usize,
}

pub async fn execute(args: SeedArgs, client: &ApiClient, format: OutputFormat) -> Result<()> {
    if !args.force {
        output::print_info("This wipes every unit, event and catalog entry. Use --force to confirm.");
        return Ok(());
    }

    let seeded: SeedResponse = client.post("/init", &serde_json::json!({})).await?;
    match format {
        OutputFormat::Table => {
            output::print_success(&seeded.message);
            output::print_detail("Inks", &seeded.inks.to_string());
            output::print_detail("Printers", &seeded.printers.to_string());
            output::print_detail("Units", &seeded.units.to_string());
            Ok(())
        }
        _ => output::print_item(&seeded, format),
    }
}
