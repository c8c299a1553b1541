//! Health check command.
//!
//! Queries the `/health` endpoint and reports server status.

use anyhow::Result;
use clap::Args;

use crate::client::ApiClient;
use crate::output::{self, OutputFormat};

#[derive(Args)]
pub struct HealthArgs {
    /// Exit non-zero unless the server is healthy
    #[arg(long)]
    strict: bool,
}

pub async fn execute(args: HealthArgs, client: &ApiClient, format: OutputFormat) -> Result<()> {
    let health: serde_json::Value = client.get_raw("/health").await?;
    let status = health
        .get("status")
        .and_then(|v| v.as_str())
        .unwrap_or("unknown")
        .to_string();

    match format {
        OutputFormat::Table => {
            output::print_header("Server Health");
            output::print_detail("Status", &status);
            output::print_detail("API URL", client.base_url());

            for key in ["version", "backend", "timestamp"] {
                if let Some(value) = health.get(key).and_then(|v| v.as_str()) {
                    output::print_detail(key, value);
                }
            }

            if status == "healthy" {
                output::print_success("Server operational");
            } else {
                output::print_error(&format!("Server status: {}", status));
            }
        }
        _ => output::print_item(&health, format)?,
    }

    if args.strict && status != "healthy" {
        anyhow::bail!("server reported status {}", status);
    }
    Ok(())
}
