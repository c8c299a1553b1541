//! Inkledger CLI - command-line client for the cartridge tracking server.
//!
//! Provides dashboard, unit, event, catalog, seeding, health, and
//! configuration commands.

mod client;
mod commands;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{catalog, config, dashboard, event, health, seed, unit};
use output::OutputFormat;

const DEFAULT_API_URL: &str = "http://localhost:5000";

/// Inkledger - ink and toner lifecycle tracking
#[derive(Parser)]
#[command(
    name = "inkledger",
    version,
    about = "Inkledger - ink and toner lifecycle tracking",
    long_about = "Command-line client for recording cartridge events and reading the refill dashboard.",
    propagate_version = true
)]
pub struct Cli {
    /// Output format (defaults to the configured format, then table)
    #[arg(short, long, global = true)]
    output: Option<OutputFormat>,

    /// API server URL
    #[arg(long, global = true, env = "INKLEDGER_API_URL")]
    api_url: Option<String>,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Per-unit refill and drum statistics
    Dashboard(dashboard::DashboardArgs),

    /// Unit management operations
    #[command(subcommand)]
    Unit(unit::UnitCommands),

    /// Lifecycle event operations
    #[command(subcommand)]
    Event(event::EventCommands),

    /// Ink models and printers
    #[command(subcommand)]
    Catalog(catalog::CatalogCommands),

    /// Wipe all data and load the demo set
    Seed(seed::SeedArgs),

    /// Check server health
    Health(health::HealthArgs),

    /// Configuration management
    #[command(subcommand)]
    Config(config::ConfigCommands),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.no_color {
        colored::control::set_override(false);
    }

    let api_url = cli
        .api_url
        .clone()
        .or_else(config::load_api_url)
        .unwrap_or_else(|| DEFAULT_API_URL.to_string());
    let format = cli
        .output
        .or_else(config::load_output_format)
        .unwrap_or_default();

    let client = client::ApiClient::new(&api_url)?;

    let result = match cli.command {
        Commands::Dashboard(args) => dashboard::execute(args, &client, format).await,
        Commands::Unit(cmd) => unit::execute(cmd, &client, format).await,
        Commands::Event(cmd) => event::execute(cmd, &client, format).await,
        Commands::Catalog(cmd) => catalog::execute(cmd, &client, format).await,
        Commands::Seed(args) => seed::execute(args, &client, format).await,
        Commands::Health(args) => health::execute(args, &client, format).await,
        Commands::Config(cmd) => config::execute(cmd, format).await,
    };

    if let Err(e) = result {
        output::print_error(&format!("{:#}", e));
        std::process::exit(1);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_event_record() {
        let cli = Cli::try_parse_from([
            "inkledger",
            "--output",
            "json",
            "event",
            "record",
            "HP80A-STOCK-001",
            "--kind",
            "drum-replace",
            "--printer",
            "VP-HANOI-01",
        ])
        .unwrap();
        assert_eq!(cli.output, Some(OutputFormat::Json));
        assert!(matches!(cli.command, Commands::Event(_)));
    }
}
