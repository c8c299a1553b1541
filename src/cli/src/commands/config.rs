//! Configuration management commands.
//!
//! Stores CLI configuration in `~/.inkledger/config.toml`.

use anyhow::{Context, Result};
use clap::{Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::output::{self, OutputFormat};

/// Keys the CLI reads back.
pub const API_URL_KEY: &str = "api-url";
pub const OUTPUT_KEY: &str = "output";
const KNOWN_KEYS: [&str; 2] = [API_URL_KEY, OUTPUT_KEY];

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Set a configuration value
    Set {
        /// Configuration key (api-url or output)
        key: String,
        /// Value to set
        value: String,
    },

    /// Get a configuration value
    Get {
        key: String,
    },

    /// Show all configuration
    Show,

    /// Reset configuration to defaults
    Reset {
        /// Skip confirmation
        #[arg(short, long)]
        force: bool,
    },
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct CliConfig {
    #[serde(default)]
    pub values: BTreeMap<String, String>,
}

impl CliConfig {
    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        if !KNOWN_KEYS.contains(&key) {
            anyhow::bail!("Unknown key '{}' (expected one of: {})", key, KNOWN_KEYS.join(", "));
        }
        if key == OUTPUT_KEY {
            OutputFormat::from_str(value, true)
                .map_err(|e| anyhow::anyhow!("Invalid output format '{}': {}", value, e))?;
        }
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

fn config_path() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(home.join(".inkledger").join("config.toml"))
}

/// Load the config file, or defaults when it does not exist.
fn load_config() -> Result<CliConfig> {
    let path = config_path()?;
    if !path.exists() {
        return Ok(CliConfig::default());
    }
    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    toml::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
}

fn save_config(cfg: &CliConfig) -> Result<()> {
    let path = config_path()?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    let content = toml::to_string_pretty(cfg).context("Failed to serialize config")?;
    std::fs::write(&path, content)
        .with_context(|| format!("Failed to write {}", path.display()))
}

pub fn load_api_url() -> Option<String> {
    load_config()
        .ok()
        .and_then(|cfg| cfg.values.get(API_URL_KEY).cloned())
}

/// Preferred output format from the config file, if set and valid.
pub fn load_output_format() -> Option<OutputFormat> {
    let cfg = load_config().ok()?;
    let raw = cfg.values.get(OUTPUT_KEY)?;
    OutputFormat::from_str(raw, true).ok()
}

pub async fn execute(cmd: ConfigCommands, format: OutputFormat) -> Result<()> {
    match cmd {
        ConfigCommands::Set { key, value } => {
            let mut cfg = load_config()?;
            cfg.set(&key, &value)?;
            save_config(&cfg)?;

            match format {
                OutputFormat::Table => output::print_success(&format!("{} = {}", key, value)),
                _ => output::print_item(&serde_json::json!({ "key": key, "value": value }), format)?,
            }
        }

        ConfigCommands::Get { key } => {
            let cfg = load_config()?;
            let value = cfg
                .values
                .get(&key)
                .with_context(|| format!("Key '{}' not set", key))?;
            match format {
                OutputFormat::Table => println!("{}", value),
                _ => output::print_item(&serde_json::json!({ "key": key, "value": value }), format)?,
            }
        }

        ConfigCommands::Show => {
            let cfg = load_config()?;

            if cfg.values.is_empty() {
                output::print_info("No configuration values set.");
                return Ok(());
            }

            match format {
                OutputFormat::Table => {
                    output::print_header("Configuration");
                    for (k, v) in &cfg.values {
                        output::print_detail(k, v);
                    }
                }
                _ => output::print_item(&cfg.values, format)?,
            }
        }

        ConfigCommands::Reset { force } => {
            if !force {
                output::print_info("This will reset all CLI configuration. Use --force to confirm.");
                return Ok(());
            }

            let path = config_path()?;
            if path.exists() {
                std::fs::remove_file(&path)
                    .with_context(|| format!("Failed to remove {}", path.display()))?;
            }

            output::print_success("Configuration reset to defaults");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_rejects_unknown_key() {
        let mut cfg = CliConfig::default();
        assert!(cfg.set("colour", "on").is_err());
        assert!(cfg.values.is_empty());
    }

    #[test]
    fn test_set_validates_output() {
        let mut cfg = CliConfig::default();
        assert!(cfg.set(OUTPUT_KEY, "xml").is_err());
        cfg.set(OUTPUT_KEY, "yaml").unwrap();
        cfg.set(API_URL_KEY, "http://printers.local:5000").unwrap();
        assert_eq!(cfg.values.len(), 2);
    }

    #[test]
    fn test_config_toml_roundtrip() {
        let mut cfg = CliConfig::default();
        cfg.set(API_URL_KEY, "http://localhost:5000").unwrap();
        let text = toml::to_string_pretty(&cfg).unwrap();
        let back: CliConfig = toml::from_str(&text).unwrap();
        assert_eq!(back.values.get(API_URL_KEY).map(String::as_str), Some("http://localhost:5000"));
    }
}
