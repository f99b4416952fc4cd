//! Config command - manage configuration.

use std::fs;
use std::path::PathBuf;

use clap::{Args, Subcommand};
use console::style;
use serde_json::Value;

use vypiska_core::models::config::VypiskaConfig;
use vypiska_core::StatementParser;

use super::default_config_path;

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommand,
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Show current configuration
    Show,

    /// Initialize a new configuration file
    Init(InitArgs),

    /// Get a specific configuration value
    Get {
        /// Configuration key (e.g., "table.currency")
        key: String,
    },

    /// Set a configuration value
    Set {
        /// Configuration key
        key: String,
        /// New value (JSON, or a plain string)
        value: String,
    },

    /// Check that all patterns and labels compile
    Validate {
        /// Configuration file (default: the user config file)
        path: Option<PathBuf>,
    },

    /// Show configuration file path
    Path,
}

#[derive(Args)]
struct InitArgs {
    /// Output path for configuration file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Overwrite existing file
    #[arg(long)]
    force: bool,
}

pub async fn run(args: ConfigArgs) -> anyhow::Result<()> {
    match args.command {
        ConfigCommand::Show => show_config(),
        ConfigCommand::Init(init_args) => init_config(init_args),
        ConfigCommand::Get { key } => get_config(&key),
        ConfigCommand::Set { key, value } => set_config(&key, &value),
        ConfigCommand::Validate { path } => validate_config(path),
        ConfigCommand::Path => show_path(),
    }
}

fn read_user_config() -> anyhow::Result<Option<VypiskaConfig>> {
    let config_path = default_config_path();
    if config_path.exists() {
        Ok(Some(VypiskaConfig::from_file(&config_path)?))
    } else {
        Ok(None)
    }
}

/// Turn a dotted key into a JSON pointer ("table.currency" -> "/table/currency").
fn pointer(key: &str) -> String {
    key.split('.').map(|part| format!("/{}", part)).collect()
}

fn show_config() -> anyhow::Result<()> {
    let config = match read_user_config()? {
        Some(config) => config,
        None => {
            println!(
                "{} No config file found, showing defaults.",
                style("ℹ").blue()
            );
            VypiskaConfig::default()
        }
    };

    println!("{}", serde_json::to_string_pretty(&config)?);
    Ok(())
}

fn init_config(args: InitArgs) -> anyhow::Result<()> {
    let output_path = args.output.unwrap_or_else(default_config_path);

    if output_path.exists() && !args.force {
        anyhow::bail!(
            "Config file already exists at {}. Use --force to overwrite.",
            output_path.display()
        );
    }

    if let Some(parent) = output_path.parent() {
        fs::create_dir_all(parent)?;
    }

    VypiskaConfig::default().save(&output_path)?;

    println!(
        "{} Created configuration file at {}",
        style("✓").green(),
        output_path.display()
    );
    Ok(())
}

fn get_config(key: &str) -> anyhow::Result<()> {
    let config = read_user_config()?.unwrap_or_default();
    let json = serde_json::to_value(&config)?;

    let value = json
        .pointer(&pointer(key))
        .ok_or_else(|| anyhow::anyhow!("Configuration key not found: {}", key))?;

    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn set_config(key: &str, value: &str) -> anyhow::Result<()> {
    let config_path = default_config_path();
    let config = read_user_config()?.unwrap_or_default();

    let parsed_value: Value =
        serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));

    let mut json = serde_json::to_value(&config)?;
    let slot = json
        .pointer_mut(&pointer(key))
        .ok_or_else(|| anyhow::anyhow!("Configuration key not found: {}", key))?;
    *slot = parsed_value.clone();

    // Round-trip through the typed config so a wrong value type is rejected.
    let config: VypiskaConfig = serde_json::from_value(json)?;
    StatementParser::new(&config)?;

    if let Some(parent) = config_path.parent() {
        fs::create_dir_all(parent)?;
    }
    config.save(&config_path)?;

    println!(
        "{} Set {} = {}",
        style("✓").green(),
        key,
        serde_json::to_string(&parsed_value)?
    );
    Ok(())
}

fn validate_config(path: Option<PathBuf>) -> anyhow::Result<()> {
    let path = path.unwrap_or_else(default_config_path);
    if !path.exists() {
        anyhow::bail!("Config file not found: {}", path.display());
    }

    StatementParser::from_config_file(&path)?;

    println!("{} {} is valid", style("✓").green(), path.display());
    Ok(())
}

fn show_path() -> anyhow::Result<()> {
    let config_path = default_config_path();

    println!("Configuration file: {}", config_path.display());

    if config_path.exists() {
        println!("Status: {}", style("exists").green());
    } else {
        println!("Status: {}", style("not created").yellow());
        println!();
        println!("Run 'vypiska config init' to create a configuration file.");
    }

    Ok(())
}
