//! Config command implementation.

use anyhow::{Context, Result};
use clap::Subcommand;

use crate::cli::output::get_formatter;
use crate::models::{Config, OutputFormat};

/// Config subcommands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the effective configuration
    Show,

    /// Write a default configuration file
    Init,

    /// Print the configuration file path
    Path,
}

/// Handle the config command.
pub fn handle_config(command: ConfigCommand, format: OutputFormat) -> Result<()> {
    let formatter = get_formatter(format);

    match command {
        ConfigCommand::Show => {
            let config = Config::load()?;
            match format {
                OutputFormat::Json => {
                    println!("{}", serde_json::to_string_pretty(&config)?);
                }
                OutputFormat::Text => {
                    let toml = toml::to_string_pretty(&config)
                        .context("failed to serialize configuration")?;
                    println!("{}", toml);
                }
            }
        }

        ConfigCommand::Init => {
            let path = Config::config_path()
                .context("could not determine config directory")?;
            if path.exists() {
                println!(
                    "{}",
                    formatter.format_message(&format!(
                        "Config already exists at {}",
                        path.display()
                    ))
                );
                return Ok(());
            }
            Config::default().save()?;
            println!(
                "{}",
                formatter.format_message(&format!("Wrote default config to {}", path.display()))
            );
        }

        ConfigCommand::Path => {
            let path = Config::config_path()
                .context("could not determine config directory")?;
            println!("{}", path.display());
        }
    }

    Ok(())
}
