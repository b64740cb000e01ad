//! Index maintenance commands: count and bulk deletion.

use anyhow::Result;
use clap::Subcommand;

use super::connect_store;
use crate::cli::output::get_formatter;
use crate::models::{Config, OutputFormat};

/// Index subcommands.
#[derive(Debug, Subcommand)]
pub enum IndexCommand {
    /// Show how many entries the index holds
    Count,

    /// Delete every entry from the index
    Clear {
        /// Skip the confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,
    },
}

/// Handle the index command.
pub async fn handle_index(command: IndexCommand, format: OutputFormat) -> Result<()> {
    let config = Config::load()?;
    let formatter = get_formatter(format);
    let store = connect_store(&config)?;

    match command {
        IndexCommand::Count => {
            let count = store.count().await?;
            println!(
                "{}",
                formatter.format_message(&format!(
                    "Collection '{}' contains {} entries",
                    store.collection(),
                    count
                ))
            );
        }

        IndexCommand::Clear { yes } => {
            let before = store.count().await?;
            if before == 0 {
                println!("{}", formatter.format_message("Index is already empty."));
                return Ok(());
            }

            if !yes {
                println!(
                    "{}",
                    formatter.format_message(&format!(
                        "This would delete {} entries from '{}'. Re-run with --yes to confirm.",
                        before,
                        store.collection()
                    ))
                );
                return Ok(());
            }

            store.clear().await?;
            let after = store.count().await?;
            println!(
                "{}",
                formatter.format_message(&format!(
                    "Deleted {} entries; index now contains {}",
                    before, after
                ))
            );
        }
    }

    Ok(())
}
