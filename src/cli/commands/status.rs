//! Status command implementation.

use anyhow::Result;

use super::connect_store;
use crate::cli::output::{StatusInfo, get_formatter};
use crate::models::{Config, OutputFormat};

/// Handle the status command.
pub async fn handle_status(format: OutputFormat, verbose: bool) -> Result<()> {
    let config = Config::load()?;
    let formatter = get_formatter(format);

    let (connected, points) = match connect_store(&config) {
        Ok(store) => match store.health_check().await {
            Ok(true) => (true, store.count().await.unwrap_or(0)),
            _ => (false, 0),
        },
        Err(_) => (false, 0),
    };

    let status = StatusInfo {
        store_url: config.vector_store.url.clone(),
        store_connected: connected,
        collection: config.vector_store.collection.clone(),
        points,
        provider_key_set: Config::provider_api_key().is_some(),
        serve_key_set: Config::serve_api_key().is_some(),
        tokenizer_configured: config.ingestion.tokenizer_file.is_some(),
    };

    println!("{}", formatter.format_status(&status));

    if verbose {
        if let Some(path) = Config::config_path() {
            println!("Config file: {}", path.display());
        }
        println!("Socket: {}", config.socket_path().display());
    }

    Ok(())
}
