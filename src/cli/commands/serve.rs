//! Serve command implementation.

use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

use super::build_engine;
use crate::models::{Config, SERVE_KEY_ENV};
use crate::server::ChatServer;

/// Arguments for the serve command.
#[derive(Debug, Args)]
pub struct ServeArgs {
    /// Socket path to listen on (overrides configuration)
    #[arg(long)]
    pub socket: Option<PathBuf>,
}

/// Handle the serve command.
pub async fn handle_serve(args: ServeArgs) -> Result<()> {
    let config = Config::load()?;

    let api_key = Config::serve_api_key();
    if api_key.is_none() {
        eprintln!(
            "Warning: {} is not set; chat requests will be rejected",
            SERVE_KEY_ENV
        );
    }

    let (engine, store) = build_engine(&config)?;
    let socket_path = args.socket.unwrap_or_else(|| config.socket_path());

    let server = std::sync::Arc::new(ChatServer::new(engine, store, api_key, socket_path));
    server.run().await?;

    Ok(())
}
