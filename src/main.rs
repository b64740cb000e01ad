use anyhow::Result;
use clap::Parser;
use tokio::signal;

use ragchat::cli::commands::{
    handle_chat, handle_config, handle_index, handle_ingest, handle_serve, handle_status,
    handle_tokens,
};
use ragchat::cli::{Cli, Commands};
use ragchat::models::OutputFormat;

#[tokio::main]
async fn main() -> Result<()> {
    // Provider and serve secrets come from the environment
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let format = cli.format.unwrap_or(OutputFormat::Text);
    let verbose = cli.verbose;

    tokio::select! {
        result = run_command(cli.command, format, verbose) => {
            result?;
        }
        _ = shutdown_signal() => {
            eprintln!("\nReceived shutdown signal, cleaning up...");
            tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;
        }
    }

    Ok(())
}

async fn run_command(command: Commands, format: OutputFormat, verbose: bool) -> Result<()> {
    match command {
        Commands::Status => {
            handle_status(format, verbose).await?;
        }
        Commands::Ingest(args) => {
            handle_ingest(args, format, verbose).await?;
        }
        Commands::Chat(args) => {
            handle_chat(args, format, verbose).await?;
        }
        Commands::Serve(args) => {
            handle_serve(args).await?;
        }
        Commands::Index(cmd) => {
            handle_index(cmd, format).await?;
        }
        Commands::Tokens(args) => {
            handle_tokens(args, format).await?;
        }
        Commands::Config(cmd) => {
            handle_config(cmd, format)?;
        }
    }

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
