//! CLI module for ragchat.

pub mod commands;
pub mod output;

use clap::{Parser, Subcommand};

use crate::models::OutputFormat;

/// Retrieval-grounded chatbot over a vector-indexed document corpus.
#[derive(Debug, Parser)]
#[command(name = "ragchat")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[arg(long, short = 'f', global = true, help = "Output format: text or json")]
    pub format: Option<OutputFormat>,

    #[arg(long, short = 'v', global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Check infrastructure status (provider keys, vector store)
    Status,

    /// Ingest {url, text} documents from a JSON/JSONL file into the index
    Ingest(commands::IngestArgs),

    /// Ask a question through the full retrieval pipeline
    Chat(commands::ChatArgs),

    /// Run the chat server on a Unix socket
    Serve(commands::ServeArgs),

    /// Inspect or clear the vector index
    #[command(subcommand)]
    Index(commands::IndexCommand),

    /// Report per-document token counts
    Tokens(commands::TokensArgs),

    /// Manage configuration
    #[command(subcommand)]
    Config(commands::ConfigCommand),
}
