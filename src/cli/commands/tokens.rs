//! Tokens command: per-document token counts against the model limit.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use super::{load_chunker, parse_documents, read_input};
use crate::cli::output::{TokenRow, get_formatter};
use crate::models::{Config, OutputFormat};

/// Hard input limit of the embedding model (ada-002).
const HARD_TOKEN_LIMIT: usize = 8192;

/// Arguments for the tokens command.
#[derive(Debug, Args)]
pub struct TokensArgs {
    /// Path to a JSON or JSONL file of {url, text} rows (use - for stdin)
    #[arg()]
    pub file: Option<PathBuf>,
}

/// Handle the tokens command.
pub async fn handle_tokens(args: TokensArgs, format: OutputFormat) -> Result<()> {
    let config = Config::load()?;
    let formatter = get_formatter(format);
    let chunker = load_chunker(&config)?;

    let input = read_input(args.file.as_deref())?;
    let documents = parse_documents(&input)?;

    if documents.is_empty() {
        println!("{}", formatter.format_message("No documents found in input."));
        return Ok(());
    }

    let mut rows = Vec::with_capacity(documents.len());
    for document in &documents {
        let tokens = chunker.count_tokens(&document.text)?;
        rows.push(TokenRow {
            url: document.url.clone(),
            tokens,
            over_limit: tokens > HARD_TOKEN_LIMIT,
        });
    }

    // Longest documents are usually the interesting ones
    rows.sort_by(|a, b| b.tokens.cmp(&a.tokens));

    println!("{}", formatter.format_tokens(&rows, HARD_TOKEN_LIMIT));
    Ok(())
}
