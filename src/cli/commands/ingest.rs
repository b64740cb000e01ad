//! Ingest command implementation.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};

use super::{connect_store, load_chunker, parse_documents, provider_api_key, read_input};
use crate::cli::output::get_formatter;
use crate::models::{Config, OutputFormat};
use crate::services::{IngestReport, Ingestor, OpenAiEmbedder};
use crate::utils::retry::RetryConfig;

/// Arguments for the ingest command.
#[derive(Debug, Args)]
pub struct IngestArgs {
    /// Path to a JSON or JSONL file of {url, text} rows (use - for stdin)
    #[arg()]
    pub file: Option<PathBuf>,

    /// Only validate the input without indexing
    #[arg(long)]
    pub validate_only: bool,
}

/// Handle the ingest command.
pub async fn handle_ingest(args: IngestArgs, format: OutputFormat, verbose: bool) -> Result<()> {
    let config = Config::load()?;
    let formatter = get_formatter(format);

    let input = read_input(args.file.as_deref())?;
    let documents = parse_documents(&input)?;

    if documents.is_empty() {
        println!("{}", formatter.format_message("No documents found in input."));
        return Ok(());
    }

    if verbose || args.validate_only {
        println!("Found {} documents to ingest", documents.len());
    }

    if args.validate_only {
        println!(
            "{}",
            formatter.format_message(&format!(
                "Validation successful: {} documents ready for ingestion",
                documents.len()
            ))
        );
        return Ok(());
    }

    let chunker = load_chunker(&config)?;
    let embedder = OpenAiEmbedder::new(&config.provider, provider_api_key()?)
        .context("failed to build embedding client")?;
    let store = connect_store(&config)?;
    store.create_collection().await?;

    let ingestor = Ingestor::new(
        chunker,
        Arc::new(embedder),
        Arc::clone(&store),
        RetryConfig::new(config.ingestion.max_retries),
    );

    let bar = ProgressBar::new(documents.len() as u64);
    bar.set_style(
        ProgressStyle::with_template("{bar:40} {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );

    let mut report = IngestReport {
        documents: documents.len() as u64,
        ..Default::default()
    };

    for document in &documents {
        bar.set_message(document.url.clone());
        match ingestor.ingest_document(document).await {
            Ok(written) => {
                report.indexed += 1;
                report.chunks_written += written as u64;
            }
            Err(e) => {
                bar.println(format!("warning: skipping {}: {}", document.url, e));
                report.skipped += 1;
                report.failures.push((document.url.clone(), e.to_string()));
            }
        }
        bar.inc(1);
    }
    bar.finish_and_clear();

    println!("{}", formatter.format_ingest_report(&report));

    if verbose {
        let total = store.count().await?;
        println!("Index now contains {} entries", total);
    }

    Ok(())
}
