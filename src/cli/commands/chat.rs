//! Chat command implementation: one in-process pipeline run.

use anyhow::Result;
use clap::Args;

use super::build_engine;
use crate::cli::output::get_formatter;
use crate::models::{ChatReply, Config, NOT_FOUND_TEXT, OutputFormat};
use crate::services::ChatOutcome;

/// Arguments for the chat command.
#[derive(Debug, Args)]
pub struct ChatArgs {
    /// The question to ask
    #[arg()]
    pub query: String,

    /// Session id carrying multi-turn context
    #[arg(long, short = 's')]
    pub session: Option<String>,
}

/// Handle the chat command.
pub async fn handle_chat(args: ChatArgs, format: OutputFormat, verbose: bool) -> Result<()> {
    let config = Config::load()?;
    let formatter = get_formatter(format);

    let (engine, _store) = build_engine(&config)?;
    let session = args
        .session
        .unwrap_or_else(|| engine.default_session().to_string());

    let reply = match engine.answer(&args.query, &session).await? {
        ChatOutcome::Answered {
            response,
            source,
            history,
        } => ChatReply {
            response,
            source: Some(source),
            history,
        },
        ChatOutcome::NothingFound => ChatReply {
            response: NOT_FOUND_TEXT.to_string(),
            source: None,
            history: Vec::new(),
        },
    };

    if verbose && !reply.history.is_empty() {
        eprintln!("Session {} now holds {} turns", session, reply.history.len());
    }

    println!("{}", formatter.format_chat(&reply));
    Ok(())
}
