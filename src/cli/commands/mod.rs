//! Command handler implementations.

mod chat;
mod config;
mod index;
mod ingest;
mod serve;
mod status;
mod tokens;

pub use chat::{ChatArgs, handle_chat};
pub use config::{ConfigCommand, handle_config};
pub use index::{IndexCommand, handle_index};
pub use ingest::{IngestArgs, handle_ingest};
pub use serve::{ServeArgs, handle_serve};
pub use status::handle_status;
pub use tokens::{TokensArgs, handle_tokens};

use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, bail};

use crate::models::{Config, Document, PROVIDER_KEY_ENV};
use crate::services::{
    ChatEngine, Chunker, DEFAULT_EMBEDDING_DIM, OpenAiEmbedder, OpenAiGenerator, VectorStore,
    create_store,
};

/// Read an input file, or stdin when the path is `-` or absent.
pub(crate) fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(p) if p.as_os_str() != "-" => {
            std::fs::read_to_string(p).with_context(|| format!("failed to read {}", p.display()))
        }
        _ => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("failed to read stdin")?;
            Ok(buffer)
        }
    }
}

/// Parse documents from a JSON array or JSONL input.
pub(crate) fn parse_documents(input: &str) -> Result<Vec<Document>> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }

    if trimmed.starts_with('[') {
        return serde_json::from_str(trimmed).context("failed to parse JSON document array");
    }

    trimmed
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| serde_json::from_str(line).context("failed to parse JSONL document"))
        .collect()
}

/// Tokenizer-backed chunker from configuration. The tokenizer file must
/// match the embedding model's vocabulary; there is no runtime check.
pub(crate) fn load_chunker(config: &Config) -> Result<Chunker> {
    let Some(ref path) = config.ingestion.tokenizer_file else {
        bail!(
            "no tokenizer configured; set ingestion.tokenizer_file in {} to a tokenizer.json \
             matching the embedding model",
            Config::config_path()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "the config file".to_string())
        );
    };
    Chunker::from_file(path, config.ingestion.max_tokens_per_chunk)
        .with_context(|| format!("failed to load tokenizer from {}", path.display()))
}

pub(crate) fn provider_api_key() -> Result<String> {
    Config::provider_api_key()
        .with_context(|| format!("{} is not set", PROVIDER_KEY_ENV))
}

/// Connect to the configured vector store.
pub(crate) fn connect_store(config: &Config) -> Result<Arc<dyn VectorStore>> {
    let store = create_store(&config.vector_store, DEFAULT_EMBEDDING_DIM)
        .context("failed to connect to vector store")?;
    Ok(store)
}

/// Assemble the full query pipeline from configuration.
pub(crate) fn build_engine(config: &Config) -> Result<(Arc<ChatEngine>, Arc<dyn VectorStore>)> {
    let api_key = provider_api_key()?;
    let embedder = OpenAiEmbedder::new(&config.provider, api_key.clone())
        .context("failed to build embedding client")?;
    let generator = OpenAiGenerator::new(&config.provider, api_key)
        .context("failed to build generation client")?;
    let store = connect_store(config)?;

    let engine = ChatEngine::new(
        Arc::new(embedder),
        Arc::clone(&store),
        Arc::new(generator),
        config.chat.clone(),
        config.provider.max_output_tokens,
    );

    Ok((Arc::new(engine), store))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_json_array() {
        let input = r#"[{"url": "https://a.gov", "text": "alpha"}]"#;
        let docs = parse_documents(input).unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].url, "https://a.gov");
    }

    #[test]
    fn parses_jsonl() {
        let input = "{\"url\": \"https://a.gov\", \"text\": \"alpha\"}\n\
                     {\"url\": \"https://b.gov\", \"text\": \"bravo\"}\n";
        let docs = parse_documents(input).unwrap();
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[1].text, "bravo");
    }

    #[test]
    fn empty_input_is_no_documents() {
        assert!(parse_documents("   \n").unwrap().is_empty());
    }

    #[test]
    fn malformed_input_is_an_error() {
        assert!(parse_documents("{not json}").is_err());
    }
}
