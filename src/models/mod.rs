mod chat;
mod config;
mod document;

pub use chat::{APOLOGY_TEXT, ChatReply, ChatRequest, NOT_FOUND_TEXT, Retrieved, Turn};
pub use config::{
    ChatConfig, Config, DEFAULT_COLLECTION, DEFAULT_OPENAI_URL, DEFAULT_QDRANT_URL,
    IngestionConfig, PROVIDER_KEY_ENV, ProviderConfig, SERVE_KEY_ENV, ServeConfig,
    VectorStoreConfig,
};
pub use document::{Chunk, ChunkRecord, Document, ScoredChunk};

use serde::{Deserialize, Serialize};

/// Output format for CLI results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable text format
    #[default]
    Text,
    /// Machine-parseable JSON format
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("unknown output format: {}", s)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}
