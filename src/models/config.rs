use std::path::PathBuf;

use serde::{Deserialize, Serialize};

pub const DEFAULT_OPENAI_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_QDRANT_URL: &str = "http://localhost:6334";
pub const DEFAULT_COLLECTION: &str = "ragchat";

/// Environment variable holding the generation/embedding provider key.
pub const PROVIDER_KEY_ENV: &str = "OPENAI_API_KEY";
/// Environment variable holding the shared secret for the serve endpoint.
pub const SERVE_KEY_ENV: &str = "RAGCHAT_API_KEY";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub provider: ProviderConfig,

    #[serde(default)]
    pub vector_store: VectorStoreConfig,

    #[serde(default)]
    pub ingestion: IngestionConfig,

    #[serde(default)]
    pub chat: ChatConfig,

    #[serde(default)]
    pub serve: ServeConfig,
}

impl Config {
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("ragchat").join("config.toml"))
    }

    pub fn load() -> Result<Self, crate::error::ConfigError> {
        if let Some(path) = Self::config_path()
            && path.exists()
        {
            let content = std::fs::read_to_string(&path)?;
            let config: Config = toml::from_str(&content)?;
            return Ok(config);
        }
        Ok(Self::default())
    }

    pub fn save(&self) -> Result<(), crate::error::ConfigError> {
        let path = Self::config_path().ok_or_else(|| {
            crate::error::ConfigError::PathError("could not determine config directory".to_string())
        })?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(&path, content)?;
        Ok(())
    }

    /// Socket the serve command listens on.
    pub fn socket_path(&self) -> PathBuf {
        if let Some(ref path) = self.serve.socket_path {
            return path.clone();
        }
        dirs::runtime_dir()
            .unwrap_or_else(std::env::temp_dir)
            .join("ragchat.sock")
    }

    /// Provider API key, read from the environment only. Secrets never live
    /// in the config file.
    pub fn provider_api_key() -> Option<String> {
        std::env::var(PROVIDER_KEY_ENV).ok().filter(|k| !k.is_empty())
    }

    /// Shared secret callers must present to the serve endpoint.
    pub fn serve_api_key() -> Option<String> {
        std::env::var(SERVE_KEY_ENV).ok().filter(|k| !k.is_empty())
    }
}

/// Configuration for the OpenAI-compatible embedding and generation provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    #[serde(default = "default_openai_url")]
    pub base_url: String,

    #[serde(default = "default_embedding_model")]
    pub embedding_model: String,

    #[serde(default = "default_chat_model")]
    pub chat_model: String,

    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: u32,
}

fn default_openai_url() -> String {
    DEFAULT_OPENAI_URL.to_string()
}

fn default_embedding_model() -> String {
    "text-embedding-ada-002".to_string()
}

fn default_chat_model() -> String {
    "gpt-4".to_string()
}

fn default_timeout() -> u64 {
    60
}

fn default_max_output_tokens() -> u32 {
    200
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: default_openai_url(),
            embedding_model: default_embedding_model(),
            chat_model: default_chat_model(),
            timeout_secs: default_timeout(),
            max_output_tokens: default_max_output_tokens(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorStoreConfig {
    #[serde(default = "default_qdrant_url")]
    pub url: String,

    #[serde(default = "default_collection")]
    pub collection: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

fn default_qdrant_url() -> String {
    DEFAULT_QDRANT_URL.to_string()
}

fn default_collection() -> String {
    DEFAULT_COLLECTION.to_string()
}

impl Default for VectorStoreConfig {
    fn default() -> Self {
        Self {
            url: default_qdrant_url(),
            collection: default_collection(),
            api_key: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestionConfig {
    /// Upper bound on tokens per chunk. Kept below the embedding model's hard
    /// input limit (8192 for ada-002) with headroom.
    #[serde(default = "default_max_tokens_per_chunk")]
    pub max_tokens_per_chunk: usize,

    /// Tokenizer vocabulary file. Must match the embedding model's training
    /// tokenizer; a mismatch silently produces wrong token counts.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tokenizer_file: Option<PathBuf>,

    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

fn default_max_tokens_per_chunk() -> usize {
    7000
}

fn default_max_retries() -> u32 {
    3
}

impl Default for IngestionConfig {
    fn default() -> Self {
        Self {
            max_tokens_per_chunk: default_max_tokens_per_chunk(),
            tokenizer_file: None,
            max_retries: default_max_retries(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    /// Candidates to retrieve per query; the selector keeps only the closest.
    #[serde(default = "default_top_k")]
    pub top_k: u64,

    #[serde(default = "default_session_id")]
    pub default_session: String,

    /// Cap on how many recent turns the prompt includes. `None` sends the
    /// full session history.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_history_turns: Option<usize>,

    /// Optional relevance cutoff: matches farther than this are treated as
    /// not found. `None` always answers from the closest match.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_distance: Option<f32>,
}

fn default_top_k() -> u64 {
    3
}

fn default_session_id() -> String {
    "default".to_string()
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            top_k: default_top_k(),
            default_session: default_session_id(),
            max_history_turns: None,
            max_distance: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ServeConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub socket_path: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_production_values() {
        let config = Config::default();
        assert_eq!(config.ingestion.max_tokens_per_chunk, 7000);
        assert_eq!(config.chat.top_k, 3);
        assert_eq!(config.chat.default_session, "default");
        assert_eq!(config.provider.max_output_tokens, 200);
        assert!(config.chat.max_distance.is_none());
        assert!(config.chat.max_history_turns.is_none());
    }

    #[test]
    fn round_trips_through_toml() {
        let config = Config::default();
        let text = toml::to_string_pretty(&config).unwrap();
        let parsed: Config = toml::from_str(&text).unwrap();
        assert_eq!(parsed.vector_store.collection, DEFAULT_COLLECTION);
        assert_eq!(parsed.provider.chat_model, "gpt-4");
    }

    #[test]
    fn partial_file_fills_defaults() {
        let parsed: Config = toml::from_str("[chat]\ntop_k = 5\n").unwrap();
        assert_eq!(parsed.chat.top_k, 5);
        assert_eq!(parsed.ingestion.max_tokens_per_chunk, 7000);
    }
}
