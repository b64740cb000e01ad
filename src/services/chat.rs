//! The query pipeline: embed, retrieve, select, prompt, generate, record.

use std::sync::Arc;

use crate::error::ChatError;
use crate::models::{ChatConfig, Turn};
use crate::services::embedding::EmbeddingProvider;
use crate::services::generation::GenerationProvider;
use crate::services::prompt::build_prompt;
use crate::services::retrieval::select_best;
use crate::services::session::SessionStore;
use crate::services::vector_store::VectorStore;

/// Result of a successful pipeline run.
#[derive(Debug, Clone, PartialEq)]
pub enum ChatOutcome {
    /// A grounded response was generated and the turn recorded.
    Answered {
        response: String,
        source: String,
        history: Vec<Turn>,
    },
    /// Retrieval produced no candidates (or none within the relevance
    /// cutoff). No turn is recorded.
    NothingFound,
}

/// Sequences one chat request through the pipeline.
///
/// Session memory is mutated exactly once, after generation succeeds; any
/// failure along the way propagates out with the session untouched, so a
/// recorded turn always corresponds to a delivered answer.
pub struct ChatEngine {
    embedder: Arc<dyn EmbeddingProvider>,
    store: Arc<dyn VectorStore>,
    generator: Arc<dyn GenerationProvider>,
    sessions: SessionStore,
    config: ChatConfig,
    max_output_tokens: u32,
}

impl ChatEngine {
    pub fn new(
        embedder: Arc<dyn EmbeddingProvider>,
        store: Arc<dyn VectorStore>,
        generator: Arc<dyn GenerationProvider>,
        config: ChatConfig,
        max_output_tokens: u32,
    ) -> Self {
        Self {
            embedder,
            store,
            generator,
            sessions: SessionStore::new(),
            config,
            max_output_tokens,
        }
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    pub fn default_session(&self) -> &str {
        &self.config.default_session
    }

    /// Run the full pipeline for one request.
    pub async fn answer(&self, query: &str, session_id: &str) -> Result<ChatOutcome, ChatError> {
        if query.trim().is_empty() {
            return Err(ChatError::EmptyQuery);
        }

        let history = self.sessions.history(session_id).await;

        let embedding = self.embedder.embed(query).await?;
        let candidates = self.store.query(embedding, self.config.top_k).await?;

        let Some(retrieved) = select_best(&candidates, self.config.max_distance) else {
            return Ok(ChatOutcome::NothingFound);
        };

        let prompt_history = match self.config.max_history_turns {
            Some(n) => &history[history.len().saturating_sub(n)..],
            None => &history[..],
        };

        let prompt = build_prompt(prompt_history, query, &retrieved.content, &retrieved.source_url);
        let response = self.generator.generate(&prompt, self.max_output_tokens).await?;

        let updated = self
            .sessions
            .record(session_id, Turn::new(query, response.clone()))
            .await;

        Ok(ChatOutcome::Answered {
            response,
            source: retrieved.source_url,
            history: updated,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    use async_trait::async_trait;
    use tokio::sync::Mutex;

    use crate::error::{EmbeddingError, GenerationError, VectorStoreError};
    use crate::models::{ChunkRecord, ScoredChunk};
    use crate::services::vector_store::MemoryStore;

    struct CountingEmbedder {
        calls: AtomicU32,
    }

    impl CountingEmbedder {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicU32::new(0),
            })
        }
    }

    #[async_trait]
    impl EmbeddingProvider for CountingEmbedder {
        async fn embed(&self, _text: &str) -> Result<Vec<f32>, EmbeddingError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(vec![1.0, 0.0, 0.0])
        }
    }

    /// Returns the same preset candidates for any query vector.
    struct FixedStore {
        candidates: Vec<ScoredChunk>,
    }

    #[async_trait]
    impl VectorStore for FixedStore {
        async fn health_check(&self) -> Result<bool, VectorStoreError> {
            Ok(true)
        }
        async fn create_collection(&self) -> Result<(), VectorStoreError> {
            Ok(())
        }
        async fn upsert(&self, _records: Vec<ChunkRecord>) -> Result<(), VectorStoreError> {
            Ok(())
        }
        async fn query(
            &self,
            _embedding: Vec<f32>,
            _k: u64,
        ) -> Result<Vec<ScoredChunk>, VectorStoreError> {
            Ok(self.candidates.clone())
        }
        async fn delete(&self, _ids: &[String]) -> Result<(), VectorStoreError> {
            Ok(())
        }
        async fn clear(&self) -> Result<(), VectorStoreError> {
            Ok(())
        }
        async fn count(&self) -> Result<u64, VectorStoreError> {
            Ok(self.candidates.len() as u64)
        }
        fn collection(&self) -> &str {
            "test"
        }
    }

    /// Echoes a canned reply and captures the prompt it was given.
    struct RecordingGenerator {
        reply: String,
        fail: bool,
        calls: AtomicU32,
        last_prompt: Mutex<Option<String>>,
    }

    impl RecordingGenerator {
        fn replying(reply: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: reply.to_string(),
                fail: false,
                calls: AtomicU32::new(0),
                last_prompt: Mutex::new(None),
            })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self {
                reply: String::new(),
                fail: true,
                calls: AtomicU32::new(0),
                last_prompt: Mutex::new(None),
            })
        }
    }

    #[async_trait]
    impl GenerationProvider for RecordingGenerator {
        async fn generate(
            &self,
            prompt: &str,
            _max_tokens: u32,
        ) -> Result<String, GenerationError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_prompt.lock().await = Some(prompt.to_string());
            if self.fail {
                return Err(GenerationError::ProviderError("status 500: boom".to_string()));
            }
            Ok(self.reply.clone())
        }
    }

    fn fafsa_store() -> Arc<FixedStore> {
        Arc::new(FixedStore {
            candidates: vec![ScoredChunk {
                distance: 0.12,
                url: Some("https://fafsa.gov".to_string()),
                content: Some("Visit fafsa.gov to start...".to_string()),
            }],
        })
    }

    fn engine(
        embedder: Arc<dyn EmbeddingProvider>,
        store: Arc<dyn VectorStore>,
        generator: Arc<dyn GenerationProvider>,
        config: ChatConfig,
    ) -> ChatEngine {
        ChatEngine::new(embedder, store, generator, config, 200)
    }

    #[tokio::test]
    async fn grounded_answer_carries_source_and_prompt_context() {
        let generator = RecordingGenerator::replying("Head to fafsa.gov and apply!");
        let engine = engine(
            CountingEmbedder::new(),
            fafsa_store(),
            Arc::clone(&generator) as Arc<dyn GenerationProvider>,
            ChatConfig::default(),
        );

        let outcome = engine
            .answer("How do I apply for FAFSA?", "default")
            .await
            .unwrap();

        let ChatOutcome::Answered {
            response,
            source,
            history,
        } = outcome
        else {
            panic!("expected an answer");
        };

        assert_eq!(response, "Head to fafsa.gov and apply!");
        assert_eq!(source, "https://fafsa.gov");
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].user, "How do I apply for FAFSA?");

        let prompt = generator.last_prompt.lock().await.clone().unwrap();
        assert!(prompt.contains("How do I apply for FAFSA?"));
        assert!(prompt.contains("Visit fafsa.gov to start..."));
    }

    #[tokio::test]
    async fn empty_index_means_nothing_found_and_no_turn() {
        let generator = RecordingGenerator::replying("unused");
        let store = Arc::new(MemoryStore::default());
        let engine = engine(
            CountingEmbedder::new(),
            store,
            Arc::clone(&generator) as Arc<dyn GenerationProvider>,
            ChatConfig::default(),
        );

        let outcome = engine.answer("anything", "default").await.unwrap();

        assert_eq!(outcome, ChatOutcome::NothingFound);
        assert_eq!(generator.calls.load(Ordering::SeqCst), 0);
        assert!(engine.sessions().history("default").await.is_empty());
    }

    #[tokio::test]
    async fn two_queries_build_ordered_history() {
        let generator = RecordingGenerator::replying("answer");
        let engine = engine(
            CountingEmbedder::new(),
            fafsa_store(),
            generator,
            ChatConfig::default(),
        );

        engine.answer("Q1", "s").await.unwrap();
        let outcome = engine.answer("Q2", "s").await.unwrap();

        let ChatOutcome::Answered { history, .. } = outcome else {
            panic!("expected an answer");
        };
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].user, "Q1");
        assert_eq!(history[1].user, "Q2");
    }

    #[tokio::test]
    async fn generation_failure_leaves_session_untouched() {
        let engine = engine(
            CountingEmbedder::new(),
            fafsa_store(),
            RecordingGenerator::failing(),
            ChatConfig::default(),
        );

        let result = engine.answer("Q1", "s").await;

        assert!(matches!(result, Err(ChatError::Generation(_))));
        assert!(engine.sessions().history("s").await.is_empty());
    }

    #[tokio::test]
    async fn empty_query_is_rejected_before_any_provider_call() {
        let embedder = CountingEmbedder::new();
        let engine = engine(
            Arc::clone(&embedder) as Arc<dyn EmbeddingProvider>,
            fafsa_store(),
            RecordingGenerator::replying("unused"),
            ChatConfig::default(),
        );

        let result = engine.answer("   ", "s").await;

        assert!(matches!(result, Err(ChatError::EmptyQuery)));
        assert_eq!(embedder.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn distance_cutoff_turns_poor_matches_into_nothing_found() {
        let store = Arc::new(FixedStore {
            candidates: vec![ScoredChunk {
                distance: 0.9,
                url: Some("https://far.gov".to_string()),
                content: Some("irrelevant".to_string()),
            }],
        });
        let config = ChatConfig {
            max_distance: Some(0.5),
            ..Default::default()
        };
        let engine = engine(
            CountingEmbedder::new(),
            store,
            RecordingGenerator::replying("unused"),
            config,
        );

        let outcome = engine.answer("query", "s").await.unwrap();
        assert_eq!(outcome, ChatOutcome::NothingFound);
    }

    #[tokio::test]
    async fn history_cap_limits_the_prompt_but_not_the_store() {
        let generator = RecordingGenerator::replying("answer");
        let config = ChatConfig {
            max_history_turns: Some(1),
            ..Default::default()
        };
        let engine = engine(
            CountingEmbedder::new(),
            fafsa_store(),
            Arc::clone(&generator) as Arc<dyn GenerationProvider>,
            config,
        );

        engine.answer("oldest question", "s").await.unwrap();
        engine.answer("recent question", "s").await.unwrap();
        engine.answer("current question", "s").await.unwrap();

        let prompt = generator.last_prompt.lock().await.clone().unwrap();
        assert!(prompt.contains("User: recent question"));
        assert!(!prompt.contains("User: oldest question"));
        // Stored history keeps everything
        assert_eq!(engine.sessions().history("s").await.len(), 3);
    }
}
