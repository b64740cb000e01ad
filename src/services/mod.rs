mod chat;
mod chunker;
mod embedding;
mod generation;
mod ingest;
mod prompt;
mod retrieval;
mod session;
mod vector_store;

pub use chat::{ChatEngine, ChatOutcome};
pub use chunker::Chunker;
pub use embedding::{EmbeddingProvider, OpenAiEmbedder};
pub use generation::{GenerationProvider, OpenAiGenerator};
pub use ingest::{IngestReport, Ingestor};
pub use prompt::build_prompt;
pub use retrieval::{MISSING_CONTENT, MISSING_SOURCE, select_best};
pub use session::SessionStore;
pub use vector_store::{
    DEFAULT_EMBEDDING_DIM, MemoryStore, QdrantBackend, VectorStore, create_store,
};
