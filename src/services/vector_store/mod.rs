//! Vector store abstraction layer.
//!
//! A trait-based abstraction over vector index backends. Qdrant is the
//! persistent backend; an in-memory backend backs tests and local
//! experiments without infrastructure.

mod memory;
mod qdrant;

pub use memory::MemoryStore;
pub use qdrant::QdrantBackend;

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::VectorStoreError;
use crate::models::{ChunkRecord, ScoredChunk, VectorStoreConfig};

/// Embedding dimension for text-embedding-ada-002 vectors.
pub const DEFAULT_EMBEDDING_DIM: u64 = 1536;

/// Collection information.
#[derive(Debug, Clone)]
pub struct CollectionInfo {
    pub points_count: u64,
}

/// Abstract trait for vector index operations.
///
/// Upserts are idempotent per chunk id: re-writing an existing id overwrites
/// the entry, never duplicates it. Queries return candidates ordered by
/// ascending distance under the backend's fixed metric (cosine for Qdrant);
/// the metric and dimension are configuration invariants, not inferred at
/// runtime.
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Check if the vector store is healthy and accessible.
    async fn health_check(&self) -> Result<bool, VectorStoreError>;

    /// Create the collection if it doesn't exist.
    async fn create_collection(&self) -> Result<(), VectorStoreError>;

    /// Insert or overwrite chunk records, keyed by chunk id.
    async fn upsert(&self, records: Vec<ChunkRecord>) -> Result<(), VectorStoreError>;

    /// k-nearest-neighbor search, ascending by distance. Returns fewer than
    /// `k` entries when the index holds fewer; empty when the index is empty.
    async fn query(
        &self,
        embedding: Vec<f32>,
        k: u64,
    ) -> Result<Vec<ScoredChunk>, VectorStoreError>;

    /// Remove entries by chunk id.
    async fn delete(&self, ids: &[String]) -> Result<(), VectorStoreError>;

    /// Remove every entry from the collection.
    async fn clear(&self) -> Result<(), VectorStoreError>;

    /// Total live entries.
    async fn count(&self) -> Result<u64, VectorStoreError>;

    /// Collection name.
    fn collection(&self) -> &str;
}

/// Create the configured persistent backend.
pub fn create_store(
    config: &VectorStoreConfig,
    embedding_dim: u64,
) -> Result<Arc<dyn VectorStore>, VectorStoreError> {
    let backend = QdrantBackend::new(config, embedding_dim)?;
    Ok(Arc::new(backend))
}
