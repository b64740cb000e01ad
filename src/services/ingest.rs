//! Corpus ingestion: chunk, embed, upsert.

use std::sync::Arc;

use crate::error::IngestError;
use crate::models::{ChunkRecord, Document};
use crate::services::chunker::Chunker;
use crate::services::embedding::EmbeddingProvider;
use crate::services::vector_store::VectorStore;
use crate::utils::retry::{RetryConfig, with_retry};

/// Outcome of one ingestion run.
#[derive(Debug, Default)]
pub struct IngestReport {
    pub documents: u64,
    pub indexed: u64,
    pub skipped: u64,
    pub chunks_written: u64,
    /// Per-document failures: (url, error message).
    pub failures: Vec<(String, String)>,
}

/// Sequences documents through chunking, embedding, and indexing.
///
/// Each chunk is embedded with one provider call and upserted with
/// `{url, content}` metadata. Upserts are keyed by chunk id, so re-running
/// over an already-ingested corpus overwrites entries without growing the
/// index. A failing document is retried on transient errors, then skipped;
/// it never aborts the batch.
pub struct Ingestor {
    chunker: Chunker,
    embedder: Arc<dyn EmbeddingProvider>,
    store: Arc<dyn VectorStore>,
    retry: RetryConfig,
}

impl Ingestor {
    pub fn new(
        chunker: Chunker,
        embedder: Arc<dyn EmbeddingProvider>,
        store: Arc<dyn VectorStore>,
        retry: RetryConfig,
    ) -> Self {
        Self {
            chunker,
            embedder,
            store,
            retry,
        }
    }

    /// Ingest a single document. Returns the number of chunks written.
    pub async fn ingest_document(&self, document: &Document) -> Result<usize, IngestError> {
        let chunks = self.chunker.split(&document.url, &document.text)?;
        let written = chunks.len();

        for chunk in chunks {
            let embedding =
                with_retry(&self.retry, || self.embedder.embed(&chunk.text)).await?;

            self.store
                .upsert(vec![ChunkRecord {
                    id: chunk.id,
                    embedding,
                    url: chunk.document_url,
                    content: chunk.text,
                }])
                .await?;
        }

        Ok(written)
    }

    /// Ingest a batch, skipping documents that fail.
    pub async fn run(&self, documents: &[Document]) -> IngestReport {
        let mut report = IngestReport {
            documents: documents.len() as u64,
            ..Default::default()
        };

        for document in documents {
            match self.ingest_document(document).await {
                Ok(written) => {
                    report.indexed += 1;
                    report.chunks_written += written as u64;
                }
                Err(e) => {
                    eprintln!("warning: skipping {}: {}", document.url, e);
                    report.skipped += 1;
                    report.failures.push((document.url.clone(), e.to_string()));
                }
            }
        }

        report
    }
}
