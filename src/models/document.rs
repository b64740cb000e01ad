use serde::{Deserialize, Serialize};

/// A corpus entry as read from the ingestion source. `url` is the unique key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub url: String,
    pub text: String,
}

/// A token-bounded slice of a document, ready for embedding and indexing.
///
/// A document that fits within the token limit produces a single chunk whose
/// id equals the document url; larger documents produce `{url}-part-{i}` ids
/// in window order, so re-ingesting the same corpus overwrites rather than
/// duplicates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    pub id: String,
    pub document_url: String,
    pub text: String,
    pub token_count: usize,
}

impl Chunk {
    pub fn id_for(document_url: &str, index: usize, total: usize) -> String {
        if total == 1 {
            document_url.to_string()
        } else {
            format!("{document_url}-part-{index}")
        }
    }
}

/// A chunk paired with its embedding, the unit the vector store persists.
/// Metadata stored alongside the vector is exactly `{url, content}`.
#[derive(Debug, Clone)]
pub struct ChunkRecord {
    pub id: String,
    pub embedding: Vec<f32>,
    pub url: String,
    pub content: String,
}

/// One k-NN candidate returned by the vector store, ordered by ascending
/// distance (lower = more similar).
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredChunk {
    pub distance: f32,
    pub url: Option<String>,
    pub content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_chunk_id_is_the_url() {
        assert_eq!(
            Chunk::id_for("https://example.gov/page", 0, 1),
            "https://example.gov/page"
        );
    }

    #[test]
    fn multi_chunk_ids_are_indexed_parts() {
        assert_eq!(
            Chunk::id_for("https://example.gov/page", 0, 3),
            "https://example.gov/page-part-0"
        );
        assert_eq!(
            Chunk::id_for("https://example.gov/page", 2, 3),
            "https://example.gov/page-part-2"
        );
    }
}
