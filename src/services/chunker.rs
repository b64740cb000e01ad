//! Token-aware document chunking.
//!
//! Documents are split on exact token boundaries using the same vocabulary
//! the embedding model was trained with, so chunk sizes can be guaranteed to
//! stay under the model's input limit. Window boundaries may fall mid-word or
//! mid-sentence; no semantic splitting is attempted.

use std::path::Path;

use tokenizers::Tokenizer;

use crate::error::IngestError;
use crate::models::Chunk;

/// Splits raw document text into token-bounded chunks.
pub struct Chunker {
    tokenizer: Tokenizer,
    max_tokens: usize,
}

impl Chunker {
    pub fn new(tokenizer: Tokenizer, max_tokens: usize) -> Self {
        Self {
            tokenizer,
            max_tokens,
        }
    }

    /// Load the tokenizer vocabulary from a `tokenizer.json` file.
    pub fn from_file(path: &Path, max_tokens: usize) -> Result<Self, IngestError> {
        let tokenizer = Tokenizer::from_file(path)
            .map_err(|e| IngestError::TokenizerError(e.to_string()))?;
        Ok(Self::new(tokenizer, max_tokens))
    }

    pub fn max_tokens(&self) -> usize {
        self.max_tokens
    }

    /// Number of tokens `text` encodes to.
    pub fn count_tokens(&self, text: &str) -> Result<usize, IngestError> {
        let encoding = self
            .tokenizer
            .encode(text, false)
            .map_err(|e| IngestError::TokenizerError(e.to_string()))?;
        Ok(encoding.get_ids().len())
    }

    /// Split a document into ordered chunks.
    ///
    /// A document that fits in one window is emitted verbatim as a single
    /// chunk with id equal to the url. Larger documents are partitioned into
    /// contiguous, non-overlapping token windows, each decoded back to text
    /// independently, with ids `{url}-part-{i}` in window order. Empty text
    /// yields no chunks.
    pub fn split(&self, url: &str, text: &str) -> Result<Vec<Chunk>, IngestError> {
        if text.is_empty() {
            return Ok(Vec::new());
        }

        let encoding = self
            .tokenizer
            .encode(text, false)
            .map_err(|e| IngestError::TokenizerError(e.to_string()))?;
        let ids = encoding.get_ids();

        if ids.is_empty() {
            return Ok(Vec::new());
        }

        if ids.len() <= self.max_tokens {
            return Ok(vec![Chunk {
                id: Chunk::id_for(url, 0, 1),
                document_url: url.to_string(),
                text: text.to_string(),
                token_count: ids.len(),
            }]);
        }

        let windows: Vec<&[u32]> = ids.chunks(self.max_tokens).collect();
        let total = windows.len();

        windows
            .into_iter()
            .enumerate()
            .map(|(i, window)| {
                let chunk_text = self
                    .tokenizer
                    .decode(window, true)
                    .map_err(|e| IngestError::TokenizerError(e.to_string()))?;
                Ok(Chunk {
                    id: Chunk::id_for(url, i, total),
                    document_url: url.to_string(),
                    text: chunk_text,
                    token_count: window.len(),
                })
            })
            .collect()
    }
}
