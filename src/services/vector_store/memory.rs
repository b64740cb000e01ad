//! In-memory vector store backend.
//!
//! Brute-force cosine search over records held in process memory. Not
//! persistent; used by tests and local experiments where running Qdrant is
//! overkill.

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::VectorStore;
use crate::error::VectorStoreError;
use crate::models::{ChunkRecord, ScoredChunk, VectorStoreConfig};

pub struct MemoryStore {
    collection: String,
    // Insertion order is kept so equal-distance results are stable.
    records: Mutex<Vec<ChunkRecord>>,
}

impl MemoryStore {
    pub fn new(config: &VectorStoreConfig) -> Self {
        Self {
            collection: config.collection.clone(),
            records: Mutex::new(Vec::new()),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new(&VectorStoreConfig::default())
    }
}

fn cosine_distance(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 1.0;
    }
    1.0 - dot / (norm_a * norm_b)
}

#[async_trait]
impl VectorStore for MemoryStore {
    async fn health_check(&self) -> Result<bool, VectorStoreError> {
        Ok(true)
    }

    async fn create_collection(&self) -> Result<(), VectorStoreError> {
        Ok(())
    }

    async fn upsert(&self, records: Vec<ChunkRecord>) -> Result<(), VectorStoreError> {
        let mut stored = self.records.lock().await;
        for record in records {
            if let Some(existing) = stored.iter_mut().find(|r| r.id == record.id) {
                *existing = record;
            } else {
                stored.push(record);
            }
        }
        Ok(())
    }

    async fn query(
        &self,
        embedding: Vec<f32>,
        k: u64,
    ) -> Result<Vec<ScoredChunk>, VectorStoreError> {
        let stored = self.records.lock().await;

        let mut scored: Vec<ScoredChunk> = stored
            .iter()
            .map(|record| ScoredChunk {
                distance: cosine_distance(&embedding, &record.embedding),
                url: Some(record.url.clone()),
                content: Some(record.content.clone()),
            })
            .collect();

        scored.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        scored.truncate(k as usize);

        Ok(scored)
    }

    async fn delete(&self, ids: &[String]) -> Result<(), VectorStoreError> {
        let mut stored = self.records.lock().await;
        stored.retain(|record| !ids.contains(&record.id));
        Ok(())
    }

    async fn clear(&self) -> Result<(), VectorStoreError> {
        self.records.lock().await.clear();
        Ok(())
    }

    async fn count(&self) -> Result<u64, VectorStoreError> {
        Ok(self.records.lock().await.len() as u64)
    }

    fn collection(&self) -> &str {
        &self.collection
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, embedding: Vec<f32>) -> ChunkRecord {
        ChunkRecord {
            id: id.to_string(),
            embedding,
            url: id.to_string(),
            content: format!("content of {id}"),
        }
    }

    #[tokio::test]
    async fn upsert_overwrites_by_id() {
        let store = MemoryStore::default();
        store.upsert(vec![record("a", vec![1.0, 0.0])]).await.unwrap();
        store.upsert(vec![record("a", vec![0.0, 1.0])]).await.unwrap();
        assert_eq!(store.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn query_orders_by_ascending_distance() {
        let store = MemoryStore::default();
        store
            .upsert(vec![
                record("far", vec![0.0, 1.0]),
                record("near", vec![1.0, 0.1]),
            ])
            .await
            .unwrap();

        let results = store.query(vec![1.0, 0.0], 2).await.unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].url.as_deref(), Some("near"));
        assert!(results[0].distance <= results[1].distance);
    }

    #[tokio::test]
    async fn query_on_empty_index_is_empty() {
        let store = MemoryStore::default();
        assert!(store.query(vec![1.0, 0.0], 3).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn query_returns_fewer_than_k_when_sparse() {
        let store = MemoryStore::default();
        store.upsert(vec![record("only", vec![1.0, 0.0])]).await.unwrap();
        let results = store.query(vec![1.0, 0.0], 5).await.unwrap();
        assert_eq!(results.len(), 1);
    }

    #[tokio::test]
    async fn delete_removes_by_id() {
        let store = MemoryStore::default();
        store
            .upsert(vec![record("a", vec![1.0, 0.0]), record("b", vec![0.0, 1.0])])
            .await
            .unwrap();
        store.delete(&["a".to_string()]).await.unwrap();
        assert_eq!(store.count().await.unwrap(), 1);
    }

    #[test]
    fn cosine_distance_of_identical_vectors_is_zero() {
        let d = cosine_distance(&[0.3, 0.4], &[0.3, 0.4]);
        assert!(d.abs() < 1e-6);
    }
}
