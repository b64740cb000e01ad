//! Qdrant vector store backend.

use async_trait::async_trait;
use qdrant_client::Qdrant;
use qdrant_client::qdrant::{
    CreateCollectionBuilder, DeletePointsBuilder, Distance, PointId, PointStruct,
    PointsIdsList, SearchPointsBuilder, UpsertPointsBuilder, VectorParamsBuilder,
};
use std::collections::HashMap;
use uuid::Uuid;

use super::{CollectionInfo, VectorStore};
use crate::error::VectorStoreError;
use crate::models::{ChunkRecord, ScoredChunk, VectorStoreConfig};

/// Qdrant backend using cosine distance.
///
/// Qdrant point ids must be UUIDs or integers, so the chunk id (a url or
/// `url-part-i`) is mapped to a deterministic UUIDv5 and kept verbatim in the
/// payload. The mapping preserves upsert idempotence: the same chunk id
/// always lands on the same point.
pub struct QdrantBackend {
    client: Qdrant,
    collection: String,
    embedding_dim: u64,
}

impl QdrantBackend {
    pub fn new(config: &VectorStoreConfig, embedding_dim: u64) -> Result<Self, VectorStoreError> {
        let mut builder = Qdrant::from_url(&config.url);

        if let Some(ref api_key) = config.api_key {
            builder = builder.api_key(api_key.clone());
        }

        let client = builder
            .build()
            .map_err(|e| VectorStoreError::ConnectionError(e.to_string()))?;

        Ok(Self {
            client,
            collection: config.collection.clone(),
            embedding_dim,
        })
    }

    fn point_id(chunk_id: &str) -> String {
        Uuid::new_v5(&Uuid::NAMESPACE_URL, chunk_id.as_bytes()).to_string()
    }

    async fn get_collection_info(&self) -> Result<Option<CollectionInfo>, VectorStoreError> {
        match self.client.collection_info(&self.collection).await {
            Ok(info) => Ok(Some(CollectionInfo {
                points_count: info.result.map_or(0, |r| r.points_count.unwrap_or(0)),
            })),
            Err(e) => {
                let msg = e.to_string();
                if msg.contains("not found") || msg.contains("doesn't exist") {
                    Ok(None)
                } else {
                    Err(VectorStoreError::CollectionError(msg))
                }
            }
        }
    }
}

#[async_trait]
impl VectorStore for QdrantBackend {
    async fn health_check(&self) -> Result<bool, VectorStoreError> {
        self.client
            .health_check()
            .await
            .map(|_| true)
            .map_err(|e| VectorStoreError::ConnectionError(e.to_string()))
    }

    async fn create_collection(&self) -> Result<(), VectorStoreError> {
        if self.get_collection_info().await?.is_some() {
            return Ok(());
        }

        let create_collection = CreateCollectionBuilder::new(&self.collection).vectors_config(
            VectorParamsBuilder::new(self.embedding_dim, Distance::Cosine),
        );

        self.client
            .create_collection(create_collection)
            .await
            .map_err(|e| VectorStoreError::CollectionError(e.to_string()))?;

        Ok(())
    }

    async fn upsert(&self, records: Vec<ChunkRecord>) -> Result<(), VectorStoreError> {
        if records.is_empty() {
            return Ok(());
        }

        let points: Vec<PointStruct> = records
            .into_iter()
            .map(|record| {
                let mut payload: HashMap<String, qdrant_client::qdrant::Value> = HashMap::new();
                payload.insert("id".to_string(), record.id.clone().into());
                payload.insert("url".to_string(), record.url.into());
                payload.insert("content".to_string(), record.content.into());

                PointStruct::new(Self::point_id(&record.id), record.embedding, payload)
            })
            .collect();

        let upsert = UpsertPointsBuilder::new(&self.collection, points);

        self.client
            .upsert_points(upsert)
            .await
            .map_err(|e| VectorStoreError::UpsertError(e.to_string()))?;

        Ok(())
    }

    async fn query(
        &self,
        embedding: Vec<f32>,
        k: u64,
    ) -> Result<Vec<ScoredChunk>, VectorStoreError> {
        let search =
            SearchPointsBuilder::new(&self.collection, embedding, k).with_payload(true);

        let results = self
            .client
            .search_points(search)
            .await
            .map_err(|e| VectorStoreError::SearchError(e.to_string()))?;

        // Qdrant orders by descending cosine similarity, which is ascending
        // cosine distance; preserve the order.
        let scored = results
            .result
            .into_iter()
            .map(|point| {
                let payload = point.payload;

                let url = payload.get("url").and_then(|v| match &v.kind {
                    Some(qdrant_client::qdrant::value::Kind::StringValue(s)) => Some(s.clone()),
                    _ => None,
                });

                let content = payload.get("content").and_then(|v| match &v.kind {
                    Some(qdrant_client::qdrant::value::Kind::StringValue(s)) => Some(s.clone()),
                    _ => None,
                });

                ScoredChunk {
                    distance: 1.0 - point.score,
                    url,
                    content,
                }
            })
            .collect();

        Ok(scored)
    }

    async fn delete(&self, ids: &[String]) -> Result<(), VectorStoreError> {
        if ids.is_empty() {
            return Ok(());
        }

        let point_ids: Vec<PointId> = ids
            .iter()
            .map(|id| PointId::from(Self::point_id(id)))
            .collect();

        let delete = DeletePointsBuilder::new(&self.collection)
            .points(PointsIdsList { ids: point_ids });

        self.client
            .delete_points(delete)
            .await
            .map_err(|e| VectorStoreError::DeleteError(e.to_string()))?;

        Ok(())
    }

    async fn clear(&self) -> Result<(), VectorStoreError> {
        if self.get_collection_info().await?.is_none() {
            return Ok(());
        }

        self.client
            .delete_collection(&self.collection)
            .await
            .map_err(|e| VectorStoreError::DeleteError(e.to_string()))?;

        self.create_collection().await?;

        Ok(())
    }

    async fn count(&self) -> Result<u64, VectorStoreError> {
        Ok(self
            .get_collection_info()
            .await?
            .map_or(0, |info| info.points_count))
    }

    fn collection(&self) -> &str {
        &self.collection
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn point_ids_are_deterministic() {
        let a = QdrantBackend::point_id("https://fafsa.gov-part-0");
        let b = QdrantBackend::point_id("https://fafsa.gov-part-0");
        let c = QdrantBackend::point_id("https://fafsa.gov-part-1");
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
