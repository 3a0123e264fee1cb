//! Vector store: embedded corpus posts with nearest-neighbour search.
//!
//! Distance is **cosine distance** (`1 − cos θ`), so it lies in `[0, 2]`;
//! identical directions are `0`, orthogonal ones `1`. A zero vector has no
//! direction and is treated as orthogonal to everything.

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::RwLock;

use crate::models::post::HistoricalPost;

#[derive(Debug, Error)]
pub enum VectorStoreError {
    #[error("post '{0}' is already in the store")]
    DuplicateId(String),

    #[error("expected a {expected}-dimensional embedding, got {got}")]
    DimensionMismatch { expected: usize, got: usize },
}

/// A nearest-neighbour hit.
#[derive(Debug, Clone)]
pub struct Neighbor {
    pub post: HistoricalPost,
    pub distance: f32,
}

#[async_trait]
pub trait VectorStore: Send + Sync {
    async fn add(&self, post: HistoricalPost, embedding: Vec<f32>)
        -> Result<(), VectorStoreError>;

    /// Posts in insertion order; `Some(ids)` restricts to those ids.
    async fn get(&self, ids: Option<&[String]>) -> Result<Vec<HistoricalPost>, VectorStoreError>;

    /// Up to `k` posts ordered by ascending cosine distance.
    async fn query(&self, embedding: &[f32], k: usize) -> Result<Vec<Neighbor>, VectorStoreError>;

    async fn count(&self) -> Result<usize, VectorStoreError>;

    /// Model id of the embeddings this store holds.
    fn embedding_model(&self) -> &str;
}

struct Entry {
    post: HistoricalPost,
    embedding: Vec<f32>,
}

/// Brute-force in-process store. Readers share the lock; ingestion takes it
/// exclusively only for the append.
pub struct InMemoryVectorStore {
    entries: RwLock<Vec<Entry>>,
    dimension: usize,
    embedding_model: String,
}

impl InMemoryVectorStore {
    pub fn new(dimension: usize, embedding_model: &str) -> Self {
        Self {
            entries: RwLock::new(Vec::new()),
            dimension,
            embedding_model: embedding_model.to_string(),
        }
    }
}

#[async_trait]
impl VectorStore for InMemoryVectorStore {
    async fn add(
        &self,
        post: HistoricalPost,
        embedding: Vec<f32>,
    ) -> Result<(), VectorStoreError> {
        if embedding.len() != self.dimension {
            return Err(VectorStoreError::DimensionMismatch {
                expected: self.dimension,
                got: embedding.len(),
            });
        }

        let mut entries = self.entries.write().await;
        if entries.iter().any(|e| e.post.id == post.id) {
            return Err(VectorStoreError::DuplicateId(post.id));
        }
        entries.push(Entry { post, embedding });
        Ok(())
    }

    async fn get(&self, ids: Option<&[String]>) -> Result<Vec<HistoricalPost>, VectorStoreError> {
        let entries = self.entries.read().await;
        let posts = entries
            .iter()
            .filter(|e| ids.map_or(true, |ids| ids.contains(&e.post.id)))
            .map(|e| e.post.clone())
            .collect();
        Ok(posts)
    }

    async fn query(&self, embedding: &[f32], k: usize) -> Result<Vec<Neighbor>, VectorStoreError> {
        if embedding.len() != self.dimension {
            return Err(VectorStoreError::DimensionMismatch {
                expected: self.dimension,
                got: embedding.len(),
            });
        }

        let entries = self.entries.read().await;
        let mut hits: Vec<Neighbor> = entries
            .iter()
            .map(|e| Neighbor {
                post: e.post.clone(),
                distance: cosine_distance(embedding, &e.embedding),
            })
            .collect();
        drop(entries);

        // Stable: equal distances keep insertion order.
        hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        hits.truncate(k);
        Ok(hits)
    }

    async fn count(&self) -> Result<usize, VectorStoreError> {
        Ok(self.entries.read().await.len())
    }

    fn embedding_model(&self) -> &str {
        &self.embedding_model
    }
}

/// `1 − cos θ`, in `[0, 2]`. Zero-norm inputs give `1.0`.
pub fn cosine_distance(a: &[f32], b: &[f32]) -> f32 {
    let (mut dot, mut norm_a, mut norm_b) = (0.0_f32, 0.0_f32, 0.0_f32);
    for (x, y) in a.iter().zip(b) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }
    if norm_a == 0.0 || norm_b == 0.0 {
        return 1.0;
    }
    let cos = (dot / (norm_a.sqrt() * norm_b.sqrt())).clamp(-1.0, 1.0);
    1.0 - cos
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post(id: &str) -> HistoricalPost {
        HistoricalPost {
            id: id.to_string(),
            text: format!("text of {id}"),
            likes: 1,
            comments: 0,
            shares: 0,
            platform: "instagram".to_string(),
        }
    }

    #[test]
    fn test_cosine_distance_bounds() {
        assert!(cosine_distance(&[1.0, 0.0], &[1.0, 0.0]).abs() < 1e-6);
        assert!((cosine_distance(&[1.0, 0.0], &[0.0, 1.0]) - 1.0).abs() < 1e-6);
        assert!((cosine_distance(&[1.0, 0.0], &[-1.0, 0.0]) - 2.0).abs() < 1e-6);
        assert_eq!(cosine_distance(&[0.0, 0.0], &[1.0, 0.0]), 1.0);
    }

    #[tokio::test]
    async fn test_query_orders_by_distance() {
        let store = InMemoryVectorStore::new(2, "test");
        store.add(post("far"), vec![0.0, 1.0]).await.unwrap();
        store.add(post("near"), vec![1.0, 0.1]).await.unwrap();
        store.add(post("exact"), vec![1.0, 0.0]).await.unwrap();

        let hits = store.query(&[1.0, 0.0], 2).await.unwrap();
        let ids: Vec<_> = hits.iter().map(|h| h.post.id.as_str()).collect();
        assert_eq!(ids, vec!["exact", "near"]);
    }

    #[tokio::test]
    async fn test_query_k_larger_than_store_returns_all() {
        let store = InMemoryVectorStore::new(2, "test");
        store.add(post("a"), vec![1.0, 0.0]).await.unwrap();
        store.add(post("b"), vec![0.0, 1.0]).await.unwrap();
        assert_eq!(store.query(&[1.0, 1.0], 50).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_duplicate_id_rejected() {
        let store = InMemoryVectorStore::new(2, "test");
        store.add(post("a"), vec![1.0, 0.0]).await.unwrap();
        let err = store.add(post("a"), vec![0.0, 1.0]).await.unwrap_err();
        assert!(matches!(err, VectorStoreError::DuplicateId(id) if id == "a"));
        assert_eq!(store.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_dimension_mismatch_rejected() {
        let store = InMemoryVectorStore::new(3, "test");
        assert!(matches!(
            store.add(post("a"), vec![1.0]).await,
            Err(VectorStoreError::DimensionMismatch {
                expected: 3,
                got: 1
            })
        ));
        assert!(store.query(&[1.0, 0.0], 1).await.is_err());
    }

    #[tokio::test]
    async fn test_get_filters_by_ids_in_insertion_order() {
        let store = InMemoryVectorStore::new(2, "test");
        for id in ["a", "b", "c"] {
            store.add(post(id), vec![1.0, 0.0]).await.unwrap();
        }
        let all = store.get(None).await.unwrap();
        assert_eq!(all.len(), 3);

        let wanted = vec!["c".to_string(), "a".to_string()];
        let some = store.get(Some(&wanted)).await.unwrap();
        let ids: Vec<_> = some.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "c"]);
    }
}
