//! Corpus — the historical posts, their embeddings, and retrieval over them.
//!
//! Pairs one `Embedder` with one `VectorStore` and refuses to pair them when
//! their embedding models differ: mixed models make distances meaningless.

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info};

use crate::models::post::HistoricalPost;
use crate::resonance::embedding::{Embedder, EmbeddingError};
use crate::resonance::ranking::{rank_neighbors, RankedPost, ResonanceWeights};
use crate::resonance::vector_store::{VectorStore, VectorStoreError};

#[derive(Debug, Error)]
pub enum CorpusError {
    #[error(transparent)]
    Embedding(#[from] EmbeddingError),

    #[error(transparent)]
    VectorStore(#[from] VectorStoreError),

    #[error("embedder model '{embedder}' does not match store model '{store}'")]
    ModelMismatch { embedder: String, store: String },
}

#[derive(Clone)]
pub struct Corpus {
    embedder: Arc<dyn Embedder>,
    store: Arc<dyn VectorStore>,
    weights: ResonanceWeights,
}

impl Corpus {
    pub fn new(embedder: Arc<dyn Embedder>, store: Arc<dyn VectorStore>) -> Result<Self, CorpusError> {
        if embedder.model_id() != store.embedding_model() {
            return Err(CorpusError::ModelMismatch {
                embedder: embedder.model_id().to_string(),
                store: store.embedding_model().to_string(),
            });
        }
        Ok(Self {
            embedder,
            store,
            weights: ResonanceWeights::default(),
        })
    }

    pub fn embedding_model(&self) -> &str {
        self.embedder.model_id()
    }

    pub async fn count(&self) -> Result<usize, CorpusError> {
        Ok(self.store.count().await?)
    }

    /// Embeds and stores a post. Returns `false` when the id is already present.
    pub async fn ingest(&self, post: HistoricalPost) -> Result<bool, CorpusError> {
        let ids = [post.id.clone()];
        if !self.store.get(Some(&ids)).await?.is_empty() {
            debug!("Post {} already in corpus, skipping", post.id);
            return Ok(false);
        }

        let embedding = self.embedder.embed(&post.text).await?;
        match self.store.add(post, embedding).await {
            Ok(()) => Ok(true),
            // Lost a race with a concurrent ingest of the same id.
            Err(VectorStoreError::DuplicateId(_)) => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    /// Embeds `query`, fetches the `n` nearest posts and returns the top `k`
    /// by combined resonance. An empty corpus yields an empty list.
    pub async fn retrieve_ranked(
        &self,
        query: &str,
        n: usize,
        k: usize,
    ) -> Result<Vec<RankedPost>, CorpusError> {
        let count = self.store.count().await?;
        if count == 0 {
            return Ok(Vec::new());
        }

        let embedding = self.embedder.embed(query).await?;
        let neighbors = self.store.query(&embedding, n.min(count)).await?;
        let ranked = rank_neighbors(neighbors, k, &self.weights);

        info!(
            "Retrieved {} reference posts (n={}, corpus={})",
            ranked.len(),
            n.min(count),
            count
        );
        Ok(ranked)
    }

    /// Every post, highest ERS first. Equal scores keep insertion order.
    pub async fn posts_by_ers(&self) -> Result<Vec<HistoricalPost>, CorpusError> {
        let mut posts = self.store.get(None).await?;
        posts.sort_by(|a, b| b.ers().total_cmp(&a.ers()));
        Ok(posts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resonance::embedding::{hashing_model_id, HashingEmbedder};
    use crate::resonance::vector_store::InMemoryVectorStore;

    fn corpus() -> Corpus {
        let embedder = Arc::new(HashingEmbedder::new(64));
        let store = Arc::new(InMemoryVectorStore::new(64, &hashing_model_id(64)));
        Corpus::new(embedder, store).unwrap()
    }

    fn post(id: &str, text: &str, shares: u64) -> HistoricalPost {
        HistoricalPost {
            id: id.to_string(),
            text: text.to_string(),
            likes: 10,
            comments: 2,
            shares,
            platform: "instagram".to_string(),
        }
    }

    #[test]
    fn test_model_mismatch_rejected() {
        let embedder = Arc::new(HashingEmbedder::new(64));
        let store = Arc::new(InMemoryVectorStore::new(64, "some-other-model"));
        assert!(matches!(
            Corpus::new(embedder, store),
            Err(CorpusError::ModelMismatch { .. })
        ));
    }

    #[tokio::test]
    async fn test_ingest_skips_existing_ids() {
        let corpus = corpus();
        assert!(corpus.ingest(post("post_0", "hello", 1)).await.unwrap());
        assert!(!corpus.ingest(post("post_0", "changed", 1)).await.unwrap());
        assert_eq!(corpus.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_retrieve_on_empty_corpus_is_empty() {
        let ranked = corpus().retrieve_ranked("anything", 20, 5).await.unwrap();
        assert!(ranked.is_empty());
    }

    #[tokio::test]
    async fn test_retrieve_ranked_caps_at_corpus_size() {
        let corpus = corpus();
        corpus.ingest(post("a", "coffee morning ritual", 3)).await.unwrap();
        corpus.ingest(post("b", "team offsite recap", 40)).await.unwrap();

        let ranked = corpus.retrieve_ranked("coffee ritual", 20, 5).await.unwrap();
        assert_eq!(ranked.len(), 2);
        assert!(ranked.iter().all(|r| (0.0..=1.0).contains(&r.combined)));
    }

    #[tokio::test]
    async fn test_similarity_wins_when_resonance_is_equal() {
        let corpus = corpus();
        corpus.ingest(post("off_topic", "quarterly tax filing reminder", 5)).await.unwrap();
        corpus.ingest(post("on_topic", "our morning coffee ritual", 5)).await.unwrap();

        let ranked = corpus.retrieve_ranked("morning coffee ritual", 20, 2).await.unwrap();
        assert_eq!(ranked[0].id, "on_topic");
        assert!(ranked[0].semantic_sim > ranked[1].semantic_sim);
    }

    #[tokio::test]
    async fn test_posts_by_ers_descending() {
        let corpus = corpus();
        corpus.ingest(post("low", "one", 0)).await.unwrap();
        corpus.ingest(post("high", "two", 500)).await.unwrap();
        corpus.ingest(post("mid", "three", 20)).await.unwrap();

        let ids: Vec<_> = corpus
            .posts_by_ers()
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.id)
            .collect();
        assert_eq!(ids, vec!["high", "mid", "low"]);
    }
}
