//! Embedding providers: text → fixed-length vector.
//!
//! Every corpus entry and every query must go through the same model, so each
//! embedder reports a `model_id` that the corpus checks against its store.

use async_trait::async_trait;
use serde::Serialize;
use sha2::{Digest, Sha256};
use thiserror::Error;

/// Dimension of the default embedding space.
pub const DEFAULT_DIMENSION: usize = 384;

/// Model id of the hashing embedder at `dimension`. Vectors of different
/// widths are not comparable, so the width is part of the id.
pub fn hashing_model_id(dimension: usize) -> String {
    format!("feature-hash-{dimension}-v1")
}

#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("embedding request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("embedding service returned status {0}")]
    Status(u16),

    #[error("embedding service returned {got} vectors for {expected} inputs")]
    CountMismatch { expected: usize, got: usize },

    #[error("expected a {expected}-dimensional vector, got {got}")]
    DimensionMismatch { expected: usize, got: usize },
}

#[async_trait]
pub trait Embedder: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError>;

    /// Stable identifier of the model and its version.
    fn model_id(&self) -> &str;

    fn dimension(&self) -> usize;
}

// ────────────────────────────────────────────────────────────────────────────
// HashingEmbedder
// ────────────────────────────────────────────────────────────────────────────

/// Deterministic feature-hashing embedder. No network, no model weights.
///
/// Each lower-cased alphanumeric token is hashed with SHA-256; the first eight
/// bytes pick a bucket and the ninth picks a sign. The bucket counts are then
/// L2-normalised, so cosine similarity reflects shared vocabulary. Text with no
/// tokens embeds to the zero vector.
#[derive(Debug, Clone)]
pub struct HashingEmbedder {
    dimension: usize,
    model_id: String,
}

impl HashingEmbedder {
    pub fn new(dimension: usize) -> Self {
        let dimension = dimension.max(1);
        Self {
            dimension,
            model_id: hashing_model_id(dimension),
        }
    }

    pub fn embed_sync(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0_f32; self.dimension];

        for token in tokenize(text) {
            let hash = Sha256::digest(token.as_bytes());
            let mut bucket_bytes = [0_u8; 8];
            bucket_bytes.copy_from_slice(&hash[..8]);
            let bucket = (u64::from_be_bytes(bucket_bytes) % self.dimension as u64) as usize;
            let sign = if hash[8] & 1 == 0 { 1.0 } else { -1.0 };
            vector[bucket] += sign;
        }

        let norm = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
        if norm > 0.0 {
            vector.iter_mut().for_each(|v| *v /= norm);
        }
        vector
    }
}

impl Default for HashingEmbedder {
    fn default() -> Self {
        Self::new(DEFAULT_DIMENSION)
    }
}

#[async_trait]
impl Embedder for HashingEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        Ok(self.embed_sync(text))
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}

fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
}

// ────────────────────────────────────────────────────────────────────────────
// TeiEmbedder
// ────────────────────────────────────────────────────────────────────────────

/// Client for a Text Embeddings Inference server (`POST /embed`).
pub struct TeiEmbedder {
    client: reqwest::Client,
    url: String,
    model_id: String,
    dimension: usize,
}

#[derive(Serialize)]
struct EmbedRequest<'a> {
    inputs: &'a [&'a str],
}

impl TeiEmbedder {
    pub fn new(
        tei_url: &str,
        model_id: &str,
        dimension: usize,
        timeout: std::time::Duration,
    ) -> Result<Self, EmbeddingError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            url: format!("{}/embed", tei_url.trim_end_matches('/')),
            model_id: model_id.to_string(),
            dimension,
        })
    }
}

#[async_trait]
impl Embedder for TeiEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let inputs = [text];
        let response = self
            .client
            .post(&self.url)
            .json(&EmbedRequest { inputs: &inputs })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(EmbeddingError::Status(response.status().as_u16()));
        }

        let mut embeddings: Vec<Vec<f32>> = response.json().await?;
        if embeddings.len() != 1 {
            return Err(EmbeddingError::CountMismatch {
                expected: 1,
                got: embeddings.len(),
            });
        }

        let vector = embeddings.remove(0);
        if vector.len() != self.dimension {
            return Err(EmbeddingError::DimensionMismatch {
                expected: self.dimension,
                got: vector.len(),
            });
        }
        Ok(vector)
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn norm(v: &[f32]) -> f32 {
        v.iter().map(|x| x * x).sum::<f32>().sqrt()
    }

    #[test]
    fn test_hashing_is_deterministic_and_normalised() {
        let embedder = HashingEmbedder::default();
        let a = embedder.embed_sync("Behind the scenes of our launch");
        let b = embedder.embed_sync("Behind the scenes of our launch");
        assert_eq!(a, b);
        assert_eq!(a.len(), DEFAULT_DIMENSION);
        assert!((norm(&a) - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_hashing_model_id_carries_dimension() {
        assert_eq!(HashingEmbedder::default().model_id(), "feature-hash-384-v1");
        assert_eq!(HashingEmbedder::new(128).model_id(), "feature-hash-128-v1");
    }

    #[test]
    fn test_hashing_ignores_case_and_punctuation() {
        let embedder = HashingEmbedder::default();
        assert_eq!(
            embedder.embed_sync("Hello, WORLD!"),
            embedder.embed_sync("hello world")
        );
    }

    #[test]
    fn test_empty_text_is_zero_vector() {
        let v = HashingEmbedder::new(16).embed_sync("  ...  ");
        assert!(v.iter().all(|x| *x == 0.0));
    }

    #[tokio::test]
    async fn test_tei_embed_returns_vector() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/embed"))
            .respond_with(ResponseTemplate::new(200).set_body_json(vec![vec![0.5_f32; 4]]))
            .mount(&server)
            .await;

        let embedder =
            TeiEmbedder::new(&server.uri(), "bge-small", 4, std::time::Duration::from_secs(5))
                .unwrap();
        let v = embedder.embed("hello").await.expect("embed should succeed");
        assert_eq!(v, vec![0.5; 4]);
        assert_eq!(embedder.model_id(), "bge-small");
    }

    #[tokio::test]
    async fn test_tei_dimension_mismatch_is_rejected() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/embed"))
            .respond_with(ResponseTemplate::new(200).set_body_json(vec![vec![0.5_f32; 3]]))
            .mount(&server)
            .await;

        let embedder =
            TeiEmbedder::new(&server.uri(), "bge-small", 4, std::time::Duration::from_secs(5))
                .unwrap();
        let err = embedder.embed("hello").await.unwrap_err();
        assert!(matches!(
            err,
            EmbeddingError::DimensionMismatch {
                expected: 4,
                got: 3
            }
        ));
    }

    #[tokio::test]
    async fn test_tei_server_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let embedder =
            TeiEmbedder::new(&server.uri(), "bge-small", 4, std::time::Duration::from_secs(5))
                .unwrap();
        assert!(matches!(
            embedder.embed("hello").await,
            Err(EmbeddingError::Status(503))
        ));
    }
}
