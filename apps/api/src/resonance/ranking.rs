//! Resonance ranking — blends semantic similarity with ERS to pick the
//! reference posts that condition a generation prompt.
//!
//! combined = 0.4 · similarity + 0.6 · (ers / 100)

use serde::{Deserialize, Serialize};

use crate::models::post::HistoricalPost;
use crate::resonance::ers::{round_to, MAX_ERS};
use crate::resonance::vector_store::Neighbor;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResonanceWeights {
    pub similarity: f64,
    pub ers: f64,
}

impl Default for ResonanceWeights {
    fn default() -> Self {
        Self {
            similarity: 0.4,
            ers: 0.6,
        }
    }
}

/// A retrieved post with its ranking inputs and key.
#[derive(Debug, Clone, Serialize)]
pub struct RankedPost {
    pub id: String,
    pub text: String,
    pub platform: String,
    pub ers: f64,
    /// Rounded to 3 decimals for display; `combined` uses the exact value.
    pub semantic_sim: f64,
    pub combined: f64,
}

/// Converts a cosine distance into a similarity in `[0, 1]`.
///
/// `1 − distance` is only bounded for distances in `[0, 1]`. Cosine distance
/// reaches 2 for opposed vectors; those are clamped to zero similarity.
pub fn similarity_from_distance(distance: f32) -> f64 {
    (1.0 - distance as f64).clamp(0.0, 1.0)
}

pub fn combined_score(similarity: f64, ers: f64, weights: &ResonanceWeights) -> f64 {
    (weights.similarity * similarity + weights.ers * (ers / MAX_ERS)).clamp(0.0, 1.0)
}

/// Ranks nearest-neighbour hits by combined score and keeps the top `k`.
///
/// Sorting is stable: candidates with equal scores stay in retrieval order.
pub fn rank_neighbors(
    neighbors: Vec<Neighbor>,
    k: usize,
    weights: &ResonanceWeights,
) -> Vec<RankedPost> {
    let scored = neighbors
        .into_iter()
        .map(|n| {
            let similarity = similarity_from_distance(n.distance);
            (n.post, similarity)
        })
        .collect();
    rank_by_similarity(scored, k, weights)
}

/// Same as [`rank_neighbors`] for callers that already hold similarities.
pub fn rank_by_similarity(
    scored: Vec<(HistoricalPost, f64)>,
    k: usize,
    weights: &ResonanceWeights,
) -> Vec<RankedPost> {
    let mut ranked: Vec<RankedPost> = scored
        .into_iter()
        .map(|(post, similarity)| {
            let ers = post.ers();
            RankedPost {
                combined: combined_score(similarity, ers, weights),
                semantic_sim: round_to(similarity, 3),
                ers,
                id: post.id,
                text: post.text,
                platform: post.platform,
            }
        })
        .collect();

    ranked.sort_by(|a, b| b.combined.total_cmp(&a.combined));
    ranked.truncate(k);
    ranked
}
