use serde::Serialize;

use crate::models::post::{truncate_chars, HistoricalPost};
use crate::resonance::ers::round_to;

const TOP_POSTS: usize = 10;
const TOP_POST_SNIPPET_CHARS: usize = 120;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorpusStats {
    pub total_posts: usize,
    pub avg_ers: f64,
    pub max_ers: f64,
    pub min_ers: f64,
    pub top_posts: Vec<TopPost>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopPost {
    pub text: String,
    pub ers: f64,
    pub platform: String,
}

/// ERS distribution over the corpus. `posts` must already be sorted by ERS,
/// highest first. Returns `None` for an empty corpus.
pub fn compute_corpus_stats(posts: &[HistoricalPost]) -> Option<CorpusStats> {
    if posts.is_empty() {
        return None;
    }

    let scores: Vec<f64> = posts.iter().map(HistoricalPost::ers).collect();
    let max = scores.iter().copied().fold(f64::MIN, f64::max);
    let min = scores.iter().copied().fold(f64::MAX, f64::min);
    let avg = scores.iter().sum::<f64>() / scores.len() as f64;

    let top_posts = posts
        .iter()
        .take(TOP_POSTS)
        .map(|p| TopPost {
            text: format!("{}..", truncate_chars(&p.text, TOP_POST_SNIPPET_CHARS)),
            ers: p.ers(),
            platform: p.platform.clone(),
        })
        .collect();

    Some(CorpusStats {
        total_posts: posts.len(),
        avg_ers: round_to(avg, 2),
        max_ers: round_to(max, 2),
        min_ers: round_to(min, 2),
        top_posts,
    })
}
