use serde::{Deserialize, Serialize};

use crate::resonance::ers::calculate_ers;

/// A historical post in the resonance corpus.
///
/// The ERS is never stored: it is derived from the engagement counts on every
/// read, so a post can never carry a score that disagrees with its inputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalPost {
    pub id: String,
    pub text: String,
    pub likes: u64,
    pub comments: u64,
    pub shares: u64,
    pub platform: String,
}

impl HistoricalPost {
    pub fn ers(&self) -> f64 {
        calculate_ers(self.likes, self.comments, self.shares)
    }

    pub fn summary(&self) -> PostSummary {
        PostSummary {
            id: self.id.clone(),
            text: self.text.clone(),
            likes: self.likes,
            comments: self.comments,
            shares: self.shares,
            platform: self.platform.clone(),
            ers: self.ers(),
        }
    }
}

/// First `max_chars` characters of `text`, cut on a char boundary.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Wire view of a corpus post, ERS included.
#[derive(Debug, Clone, Serialize)]
pub struct PostSummary {
    pub id: String,
    pub text: String,
    pub likes: u64,
    pub comments: u64,
    pub shares: u64,
    pub platform: String,
    pub ers: f64,
}
