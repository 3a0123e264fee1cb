//! Seeds the corpus from a CSV export of historical posts.
//!
//! Columns: `post_text, likes, comments, shares, platform`. Missing counts are
//! zero and a missing platform is `instagram`. Row `i` (0-based, header
//! excluded) gets id `post_{i}`, so re-seeding the same file is idempotent.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::models::post::HistoricalPost;
use crate::models::schedule::DEFAULT_PLATFORM;
use crate::resonance::corpus::{Corpus, CorpusError};

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("seed file not found: {0}")]
    NotFound(String),

    #[error("failed to read seed file: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed seed CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Corpus(#[from] CorpusError),
}

#[derive(Debug, Deserialize)]
struct SeedRow {
    post_text: String,
    likes: Option<u64>,
    comments: Option<u64>,
    shares: Option<u64>,
    platform: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeedReport {
    pub added: usize,
    pub skipped: usize,
    pub total: usize,
}

/// Parses seed CSV content. Rows with blank text are dropped; the second
/// value is how many were dropped.
pub fn parse_seed_csv(content: &str) -> Result<(Vec<HistoricalPost>, usize), csv::Error> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    let mut posts = Vec::new();
    let mut blank = 0;
    for (i, row) in reader.deserialize::<SeedRow>().enumerate() {
        let row = row?;
        let text = row.post_text.trim();
        if text.is_empty() {
            blank += 1;
            continue;
        }
        posts.push(HistoricalPost {
            id: format!("post_{i}"),
            text: text.to_string(),
            likes: row.likes.unwrap_or(0),
            comments: row.comments.unwrap_or(0),
            shares: row.shares.unwrap_or(0),
            platform: row
                .platform
                .filter(|p| !p.is_empty())
                .unwrap_or_else(|| DEFAULT_PLATFORM.to_string()),
        });
    }
    Ok((posts, blank))
}

pub async fn seed_from_csv(corpus: &Corpus, path: &Path) -> Result<SeedReport, SeedError> {
    let content = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(SeedError::NotFound(path.display().to_string()))
        }
        Err(e) => return Err(e.into()),
    };

    let (posts, blank) = parse_seed_csv(&content)?;
    if blank > 0 {
        warn!("Skipping {blank} seed rows with empty post_text");
    }

    let mut added = 0;
    let mut skipped = blank;
    for post in posts {
        if corpus.ingest(post).await? {
            added += 1;
        } else {
            skipped += 1;
        }
    }

    let total = corpus.count().await?;
    info!(
        "Seeded corpus from {}: added={added}, skipped={skipped}, total={total}",
        path.display()
    );
    Ok(SeedReport {
        added,
        skipped,
        total,
    })
}
