use std::path::Path;

use axum::{extract::State, Json};
use serde::Serialize;

use crate::errors::AppError;
use crate::models::post::PostSummary;
use crate::resonance::seed::{seed_from_csv, SeedReport};
use crate::resonance::stats::{compute_corpus_stats, CorpusStats};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct SeedResponse {
    pub success: bool,
    #[serde(flatten)]
    pub report: SeedReport,
}

#[derive(Debug, Serialize)]
pub struct CorpusPostsResponse {
    pub posts: Vec<PostSummary>,
}

/// POST /api/seed
pub async fn handle_seed(State(state): State<AppState>) -> Result<Json<SeedResponse>, AppError> {
    let report = seed_from_csv(&state.corpus, Path::new(&state.config.seed_csv_path)).await?;
    Ok(Json(SeedResponse {
        success: true,
        report,
    }))
}

/// GET /api/stats
pub async fn handle_corpus_stats(
    State(state): State<AppState>,
) -> Result<Json<CorpusStats>, AppError> {
    let posts = state.corpus.posts_by_ers().await?;
    let stats = compute_corpus_stats(&posts).ok_or_else(|| {
        AppError::InsufficientData("The post corpus is empty. Seed it first.".to_string())
    })?;
    Ok(Json(stats))
}

/// GET /api/posts
pub async fn handle_corpus_posts(
    State(state): State<AppState>,
) -> Result<Json<CorpusPostsResponse>, AppError> {
    let posts = state.corpus.posts_by_ers().await?;
    Ok(Json(CorpusPostsResponse {
        posts: posts.iter().map(|p| p.summary()).collect(),
    }))
}
