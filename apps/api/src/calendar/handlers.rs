use axum::{
    extract::{Query, State},
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::calendar::stats::{compute_calendar_stats, CalendarStats};
use crate::errors::AppError;
use crate::models::brand::resolve_brand_id;
use crate::models::schedule::{ScheduleRequest, ScheduledPost};
use crate::state::AppState;

pub const DEFAULT_RECENT_LIMIT: usize = 5;
pub const MAX_RECENT_LIMIT: usize = 50;

#[derive(Debug, Default, Deserialize)]
pub struct BrandQuery {
    pub brand_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RecentQuery {
    pub brand_id: Option<String>,
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct ScheduleResponse {
    pub success: bool,
    pub post: ScheduledPost,
}

#[derive(Debug, Serialize)]
pub struct PostListResponse {
    pub success: bool,
    pub posts: Vec<ScheduledPost>,
}

#[derive(Debug, Serialize)]
pub struct CalendarStatsResponse {
    pub success: bool,
    #[serde(flatten)]
    pub stats: CalendarStats,
    pub db_post_count: usize,
}

/// POST /api/posts/schedule
pub async fn handle_schedule(
    State(state): State<AppState>,
    Json(req): Json<ScheduleRequest>,
) -> Result<Json<ScheduleResponse>, AppError> {
    let post = req.into_post(Utc::now()).map_err(AppError::Validation)?;
    let post = state.store.insert_scheduled_post(post).await?;
    info!(
        "Scheduled post {} for brand '{}' on {} at {}",
        post.id, post.brand_id, post.platform, post.scheduled_time
    );
    Ok(Json(ScheduleResponse {
        success: true,
        post,
    }))
}

/// GET /api/posts/calendar
pub async fn handle_calendar(
    State(state): State<AppState>,
    Query(params): Query<BrandQuery>,
) -> Result<Json<PostListResponse>, AppError> {
    let brand_id = resolve_brand_id(params.brand_id.as_deref());
    let posts = state.store.list_scheduled_posts(brand_id).await?;
    Ok(Json(PostListResponse {
        success: true,
        posts,
    }))
}

/// GET /api/posts/recent
pub async fn handle_recent(
    State(state): State<AppState>,
    Query(params): Query<RecentQuery>,
) -> Result<Json<PostListResponse>, AppError> {
    let brand_id = resolve_brand_id(params.brand_id.as_deref());
    let limit = params
        .limit
        .unwrap_or(DEFAULT_RECENT_LIMIT)
        .min(MAX_RECENT_LIMIT);
    let posts = state.store.recent_scheduled_posts(brand_id, limit).await?;
    Ok(Json(PostListResponse {
        success: true,
        posts,
    }))
}

/// GET /api/posts/stats
pub async fn handle_calendar_stats(
    State(state): State<AppState>,
    Query(params): Query<BrandQuery>,
) -> Result<Json<CalendarStatsResponse>, AppError> {
    let brand_id = resolve_brand_id(params.brand_id.as_deref());
    let posts = state.store.list_scheduled_posts(brand_id).await?;
    Ok(Json(CalendarStatsResponse {
        success: true,
        stats: compute_calendar_stats(&posts),
        db_post_count: state.corpus.count().await?,
    }))
}
