use axum::{extract::State, Json};

use crate::errors::AppError;
use crate::state::AppState;
use crate::studio::aligner::{analyze_draft, AnalyzeRequest, AnalyzeResponse};
use crate::studio::drafting::{draft_post, StudioRequest, StudioResponse};
use crate::studio::ideation::{generate_ideas, IdeateRequest, IdeateResponse};
use crate::studio::variations::{generate_variations, VariationsRequest, VariationsResponse};

/// POST /api/ideate
pub async fn handle_ideate(
    State(state): State<AppState>,
    Json(req): Json<IdeateRequest>,
) -> Result<Json<IdeateResponse>, AppError> {
    let response = generate_ideas(state.store.as_ref(), &state.corpus, state.llm.as_ref(), req).await?;
    Ok(Json(response))
}

/// POST /api/studio/generate
pub async fn handle_studio_generate(
    State(state): State<AppState>,
    Json(req): Json<StudioRequest>,
) -> Result<Json<StudioResponse>, AppError> {
    let response = draft_post(state.store.as_ref(), &state.corpus, state.llm.as_ref(), req).await?;
    Ok(Json(response))
}

/// POST /api/analyze
pub async fn handle_analyze(
    State(state): State<AppState>,
    Json(req): Json<AnalyzeRequest>,
) -> Result<Json<AnalyzeResponse>, AppError> {
    let response = analyze_draft(state.store.as_ref(), &state.corpus, state.llm.as_ref(), req).await?;
    Ok(Json(response))
}

/// POST /api/generate
pub async fn handle_generate_variations(
    State(state): State<AppState>,
    Json(req): Json<VariationsRequest>,
) -> Result<Json<VariationsResponse>, AppError> {
    let response =
        generate_variations(state.store.as_ref(), &state.corpus, state.llm.as_ref(), req).await?;
    Ok(Json(response))
}
