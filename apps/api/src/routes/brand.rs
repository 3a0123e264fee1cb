use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;
use crate::models::brand::{resolve_brand_id, BrandDna, BrandDnaInput};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct BrandQuery {
    pub brand_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct BrandDnaResponse {
    pub success: bool,
    /// `null` when the brand has not been saved yet.
    pub data: Option<BrandDna>,
}

/// GET /api/brand-dna
pub async fn handle_get_brand_dna(
    State(state): State<AppState>,
    Query(params): Query<BrandQuery>,
) -> Result<Json<BrandDnaResponse>, AppError> {
    let brand_id = resolve_brand_id(params.brand_id.as_deref());
    let data = state.store.get_brand_dna(brand_id).await?;
    Ok(Json(BrandDnaResponse {
        success: true,
        data,
    }))
}

#[derive(Debug, Serialize)]
pub struct SaveBrandDnaResponse {
    pub success: bool,
    pub message: &'static str,
    pub data: BrandDna,
}

/// POST /api/brand-dna
pub async fn handle_save_brand_dna(
    State(state): State<AppState>,
    Json(req): Json<BrandDnaInput>,
) -> Result<Json<SaveBrandDnaResponse>, AppError> {
    let saved = state.store.upsert_brand_dna(req).await?;
    info!("Saved Brand DNA for '{}'", saved.brand_id);
    Ok(Json(SaveBrandDnaResponse {
        success: true,
        message: "Brand DNA saved.",
        data: saved,
    }))
}
