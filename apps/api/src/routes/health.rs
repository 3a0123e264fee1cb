use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::errors::AppError;
use crate::state::AppState;

/// GET /api/health
pub async fn health_handler(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    Ok(Json(json!({
        "status": "online",
        "version": env!("CARGO_PKG_VERSION"),
        "posts_in_corpus": state.corpus.count().await?,
        "llm_provider": state.llm.provider_name(),
        "store_backend": state.store.backend_name(),
        "embedding_model": state.corpus.embedding_model(),
    })))
}
