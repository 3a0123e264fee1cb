pub mod brand;
pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::calendar::handlers as calendar;
use crate::resonance::handlers as corpus;
use crate::state::AppState;
use crate::studio::handlers as studio;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health::health_handler))
        // Brand DNA vault
        .route(
            "/api/brand-dna",
            get(brand::handle_get_brand_dna).post(brand::handle_save_brand_dna),
        )
        // Content studio
        .route("/api/ideate", post(studio::handle_ideate))
        .route("/api/studio/generate", post(studio::handle_studio_generate))
        .route("/api/analyze", post(studio::handle_analyze))
        .route("/api/generate", post(studio::handle_generate_variations))
        // Content calendar
        .route("/api/posts/schedule", post(calendar::handle_schedule))
        .route("/api/posts/calendar", get(calendar::handle_calendar))
        .route("/api/posts/recent", get(calendar::handle_recent))
        .route("/api/posts/stats", get(calendar::handle_calendar_stats))
        // Resonance corpus
        .route("/api/seed", post(corpus::handle_seed))
        .route("/api/stats", get(corpus::handle_corpus_stats))
        .route("/api/posts", get(corpus::handle_corpus_posts))
        .with_state(state)
}
