use std::sync::Arc;

use crate::config::Config;
use crate::llm_client::TextGenerator;
use crate::resonance::corpus::Corpus;
use crate::store::ContentStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// PostgreSQL or in-memory, chosen at startup.
    pub store: Arc<dyn ContentStore>,
    pub corpus: Corpus,
    pub llm: Arc<dyn TextGenerator>,
    pub config: Config,
}
