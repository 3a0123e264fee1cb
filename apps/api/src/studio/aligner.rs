//! Emotional Aligner — scores a user's draft against the posts that resonated
//! most with similar content.
//!
//! Flow: validate draft → banned-word check → retrieve 20 nearest → rank →
//!       top 5 into the prompt → generate → overwrite `banned_words_found`.

use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::errors::AppError;
use crate::llm_client::{parse_llm_json, LlmOutput, TextGenerator};
use crate::models::brand::resolve_brand_id;
use crate::resonance::banned_words::find_banned_words;
use crate::resonance::corpus::Corpus;
use crate::resonance::ers::round_to;
use crate::resonance::ranking::RankedPost;
use crate::store::ContentStore;
use crate::studio::models::DraftAnalysis;
use crate::studio::prompts::build_analysis_prompt;

pub const MIN_DRAFT_CHARS: usize = 10;

const CANDIDATES: usize = 20;
const TOP_K: usize = 5;
/// Reference posts echoed back to the client.
const RETURNED_REFERENCES: usize = 3;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AnalyzeRequest {
    pub draft: String,
    pub brand_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub success: bool,
    pub draft: String,
    pub analysis: LlmOutput<DraftAnalysis>,
    pub reference_posts: Vec<RankedPost>,
    pub processing_time_seconds: f64,
    pub db_size: usize,
    pub banned_words_found: Vec<String>,
}

pub async fn analyze_draft(
    store: &dyn ContentStore,
    corpus: &Corpus,
    llm: &dyn TextGenerator,
    request: AnalyzeRequest,
) -> Result<AnalyzeResponse, AppError> {
    let draft = request.draft.trim().to_string();
    if draft.chars().count() < MIN_DRAFT_CHARS {
        return Err(AppError::Validation("Draft too short".to_string()));
    }

    let db_size = corpus.count().await?;
    if db_size == 0 {
        return Err(AppError::InsufficientData(
            "The post corpus is empty. Seed it first.".to_string(),
        ));
    }

    let started = Instant::now();

    let brand_id = resolve_brand_id(request.brand_id.as_deref());
    let banned_words = store
        .get_brand_dna(brand_id)
        .await?
        .map(|b| b.banned_words)
        .unwrap_or_default();
    let found_banned = find_banned_words(&draft, &banned_words);
    if !found_banned.is_empty() {
        warn!("Draft for brand '{brand_id}' contains banned words: {found_banned:?}");
    }

    let mut references = corpus.retrieve_ranked(&draft, CANDIDATES, TOP_K).await?;
    if references.is_empty() {
        return Err(AppError::InsufficientData(
            "No reference posts could be retrieved for this draft".to_string(),
        ));
    }

    let prompt = build_analysis_prompt(&draft, &references, &found_banned);
    let raw = llm.complete(&prompt).await?;

    let mut analysis = parse_llm_json::<DraftAnalysis>(&raw);
    if let LlmOutput::Parsed(parsed) = &mut analysis {
        parsed.banned_words_found = found_banned.clone();
    }

    references.truncate(RETURNED_REFERENCES);
    let elapsed = round_to(started.elapsed().as_secs_f64(), 2);
    if analysis.is_parse_failure() {
        warn!("Analysis for brand '{brand_id}' returned unparseable output after {elapsed}s");
    } else {
        info!("Analyzed draft for brand '{brand_id}' in {elapsed}s");
    }

    Ok(AnalyzeResponse {
        success: true,
        draft,
        analysis,
        reference_posts: references,
        processing_time_seconds: elapsed,
        db_size,
        banned_words_found: found_banned,
    })
}
