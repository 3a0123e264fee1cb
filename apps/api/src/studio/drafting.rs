use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;
use crate::llm_client::{parse_llm_json, LlmOutput, TextGenerator};
use crate::models::brand::resolve_brand_id;
use crate::resonance::corpus::Corpus;
use crate::resonance::ranking::RankedPost;
use crate::store::ContentStore;
use crate::studio::models::PostDraft;
use crate::studio::prompts::{build_draft_prompt, DraftBrief};

const CANDIDATES: usize = 10;
const TOP_K: usize = 3;

const DEFAULT_ANGLE: &str = "storytelling";
const DEFAULT_DRAFT_PLATFORM: &str = "Instagram";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StudioRequest {
    /// Required. A blank title gives the model nothing to write from and the
    /// retrieval query nothing to match, so it is a validation error.
    pub idea_title: String,
    pub idea_hook: String,
    pub angle: Option<String>,
    pub platform: Option<String>,
    pub brand_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct StudioResponse {
    pub success: bool,
    pub result: LlmOutput<PostDraft>,
    pub reference_posts: Vec<RankedPost>,
}

fn or_default<'a>(value: &'a Option<String>, fallback: &'a str) -> &'a str {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or(fallback)
}

/// Writes a full post from an idea. Reference posts are retrieved with the
/// idea's title and hook as the query.
pub async fn draft_post(
    store: &dyn ContentStore,
    corpus: &Corpus,
    llm: &dyn TextGenerator,
    request: StudioRequest,
) -> Result<StudioResponse, AppError> {
    let idea_title = request.idea_title.trim();
    if idea_title.is_empty() {
        return Err(AppError::Validation("idea_title cannot be empty".to_string()));
    }
    let idea_hook = request.idea_hook.trim();
    let brief = DraftBrief {
        idea_title,
        idea_hook,
        angle: or_default(&request.angle, DEFAULT_ANGLE),
        platform: or_default(&request.platform, DEFAULT_DRAFT_PLATFORM),
    };

    let brand_id = resolve_brand_id(request.brand_id.as_deref());
    let brand = store.get_brand_dna(brand_id).await?;

    let query = format!("{idea_title} {idea_hook}");
    let references = corpus.retrieve_ranked(query.trim(), CANDIDATES, TOP_K).await?;
    info!(
        "Drafting '{idea_title}' for brand '{brand_id}' on {} ({} references)",
        brief.platform,
        references.len()
    );

    let prompt = build_draft_prompt(&brief, brand.as_ref(), &references);
    let raw = llm.complete(&prompt).await?;

    Ok(StudioResponse {
        success: true,
        result: parse_llm_json(&raw),
        reference_posts: references,
    })
}
