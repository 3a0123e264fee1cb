use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;
use crate::llm_client::{parse_llm_json, LlmOutput, TextGenerator};
use crate::models::brand::resolve_brand_id;
use crate::resonance::corpus::Corpus;
use crate::resonance::ranking::RankedPost;
use crate::store::ContentStore;
use crate::studio::models::IdeaList;
use crate::studio::prompts::build_ideation_prompt;

pub const DEFAULT_FOCUS_AREA: &str = "general brand storytelling";

const CANDIDATES: usize = 10;
const TOP_K: usize = 5;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct IdeateRequest {
    pub brand_id: Option<String>,
    pub focus_area: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct IdeateResponse {
    pub success: bool,
    pub focus_area: String,
    pub result: LlmOutput<IdeaList>,
    pub reference_posts: Vec<RankedPost>,
}

/// Generates five content ideas conditioned on the brand and the posts that
/// resonate best with the focus area. Runs without references on an empty corpus.
pub async fn generate_ideas(
    store: &dyn ContentStore,
    corpus: &Corpus,
    llm: &dyn TextGenerator,
    request: IdeateRequest,
) -> Result<IdeateResponse, AppError> {
    let brand_id = resolve_brand_id(request.brand_id.as_deref());
    let focus_area = request
        .focus_area
        .as_deref()
        .map(str::trim)
        .filter(|f| !f.is_empty())
        .unwrap_or(DEFAULT_FOCUS_AREA)
        .to_string();

    let brand = store.get_brand_dna(brand_id).await?;
    let references = corpus.retrieve_ranked(&focus_area, CANDIDATES, TOP_K).await?;
    info!(
        "Ideating for brand '{brand_id}' (focus: {focus_area}, references: {})",
        references.len()
    );

    let prompt = build_ideation_prompt(brand.as_ref(), &focus_area, &references);
    let raw = llm.complete(&prompt).await?;
    let result = parse_llm_json::<IdeaList>(&raw);
    if let Some(list) = result.parsed() {
        info!("Generated {} ideas", list.ideas.len());
    }

    Ok(IdeateResponse {
        success: true,
        focus_area,
        result,
        reference_posts: references,
    })
}
