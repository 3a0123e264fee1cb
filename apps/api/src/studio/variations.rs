use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;
use crate::llm_client::{parse_llm_json, LlmOutput, TextGenerator};
use crate::models::brand::resolve_brand_id;
use crate::resonance::corpus::Corpus;
use crate::resonance::ranking::RankedPost;
use crate::store::ContentStore;
use crate::studio::models::TopicVariations;
use crate::studio::prompts::build_variations_prompt;

const CANDIDATES: usize = 10;
const TOP_K: usize = 3;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct VariationsRequest {
    pub topic: String,
    pub brand_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct VariationsResponse {
    pub success: bool,
    pub topic: String,
    pub result: LlmOutput<TopicVariations>,
    pub reference_posts: Vec<RankedPost>,
}

/// Writes three takes on `topic`, conditioned on the posts that resonate best with it.
pub async fn generate_variations(
    store: &dyn ContentStore,
    corpus: &Corpus,
    llm: &dyn TextGenerator,
    request: VariationsRequest,
) -> Result<VariationsResponse, AppError> {
    let topic = request.topic.trim().to_string();
    if topic.is_empty() {
        return Err(AppError::Validation("Topic required".to_string()));
    }

    let brand_id = resolve_brand_id(request.brand_id.as_deref());
    let brand = store.get_brand_dna(brand_id).await?;
    let references = corpus.retrieve_ranked(&topic, CANDIDATES, TOP_K).await?;
    info!("Generating variations on '{topic}' ({} references)", references.len());

    let prompt = build_variations_prompt(&topic, brand.as_ref(), &references);
    let raw = llm.complete(&prompt).await?;

    Ok(VariationsResponse {
        success: true,
        topic,
        result: parse_llm_json(&raw),
        reference_posts: references,
    })
}
