//! JSON documents the studio asks the text generator for.
//!
//! These are the schemas spelled out in `studio::prompts`. Output that does not
//! deserialize into them is returned to the client as a parse failure.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdeaList {
    pub ideas: Vec<ContentIdea>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentIdea {
    pub id: String,
    pub title: String,
    pub hook: String,
    pub angle: String,
    pub platform: String,
    pub predicted_ers: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostDraft {
    pub post_text: String,
    #[serde(default)]
    pub hashtags: Vec<String>,
    pub image_style_prompt: String,
    pub cta: String,
    pub word_count: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Verdict {
    StrongMatch,
    GoodMatch,
    WeakMatch,
    Mismatch,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Confidence {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DraftAnalysis {
    pub resonance_score: f64,
    pub verdict: Verdict,
    pub emotional_archetype: String,
    pub what_works: String,
    pub what_is_missing: String,
    #[serde(default)]
    pub missing_signals: Vec<String>,
    pub rewrite_suggestion: String,
    /// Overwritten with the server-side check before the analysis is returned.
    #[serde(default)]
    pub banned_words_found: Vec<String>,
    pub confidence: Confidence,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicVariations {
    pub archetype_detected: String,
    pub variations: Vec<Variation>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variation {
    pub text: String,
    pub emotional_angle: String,
    pub predicted_ers: f64,
}
