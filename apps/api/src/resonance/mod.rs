// Emotional resonance pipeline: ERS scoring, embedding, retrieval and ranking.
// No LLM calls here; the studio pipelines feed the ranked posts into prompts.

pub mod banned_words;
pub mod corpus;
pub mod embedding;
pub mod ers;
pub mod handlers;
pub mod ranking;
pub mod seed;
pub mod stats;
pub mod vector_store;
