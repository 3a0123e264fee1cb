//! Fakes shared by unit and router tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::config::Config;
use crate::llm_client::{LlmError, TextGenerator};
use crate::models::post::HistoricalPost;
use crate::resonance::corpus::Corpus;
use crate::resonance::embedding::{hashing_model_id, HashingEmbedder};
use crate::resonance::vector_store::InMemoryVectorStore;
use crate::state::AppState;
use crate::store::memory::InMemoryContentStore;

/// Returns the same reply to every prompt and records what it was asked.
pub struct ScriptedGenerator {
    reply: Result<String, (u16, String)>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedGenerator {
    pub fn replying(text: impl Into<String>) -> Self {
        Self {
            reply: Ok(text.into()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(status: u16, message: impl Into<String>) -> Self {
        Self {
            reply: Err((status, message.into())),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    async fn complete(&self, prompt: &str) -> Result<String, LlmError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        match &self.reply {
            Ok(text) => Ok(text.clone()),
            Err((status, message)) => Err(LlmError::Api {
                status: *status,
                message: message.clone(),
            }),
        }
    }

    fn provider_name(&self) -> &str {
        "scripted"
    }
}

pub fn empty_corpus() -> Corpus {
    Corpus::new(
        Arc::new(HashingEmbedder::new(64)),
        Arc::new(InMemoryVectorStore::new(64, &hashing_model_id(64))),
    )
    .unwrap()
}

pub fn post(id: &str, text: &str, likes: u64, comments: u64, shares: u64) -> HistoricalPost {
    HistoricalPost {
        id: id.to_string(),
        text: text.to_string(),
        likes,
        comments,
        shares,
        platform: "instagram".to_string(),
    }
}

/// A corpus holding a handful of coffee-brand posts with varied engagement.
pub async fn seeded_corpus() -> Corpus {
    let corpus = empty_corpus();
    let posts = [
        post("post_0", "Our roaster starts at 4am so your first cup tastes like sunrise.", 420, 61, 30),
        post("post_1", "We are closed Monday for inventory.", 12, 1, 0),
        post("post_2", "Meet Dana, who has pulled 40,000 espresso shots and still smiles.", 310, 88, 41),
        post("post_3", "New oat milk latte, now on the menu.", 95, 10, 3),
        post("post_4", "The story of the chipped mug we refuse to throw away.", 505, 120, 77),
        post("post_5", "Quarterly tax filing reminder for our franchise partners.", 8, 0, 0),
    ];
    for p in posts {
        corpus.ingest(p).await.unwrap();
    }
    corpus
}

/// App state over the in-memory store. `seed_csv_path` feeds `POST /api/seed`.
pub fn app_state(corpus: Corpus, llm: Arc<dyn TextGenerator>, seed_csv_path: &str) -> AppState {
    let config = Config::from_lookup(|key| match key {
        "GEMINI_API_KEY" => Some("test-key".to_string()),
        "SEED_CSV_PATH" => Some(seed_csv_path.to_string()),
        _ => None,
    })
    .unwrap();

    AppState {
        store: Arc::new(InMemoryContentStore::new()),
        corpus,
        llm,
        config,
    }
}
