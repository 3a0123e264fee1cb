use std::str::FromStr;
use std::time::Duration;

use anyhow::{bail, Context, Result};

use crate::llm_client::LlmProvider;
use crate::resonance::embedding::{hashing_model_id, DEFAULT_DIMENSION};

const DEFAULT_TEI_MODEL: &str = "sentence-transformers/all-MiniLM-L6-v2";
const DEFAULT_SEED_CSV_PATH: &str = "data/brand_posts.csv";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmbeddingBackend {
    Hashing,
    Tei,
}

impl FromStr for EmbeddingBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hashing" => Ok(EmbeddingBackend::Hashing),
            "tei" => Ok(EmbeddingBackend::Tei),
            other => bail!("Unknown EMBEDDING_BACKEND '{other}' (expected hashing or tei)"),
        }
    }
}

/// Application configuration loaded from environment variables.
/// Startup fails if a required variable is missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    /// Absent means the in-memory content store.
    pub database_url: Option<String>,
    pub llm_provider: LlmProvider,
    pub llm_api_key: String,
    /// Applies to LLM, embedding and database calls alike.
    pub llm_timeout: Duration,
    pub embedding_backend: EmbeddingBackend,
    pub tei_url: Option<String>,
    pub embedding_model: String,
    pub embedding_dim: usize,
    pub seed_csv_path: String,
    pub seed_on_startup: bool,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup. Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let llm_provider = match get("LLM_PROVIDER") {
            Some(raw) => raw.parse::<LlmProvider>()?,
            None => LlmProvider::Gemini,
        };
        let llm_api_key = require_env(&get, llm_provider.api_key_var())?;

        let timeout_secs: u64 = parse_or(&get, "LLM_TIMEOUT_SECS", 30)?;
        if !(1..=120).contains(&timeout_secs) {
            bail!("LLM_TIMEOUT_SECS must be between 1 and 120, got {timeout_secs}");
        }

        let embedding_backend = match get("EMBEDDING_BACKEND") {
            Some(raw) => raw.parse::<EmbeddingBackend>()?,
            None => EmbeddingBackend::Hashing,
        };
        let embedding_dim: usize = parse_or(&get, "EMBEDDING_DIM", DEFAULT_DIMENSION)?;
        if embedding_dim == 0 {
            bail!("EMBEDDING_DIM must be positive");
        }

        let (tei_url, embedding_model) = match embedding_backend {
            EmbeddingBackend::Hashing => (None, hashing_model_id(embedding_dim)),
            EmbeddingBackend::Tei => (
                Some(require_env(&get, "TEI_URL")?),
                get("EMBEDDING_MODEL").unwrap_or_else(|| DEFAULT_TEI_MODEL.to_string()),
            ),
        };

        Ok(Config {
            database_url: get("DATABASE_URL"),
            llm_provider,
            llm_api_key,
            llm_timeout: Duration::from_secs(timeout_secs),
            embedding_backend,
            tei_url,
            embedding_model,
            embedding_dim,
            seed_csv_path: get("SEED_CSV_PATH")
                .unwrap_or_else(|| DEFAULT_SEED_CSV_PATH.to_string()),
            seed_on_startup: parse_or(&get, "SEED_ON_STARTUP", false)?,
            port: parse_or(&get, "PORT", 5001)?,
            rust_log: get("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }
}

fn require_env(get: &impl Fn(&str) -> Option<String>, key: &str) -> Result<String> {
    get(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn parse_or<T>(get: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match get(key) {
        Some(raw) => raw
            .parse::<T>()
            .with_context(|| format!("{key} has an invalid value '{raw}'")),
        None => Ok(default),
    }
}
