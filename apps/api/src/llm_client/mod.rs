//! LLM Client — the single point of entry for all text-generation calls.
//!
//! ARCHITECTURAL RULE: No other module may call a provider API directly.
//! Pipelines depend on the `TextGenerator` trait; `LlmClient` is the production
//! implementation and speaks Gemini, Groq (OpenAI-compatible) or Anthropic.
//!
//! Calls are single-attempt with a bounded timeout. A failed call is returned as
//! an `LlmError`; it is never retried here.

use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

pub mod prompts;

const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";
const GROQ_BASE_URL: &str = "https://api.groq.com";
const ANTHROPIC_BASE_URL: &str = "https://api.anthropic.com";
const ANTHROPIC_VERSION: &str = "2023-06-01";

pub const GEMINI_MODEL: &str = "gemini-1.5-flash";
pub const GROQ_MODEL: &str = "llama-3.1-8b-instant";
pub const ANTHROPIC_MODEL: &str = "claude-sonnet-4-5";

const TEMPERATURE: f32 = 0.7;
const MAX_TOKENS: u32 = 1024;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("LLM returned empty content")]
    EmptyContent,

    #[error("Unknown LLM provider '{0}' (expected gemini, groq or anthropic)")]
    UnknownProvider(String),
}

/// Text-completion seam used by every generation pipeline.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String, LlmError>;

    /// Provider label reported by the health endpoint.
    fn provider_name(&self) -> &str;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LlmProvider {
    Gemini,
    Groq,
    Anthropic,
}

impl LlmProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            LlmProvider::Gemini => "gemini",
            LlmProvider::Groq => "groq",
            LlmProvider::Anthropic => "anthropic",
        }
    }

    pub fn model(&self) -> &'static str {
        match self {
            LlmProvider::Gemini => GEMINI_MODEL,
            LlmProvider::Groq => GROQ_MODEL,
            LlmProvider::Anthropic => ANTHROPIC_MODEL,
        }
    }

    /// Environment variable holding this provider's API key.
    pub fn api_key_var(&self) -> &'static str {
        match self {
            LlmProvider::Gemini => "GEMINI_API_KEY",
            LlmProvider::Groq => "GROQ_API_KEY",
            LlmProvider::Anthropic => "ANTHROPIC_API_KEY",
        }
    }

    fn default_base_url(&self) -> &'static str {
        match self {
            LlmProvider::Gemini => GEMINI_BASE_URL,
            LlmProvider::Groq => GROQ_BASE_URL,
            LlmProvider::Anthropic => ANTHROPIC_BASE_URL,
        }
    }
}

impl FromStr for LlmProvider {
    type Err = LlmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gemini" => Ok(LlmProvider::Gemini),
            "groq" => Ok(LlmProvider::Groq),
            "anthropic" | "claude" => Ok(LlmProvider::Anthropic),
            other => Err(LlmError::UnknownProvider(other.to_string())),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Provider wire types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct GeminiRequest<'a> {
    contents: Vec<GeminiContentIn<'a>>,
    #[serde(rename = "generationConfig")]
    generation_config: GeminiGenerationConfig,
}

#[derive(Debug, Serialize)]
struct GeminiContentIn<'a> {
    parts: Vec<GeminiPartIn<'a>>,
}

#[derive(Debug, Serialize)]
struct GeminiPartIn<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct GeminiGenerationConfig {
    temperature: f32,
    #[serde(rename = "maxOutputTokens")]
    max_output_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: GeminiContentOut,
}

#[derive(Debug, Deserialize)]
struct GeminiContentOut {
    #[serde(default)]
    parts: Vec<GeminiPartOut>,
}

#[derive(Debug, Deserialize)]
struct GeminiPartOut {
    text: Option<String>,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Serialize)]
struct AnthropicRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    system: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Deserialize)]
struct AnthropicResponse {
    content: Vec<ContentBlock>,
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    block_type: String,
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    input_tokens: u32,
    output_tokens: u32,
}

/// `{"error": {"message": ...}}` — shared by all three providers.
#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Client
// ────────────────────────────────────────────────────────────────────────────

/// Production text generator. Cheap to clone; shares one connection pool.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    provider: LlmProvider,
    api_key: String,
    base_url: String,
}

impl LlmClient {
    pub fn new(provider: LlmProvider, api_key: String, timeout: Duration) -> Result<Self, LlmError> {
        Self::with_base_url(provider, api_key, timeout, provider.default_base_url())
    }

    /// Points the client at a different host (tests, proxies).
    pub fn with_base_url(
        provider: LlmProvider,
        api_key: String,
        timeout: Duration,
        base_url: &str,
    ) -> Result<Self, LlmError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            provider,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn call_gemini(&self, prompt: &str) -> Result<String, LlmError> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, GEMINI_MODEL
        );
        let body = GeminiRequest {
            contents: vec![GeminiContentIn {
                parts: vec![GeminiPartIn { text: prompt }],
            }],
            generation_config: GeminiGenerationConfig {
                temperature: TEMPERATURE,
                max_output_tokens: MAX_TOKENS,
            },
        };

        let response = self
            .client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await?;
        let text = read_success_body(response).await?;

        let parsed: GeminiResponse = serde_json::from_str(&text)?;
        parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().find_map(|p| p.text))
            .ok_or(LlmError::EmptyContent)
    }

    async fn call_groq(&self, prompt: &str) -> Result<String, LlmError> {
        let url = format!("{}/openai/v1/chat/completions", self.base_url);
        let body = ChatRequest {
            model: GROQ_MODEL,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;
        let text = read_success_body(response).await?;

        let parsed: ChatResponse = serde_json::from_str(&text)?;
        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or(LlmError::EmptyContent)
    }

    async fn call_anthropic(&self, prompt: &str) -> Result<String, LlmError> {
        let url = format!("{}/v1/messages", self.base_url);
        let body = AnthropicRequest {
            model: ANTHROPIC_MODEL,
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
            system: prompts::JSON_ONLY_SYSTEM,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
        };

        let response = self
            .client
            .post(&url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&body)
            .send()
            .await?;
        let text = read_success_body(response).await?;

        let parsed: AnthropicResponse = serde_json::from_str(&text)?;
        if let Some(usage) = &parsed.usage {
            debug!(
                "Anthropic call succeeded: input_tokens={}, output_tokens={}",
                usage.input_tokens, usage.output_tokens
            );
        }
        parsed
            .content
            .into_iter()
            .find(|b| b.block_type == "text")
            .and_then(|b| b.text)
            .ok_or(LlmError::EmptyContent)
    }
}

#[async_trait]
impl TextGenerator for LlmClient {
    async fn complete(&self, prompt: &str) -> Result<String, LlmError> {
        let text = match self.provider {
            LlmProvider::Gemini => self.call_gemini(prompt).await?,
            LlmProvider::Groq => self.call_groq(prompt).await?,
            LlmProvider::Anthropic => self.call_anthropic(prompt).await?,
        };

        if text.trim().is_empty() {
            return Err(LlmError::EmptyContent);
        }
        debug!(
            "{} returned {} chars",
            self.provider.as_str(),
            text.chars().count()
        );
        Ok(text)
    }

    fn provider_name(&self) -> &str {
        self.provider.as_str()
    }
}

/// Returns the body of a 2xx response, or an `LlmError::Api` carrying the
/// provider's error message.
async fn read_success_body(response: reqwest::Response) -> Result<String, LlmError> {
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        warn!("LLM API returned {}: {}", status, body);
        let message = serde_json::from_str::<ApiErrorEnvelope>(&body)
            .map(|e| e.error.message)
            .unwrap_or(body);
        return Err(LlmError::Api {
            status: status.as_u16(),
            message,
        });
    }

    Ok(body)
}

// ────────────────────────────────────────────────────────────────────────────
// Structured output
// ────────────────────────────────────────────────────────────────────────────

/// Marker stored in `ParseFailure::error`.
pub const PARSE_FAILED: &str = "parse_failed";

/// Raw model output that did not match the requested JSON schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParseFailure {
    pub error: String,
    pub raw: String,
}

/// Result of interpreting generator text as a JSON document of type `T`.
///
/// Serialized untagged: either the document itself or
/// `{"error": "parse_failed", "raw": "..."}`.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum LlmOutput<T> {
    Parsed(T),
    ParseFailed(ParseFailure),
}

impl<T> LlmOutput<T> {
    pub fn parsed(&self) -> Option<&T> {
        match self {
            LlmOutput::Parsed(value) => Some(value),
            LlmOutput::ParseFailed(_) => None,
        }
    }

    pub fn is_parse_failure(&self) -> bool {
        matches!(self, LlmOutput::ParseFailed(_))
    }
}

/// Deserializes model output as JSON, tolerating markdown code fences.
/// Anything unparseable comes back as `ParseFailed` with the untouched text.
pub fn parse_llm_json<T: DeserializeOwned>(raw: &str) -> LlmOutput<T> {
    match serde_json::from_str::<T>(strip_json_fences(raw)) {
        Ok(value) => LlmOutput::Parsed(value),
        Err(e) => {
            warn!("LLM output did not match the expected JSON schema: {e}");
            LlmOutput::ParseFailed(ParseFailure {
                error: PARSE_FAILED.to_string(),
                raw: raw.to_string(),
            })
        }
    }
}

/// Strips ```json ... ``` or ``` ... ``` code fences from LLM output.
fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    if let Some(stripped) = text.strip_prefix("```json") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else if let Some(stripped) = text.strip_prefix("```") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else {
        text
    }
}
