// Cross-cutting prompt fragments shared by every generation pipeline.
// Each use case keeps its own templates in studio::prompts.

/// System prompt that enforces JSON-only output (providers with a system slot).
pub const JSON_ONLY_SYSTEM: &str = "You are a precise, structured assistant. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Closing instruction appended to every user prompt.
pub const RETURN_JSON_ONLY: &str = "Return ONLY valid JSON, with no markdown fences and no commentary:";
