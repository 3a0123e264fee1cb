// Prompt templates for the content studio.
// Placeholders are filled in one pass by `fill_template`; every template
// closes with llm_client::prompts::RETURN_JSON_ONLY followed by its schema.

use crate::llm_client::prompts::RETURN_JSON_ONLY;
use crate::models::brand::BrandDna;
use crate::models::post::truncate_chars;
use crate::resonance::ranking::RankedPost;

pub const IDEATION_SNIPPET_CHARS: usize = 100;
pub const REFERENCE_SNIPPET_CHARS: usize = 150;

const NO_HISTORY: &str = "No historical data yet.";

/// Ideation prompt. Replace: {mission}, {tone}, {banned_words}, {focus_area},
/// {reference_posts}, {return_json}
pub const IDEATION_PROMPT_TEMPLATE: &str = r#"You are a creative strategist for a brand.

Brand Mission: {mission}
Brand Tone: {tone}
{banned_words}Focus Area: {focus_area}

Top emotionally resonating posts:
{reference_posts}

Generate exactly 5 content ideas for social media. {return_json}
{
  "ideas": [
    {
      "id": "1",
      "title": "<short title>",
      "hook": "<compelling opening line>",
      "angle": "<emotional angle e.g. Vulnerability, Authority, Community>",
      "platform": "<Instagram|LinkedIn|Both>",
      "predicted_ers": <integer 40-90>
    }
  ]
}"#;

/// Post drafting prompt. Replace: {idea_title}, {idea_hook}, {angle},
/// {platform}, {mission}, {tone}, {banned_words}, {reference_posts}, {return_json}
pub const DRAFT_PROMPT_TEMPLATE: &str = r#"You are a brand copywriter. Write a social media post.

Idea: {idea_title}
Opening hook: {idea_hook}
Emotional angle: {angle}
Platform: {platform}
Brand Mission: {mission}
Tone: {tone}
{banned_words}
Reference our top emotionally resonant posts:
{reference_posts}

{return_json}
{
  "post_text": "<full post text, platform-appropriate length>",
  "hashtags": ["<tag1>", "<tag2>", "<tag3>"],
  "image_style_prompt": "<a 1-sentence prompt describing the ideal image style for this post>",
  "cta": "<call to action line>",
  "word_count": <integer>
}"#;

/// Draft analysis prompt. Replace: {reference_posts}, {draft},
/// {banned_warning}, {banned_words_json}, {return_json}
pub const ANALYSIS_PROMPT_TEMPLATE: &str = r#"You are an Emotional Alignment Checker for a brand's social media content.

Brand's top resonating posts:
{reference_posts}

Draft to analyze: {draft}
{banned_warning}
{return_json}
{
  "resonance_score": <integer 0-100>,
  "verdict": "<STRONG_MATCH|GOOD_MATCH|WEAK_MATCH|MISMATCH>",
  "emotional_archetype": "<detected archetype>",
  "what_works": "<1-2 sentences>",
  "what_is_missing": "<1-2 sentences>",
  "missing_signals": ["<signal1>", "<signal2>", "<signal3>"],
  "rewrite_suggestion": "<rewritten version under 280 chars>",
  "banned_words_found": {banned_words_json},
  "confidence": "<HIGH|MEDIUM|LOW>"
}"#;

/// Topic variations prompt. Replace: {reference_posts}, {banned_words},
/// {topic}, {return_json}
pub const VARIATIONS_PROMPT_TEMPLATE: &str = r#"Brand's highest ERS posts:
{reference_posts}

{banned_words}Write 3 post variations about: "{topic}"
{return_json}
{
  "archetype_detected": "<archetype>",
  "variations": [
    {"text": "<post>", "emotional_angle": "<angle>", "predicted_ers": <int>},
    {"text": "<post>", "emotional_angle": "<angle>", "predicted_ers": <int>},
    {"text": "<post>", "emotional_angle": "<angle>", "predicted_ers": <int>}
  ]
}"#;

// ────────────────────────────────────────────────────────────────────────────
// Builders
// ────────────────────────────────────────────────────────────────────────────

/// Substitutes `{name}` placeholders in a single left-to-right pass.
///
/// Substituted values are never rescanned, so brand or user text containing
/// `{mission}` or similar comes through verbatim. Braces that do not name a
/// known placeholder (the JSON schemas) are copied as is.
fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let tail = &rest[start..];
        let hit = tail[1..].find('}').and_then(|end| {
            let name = &tail[1..=end];
            values
                .iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| (*value, end + 2))
        });
        match hit {
            Some((value, consumed)) => {
                out.push_str(value);
                rest = &tail[consumed..];
            }
            None => {
                out.push('{');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

fn mission(brand: Option<&BrandDna>) -> &str {
    brand
        .map(|b| b.mission.trim())
        .filter(|m| !m.is_empty())
        .unwrap_or("Not defined")
}

fn tone(brand: Option<&BrandDna>) -> String {
    match brand {
        Some(b) if !b.tone_descriptors.is_empty() => b.tone_descriptors.join(", "),
        _ => "Not defined".to_string(),
    }
}

/// A "never use" line ending in a newline, or nothing when the list is empty.
fn banned_words_line(brand: Option<&BrandDna>) -> String {
    match brand {
        Some(b) if !b.banned_words.is_empty() => {
            format!("NEVER use these words: {}\n", b.banned_words.join(", "))
        }
        _ => String::new(),
    }
}

fn or_no_history(lines: Vec<String>, separator: &str) -> String {
    if lines.is_empty() {
        NO_HISTORY.to_string()
    } else {
        lines.join(separator)
    }
}

pub fn build_ideation_prompt(
    brand: Option<&BrandDna>,
    focus_area: &str,
    references: &[RankedPost],
) -> String {
    let posts = references
        .iter()
        .map(|p| format!("- {}", truncate_chars(&p.text, IDEATION_SNIPPET_CHARS)))
        .collect();

    fill_template(
        IDEATION_PROMPT_TEMPLATE,
        &[
            ("mission", mission(brand)),
            ("tone", tone(brand).as_str()),
            ("banned_words", banned_words_line(brand).as_str()),
            ("reference_posts", or_no_history(posts, "\n").as_str()),
            ("return_json", RETURN_JSON_ONLY),
            ("focus_area", focus_area),
        ],
    )
}

/// The idea a post draft is written from.
pub struct DraftBrief<'a> {
    pub idea_title: &'a str,
    pub idea_hook: &'a str,
    pub angle: &'a str,
    pub platform: &'a str,
}

pub fn build_draft_prompt(
    brief: &DraftBrief<'_>,
    brand: Option<&BrandDna>,
    references: &[RankedPost],
) -> String {
    let posts = references
        .iter()
        .map(|p| {
            format!(
                "[ERS Top Post]: {}",
                truncate_chars(&p.text, REFERENCE_SNIPPET_CHARS)
            )
        })
        .collect();

    fill_template(
        DRAFT_PROMPT_TEMPLATE,
        &[
            ("idea_title", brief.idea_title),
            ("idea_hook", brief.idea_hook),
            ("angle", brief.angle),
            ("platform", brief.platform),
            ("mission", mission(brand)),
            ("tone", tone(brand).as_str()),
            ("banned_words", banned_words_line(brand).as_str()),
            ("reference_posts", or_no_history(posts, "\n").as_str()),
            ("return_json", RETURN_JSON_ONLY),
        ],
    )
}

/// `found_banned` are the banned words already detected in the draft.
pub fn build_analysis_prompt(draft: &str, references: &[RankedPost], found_banned: &[String]) -> String {
    let posts = references
        .iter()
        .enumerate()
        .map(|(i, p)| {
            format!(
                "[Post {} | ERS: {:.1}]\n{}",
                i + 1,
                p.ers,
                truncate_chars(&p.text, REFERENCE_SNIPPET_CHARS)
            )
        })
        .collect();

    let banned_warning = if found_banned.is_empty() {
        String::new()
    } else {
        format!("BANNED WORDS FOUND: {}\n", found_banned.join(", "))
    };
    let banned_json = serde_json::to_string(found_banned).unwrap_or_else(|_| "[]".to_string());

    fill_template(
        ANALYSIS_PROMPT_TEMPLATE,
        &[
            ("reference_posts", or_no_history(posts, "\n\n").as_str()),
            ("banned_warning", banned_warning.as_str()),
            ("return_json", RETURN_JSON_ONLY),
            ("banned_words_json", banned_json.as_str()),
            ("draft", draft),
        ],
    )
}

pub fn build_variations_prompt(
    topic: &str,
    brand: Option<&BrandDna>,
    references: &[RankedPost],
) -> String {
    let posts = references
        .iter()
        .map(|p| {
            format!(
                "[ERS:{:.1}] {}",
                p.ers,
                truncate_chars(&p.text, REFERENCE_SNIPPET_CHARS)
            )
        })
        .collect();

    fill_template(
        VARIATIONS_PROMPT_TEMPLATE,
        &[
            ("reference_posts", or_no_history(posts, "\n").as_str()),
            ("banned_words", banned_words_line(brand).as_str()),
            ("return_json", RETURN_JSON_ONLY),
            ("topic", topic),
        ],
    )
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use uuid::Uuid;

    use super::*;

    fn brand(banned: &[&str]) -> BrandDna {
        BrandDna {
            id: Uuid::new_v4(),
            brand_id: "default".to_string(),
            brand_name: "Northwind Coffee".to_string(),
            mission: "Make mornings kinder".to_string(),
            tone_descriptors: vec!["warm".to_string(), "witty".to_string()],
            banned_words: banned.iter().map(|s| s.to_string()).collect(),
            hex_colors: vec![],
            typography: String::new(),
            logo_url: String::new(),
            updated_at: Utc::now(),
        }
    }

    fn reference(text: &str, ers: f64) -> RankedPost {
        RankedPost {
            id: "post_0".to_string(),
            text: text.to_string(),
            platform: "instagram".to_string(),
            ers,
            semantic_sim: 0.5,
            combined: 0.5,
        }
    }

    #[test]
    fn test_ideation_prompt_interpolates_brand_and_posts() {
        let long = "a".repeat(300);
        let prompt = build_ideation_prompt(
            Some(&brand(&["cheap"])),
            "behind the scenes",
            &[reference(&long, 40.0)],
        );

        assert!(prompt.contains("Brand Mission: Make mornings kinder"));
        assert!(prompt.contains("Brand Tone: warm, witty"));
        assert!(prompt.contains("NEVER use these words: cheap"));
        assert!(prompt.contains("Focus Area: behind the scenes"));
        assert!(prompt.contains(&format!("- {}\n", "a".repeat(100))));
        assert!(!prompt.contains(&"a".repeat(101)));
        assert!(prompt.contains("\"ideas\""));
        assert!(!prompt.contains("{focus_area}"));
    }

    #[test]
    fn test_prompts_without_brand_or_history() {
        let prompt = build_ideation_prompt(None, "general brand storytelling", &[]);
        assert!(prompt.contains("Brand Mission: Not defined"));
        assert!(prompt.contains(NO_HISTORY));
        assert!(!prompt.contains("NEVER use"));
    }

    #[test]
    fn test_draft_prompt_carries_brief_and_schema() {
        let brief = DraftBrief {
            idea_title: "Roaster diaries",
            idea_hook: "At 4am the beans talk back.",
            angle: "Vulnerability",
            platform: "LinkedIn",
        };
        let prompt = build_draft_prompt(&brief, Some(&brand(&["synergy"])), &[reference("Our roaster", 50.0)]);

        assert!(prompt.contains("Idea: Roaster diaries"));
        assert!(prompt.contains("Opening hook: At 4am the beans talk back."));
        assert!(prompt.contains("Platform: LinkedIn"));
        assert!(prompt.contains("NEVER use these words: synergy"));
        assert!(prompt.contains("[ERS Top Post]: Our roaster"));
        assert!(prompt.contains("\"image_style_prompt\""));
        assert!(prompt.contains(RETURN_JSON_ONLY));
    }

    #[test]
    fn test_analysis_prompt_surfaces_found_banned_words() {
        let prompt = build_analysis_prompt(
            "This is Awesome coffee",
            &[reference("Morning ritual", 42.0)],
            &["awesome".to_string()],
        );
        assert!(prompt.contains("[Post 1 | ERS: 42.0]\nMorning ritual"));
        assert!(prompt.contains("BANNED WORDS FOUND: awesome"));
        assert!(prompt.contains(r#""banned_words_found": ["awesome"]"#));
        assert!(prompt.contains("Draft to analyze: This is Awesome coffee"));
    }

    #[test]
    fn test_draft_brief_placeholders_are_kept_verbatim() {
        let brief = DraftBrief {
            idea_title: "Why we wrote {mission} on the wall",
            idea_hook: "See {idea_title} and {reference_posts}",
            angle: "Humor",
            platform: "Instagram",
        };
        let prompt = build_draft_prompt(&brief, None, &[]);

        assert!(prompt.contains("Idea: Why we wrote {mission} on the wall"));
        assert!(prompt.contains("Opening hook: See {idea_title} and {reference_posts}"));
        assert!(prompt.contains("Brand Mission: Not defined"));
    }

    #[test]
    fn test_fill_template_leaves_unknown_braces() {
        let filled = fill_template(r#"{"a": {x}, "b": {y} {"#, &[("x", "{y}"), ("y", "2")]);
        assert_eq!(filled, r#"{"a": {y}, "b": 2 {"#);
    }

    #[test]
    fn test_user_text_is_not_reinterpreted_as_placeholder() {
        let prompt = build_variations_prompt("why {reference_posts} matter", None, &[]);
        assert!(prompt.contains("Write 3 post variations about: \"why {reference_posts} matter\""));
    }
}
