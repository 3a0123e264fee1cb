use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::brand::DEFAULT_BRAND_ID;

pub const DEFAULT_PLATFORM: &str = "instagram";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PostStatus {
    #[default]
    Scheduled,
    Published,
    Draft,
}

impl PostStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PostStatus::Scheduled => "scheduled",
            PostStatus::Published => "published",
            PostStatus::Draft => "draft",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "scheduled" => Some(PostStatus::Scheduled),
            "published" => Some(PostStatus::Published),
            "draft" => Some(PostStatus::Draft),
            _ => None,
        }
    }
}

/// A post on the content calendar. Append-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduledPost {
    pub id: Uuid,
    pub content: String,
    pub platform: String,
    pub scheduled_time: DateTime<Utc>,
    pub brand_id: String,
    pub resonance_score: f64,
    pub image_style: String,
    pub hashtags: Vec<String>,
    pub status: PostStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ScheduleRequest {
    pub content: String,
    pub platform: Option<String>,
    pub scheduled_time: Option<String>,
    pub brand_id: Option<String>,
    pub resonance_score: Option<f64>,
    pub image_style: String,
    pub hashtags: Vec<String>,
    pub status: Option<PostStatus>,
}

impl ScheduleRequest {
    /// Validates the request and builds the record to append.
    pub fn into_post(self, now: DateTime<Utc>) -> Result<ScheduledPost, String> {
        let content = self.content.trim().to_string();
        if content.is_empty() {
            return Err("content cannot be empty".to_string());
        }

        let scheduled_time = match self.scheduled_time.as_deref().map(str::trim) {
            Some(raw) if !raw.is_empty() => parse_schedule_time(raw)
                .ok_or_else(|| format!("scheduled_time '{raw}' is not a valid ISO datetime"))?,
            _ => return Err("scheduled_time is required".to_string()),
        };

        let resonance_score = self.resonance_score.unwrap_or(0.0);
        if !(0.0..=100.0).contains(&resonance_score) {
            return Err("resonance_score must be between 0 and 100".to_string());
        }

        Ok(ScheduledPost {
            id: Uuid::new_v4(),
            content,
            platform: non_blank_or(self.platform, DEFAULT_PLATFORM),
            scheduled_time,
            brand_id: non_blank_or(self.brand_id, DEFAULT_BRAND_ID),
            resonance_score,
            image_style: self.image_style,
            hashtags: self
                .hashtags
                .into_iter()
                .map(|h| h.trim().to_string())
                .filter(|h| !h.is_empty())
                .collect(),
            status: self.status.unwrap_or_default(),
            created_at: now,
        })
    }
}

/// Accepts RFC 3339 or a naive `YYYY-MM-DDTHH:MM[:SS]` (read as UTC).
pub fn parse_schedule_time(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
}

fn non_blank_or(value: Option<String>, fallback: &str) -> String {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| fallback.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(json: serde_json::Value) -> ScheduleRequest {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn test_defaults_applied() {
        let post = request(serde_json::json!({
            "content": "Launch day!",
            "scheduled_time": "2026-11-02T09:30:00Z"
        }))
        .into_post(Utc::now())
        .unwrap();

        assert_eq!(post.platform, "instagram");
        assert_eq!(post.brand_id, "default");
        assert_eq!(post.status, PostStatus::Scheduled);
        assert_eq!(post.resonance_score, 0.0);
    }

    #[test]
    fn test_blank_content_rejected() {
        let err = request(serde_json::json!({
            "content": "   ",
            "scheduled_time": "2026-11-02T09:30:00Z"
        }))
        .into_post(Utc::now())
        .unwrap_err();
        assert!(err.contains("content"));
    }

    #[test]
    fn test_out_of_range_score_rejected() {
        let err = request(serde_json::json!({
            "content": "Hi",
            "scheduled_time": "2026-11-02T09:30",
            "resonance_score": 140.0
        }))
        .into_post(Utc::now())
        .unwrap_err();
        assert!(err.contains("resonance_score"));
    }

    #[test]
    fn test_parse_schedule_time_formats() {
        let rfc = parse_schedule_time("2026-11-02T09:30:00+02:00").unwrap();
        assert_eq!(rfc.to_rfc3339(), "2026-11-02T07:30:00+00:00");

        let local = parse_schedule_time("2026-11-02T09:30").unwrap();
        assert_eq!(local.to_rfc3339(), "2026-11-02T09:30:00+00:00");

        assert!(parse_schedule_time("next tuesday").is_none());
    }

    #[test]
    fn test_status_round_trips_through_str() {
        for status in [PostStatus::Scheduled, PostStatus::Published, PostStatus::Draft] {
            assert_eq!(PostStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(PostStatus::parse("archived"), None);
    }
}
