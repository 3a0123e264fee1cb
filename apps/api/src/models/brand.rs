use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

pub const DEFAULT_BRAND_ID: &str = "default";

/// A blank or missing brand id means the default brand.
pub fn resolve_brand_id(raw: Option<&str>) -> &str {
    match raw.map(str::trim) {
        Some(id) if !id.is_empty() => id,
        _ => DEFAULT_BRAND_ID,
    }
}

/// A brand's stored identity. One record per `brand_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct BrandDna {
    pub id: Uuid,
    pub brand_id: String,
    pub brand_name: String,
    pub mission: String,
    pub tone_descriptors: Vec<String>,
    pub banned_words: Vec<String>,
    pub hex_colors: Vec<String>,
    pub typography: String,
    pub logo_url: String,
    pub updated_at: DateTime<Utc>,
}

/// Upsert payload. Every field is optional on the wire.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct BrandDnaInput {
    pub brand_id: Option<String>,
    pub brand_name: String,
    pub mission: String,
    pub tone_descriptors: Vec<String>,
    pub banned_words: Vec<String>,
    pub hex_colors: Vec<String>,
    pub typography: String,
    pub logo_url: String,
}

impl BrandDnaInput {
    pub fn brand_id(&self) -> &str {
        resolve_brand_id(self.brand_id.as_deref())
    }

    /// Builds the record to store. `id` is kept when overwriting an existing brand.
    pub fn into_record(self, existing_id: Option<Uuid>) -> BrandDna {
        let brand_id = self.brand_id().to_string();
        BrandDna {
            id: existing_id.unwrap_or_else(Uuid::new_v4),
            brand_id,
            brand_name: self.brand_name,
            mission: self.mission,
            tone_descriptors: clean_list(self.tone_descriptors),
            banned_words: clean_list(self.banned_words),
            hex_colors: clean_list(self.hex_colors),
            typography: self.typography,
            logo_url: self.logo_url,
            updated_at: Utc::now(),
        }
    }
}

fn clean_list(items: Vec<String>) -> Vec<String> {
    items
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
