use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::models::brand::{BrandDna, BrandDnaInput};
use crate::models::schedule::{PostStatus, ScheduledPost};
use crate::store::{ContentStore, StoreError};

pub struct PgContentStore {
    pool: PgPool,
}

impl PgContentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct ScheduledPostRow {
    id: Uuid,
    content: String,
    platform: String,
    scheduled_time: DateTime<Utc>,
    brand_id: String,
    resonance_score: f64,
    image_style: String,
    hashtags: Vec<String>,
    status: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<ScheduledPostRow> for ScheduledPost {
    type Error = StoreError;

    fn try_from(row: ScheduledPostRow) -> Result<Self, Self::Error> {
        let status = PostStatus::parse(&row.status).ok_or_else(|| {
            StoreError::CorruptRow(format!("scheduled post {} has status '{}'", row.id, row.status))
        })?;
        Ok(ScheduledPost {
            id: row.id,
            content: row.content,
            platform: row.platform,
            scheduled_time: row.scheduled_time,
            brand_id: row.brand_id,
            resonance_score: row.resonance_score,
            image_style: row.image_style,
            hashtags: row.hashtags,
            status,
            created_at: row.created_at,
        })
    }
}

fn into_posts(rows: Vec<ScheduledPostRow>) -> Result<Vec<ScheduledPost>, StoreError> {
    rows.into_iter().map(ScheduledPost::try_from).collect()
}

const SCHEDULED_POST_COLUMNS: &str = "id, content, platform, scheduled_time, brand_id, \
     resonance_score, image_style, hashtags, status, created_at";

#[async_trait]
impl ContentStore for PgContentStore {
    async fn get_brand_dna(&self, brand_id: &str) -> Result<Option<BrandDna>, StoreError> {
        Ok(
            sqlx::query_as::<_, BrandDna>("SELECT * FROM brand_dna WHERE brand_id = $1")
                .bind(brand_id)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    async fn upsert_brand_dna(&self, input: BrandDnaInput) -> Result<BrandDna, StoreError> {
        // A fresh id is only used on insert; the conflict branch leaves `id` alone.
        let record = input.into_record(None);
        Ok(sqlx::query_as::<_, BrandDna>(
            r#"
            INSERT INTO brand_dna
                (id, brand_id, brand_name, mission, tone_descriptors, banned_words,
                 hex_colors, typography, logo_url, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            ON CONFLICT (brand_id) DO UPDATE SET
                brand_name = EXCLUDED.brand_name,
                mission = EXCLUDED.mission,
                tone_descriptors = EXCLUDED.tone_descriptors,
                banned_words = EXCLUDED.banned_words,
                hex_colors = EXCLUDED.hex_colors,
                typography = EXCLUDED.typography,
                logo_url = EXCLUDED.logo_url,
                updated_at = EXCLUDED.updated_at
            RETURNING *
            "#,
        )
        .bind(record.id)
        .bind(&record.brand_id)
        .bind(&record.brand_name)
        .bind(&record.mission)
        .bind(&record.tone_descriptors)
        .bind(&record.banned_words)
        .bind(&record.hex_colors)
        .bind(&record.typography)
        .bind(&record.logo_url)
        .bind(record.updated_at)
        .fetch_one(&self.pool)
        .await?)
    }

    async fn insert_scheduled_post(&self, post: ScheduledPost) -> Result<ScheduledPost, StoreError> {
        sqlx::query(
            r#"
            INSERT INTO scheduled_posts
                (id, content, platform, scheduled_time, brand_id, resonance_score,
                 image_style, hashtags, status, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(post.id)
        .bind(&post.content)
        .bind(&post.platform)
        .bind(post.scheduled_time)
        .bind(&post.brand_id)
        .bind(post.resonance_score)
        .bind(&post.image_style)
        .bind(&post.hashtags)
        .bind(post.status.as_str())
        .bind(post.created_at)
        .execute(&self.pool)
        .await?;
        Ok(post)
    }

    async fn list_scheduled_posts(&self, brand_id: &str) -> Result<Vec<ScheduledPost>, StoreError> {
        let rows = sqlx::query_as::<_, ScheduledPostRow>(&format!(
            "SELECT {SCHEDULED_POST_COLUMNS} FROM scheduled_posts \
             WHERE brand_id = $1 ORDER BY scheduled_time ASC"
        ))
        .bind(brand_id)
        .fetch_all(&self.pool)
        .await?;
        into_posts(rows)
    }

    async fn recent_scheduled_posts(
        &self,
        brand_id: &str,
        limit: usize,
    ) -> Result<Vec<ScheduledPost>, StoreError> {
        let rows = sqlx::query_as::<_, ScheduledPostRow>(&format!(
            "SELECT {SCHEDULED_POST_COLUMNS} FROM scheduled_posts \
             WHERE brand_id = $1 ORDER BY created_at DESC LIMIT $2"
        ))
        .bind(brand_id)
        .bind(i64::try_from(limit).unwrap_or(i64::MAX))
        .fetch_all(&self.pool)
        .await?;
        into_posts(rows)
    }

    fn backend_name(&self) -> &'static str {
        "postgres"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(status: &str) -> ScheduledPostRow {
        ScheduledPostRow {
            id: Uuid::new_v4(),
            content: "Launch".to_string(),
            platform: "linkedin".to_string(),
            scheduled_time: Utc::now(),
            brand_id: "default".to_string(),
            resonance_score: 71.5,
            image_style: "warm film".to_string(),
            hashtags: vec!["#launch".to_string()],
            status: status.to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_row_status_is_parsed() {
        let post = ScheduledPost::try_from(row("published")).unwrap();
        assert_eq!(post.status, PostStatus::Published);
        assert_eq!(post.hashtags, vec!["#launch".to_string()]);
    }

    #[test]
    fn test_unknown_status_is_corrupt() {
        assert!(matches!(
            ScheduledPost::try_from(row("archived")),
            Err(StoreError::CorruptRow(_))
        ));
    }
}
