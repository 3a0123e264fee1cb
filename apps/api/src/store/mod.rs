//! Persistence for Brand DNA and the content calendar.
//!
//! Two backends implement [`ContentStore`]: PostgreSQL, and an in-process
//! fallback used when no database is configured. `main` picks one at startup
//! and hands it to the handlers through `AppState`.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::brand::{BrandDna, BrandDnaInput};
use crate::models::schedule::ScheduledPost;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("migration failed: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("corrupt row: {0}")]
    CorruptRow(String),
}

#[async_trait]
pub trait ContentStore: Send + Sync {
    async fn get_brand_dna(&self, brand_id: &str) -> Result<Option<BrandDna>, StoreError>;

    /// Creates the brand if absent, otherwise overwrites every field.
    /// The record id survives an overwrite.
    async fn upsert_brand_dna(&self, input: BrandDnaInput) -> Result<BrandDna, StoreError>;

    async fn insert_scheduled_post(&self, post: ScheduledPost) -> Result<ScheduledPost, StoreError>;

    /// Every post for `brand_id`, earliest `scheduled_time` first.
    async fn list_scheduled_posts(&self, brand_id: &str) -> Result<Vec<ScheduledPost>, StoreError>;

    /// Most recently created posts for `brand_id`, newest first.
    async fn recent_scheduled_posts(
        &self,
        brand_id: &str,
        limit: usize,
    ) -> Result<Vec<ScheduledPost>, StoreError>;

    fn backend_name(&self) -> &'static str;
}
