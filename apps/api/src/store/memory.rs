use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::models::brand::{BrandDna, BrandDnaInput};
use crate::models::schedule::ScheduledPost;
use crate::store::{ContentStore, StoreError};

/// Process-local store. Contents are lost on restart.
#[derive(Default)]
pub struct InMemoryContentStore {
    brands: RwLock<HashMap<String, BrandDna>>,
    posts: RwLock<Vec<ScheduledPost>>,
}

impl InMemoryContentStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ContentStore for InMemoryContentStore {
    async fn get_brand_dna(&self, brand_id: &str) -> Result<Option<BrandDna>, StoreError> {
        Ok(self.brands.read().await.get(brand_id).cloned())
    }

    async fn upsert_brand_dna(&self, input: BrandDnaInput) -> Result<BrandDna, StoreError> {
        let mut brands = self.brands.write().await;
        let existing_id = brands.get(input.brand_id()).map(|b| b.id);
        let record = input.into_record(existing_id);
        brands.insert(record.brand_id.clone(), record.clone());
        Ok(record)
    }

    async fn insert_scheduled_post(&self, post: ScheduledPost) -> Result<ScheduledPost, StoreError> {
        self.posts.write().await.push(post.clone());
        Ok(post)
    }

    async fn list_scheduled_posts(&self, brand_id: &str) -> Result<Vec<ScheduledPost>, StoreError> {
        let mut posts: Vec<ScheduledPost> = self
            .posts
            .read()
            .await
            .iter()
            .filter(|p| p.brand_id == brand_id)
            .cloned()
            .collect();
        posts.sort_by_key(|p| p.scheduled_time);
        Ok(posts)
    }

    async fn recent_scheduled_posts(
        &self,
        brand_id: &str,
        limit: usize,
    ) -> Result<Vec<ScheduledPost>, StoreError> {
        // Append order is creation order, so walk it backwards.
        Ok(self
            .posts
            .read()
            .await
            .iter()
            .rev()
            .filter(|p| p.brand_id == brand_id)
            .take(limit)
            .cloned()
            .collect())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};
    use uuid::Uuid;

    use super::*;
    use crate::models::schedule::PostStatus;

    fn scheduled(content: &str, brand_id: &str, day: u32) -> ScheduledPost {
        ScheduledPost {
            id: Uuid::new_v4(),
            content: content.to_string(),
            platform: "instagram".to_string(),
            scheduled_time: Utc.with_ymd_and_hms(2026, 11, day, 9, 0, 0).unwrap(),
            brand_id: brand_id.to_string(),
            resonance_score: 50.0,
            image_style: String::new(),
            hashtags: vec![],
            status: PostStatus::Scheduled,
            created_at: Utc::now() + Duration::seconds(day as i64),
        }
    }

    #[tokio::test]
    async fn test_brand_dna_upsert_overwrites_and_keeps_id() {
        let store = InMemoryContentStore::new();
        assert!(store.get_brand_dna("default").await.unwrap().is_none());

        let first = store
            .upsert_brand_dna(BrandDnaInput {
                brand_name: "Acme".to_string(),
                banned_words: vec!["cheap".to_string()],
                ..Default::default()
            })
            .await
            .unwrap();

        let second = store
            .upsert_brand_dna(BrandDnaInput {
                brand_name: "Acme Co".to_string(),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(first.id, second.id);
        let stored = store.get_brand_dna("default").await.unwrap().unwrap();
        assert_eq!(stored.brand_name, "Acme Co");
        assert!(stored.banned_words.is_empty());
    }

    #[tokio::test]
    async fn test_calendar_is_per_brand_and_sorted_by_time() {
        let store = InMemoryContentStore::new();
        store.insert_scheduled_post(scheduled("late", "default", 20)).await.unwrap();
        store.insert_scheduled_post(scheduled("other brand", "acme", 1)).await.unwrap();
        store.insert_scheduled_post(scheduled("early", "default", 3)).await.unwrap();

        let contents: Vec<_> = store
            .list_scheduled_posts("default")
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.content)
            .collect();
        assert_eq!(contents, vec!["early", "late"]);
    }

    #[tokio::test]
    async fn test_recent_is_newest_first_and_limited() {
        let store = InMemoryContentStore::new();
        for (i, content) in ["one", "two", "three"].iter().enumerate() {
            store
                .insert_scheduled_post(scheduled(content, "default", i as u32 + 1))
                .await
                .unwrap();
        }

        let recent = store.recent_scheduled_posts("default", 2).await.unwrap();
        let contents: Vec<_> = recent.into_iter().map(|p| p.content).collect();
        assert_eq!(contents, vec!["three", "two"]);
    }
}
