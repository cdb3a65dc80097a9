//! 레시피 캐시 + 일일 생성 횟수 카운터
//! Short-lived recipe staging area and per-user daily generation counters

pub mod memory;
pub mod redis_cache;

pub use memory::InMemoryRecipeCache;
pub use redis_cache::RedisRecipeCache;

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use std::time::Duration;
use uuid::Uuid;

use crate::domains::recipe::models::CachedRecipe;

#[async_trait]
pub trait RecipeCache: Send + Sync {
    /// 키가 비어 있을 때만 저장 (SET NX)
    /// Store the entry only if the key is free. Returns whether it was written.
    async fn insert_if_absent(&self, key: &str, entry: &CachedRecipe, ttl: Duration)
        -> Result<bool>;

    async fn get(&self, key: &str) -> Result<Option<CachedRecipe>>;

    /// 오늘 시도 횟수를 원자적으로 증가. 한도를 넘으면 되돌리고 `None`
    /// Atomically take one of today's attempts. Returns the new count, or `None`
    /// (with nothing consumed) once `limit` is reached. The counter lapses at `expires_at`.
    async fn reserve_attempt(
        &self,
        user_id: Uuid,
        day: NaiveDate,
        limit: u32,
        expires_at: DateTime<Utc>,
    ) -> Result<Option<u32>>;

    /// 실패한 생성의 시도 횟수 반환
    /// Give back an attempt taken by [`RecipeCache::reserve_attempt`].
    async fn release_attempt(&self, user_id: Uuid, day: NaiveDate) -> Result<()>;
}

pub(crate) fn recipe_key(slug: &str) -> String {
    format!("recipe:{}", slug)
}

pub(crate) fn quota_key(user_id: Uuid, day: NaiveDate) -> String {
    format!("quota:{}:{}", user_id, day.format("%Y-%m-%d"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quota_key_format() {
        let user_id = Uuid::nil();
        let day = NaiveDate::from_ymd_opt(2025, 3, 7).unwrap();
        assert_eq!(
            quota_key(user_id, day),
            "quota:00000000-0000-0000-0000-000000000000:2025-03-07"
        );
        assert_eq!(recipe_key("omelette"), "recipe:omelette");
    }
}
