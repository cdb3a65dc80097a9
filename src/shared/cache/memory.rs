use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use uuid::Uuid;

use super::RecipeCache;
use crate::domains::recipe::models::CachedRecipe;

#[derive(Default)]
struct CacheState {
    entries: HashMap<String, (CachedRecipe, Instant)>,
    attempts: HashMap<(Uuid, NaiveDate), u32>,
}

/// 메모리 레시피 캐시 (테스트용)
/// In-memory recipe cache for tests. Counters are keyed by day and never expire on their own.
#[derive(Clone, Default)]
pub struct InMemoryRecipeCache {
    state: Arc<Mutex<CacheState>>,
}

impl InMemoryRecipeCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attempts(&self, user_id: Uuid, day: NaiveDate) -> u32 {
        self.state
            .lock()
            .attempts
            .get(&(user_id, day))
            .copied()
            .unwrap_or(0)
    }

    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.state.lock().entries.keys().cloned().collect();
        keys.sort();
        keys
    }
}

#[async_trait]
impl RecipeCache for InMemoryRecipeCache {
    async fn insert_if_absent(
        &self,
        key: &str,
        entry: &CachedRecipe,
        ttl: Duration,
    ) -> Result<bool> {
        let mut state = self.state.lock();
        let now = Instant::now();

        if let Some((_, expires)) = state.entries.get(key) {
            if *expires > now {
                return Ok(false);
            }
        }

        state
            .entries
            .insert(key.to_string(), (entry.clone(), now + ttl));
        Ok(true)
    }

    async fn get(&self, key: &str) -> Result<Option<CachedRecipe>> {
        let state = self.state.lock();
        Ok(state
            .entries
            .get(key)
            .filter(|(_, expires)| *expires > Instant::now())
            .map(|(entry, _)| entry.clone()))
    }

    async fn reserve_attempt(
        &self,
        user_id: Uuid,
        day: NaiveDate,
        limit: u32,
        _expires_at: DateTime<Utc>,
    ) -> Result<Option<u32>> {
        let mut state = self.state.lock();
        let count = state.attempts.entry((user_id, day)).or_insert(0);

        if *count >= limit {
            return Ok(None);
        }
        *count += 1;
        Ok(Some(*count))
    }

    async fn release_attempt(&self, user_id: Uuid, day: NaiveDate) -> Result<()> {
        if let Some(count) = self.state.lock().attempts.get_mut(&(user_id, day)) {
            *count = count.saturating_sub(1);
        }
        Ok(())
    }
}
