use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use once_cell::sync::Lazy;
use redis::aio::ConnectionManager;
use redis::Script;
use std::time::Duration;
use uuid::Uuid;

use super::{quota_key, recipe_key, RecipeCache};
use crate::domains::recipe::models::CachedRecipe;

// 키가 있고 0보다 클 때만 DECR (만료된 키를 -1로 되살리지 않음, TTL 유지)
static RELEASE_ATTEMPT: Lazy<Script> = Lazy::new(|| {
    Script::new(
        r"
        local current = tonumber(redis.call('GET', KEYS[1]))
        if current and current > 0 then
            return redis.call('DECR', KEYS[1])
        end
        return 0
        ",
    )
});

/// Redis 기반 레시피 캐시
/// Redis-backed recipe cache. `ConnectionManager` reconnects on its own and is cheap to clone.
#[derive(Clone)]
pub struct RedisRecipeCache {
    conn: ConnectionManager,
}

impl RedisRecipeCache {
    pub async fn connect(url: &str) -> Result<Self> {
        let client = redis::Client::open(url).context("Invalid REDIS_URL")?;
        let conn = ConnectionManager::new(client)
            .await
            .context("Failed to connect to redis")?;

        tracing::info!("Connected to redis");
        Ok(Self { conn })
    }
}

#[async_trait]
impl RecipeCache for RedisRecipeCache {
    async fn insert_if_absent(
        &self,
        key: &str,
        entry: &CachedRecipe,
        ttl: Duration,
    ) -> Result<bool> {
        let payload = serde_json::to_string(entry).context("Failed to serialize cached recipe")?;
        let mut conn = self.conn.clone();

        // SET key value NX EX ttl -> "OK" 또는 nil
        let reply: Option<String> = redis::cmd("SET")
            .arg(recipe_key(key))
            .arg(payload)
            .arg("NX")
            .arg("EX")
            .arg(ttl.as_secs().max(1))
            .query_async(&mut conn)
            .await
            .context("Failed to write recipe cache entry")?;

        Ok(reply.is_some())
    }

    async fn get(&self, key: &str) -> Result<Option<CachedRecipe>> {
        let mut conn = self.conn.clone();

        let payload: Option<String> = redis::cmd("GET")
            .arg(recipe_key(key))
            .query_async(&mut conn)
            .await
            .context("Failed to read recipe cache entry")?;

        payload
            .map(|p| serde_json::from_str(&p).context("Corrupt recipe cache entry"))
            .transpose()
    }

    async fn reserve_attempt(
        &self,
        user_id: Uuid,
        day: NaiveDate,
        limit: u32,
        expires_at: DateTime<Utc>,
    ) -> Result<Option<u32>> {
        let key = quota_key(user_id, day);
        let mut conn = self.conn.clone();

        // INCR + EXPIREAT 를 MULTI/EXEC 로 함께 실행
        let (count,): (i64,) = redis::pipe()
            .atomic()
            .cmd("INCR")
            .arg(&key)
            .cmd("EXPIREAT")
            .arg(&key)
            .arg(expires_at.timestamp())
            .ignore()
            .query_async(&mut conn)
            .await
            .context("Failed to increment generation counter")?;

        if count > i64::from(limit) {
            let _: i64 = redis::cmd("DECR")
                .arg(&key)
                .query_async(&mut conn)
                .await
                .context("Failed to roll back generation counter")?;
            return Ok(None);
        }

        Ok(Some(count as u32))
    }

    async fn release_attempt(&self, user_id: Uuid, day: NaiveDate) -> Result<()> {
        let mut conn = self.conn.clone();

        let _: i64 = RELEASE_ATTEMPT
            .key(quota_key(user_id, day))
            .invoke_async(&mut conn)
            .await
            .context("Failed to release generation attempt")?;

        Ok(())
    }
}
