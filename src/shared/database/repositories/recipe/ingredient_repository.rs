use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::{PgPool, Row};

use crate::domains::ingredient::models::Ingredient;

/// 재료 카탈로그 조회 인터페이스
#[async_trait]
pub trait IngredientStore: Send + Sync {
    /// 이름순 전체 목록
    async fn find_all(&self) -> Result<Vec<Ingredient>>;
}

pub struct IngredientRepository {
    pool: PgPool,
}

impl IngredientRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl IngredientStore for IngredientRepository {
    async fn find_all(&self) -> Result<Vec<Ingredient>> {
        let rows = sqlx::query("SELECT slug, name FROM ingredients ORDER BY name")
            .fetch_all(&self.pool)
            .await
            .context("Failed to fetch ingredients")?;

        Ok(rows
            .iter()
            .map(|row| Ingredient {
                slug: row.get("slug"),
                name: row.get("name"),
            })
            .collect())
    }
}
