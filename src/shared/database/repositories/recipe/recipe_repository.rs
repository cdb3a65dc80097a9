use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use std::collections::HashMap;
use uuid::Uuid;

use crate::domains::ingredient::models::Ingredient;
use crate::domains::recipe::models::{
    GeneratedRecipe, Measure, StoredRecipe, StoredRecipeIngredient,
};

/// 저장 레시피 저장소 인터페이스
/// Durable recipe storage seam. Slugs are unique per user.
#[async_trait]
pub trait RecipeStore: Send + Sync {
    async fn exists(&self, user_id: Uuid, slug: &str) -> Result<bool>;

    /// 레시피 + 재료 연결을 한 트랜잭션으로 저장
    /// Persist the recipe row and all ingredient associations atomically.
    /// Returns `None` if the user already has a recipe under this slug.
    async fn save(
        &self,
        user_id: Uuid,
        slug: &str,
        recipe: &GeneratedRecipe,
    ) -> Result<Option<StoredRecipe>>;

    async fn find_by_slug(&self, user_id: Uuid, slug: &str) -> Result<Option<StoredRecipe>>;

    /// 최신순
    async fn find_all(&self, user_id: Uuid) -> Result<Vec<StoredRecipe>>;
}

/// PostgreSQL 레시피 저장소
pub struct RecipeRepository {
    pool: PgPool,
}

impl RecipeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn ingredients_of(
        &self,
        user_id: Uuid,
        slug: Option<&str>,
    ) -> Result<HashMap<String, Vec<StoredRecipeIngredient>>> {
        let rows = sqlx::query(
            r#"
            SELECT ri.recipe_slug, ri.ingredient_slug, i.name, ri.quantity, ri.measure
            FROM recipe_ingredients ri
            JOIN ingredients i ON i.slug = ri.ingredient_slug
            WHERE ri.user_id = $1
              AND ($2::VARCHAR IS NULL OR ri.recipe_slug = $2)
            ORDER BY ri.recipe_slug, ri.position
            "#,
        )
        .bind(user_id)
        .bind(slug)
        .fetch_all(&self.pool)
        .await
        .context("Failed to fetch recipe ingredients")?;

        let mut grouped: HashMap<String, Vec<StoredRecipeIngredient>> = HashMap::new();
        for row in rows {
            let measure: String = row.get("measure");
            let measure = Measure::parse(&measure)
                .ok_or_else(|| anyhow!("Unknown measure in storage: {}", measure))?;

            grouped
                .entry(row.get("recipe_slug"))
                .or_default()
                .push(StoredRecipeIngredient {
                    ingredient_slug: row.get("ingredient_slug"),
                    name: row.get("name"),
                    quantity: row.get("quantity"),
                    measure,
                });
        }

        Ok(grouped)
    }
}

fn recipe_from_row(
    row: &PgRow,
    ingredients: Vec<StoredRecipeIngredient>,
) -> StoredRecipe {
    StoredRecipe {
        slug: row.get("slug"),
        name: row.get("name"),
        country: row.get("country"),
        time_in_minutes: row.get::<i32, _>("time_in_minutes").max(0) as u32,
        steps: row.get("steps"),
        user_id: row.get("user_id"),
        ingredients,
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

#[async_trait]
impl RecipeStore for RecipeRepository {
    async fn exists(&self, user_id: Uuid, slug: &str) -> Result<bool> {
        let row = sqlx::query(
            "SELECT EXISTS(SELECT 1 FROM recipes WHERE user_id = $1 AND slug = $2) AS found",
        )
        .bind(user_id)
        .bind(slug)
        .fetch_one(&self.pool)
        .await
        .context("Failed to check recipe existence")?;

        Ok(row.get("found"))
    }

    async fn save(
        &self,
        user_id: Uuid,
        slug: &str,
        recipe: &GeneratedRecipe,
    ) -> Result<Option<StoredRecipe>> {
        let mut tx = self
            .pool
            .begin()
            .await
            .context("Failed to begin recipe transaction")?;

        let now = Utc::now();

        // 1. 레시피 행 (이미 있으면 중단, tx drop 시 롤백)
        let row = sqlx::query(
            r#"
            INSERT INTO recipes (user_id, slug, name, country, time_in_minutes, steps, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $7)
            ON CONFLICT (user_id, slug) DO NOTHING
            RETURNING user_id, slug, name, country, time_in_minutes, steps, created_at, updated_at
            "#,
        )
        .bind(user_id)
        .bind(slug)
        .bind(&recipe.recipe_name)
        .bind(&recipe.country)
        .bind(recipe.time_in_minutes.min(i32::MAX as u32) as i32)
        .bind(&recipe.steps)
        .bind(now)
        .fetch_optional(&mut tx)
        .await
        .context("Failed to insert recipe")?;

        let row = match row {
            Some(r) => r,
            None => return Ok(None),
        };

        // 2. 재료 카탈로그 upsert + 연결 행
        let mut ingredients = Vec::with_capacity(recipe.ingredients.len());
        for (position, item) in recipe.ingredients.iter().enumerate() {
            let ingredient = Ingredient::from_name(&item.name);

            sqlx::query(
                "INSERT INTO ingredients (slug, name) VALUES ($1, $2) ON CONFLICT (slug) DO NOTHING",
            )
            .bind(&ingredient.slug)
            .bind(&ingredient.name)
            .execute(&mut tx)
            .await
            .context("Failed to upsert ingredient")?;

            sqlx::query(
                r#"
                INSERT INTO recipe_ingredients (user_id, recipe_slug, ingredient_slug, position, quantity, measure)
                VALUES ($1, $2, $3, $4, $5, $6)
                "#,
            )
            .bind(user_id)
            .bind(slug)
            .bind(&ingredient.slug)
            .bind(position as i32)
            .bind(item.quantity)
            .bind(item.measure.as_str())
            .execute(&mut tx)
            .await
            .context("Failed to insert recipe ingredient")?;

            ingredients.push(StoredRecipeIngredient {
                ingredient_slug: ingredient.slug,
                name: ingredient.name,
                quantity: item.quantity,
                measure: item.measure,
            });
        }

        let stored = recipe_from_row(&row, ingredients);

        tx.commit().await.context("Failed to commit recipe")?;

        Ok(Some(stored))
    }

    async fn find_by_slug(&self, user_id: Uuid, slug: &str) -> Result<Option<StoredRecipe>> {
        let row = sqlx::query(
            r#"
            SELECT user_id, slug, name, country, time_in_minutes, steps, created_at, updated_at
            FROM recipes
            WHERE user_id = $1 AND slug = $2
            "#,
        )
        .bind(user_id)
        .bind(slug)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch recipe")?;

        let row = match row {
            Some(r) => r,
            None => return Ok(None),
        };

        let mut ingredients = self.ingredients_of(user_id, Some(slug)).await?;
        Ok(Some(recipe_from_row(
            &row,
            ingredients.remove(slug).unwrap_or_default(),
        )))
    }

    async fn find_all(&self, user_id: Uuid) -> Result<Vec<StoredRecipe>> {
        let rows = sqlx::query(
            r#"
            SELECT user_id, slug, name, country, time_in_minutes, steps, created_at, updated_at
            FROM recipes
            WHERE user_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .context("Failed to fetch recipes")?;

        let mut ingredients = self.ingredients_of(user_id, None).await?;

        Ok(rows
            .iter()
            .map(|row| {
                let slug: String = row.get("slug");
                recipe_from_row(row, ingredients.remove(&slug).unwrap_or_default())
            })
            .collect())
    }
}
