use std::sync::Arc;
use std::time::Duration;

use anyhow::anyhow;
use chrono::{DateTime, Local, Utc};
use uuid::Uuid;
use validator::Validate;

use crate::domains::recipe::models::{
    CachedRecipe, GenerateRecipeRequest, GenerateRecipeResponse, GeneratedRecipe,
    RecipeListResponse, RecipeLookup, StoredRecipe,
};
use crate::domains::recipe::services::prompt_builder::{build_prompt, strip_code_fence};
use crate::shared::cache::RecipeCache;
use crate::shared::clients::RecipeGenerator;
use crate::shared::database::RecipeStore;
use crate::shared::errors::AppError;
use crate::shared::utils::slugify;

/// 같은 슬러그가 이미 캐시에 있을 때 시도할 최대 버전 수 (omelette, omelette-2, ...)
const MAX_SLUG_VERSIONS: u32 = 20;

#[derive(Debug, Clone)]
pub struct RecipeSettings {
    /// 사용자별 하루 생성 한도
    pub daily_limit: u32,
    pub cache_ttl: Duration,
}

impl Default for RecipeSettings {
    fn default() -> Self {
        Self {
            daily_limit: 5,
            cache_ttl: Duration::from_secs(24 * 60 * 60),
        }
    }
}

/// 레시피 생성 / 저장 / 조회 서비스
/// Recipe generation workflow plus the save and fetch paths
#[derive(Clone)]
pub struct RecipeService {
    cache: Arc<dyn RecipeCache>,
    recipes: Arc<dyn RecipeStore>,
    generator: Arc<dyn RecipeGenerator>,
    settings: RecipeSettings,
}

impl RecipeService {
    pub fn new(
        cache: Arc<dyn RecipeCache>,
        recipes: Arc<dyn RecipeStore>,
        generator: Arc<dyn RecipeGenerator>,
        settings: RecipeSettings,
    ) -> Self {
        Self {
            cache,
            recipes,
            generator,
            settings,
        }
    }

    /// 레시피 생성
    /// Generate a recipe: take one of today's attempts, call the model, clean and
    /// parse its output, then stage the result in the cache. A failed generation
    /// gives its attempt back.
    pub async fn generate(
        &self,
        user_id: Uuid,
        request: GenerateRecipeRequest,
    ) -> Result<GenerateRecipeResponse, AppError> {
        request.validate()?;
        if request.ingredients.is_empty() {
            return Err(AppError::Validation(
                "Validation error: ingredients: At least one ingredient is required".to_string(),
            ));
        }

        // 1. 오늘 시도 횟수 예약 (자정에 초기화)
        let now = Local::now();
        let day = now.date_naive();
        let limit = self.settings.daily_limit;

        let attempts = match self
            .cache
            .reserve_attempt(user_id, day, limit, next_local_midnight(now))
            .await?
        {
            Some(attempts) => attempts,
            None => {
                tracing::warn!(%user_id, limit, "Daily generation limit reached");
                return Err(AppError::MaxAttemptsReached);
            }
        };

        // 2. 생성 + 캐시 저장, 실패하면 시도 횟수 반환
        match self.generate_and_stage(user_id, &request).await {
            Ok((recipe, recipe_key)) => {
                tracing::info!(%user_id, %recipe_key, attempts, "Recipe generated");
                Ok(GenerateRecipeResponse {
                    final_result: recipe,
                    recipe_key,
                    today_attempts: attempts,
                    remaining_attempts: limit.saturating_sub(attempts),
                })
            }
            Err(e) => {
                if let Err(release_err) = self.cache.release_attempt(user_id, day).await {
                    tracing::warn!(%user_id, "Failed to release generation attempt: {:#}", release_err);
                }
                Err(e)
            }
        }
    }

    async fn generate_and_stage(
        &self,
        user_id: Uuid,
        request: &GenerateRecipeRequest,
    ) -> Result<(GeneratedRecipe, String), AppError> {
        let prompt = build_prompt(request)?;

        let raw = self.generator.generate(&prompt).await?;
        if raw.trim().is_empty() {
            return Err(AppError::unexpected("Empty AI response"));
        }

        let recipe: GeneratedRecipe = serde_json::from_str(strip_code_fence(&raw))
            .map_err(|e| AppError::Unexpected(anyhow!(e).context("AI response is not a valid recipe")))?;
        recipe
            .validate()
            .map_err(|e| AppError::Unexpected(anyhow!(e).context("AI response is not a valid recipe")))?;

        let key = self.stage(user_id, &recipe).await?;
        Ok((recipe, key))
    }

    /// 캐시에 저장하고 실제로 쓰인 키를 반환
    /// Write the recipe under the first free versioned slug and return that key
    async fn stage(&self, user_id: Uuid, recipe: &GeneratedRecipe) -> Result<String, AppError> {
        let mut base = slugify(&recipe.recipe_name);
        if base.is_empty() {
            base = "recipe".to_string();
        }

        let entry = CachedRecipe {
            recipe: recipe.clone(),
            user_id,
            requested_at: Utc::now(),
        };

        for version in 1..=MAX_SLUG_VERSIONS {
            let key = if version == 1 {
                base.clone()
            } else {
                format!("{}-{}", base, version)
            };

            if self
                .cache
                .insert_if_absent(&key, &entry, self.settings.cache_ttl)
                .await?
            {
                return Ok(key);
            }
        }

        Err(AppError::unexpected(format!(
            "No free cache key for recipe slug {}",
            base
        )))
    }

    /// 캐시된 레시피를 사용자 레시피로 저장
    pub async fn save(&self, user_id: Uuid, slug: &str) -> Result<StoredRecipe, AppError> {
        if self.recipes.exists(user_id, slug).await? {
            return Err(AppError::RecipeAlreadySaved);
        }

        let cached = self
            .cache
            .get(slug)
            .await?
            .ok_or_else(|| AppError::not_found("Recipe not found in cache"))?;

        // 동시에 두 번 저장하면 두 번째는 여기서 None
        let stored = self
            .recipes
            .save(user_id, slug, &cached.recipe)
            .await?
            .ok_or(AppError::RecipeAlreadySaved)?;

        tracing::info!(%user_id, %slug, "Recipe saved");
        Ok(stored)
    }

    /// 캐시 우선 조회, 없으면 사용자 저장 레시피
    pub async fn fetch(&self, user_id: Uuid, slug: &str) -> Result<RecipeLookup, AppError> {
        if let Some(cached) = self.cache.get(slug).await? {
            return Ok(RecipeLookup::Cached(cached.recipe));
        }

        self.recipes
            .find_by_slug(user_id, slug)
            .await?
            .map(RecipeLookup::Stored)
            .ok_or_else(|| AppError::not_found("Recipe not found"))
    }

    pub async fn list(&self, user_id: Uuid) -> Result<RecipeListResponse, AppError> {
        let recipes = self.recipes.find_all(user_id).await?;
        Ok(RecipeListResponse {
            count: recipes.len(),
            recipes,
        })
    }
}

/// 다음 로컬 자정 (일일 카운터 만료 시각)
fn next_local_midnight(now: DateTime<Local>) -> DateTime<Utc> {
    now.date_naive()
        .succ_opt()
        .and_then(|tomorrow| tomorrow.and_hms_opt(0, 0, 0))
        .and_then(|midnight| midnight.and_local_timezone(Local).earliest())
        .map(|midnight| midnight.with_timezone(&Utc))
        .unwrap_or_else(|| now.with_timezone(&Utc) + chrono::Duration::hours(24))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_local_midnight_is_within_a_day() {
        let now = Local::now();
        let midnight = next_local_midnight(now);
        let now_utc = now.with_timezone(&Utc);

        assert!(midnight > now_utc);
        assert!(midnight - now_utc <= chrono::Duration::hours(25));
        assert_eq!(
            midnight.with_timezone(&Local).date_naive(),
            now.date_naive().succ_opt().unwrap()
        );
    }
}
