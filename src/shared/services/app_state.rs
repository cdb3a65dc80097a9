use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;

use crate::domains::auth::services::{AuthService, AuthSettings, AuthState, JwtService};
use crate::domains::ingredient::services::{IngredientService, IngredientState};
use crate::domains::recipe::services::{RecipeService, RecipeSettings, RecipeState};
use crate::shared::cache::{RecipeCache, RedisRecipeCache};
use crate::shared::clients::{GeminiClient, Mailer, RecipeGenerator, SmtpMailer};
use crate::shared::config::Config;
use crate::shared::database::{
    Database, IngredientRepository, IngredientStore, RecipeRepository, RecipeStore,
    UserRepository, UserStore,
};

/// 상태 조립에 필요한 협력 객체들
/// Collaborators an [`AppState`] is assembled from. Tests pass in-memory ones.
pub struct AppComponents {
    pub users: Arc<dyn UserStore>,
    pub recipes: Arc<dyn RecipeStore>,
    pub ingredients: Arc<dyn IngredientStore>,
    pub cache: Arc<dyn RecipeCache>,
    pub mailer: Arc<dyn Mailer>,
    pub generator: Arc<dyn RecipeGenerator>,
    pub jwt_service: JwtService,
    pub auth_settings: AuthSettings,
    pub recipe_settings: RecipeSettings,
    pub secure_cookies: bool,
}

/// Application state (combines all domain states)
/// 애플리케이션 상태 (모든 도메인 상태를 조합)
#[derive(Clone)]
pub struct AppState {
    pub auth_state: AuthState,
    pub recipe_state: RecipeState,
    pub ingredient_state: IngredientState,
}

impl AppState {
    pub fn from_components(components: AppComponents) -> Self {
        let auth_service = AuthService::new(
            components.users,
            components.mailer,
            components.jwt_service.clone(),
            components.auth_settings,
        );

        let recipe_service = RecipeService::new(
            components.cache,
            components.recipes,
            components.generator,
            components.recipe_settings,
        );

        Self {
            auth_state: AuthState::new(
                auth_service,
                components.jwt_service,
                components.secure_cookies,
            ),
            recipe_state: RecipeState::new(recipe_service),
            ingredient_state: IngredientState::new(IngredientService::new(components.ingredients)),
        }
    }

    /// 운영 환경 상태 생성 (PostgreSQL + Redis + SMTP + Gemini)
    /// 키 형식 오류 등은 여기서 실패하여 서버가 시작되지 않는다
    pub async fn from_config(config: &Config, db: &Database) -> Result<Self> {
        // 1. 공유 서비스 (JWT)
        let jwt_service = JwtService::new(&config.tokens)?;

        // 2. 저장소 / 외부 클라이언트
        let pool = db.pool().clone();
        let cache = RedisRecipeCache::connect(&config.redis_url).await?;
        let mailer = SmtpMailer::new(&config.mail)?;
        let generator = GeminiClient::new(&config.gemini)?;

        // 3. 조립
        Ok(Self::from_components(AppComponents {
            users: Arc::new(UserRepository::new(pool.clone())),
            recipes: Arc::new(RecipeRepository::new(pool.clone())),
            ingredients: Arc::new(IngredientRepository::new(pool)),
            cache: Arc::new(cache),
            mailer: Arc::new(mailer),
            generator: Arc::new(generator),
            jwt_service,
            auth_settings: AuthSettings::new(config.client_url.clone()),
            recipe_settings: RecipeSettings {
                daily_limit: config.recipe.daily_generation_limit,
                cache_ttl: Duration::from_secs(config.recipe.cache_ttl_secs),
            },
            secure_cookies: config.server.secure_cookies,
        }))
    }
}
