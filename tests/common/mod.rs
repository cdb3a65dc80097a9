// =====================================================
// 통합 테스트 공통 헬퍼
// =====================================================
// 목적: 메모리 저장소 / 기록용 Mailer / 스크립트 생성기로 AppState 구성
//
// 사용법:
// ```rust
// mod common;
// use common::*;
//
// #[tokio::test]
// async fn test_something() {
//     let app = TestApp::new();
//     let user = app.register_verified("jane@example.com", "password123").await;
//     // 테스트 코드...
// }
// ```
// =====================================================
#![allow(dead_code)]

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{Request, Response};
use axum::Router;
use serde_json::Value;
use tower::ServiceExt;

use recipe_server::build_app;
use recipe_server::domains::auth::models::{SigninRequest, SignupRequest, User};
use recipe_server::domains::auth::services::{AuthSettings, JwtService, LoginTokens};
use recipe_server::domains::recipe::services::RecipeSettings;
use recipe_server::shared::cache::InMemoryRecipeCache;
use recipe_server::shared::clients::{RecordingMailer, ScriptedGenerator};
use recipe_server::shared::config::{TokenConfig, TokenKeyConfig};
use recipe_server::shared::database::{InMemoryRecipeStore, InMemoryUserStore};
use recipe_server::shared::services::{AppComponents, AppState};

pub const ACCESS_PRIVATE: &str =
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/fixtures/keys/access_private.pem"));
pub const ACCESS_PUBLIC: &str =
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/fixtures/keys/access_public.pem"));
pub const REFRESH_PRIVATE: &str =
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/fixtures/keys/refresh_private.pem"));
pub const REFRESH_PUBLIC: &str =
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/fixtures/keys/refresh_public.pem"));

pub const CLIENT_URL: &str = "http://localhost:5173";
pub const DAILY_LIMIT: u32 = 5;

// 코드 펜스로 감싼 모델 응답 (실제 Gemini 출력 형태)
pub const OMELETTE_REPLY: &str = "```json\n{\"recipeName\":\"Omelette\",\"timeInMinutes\":10,\"steps\":[\"Beat eggs\",\"Cook\"],\"ingredients\":[{\"name\":\"egg\",\"quantity\":2,\"measure\":\"PIECE\"},{\"name\":\"Olive Oil\",\"quantity\":1,\"measure\":\"SPOON\"}],\"country\":\"Italian\"} \n```";

pub fn token_config() -> TokenConfig {
    TokenConfig {
        algorithm: "RS256".to_string(),
        access: TokenKeyConfig {
            private_key_pem: ACCESS_PRIVATE.to_string(),
            public_key_pem: ACCESS_PUBLIC.to_string(),
            ttl_secs: 15 * 60,
        },
        refresh: TokenKeyConfig {
            private_key_pem: REFRESH_PRIVATE.to_string(),
            public_key_pem: REFRESH_PUBLIC.to_string(),
            ttl_secs: 7 * 24 * 60 * 60,
        },
    }
}

/// 테스트용 애플리케이션 (협력 객체 핸들 포함)
pub struct TestApp {
    pub state: AppState,
    pub jwt_service: JwtService,
    pub users: InMemoryUserStore,
    pub recipes: InMemoryRecipeStore,
    pub cache: InMemoryRecipeCache,
    pub mailer: RecordingMailer,
    pub generator: ScriptedGenerator,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_limit(DAILY_LIMIT)
    }

    pub fn with_limit(daily_limit: u32) -> Self {
        let jwt_service = JwtService::new(&token_config()).expect("fixture keys must load");
        let users = InMemoryUserStore::new();
        let recipes = InMemoryRecipeStore::new();
        let cache = InMemoryRecipeCache::new();
        let mailer = RecordingMailer::new();
        let generator = ScriptedGenerator::new();

        let state = AppState::from_components(AppComponents {
            users: Arc::new(users.clone()),
            recipes: Arc::new(recipes.clone()),
            ingredients: Arc::new(recipes.clone()),
            cache: Arc::new(cache.clone()),
            mailer: Arc::new(mailer.clone()),
            generator: Arc::new(generator.clone()),
            jwt_service: jwt_service.clone(),
            auth_settings: AuthSettings::new(CLIENT_URL),
            recipe_settings: RecipeSettings {
                daily_limit,
                ..RecipeSettings::default()
            },
            secure_cookies: false,
        });

        Self {
            state,
            jwt_service,
            users,
            recipes,
            cache,
            mailer,
            generator,
        }
    }

    pub fn router(&self) -> Router {
        build_app(self.state.clone(), CLIENT_URL).expect("router must build")
    }

    pub async fn register(&self, email: &str, password: &str) -> User {
        self.state
            .auth_state
            .auth_service
            .signup(signup_request("Jane", email, password))
            .await
            .expect("signup should succeed")
    }

    /// 가입 + 메일로 받은 토큰으로 인증까지
    pub async fn register_verified(&self, email: &str, password: &str) -> User {
        let user = self.register(email, password).await;
        let token = self
            .mailer
            .last_verification_token(&user.email)
            .expect("verification mail should be sent");

        self.state
            .auth_state
            .auth_service
            .verify_email(Some(&token))
            .await
            .expect("verification should succeed")
    }

    pub async fn login(&self, email: &str, password: &str) -> LoginTokens {
        self.state
            .auth_state
            .auth_service
            .login(SigninRequest {
                email: email.to_string(),
                password: password.to_string(),
            })
            .await
            .expect("login should succeed")
    }
}

pub fn signup_request(name: &str, email: &str, password: &str) -> SignupRequest {
    SignupRequest {
        name: name.to_string(),
        email: email.to_string(),
        password: password.to_string(),
        confirm_password: password.to_string(),
    }
}

/// 라우터에 요청 한 번 보내기
pub async fn send(router: Router, request: Request<Body>) -> Response<Body> {
    router.oneshot(request).await.expect("router is infallible")
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body should be readable");
    serde_json::from_slice(&bytes).expect("body should be JSON")
}
