// Routes module: 라우팅 설정
// 역할: 모든 도메인의 라우터를 조합
// Routes module: combines all domain routers

use axum::{routing::get, Json, Router};
use serde_json::{json, Value};
use crate::shared::errors::AppError;
use crate::shared::services::AppState;

// 각 도메인의 routes import
use crate::domains::auth::routes::create_auth_router;
use crate::domains::ingredient::routes::create_ingredient_router;
use crate::domains::recipe::routes::create_recipe_router;

/// Create main router (combines all domain routers)
/// 메인 라우터 생성 (모든 도메인 라우터 조합)
pub fn create_router() -> Router<AppState> {
    Router::new()
        .route("/status", get(status))
        .nest("/api/v1/auth", create_auth_router())
        .nest("/api/v1/recipe", create_recipe_router())
        .nest("/api/v1/ingredient", create_ingredient_router())
}

async fn status() -> Json<Value> {
    Json(json!({ "ok": true }))
}

/// 정의되지 않은 경로
pub async fn fallback() -> AppError {
    AppError::not_found("Not found")
}
