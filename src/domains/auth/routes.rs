// Auth domain routes
// 인증 도메인 라우터
use axum::{routing::{get, post}, Router};
use crate::domains::auth::handlers::auth_handler;
use crate::shared::services::AppState;

/// Create authentication router
/// 인증 라우터 생성
pub fn create_auth_router() -> Router<AppState> {
    Router::new()
        .route("/register", post(auth_handler::register))
        .route("/verify-email", post(auth_handler::verify_email))
        .route("/new-email-token", post(auth_handler::new_email_token))
        .route("/login", post(auth_handler::login))
        .route("/logout", get(auth_handler::logout))
        .route("/forget-password", post(auth_handler::forget_password))
        .route("/reset-password", post(auth_handler::reset_password))
        .route("/token", post(auth_handler::refresh_token))
}
