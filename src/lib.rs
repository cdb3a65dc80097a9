//! AI 레시피 생성 서버
//! Recipe generation backend: accounts with email verification, asymmetric
//! access/refresh tokens, rate-limited AI generation and cache-then-save recipes.

pub mod api_doc;
pub mod domains;
pub mod routes;
pub mod shared;

use axum::http::{header, HeaderName, HeaderValue, Method};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api_doc::ApiDoc;
use crate::domains::auth::handlers::ACCESS_TOKEN_HEADER;
use crate::routes::{create_router, fallback};
use crate::shared::services::AppState;

/// 전체 애플리케이션 라우터 (Swagger + CORS + 요청 로그)
/// Build the full application router
pub fn build_app(app_state: AppState, cors_origin: &str) -> anyhow::Result<Router> {
    // CORS 설정 (Refresh Token 쿠키 때문에 credentials 허용)
    let origin: HeaderValue = cors_origin
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid CORS_ORIGIN {:?}: {}", cors_origin, e))?;

    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT])
        .expose_headers([HeaderName::from_static(ACCESS_TOKEN_HEADER)])
        .allow_credentials(true);

    Ok(Router::new()
        .merge(create_router())
        .merge(SwaggerUi::new("/api").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .fallback(fallback)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(app_state))
}
