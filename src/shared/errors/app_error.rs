use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

/// 에러 코드 (클라이언트와 공유하는 고정 번호)
/// Stable numeric error codes shared with the client
pub mod codes {
    pub const VALIDATION: u32 = 997;
    pub const NOT_FOUND: u32 = 998;
    pub const INVALID_LOGIN: u32 = 1000;
    pub const INVALID_AUTH: u32 = 1001;
    pub const USER_EXISTS: u32 = 1002;
    pub const INVALID_TOKEN: u32 = 1015;
    pub const MAX_ATTEMPTS_REACHED: u32 = 1018;
    pub const INVALID_SESSION: u32 = 1019;
    pub const ALREADY_VERIFIED: u32 = 1020;
    pub const RECIPE_ALREADY_SAVED: u32 = 1021;
    pub const UNEXPECTED: u32 = 1999;
}

/// 애플리케이션 에러
/// Application error: every handler funnels its failures through this type
#[derive(Error, Debug)]
pub enum AppError {
    /// 요청 형식 오류
    /// Request does not match the expected schema
    #[error("{0}")]
    Validation(String),

    /// 필수 토큰/파라미터 누락
    /// A required token or parameter was not provided
    #[error("{0}")]
    NotProvided(String),

    #[error("{0}")]
    NotFound(String),

    /// 잘못된 이메일 또는 비밀번호 (사용자 존재 여부를 노출하지 않음)
    /// Invalid email or password (never reveals which one)
    #[error("Invalid email or password.")]
    InvalidCredentials,

    /// Access Token 검증 실패
    #[error("Invalid token.")]
    InvalidAuth,

    #[error("Email already used.")]
    UserExists,

    /// 이메일 인증 / 비밀번호 재설정 토큰이 잘못되었거나 만료됨
    /// One-time (verification / reset) token is wrong or expired
    #[error("Invalid or expired token.")]
    InvalidToken,

    #[error("You have reached the maximum number of attempts. Please try again later.")]
    MaxAttemptsReached,

    /// Refresh Token 검증 실패
    #[error("The session is invalid or has expired.")]
    InvalidSession,

    #[error("User is already verified.")]
    AlreadyVerified,

    #[error("Recipe is already saved.")]
    RecipeAlreadySaved,

    /// 내부 에러 (DB, Redis, SMTP, AI 등) - 상세 내용은 로그에만 남김
    /// Unexpected failure; details are logged, never sent to the client
    #[error("Something went wrong")]
    Unexpected(#[from] anyhow::Error),
}

/// 에러 응답 본문
/// Uniform error body
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    #[schema(example = 998)]
    pub error_code: u32,
    #[schema(example = "Not found")]
    pub error: String,
}

impl AppError {
    pub fn not_found(message: impl Into<String>) -> Self {
        AppError::NotFound(message.into())
    }

    pub fn not_provided(message: impl Into<String>) -> Self {
        AppError::NotProvided(message.into())
    }

    pub fn unexpected(message: impl Into<String>) -> Self {
        AppError::Unexpected(anyhow::anyhow!(message.into()))
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::NotProvided(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::InvalidCredentials | AppError::InvalidAuth => StatusCode::UNAUTHORIZED,
            AppError::UserExists | AppError::RecipeAlreadySaved => StatusCode::CONFLICT,
            AppError::InvalidToken | AppError::AlreadyVerified => StatusCode::BAD_REQUEST,
            AppError::MaxAttemptsReached => StatusCode::TOO_MANY_REQUESTS,
            AppError::InvalidSession => StatusCode::FORBIDDEN,
            AppError::Unexpected(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn error_code(&self) -> u32 {
        match self {
            AppError::Validation(_) => codes::VALIDATION,
            AppError::NotProvided(_) | AppError::NotFound(_) => codes::NOT_FOUND,
            AppError::InvalidCredentials => codes::INVALID_LOGIN,
            AppError::InvalidAuth => codes::INVALID_AUTH,
            AppError::UserExists => codes::USER_EXISTS,
            AppError::InvalidToken => codes::INVALID_TOKEN,
            AppError::MaxAttemptsReached => codes::MAX_ATTEMPTS_REACHED,
            AppError::InvalidSession => codes::INVALID_SESSION,
            AppError::AlreadyVerified => codes::ALREADY_VERIFIED,
            AppError::RecipeAlreadySaved => codes::RECIPE_ALREADY_SAVED,
            AppError::Unexpected(_) => codes::UNEXPECTED,
        }
    }
}

/// AppError를 HTTP 응답으로 변환
/// Single error boundary: AppError -> `{ errorCode, error }`
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if let AppError::Unexpected(err) = &self {
            tracing::error!(error = ?err, "unexpected error while handling request");
        }

        let body = ErrorResponse {
            error_code: self.error_code(),
            error: self.to_string(),
        };

        (self.status_code(), Json(body)).into_response()
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut messages: Vec<String> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| match &e.message {
                    // 구조체 단위 검증 (schema) 에러
                    Some(message) if field == "__all__" => message.to_string(),
                    Some(message) => format!("{}: {}", field, message),
                    None => format!("{}: invalid value ({})", field, e.code),
                })
            })
            .collect();

        // nested (ingredients[i].quantity 등) 에러는 field_errors에 포함되지 않음
        if messages.is_empty() {
            messages.push(errors.to_string());
        }
        messages.sort();

        AppError::Validation(format!("Validation error: {}", messages.join("; ")))
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(format!("Validation error: {}", rejection.body_text()))
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::Validation(format!("Validation error: {}", rejection.body_text()))
    }
}
