use axum::{
    extract::{Query, State},
    http::{HeaderMap, HeaderName, HeaderValue, StatusCode},
    Json,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use axum_extra::extract::WithRejection;
use validator::Validate;

use crate::domains::auth::models::{
    EmailQuery, ForgetPasswordRequest, MessageResponse, ResetPasswordRequest, SigninRequest,
    SigninResponse, SignupRequest, SignupResponse, TokenKind, VerifyEmailQuery,
};
use crate::domains::auth::services::RefreshOutcome;
use crate::shared::errors::{AppError, ErrorResponse};
use crate::shared::middleware::bearer_token;
use crate::shared::services::AppState;

pub const REFRESH_COOKIE: &str = "refreshToken";
pub const ACCESS_TOKEN_HEADER: &str = "x-access-token";

// 회원가입 핸들러
#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    request_body = SignupRequest,
    responses(
        (status = 201, description = "User created, verification email sent", body = SignupResponse),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 409, description = "Email already used", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Auth"
)]
pub async fn register(
    State(app_state): State<AppState>,
    WithRejection(Json(request), _): WithRejection<Json<SignupRequest>, AppError>,
) -> Result<(StatusCode, Json<SignupResponse>), AppError> {
    let user = app_state.auth_state.auth_service.signup(request).await?;

    Ok((
        StatusCode::CREATED,
        Json(SignupResponse {
            user_data: user.into(),
        }),
    ))
}

// 이메일 인증 핸들러
#[utoipa::path(
    post,
    path = "/api/v1/auth/verify-email",
    params(VerifyEmailQuery),
    responses(
        (status = 200, description = "Email verified", body = MessageResponse),
        (status = 400, description = "Token missing, invalid or expired", body = ErrorResponse)
    ),
    tag = "Auth"
)]
pub async fn verify_email(
    State(app_state): State<AppState>,
    WithRejection(Query(query), _): WithRejection<Query<VerifyEmailQuery>, AppError>,
) -> Result<Json<MessageResponse>, AppError> {
    app_state
        .auth_state
        .auth_service
        .verify_email(query.token.as_deref())
        .await?;

    Ok(Json(MessageResponse::new("Email verified successfully")))
}

// 인증 토큰 재발급 핸들러
#[utoipa::path(
    post,
    path = "/api/v1/auth/new-email-token",
    params(EmailQuery),
    responses(
        (status = 200, description = "New verification email sent", body = MessageResponse),
        (status = 400, description = "Already verified", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    ),
    tag = "Auth"
)]
pub async fn new_email_token(
    State(app_state): State<AppState>,
    WithRejection(Query(query), _): WithRejection<Query<EmailQuery>, AppError>,
) -> Result<Json<MessageResponse>, AppError> {
    query.validate()?;

    app_state
        .auth_state
        .auth_service
        .regenerate_verification_token(&query.email)
        .await?;

    Ok(Json(MessageResponse::new(
        "A new verification email has been sent",
    )))
}

// 로그인 핸들러 - Refresh Token은 http-only 쿠키로도 전달
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    request_body = SigninRequest,
    responses(
        (status = 200, description = "Login successful", body = SigninResponse),
        (status = 401, description = "Invalid email or password", body = ErrorResponse)
    ),
    tag = "Auth"
)]
pub async fn login(
    State(app_state): State<AppState>,
    jar: CookieJar,
    WithRejection(Json(request), _): WithRejection<Json<SigninRequest>, AppError>,
) -> Result<(CookieJar, Json<SigninResponse>), AppError> {
    let auth_service = &app_state.auth_state.auth_service;
    let tokens = auth_service.login(request).await?;

    let max_age = time::Duration::seconds(auth_service.refresh_ttl().num_seconds());
    let cookie = Cookie::build((REFRESH_COOKIE, tokens.refresh_token.clone()))
        .http_only(true)
        .same_site(SameSite::Strict)
        .secure(app_state.auth_state.secure_cookies)
        .path("/")
        .max_age(max_age);

    Ok((
        jar.add(cookie),
        Json(SigninResponse {
            valid_user: true,
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
            access_token_expires_in: auth_service.expires_in_label(TokenKind::Access),
            refresh_token_expires_in: auth_service.expires_in_label(TokenKind::Refresh),
        }),
    ))
}

/// 로그아웃 핸들러 - 쿠키 삭제만 수행
/// Logout handler
#[utoipa::path(
    get,
    path = "/api/v1/auth/logout",
    responses(
        (status = 200, description = "Logout successful", body = MessageResponse)
    ),
    tag = "Auth"
)]
pub async fn logout(jar: CookieJar) -> (CookieJar, Json<MessageResponse>) {
    (
        jar.remove(Cookie::build(REFRESH_COOKIE).path("/")),
        Json(MessageResponse::new("Logged out successfully")),
    )
}

// 비밀번호 재설정 메일 요청
#[utoipa::path(
    post,
    path = "/api/v1/auth/forget-password",
    request_body = ForgetPasswordRequest,
    responses(
        (status = 200, description = "Reset link sent", body = MessageResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    ),
    tag = "Auth"
)]
pub async fn forget_password(
    State(app_state): State<AppState>,
    WithRejection(Json(request), _): WithRejection<Json<ForgetPasswordRequest>, AppError>,
) -> Result<Json<MessageResponse>, AppError> {
    request.validate()?;

    app_state
        .auth_state
        .auth_service
        .forget_password(&request.email)
        .await?;

    Ok(Json(MessageResponse::new(
        "Password reset link has been sent to your email",
    )))
}

// 비밀번호 재설정
#[utoipa::path(
    post,
    path = "/api/v1/auth/reset-password",
    request_body = ResetPasswordRequest,
    responses(
        (status = 200, description = "Password updated", body = MessageResponse),
        (status = 400, description = "Invalid or expired token", body = ErrorResponse)
    ),
    tag = "Auth"
)]
pub async fn reset_password(
    State(app_state): State<AppState>,
    WithRejection(Json(request), _): WithRejection<Json<ResetPasswordRequest>, AppError>,
) -> Result<Json<MessageResponse>, AppError> {
    app_state
        .auth_state
        .auth_service
        .reset_password(request)
        .await?;

    Ok(Json(MessageResponse::new("Password has been reset successfully")))
}

/// 토큰 갱신 핸들러 - 새 Access Token은 `x-access-token` 헤더로 전달
/// Refresh handler; the new access token is returned in the `x-access-token` header
#[utoipa::path(
    post,
    path = "/api/v1/auth/token",
    responses(
        (status = 200, description = "Access token still valid, or renewed (see x-access-token header)", body = MessageResponse),
        (status = 400, description = "Access or refresh token not provided", body = ErrorResponse),
        (status = 403, description = "Invalid session", body = ErrorResponse)
    ),
    security(
        ("BearerAuth" = [])
    ),
    tag = "Auth"
)]
pub async fn refresh_token(
    State(app_state): State<AppState>,
    headers: HeaderMap,
    jar: CookieJar,
) -> Result<(HeaderMap, Json<MessageResponse>), AppError> {
    let refresh_token = jar.get(REFRESH_COOKIE).map(|c| c.value().to_string());

    let outcome = app_state
        .auth_state
        .auth_service
        .refresh_access_token(bearer_token(&headers), refresh_token.as_deref())?;

    let mut response_headers = HeaderMap::new();
    let message = match outcome {
        RefreshOutcome::StillValid => "Access token is still valid",
        RefreshOutcome::Renewed(access_token) => {
            let value = HeaderValue::from_str(&access_token)
                .map_err(|e| AppError::unexpected(format!("Invalid token header: {}", e)))?;
            response_headers.insert(HeaderName::from_static(ACCESS_TOKEN_HEADER), value);
            "Access token refreshed"
        }
    };

    Ok((response_headers, Json(MessageResponse::new(message))))
}
