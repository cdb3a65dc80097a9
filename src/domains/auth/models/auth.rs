use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationError};
use crate::domains::auth::models::user::UserResponse;

// 회원가입 요청 모델
#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "passwords_match", skip_on_field_errors = false))]
#[schema(as = SignupRequest)]
pub struct SignupRequest {
    /// Display name
    /// 이름
    #[validate(length(min = 1, message = "Name is required"))]
    #[schema(example = "Jane Doe")]
    pub name: String,

    /// Email address
    /// 이메일 주소
    #[validate(email(message = "Invalid email"))]
    #[schema(example = "jane@example.com")]
    pub email: String,

    /// Password (will be hashed)
    /// 비밀번호 (해싱됨)
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    #[schema(example = "password123")]
    pub password: String,

    #[schema(example = "password123")]
    pub confirm_password: String,
}

fn passwords_match(request: &SignupRequest) -> Result<(), ValidationError> {
    if request.password != request.confirm_password {
        let mut err = ValidationError::new("confirm");
        err.message = Some("Passwords don't match".into());
        return Err(err);
    }
    Ok(())
}

// 회원가입 응답 모델
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(as = SignupResponse)]
pub struct SignupResponse {
    /// User information (without password)
    /// 사용자 정보 (비밀번호 제외)
    pub user_data: UserResponse,
}

// 로그인 요청 모델
#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
#[schema(as = SigninRequest)]
pub struct SigninRequest {
    #[validate(email(message = "Invalid email"))]
    #[schema(example = "jane@example.com")]
    pub email: String,

    #[schema(example = "password123")]
    pub password: String,
}

// 로그인 응답 모델
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(as = SigninResponse)]
pub struct SigninResponse {
    pub valid_user: bool,

    /// JWT Access Token (짧은 수명)
    /// JWT Access Token (short lifetime)
    #[schema(example = "eyJhbGciOiJSUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub access_token: String,

    /// JWT Refresh Token (긴 수명, http-only 쿠키로도 전달)
    /// JWT Refresh Token (long lifetime, also set as an http-only cookie)
    pub refresh_token: String,

    #[schema(example = "15m")]
    pub access_token_expires_in: String,

    #[schema(example = "7d")]
    pub refresh_token_expires_in: String,
}

/// `?token=` 쿼리
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct VerifyEmailQuery {
    pub token: Option<String>,
}

/// `?email=` 쿼리
#[derive(Debug, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct EmailQuery {
    #[validate(email(message = "Invalid email"))]
    pub email: String,
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
#[schema(as = ForgetPasswordRequest)]
pub struct ForgetPasswordRequest {
    #[validate(email(message = "Invalid email"))]
    #[schema(example = "jane@example.com")]
    pub email: String,
}

// 비밀번호 재설정 요청 모델
#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(as = ResetPasswordRequest)]
pub struct ResetPasswordRequest {
    #[validate(email(message = "Invalid email"))]
    pub email: String,

    /// 이메일로 받은 재설정 토큰
    /// Reset token received by email
    #[validate(length(min = 1, message = "Token is required"))]
    pub password_token: String,

    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub new_password: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[schema(as = MessageResponse)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}
