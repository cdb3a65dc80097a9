use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

pub const DEFAULT_ROLE: &str = "USER";

/// 사용자 모델 (DB 저장용)
/// User record as stored in the credential store.
///
/// 인증/재설정 토큰은 항상 SHA-256 해시로만 저장된다.
/// Verification and reset tokens are only ever stored hashed.
#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub verified: bool,
    pub verification_token: Option<String>,
    pub verification_token_expires_at: Option<DateTime<Utc>>,
    pub reset_token: Option<String>,
    pub reset_token_expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 회원가입 시 생성할 사용자 데이터
/// Data for a user row about to be created
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub verification_token: String,
    pub verification_token_expires_at: DateTime<Utc>,
}

/// 사용자 응답 모델 (비밀번호/토큰 제외)
/// User response (without password hash or tokens)
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(as = UserResponse)]
pub struct UserResponse {
    pub id: Uuid,
    #[schema(example = "Jane Doe")]
    pub name: String,
    #[schema(example = "jane@example.com")]
    pub email: String,
    pub verified: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            verified: user.verified,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// 이메일 정규화 (대소문자 구분 없음)
/// Emails are unique case-insensitively; store and look up the normalized form.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
