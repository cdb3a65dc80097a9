use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// 토큰 종류 - 종류마다 별도의 키쌍을 사용
/// Token kind; each kind is signed with its own keypair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Access,
    Refresh,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Access => write!(f, "access"),
            TokenKind::Refresh => write!(f, "refresh"),
        }
    }
}

/// 토큰에 담기는 사용자 정보
/// Identity carried by both token kinds
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPayload {
    pub user_id: Uuid,
    pub email: String,
    pub role: String,
}

/// JWT Claims (토큰에 포함될 데이터)
/// JWT Claims (data to be included in token)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claims {
    #[serde(flatten)]
    pub user: UserPayload,

    /// 발급 시간 (Unix timestamp)
    pub iat: i64,

    /// 유효 시작 시간 (Unix timestamp)
    pub nbf: i64,

    /// 만료 시간 (Unix timestamp)
    pub exp: i64,
}

/// 토큰 검증 실패 사유
/// Why a token was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenRejection {
    Expired,
    Invalid,
    NotYetValid,
}

impl fmt::Display for TokenRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenRejection::Expired => write!(f, "Token expired"),
            TokenRejection::Invalid => write!(f, "Invalid token signature or structure"),
            TokenRejection::NotYetValid => write!(f, "Token not active yet"),
        }
    }
}

/// 토큰 검증 결과. 예상 가능한 실패는 에러가 아닌 결과로 보고한다.
/// Outcome of verifying a token; expected failures are reported, not raised.
#[derive(Debug, Clone)]
pub enum TokenVerification {
    Verified(Claims),
    Rejected(TokenRejection),
}

impl TokenVerification {
    pub fn is_verified(&self) -> bool {
        matches!(self, TokenVerification::Verified(_))
    }

    pub fn claims(self) -> Option<Claims> {
        match self {
            TokenVerification::Verified(claims) => Some(claims),
            TokenVerification::Rejected(_) => None,
        }
    }
}
