// Auth domain state
// 인증 도메인 상태
use crate::domains::auth::services::{AuthService, JwtService};

/// Auth domain state
/// 인증 도메인에서 필요한 서비스들을 포함하는 상태
#[derive(Clone)]
pub struct AuthState {
    pub auth_service: AuthService,
    pub jwt_service: JwtService,
    /// Refresh Token 쿠키의 Secure 속성
    pub secure_cookies: bool,
}

impl AuthState {
    pub fn new(auth_service: AuthService, jwt_service: JwtService, secure_cookies: bool) -> Self {
        Self {
            auth_service,
            jwt_service,
            secure_cookies,
        }
    }
}
