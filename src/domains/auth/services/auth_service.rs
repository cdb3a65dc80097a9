use std::sync::Arc;

use argon2::password_hash::{rand_core::OsRng, SaltString};
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use chrono::{Duration, Utc};
use url::Url;
use validator::Validate;

use crate::domains::auth::models::{
    normalize_email, NewUser, ResetPasswordRequest, SigninRequest, SignupRequest, TokenKind,
    TokenVerification, User, UserPayload,
};
use crate::domains::auth::services::JwtService;
use crate::shared::clients::{MailKind, Mailer, OutgoingMail};
use crate::shared::database::UserStore;
use crate::shared::errors::AppError;
use crate::shared::utils::{generate_token, hash_token};

/// 인증 흐름 설정
/// Lifetimes of one-time tokens and the client base URL used in mailed links
#[derive(Debug, Clone)]
pub struct AuthSettings {
    pub verification_ttl: Duration,
    pub reset_ttl: Duration,
    pub client_url: String,
}

impl AuthSettings {
    pub fn new(client_url: impl Into<String>) -> Self {
        Self {
            verification_ttl: Duration::minutes(10),
            reset_ttl: Duration::minutes(10),
            client_url: client_url.into().trim_end_matches('/').to_string(),
        }
    }
}

/// 로그인 결과 (사용자 + 토큰쌍)
#[derive(Debug, Clone)]
pub struct LoginTokens {
    pub user: User,
    pub access_token: String,
    pub refresh_token: String,
}

/// 토큰 갱신 결과
/// Outcome of a refresh request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// Access Token이 아직 유효함 - 새로 발급하지 않음
    StillValid,
    Renewed(String),
}

// 인증 서비스
// AuthService: handles authentication business logic
#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserStore>,
    mailer: Arc<dyn Mailer>,
    jwt_service: JwtService,
    settings: AuthSettings,
}

impl AuthService {
    pub fn new(
        users: Arc<dyn UserStore>,
        mailer: Arc<dyn Mailer>,
        jwt_service: JwtService,
        settings: AuthSettings,
    ) -> Self {
        Self {
            users,
            mailer,
            jwt_service,
            settings,
        }
    }

    // 회원가입
    // 사용자 생성과 인증 메일 발송은 하나의 단위 - 메일 실패 시 사용자 생성 롤백
    pub async fn signup(&self, request: SignupRequest) -> Result<User, AppError> {
        request.validate()?;
        let email = normalize_email(&request.email);

        // 1. 이메일 중복 확인
        if self.users.find_by_email(&email).await?.is_some() {
            return Err(AppError::UserExists);
        }

        // 2. 비밀번호 해싱
        let password_hash = hash_password(request.password).await?;

        // 3. 인증 토큰 생성 (DB에는 해시만 저장)
        let token = generate_token();
        let new_user = NewUser {
            name: request.name.trim().to_string(),
            email,
            password_hash,
            verification_token: hash_token(&token),
            verification_token_expires_at: Utc::now() + self.settings.verification_ttl,
        };

        // 4. 사용자 생성 (아직 커밋 안 함)
        // 동시 가입 경쟁에서 진 쪽은 여기서 None
        let mut pending = self
            .users
            .begin_create(new_user)
            .await?
            .ok_or(AppError::UserExists)?;

        // 5. 인증 메일 발송 - 실패하면 pending drop으로 롤백
        let user = pending.user().clone();
        if let Err(e) = self.send_verification_mail(&user, &token).await {
            tracing::error!(email = %user.email, "Verification mail failed, rolling back signup: {:#}", e);
            return Err(AppError::Unexpected(e));
        }

        // 6. 커밋
        pending.commit().await?;

        tracing::info!(user_id = %user.id, "User registered");
        Ok(user)
    }

    // 이메일 인증 (토큰은 한 번만 사용 가능)
    pub async fn verify_email(&self, token: Option<&str>) -> Result<User, AppError> {
        let token = token
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AppError::not_provided("Token not provided"))?;

        let user = self
            .users
            .verify_email(&hash_token(token), Utc::now())
            .await?
            .ok_or(AppError::InvalidToken)?;

        tracing::info!(user_id = %user.id, "Email verified");
        Ok(user)
    }

    // 인증 토큰 재발급 + 메일 재발송 (이전 토큰은 덮어씀)
    pub async fn regenerate_verification_token(&self, email: &str) -> Result<(), AppError> {
        let user = self
            .users
            .find_by_email(&normalize_email(email))
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))?;

        if user.verified {
            return Err(AppError::AlreadyVerified);
        }

        let token = generate_token();
        self.users
            .set_verification_token(
                user.id,
                &hash_token(&token),
                Utc::now() + self.settings.verification_ttl,
            )
            .await?;

        self.send_verification_mail(&user, &token).await?;
        Ok(())
    }

    // 로그인
    // 사용자 없음 / 비밀번호 불일치는 같은 에러로 응답 (사용자 존재 여부 노출 방지)
    pub async fn login(&self, request: SigninRequest) -> Result<LoginTokens, AppError> {
        request.validate()?;

        // 1. 이메일로 사용자 조회
        let user = self
            .users
            .find_by_email(&normalize_email(&request.email))
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        // 2. 비밀번호 검증
        if !verify_password(request.password, user.password_hash.clone()).await? {
            return Err(AppError::InvalidCredentials);
        }

        // 3. 토큰쌍 발급
        let payload = UserPayload {
            user_id: user.id,
            email: user.email.clone(),
            role: user.role.clone(),
        };
        let access_token = self.jwt_service.issue(&payload, TokenKind::Access, None)?;
        let refresh_token = self.jwt_service.issue(&payload, TokenKind::Refresh, None)?;

        tracing::info!(user_id = %user.id, "User logged in");
        Ok(LoginTokens {
            user,
            access_token,
            refresh_token,
        })
    }

    /// Access Token 갱신
    /// Refresh the access token. Both tokens must be present; a still-valid access
    /// token is left alone, otherwise the refresh token must verify.
    pub fn refresh_access_token(
        &self,
        access_token: Option<&str>,
        refresh_token: Option<&str>,
    ) -> Result<RefreshOutcome, AppError> {
        let access_token = access_token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AppError::not_provided("Access token is not provided"))?;
        let refresh_token = refresh_token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AppError::not_provided("Refresh token is not provided"))?;

        // 1. Access Token이 아직 유효하면 그대로
        if self
            .jwt_service
            .verify(access_token, TokenKind::Access)
            .is_verified()
        {
            return Ok(RefreshOutcome::StillValid);
        }

        // 2. Refresh Token 검증
        let claims = match self.jwt_service.verify(refresh_token, TokenKind::Refresh) {
            TokenVerification::Verified(claims) => claims,
            TokenVerification::Rejected(reason) => {
                tracing::warn!(%reason, "Refresh token rejected");
                return Err(AppError::InvalidSession);
            }
        };

        // 3. 새 Access Token 발급
        let access_token = self
            .jwt_service
            .issue(&claims.user, TokenKind::Access, None)?;

        Ok(RefreshOutcome::Renewed(access_token))
    }

    // 비밀번호 재설정 요청 - 재설정 링크 메일 발송
    pub async fn forget_password(&self, email: &str) -> Result<(), AppError> {
        let email = normalize_email(email);
        let user = self
            .users
            .find_by_email(&email)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))?;

        let token = generate_token();
        self.users
            .set_reset_token(
                user.id,
                &hash_token(&token),
                Utc::now() + self.settings.reset_ttl,
            )
            .await?;

        let reset_url = client_link(
            &self.settings.client_url,
            "reset-password",
            &[("token", token.as_str()), ("email", email.as_str())],
        )?
        .to_string();

        self.mailer
            .send(&OutgoingMail {
                recipient: user.email.clone(),
                user_name: user.name.clone(),
                kind: MailKind::PasswordReset { reset_url },
            })
            .await?;

        tracing::info!(user_id = %user.id, "Password reset requested");
        Ok(())
    }

    // 비밀번호 재설정 (이메일 + 토큰 + 만료 조건을 한 번에 검사)
    pub async fn reset_password(&self, request: ResetPasswordRequest) -> Result<(), AppError> {
        request.validate()?;

        let email = normalize_email(&request.email);
        let password_hash = hash_password(request.new_password).await?;

        let updated = self
            .users
            .reset_password(
                &email,
                &hash_token(request.password_token.trim()),
                &password_hash,
                Utc::now(),
            )
            .await?;

        if !updated {
            return Err(AppError::InvalidToken);
        }

        tracing::info!(email = %email, "Password reset");
        Ok(())
    }

    /// 토큰 수명 표시 문자열 ("15m", "7d")
    pub fn expires_in_label(&self, kind: TokenKind) -> String {
        humanize_duration(self.jwt_service.ttl(kind))
    }

    pub fn refresh_ttl(&self) -> Duration {
        self.jwt_service.ttl(TokenKind::Refresh)
    }

    async fn send_verification_mail(&self, user: &User, token: &str) -> anyhow::Result<()> {
        let link = client_link(&self.settings.client_url, "verify-email", &[("token", token)])?
            .to_string();
        self.mailer
            .send(&OutgoingMail {
                recipient: user.email.clone(),
                user_name: user.name.clone(),
                kind: MailKind::EmailVerification {
                    token: token.to_string(),
                    link,
                },
            })
            .await
    }
}

// argon2는 CPU를 오래 쓰므로 blocking 스레드에서 실행
async fn hash_password(password: String) -> Result<String, AppError> {
    tokio::task::spawn_blocking(move || {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| AppError::unexpected(format!("Failed to hash password: {}", e)))
    })
    .await
    .map_err(|e| AppError::unexpected(format!("Password hashing task failed: {}", e)))?
}

async fn verify_password(password: String, password_hash: String) -> Result<bool, AppError> {
    tokio::task::spawn_blocking(move || {
        let parsed_hash = PasswordHash::new(&password_hash)
            .map_err(|e| AppError::unexpected(format!("Invalid password hash: {}", e)))?;

        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    })
    .await
    .map_err(|e| AppError::unexpected(format!("Password verification task failed: {}", e)))?
}

// 클라이언트 URL + 경로 + 쿼리 (값은 form-urlencoded)
fn client_link(client_url: &str, path: &str, params: &[(&str, &str)]) -> anyhow::Result<Url> {
    Url::parse_with_params(&format!("{}/{}", client_url, path), params)
        .map_err(|e| anyhow::anyhow!("Invalid client URL {}: {}", client_url, e))
}

fn humanize_duration(duration: Duration) -> String {
    let secs = duration.num_seconds();
    if secs > 0 && secs % 86_400 == 0 {
        format!("{}d", secs / 86_400)
    } else if secs > 0 && secs % 3_600 == 0 {
        format!("{}h", secs / 3_600)
    } else if secs > 0 && secs % 60 == 0 {
        format!("{}m", secs / 60)
    } else {
        format!("{}s", secs)
    }
}
