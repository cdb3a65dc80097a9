// src/domains/auth/services/jwt_service.rs
use crate::domains::auth::models::jwt::{
    Claims, TokenKind, TokenRejection, TokenVerification, UserPayload,
};
use crate::shared::config::{TokenConfig, TokenKeyConfig};
use crate::shared::errors::AppError;
use anyhow::{bail, Context, Result};
use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use std::str::FromStr;
use std::sync::Arc;

/// 토큰 종류 하나에 대한 서명/검증 키
/// Signing material for one token kind
struct TokenKeys {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

/// JWT 서비스
/// JWT Service for token generation and verification
///
/// Access Token과 Refresh Token은 서로 다른 비대칭 키쌍으로 서명된다.
/// 한쪽 키가 유출되어도 다른 종류의 토큰은 위조할 수 없다.
#[derive(Clone)]
pub struct JwtService {
    algorithm: Algorithm,
    access: Arc<TokenKeys>,
    refresh: Arc<TokenKeys>,
}

impl JwtService {
    /// JWT Service 생성 (키 형식이 잘못되면 시작 시점에 실패)
    /// Create JWT Service; malformed key material fails here, at startup
    pub fn new(config: &TokenConfig) -> Result<Self> {
        let algorithm = Algorithm::from_str(config.algorithm.trim())
            .with_context(|| format!("Unknown token algorithm: {}", config.algorithm))?;

        Ok(Self {
            algorithm,
            access: Arc::new(
                TokenKeys::load(algorithm, &config.access).context("Invalid access token keys")?,
            ),
            refresh: Arc::new(
                TokenKeys::load(algorithm, &config.refresh)
                    .context("Invalid refresh token keys")?,
            ),
        })
    }

    /// 기본 수명 (초)
    /// Configured lifetime of a token kind
    pub fn ttl(&self, kind: TokenKind) -> Duration {
        self.keys(kind).ttl
    }

    /// 토큰 발급. `ttl`이 없으면 종류별 기본 수명을 사용
    /// Sign a token of the given kind; `ttl` overrides the configured lifetime
    pub fn issue(
        &self,
        payload: &UserPayload,
        kind: TokenKind,
        ttl: Option<Duration>,
    ) -> Result<String, AppError> {
        let keys = self.keys(kind);
        let now = Utc::now().timestamp();
        let ttl = ttl.unwrap_or(keys.ttl);

        let claims = Claims {
            user: payload.clone(),
            iat: now,
            nbf: now,
            exp: now + ttl.num_seconds(),
        };

        encode(&Header::new(self.algorithm), &claims, &keys.encoding_key)
            .with_context(|| format!("Failed to sign {} token", kind))
            .map_err(AppError::from)
    }

    /// 토큰 검증 - 만료/위조/미활성은 에러가 아니라 결과로 반환
    /// Verify a token; expected failures come back as `Rejected`
    pub fn verify(&self, token: &str, kind: TokenKind) -> TokenVerification {
        let keys = self.keys(kind);

        match decode::<Claims>(token, &keys.decoding_key, &keys.validation) {
            Ok(data) => TokenVerification::Verified(data.claims),
            Err(e) => {
                let reason = match e.kind() {
                    ErrorKind::ExpiredSignature => TokenRejection::Expired,
                    ErrorKind::ImmatureSignature => TokenRejection::NotYetValid,
                    _ => TokenRejection::Invalid,
                };
                tracing::debug!(%kind, %reason, "token rejected");
                TokenVerification::Rejected(reason)
            }
        }
    }

    fn keys(&self, kind: TokenKind) -> &TokenKeys {
        match kind {
            TokenKind::Access => &self.access,
            TokenKind::Refresh => &self.refresh,
        }
    }
}

impl TokenKeys {
    fn load(algorithm: Algorithm, config: &TokenKeyConfig) -> Result<Self> {
        let private_pem = config.private_key_pem.as_bytes();
        let public_pem = config.public_key_pem.as_bytes();

        let (encoding_key, decoding_key) = match algorithm {
            Algorithm::RS256
            | Algorithm::RS384
            | Algorithm::RS512
            | Algorithm::PS256
            | Algorithm::PS384
            | Algorithm::PS512 => (
                EncodingKey::from_rsa_pem(private_pem)?,
                DecodingKey::from_rsa_pem(public_pem)?,
            ),
            Algorithm::ES256 | Algorithm::ES384 => (
                EncodingKey::from_ec_pem(private_pem)?,
                DecodingKey::from_ec_pem(public_pem)?,
            ),
            Algorithm::EdDSA => (
                EncodingKey::from_ed_pem(private_pem)?,
                DecodingKey::from_ed_pem(public_pem)?,
            ),
            Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512 => {
                bail!("Token algorithm must be asymmetric, got {:?}", algorithm)
            }
        };

        if config.ttl_secs <= 0 {
            bail!("Token lifetime must be positive, got {}s", config.ttl_secs);
        }

        let mut validation = Validation::new(algorithm);
        validation.validate_nbf = true;
        validation.leeway = 0;

        Ok(Self {
            encoding_key,
            decoding_key,
            validation,
            ttl: Duration::seconds(config.ttl_secs),
        })
    }
}
