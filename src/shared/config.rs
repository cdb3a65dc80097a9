//! Configuration module for environment variables and application settings

use anyhow::{anyhow, Context, Result};
use std::env;
use std::path::Path;

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub redis_url: String,
    pub tokens: TokenConfig,
    pub gemini: GeminiConfig,
    pub mail: MailConfig,
    pub recipe: RecipeConfig,

    /// 비밀번호 재설정 / 이메일 인증 링크의 기본 URL
    /// Base URL of the web client, used to build links sent by email
    pub client_url: String,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors_origin: String,
    /// Refresh Token 쿠키에 Secure 속성 부여 여부
    pub secure_cookies: bool,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

/// 토큰 종류별 키 설정
/// Key material and lifetime for one token kind
#[derive(Debug, Clone)]
pub struct TokenKeyConfig {
    pub private_key_pem: String,
    pub public_key_pem: String,
    pub ttl_secs: i64,
}

#[derive(Debug, Clone)]
pub struct TokenConfig {
    /// 비대칭 서명 알고리즘 (RS256, ES256, EdDSA ...)
    pub algorithm: String,
    pub access: TokenKeyConfig,
    pub refresh: TokenKeyConfig,
}

#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
}

#[derive(Debug, Clone)]
pub struct MailConfig {
    pub smtp_host: String,
    pub smtp_port: u16,
    pub username: String,
    pub password: String,
    pub from_name: String,
    pub from_address: String,
}

#[derive(Debug, Clone)]
pub struct RecipeConfig {
    pub daily_generation_limit: u32,
    pub cache_ttl_secs: u64,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            server: ServerConfig {
                host: env_or("SERVER_HOST", "0.0.0.0"),
                port: parse_or("PORT", 3000)?,
                cors_origin: env_or("CORS_ORIGIN", "http://localhost:5173"),
                secure_cookies: parse_or("SECURE_COOKIES", false)?,
            },

            database: DatabaseConfig {
                url: required("DATABASE_URL")?,
                max_connections: parse_or("DATABASE_MAX_CONNECTIONS", 10)?,
            },

            redis_url: env_or("REDIS_URL", "redis://127.0.0.1:6379"),

            tokens: TokenConfig {
                algorithm: env_or("TOKEN_ALGORITHM", "RS256"),
                access: TokenKeyConfig {
                    private_key_pem: pem("ACCESS_TOKEN_PRIVATE_KEY")?,
                    public_key_pem: pem("ACCESS_TOKEN_PUBLIC_KEY")?,
                    ttl_secs: parse_or("ACCESS_TOKEN_TTL_SECS", 15 * 60)?,
                },
                refresh: TokenKeyConfig {
                    private_key_pem: pem("REFRESH_TOKEN_PRIVATE_KEY")?,
                    public_key_pem: pem("REFRESH_TOKEN_PUBLIC_KEY")?,
                    ttl_secs: parse_or("REFRESH_TOKEN_TTL_SECS", 7 * 24 * 60 * 60)?,
                },
            },

            gemini: GeminiConfig {
                api_key: required("GEMINI_API_KEY")?,
                model: env_or("GEMINI_MODEL", "gemini-2.0-flash-001"),
                base_url: env_or(
                    "GEMINI_BASE_URL",
                    "https://generativelanguage.googleapis.com/v1beta",
                ),
            },

            mail: MailConfig {
                smtp_host: env_or("SMTP_HOST", "smtp.gmail.com"),
                smtp_port: parse_or("SMTP_PORT", 587)?,
                username: required("SMTP_USERNAME")?,
                password: required("SMTP_PASSWORD")?,
                from_name: env_or("MAIL_FROM_NAME", "Recipe Generator"),
                from_address: required("MAIL_FROM_ADDRESS")?,
            },

            recipe: RecipeConfig {
                daily_generation_limit: parse_or("DAILY_GENERATION_LIMIT", 5)?,
                cache_ttl_secs: parse_or("RECIPE_CACHE_TTL_SECS", 24 * 60 * 60)?,
            },

            client_url: env_or("CLIENT_URL", "http://localhost:5173"),
        })
    }
}

fn required(key: &str) -> Result<String> {
    env::var(key).map_err(|_| anyhow!("{} environment variable is required", key))
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_or<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e| anyhow!("{} has an invalid value {:?}: {}", key, raw, e)),
        Err(_) => Ok(default),
    }
}

/// PEM 본문 또는 PEM 파일 경로를 허용
/// Accepts either inline PEM text (`\n` escapes allowed) or a path to a PEM file
fn pem(key: &str) -> Result<String> {
    let raw = required(key)?;
    if raw.contains("-----BEGIN") {
        return Ok(raw.replace("\\n", "\n"));
    }

    let path = Path::new(raw.trim());
    std::fs::read_to_string(path)
        .with_context(|| format!("{} points to an unreadable file: {}", key, path.display()))
}
