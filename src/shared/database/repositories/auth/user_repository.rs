use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Postgres, Row, Transaction};
use uuid::Uuid;

use crate::domains::auth::models::user::{NewUser, User, DEFAULT_ROLE};

/// 사용자 저장소 인터페이스
/// Credential store seam.
///
/// 모든 이메일은 정규화된 값으로 전달된다.
/// Emails passed in are already normalized.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>>;

    /// 사용자 생성을 시작 (커밋 전까지 확정되지 않음)
    /// Start creating a user. Nothing is visible until [`PendingUser::commit`];
    /// dropping the handle rolls the insert back.
    /// Returns `None` when the email is already registered.
    async fn begin_create(&self, new_user: NewUser) -> Result<Option<Box<dyn PendingUser>>>;

    /// 인증 토큰 해시가 일치하고 만료 전이면 verified 처리 후 토큰 제거
    /// Mark the user owning this unexpired verification token hash as verified
    /// and clear the token, in one statement.
    async fn verify_email(&self, token_hash: &str, now: DateTime<Utc>) -> Result<Option<User>>;

    async fn set_verification_token(
        &self,
        user_id: Uuid,
        token_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<()>;

    async fn set_reset_token(
        &self,
        user_id: Uuid,
        token_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<()>;

    /// 이메일 + 재설정 토큰 해시 + 만료 조건이 모두 맞을 때만 비밀번호 변경
    /// Replace the password only when email, reset token hash and expiry all match.
    /// Returns whether a row was updated.
    async fn reset_password(
        &self,
        email: &str,
        token_hash: &str,
        new_password_hash: &str,
        now: DateTime<Utc>,
    ) -> Result<bool>;
}

/// 커밋 대기 중인 사용자 생성
/// A user insert held open until the caller commits it
#[async_trait]
pub trait PendingUser: Send {
    fn user(&self) -> &User;

    async fn commit(&mut self) -> Result<()>;
}

const USER_COLUMNS: &str = "id, name, email, password_hash, role, verified, \
    verification_token, verification_token_expires_at, \
    reset_token, reset_token_expires_at, created_at, updated_at";

fn user_from_row(row: &PgRow) -> User {
    User {
        id: row.get("id"),
        name: row.get("name"),
        email: row.get("email"),
        password_hash: row.get("password_hash"),
        role: row.get("role"),
        verified: row.get("verified"),
        verification_token: row.get("verification_token"),
        verification_token_expires_at: row.get("verification_token_expires_at"),
        reset_token: row.get("reset_token"),
        reset_token_expires_at: row.get("reset_token_expires_at"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

/// PostgreSQL 사용자 저장소
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// 트랜잭션 안에서 INSERT된 사용자
struct PgPendingUser {
    tx: Option<Transaction<'static, Postgres>>,
    user: User,
}

#[async_trait]
impl PendingUser for PgPendingUser {
    fn user(&self) -> &User {
        &self.user
    }

    async fn commit(&mut self) -> Result<()> {
        let tx = self
            .tx
            .take()
            .ok_or_else(|| anyhow!("User creation already committed"))?;
        tx.commit().await.context("Failed to commit user creation")
    }
}

#[async_trait]
impl UserStore for UserRepository {
    // 이메일로 사용자 조회 (로그인용)
    // Get user by email (for login)
    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let row = sqlx::query(&format!("SELECT {} FROM users WHERE email = $1", USER_COLUMNS))
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to fetch user by email")?;

        Ok(row.as_ref().map(user_from_row))
    }

    async fn begin_create(&self, new_user: NewUser) -> Result<Option<Box<dyn PendingUser>>> {
        let mut tx = self
            .pool
            .begin()
            .await
            .context("Failed to begin user transaction")?;

        // 동시에 같은 이메일로 가입하면 두 번째 INSERT는 첫 트랜잭션이 끝날 때까지 대기
        let now = Utc::now();
        let row = sqlx::query(&format!(
            r#"
            INSERT INTO users (id, name, email, password_hash, role, verified,
                               verification_token, verification_token_expires_at,
                               created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, FALSE, $6, $7, $8, $8)
            ON CONFLICT (email) DO NOTHING
            RETURNING {}
            "#,
            USER_COLUMNS
        ))
        .bind(Uuid::new_v4())
        .bind(&new_user.name)
        .bind(&new_user.email)
        .bind(&new_user.password_hash)
        .bind(DEFAULT_ROLE)
        .bind(&new_user.verification_token)
        .bind(new_user.verification_token_expires_at)
        .bind(now)
        .fetch_optional(&mut tx)
        .await
        .context("Failed to create user")?;

        Ok(row.map(|row| {
            Box::new(PgPendingUser {
                tx: Some(tx),
                user: user_from_row(&row),
            }) as Box<dyn PendingUser>
        }))
    }

    async fn verify_email(&self, token_hash: &str, now: DateTime<Utc>) -> Result<Option<User>> {
        let row = sqlx::query(&format!(
            r#"
            UPDATE users
            SET verified = TRUE,
                verification_token = NULL,
                verification_token_expires_at = NULL,
                updated_at = $2
            WHERE verification_token = $1
              AND verification_token_expires_at > $2
            RETURNING {}
            "#,
            USER_COLUMNS
        ))
        .bind(token_hash)
        .bind(now)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to verify email")?;

        Ok(row.as_ref().map(user_from_row))
    }

    async fn set_verification_token(
        &self,
        user_id: Uuid,
        token_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE users
            SET verification_token = $2,
                verification_token_expires_at = $3,
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(user_id)
        .bind(token_hash)
        .bind(expires_at)
        .execute(&self.pool)
        .await
        .context("Failed to store verification token")?;

        Ok(())
    }

    async fn set_reset_token(
        &self,
        user_id: Uuid,
        token_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE users
            SET reset_token = $2,
                reset_token_expires_at = $3,
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(user_id)
        .bind(token_hash)
        .bind(expires_at)
        .execute(&self.pool)
        .await
        .context("Failed to store reset token")?;

        Ok(())
    }

    async fn reset_password(
        &self,
        email: &str,
        token_hash: &str,
        new_password_hash: &str,
        now: DateTime<Utc>,
    ) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET password_hash = $3,
                reset_token = NULL,
                reset_token_expires_at = NULL,
                updated_at = $4
            WHERE email = $1
              AND reset_token = $2
              AND reset_token_expires_at > $4
            "#,
        )
        .bind(email)
        .bind(token_hash)
        .bind(new_password_hash)
        .bind(now)
        .execute(&self.pool)
        .await
        .context("Failed to reset password")?;

        Ok(result.rows_affected() > 0)
    }
}
