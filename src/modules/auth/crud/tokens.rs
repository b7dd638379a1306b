use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use crate::config::DbPool;
use crate::modules::auth::model::OneTimeToken;

const COLUMNS: &str = "id, user_id, token_hash, expires_at, used_at, created_at";

/// The two single-use token tables share one shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    PasswordReset,
    EmailVerification,
}

impl TokenKind {
    fn table(&self) -> &'static str {
        match self {
            Self::PasswordReset => "password_reset_tokens",
            Self::EmailVerification => "email_verification_tokens",
        }
    }

    pub fn lifetime(&self) -> Duration {
        match self {
            Self::PasswordReset => Duration::hours(1),
            Self::EmailVerification => Duration::hours(24),
        }
    }
}

pub struct TokenCrud {
    pool: DbPool,
    kind: TokenKind,
}

impl TokenCrud {
    pub fn new(pool: DbPool, kind: TokenKind) -> Self {
        Self { pool, kind }
    }

    pub async fn create(&self, user_id: Uuid, token_hash: &str, expires_at: DateTime<Utc>) -> Result<OneTimeToken, sqlx::Error> {
        let query = format!(
            "INSERT INTO {} (id, user_id, token_hash, expires_at) VALUES ($1, $2, $3, $4) RETURNING {COLUMNS}",
            self.kind.table()
        );
        sqlx::query_as::<_, OneTimeToken>(&query)
            .bind(Uuid::new_v4())
            .bind(user_id)
            .bind(token_hash)
            .bind(expires_at)
            .fetch_one(&self.pool)
            .await
    }

    /// Issues with the default lifetime for this kind.
    pub async fn issue(&self, user_id: Uuid, token_hash: &str) -> Result<OneTimeToken, sqlx::Error> {
        self.create(user_id, token_hash, Utc::now() + self.kind.lifetime()).await
    }

    pub async fn find_by_hash(&self, token_hash: &str) -> Result<Option<OneTimeToken>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM {} WHERE token_hash = $1", self.kind.table());
        sqlx::query_as::<_, OneTimeToken>(&query)
            .bind(token_hash)
            .fetch_optional(&self.pool)
            .await
    }

    /// Marks the token used unless it already was. Returns whether this call
    /// consumed it, which guards against two concurrent redemptions.
    pub async fn mark_used(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        let query = format!(
            "UPDATE {} SET used_at = NOW() WHERE id = $1 AND used_at IS NULL",
            self.kind.table()
        );
        let result = sqlx::query(&query).bind(id).execute(&self.pool).await?;
        Ok(result.rows_affected() == 1)
    }

    /// Invalidates every outstanding token of this kind for the user.
    pub async fn invalidate_for_user(&self, user_id: Uuid) -> Result<u64, sqlx::Error> {
        let query = format!(
            "UPDATE {} SET used_at = NOW() WHERE user_id = $1 AND used_at IS NULL",
            self.kind.table()
        );
        let result = sqlx::query(&query).bind(user_id).execute(&self.pool).await?;
        Ok(result.rows_affected())
    }
}
