use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::config::DbPool;
use crate::modules::auth::model::UserSession;

const COLUMNS: &str = "id, user_id, token_hash, expires_at, ip_address, user_agent, created_at";

pub struct SessionCrud {
    pool: DbPool,
}

impl SessionCrud {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        user_id: Uuid,
        token_hash: &str,
        expires_at: DateTime<Utc>,
        ip_address: Option<&str>,
        user_agent: Option<&str>,
    ) -> Result<UserSession, sqlx::Error> {
        let query = format!(
            "INSERT INTO user_sessions (id, user_id, token_hash, expires_at, ip_address, user_agent)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, UserSession>(&query)
            .bind(Uuid::new_v4())
            .bind(user_id)
            .bind(token_hash)
            .bind(expires_at)
            .bind(ip_address)
            .bind(user_agent)
            .fetch_one(&self.pool)
            .await
    }

    /// Unexpired session for the given digest.
    pub async fn find_active(&self, token_hash: &str) -> Result<Option<UserSession>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM user_sessions WHERE token_hash = $1 AND expires_at > NOW()");
        sqlx::query_as::<_, UserSession>(&query)
            .bind(token_hash)
            .fetch_optional(&self.pool)
            .await
    }

    /// Returns the owner of the deleted session, if any.
    pub async fn delete_by_hash(&self, token_hash: &str) -> Result<Option<Uuid>, sqlx::Error> {
        let row: Option<(Uuid,)> = sqlx::query_as("DELETE FROM user_sessions WHERE token_hash = $1 RETURNING user_id")
            .bind(token_hash)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(|(user_id,)| user_id))
    }

    pub async fn delete_all_for_user(&self, user_id: Uuid) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM user_sessions WHERE user_id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    pub async fn delete_expired(&self) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM user_sessions WHERE expires_at <= NOW()")
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}
