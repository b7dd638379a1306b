use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::config::DbPool;
use crate::modules::auth::model::{FailureReason, LoginAttempt};

pub struct NewLoginAttempt<'a> {
    pub email: &'a str,
    pub user_id: Option<Uuid>,
    pub failure: Option<FailureReason>,
    pub ip_address: Option<&'a str>,
    pub user_agent: Option<&'a str>,
}

pub struct LoginAttemptCrud {
    pool: DbPool,
}

impl LoginAttemptCrud {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub async fn record(&self, attempt: &NewLoginAttempt<'_>) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO login_attempts (id, email, user_id, success, failure_reason, ip_address, user_agent, attempted_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, NOW())
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(attempt.email)
        .bind(attempt.user_id)
        .bind(attempt.failure.is_none())
        .bind(attempt.failure.map(|f| f.as_str()))
        .bind(attempt.ip_address)
        .bind(attempt.user_agent)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Failures for `email` since `since`. Rejections caused by an active
    /// lockout are not counted, so the lock lifts once the window passes.
    pub async fn count_recent_failures(&self, email: &str, since: DateTime<Utc>) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*) FROM login_attempts
            WHERE email = $1
              AND success = FALSE
              AND failure_reason IS DISTINCT FROM $3
              AND attempted_at >= $2
            "#,
        )
        .bind(email)
        .bind(since)
        .bind(FailureReason::Locked.as_str())
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }

    pub async fn list_for_email(&self, email: &str, limit: i64) -> Result<Vec<LoginAttempt>, sqlx::Error> {
        sqlx::query_as::<_, LoginAttempt>(
            r#"
            SELECT id, email, user_id, success, failure_reason, ip_address, user_agent, attempted_at
            FROM login_attempts
            WHERE email = $1
            ORDER BY attempted_at DESC
            LIMIT $2
            "#,
        )
        .bind(email)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
    }
}
