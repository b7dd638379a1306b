use uuid::Uuid;

use crate::config::DbPool;
use crate::modules::auth::model::UserTwoFactor;

const COLUMNS: &str = "id, user_id, secret, enabled, enabled_at, backup_codes, created_at, updated_at";

pub struct TwoFactorCrud {
    pool: DbPool,
}

impl TwoFactorCrud {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_user(&self, user_id: Uuid) -> Result<Option<UserTwoFactor>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM user_2fa WHERE user_id = $1");
        sqlx::query_as::<_, UserTwoFactor>(&query)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
    }

    pub async fn is_enabled(&self, user_id: Uuid) -> Result<bool, sqlx::Error> {
        Ok(self.find_by_user(user_id).await?.is_some_and(|t| t.enabled))
    }

    /// Stores a fresh, not yet enabled secret, replacing any earlier pending one.
    pub async fn upsert_pending(
        &self,
        user_id: Uuid,
        secret: &str,
        backup_code_hashes: &[String],
    ) -> Result<UserTwoFactor, sqlx::Error> {
        let query = format!(
            "INSERT INTO user_2fa (id, user_id, secret, enabled, backup_codes)
             VALUES ($1, $2, $3, FALSE, $4)
             ON CONFLICT (user_id) DO UPDATE SET
                secret = EXCLUDED.secret,
                enabled = FALSE,
                enabled_at = NULL,
                backup_codes = EXCLUDED.backup_codes,
                updated_at = NOW()
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, UserTwoFactor>(&query)
            .bind(Uuid::new_v4())
            .bind(user_id)
            .bind(secret)
            .bind(backup_code_hashes)
            .fetch_one(&self.pool)
            .await
    }

    pub async fn enable(&self, user_id: Uuid) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE user_2fa SET enabled = TRUE, enabled_at = NOW(), updated_at = NOW() WHERE user_id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Removes a backup code hash in one statement so a code cannot be
    /// spent twice by concurrent requests.
    pub async fn consume_backup_code(&self, user_id: Uuid, hash: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE user_2fa
            SET backup_codes = array_remove(backup_codes, $2), updated_at = NOW()
            WHERE user_id = $1 AND enabled AND $2 = ANY(backup_codes)
            "#,
        )
        .bind(user_id)
        .bind(hash)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() == 1)
    }

    pub async fn delete(&self, user_id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM user_2fa WHERE user_id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
