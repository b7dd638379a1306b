use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::model::AuditLog;
use crate::config::DbPool;
use crate::services::client_info::ClientInfo;

const COLUMNS: &str = "id, user_id, action, details, ip_address, user_agent, created_at";

// Each filter is skipped when its parameter is NULL.
const FILTER: &str = "WHERE ($1::uuid IS NULL OR user_id = $1)
                        AND ($2::text IS NULL OR action ILIKE '%' || $2 || '%')
                        AND ($3::timestamptz IS NULL OR created_at >= $3)
                        AND ($4::timestamptz IS NULL OR created_at <= $4)";

#[derive(Debug, Clone)]
pub struct NewAuditLog {
    pub user_id: Option<Uuid>,
    pub action: &'static str,
    pub details: serde_json::Value,
    pub client: ClientInfo,
}

impl NewAuditLog {
    pub fn new(user_id: Option<Uuid>, action: &'static str, details: serde_json::Value, client: &ClientInfo) -> Self {
        Self {
            user_id,
            action,
            details,
            client: client.clone(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct AuditFilter {
    pub user_id: Option<Uuid>,
    pub action: Option<String>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

pub struct AuditCrud {
    pool: DbPool,
}

impl AuditCrud {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub async fn record(&self, entry: &NewAuditLog) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO audit_logs (id, user_id, action, details, ip_address, user_agent, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, NOW())
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(entry.user_id)
        .bind(entry.action)
        .bind(&entry.details)
        .bind(&entry.client.ip_address)
        .bind(&entry.client.user_agent)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Records the entry and logs instead of failing. Used after in-memory
    /// admin mutations that have already been applied.
    pub async fn record_or_log(&self, entry: &NewAuditLog) {
        if let Err(e) = self.record(entry).await {
            tracing::error!(error = %e, action = entry.action, "Failed to write audit log");
        }
    }

    /// Newest first.
    pub async fn list(&self, filter: &AuditFilter, limit: i64, offset: i64) -> Result<Vec<AuditLog>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM audit_logs {FILTER}
             ORDER BY created_at DESC, id DESC
             LIMIT $5 OFFSET $6"
        );
        sqlx::query_as::<_, AuditLog>(&query)
            .bind(filter.user_id)
            .bind(&filter.action)
            .bind(filter.from)
            .bind(filter.to)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await
    }

    pub async fn count(&self, filter: &AuditFilter) -> Result<i64, sqlx::Error> {
        let query = format!("SELECT COUNT(*) FROM audit_logs {FILTER}");
        sqlx::query_scalar::<_, i64>(&query)
            .bind(filter.user_id)
            .bind(&filter.action)
            .bind(filter.from)
            .bind(filter.to)
            .fetch_one(&self.pool)
            .await
    }
}
