use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// Action names written to `audit_logs.action`.
pub mod actions {
    pub const USER_REGISTERED: &str = "user.registered";
    pub const USER_LOGIN: &str = "user.login";
    pub const USER_LOGOUT: &str = "user.logout";
    pub const USER_PROFILE_UPDATED: &str = "user.profile_updated";
    pub const USER_PASSWORD_RESET_REQUESTED: &str = "user.password_reset_requested";
    pub const USER_PASSWORD_RESET: &str = "user.password_reset";
    pub const USER_EMAIL_VERIFIED: &str = "user.email_verified";
    pub const TWO_FACTOR_ENABLED: &str = "user.2fa_enabled";
    pub const TWO_FACTOR_DISABLED: &str = "user.2fa_disabled";
    pub const TWO_FACTOR_BACKUP_CODE_USED: &str = "user.2fa_backup_code_used";
    pub const SME_STATUS_CHANGED: &str = "sme.status_changed";
    pub const REVIEW_STATUS_CHANGED: &str = "review.status_changed";
    pub const SETTINGS_UPDATED: &str = "settings.updated";
    pub const IMPORT_VALIDATED: &str = "import.validated";
}

#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditLog {
    pub id: Uuid,
    pub user_id: Option<Uuid>,
    pub action: String,
    pub details: serde_json::Value,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub created_at: DateTime<Utc>,
}
