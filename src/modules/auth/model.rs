use chrono::{DateTime, Utc};
use sqlx::FromRow;
use std::str::FromStr;
use uuid::Uuid;

// =============================================================================
// ROLE
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    SmeOwner,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::SmeOwner => "sme_owner",
            Self::Admin => "admin",
        }
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "user" => Ok(Self::User),
            "sme_owner" => Ok(Self::SmeOwner),
            "admin" => Ok(Self::Admin),
            other => Err(format!("Unknown role: {}", other)),
        }
    }
}

// =============================================================================
// USER
// =============================================================================

#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    /// `None` for accounts created through Google sign-in.
    pub password_hash: Option<String>,
    pub email_verified: bool,
    pub email_verified_at: Option<DateTime<Utc>>,
    pub is_active: bool,
    pub last_login_at: Option<DateTime<Utc>>,
    pub google_id: Option<String>,
    pub role: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub avatar_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn role(&self) -> Role {
        self.role.parse().unwrap_or(Role::User)
    }
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: Option<String>,
    pub google_id: Option<String>,
    pub role: Role,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub avatar_url: Option<String>,
}

// =============================================================================
// TWO FACTOR
// =============================================================================

#[derive(Debug, Clone, FromRow)]
pub struct UserTwoFactor {
    pub id: Uuid,
    pub user_id: Uuid,
    pub secret: String,
    pub enabled: bool,
    pub enabled_at: Option<DateTime<Utc>>,
    /// SHA-256 digests of the unused backup codes.
    pub backup_codes: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// LOGIN ATTEMPTS
// =============================================================================

#[derive(Debug, Clone, FromRow)]
pub struct LoginAttempt {
    pub id: Uuid,
    pub email: String,
    pub user_id: Option<Uuid>,
    pub success: bool,
    pub failure_reason: Option<String>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub attempted_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureReason {
    UnknownEmail,
    InvalidPassword,
    Inactive,
    NoPassword,
    EmailNotVerified,
    InvalidTwoFactorCode,
    InvalidBackupCode,
    Locked,
}

impl FailureReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UnknownEmail => "unknown_email",
            Self::InvalidPassword => "invalid_password",
            Self::Inactive => "inactive",
            Self::NoPassword => "no_password",
            Self::EmailNotVerified => "email_not_verified",
            Self::InvalidTwoFactorCode => "invalid_two_factor_code",
            Self::InvalidBackupCode => "invalid_backup_code",
            Self::Locked => "locked",
        }
    }
}

// =============================================================================
// SESSIONS & ONE-TIME TOKENS
// =============================================================================

#[derive(Debug, Clone, FromRow)]
pub struct UserSession {
    pub id: Uuid,
    pub user_id: Uuid,
    pub token_hash: String,
    pub expires_at: DateTime<Utc>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Row shape shared by `password_reset_tokens` and `email_verification_tokens`.
#[derive(Debug, Clone, FromRow)]
pub struct OneTimeToken {
    pub id: Uuid,
    pub user_id: Uuid,
    pub token_hash: String,
    pub expires_at: DateTime<Utc>,
    pub used_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl OneTimeToken {
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        self.used_at.is_none() && self.expires_at > now
    }
}
