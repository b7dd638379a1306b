use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::response::{ErrorResponse, FieldError};

// =============================================================================
// ERROR TYPES
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Validation failed")]
    Validation(Vec<FieldError>),

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("{0}")]
    Unauthorized(&'static str),

    #[error("{0}")]
    Forbidden(&'static str),

    #[error("Registrations are currently disabled")]
    RegistrationDisabled,

    #[error("Email not verified")]
    EmailNotVerified,

    #[error("User not found")]
    UserNotFound,

    #[error("Email already exists")]
    EmailAlreadyExists,

    #[error("Username already exists")]
    UsernameAlreadyExists,

    #[error("Too many failed login attempts. Try again later.")]
    AccountLocked,

    #[error("Invalid or expired token")]
    InvalidToken,

    #[error("Invalid or expired session")]
    InvalidSession,

    #[error("Invalid or expired two-factor token")]
    InvalidTwoFactorToken,

    #[error("Invalid 2FA code")]
    InvalidTwoFactorCode,

    #[error("Invalid backup code")]
    InvalidBackupCode,

    #[error("2FA not enabled")]
    TwoFactorNotEnabled,

    #[error("2FA already enabled")]
    TwoFactorAlreadyEnabled,

    #[error("Generate a 2FA secret before verifying")]
    TwoFactorNotInitialized,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::InvalidCredentials => StatusCode::UNAUTHORIZED,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::RegistrationDisabled => StatusCode::FORBIDDEN,
            Self::EmailNotVerified => StatusCode::FORBIDDEN,
            Self::UserNotFound => StatusCode::NOT_FOUND,
            Self::EmailAlreadyExists => StatusCode::CONFLICT,
            Self::UsernameAlreadyExists => StatusCode::CONFLICT,
            Self::AccountLocked => StatusCode::TOO_MANY_REQUESTS,
            Self::InvalidToken => StatusCode::BAD_REQUEST,
            Self::InvalidSession => StatusCode::UNAUTHORIZED,
            Self::InvalidTwoFactorToken => StatusCode::UNAUTHORIZED,
            Self::InvalidTwoFactorCode => StatusCode::UNAUTHORIZED,
            Self::InvalidBackupCode => StatusCode::UNAUTHORIZED,
            Self::TwoFactorNotEnabled => StatusCode::BAD_REQUEST,
            Self::TwoFactorAlreadyEnabled => StatusCode::BAD_REQUEST,
            Self::TwoFactorNotInitialized => StatusCode::BAD_REQUEST,
            Self::Database(e) if is_unique_violation(e) => StatusCode::CONFLICT,
            Self::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn internal(err: impl std::fmt::Display) -> Self {
        Self::Internal(err.to_string())
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = match self {
            Self::Validation(details) => ErrorResponse::with_details("Validation failed", details),
            Self::Database(ref e) if is_unique_violation(e) => {
                ErrorResponse::new(duplicate_message(e))
            }
            Self::Database(ref e) => {
                tracing::error!(error = %e, "Database error in auth flow");
                ErrorResponse::new("Internal server error")
            }
            Self::Internal(ref msg) => {
                tracing::error!(error = %msg, "Internal error in auth flow");
                ErrorResponse::new("Internal server error")
            }
            other => ErrorResponse::new(other.to_string()),
        };
        (status, Json(body)).into_response()
    }
}

/// Postgres unique constraint violation (SQLSTATE 23505).
pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err.code().as_deref() == Some("23505"),
        _ => false,
    }
}

fn duplicate_message(err: &sqlx::Error) -> &'static str {
    let constraint = match err {
        sqlx::Error::Database(db_err) => db_err.constraint().unwrap_or_default(),
        _ => "",
    };
    match constraint {
        "uq_users_email" => "Email already exists",
        "uq_users_username" | "uq_users_username_lower" => "Username already exists",
        _ => "Resource already exists",
    }
}
