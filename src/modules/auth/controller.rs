use axum::{extract::State, http::StatusCode, Json};
use chrono::{Duration, Utc};
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;
use validator::{Validate, ValidationErrors};

use super::crud::{LoginAttemptCrud, NewLoginAttempt, SessionCrud, TokenCrud, TokenKind, TwoFactorCrud, UserCrud};
use super::guard::AuthUser;
use super::interface::AuthError;
use super::model::{FailureReason, NewUser, ProfileUpdate, Role, User};
use super::schema::{
    ForgotPasswordRequest, LoginRequest, LoginResponse, LogoutRequest, MessageResponse, PasswordStrengthRequest,
    RefreshRequest, RefreshResponse, RegisterRequest, RegisterResponse, ResetPasswordRequest, TokenResponse, TwoFactorChallenge, TwoFactorCodeRequest,
    TwoFactorLoginRequest, TwoFactorSetupResponse, UpdateProfileRequest, UserResponse, VerifyEmailRequest,
};
use crate::modules::audit::{model::actions, AuditCrud, NewAuditLog};
use crate::response::{validation_details, FieldError};
use crate::services::backup_codes::{self, BACKUP_CODE_COUNT};
use crate::services::client_info::ClientInfo;
use crate::services::hashing::{self, sha256_hex};
use crate::services::password::{password_strength, PasswordStrength};
use crate::services::tokens::issue_token;
use crate::services::totp;
use crate::AppState;

/// Failed attempts within the window that lock an email out.
const LOCKOUT_THRESHOLD: i64 = 5;
const LOCKOUT_WINDOW_MINUTES: i64 = 15;

fn invalid(errors: ValidationErrors) -> AuthError {
    AuthError::Validation(validation_details(&errors))
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

async fn audit(state: &AppState, user_id: Option<Uuid>, action: &'static str, details: serde_json::Value, client: &ClientInfo) -> Result<(), AuthError> {
    AuditCrud::new(state.db.clone())
        .record(&NewAuditLog::new(user_id, action, details, client))
        .await?;
    Ok(())
}

// =============================================================================
// POST /api/auth/register
// =============================================================================

pub async fn register(
    State(state): State<Arc<AppState>>,
    client: ClientInfo,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>), AuthError> {
    if !state.settings.get().await.allow_registrations {
        return Err(AuthError::RegistrationDisabled);
    }
    req.validate().map_err(invalid)?;

    let email = normalize_email(&req.email);
    let users = UserCrud::new(state.db.clone());

    if users.email_exists(&email).await? {
        return Err(AuthError::EmailAlreadyExists);
    }
    if users.username_exists(&req.username).await? {
        return Err(AuthError::UsernameAlreadyExists);
    }

    let password_hash = hashing::hash_password(&req.password).map_err(AuthError::internal)?;

    // A concurrent registration can still hit the unique constraints; the
    // 23505 error maps to 409.
    let user = users
        .create(&NewUser {
            username: req.username.clone(),
            email,
            password_hash: Some(password_hash),
            google_id: None,
            role: Role::User,
            first_name: req.first_name.clone(),
            last_name: req.last_name.clone(),
        })
        .await?;

    let verification = issue_token();
    TokenCrud::new(state.db.clone(), TokenKind::EmailVerification)
        .issue(user.id, &verification.hash)
        .await?;

    audit(&state, Some(user.id), actions::USER_REGISTERED, json!({ "username": user.username }), &client).await?;
    tracing::info!(user_id = %user.id, username = %user.username, "User registered");

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            user: UserResponse::new(user, false),
        }),
    ))
}

// =============================================================================
// POST /api/auth/login
// =============================================================================

pub async fn login(
    State(state): State<Arc<AppState>>,
    client: ClientInfo,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AuthError> {
    req.validate().map_err(invalid)?;

    let email = normalize_email(&req.email);
    ensure_not_locked(&state, &email, &client).await?;

    let Some(user) = UserCrud::new(state.db.clone()).find_by_email(&email).await? else {
        return Err(reject_login(&state, &email, None, FailureReason::UnknownEmail, &client).await);
    };
    if !user.is_active {
        return Err(reject_login(&state, &email, Some(user.id), FailureReason::Inactive, &client).await);
    }
    let Some(password_hash) = user.password_hash.as_deref() else {
        return Err(reject_login(&state, &email, Some(user.id), FailureReason::NoPassword, &client).await);
    };
    if !hashing::verify_password(&req.password, password_hash).map_err(AuthError::internal)? {
        return Err(reject_login(&state, &email, Some(user.id), FailureReason::InvalidPassword, &client).await);
    }
    if state.settings.get().await.require_email_verification && !user.email_verified {
        return Err(reject_login(&state, &email, Some(user.id), FailureReason::EmailNotVerified, &client).await);
    }

    if TwoFactorCrud::new(state.db.clone()).is_enabled(user.id).await? {
        // The password step succeeded; the second factor is recorded separately.
        record_attempt(&state, &email, Some(user.id), None, &client).await?;
        let two_factor_token = state
            .jwt_service
            .create_two_factor_token(&user.id)
            .map_err(AuthError::internal)?;
        state.metrics.two_factor_events_total.with_label_values(&["challenged"]).inc();
        tracing::info!(user_id = %user.id, "Password accepted, awaiting 2FA");

        return Ok(Json(LoginResponse::TwoFactorRequired(TwoFactorChallenge {
            requires_two_factor: true,
            two_factor_token,
        })));
    }

    let tokens = complete_login(&state, user, false, &client).await?;
    Ok(Json(LoginResponse::Authenticated(tokens)))
}

async fn ensure_not_locked(state: &AppState, email: &str, client: &ClientInfo) -> Result<(), AuthError> {
    let since = Utc::now() - Duration::minutes(LOCKOUT_WINDOW_MINUTES);
    let failures = LoginAttemptCrud::new(state.db.clone())
        .count_recent_failures(email, since)
        .await?;
    if failures >= LOCKOUT_THRESHOLD {
        return Err(reject_login(state, email, None, FailureReason::Locked, client).await);
    }
    Ok(())
}

async fn record_attempt(
    state: &AppState,
    email: &str,
    user_id: Option<Uuid>,
    failure: Option<FailureReason>,
    client: &ClientInfo,
) -> Result<(), sqlx::Error> {
    LoginAttemptCrud::new(state.db.clone())
        .record(&NewLoginAttempt {
            email,
            user_id,
            failure,
            ip_address: client.ip_address.as_deref(),
            user_agent: client.user_agent.as_deref(),
        })
        .await
}

/// Records the failed attempt and returns the error the caller should see.
async fn reject_login(
    state: &AppState,
    email: &str,
    user_id: Option<Uuid>,
    reason: FailureReason,
    client: &ClientInfo,
) -> AuthError {
    if let Err(e) = record_attempt(state, email, user_id, Some(reason), client).await {
        return AuthError::Database(e);
    }
    state.metrics.login_attempts_total.with_label_values(&[reason.as_str()]).inc();
    tracing::warn!(email = %email, reason = reason.as_str(), ip = ?client.ip_address, "Login rejected");

    match reason {
        FailureReason::Locked => AuthError::AccountLocked,
        FailureReason::EmailNotVerified => AuthError::EmailNotVerified,
        FailureReason::InvalidTwoFactorCode => AuthError::InvalidTwoFactorCode,
        FailureReason::InvalidBackupCode => AuthError::InvalidBackupCode,
        _ => AuthError::InvalidCredentials,
    }
}

/// Issues the access token and session for a fully authenticated user.
async fn complete_login(state: &AppState, user: User, two_factor_enabled: bool, client: &ClientInfo) -> Result<TokenResponse, AuthError> {
    let access_token = state
        .jwt_service
        .create_access_token(&user.id, &user.email, &user.role)
        .map_err(AuthError::internal)?;

    let session = issue_token();
    let timeout = i64::from(state.settings.get().await.session_timeout_minutes);
    SessionCrud::new(state.db.clone())
        .create(
            user.id,
            &session.hash,
            Utc::now() + Duration::minutes(timeout),
            client.ip_address.as_deref(),
            client.user_agent.as_deref(),
        )
        .await?;

    UserCrud::new(state.db.clone()).touch_last_login(user.id).await?;
    record_attempt(state, &user.email, Some(user.id), None, client).await?;
    audit(state, Some(user.id), actions::USER_LOGIN, json!({ "twoFactor": two_factor_enabled }), client).await?;

    state.metrics.login_attempts_total.with_label_values(&["success"]).inc();
    tracing::info!(user_id = %user.id, two_factor = two_factor_enabled, "User logged in");

    let user = User {
        last_login_at: Some(Utc::now()),
        ..user
    };

    Ok(TokenResponse {
        access_token,
        session_token: session.raw,
        token_type: "Bearer",
        expires_in: state.jwt_service.get_access_token_duration_secs(),
        user: UserResponse::new(user, two_factor_enabled),
    })
}

// =============================================================================
// TWO FACTOR
// =============================================================================

fn check_totp(secret: &str, code: &str) -> Result<bool, AuthError> {
    totp::verify(secret, code, Utc::now().timestamp()).map_err(AuthError::internal)
}

/// POST /api/auth/2fa/generate
pub async fn generate_two_factor(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
) -> Result<Json<TwoFactorSetupResponse>, AuthError> {
    let crud = TwoFactorCrud::new(state.db.clone());
    if crud.is_enabled(user.id).await? {
        return Err(AuthError::TwoFactorAlreadyEnabled);
    }

    let secret = totp::generate_secret();
    let codes = backup_codes::generate(BACKUP_CODE_COUNT);
    let hashes: Vec<String> = codes.iter().map(|c| backup_codes::hash(c)).collect();
    crud.upsert_pending(user.id, &secret, &hashes).await?;

    let issuer = state.settings.get().await.site_name;
    state.metrics.two_factor_events_total.with_label_values(&["generated"]).inc();

    Ok(Json(TwoFactorSetupResponse {
        qr_code_url: totp::provisioning_url(&issuer, &user.email, &secret),
        secret,
        backup_codes: codes,
    }))
}

/// POST /api/auth/2fa/verify - enables 2FA once the first code matches
pub async fn verify_two_factor(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
    client: ClientInfo,
    Json(req): Json<TwoFactorCodeRequest>,
) -> Result<Json<MessageResponse>, AuthError> {
    req.validate().map_err(invalid)?;

    let crud = TwoFactorCrud::new(state.db.clone());
    let record = crud.find_by_user(user.id).await?.ok_or(AuthError::TwoFactorNotInitialized)?;
    if record.enabled {
        return Err(AuthError::TwoFactorAlreadyEnabled);
    }
    if !check_totp(&record.secret, &req.code)? {
        state.metrics.two_factor_events_total.with_label_values(&["failed"]).inc();
        return Err(AuthError::InvalidTwoFactorCode);
    }

    crud.enable(user.id).await?;
    audit(&state, Some(user.id), actions::TWO_FACTOR_ENABLED, json!({}), &client).await?;
    state.metrics.two_factor_events_total.with_label_values(&["enabled"]).inc();
    tracing::info!(user_id = %user.id, "2FA enabled");

    Ok(Json(MessageResponse {
        message: "Two-factor authentication enabled",
    }))
}

/// POST /api/auth/2fa/login - second step of a 2FA login
pub async fn two_factor_login(
    State(state): State<Arc<AppState>>,
    client: ClientInfo,
    Json(req): Json<TwoFactorLoginRequest>,
) -> Result<Json<TokenResponse>, AuthError> {
    let user_id = state
        .jwt_service
        .verify_two_factor_token(&req.two_factor_token)
        .map_err(|_| AuthError::InvalidTwoFactorToken)?;

    let user = UserCrud::new(state.db.clone())
        .find_by_id(user_id)
        .await?
        .filter(|u| u.is_active)
        .ok_or(AuthError::InvalidTwoFactorToken)?;
    ensure_not_locked(&state, &user.email, &client).await?;

    let crud = TwoFactorCrud::new(state.db.clone());
    let record = crud
        .find_by_user(user.id)
        .await?
        .filter(|r| r.enabled)
        .ok_or(AuthError::TwoFactorNotEnabled)?;

    let code = req.code.as_deref().map(str::trim).filter(|c| !c.is_empty());
    let backup_code = req.backup_code.as_deref().map(str::trim).filter(|c| !c.is_empty());

    match (code, backup_code) {
        (Some(code), _) => {
            if !check_totp(&record.secret, code)? {
                return Err(reject_login(&state, &user.email, Some(user.id), FailureReason::InvalidTwoFactorCode, &client).await);
            }
        }
        (None, Some(backup_code)) => {
            if !crud.consume_backup_code(user.id, &backup_codes::hash(backup_code)).await? {
                return Err(reject_login(&state, &user.email, Some(user.id), FailureReason::InvalidBackupCode, &client).await);
            }
            let remaining = record.backup_codes.len().saturating_sub(1);
            audit(&state, Some(user.id), actions::TWO_FACTOR_BACKUP_CODE_USED, json!({ "remaining": remaining }), &client).await?;
            state.metrics.two_factor_events_total.with_label_values(&["backup_code_used"]).inc();
        }
        (None, None) => {
            return Err(AuthError::Validation(vec![FieldError::new(
                "code",
                "A 2FA code or backup code is required",
            )]));
        }
    }

    Ok(Json(complete_login(&state, user, true, &client).await?))
}

/// POST /api/auth/2fa/disable
pub async fn disable_two_factor(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
    client: ClientInfo,
    Json(req): Json<TwoFactorCodeRequest>,
) -> Result<Json<MessageResponse>, AuthError> {
    req.validate().map_err(invalid)?;

    let crud = TwoFactorCrud::new(state.db.clone());
    let record = crud
        .find_by_user(user.id)
        .await?
        .filter(|r| r.enabled)
        .ok_or(AuthError::TwoFactorNotEnabled)?;
    if !check_totp(&record.secret, &req.code)? {
        return Err(AuthError::InvalidTwoFactorCode);
    }

    crud.delete(user.id).await?;
    audit(&state, Some(user.id), actions::TWO_FACTOR_DISABLED, json!({}), &client).await?;
    state.metrics.two_factor_events_total.with_label_values(&["disabled"]).inc();
    tracing::info!(user_id = %user.id, "2FA disabled");

    Ok(Json(MessageResponse {
        message: "Two-factor authentication disabled",
    }))
}

// =============================================================================
// SESSION & PROFILE
// =============================================================================

/// POST /api/auth/logout
pub async fn logout(
    State(state): State<Arc<AppState>>,
    client: ClientInfo,
    Json(req): Json<LogoutRequest>,
) -> Result<Json<MessageResponse>, AuthError> {
    let removed = SessionCrud::new(state.db.clone())
        .delete_by_hash(&sha256_hex(&req.session_token))
        .await?;

    if let Some(user_id) = removed {
        audit(&state, Some(user_id), actions::USER_LOGOUT, json!({}), &client).await?;
        tracing::info!(user_id = %user_id, "User logged out");
    }

    Ok(Json(MessageResponse { message: "Logged out" }))
}

/// POST /api/auth/refresh - trades a live session for a new access token
pub async fn refresh(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RefreshRequest>,
) -> Result<Json<RefreshResponse>, AuthError> {
    let session = SessionCrud::new(state.db.clone())
        .find_active(&sha256_hex(&req.session_token))
        .await?
        .ok_or(AuthError::InvalidSession)?;

    let user = UserCrud::new(state.db.clone())
        .find_by_id(session.user_id)
        .await?
        .filter(|u| u.is_active)
        .ok_or(AuthError::InvalidSession)?;

    let access_token = state
        .jwt_service
        .create_access_token(&user.id, &user.email, &user.role)
        .map_err(AuthError::internal)?;
    tracing::debug!(user_id = %user.id, session_id = %session.id, "Access token refreshed");

    Ok(Json(RefreshResponse {
        access_token,
        token_type: "Bearer",
        expires_in: state.jwt_service.get_access_token_duration_secs(),
    }))
}

/// GET /api/auth/me
pub async fn me(user: AuthUser, State(state): State<Arc<AppState>>) -> Result<Json<UserResponse>, AuthError> {
    let account = UserCrud::new(state.db.clone())
        .find_by_id(user.id)
        .await?
        .filter(|u| u.is_active)
        .ok_or(AuthError::UserNotFound)?;
    let two_factor_enabled = TwoFactorCrud::new(state.db.clone()).is_enabled(user.id).await?;

    Ok(Json(UserResponse::new(account, two_factor_enabled)))
}

/// PATCH /api/auth/me
pub async fn update_me(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
    client: ClientInfo,
    Json(req): Json<UpdateProfileRequest>,
) -> Result<Json<UserResponse>, AuthError> {
    req.validate().map_err(invalid)?;

    let update = ProfileUpdate {
        first_name: req.first_name,
        last_name: req.last_name,
        bio: req.bio,
        location: req.location,
        avatar_url: req.avatar_url,
    };
    let changed: Vec<&str> = [
        ("firstName", update.first_name.is_some()),
        ("lastName", update.last_name.is_some()),
        ("bio", update.bio.is_some()),
        ("location", update.location.is_some()),
        ("avatarUrl", update.avatar_url.is_some()),
    ]
    .into_iter()
    .filter_map(|(field, set)| set.then_some(field))
    .collect();

    let account = UserCrud::new(state.db.clone())
        .update_profile(user.id, &update)
        .await?
        .ok_or(AuthError::UserNotFound)?;
    audit(&state, Some(user.id), actions::USER_PROFILE_UPDATED, json!({ "fields": changed }), &client).await?;

    let two_factor_enabled = TwoFactorCrud::new(state.db.clone()).is_enabled(user.id).await?;
    Ok(Json(UserResponse::new(account, two_factor_enabled)))
}

// =============================================================================
// PASSWORD RESET & EMAIL VERIFICATION
// =============================================================================

/// POST /api/auth/forgot-password - answers the same whether or not the
/// account exists
pub async fn forgot_password(
    State(state): State<Arc<AppState>>,
    client: ClientInfo,
    Json(req): Json<ForgotPasswordRequest>,
) -> Result<Json<MessageResponse>, AuthError> {
    req.validate().map_err(invalid)?;

    let email = normalize_email(&req.email);
    let user = UserCrud::new(state.db.clone()).find_by_email(&email).await?;

    if let Some(user) = user.filter(|u| u.is_active) {
        let tokens = TokenCrud::new(state.db.clone(), TokenKind::PasswordReset);
        tokens.invalidate_for_user(user.id).await?;
        let reset = issue_token();
        tokens.issue(user.id, &reset.hash).await?;

        audit(&state, Some(user.id), actions::USER_PASSWORD_RESET_REQUESTED, json!({}), &client).await?;
        tracing::info!(user_id = %user.id, "Password reset requested");
    }

    Ok(Json(MessageResponse {
        message: "If an account exists for this email, a reset link has been sent",
    }))
}

/// POST /api/auth/reset-password
pub async fn reset_password(
    State(state): State<Arc<AppState>>,
    client: ClientInfo,
    Json(req): Json<ResetPasswordRequest>,
) -> Result<Json<MessageResponse>, AuthError> {
    req.validate().map_err(invalid)?;

    let tokens = TokenCrud::new(state.db.clone(), TokenKind::PasswordReset);
    let token = tokens
        .find_by_hash(&sha256_hex(&req.token))
        .await?
        .filter(|t| t.is_valid_at(Utc::now()))
        .ok_or(AuthError::InvalidToken)?;
    if !tokens.mark_used(token.id).await? {
        return Err(AuthError::InvalidToken);
    }

    let password_hash = hashing::hash_password(&req.password).map_err(AuthError::internal)?;
    UserCrud::new(state.db.clone())
        .update_password(token.user_id, &password_hash)
        .await?;
    let revoked = SessionCrud::new(state.db.clone())
        .delete_all_for_user(token.user_id)
        .await?;

    audit(&state, Some(token.user_id), actions::USER_PASSWORD_RESET, json!({ "sessionsRevoked": revoked }), &client).await?;
    tracing::info!(user_id = %token.user_id, sessions_revoked = revoked, "Password reset");

    Ok(Json(MessageResponse {
        message: "Password has been reset",
    }))
}

/// POST /api/auth/verify-email
pub async fn verify_email(
    State(state): State<Arc<AppState>>,
    client: ClientInfo,
    Json(req): Json<VerifyEmailRequest>,
) -> Result<Json<MessageResponse>, AuthError> {
    req.validate().map_err(invalid)?;

    let tokens = TokenCrud::new(state.db.clone(), TokenKind::EmailVerification);
    let token = tokens
        .find_by_hash(&sha256_hex(&req.token))
        .await?
        .filter(|t| t.is_valid_at(Utc::now()))
        .ok_or(AuthError::InvalidToken)?;
    if !tokens.mark_used(token.id).await? {
        return Err(AuthError::InvalidToken);
    }

    UserCrud::new(state.db.clone()).mark_email_verified(token.user_id).await?;
    audit(&state, Some(token.user_id), actions::USER_EMAIL_VERIFIED, json!({}), &client).await?;
    tracing::info!(user_id = %token.user_id, "Email verified");

    Ok(Json(MessageResponse {
        message: "Email verified",
    }))
}

/// POST /api/auth/password-strength
pub async fn check_password_strength(Json(req): Json<PasswordStrengthRequest>) -> Json<PasswordStrength> {
    Json(password_strength(&req.password))
}
