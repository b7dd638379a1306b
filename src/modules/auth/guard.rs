//! Bearer-token extractors for handlers that need a signed-in caller.
//!
//! The token only names the caller. The account row is re-read on every
//! request, so deactivation and role changes apply before the token expires.

use axum::{extract::FromRequestParts, http::request::Parts};
use std::sync::Arc;
use uuid::Uuid;

use super::crud::UserCrud;
use super::interface::AuthError;
use super::model::Role;
use crate::AppState;

/// Caller identified by a valid access token.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: Uuid,
    pub email: String,
    pub role: String,
}

impl AuthUser {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin.as_str()
    }
}

impl FromRequestParts<Arc<AppState>> for AuthUser {
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &Arc<AppState>) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or(AuthError::Unauthorized("Missing Authorization header"))?;

        let token = header
            .strip_prefix("Bearer ")
            .ok_or(AuthError::Unauthorized("Invalid Authorization format. Expected: Bearer <token>"))?;

        let data = state
            .jwt_service
            .verify_access_token(token)
            .map_err(|_| AuthError::Unauthorized("Invalid or expired token"))?;

        let id = Uuid::parse_str(&data.claims.sub).map_err(|_| AuthError::Unauthorized("Invalid or expired token"))?;

        let account = UserCrud::new(state.db.clone())
            .find_by_id(id)
            .await?
            .filter(|u| u.is_active)
            .ok_or(AuthError::Unauthorized("Account is inactive or no longer exists"))?;

        Ok(AuthUser {
            id: account.id,
            email: account.email,
            role: account.role,
        })
    }
}

/// Requires the `admin` role; other callers get 403.
pub struct RequireAdmin(pub AuthUser);

impl FromRequestParts<Arc<AppState>> for RequireAdmin {
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &Arc<AppState>) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if !user.is_admin() {
            return Err(AuthError::Forbidden("Admin role required"));
        }
        Ok(RequireAdmin(user))
    }
}
