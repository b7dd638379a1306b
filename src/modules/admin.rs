//! Shared error type and router for the `/api/admin` surface.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json, Router,
};
use std::sync::Arc;

use crate::modules::{
    audit::audit_routes, directory::admin_directory_routes, notifications::notification_routes,
    settings::settings_routes,
};
use crate::modules::directory::interface::DirectoryError;
use crate::response::{ErrorResponse, FieldError};
use crate::AppState;

#[derive(Debug, thiserror::Error)]
pub enum AdminError {
    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("Validation failed")]
    Validation(Vec<FieldError>),

    #[error("{0}")]
    BadRequest(String),

    #[error(transparent)]
    Directory(#[from] DirectoryError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

pub type AdminResult<T> = Result<T, AdminError>;

impl AdminError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Directory(e) => e.status_code(),
            Self::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AdminError {
    fn into_response(self) -> Response {
        match self {
            Self::Directory(e) => e.into_response(),
            Self::Validation(details) => (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::with_details("Validation failed", details)),
            )
                .into_response(),
            Self::Database(e) => {
                tracing::error!(error = %e, "Database error in admin handler");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorResponse::new("Internal server error")),
                )
                    .into_response()
            }
            other => (other.status_code(), Json(ErrorResponse::new(other.to_string()))).into_response(),
        }
    }
}

/// Every route below requires an admin bearer token; each handler takes
/// `RequireAdmin`. CSV imports are mounted separately since they need a
/// larger body limit.
pub fn admin_routes() -> Router<Arc<AppState>> {
    Router::new()
        .merge(admin_directory_routes())
        .nest("/notifications", notification_routes())
        .nest("/settings", settings_routes())
        .nest("/audit-logs", audit_routes())
}
