use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use super::model::BusinessStatus;
use crate::response::{ErrorResponse, FieldError};

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum DirectoryError {
    #[error("Business not found")]
    BusinessNotFound,

    #[error("Review not found")]
    ReviewNotFound,

    #[error("Cannot change status from {from} to {to}")]
    InvalidTransition {
        from: BusinessStatus,
        to: BusinessStatus,
    },

    #[error("A reason is required when rejecting a business")]
    ReasonRequired,

    #[error("Invalid filter: {0}")]
    InvalidFilter(String),
}

impl DirectoryError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::BusinessNotFound | Self::ReviewNotFound => StatusCode::NOT_FOUND,
            Self::InvalidTransition { .. } => StatusCode::CONFLICT,
            Self::ReasonRequired | Self::InvalidFilter(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for DirectoryError {
    fn into_response(self) -> Response {
        let body = match &self {
            Self::ReasonRequired => ErrorResponse::with_details(
                "Validation failed",
                vec![FieldError::new("reason", self.to_string())],
            ),
            other => ErrorResponse::new(other.to_string()),
        };
        (self.status_code(), Json(body)).into_response()
    }
}
