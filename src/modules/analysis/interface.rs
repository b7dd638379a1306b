use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::modules::directory::DirectoryError;
use crate::response::{ErrorResponse, FieldError};
use crate::services::analysis::AnalysisError;

#[derive(Debug, thiserror::Error)]
pub enum AnalysisApiError {
    #[error(transparent)]
    Directory(#[from] DirectoryError),

    #[error(transparent)]
    Analysis(#[from] AnalysisError),
}

impl IntoResponse for AnalysisError {
    fn into_response(self) -> Response {
        match self {
            Self::MissingCoordinates { .. } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(ErrorResponse::new(self.to_string())),
            )
                .into_response(),
            Self::InvalidRadius(_) => (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::with_details(
                    "Validation failed",
                    vec![FieldError::new("radiusKm", self.to_string())],
                )),
            )
                .into_response(),
        }
    }
}

impl IntoResponse for AnalysisApiError {
    fn into_response(self) -> Response {
        match self {
            Self::Directory(e) => e.into_response(),
            Self::Analysis(e) => e.into_response(),
        }
    }
}
