use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;

use crate::response::ErrorResponse;
use crate::AppState;

/// Answers 503 on public routes while maintenance mode is on.
pub async fn maintenance_guard(State(state): State<Arc<AppState>>, req: Request, next: Next) -> Response {
    if state.settings.get().await.maintenance_mode {
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ErrorResponse::new("Service is under maintenance")),
        )
            .into_response();
    }
    next.run(req).await
}
