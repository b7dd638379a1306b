use axum::{extract::DefaultBodyLimit, routing::post, Router};
use std::sync::Arc;
use tower_http::limit::RequestBodyLimitLayer;

use super::controller;
use super::model::MAX_IMPORT_BYTES;
use crate::AppState;

// Room for multipart boundaries and part headers around the file.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

pub fn import_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/{kind}", post(controller::validate_import))
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(MAX_IMPORT_BYTES + MULTIPART_OVERHEAD))
}
