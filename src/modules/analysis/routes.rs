use axum::{routing::get, Router};
use std::sync::Arc;

use super::controller;
use crate::AppState;

pub fn analysis_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/competitors", get(controller::competitor_analysis))
        .route("/trends", get(controller::market_trends))
}
