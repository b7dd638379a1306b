use axum::{routing::get, Router};
use std::sync::Arc;

use super::controller;
use crate::AppState;

pub fn audit_routes() -> Router<Arc<AppState>> {
    Router::new().route("/", get(controller::list_audit_logs))
}
