use axum::{routing::get, Router};
use std::sync::Arc;

use super::controller;
use crate::AppState;

pub fn settings_routes() -> Router<Arc<AppState>> {
    Router::new().route("/", get(controller::get_settings).put(controller::update_settings))
}
