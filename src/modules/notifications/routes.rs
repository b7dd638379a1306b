use axum::{
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;

use super::controller;
use crate::AppState;

pub fn notification_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(controller::list_notifications))
        .route("/read-all", post(controller::mark_all_read))
        .route("/{id}/read", post(controller::mark_read))
        .route("/{id}", delete(controller::delete_notification))
}
