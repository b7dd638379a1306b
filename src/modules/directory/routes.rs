use axum::{
    middleware,
    routing::{get, patch},
    Router,
};
use std::sync::Arc;

use super::controller;
use crate::modules::settings::guard::maintenance_guard;
use crate::AppState;

pub fn directory_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route("/businesses", get(controller::list_businesses))
        .route("/businesses/{id}", get(controller::get_business))
        .route("/businesses/{id}/reviews", get(controller::list_business_reviews))
        .route("/directory/facets", get(controller::get_facets))
        .route_layer(middleware::from_fn_with_state(state, maintenance_guard))
}

pub fn admin_directory_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/smes", get(controller::list_smes))
        .route("/smes/stats", get(controller::sme_stats))
        .route("/smes/{id}/status", patch(controller::update_sme_status))
        .route("/reviews", get(controller::list_reviews))
        .route("/reviews/{id}", patch(controller::update_review))
}
