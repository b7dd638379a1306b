use axum::{routing::get, Router};
use std::sync::Arc;

use super::controller::{get_metrics, health_check};
use crate::services::metrics::MetricsRegistry;

pub fn metrics_routes<S>(metrics: Arc<MetricsRegistry>) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new()
        .route("/metrics", get(get_metrics))
        .route("/health", get(health_check))
        .with_state(metrics)
}
