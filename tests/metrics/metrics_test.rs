use axum::http::StatusCode;
use geosme::modules::directory::model::StatusCounts;
use geosme::services::metrics::MetricsRegistry;
use serial_test::serial;

use crate::common::offline_server;

// =============================================================================
// INTEGRATION TESTS - METRICS REGISTRY
// =============================================================================

#[serial]
#[test]
fn test_metrics_registry_initialization() {
    let metrics = MetricsRegistry::new();
    assert!(metrics.is_ok(), "Failed to initialize metrics registry");
}

#[serial]
#[test]
fn test_http_metrics_recording() {
    let metrics = MetricsRegistry::new().unwrap();

    metrics
        .http_requests_total
        .with_label_values(&["GET", "/api/businesses", "200"])
        .inc();

    let output = metrics.export().unwrap();
    assert!(output.contains("geosme_http_requests_total"));
    assert!(output.contains("method=\"GET\""));
    assert!(output.contains("endpoint=\"/api/businesses\""));
    assert!(output.contains("status=\"200\""));
}

#[serial]
#[test]
fn test_auth_metrics_recording() {
    let metrics = MetricsRegistry::new().unwrap();

    metrics.login_attempts_total.with_label_values(&["success"]).inc();
    metrics.login_attempts_total.with_label_values(&["invalid_password"]).inc();
    metrics.two_factor_events_total.with_label_values(&["enabled"]).inc();

    let output = metrics.export().unwrap();
    assert!(output.contains("geosme_login_attempts_total{outcome=\"invalid_password\"} 1"));
    assert!(output.contains("geosme_two_factor_events_total{event=\"enabled\"} 1"));
}

#[serial]
#[test]
fn test_business_count_gauge() {
    let metrics = MetricsRegistry::new().unwrap();

    metrics.set_business_counts(&StatusCounts {
        pending: 2,
        under_review: 1,
        approved: 14,
        rejected: 1,
    });

    let output = metrics.export().unwrap();
    assert!(output.contains("geosme_businesses_by_status{status=\"approved\"} 14"));
    assert!(output.contains("geosme_businesses_by_status{status=\"under_review\"} 1"));
    assert!(metrics
        .registry()
        .gather()
        .iter()
        .any(|family| family.get_name() == "geosme_businesses_by_status"));
}

#[serial]
#[test]
fn test_histogram_buckets() {
    let metrics = MetricsRegistry::new().unwrap();

    metrics
        .competitors_found
        .with_label_values(&["Food & Beverage"])
        .observe(3.0);

    let output = metrics.export().unwrap();
    assert!(output.contains("geosme_competitors_found_bucket"));
    assert!(output.contains("le=\"3\""));
}

// =============================================================================
// HTTP ENDPOINTS
// =============================================================================

#[tokio::test]
async fn metrics_endpoint_reports_requests_by_route_template() {
    let (server, _state) = offline_server().await;

    server.get("/api/businesses/2").await.assert_status(StatusCode::OK);
    server.get("/api/businesses/3").await.assert_status(StatusCode::OK);

    let response = server.get("/metrics").await;
    response.assert_status(StatusCode::OK);
    let body = response.text();
    assert!(body.contains("endpoint=\"/api/businesses/{id}\""));
    assert!(!body.contains("endpoint=\"/api/businesses/2\""));
    assert!(body.contains("geosme_businesses_by_status{status=\"approved\"} 14"));
}

#[tokio::test]
async fn unmatched_paths_share_one_series() {
    let (server, _state) = offline_server().await;

    for path in ["/api/x1", "/api/x2", "/wp-login.php"] {
        server.get(path).await.assert_status(StatusCode::NOT_FOUND);
    }

    let body = server.get("/metrics").await.text();
    assert!(body.contains("endpoint=\"unmatched\",method=\"GET\",status=\"404\"} 3"));
    assert!(!body.contains("/api/x1"));
    assert!(!body.contains("wp-login"));
}

#[tokio::test]
async fn health_reports_version() {
    let (server, _state) = offline_server().await;

    let response = server.get("/health").await;
    response.assert_status(StatusCode::OK);
    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn responses_carry_security_headers() {
    let (server, _state) = offline_server().await;

    let response = server.get("/health").await;
    response.assert_header("x-content-type-options", "nosniff");
}

#[tokio::test]
async fn password_strength_meter() {
    let (server, _state) = offline_server().await;

    let weak: serde_json::Value = server
        .post("/api/auth/password-strength")
        .json(&serde_json::json!({ "password": "abc" }))
        .await
        .json();
    assert_eq!(weak["label"], "weak");

    let strong: serde_json::Value = server
        .post("/api/auth/password-strength")
        .json(&serde_json::json!({ "password": "Abcdefgh123!" }))
        .await
        .json();
    assert_eq!(strong["score"], 5);
    assert_eq!(strong["label"], "strong");
}
