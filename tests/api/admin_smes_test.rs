use axum::http::StatusCode;
use serde_json::{json, Value};

use crate::common::{admin_token, api_server, user_token};

#[tokio::test]
async fn sme_queue_requires_admin() {
    let (server, state) = api_server().await;

    server.get("/api/admin/smes").await.assert_status(StatusCode::UNAUTHORIZED);

    let response = server
        .get("/api/admin/smes")
        .authorization_bearer(user_token(&state).await)
        .await;
    response.assert_status(StatusCode::FORBIDDEN);
    let body: Value = response.json();
    assert_eq!(body["error"], "Admin role required");
}

#[tokio::test]
async fn sme_queue_lists_every_status() {
    let (server, state) = api_server().await;
    let token = admin_token(&state).await;

    let all: Value = server
        .get("/api/admin/smes")
        .authorization_bearer(&token)
        .add_query_param("limit", 100)
        .await
        .json();
    assert_eq!(all["total"], 18);

    let pending: Value = server
        .get("/api/admin/smes")
        .authorization_bearer(&token)
        .add_query_param("status", "pending")
        .await
        .json();
    assert_eq!(pending["total"], 2);

    server
        .get("/api/admin/smes")
        .authorization_bearer(&token)
        .add_query_param("status", "archived")
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn sme_stats_count_each_status() {
    let (server, state) = api_server().await;

    let body: Value = server
        .get("/api/admin/smes/stats")
        .authorization_bearer(admin_token(&state).await)
        .await
        .json();

    assert_eq!(body["pending"], 2);
    assert_eq!(body["underReview"], 1);
    assert_eq!(body["approved"], 14);
    assert_eq!(body["rejected"], 1);
    assert_eq!(body["total"], 18);
}

#[tokio::test]
async fn approving_a_pending_sme_publishes_it() {
    let (server, state) = api_server().await;
    let token = admin_token(&state).await;
    let unread_before = state.notifications.unread_count().await;

    let response = server
        .patch("/api/admin/smes/5/status")
        .authorization_bearer(&token)
        .json(&json!({ "status": "approved" }))
        .await;

    response.assert_status(StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["previousStatus"], "pending");
    assert_eq!(body["business"]["status"], "approved");

    server.get("/api/businesses/5").await.assert_status(StatusCode::OK);
    assert_eq!(state.notifications.unread_count().await, unread_before + 1);

    let metrics = state.metrics.export().unwrap();
    assert!(metrics.contains("geosme_sme_status_changes_total{from=\"pending\",to=\"approved\"} 1"));
}

#[tokio::test]
async fn rejecting_requires_a_reason() {
    let (server, state) = api_server().await;
    let token = admin_token(&state).await;

    let response = server
        .patch("/api/admin/smes/2/status")
        .authorization_bearer(&token)
        .json(&json!({ "status": "rejected", "reason": "  " }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["details"][0]["field"], "reason");

    let response = server
        .patch("/api/admin/smes/2/status")
        .authorization_bearer(&token)
        .json(&json!({ "status": "rejected", "reason": "Expired mayor's permit" }))
        .await;
    response.assert_status(StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["business"]["rejectionReason"], "Expired mayor's permit");

    server.get("/api/businesses/2").await.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn invalid_transition_returns_conflict() {
    let (server, state) = api_server().await;

    // #13 is rejected and must go back through review first
    let response = server
        .patch("/api/admin/smes/13/status")
        .authorization_bearer(admin_token(&state).await)
        .json(&json!({ "status": "approved" }))
        .await;

    response.assert_status(StatusCode::CONFLICT);
}

#[tokio::test]
async fn rejected_sme_can_return_to_review() {
    let (server, state) = api_server().await;

    let response = server
        .patch("/api/admin/smes/13/status")
        .authorization_bearer(admin_token(&state).await)
        .json(&json!({ "status": "under_review" }))
        .await;

    response.assert_status(StatusCode::OK);
    let body: Value = response.json();
    assert!(body["business"].get("rejectionReason").is_none());
}

#[tokio::test]
async fn unknown_sme_returns_not_found() {
    let (server, state) = api_server().await;

    server
        .patch("/api/admin/smes/999/status")
        .authorization_bearer(admin_token(&state).await)
        .json(&json!({ "status": "approved" }))
        .await
        .assert_status(StatusCode::NOT_FOUND);
}
