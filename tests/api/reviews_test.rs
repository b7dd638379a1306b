use axum::http::StatusCode;
use serde_json::{json, Value};

use crate::common::{admin_token, api_server};

#[tokio::test]
async fn review_queue_filters_by_status_and_rating() {
    let (server, state) = api_server().await;
    let token = admin_token(&state).await;

    let all: Value = server.get("/api/admin/reviews").authorization_bearer(&token).await.json();
    assert_eq!(all["total"], 10);

    let flagged: Value = server
        .get("/api/admin/reviews")
        .authorization_bearer(&token)
        .add_query_param("status", "flagged")
        .await
        .json();
    assert_eq!(flagged["total"], 1);
    assert_eq!(flagged["items"][0]["id"], 5);

    let low: Value = server
        .get("/api/admin/reviews")
        .authorization_bearer(&token)
        .add_query_param("maxRating", 2)
        .await
        .json();
    assert_eq!(low["total"], 2);
}

#[tokio::test]
async fn review_queue_filters_by_business() {
    let (server, state) = api_server().await;

    let body: Value = server
        .get("/api/admin/reviews")
        .authorization_bearer(admin_token(&state).await)
        .add_query_param("businessId", 2)
        .await
        .json();

    assert_eq!(body["total"], 2);
}

#[tokio::test]
async fn hiding_a_review_removes_it_from_the_listing() {
    let (server, state) = api_server().await;

    let response = server
        .patch("/api/admin/reviews/2")
        .authorization_bearer(admin_token(&state).await)
        .json(&json!({ "status": "hidden" }))
        .await;
    response.assert_status(StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["status"], "hidden");

    let public: Value = server.get("/api/businesses/2/reviews").await.json();
    assert_eq!(public.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn restoring_a_flagged_review_publishes_it() {
    let (server, state) = api_server().await;

    server
        .patch("/api/admin/reviews/5")
        .authorization_bearer(admin_token(&state).await)
        .json(&json!({ "status": "visible" }))
        .await
        .assert_status(StatusCode::OK);

    let public: Value = server.get("/api/businesses/4/reviews").await.json();
    assert_eq!(public[0]["id"], 5);
}

#[tokio::test]
async fn unknown_review_returns_not_found() {
    let (server, state) = api_server().await;

    server
        .patch("/api/admin/reviews/99")
        .authorization_bearer(admin_token(&state).await)
        .json(&json!({ "status": "hidden" }))
        .await
        .assert_status(StatusCode::NOT_FOUND);
}
