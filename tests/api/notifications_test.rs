use axum::http::StatusCode;
use serde_json::Value;

use crate::common::{admin_token, api_server, user_token};

#[tokio::test]
async fn notifications_require_admin() {
    let (server, state) = api_server().await;

    server
        .get("/api/admin/notifications")
        .authorization_bearer(user_token(&state).await)
        .await
        .assert_status(StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn notifications_list_newest_first_with_unread_count() {
    let (server, state) = api_server().await;

    let body: Value = server
        .get("/api/admin/notifications")
        .authorization_bearer(admin_token(&state).await)
        .await
        .json();

    assert_eq!(body["total"], 6);
    assert_eq!(body["unreadCount"], 3);
    assert_eq!(body["items"][0]["id"], 2);
}

#[tokio::test]
async fn notifications_filter_by_kind_and_unread() {
    let (server, state) = api_server().await;
    let token = admin_token(&state).await;

    let reviews: Value = server
        .get("/api/admin/notifications")
        .authorization_bearer(&token)
        .add_query_param("kind", "review")
        .await
        .json();
    assert_eq!(reviews["total"], 1);

    let unread: Value = server
        .get("/api/admin/notifications")
        .authorization_bearer(&token)
        .add_query_param("unreadOnly", true)
        .await
        .json();
    assert_eq!(unread["total"], 3);

    server
        .get("/api/admin/notifications")
        .authorization_bearer(&token)
        .add_query_param("kind", "carrier-pigeon")
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn mark_read_and_read_all() {
    let (server, state) = api_server().await;
    let token = admin_token(&state).await;

    let response = server
        .post("/api/admin/notifications/1/read")
        .authorization_bearer(&token)
        .await;
    response.assert_status(StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["read"], true);
    assert_eq!(state.notifications.unread_count().await, 2);

    let body: Value = server
        .post("/api/admin/notifications/read-all")
        .authorization_bearer(&token)
        .await
        .json();
    assert_eq!(body["updated"], 2);
    assert_eq!(state.notifications.unread_count().await, 0);

    server
        .post("/api/admin/notifications/99/read")
        .authorization_bearer(&token)
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_notification() {
    let (server, state) = api_server().await;
    let token = admin_token(&state).await;

    server
        .delete("/api/admin/notifications/4")
        .authorization_bearer(&token)
        .await
        .assert_status(StatusCode::NO_CONTENT);

    server
        .delete("/api/admin/notifications/4")
        .authorization_bearer(&token)
        .await
        .assert_status(StatusCode::NOT_FOUND);

    assert_eq!(state.notifications.list().await.len(), 5);
}
