use axum::http::StatusCode;
use geosme::modules::auth::crud::SessionCrud;
use geosme::services::hashing::sha256_hex;
use serde_json::json;
use serial_test::serial;

use crate::common::TestContext;

#[tokio::test]
#[serial]
async fn logout_deletes_the_session() {
    let ctx = TestContext::new().await;
    let (_email, body) = ctx.logged_in_user().await;
    let session_token = body["sessionToken"].as_str().unwrap();

    let sessions = SessionCrud::new(ctx.db.clone());
    assert!(sessions.find_active(&sha256_hex(session_token)).await.unwrap().is_some());

    let response = ctx
        .server
        .post("/api/auth/logout")
        .json(&json!({ "sessionToken": session_token }))
        .await;

    response.assert_status(StatusCode::OK);
    assert!(sessions.find_active(&sha256_hex(session_token)).await.unwrap().is_none());

    ctx.cleanup().await;
}

#[tokio::test]
#[serial]
async fn logout_writes_audit_row() {
    let ctx = TestContext::new().await;
    let (email, body) = ctx.logged_in_user().await;
    let user_id = ctx.user_id(&email).await;

    ctx.server
        .post("/api/auth/logout")
        .json(&json!({ "sessionToken": body["sessionToken"] }))
        .await
        .assert_status(StatusCode::OK);

    let audits: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM audit_logs WHERE user_id = $1 AND action = 'user.logout'")
        .bind(user_id)
        .fetch_one(&ctx.db)
        .await
        .unwrap();
    assert_eq!(audits, 1);

    ctx.cleanup().await;
}

#[tokio::test]
#[serial]
async fn logout_with_unknown_session_still_succeeds() {
    let ctx = TestContext::new().await;

    let response = ctx
        .server
        .post("/api/auth/logout")
        .json(&json!({ "sessionToken": "not-a-real-session" }))
        .await;

    response.assert_status(StatusCode::OK);

    ctx.cleanup().await;
}

#[tokio::test]
#[serial]
async fn logout_without_body_returns_client_error() {
    let ctx = TestContext::new().await;

    let response = ctx.server.post("/api/auth/logout").await;
    assert!(response.status_code().is_client_error());

    ctx.cleanup().await;
}

#[tokio::test]
#[serial]
async fn expired_sessions_are_swept() {
    let ctx = TestContext::new().await;
    let (email, _body) = ctx.logged_in_user().await;
    let user_id = ctx.user_id(&email).await;

    sqlx::query("UPDATE user_sessions SET expires_at = NOW() - INTERVAL '1 minute' WHERE user_id = $1")
        .bind(user_id)
        .execute(&ctx.db)
        .await
        .unwrap();

    let removed = SessionCrud::new(ctx.db.clone()).delete_expired().await.unwrap();
    assert_eq!(removed, 1);

    ctx.cleanup().await;
}
