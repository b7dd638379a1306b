use axum::http::StatusCode;
use serde_json::{json, Value};
use serial_test::serial;

use crate::common::TestContext;

async fn unused_reset_tokens(ctx: &TestContext, email: &str) -> i64 {
    sqlx::query_scalar(
        "SELECT COUNT(*) FROM password_reset_tokens t JOIN users u ON u.id = t.user_id
         WHERE u.email = $1 AND t.used_at IS NULL",
    )
    .bind(email)
    .fetch_one(&ctx.db)
    .await
    .unwrap()
}

#[tokio::test]
#[serial]
async fn forgot_password_for_existing_user_creates_token() {
    let ctx = TestContext::new().await;
    let email = ctx.register_user().await;

    let response = ctx
        .server
        .post("/api/auth/forgot-password")
        .json(&json!({ "email": &email }))
        .await;

    response.assert_status(StatusCode::OK);
    assert_eq!(unused_reset_tokens(&ctx, &email).await, 1);

    ctx.cleanup().await;
}

#[tokio::test]
#[serial]
async fn forgot_password_for_unknown_email_answers_the_same() {
    let ctx = TestContext::new().await;
    let email = ctx.register_user().await;

    let known: Value = ctx
        .server
        .post("/api/auth/forgot-password")
        .json(&json!({ "email": &email }))
        .await
        .json();

    let response = ctx
        .server
        .post("/api/auth/forgot-password")
        .json(&json!({ "email": "nobody@example.com" }))
        .await;

    response.assert_status(StatusCode::OK);
    let unknown: Value = response.json();
    assert_eq!(known, unknown);

    ctx.cleanup().await;
}

#[tokio::test]
#[serial]
async fn forgot_password_twice_keeps_one_live_token() {
    let ctx = TestContext::new().await;
    let email = ctx.register_user().await;

    for _ in 0..2 {
        ctx.server
            .post("/api/auth/forgot-password")
            .json(&json!({ "email": &email }))
            .await
            .assert_status(StatusCode::OK);
    }

    assert_eq!(unused_reset_tokens(&ctx, &email).await, 1);

    ctx.cleanup().await;
}

#[tokio::test]
#[serial]
async fn forgot_password_with_invalid_email_returns_bad_request() {
    let ctx = TestContext::new().await;

    let response = ctx
        .server
        .post("/api/auth/forgot-password")
        .json(&json!({ "email": "not-an-email" }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);

    ctx.cleanup().await;
}
