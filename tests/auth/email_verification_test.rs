use axum::http::StatusCode;
use chrono::{Duration, Utc};
use geosme::modules::auth::crud::{TokenCrud, TokenKind, UserCrud};
use geosme::services::tokens::issue_token;
use serde_json::json;
use serial_test::serial;

use crate::common::TestContext;

async fn issue_verification_token(ctx: &TestContext, email: &str) -> String {
    let user_id = ctx.user_id(email).await;
    let token = issue_token();
    TokenCrud::new(ctx.db.clone(), TokenKind::EmailVerification)
        .issue(user_id, &token.hash)
        .await
        .unwrap();
    token.raw
}

async fn verify(ctx: &TestContext, token: &str) -> axum_test::TestResponse {
    ctx.server
        .post("/api/auth/verify-email")
        .json(&json!({ "token": token }))
        .await
}

#[tokio::test]
#[serial]
async fn verify_email_marks_user_verified() {
    let ctx = TestContext::new().await;
    let email = ctx.register_user().await;
    let token = issue_verification_token(&ctx, &email).await;

    verify(&ctx, &token).await.assert_status(StatusCode::OK);

    let user = UserCrud::new(ctx.db.clone())
        .find_by_email(&email)
        .await
        .unwrap()
        .unwrap();
    assert!(user.email_verified);
    assert!(user.email_verified_at.is_some());

    ctx.cleanup().await;
}

#[tokio::test]
#[serial]
async fn verify_email_token_is_single_use() {
    let ctx = TestContext::new().await;
    let email = ctx.register_user().await;
    let token = issue_verification_token(&ctx, &email).await;

    verify(&ctx, &token).await.assert_status(StatusCode::OK);
    verify(&ctx, &token).await.assert_status(StatusCode::BAD_REQUEST);

    ctx.cleanup().await;
}

#[tokio::test]
#[serial]
async fn verify_email_with_expired_token_returns_bad_request() {
    let ctx = TestContext::new().await;
    let email = ctx.register_user().await;
    let user_id = ctx.user_id(&email).await;

    let token = issue_token();
    TokenCrud::new(ctx.db.clone(), TokenKind::EmailVerification)
        .create(user_id, &token.hash, Utc::now() - Duration::hours(25))
        .await
        .unwrap();

    verify(&ctx, &token.raw).await.assert_status(StatusCode::BAD_REQUEST);

    ctx.cleanup().await;
}

#[tokio::test]
#[serial]
async fn verify_email_rejects_password_reset_tokens() {
    let ctx = TestContext::new().await;
    let email = ctx.register_user().await;
    let user_id = ctx.user_id(&email).await;

    let token = issue_token();
    TokenCrud::new(ctx.db.clone(), TokenKind::PasswordReset)
        .issue(user_id, &token.hash)
        .await
        .unwrap();

    verify(&ctx, &token.raw).await.assert_status(StatusCode::BAD_REQUEST);

    ctx.cleanup().await;
}

#[tokio::test]
#[serial]
async fn verify_email_with_unknown_token_returns_bad_request() {
    let ctx = TestContext::new().await;

    let response = verify(&ctx, "not-a-token").await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "Invalid or expired token");

    ctx.cleanup().await;
}

#[test]
fn token_lifetimes() {
    assert_eq!(TokenKind::EmailVerification.lifetime(), Duration::hours(24));
    assert_eq!(TokenKind::PasswordReset.lifetime(), Duration::hours(1));
}
