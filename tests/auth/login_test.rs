use axum::http::StatusCode;
use geosme::modules::auth::crud::{LoginAttemptCrud, UserCrud};
use geosme::modules::auth::model::{NewUser, Role};
use geosme::modules::settings::model::SystemSettings;
use serde_json::{json, Value};
use serial_test::serial;

use crate::common::{test_email, test_password, test_username, TestContext};

async fn attempt(ctx: &TestContext, email: &str, password: &str) -> axum_test::TestResponse {
    ctx.server
        .post("/api/auth/login")
        .json(&json!({ "email": email, "password": password }))
        .await
}

#[tokio::test]
#[serial]
async fn login_with_valid_credentials_returns_tokens() {
    let ctx = TestContext::new().await;
    let email = ctx.register_user().await;

    let response = attempt(&ctx, &email, test_password()).await;
    response.assert_status(StatusCode::OK);

    let body: Value = response.json();
    assert!(body["accessToken"].is_string());
    assert!(body["sessionToken"].is_string());
    assert_eq!(body["tokenType"], "Bearer");
    assert!(body["expiresIn"].as_i64().unwrap() > 0);
    assert_eq!(body["user"]["email"], email.as_str());
    assert!(body["user"]["lastLoginAt"].is_string());
    assert!(body.get("requiresTwoFactor").is_none());

    ctx.cleanup().await;
}

#[tokio::test]
#[serial]
async fn login_creates_session_and_records_attempt() {
    let ctx = TestContext::new().await;
    let email = ctx.register_user().await;
    let user_id = ctx.user_id(&email).await;

    attempt(&ctx, &email, test_password()).await.assert_status(StatusCode::OK);

    let sessions: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM user_sessions WHERE user_id = $1")
        .bind(user_id)
        .fetch_one(&ctx.db)
        .await
        .unwrap();
    assert_eq!(sessions, 1);

    let attempts = LoginAttemptCrud::new(ctx.db.clone())
        .list_for_email(&email, 10)
        .await
        .unwrap();
    assert_eq!(attempts.len(), 1);
    assert!(attempts[0].success);
    assert_eq!(attempts[0].user_id, Some(user_id));

    ctx.cleanup().await;
}

#[tokio::test]
#[serial]
async fn login_is_case_insensitive_on_email() {
    let ctx = TestContext::new().await;
    let email = ctx.register_user().await;

    attempt(&ctx, &email.to_uppercase(), test_password())
        .await
        .assert_status(StatusCode::OK);

    ctx.cleanup().await;
}

#[tokio::test]
#[serial]
async fn login_with_invalid_password_returns_unauthorized() {
    let ctx = TestContext::new().await;
    let email = ctx.register_user().await;

    let response = attempt(&ctx, &email, "WrongPassword123!").await;
    response.assert_status(StatusCode::UNAUTHORIZED);

    let body: Value = response.json();
    assert_eq!(body["error"], "Invalid email or password");

    let reason: String = sqlx::query_scalar("SELECT failure_reason FROM login_attempts WHERE email = $1 AND NOT success")
        .bind(&email)
        .fetch_one(&ctx.db)
        .await
        .unwrap();
    assert_eq!(reason, "invalid_password");

    ctx.cleanup().await;
}

#[tokio::test]
#[serial]
async fn login_with_nonexistent_email_returns_unauthorized() {
    let ctx = TestContext::new().await;

    let response = attempt(&ctx, "nonexistent@example.com", test_password()).await;
    response.assert_status(StatusCode::UNAUTHORIZED);

    // Same message as a wrong password so account existence does not leak
    let body: Value = response.json();
    assert_eq!(body["error"], "Invalid email or password");

    ctx.cleanup().await;
}

#[tokio::test]
#[serial]
async fn login_with_missing_password_returns_unprocessable() {
    let ctx = TestContext::new().await;

    let response = ctx
        .server
        .post("/api/auth/login")
        .json(&json!({ "email": test_email() }))
        .await;

    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);

    ctx.cleanup().await;
}

#[tokio::test]
#[serial]
async fn login_with_empty_password_returns_bad_request() {
    let ctx = TestContext::new().await;

    attempt(&ctx, &test_email(), "").await.assert_status(StatusCode::BAD_REQUEST);

    ctx.cleanup().await;
}

#[tokio::test]
#[serial]
async fn login_locks_after_repeated_failures() {
    let ctx = TestContext::new().await;
    let email = ctx.register_user().await;

    for _ in 0..5 {
        attempt(&ctx, &email, "WrongPassword123!")
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
    }

    // Even the right password is refused while locked
    let response = attempt(&ctx, &email, test_password()).await;
    response.assert_status(StatusCode::TOO_MANY_REQUESTS);

    ctx.cleanup().await;
}

#[tokio::test]
#[serial]
async fn login_with_inactive_account_returns_unauthorized() {
    let ctx = TestContext::new().await;
    let email = ctx.register_user().await;
    let user_id = ctx.user_id(&email).await;
    UserCrud::new(ctx.db.clone()).set_active(user_id, false).await.unwrap();

    attempt(&ctx, &email, test_password())
        .await
        .assert_status(StatusCode::UNAUTHORIZED);

    ctx.cleanup().await;
}

#[tokio::test]
#[serial]
async fn login_for_oauth_only_account_returns_unauthorized() {
    let ctx = TestContext::new().await;
    let users = UserCrud::new(ctx.db.clone());
    let email = test_email();

    let user = users
        .create(&NewUser {
            username: test_username(),
            email: email.clone(),
            password_hash: None,
            google_id: Some("google-oauth-123".to_string()),
            role: Role::User,
            first_name: None,
            last_name: None,
        })
        .await
        .unwrap();

    let found = users.find_by_google_id("google-oauth-123").await.unwrap();
    assert_eq!(found.map(|u| u.id), Some(user.id));

    attempt(&ctx, &email, test_password())
        .await
        .assert_status(StatusCode::UNAUTHORIZED);

    ctx.cleanup().await;
}

#[tokio::test]
#[serial]
async fn linking_google_account_marks_email_verified() {
    let ctx = TestContext::new().await;
    let email = ctx.register_user().await;
    let user_id = ctx.user_id(&email).await;

    let linked = UserCrud::new(ctx.db.clone())
        .link_google_account(user_id, "google-link-456")
        .await
        .unwrap()
        .unwrap();

    assert_eq!(linked.google_id.as_deref(), Some("google-link-456"));
    assert!(linked.email_verified);

    ctx.cleanup().await;
}

#[tokio::test]
#[serial]
async fn login_requires_verified_email_when_enabled() {
    let ctx = TestContext::new().await;
    let email = ctx.register_user().await;
    ctx.state
        .settings
        .replace(SystemSettings {
            require_email_verification: true,
            ..SystemSettings::default()
        })
        .await;

    attempt(&ctx, &email, test_password())
        .await
        .assert_status(StatusCode::FORBIDDEN);

    let user_id = ctx.user_id(&email).await;
    UserCrud::new(ctx.db.clone()).mark_email_verified(user_id).await.unwrap();

    attempt(&ctx, &email, test_password())
        .await
        .assert_status(StatusCode::OK);

    ctx.cleanup().await;
}

#[tokio::test]
#[serial]
async fn admin_role_is_carried_into_access_token() {
    let ctx = TestContext::new().await;
    let email = ctx.register_user().await;
    let user_id = ctx.user_id(&email).await;
    UserCrud::new(ctx.db.clone()).set_role(user_id, Role::Admin.as_str()).await.unwrap();

    let body = ctx.login(&email).await;
    let token = body["accessToken"].as_str().unwrap();

    ctx.server
        .get("/api/admin/smes/stats")
        .authorization_bearer(token)
        .await
        .assert_status(StatusCode::OK);

    ctx.cleanup().await;
}
