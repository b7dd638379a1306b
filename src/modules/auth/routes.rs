use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use super::controller;
use crate::AppState;

pub fn auth_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/register", post(controller::register))
        .route("/login", post(controller::login))
        .route("/refresh", post(controller::refresh))
        .route("/logout", post(controller::logout))
        .route("/me", get(controller::me).patch(controller::update_me))
        .route("/2fa/generate", post(controller::generate_two_factor))
        .route("/2fa/verify", post(controller::verify_two_factor))
        .route("/2fa/login", post(controller::two_factor_login))
        .route("/2fa/disable", post(controller::disable_two_factor))
        .route("/forgot-password", post(controller::forgot_password))
        .route("/reset-password", post(controller::reset_password))
        .route("/verify-email", post(controller::verify_email))
        .route("/password-strength", post(controller::check_password_strength))
}
