//! # Auth Handler Tests
//!
//! Test suite for registration, login/logout and the password flows, driven
//! through the full router.

mod register;

use crate::handlers::test_support::{TestApp, TEST_PASSWORD};
use axum::http::StatusCode;
use serde_json::{json, Value};

/// Register a user without logging in.
async fn register(app: &TestApp, name: &str, email: &str) -> (StatusCode, Value) {
    app.send(
        "POST",
        "/users/register",
        None,
        Some(json!({"name": name, "email": email, "password": TEST_PASSWORD})),
    )
    .await
}
