//! # Registration Tests

use super::*;
use lib_core::model::store::UserRepository;

#[tokio::test]
async fn test_register_success() {
    // Arrange
    let app = TestApp::new().await;

    // Act
    let (status, body) = register(&app, "Alice", "alice@example.com").await;

    // Assert
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["user"]["name"], "Alice");
    assert_eq!(body["user"]["email"], "alice@example.com");
    assert_eq!(body["user"]["role"], "user");
    assert!(body["user"].get("password").is_none());

    let stored = UserRepository::find_by_email(&app.db, "alice@example.com")
        .await
        .unwrap()
        .unwrap();
    assert_ne!(stored.password, TEST_PASSWORD);
    assert!(stored.password.starts_with("$argon2"));
}

#[tokio::test]
async fn test_register_duplicate_email() {
    // Arrange
    let app = TestApp::new().await;
    register(&app, "Alice", "alice@example.com").await;

    // Act
    let (status, body) = register(&app, "Other Alice", "alice@example.com").await;

    // Assert
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["message"], "The email has already been taken.");
    assert_eq!(body["errors"]["email"][0], "The email has already been taken.");
}

#[tokio::test]
async fn test_register_missing_fields() {
    // Arrange
    let app = TestApp::new().await;

    // Act
    let (status, body) = app
        .send("POST", "/users/register", None, Some(json!({"name": "  "})))
        .await;

    // Assert
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["errors"]["name"][0], "The name field is required.");
    assert_eq!(body["errors"]["email"][0], "The email field is required.");
    assert_eq!(body["errors"]["password"][0], "The password field is required.");
    assert_eq!(body["message"], "The email field is required. (and 2 more errors)");
}

#[tokio::test]
async fn test_register_invalid_email_and_short_password() {
    // Arrange
    let app = TestApp::new().await;

    // Act
    let (status, body) = app
        .send(
            "POST",
            "/users/register",
            None,
            Some(json!({"name": "Bob", "email": "not-an-email", "password": "short"})),
        )
        .await;

    // Assert
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["errors"]["email"][0], "The email field must be a valid email address.");
    assert_eq!(
        body["errors"]["password"][0],
        "The password field must be at least 8 characters."
    );
}

#[tokio::test]
async fn test_register_malformed_json() {
    // Arrange
    let app = TestApp::new().await;

    // Act
    let response = {
        use axum::body::Body;
        use axum::http::Request;
        use tower::ServiceExt;

        app.router
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/users/register")
                    .header("content-type", "application/json")
                    .body(Body::from("{not json"))
                    .unwrap(),
            )
            .await
            .unwrap()
    };

    // Assert
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}
