//! # User Handlers
//!
//! User CRUD, search, and the per-user wallet and transaction listings.
//! Every route here sits behind `require_auth`.

use crate::extract::{IdPath, ValidatedJson, ValidatedQuery};
use axum::{
    extract::{Json, State},
    http::StatusCode,
};
use lib_auth::hash_password;
use lib_core::dto::{PageQuery, UpdateUserRequest, UserDto, UserResponse, UserSearchQuery};
use lib_core::model::store::models::{Transaction, UserForUpdate, Wallet};
use lib_core::model::store::{TransactionRepository, UserRepository, WalletRepository};
use lib_core::{AppError, DbPool, Page, Result};
use tracing::{debug, info, instrument, warn};

const USER_NOT_FOUND: &str = "User not found";

/// `GET /users`
#[instrument(skip(pool))]
pub async fn list_users(
    State(pool): State<DbPool>,
    ValidatedQuery(query): ValidatedQuery<PageQuery>,
) -> Result<Json<Page<UserDto>>> {
    let page = UserRepository::list(&pool, query.page_request()).await?;
    debug!("[USERS] Listed {} of {} users", page.data.len(), page.total);
    Ok(Json(page.map(UserDto::from)))
}

/// `GET /users/search?query=&role=`
///
/// `query` matches name or email by substring; `role` matches exactly.
#[instrument(skip(pool))]
pub async fn search_users(
    State(pool): State<DbPool>,
    ValidatedQuery(query): ValidatedQuery<UserSearchQuery>,
) -> Result<Json<Page<UserDto>>> {
    let page = UserRepository::search(&pool, &query.filter(), query.page_request()).await?;
    Ok(Json(page.map(UserDto::from)))
}

/// `GET /users/{id}`
#[instrument(skip(pool))]
pub async fn get_user(
    State(pool): State<DbPool>,
    IdPath(id): IdPath,
) -> Result<Json<UserResponse>> {
    let user = UserRepository::find_by_id(&pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound(USER_NOT_FOUND.to_string()))?;

    Ok(Json(UserResponse {
        user: UserDto::from(user),
    }))
}

/// `PUT /users/{id}` - partial update.
///
/// A new email must not belong to another user; a new password is hashed
/// before it is stored.
#[instrument(skip(pool, req))]
pub async fn update_user(
    State(pool): State<DbPool>,
    IdPath(id): IdPath,
    ValidatedJson(req): ValidatedJson<UpdateUserRequest>,
) -> Result<Json<UserResponse>> {
    if !UserRepository::exists(&pool, id).await? {
        return Err(AppError::NotFound(USER_NOT_FOUND.to_string()));
    }

    let mut changes = UserForUpdate::new();

    if let Some(email) = req.email {
        if UserRepository::email_taken(&pool, &email, Some(id)).await? {
            warn!("[USERS]  Email already taken: {}", email);
            return Err(AppError::field("email", "The email has already been taken."));
        }
        changes = changes.email(email);
    }
    if let Some(name) = req.name {
        changes = changes.name(name);
    }
    if let Some(password) = req.password {
        changes = changes.password_hash(hash_password(&password).map_err(AppError::Internal)?);
    }

    let user = UserRepository::update(&pool, id, changes).await?;
    info!("[USERS]  Updated user {}", id);

    Ok(Json(UserResponse {
        user: UserDto::from(user),
    }))
}

/// `DELETE /users/{id}` - the user's wallets and transactions stay, unowned.
#[instrument(skip(pool))]
pub async fn delete_user(State(pool): State<DbPool>, IdPath(id): IdPath) -> Result<StatusCode> {
    if !UserRepository::delete(&pool, id).await? {
        return Err(AppError::NotFound(USER_NOT_FOUND.to_string()));
    }

    info!("[USERS]  Deleted user {}", id);
    Ok(StatusCode::NO_CONTENT)
}

/// `GET /users/{id}/wallets`
#[instrument(skip(pool))]
pub async fn list_user_wallets(
    State(pool): State<DbPool>,
    IdPath(id): IdPath,
    ValidatedQuery(query): ValidatedQuery<PageQuery>,
) -> Result<Json<Page<Wallet>>> {
    if !UserRepository::exists(&pool, id).await? {
        return Err(AppError::NotFound(USER_NOT_FOUND.to_string()));
    }

    Ok(Json(
        WalletRepository::list_for_user(&pool, id, query.page_request()).await?,
    ))
}

/// `GET /users/{id}/transactions` - newest first.
#[instrument(skip(pool))]
pub async fn list_user_transactions(
    State(pool): State<DbPool>,
    IdPath(id): IdPath,
    ValidatedQuery(query): ValidatedQuery<PageQuery>,
) -> Result<Json<Page<Transaction>>> {
    if !UserRepository::exists(&pool, id).await? {
        return Err(AppError::NotFound(USER_NOT_FOUND.to_string()));
    }

    Ok(Json(
        TransactionRepository::list_for_user(&pool, id, query.page_request()).await?,
    ))
}

#[cfg(test)]
mod tests {
    use crate::handlers::test_support::{TestApp, TEST_PASSWORD};
    use axum::http::StatusCode;
    use serde_json::json;

    #[tokio::test]
    async fn test_list_users_paginates() {
        // Arrange
        let app = TestApp::new().await;
        let (_, token) = app.register_and_login("User 1", "user1@example.com").await;
        for i in 2..=5 {
            app.register_and_login(&format!("User {}", i), &format!("user{}@example.com", i))
                .await;
        }

        // Act
        let (status, body) = app
            .send("GET", "/users?per_page=2&page=2", Some(&token), None)
            .await;

        // Assert
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total"], 5);
        assert_eq!(body["per_page"], 2);
        assert_eq!(body["current_page"], 2);
        assert_eq!(body["last_page"], 3);
        let names: Vec<&str> = body["data"]
            .as_array()
            .unwrap()
            .iter()
            .map(|u| u["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["User 3", "User 4"]);
        assert!(body["data"][0].get("password").is_none());
    }

    #[tokio::test]
    async fn test_list_users_rejects_bad_page_size() {
        let app = TestApp::new().await;
        let (_, token) = app.register_and_login("Alice", "alice@example.com").await;

        let (status, body) = app
            .send("GET", "/users?per_page=500", Some(&token), None)
            .await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["errors"]["per_page"][0], "The per page field must be between 1 and 100.");
    }

    #[tokio::test]
    async fn test_search_users_by_query_and_role() {
        let app = TestApp::new().await;
        let (_, token) = app.register_and_login("Alice Smith", "alice@example.com").await;
        app.register_and_login("Bob Jones", "bob@example.com").await;
        app.register_and_login("Carol Smith", "carol@sample.org").await;

        let (_, body) = app
            .send("GET", "/users/search?query=smith", Some(&token), None)
            .await;
        assert_eq!(body["total"], 2);
        assert_eq!(body["per_page"], 10);

        let (_, body) = app
            .send("GET", "/users/search?query=sample.org", Some(&token), None)
            .await;
        assert_eq!(body["total"], 1);
        assert_eq!(body["data"][0]["name"], "Carol Smith");

        let (_, body) = app
            .send("GET", "/users/search?role=admin", Some(&token), None)
            .await;
        assert_eq!(body["total"], 0);
    }

    #[tokio::test]
    async fn test_get_user() {
        let app = TestApp::new().await;
        let (user_id, token) = app.register_and_login("Alice", "alice@example.com").await;

        let (status, body) = app
            .send("GET", &format!("/users/{}", user_id), Some(&token), None)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["user"]["email"], "alice@example.com");

        let (status, body) = app.send("GET", "/users/9999", Some(&token), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "User not found");
    }

    #[tokio::test]
    async fn test_update_user_partial() {
        // Arrange
        let app = TestApp::new().await;
        let (user_id, token) = app.register_and_login("Alice", "alice@example.com").await;

        // Act
        let (status, body) = app
            .send(
                "PUT",
                &format!("/users/{}", user_id),
                Some(&token),
                Some(json!({"name": "Alice Cooper"})),
            )
            .await;

        // Assert
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["user"]["name"], "Alice Cooper");
        assert_eq!(body["user"]["email"], "alice@example.com");
    }

    #[tokio::test]
    async fn test_update_user_email_conflict() {
        let app = TestApp::new().await;
        let (user_id, token) = app.register_and_login("Alice", "alice@example.com").await;
        app.register_and_login("Bob", "bob@example.com").await;

        let (status, body) = app
            .send(
                "PUT",
                &format!("/users/{}", user_id),
                Some(&token),
                Some(json!({"email": "bob@example.com"})),
            )
            .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["errors"]["email"][0], "The email has already been taken.");

        // Keeping one's own email is not a conflict
        let (status, _) = app
            .send(
                "PUT",
                &format!("/users/{}", user_id),
                Some(&token),
                Some(json!({"email": "alice@example.com"})),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_update_user_password_is_hashed() {
        let app = TestApp::new().await;
        let (user_id, token) = app.register_and_login("Alice", "alice@example.com").await;

        app.send(
            "PUT",
            &format!("/users/{}", user_id),
            Some(&token),
            Some(json!({"password": "AnotherPassword1"})),
        )
        .await;

        let (status, _) = app
            .send(
                "POST",
                "/users/login",
                None,
                Some(json!({"email": "alice@example.com", "password": "AnotherPassword1"})),
            )
            .await;
        assert_eq!(status, StatusCode::OK);

        let (status, _) = app
            .send(
                "POST",
                "/users/login",
                None,
                Some(json!({"email": "alice@example.com", "password": TEST_PASSWORD})),
            )
            .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_delete_user() {
        let app = TestApp::new().await;
        let (_, token) = app.register_and_login("Alice", "alice@example.com").await;
        let (bob_id, _) = app.register_and_login("Bob", "bob@example.com").await;

        let (status, body) = app
            .send("DELETE", &format!("/users/{}", bob_id), Some(&token), None)
            .await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        assert!(body.is_null());

        let (status, _) = app
            .send("DELETE", &format!("/users/{}", bob_id), Some(&token), None)
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_user_wallets_and_transactions() {
        // Arrange
        let app = TestApp::new().await;
        let (user_id, token) = app.register_and_login("Alice", "alice@example.com").await;
        let (_, wallet) = app
            .send(
                "POST",
                "/wallets",
                Some(&token),
                Some(json!({"user_id": user_id, "name": "Savings", "balance": 100})),
            )
            .await;
        let wallet_id = wallet["wallet"]["id"].as_i64().unwrap();
        for amount in [10, 20] {
            app.send(
                "POST",
                "/transactions",
                Some(&token),
                Some(json!({"user_id": user_id, "wallet_id": wallet_id, "amount": amount})),
            )
            .await;
        }

        // Act
        let (status, wallets) = app
            .send("GET", &format!("/users/{}/wallets", user_id), Some(&token), None)
            .await;
        let (_, transactions) = app
            .send("GET", &format!("/users/{}/transactions", user_id), Some(&token), None)
            .await;

        // Assert
        assert_eq!(status, StatusCode::OK);
        assert_eq!(wallets["total"], 1);
        assert_eq!(wallets["data"][0]["name"], "Savings");
        assert_eq!(transactions["total"], 2);
        assert_eq!(transactions["data"][0]["amount"], 20.0);

        let (status, _) = app
            .send("GET", "/users/9999/wallets", Some(&token), None)
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
