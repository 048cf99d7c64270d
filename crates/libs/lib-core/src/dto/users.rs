//! # User and Authentication DTOs
//!
//! ## Endpoints
//!
//! - `POST /users/register` - [`RegisterUserRequest`] -> 201 [`UserResponse`]
//! - `POST /users/login` - [`LoginRequest`] -> [`LoginResponse`]
//! - `PUT /users/{id}` - [`UpdateUserRequest`] -> [`UserResponse`]
//! - `PUT /users/change-password` - [`ChangePasswordRequest`] -> `MessageResponse`
//! - `POST /forgot-password` - [`ForgotPasswordRequest`] -> `MessageResponse`
//! - `POST /reset-password` - [`ResetPasswordRequest`] -> `MessageResponse`
//! - `GET /users/search` - [`UserSearchQuery`] -> `Page<UserDto>`
//!
//! Uniqueness and existence rules need the database, so handlers run them after
//! the derive rules and add any failures to the same error set.
//!
//! ## Login Flow
//!
//! ```text
//! POST /users/login
//! {"email": "alice@example.com", "password": "MyPassword123"}
//! ```
//!
//! Response:
//! ```text
//! {
//!   "token": "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...",
//!   "token_type": "Bearer",
//!   "user": {"id": 1, "name": "Alice", "email": "alice@example.com", ...}
//! }
//! ```

use super::{blank_as_none, check_confirmed, empty_as_none, RequestRules};
use crate::error::FieldErrors;
use crate::model::store::models::{User, UserFilter};
use crate::pagination::PageRequest;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Default page size for `GET /users/search`.
pub const USER_SEARCH_PER_PAGE: i64 = 10;

/// User information that is safe to send to clients.
///
/// Never includes the password hash.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserDto {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub email_verified_at: Option<DateTime<Utc>>,
    pub role: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserDto {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            email_verified_at: user.email_verified_at,
            role: user.role,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserResponse {
    pub user: UserDto,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoginResponse {
    pub token: String,
    pub token_type: String,
    pub user: UserDto,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct RegisterUserRequest {
    #[serde(default, deserialize_with = "blank_as_none")]
    #[validate(
        required(message = "The name field is required."),
        length(max = 255, message = "The name field must not be greater than 255 characters.")
    )]
    pub name: Option<String>,

    #[serde(default, deserialize_with = "blank_as_none")]
    #[validate(
        required(message = "The email field is required."),
        email(message = "The email field must be a valid email address."),
        length(max = 255, message = "The email field must not be greater than 255 characters.")
    )]
    pub email: Option<String>,

    #[serde(default, deserialize_with = "empty_as_none")]
    #[validate(
        required(message = "The password field is required."),
        length(min = 8, message = "The password field must be at least 8 characters.")
    )]
    pub password: Option<String>,
}

/// Partial update; each rule applies only to fields that are present.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[serde(default, deserialize_with = "blank_as_none")]
    #[validate(length(max = 255, message = "The name field must not be greater than 255 characters."))]
    pub name: Option<String>,

    #[serde(default, deserialize_with = "blank_as_none")]
    #[validate(
        email(message = "The email field must be a valid email address."),
        length(max = 255, message = "The email field must not be greater than 255 characters.")
    )]
    pub email: Option<String>,

    #[serde(default, deserialize_with = "empty_as_none")]
    #[validate(length(min = 8, message = "The password field must be at least 8 characters."))]
    pub password: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct LoginRequest {
    #[serde(default, deserialize_with = "blank_as_none")]
    #[validate(
        required(message = "The email field is required."),
        email(message = "The email field must be a valid email address.")
    )]
    pub email: Option<String>,

    #[serde(default, deserialize_with = "empty_as_none")]
    #[validate(required(message = "The password field is required."))]
    pub password: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct ChangePasswordRequest {
    #[serde(default, deserialize_with = "empty_as_none")]
    #[validate(required(message = "The current password field is required."))]
    pub current_password: Option<String>,

    #[serde(default, deserialize_with = "empty_as_none")]
    #[validate(
        required(message = "The new password field is required."),
        length(min = 8, message = "The new password field must be at least 8 characters.")
    )]
    pub new_password: Option<String>,

    #[serde(default, deserialize_with = "empty_as_none")]
    pub new_password_confirmation: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct ForgotPasswordRequest {
    #[serde(default, deserialize_with = "blank_as_none")]
    #[validate(
        required(message = "The email field is required."),
        email(message = "The email field must be a valid email address.")
    )]
    pub email: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct ResetPasswordRequest {
    #[serde(default, deserialize_with = "blank_as_none")]
    #[validate(required(message = "The token field is required."))]
    pub token: Option<String>,

    #[serde(default, deserialize_with = "blank_as_none")]
    #[validate(
        required(message = "The email field is required."),
        email(message = "The email field must be a valid email address.")
    )]
    pub email: Option<String>,

    #[serde(default, deserialize_with = "empty_as_none")]
    #[validate(
        required(message = "The password field is required."),
        length(min = 8, message = "The password field must be at least 8 characters.")
    )]
    pub password: Option<String>,

    #[serde(default, deserialize_with = "empty_as_none")]
    pub password_confirmation: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UserSearchQuery {
    #[serde(default, deserialize_with = "blank_as_none")]
    #[validate(length(max = 255, message = "The query field must not be greater than 255 characters."))]
    pub query: Option<String>,

    #[serde(default, deserialize_with = "blank_as_none")]
    #[validate(length(max = 50, message = "The role field must not be greater than 50 characters."))]
    pub role: Option<String>,

    #[validate(range(min = 1, message = "The page field must be at least 1."))]
    pub page: Option<i64>,

    #[validate(range(min = 1, max = 100, message = "The per page field must be between 1 and 100."))]
    pub per_page: Option<i64>,
}

impl RequestRules for RegisterUserRequest {}
impl RequestRules for UpdateUserRequest {}
impl RequestRules for LoginRequest {}
impl RequestRules for ForgotPasswordRequest {}
impl RequestRules for UserSearchQuery {}

impl RequestRules for ChangePasswordRequest {
    fn extra_rules(&self, errors: &mut FieldErrors) {
        check_confirmed(
            errors,
            "new_password",
            self.new_password.as_deref(),
            self.new_password_confirmation.as_deref(),
        );
    }
}

impl RequestRules for ResetPasswordRequest {
    fn extra_rules(&self, errors: &mut FieldErrors) {
        check_confirmed(
            errors,
            "password",
            self.password.as_deref(),
            self.password_confirmation.as_deref(),
        );
    }
}

impl UserSearchQuery {
    pub fn filter(&self) -> UserFilter {
        UserFilter {
            query: self.query.clone(),
            role: self.role.clone(),
        }
    }

    pub fn page_request(&self) -> PageRequest {
        PageRequest::new(self.page, self.per_page, USER_SEARCH_PER_PAGE)
    }
}
