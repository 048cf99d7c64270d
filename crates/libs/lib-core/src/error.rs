//! # Centralized Error Handling
//!
//! This module defines the application-wide error type [`AppError`] used consistently
//! across all backend modules. It follows the `thiserror` pattern for ergonomic error handling.
//!
//! ## Error Categories
//!
//! | Variant | Status | Body |
//! |---|---|---|
//! | [`Validation`](AppError::Validation) | 422 | `{"message", "errors": {field: [..]}}` |
//! | [`BadRequest`](AppError::BadRequest) | 400 | `{"message"}` |
//! | [`Unauthorized`](AppError::Unauthorized) | 401 | `{"message"}` |
//! | [`NotFound`](AppError::NotFound) | 404 | `{"message"}` |
//! | [`Config`](AppError::Config) / [`Internal`](AppError::Internal) | 500 | generic `{"message"}` |
//!
//! ## Usage Example
//!
//! ```rust
//! use lib_core::error::{AppError, FieldErrors, Result};
//!
//! fn check_name(name: &str) -> Result<()> {
//!     let mut errors = FieldErrors::new();
//!     if name.is_empty() {
//!         errors.add("name", "The name field is required.");
//!     }
//!     errors.into_result()
//! }
//! ```

use std::collections::BTreeMap;

use axum::{http::StatusCode, response::{IntoResponse, Response}, Json};
use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;

/// Convenience type alias for `Result<T, AppError>`.
pub type Result<T> = std::result::Result<T, AppError>;

// region: --- FieldErrors

/// Field-level validation messages, keyed by field name.
///
/// Fields are kept sorted so responses are deterministic.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a message for `field`.
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(message.into());
    }

    /// Fold another set of errors into this one.
    pub fn merge(&mut self, other: FieldErrors) {
        for (field, messages) in other.0 {
            self.0.entry(field).or_default().extend(messages);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&Vec<String>> {
        self.0.get(field)
    }

    /// Total number of messages across all fields.
    pub fn count(&self) -> usize {
        self.0.values().map(Vec::len).sum()
    }

    /// Summary line: the first message, plus how many others there are.
    pub fn summary(&self) -> String {
        let first = self
            .0
            .values()
            .flat_map(|messages| messages.iter())
            .next()
            .cloned()
            .unwrap_or_else(|| "The given data was invalid.".to_string());

        match self.count().saturating_sub(1) {
            0 => first,
            1 => format!("{} (and 1 more error)", first),
            n => format!("{} (and {} more errors)", first, n),
        }
    }

    /// `Ok(())` when empty, otherwise a [`AppError::Validation`].
    pub fn into_result(self) -> Result<()> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(AppError::Validation(self))
        }
    }
}

impl From<validator::ValidationErrors> for FieldErrors {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut out = FieldErrors::new();
        for (field, field_errors) in errors.field_errors() {
            for error in field_errors {
                let message = error
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("The {} field is invalid.", field));
                out.add(field.to_string(), message);
            }
        }
        out
    }
}

// endregion: --- FieldErrors

/// Application-wide error type covering all error scenarios.
#[derive(Debug, Error)]
pub enum AppError {
    /// Request input failed one or more field rules.
    ///
    /// **HTTP Status**: 422 Unprocessable Entity
    #[error("Validation failed: {}", .0.summary())]
    Validation(FieldErrors),

    /// Request is well-formed but refers to a bad credential or token state.
    ///
    /// **HTTP Status**: 400 Bad Request
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Missing, invalid, expired or revoked credentials.
    ///
    /// **HTTP Status**: 401 Unauthorized
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Requested resource not found.
    ///
    /// **HTTP Status**: 404 Not Found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Configuration error during startup or environment loading.
    ///
    /// **HTTP Status**: 500 Internal Server Error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal server error (unexpected failures).
    ///
    /// **HTTP Status**: 500 Internal Server Error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Single-field validation error.
    pub fn field(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut errors = FieldErrors::new();
        errors.add(field, message);
        AppError::Validation(errors)
    }

    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Config(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get a user-friendly error message.
    ///
    /// For internal errors, returns a generic message to avoid exposing implementation details.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Validation(errors) => errors.summary(),
            AppError::BadRequest(msg) | AppError::Unauthorized(msg) | AppError::NotFound(msg) => {
                msg.clone()
            }
            AppError::Config(_) | AppError::Internal(_) => "An internal error occurred".to_string(),
        }
    }
}

/// Implement Axum's `IntoResponse` for automatic error handling.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = self.user_message();

        if status.is_server_error() {
            tracing::error!("Server error: {}", self);
        } else {
            tracing::debug!("Client error: {}", self);
        }

        let body = match self {
            AppError::Validation(errors) => json!({
                "message": message,
                "errors": errors,
            }),
            _ => json!({ "message": message }),
        };

        (status, Json(body)).into_response()
    }
}

/// Convert `anyhow::Error` to `AppError`.
impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

/// Convert `sqlx::Error` to `AppError`.
impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => AppError::NotFound("Record not found".to_string()),
            sqlx::Error::Database(db_err) => {
                AppError::Internal(format!("Database error: {}", db_err.message()))
            }
            _ => AppError::Internal(format!("Database error: {}", err)),
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::Validation(errors.into())
    }
}
