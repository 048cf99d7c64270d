//! # Authentication Handlers
//!
//! HTTP request handlers for registration, sessions and passwords.
//!
//! ## Overview
//!
//! - Registration with name, email and password
//! - Login returning a JWT bearer token
//! - Logout, which revokes the presented token's `jti`
//! - Password change for the signed-in user
//! - Forgot/reset password through a mailed single-use token
//!
//! ## Example
//!
//! ```rust,ignore
//! use axum::{Router, routing::post};
//! use lib_web::handlers::auth::{register, login};
//!
//! let app = Router::new()
//!     .route("/users/register", post(register))
//!     .route("/users/login", post(login));
//! ```

use crate::extract::ValidatedJson;
use crate::services::mailer::{Mailer, PasswordResetMail};
use axum::{
    extract::{Json, State},
    http::StatusCode,
    Extension,
};
use chrono::Duration;
use lib_auth::{
    encode_jwt, generate_reset_token, hash_password, verify_password, verify_reset_token, Claims,
};
use lib_core::dto::{
    ChangePasswordRequest, ForgotPasswordRequest, LoginRequest, LoginResponse, MessageResponse,
    RegisterUserRequest, ResetPasswordRequest, UserDto, UserResponse,
};
use lib_core::model::store::models::UserForCreate;
use lib_core::model::store::{PasswordResetRepository, RevokedTokenRepository, UserRepository};
use lib_core::{AppError, Config, DbPool, Result};
use lib_utils::is_expired;
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

const EMAIL_TAKEN: &str = "The email has already been taken.";
const INVALID_CREDENTIALS: &str = "Invalid credentials";
const INVALID_RESET_TOKEN: &str = "Invalid token";

/// Register handler - creates a new user account.
///
/// # Returns
///
/// * `201` with [`UserResponse`] - user created
/// * `422` - missing/invalid fields or the email is already registered
///
/// # Validation
///
/// - Name is required, at most 255 characters
/// - Email is required, well-formed and unique
/// - Password is required, at least 8 characters
#[instrument(skip(pool, req), fields(email = ?req.email))]
pub async fn register(
    State(pool): State<DbPool>,
    ValidatedJson(req): ValidatedJson<RegisterUserRequest>,
) -> Result<(StatusCode, Json<UserResponse>)> {
    info!("[REGISTER]  NEW USER REGISTRATION REQUEST");

    let name = req.name.unwrap_or_default();
    let email = req.email.unwrap_or_default();
    let password = req.password.unwrap_or_default();

    if UserRepository::email_taken(&pool, &email, None).await? {
        warn!("[REGISTER]  Email already registered: {}", email);
        return Err(AppError::field("email", EMAIL_TAKEN));
    }

    debug!("[REGISTER] Hashing password...");
    let password_hash = hash_password(&password).map_err(|e| {
        error!("[REGISTER]  Password hashing failed: {}", e);
        AppError::Internal(e)
    })?;

    let user = match UserRepository::create(&pool, UserForCreate::new(name, email, password_hash)).await {
        Ok(user) => user,
        // Lost a race with a concurrent registration for the same email
        Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
            warn!("[REGISTER]  Unique constraint hit on insert");
            return Err(AppError::field("email", EMAIL_TAKEN));
        }
        Err(e) => return Err(e.into()),
    };

    info!("[REGISTER]  User created (id: {})", user.id);

    Ok((
        StatusCode::CREATED,
        Json(UserResponse {
            user: UserDto::from(user),
        }),
    ))
}

/// Login handler - exchanges email and password for a bearer token.
///
/// An unknown email and a wrong password give the same 401, so the response
/// does not reveal which accounts exist.
#[instrument(skip(pool, config, req), fields(email = ?req.email))]
pub async fn login(
    State(pool): State<DbPool>,
    State(config): State<Config>,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> Result<Json<LoginResponse>> {
    info!("[LOGIN]  LOGIN REQUEST");

    let email = req.email.unwrap_or_default();
    let password = req.password.unwrap_or_default();

    let Some(user) = UserRepository::find_by_email(&pool, &email).await? else {
        warn!("[LOGIN]  No user with email: {}", email);
        return Err(AppError::Unauthorized(INVALID_CREDENTIALS.to_string()));
    };

    let valid = verify_password(&password, &user.password).map_err(AppError::Internal)?;
    if !valid {
        warn!("[LOGIN]  Wrong password for user {}", user.id);
        return Err(AppError::Unauthorized(INVALID_CREDENTIALS.to_string()));
    }

    let issued = encode_jwt(user.id, &user.email, &config.jwt_secret, config.jwt_expiration_hours)
        .map_err(|e| {
            error!("[LOGIN]  Token generation failed: {}", e);
            AppError::Internal(e)
        })?;

    info!("[LOGIN]  User {} logged in", user.id);

    Ok(Json(LoginResponse {
        token: issued.token,
        token_type: "Bearer".to_string(),
        user: UserDto::from(user),
    }))
}

/// Logout handler - revokes the token that authenticated this request.
#[instrument(skip(pool, claims), fields(user_id = %claims.sub))]
pub async fn logout(
    State(pool): State<DbPool>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<MessageResponse>> {
    let user_id = claims.user_id().map_err(AppError::Unauthorized)?;

    RevokedTokenRepository::revoke(&pool, &claims.jti, user_id, claims.expires_at()).await?;

    let purged = RevokedTokenRepository::purge_expired(&pool).await?;
    if purged > 0 {
        debug!("[LOGOUT] Purged {} expired revocations", purged);
    }

    info!("[LOGOUT]  User {} logged out", user_id);
    Ok(Json(MessageResponse::new("Logged out successfully")))
}

/// Change the signed-in user's password.
///
/// # Returns
///
/// * `200` - password replaced
/// * `400` - `current_password` does not match
/// * `422` - missing fields, short or unconfirmed new password
#[instrument(skip(pool, claims, req), fields(user_id = %claims.sub))]
pub async fn change_password(
    State(pool): State<DbPool>,
    Extension(claims): Extension<Claims>,
    ValidatedJson(req): ValidatedJson<ChangePasswordRequest>,
) -> Result<Json<MessageResponse>> {
    let user_id = claims.user_id().map_err(AppError::Unauthorized)?;

    let user = UserRepository::find_by_id(&pool, user_id)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Unauthenticated.".to_string()))?;

    let current = req.current_password.unwrap_or_default();
    if !verify_password(&current, &user.password).map_err(AppError::Internal)? {
        warn!("[CHANGE PASSWORD]  Current password mismatch for user {}", user.id);
        return Err(AppError::BadRequest("Current password is incorrect".to_string()));
    }

    let new_hash = hash_password(&req.new_password.unwrap_or_default()).map_err(AppError::Internal)?;
    UserRepository::update_password(&pool, user.id, &new_hash).await?;

    info!("[CHANGE PASSWORD]  Password changed for user {}", user.id);
    Ok(Json(MessageResponse::new("Password changed successfully")))
}

/// Start a password reset: store a fresh token hash and mail the link.
///
/// A second request for the same email inside the throttle window is refused
/// with 400 and sends nothing.
#[instrument(skip(pool, config, mailer, req), fields(email = ?req.email))]
pub async fn forgot_password(
    State(pool): State<DbPool>,
    State(config): State<Config>,
    State(mailer): State<Arc<dyn Mailer>>,
    ValidatedJson(req): ValidatedJson<ForgotPasswordRequest>,
) -> Result<Json<MessageResponse>> {
    let email = req.email.unwrap_or_default();

    if UserRepository::find_by_email(&pool, &email).await?.is_none() {
        warn!("[FORGOT PASSWORD]  Unknown email: {}", email);
        return Err(AppError::field("email", "The selected email is invalid."));
    }

    if let Some(existing) = PasswordResetRepository::find(&pool, &email).await? {
        let throttle = Duration::seconds(config.reset_throttle_seconds);
        if !is_expired(existing.created_at, throttle) {
            warn!("[FORGOT PASSWORD]  Throttled reset request for {}", email);
            return Err(AppError::BadRequest("Unable to send reset link".to_string()));
        }
    }

    let token = generate_reset_token().map_err(AppError::Internal)?;
    PasswordResetRepository::upsert(&pool, &email, &token.hash).await?;

    let link = config.reset_link(&token.plain, &email);
    let sent = mailer
        .send_password_reset(PasswordResetMail {
            email: email.clone(),
            token: token.plain,
            link,
        })
        .await;

    if let Err(e) = sent {
        error!("[FORGOT PASSWORD]  Mail delivery failed: {}", e);
        // Undelivered tokens must not hold the throttle window
        PasswordResetRepository::delete(&pool, &email).await?;
        return Err(AppError::BadRequest("Unable to send reset link".to_string()));
    }

    info!("[FORGOT PASSWORD]  Reset link sent to {}", email);
    Ok(Json(MessageResponse::new("Password reset link sent to your email")))
}

/// Finish a password reset with the mailed token.
///
/// The token is single use and expires after
/// `reset_token_expiration_minutes`. Every token failure is the same 400.
#[instrument(skip(pool, config, req), fields(email = ?req.email))]
pub async fn reset_password(
    State(pool): State<DbPool>,
    State(config): State<Config>,
    ValidatedJson(req): ValidatedJson<ResetPasswordRequest>,
) -> Result<Json<MessageResponse>> {
    let email = req.email.unwrap_or_default();
    let presented = req.token.unwrap_or_default();
    let invalid = || AppError::BadRequest(INVALID_RESET_TOKEN.to_string());

    let Some(user) = UserRepository::find_by_email(&pool, &email).await? else {
        warn!("[RESET PASSWORD]  Unknown email: {}", email);
        return Err(invalid());
    };

    let Some(record) = PasswordResetRepository::find(&pool, &email).await? else {
        warn!("[RESET PASSWORD]  No outstanding reset for {}", email);
        return Err(invalid());
    };

    let ttl = Duration::minutes(config.reset_token_expiration_minutes);
    if is_expired(record.created_at, ttl) {
        warn!("[RESET PASSWORD]  Expired token for {}", email);
        PasswordResetRepository::delete(&pool, &email).await?;
        return Err(invalid());
    }

    if !verify_reset_token(&presented, &record.token_hash).map_err(AppError::Internal)? {
        warn!("[RESET PASSWORD]  Token mismatch for {}", email);
        return Err(invalid());
    }

    let new_hash = hash_password(&req.password.unwrap_or_default()).map_err(AppError::Internal)?;

    if !PasswordResetRepository::consume(&pool, &email, &record.token_hash).await? {
        warn!("[RESET PASSWORD]  Token already used for {}", email);
        return Err(invalid());
    }
    UserRepository::update_password(&pool, user.id, &new_hash).await?;

    info!("[RESET PASSWORD]  Password reset for user {}", user.id);
    Ok(Json(MessageResponse::new("Password reset successfully")))
}

#[cfg(test)]
mod tests;
