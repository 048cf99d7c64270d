//! # Authentication Middleware
//!
//! Validates the bearer token and injects its [`Claims`] into the request
//! extensions.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use axum::{middleware, Router, routing::get};
//! use lib_web::middleware::require_auth;
//!
//! let protected = Router::new()
//!     .route("/users", get(handler))
//!     .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));
//! ```
//!
//! Handlers then extract `Extension<Claims>`.

use crate::server::AppState;
use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use lib_auth::{decode_jwt, Claims};
use lib_core::model::store::{RevokedTokenRepository, UserRepository};
use lib_core::AppError;
use tracing::{debug, warn};

const UNAUTHENTICATED: &str = "Unauthenticated.";

/// Reject the request with 401 unless it carries a live bearer token.
///
/// A token is live when its signature and expiry check out, its `jti` has not
/// been revoked by a logout, and its user still exists.
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = bearer_token(&req).ok_or_else(|| {
        warn!("[AUTH] Missing or malformed Authorization header");
        AppError::Unauthorized(UNAUTHENTICATED.to_string())
    })?;

    let claims: Claims = decode_jwt(token, &state.config.jwt_secret).map_err(|e| {
        warn!("[AUTH] JWT validation failed: {}", e);
        AppError::Unauthorized(UNAUTHENTICATED.to_string())
    })?;

    if RevokedTokenRepository::is_revoked(&state.db, &claims.jti).await? {
        warn!("[AUTH] Revoked token presented (jti: {})", claims.jti);
        return Err(AppError::Unauthorized(UNAUTHENTICATED.to_string()));
    }

    let user_id = claims
        .user_id()
        .map_err(|_| AppError::Unauthorized(UNAUTHENTICATED.to_string()))?;
    if !UserRepository::exists(&state.db, user_id).await? {
        warn!("[AUTH] Token for deleted user {}", user_id);
        return Err(AppError::Unauthorized(UNAUTHENTICATED.to_string()));
    }

    debug!("[AUTH] Authenticated user: {} (id: {})", claims.email, claims.sub);

    req.extensions_mut().insert(claims);

    Ok(next.run(req).await)
}

fn bearer_token(req: &Request) -> Option<&str> {
    req.headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}
