//! # HTTP Request Handlers
//!
//! Axum handlers organized by resource. Each handler validates its input,
//! calls the repository directly and maps the result to JSON.
//!
//! ## Handler Modules
//!
//! - **[`auth`]**: register, login, logout and the password flows
//! - **[`users`]**: user CRUD, search and the user's wallets/transactions
//! - **[`wallets`]**: wallet CRUD, name search and the wallet's transactions
//! - **[`wallet_types`]**: wallet type CRUD and filtered, sorted search
//! - **[`transactions`]**: transaction CRUD and multi-filter search
//!
//! ## Handler Architecture
//!
//! ```rust,ignore
//! async fn handler(
//!     State(db): State<DbPool>,                         // Shared state
//!     Extension(claims): Extension<Claims>,             // Bearer auth
//!     ValidatedJson(payload): ValidatedJson<Request>,   // Body that passed its rules
//! ) -> Result<Json<Response>> {
//!     Ok(Json(response))
//! }
//! ```
//!
//! Failures are [`lib_core::AppError`] values, which render as
//! `{"message"}` or, for 422, `{"message", "errors"}`.

pub mod auth;
pub mod transactions;
pub mod users;
pub mod wallet_types;
pub mod wallets;

use lib_core::model::store::{DbPool, UserRepository, WalletRepository, WalletTypeRepository};
use lib_core::{FieldErrors, Result};

/// Foreign keys named in a request body.
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct References {
    pub user_id: Option<i64>,
    pub wallet_id: Option<i64>,
    pub wallet_type_id: Option<i64>,
}

/// Add an `exists` failure for every reference that points at no row.
pub(crate) async fn check_references(
    db: &DbPool,
    refs: References,
    errors: &mut FieldErrors,
) -> Result<()> {
    if let Some(id) = refs.user_id {
        if !UserRepository::exists(db, id).await? {
            errors.add("user_id", "The selected user id is invalid.");
        }
    }
    if let Some(id) = refs.wallet_id {
        if !WalletRepository::exists(db, id).await? {
            errors.add("wallet_id", "The selected wallet id is invalid.");
        }
    }
    if let Some(id) = refs.wallet_type_id {
        if !WalletTypeRepository::exists(db, id).await? {
            errors.add("wallet_type_id", "The selected wallet type id is invalid.");
        }
    }
    Ok(())
}
