//! # Wallet Handlers
//!
//! Wallet CRUD, name search and the per-wallet transaction listing.

use super::{check_references, References};
use crate::extract::{IdPath, ValidatedJson, ValidatedQuery};
use axum::{
    extract::{Json, State},
    http::StatusCode,
};
use lib_core::dto::{
    CreateWalletRequest, PageQuery, UpdateWalletRequest, WalletDetail, WalletResponse,
    WalletSearchQuery,
};
use lib_core::model::store::models::{Transaction, Wallet, WalletForUpdate};
use lib_core::model::store::{TransactionRepository, WalletRepository};
use lib_core::{AppError, DbPool, FieldErrors, Page, Result};
use tracing::{info, instrument};

const WALLET_NOT_FOUND: &str = "Wallet not found";

fn not_found() -> AppError {
    AppError::NotFound(WALLET_NOT_FOUND.to_string())
}

/// `GET /wallets`
#[instrument(skip(pool))]
pub async fn list_wallets(
    State(pool): State<DbPool>,
    ValidatedQuery(query): ValidatedQuery<PageQuery>,
) -> Result<Json<Page<Wallet>>> {
    Ok(Json(WalletRepository::list(&pool, query.page_request()).await?))
}

/// `POST /wallets`
#[instrument(skip(pool, req))]
pub async fn create_wallet(
    State(pool): State<DbPool>,
    ValidatedJson(req): ValidatedJson<CreateWalletRequest>,
) -> Result<(StatusCode, Json<WalletResponse>)> {
    let mut errors = FieldErrors::new();
    check_references(
        &pool,
        References {
            user_id: req.user_id,
            wallet_type_id: req.wallet_type_id,
            ..Default::default()
        },
        &mut errors,
    )
    .await?;
    errors.into_result()?;

    let wallet = WalletRepository::create(&pool, req.into_model()).await?;
    info!("[WALLETS]  Created wallet {} ({})", wallet.id, wallet.name);

    Ok((
        StatusCode::CREATED,
        Json(WalletResponse {
            message: "Wallet created successfully".to_string(),
            wallet,
        }),
    ))
}

/// `GET /wallets/{id}` - the wallet with its owner and type.
#[instrument(skip(pool))]
pub async fn get_wallet(
    State(pool): State<DbPool>,
    IdPath(id): IdPath,
) -> Result<Json<WalletDetail>> {
    let detail = WalletRepository::find_detail(&pool, id)
        .await?
        .ok_or_else(not_found)?;
    Ok(Json(detail))
}

/// `PUT /wallets/{id}` - partial update.
#[instrument(skip(pool, req))]
pub async fn update_wallet(
    State(pool): State<DbPool>,
    IdPath(id): IdPath,
    ValidatedJson(req): ValidatedJson<UpdateWalletRequest>,
) -> Result<Json<WalletResponse>> {
    if !WalletRepository::exists(&pool, id).await? {
        return Err(not_found());
    }

    let mut errors = FieldErrors::new();
    check_references(
        &pool,
        References {
            user_id: req.user_id,
            wallet_type_id: req.wallet_type_id,
            ..Default::default()
        },
        &mut errors,
    )
    .await?;
    errors.into_result()?;

    let wallet = WalletRepository::update(&pool, id, WalletForUpdate::from(req)).await?;
    info!("[WALLETS]  Updated wallet {}", id);

    Ok(Json(WalletResponse {
        message: "Wallet updated successfully".to_string(),
        wallet,
    }))
}

/// `DELETE /wallets/{id}` - its transactions stay with a null `wallet_id`.
#[instrument(skip(pool))]
pub async fn delete_wallet(State(pool): State<DbPool>, IdPath(id): IdPath) -> Result<StatusCode> {
    if !WalletRepository::delete(&pool, id).await? {
        return Err(not_found());
    }

    info!("[WALLETS]  Deleted wallet {}", id);
    Ok(StatusCode::NO_CONTENT)
}

/// `GET /wallets/search?query=` - name substring, newest first.
#[instrument(skip(pool))]
pub async fn search_wallets(
    State(pool): State<DbPool>,
    ValidatedQuery(query): ValidatedQuery<WalletSearchQuery>,
) -> Result<Json<Page<Wallet>>> {
    let page = query.page_request();
    let term = query.query.unwrap_or_default();
    Ok(Json(WalletRepository::search_by_name(&pool, &term, page).await?))
}

/// `GET /wallets/{id}/transactions` - newest first.
#[instrument(skip(pool))]
pub async fn list_wallet_transactions(
    State(pool): State<DbPool>,
    IdPath(id): IdPath,
    ValidatedQuery(query): ValidatedQuery<PageQuery>,
) -> Result<Json<Page<Transaction>>> {
    if !WalletRepository::exists(&pool, id).await? {
        return Err(not_found());
    }

    Ok(Json(
        TransactionRepository::list_for_wallet(&pool, id, query.page_request()).await?,
    ))
}
