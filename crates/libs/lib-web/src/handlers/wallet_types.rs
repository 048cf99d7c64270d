//! # Wallet Type Handlers
//!
//! Wallet types are returned bare (no message envelope).

use crate::extract::{IdPath, ValidatedJson, ValidatedQuery};
use axum::{
    extract::{Json, State},
    http::StatusCode,
};
use lib_core::dto::{
    CreateWalletTypeRequest, PageQuery, UpdateWalletTypeRequest, WalletTypeSearchQuery,
};
use lib_core::model::store::models::{WalletType, WalletTypeForUpdate};
use lib_core::model::store::WalletTypeRepository;
use lib_core::{AppError, DbPool, Page, Result};
use tracing::{info, instrument};

fn not_found() -> AppError {
    AppError::NotFound("Wallet type not found".to_string())
}

/// `GET /wallet-types`
#[instrument(skip(pool))]
pub async fn list_wallet_types(
    State(pool): State<DbPool>,
    ValidatedQuery(query): ValidatedQuery<PageQuery>,
) -> Result<Json<Page<WalletType>>> {
    Ok(Json(WalletTypeRepository::list(&pool, query.page_request()).await?))
}

/// `POST /wallet-types`
#[instrument(skip(pool, req))]
pub async fn create_wallet_type(
    State(pool): State<DbPool>,
    ValidatedJson(req): ValidatedJson<CreateWalletTypeRequest>,
) -> Result<(StatusCode, Json<WalletType>)> {
    let wallet_type = WalletTypeRepository::create(&pool, req.into_model()).await?;
    info!("[WALLET TYPES]  Created wallet type {} ({})", wallet_type.id, wallet_type.name);
    Ok((StatusCode::CREATED, Json(wallet_type)))
}

#[instrument(skip(pool))]
pub async fn get_wallet_type(
    State(pool): State<DbPool>,
    IdPath(id): IdPath,
) -> Result<Json<WalletType>> {
    let wallet_type = WalletTypeRepository::find_by_id(&pool, id)
        .await?
        .ok_or_else(not_found)?;
    Ok(Json(wallet_type))
}

#[instrument(skip(pool, req))]
pub async fn update_wallet_type(
    State(pool): State<DbPool>,
    IdPath(id): IdPath,
    ValidatedJson(req): ValidatedJson<UpdateWalletTypeRequest>,
) -> Result<Json<WalletType>> {
    let wallet_type = WalletTypeRepository::update(&pool, id, WalletTypeForUpdate::from(req))
        .await
        .map_err(|e| match e {
            sqlx::Error::RowNotFound => not_found(),
            other => other.into(),
        })?;

    info!("[WALLET TYPES]  Updated wallet type {}", id);
    Ok(Json(wallet_type))
}

/// Wallets of this type keep existing with a null `wallet_type_id`.
#[instrument(skip(pool))]
pub async fn delete_wallet_type(
    State(pool): State<DbPool>,
    IdPath(id): IdPath,
) -> Result<StatusCode> {
    if !WalletTypeRepository::delete(&pool, id).await? {
        return Err(not_found());
    }

    info!("[WALLET TYPES]  Deleted wallet type {}", id);
    Ok(StatusCode::NO_CONTENT)
}

/// `GET /wallet-types/search?query=&status=&sort=&order=`
///
/// Defaults to `created_at` descending.
#[instrument(skip(pool))]
pub async fn search_wallet_types(
    State(pool): State<DbPool>,
    ValidatedQuery(query): ValidatedQuery<WalletTypeSearchQuery>,
) -> Result<Json<Page<WalletType>>> {
    let (sort, direction) = query.sort();
    let page = WalletTypeRepository::search(
        &pool,
        &query.filter(),
        sort,
        direction,
        query.page_request(),
    )
    .await?;
    Ok(Json(page))
}
