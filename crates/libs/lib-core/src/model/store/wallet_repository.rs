//! # Wallet Repository
//!
//! Besides plain CRUD, [`WalletRepository::find_detail`] loads a wallet together
//! with its owner and type in one call, so handlers never fetch relations lazily.

use super::models::{Wallet, WalletForCreate, WalletForUpdate};
use super::{DbPool, UserRepository, WalletTypeRepository};
use crate::dto::{UserDto, WalletDetail};
use crate::pagination::{Page, PageRequest};
use lib_utils::now_utc;
use sqlx::{query_as, QueryBuilder, Sqlite};

pub struct WalletRepository;

impl WalletRepository {
    pub async fn find_by_id(pool: &DbPool, id: i64) -> Result<Option<Wallet>, sqlx::Error> {
        query_as::<_, Wallet>("SELECT * FROM wallets WHERE id = ?")
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Wallet with its user and wallet type populated.
    ///
    /// Either relation is `None` when the foreign key is null.
    pub async fn find_detail(pool: &DbPool, id: i64) -> Result<Option<WalletDetail>, sqlx::Error> {
        let Some(wallet) = Self::find_by_id(pool, id).await? else {
            return Ok(None);
        };

        let user = match wallet.user_id {
            Some(user_id) => UserRepository::find_by_id(pool, user_id).await?.map(UserDto::from),
            None => None,
        };
        let wallet_type = match wallet.wallet_type_id {
            Some(type_id) => WalletTypeRepository::find_by_id(pool, type_id).await?,
            None => None,
        };

        Ok(Some(WalletDetail {
            wallet,
            user,
            wallet_type,
        }))
    }

    pub async fn exists(pool: &DbPool, id: i64) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM wallets WHERE id = ?)")
            .bind(id)
            .fetch_one(pool)
            .await
    }

    pub async fn create(pool: &DbPool, data: WalletForCreate) -> Result<Wallet, sqlx::Error> {
        let now = now_utc();

        let result = sqlx::query(
            r#"
            INSERT INTO wallets (user_id, wallet_type_id, name, currency, balance, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(data.user_id)
        .bind(data.wallet_type_id)
        .bind(&data.name)
        .bind(&data.currency)
        .bind(data.balance)
        .bind(now)
        .bind(now)
        .execute(pool)
        .await?;

        query_as::<_, Wallet>("SELECT * FROM wallets WHERE id = ?")
            .bind(result.last_insert_rowid())
            .fetch_one(pool)
            .await
    }

    /// Apply a partial update and return the fresh row.
    pub async fn update(
        pool: &DbPool,
        id: i64,
        data: WalletForUpdate,
    ) -> Result<Wallet, sqlx::Error> {
        let mut query: QueryBuilder<Sqlite> = QueryBuilder::new("UPDATE wallets SET updated_at = ");
        query.push_bind(now_utc());

        if let Some(user_id) = data.user_id {
            query.push(", user_id = ").push_bind(user_id);
        }
        if let Some(wallet_type_id) = data.wallet_type_id {
            query.push(", wallet_type_id = ").push_bind(wallet_type_id);
        }
        if let Some(name) = data.name {
            query.push(", name = ").push_bind(name);
        }
        if let Some(currency) = data.currency {
            query.push(", currency = ").push_bind(currency);
        }
        if let Some(balance) = data.balance {
            query.push(", balance = ").push_bind(balance);
        }

        query.push(" WHERE id = ").push_bind(id);

        if query.build().execute(pool).await?.rows_affected() == 0 {
            return Err(sqlx::Error::RowNotFound);
        }

        query_as::<_, Wallet>("SELECT * FROM wallets WHERE id = ?")
            .bind(id)
            .fetch_one(pool)
            .await
    }

    pub async fn delete(pool: &DbPool, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM wallets WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// One page of all wallets, oldest first.
    pub async fn list(pool: &DbPool, page: PageRequest) -> Result<Page<Wallet>, sqlx::Error> {
        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM wallets")
            .fetch_one(pool)
            .await?;

        let rows = query_as::<_, Wallet>("SELECT * FROM wallets ORDER BY id ASC LIMIT ? OFFSET ?")
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(pool)
            .await?;

        Ok(Page::new(rows, total, page))
    }

    /// Wallets belonging to one user, oldest first.
    pub async fn list_for_user(
        pool: &DbPool,
        user_id: i64,
        page: PageRequest,
    ) -> Result<Page<Wallet>, sqlx::Error> {
        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM wallets WHERE user_id = ?")
            .bind(user_id)
            .fetch_one(pool)
            .await?;

        let rows = query_as::<_, Wallet>(
            "SELECT * FROM wallets WHERE user_id = ? ORDER BY id ASC LIMIT ? OFFSET ?",
        )
        .bind(user_id)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(pool)
        .await?;

        Ok(Page::new(rows, total, page))
    }

    /// Wallets whose name contains `term`, newest first.
    pub async fn search_by_name(
        pool: &DbPool,
        term: &str,
        page: PageRequest,
    ) -> Result<Page<Wallet>, sqlx::Error> {
        let pattern = format!("%{}%", term);

        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM wallets WHERE name LIKE ?")
            .bind(&pattern)
            .fetch_one(pool)
            .await?;

        let rows = query_as::<_, Wallet>(
            r#"
            SELECT * FROM wallets
            WHERE name LIKE ?
            ORDER BY created_at DESC, id DESC
            LIMIT ? OFFSET ?
            "#,
        )
        .bind(&pattern)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(pool)
        .await?;

        Ok(Page::new(rows, total, page))
    }
}
