//! # Wallet Type Repository

use super::models::{WalletType, WalletTypeFilter, WalletTypeForCreate, WalletTypeForUpdate, WalletTypeSort};
use super::DbPool;
use crate::pagination::{Page, PageRequest, SortDirection};
use lib_utils::now_utc;
use sqlx::{query_as, QueryBuilder, Sqlite};

pub struct WalletTypeRepository;

impl WalletTypeRepository {
    pub async fn find_by_id(pool: &DbPool, id: i64) -> Result<Option<WalletType>, sqlx::Error> {
        query_as::<_, WalletType>("SELECT * FROM wallet_types WHERE id = ?")
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn exists(pool: &DbPool, id: i64) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM wallet_types WHERE id = ?)")
            .bind(id)
            .fetch_one(pool)
            .await
    }

    pub async fn create(
        pool: &DbPool,
        data: WalletTypeForCreate,
    ) -> Result<WalletType, sqlx::Error> {
        let now = now_utc();

        let result = sqlx::query(
            r#"
            INSERT INTO wallet_types (name, description, status, min_balance, interest_rate, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&data.name)
        .bind(&data.description)
        .bind(&data.status)
        .bind(data.min_balance)
        .bind(data.interest_rate)
        .bind(now)
        .bind(now)
        .execute(pool)
        .await?;

        query_as::<_, WalletType>("SELECT * FROM wallet_types WHERE id = ?")
            .bind(result.last_insert_rowid())
            .fetch_one(pool)
            .await
    }

    /// Apply a partial update and return the fresh row.
    pub async fn update(
        pool: &DbPool,
        id: i64,
        data: WalletTypeForUpdate,
    ) -> Result<WalletType, sqlx::Error> {
        let mut query: QueryBuilder<Sqlite> =
            QueryBuilder::new("UPDATE wallet_types SET updated_at = ");
        query.push_bind(now_utc());

        if let Some(name) = data.name {
            query.push(", name = ").push_bind(name);
        }
        if let Some(description) = data.description {
            query.push(", description = ").push_bind(description);
        }
        if let Some(status) = data.status {
            query.push(", status = ").push_bind(status);
        }
        if let Some(min_balance) = data.min_balance {
            query.push(", min_balance = ").push_bind(min_balance);
        }
        if let Some(interest_rate) = data.interest_rate {
            query.push(", interest_rate = ").push_bind(interest_rate);
        }

        query.push(" WHERE id = ").push_bind(id);

        if query.build().execute(pool).await?.rows_affected() == 0 {
            return Err(sqlx::Error::RowNotFound);
        }

        query_as::<_, WalletType>("SELECT * FROM wallet_types WHERE id = ?")
            .bind(id)
            .fetch_one(pool)
            .await
    }

    /// Delete a wallet type. Wallets of this type keep their row with a null
    /// `wallet_type_id`.
    pub async fn delete(pool: &DbPool, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM wallet_types WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// One page of all wallet types, oldest first.
    pub async fn list(pool: &DbPool, page: PageRequest) -> Result<Page<WalletType>, sqlx::Error> {
        Self::search(
            pool,
            &WalletTypeFilter::default(),
            WalletTypeSort::Id,
            SortDirection::Asc,
            page,
        )
        .await
    }

    /// Wallet types matching the filter in the requested order.
    ///
    /// Ties on the sort column fall back to id in the same direction.
    pub async fn search(
        pool: &DbPool,
        filter: &WalletTypeFilter,
        sort: WalletTypeSort,
        direction: SortDirection,
        page: PageRequest,
    ) -> Result<Page<WalletType>, sqlx::Error> {
        let mut count: QueryBuilder<Sqlite> = QueryBuilder::new("SELECT COUNT(*) FROM wallet_types");
        push_wallet_type_filters(&mut count, filter);
        let total = count.build_query_scalar::<i64>().fetch_one(pool).await?;

        let mut select: QueryBuilder<Sqlite> = QueryBuilder::new("SELECT * FROM wallet_types");
        push_wallet_type_filters(&mut select, filter);
        select.push(format!(
            " ORDER BY {col} {dir}, id {dir}",
            col = sort.column(),
            dir = direction.as_sql()
        ));
        select
            .push(" LIMIT ")
            .push_bind(page.limit())
            .push(" OFFSET ")
            .push_bind(page.offset());
        let rows = select.build_query_as::<WalletType>().fetch_all(pool).await?;

        Ok(Page::new(rows, total, page))
    }
}

fn push_wallet_type_filters(query: &mut QueryBuilder<Sqlite>, filter: &WalletTypeFilter) {
    query.push(" WHERE 1 = 1");

    if let Some(term) = filter.query.as_deref().filter(|q| !q.is_empty()) {
        let pattern = format!("%{}%", term);
        query
            .push(" AND (name LIKE ")
            .push_bind(pattern.clone())
            .push(" OR description LIKE ")
            .push_bind(pattern)
            .push(")");
    }
    if let Some(status) = filter.status.as_deref().filter(|s| !s.is_empty()) {
        query.push(" AND status = ").push_bind(status.to_string());
    }
}
