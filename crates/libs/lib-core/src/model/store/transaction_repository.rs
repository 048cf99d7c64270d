//! # Transaction Repository
//!
//! Transactions are stored as given; nothing here touches wallet balances.

use super::models::{
    Transaction, TransactionFilter, TransactionForCreate, TransactionForUpdate, TransactionSort,
};
use super::DbPool;
use crate::pagination::{Page, PageRequest, SortDirection};
use lib_utils::now_utc;
use sqlx::{query_as, QueryBuilder, Sqlite};

pub struct TransactionRepository;

impl TransactionRepository {
    pub async fn find_by_id(pool: &DbPool, id: i64) -> Result<Option<Transaction>, sqlx::Error> {
        query_as::<_, Transaction>("SELECT * FROM transactions WHERE id = ?")
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn create(
        pool: &DbPool,
        data: TransactionForCreate,
    ) -> Result<Transaction, sqlx::Error> {
        let now = now_utc();

        let result = sqlx::query(
            r#"
            INSERT INTO transactions (user_id, wallet_id, amount, type, status, description, currency, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(data.user_id)
        .bind(data.wallet_id)
        .bind(data.amount)
        .bind(&data.kind)
        .bind(&data.status)
        .bind(&data.description)
        .bind(&data.currency)
        .bind(now)
        .bind(now)
        .execute(pool)
        .await?;

        query_as::<_, Transaction>("SELECT * FROM transactions WHERE id = ?")
            .bind(result.last_insert_rowid())
            .fetch_one(pool)
            .await
    }

    /// Apply a partial update and return the fresh row.
    pub async fn update(
        pool: &DbPool,
        id: i64,
        data: TransactionForUpdate,
    ) -> Result<Transaction, sqlx::Error> {
        let mut query: QueryBuilder<Sqlite> =
            QueryBuilder::new("UPDATE transactions SET updated_at = ");
        query.push_bind(now_utc());

        if let Some(user_id) = data.user_id {
            query.push(", user_id = ").push_bind(user_id);
        }
        if let Some(wallet_id) = data.wallet_id {
            query.push(", wallet_id = ").push_bind(wallet_id);
        }
        if let Some(amount) = data.amount {
            query.push(", amount = ").push_bind(amount);
        }
        if let Some(kind) = data.kind {
            query.push(", type = ").push_bind(kind);
        }
        if let Some(status) = data.status {
            query.push(", status = ").push_bind(status);
        }
        if let Some(description) = data.description {
            query.push(", description = ").push_bind(description);
        }
        if let Some(currency) = data.currency {
            query.push(", currency = ").push_bind(currency);
        }

        query.push(" WHERE id = ").push_bind(id);

        if query.build().execute(pool).await?.rows_affected() == 0 {
            return Err(sqlx::Error::RowNotFound);
        }

        query_as::<_, Transaction>("SELECT * FROM transactions WHERE id = ?")
            .bind(id)
            .fetch_one(pool)
            .await
    }

    pub async fn delete(pool: &DbPool, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM transactions WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// One page of all transactions, oldest first.
    pub async fn list(pool: &DbPool, page: PageRequest) -> Result<Page<Transaction>, sqlx::Error> {
        Self::search(
            pool,
            &TransactionFilter::default(),
            TransactionSort::Id,
            SortDirection::Asc,
            page,
        )
        .await
    }

    pub async fn list_for_user(
        pool: &DbPool,
        user_id: i64,
        page: PageRequest,
    ) -> Result<Page<Transaction>, sqlx::Error> {
        Self::list_by_owner(pool, "user_id", user_id, page).await
    }

    pub async fn list_for_wallet(
        pool: &DbPool,
        wallet_id: i64,
        page: PageRequest,
    ) -> Result<Page<Transaction>, sqlx::Error> {
        Self::list_by_owner(pool, "wallet_id", wallet_id, page).await
    }

    /// `column` is one of the two foreign key names, never user input.
    async fn list_by_owner(
        pool: &DbPool,
        column: &'static str,
        owner_id: i64,
        page: PageRequest,
    ) -> Result<Page<Transaction>, sqlx::Error> {
        let total = sqlx::query_scalar::<_, i64>(&format!(
            "SELECT COUNT(*) FROM transactions WHERE {column} = ?"
        ))
        .bind(owner_id)
        .fetch_one(pool)
        .await?;

        let rows = query_as::<_, Transaction>(&format!(
            "SELECT * FROM transactions WHERE {column} = ? ORDER BY created_at DESC, id DESC LIMIT ? OFFSET ?"
        ))
        .bind(owner_id)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(pool)
        .await?;

        Ok(Page::new(rows, total, page))
    }

    /// Transactions matching every set filter, in the requested order.
    ///
    /// Ties on the sort column fall back to id in the same direction.
    pub async fn search(
        pool: &DbPool,
        filter: &TransactionFilter,
        sort: TransactionSort,
        direction: SortDirection,
        page: PageRequest,
    ) -> Result<Page<Transaction>, sqlx::Error> {
        let mut count: QueryBuilder<Sqlite> = QueryBuilder::new("SELECT COUNT(*) FROM transactions");
        push_transaction_filters(&mut count, filter);
        let total = count.build_query_scalar::<i64>().fetch_one(pool).await?;

        let mut select: QueryBuilder<Sqlite> = QueryBuilder::new("SELECT * FROM transactions");
        push_transaction_filters(&mut select, filter);
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
        let rows = select.build_query_as::<Transaction>().fetch_all(pool).await?;

        Ok(Page::new(rows, total, page))
    }
}

fn push_transaction_filters(query: &mut QueryBuilder<Sqlite>, filter: &TransactionFilter) {
    query.push(" WHERE 1 = 1");

    if let Some(id) = filter.id {
        query.push(" AND id = ").push_bind(id);
    }
    if let Some(min) = filter.min_amount {
        query.push(" AND amount >= ").push_bind(min);
    }
    if let Some(max) = filter.max_amount {
        query.push(" AND amount <= ").push_bind(max);
    }
    if let Some(start) = filter.start_date {
        query
            .push(" AND substr(created_at, 1, 10) >= ")
            .push_bind(start.format("%Y-%m-%d").to_string());
    }
    if let Some(end) = filter.end_date {
        query
            .push(" AND substr(created_at, 1, 10) <= ")
            .push_bind(end.format("%Y-%m-%d").to_string());
    }
    if let Some(status) = filter.status.as_deref().filter(|s| !s.is_empty()) {
        query.push(" AND status = ").push_bind(status.to_string());
    }
    if let Some(kind) = filter.kind.as_deref().filter(|k| !k.is_empty()) {
        query.push(" AND type = ").push_bind(kind.to_string());
    }
    if let Some(description) = filter.description.as_deref().filter(|d| !d.is_empty()) {
        query
            .push(" AND description LIKE ")
            .push_bind(format!("%{}%", description));
    }
}
