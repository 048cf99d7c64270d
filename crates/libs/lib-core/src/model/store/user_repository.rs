//! # User Repository
//!
//! Provides database access layer for user-related operations.
//!
//! ## Example
//!
//! ```rust,no_run
//! # use lib_core::model::store::{create_memory_pool, UserRepository};
//! # use lib_core::model::store::models::UserForCreate;
//! # async fn example() -> anyhow::Result<()> {
//! let pool = create_memory_pool().await?;
//!
//! let user = UserRepository::create(
//!     &pool,
//!     UserForCreate::new("Alice".into(), "alice@example.com".into(), "hashed".into()),
//! ).await?;
//!
//! let found = UserRepository::find_by_email(&pool, "alice@example.com").await?;
//! assert_eq!(found.map(|u| u.id), Some(user.id));
//! # Ok(())
//! # }
//! ```

use super::models::{User, UserFilter, UserForCreate, UserForUpdate};
use super::DbPool;
use crate::pagination::{Page, PageRequest};
use lib_utils::now_utc;
use sqlx::{query_as, QueryBuilder, Sqlite};

/// User repository for database operations.
pub struct UserRepository;

impl UserRepository {
    /// Find a user by id.
    pub async fn find_by_id(pool: &DbPool, id: i64) -> Result<Option<User>, sqlx::Error> {
        query_as::<_, User>("SELECT * FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a user by their email address.
    ///
    /// # Returns
    ///
    /// * `Ok(Some(User))` - User found with matching email
    /// * `Ok(None)` - No user with that email
    /// * `Err(sqlx::Error)` - Database error occurred
    pub async fn find_by_email(pool: &DbPool, email: &str) -> Result<Option<User>, sqlx::Error> {
        query_as::<_, User>("SELECT * FROM users WHERE email = ?")
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    /// Whether `email` belongs to a user other than `except_id`.
    pub async fn email_taken(
        pool: &DbPool,
        email: &str,
        except_id: Option<i64>,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM users WHERE email = ? AND id != ?)",
        )
        .bind(email)
        .bind(except_id.unwrap_or(0))
        .fetch_one(pool)
        .await
    }

    pub async fn exists(pool: &DbPool, id: i64) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE id = ?)")
            .bind(id)
            .fetch_one(pool)
            .await
    }

    /// Create a new user.
    ///
    /// # Arguments
    ///
    /// * `pool` - Database connection pool
    /// * `user_data` - Name, email and an already hashed password
    ///
    /// Fails with a database error if the email is already registered.
    pub async fn create(pool: &DbPool, user_data: UserForCreate) -> Result<User, sqlx::Error> {
        let now = now_utc();

        let result = sqlx::query(
            "INSERT INTO users (name, email, password, created_at, updated_at) VALUES (?, ?, ?, ?, ?)"
        )
        .bind(&user_data.name)
        .bind(&user_data.email)
        .bind(&user_data.password_hash)
        .bind(now)
        .bind(now)
        .execute(pool)
        .await?;

        let id = result.last_insert_rowid();

        query_as::<_, User>("SELECT * FROM users WHERE id = ?")
            .bind(id)
            .fetch_one(pool)
            .await
    }

    /// Apply a partial update and return the fresh row.
    ///
    /// Returns `RowNotFound` when no user has this id.
    pub async fn update(
        pool: &DbPool,
        id: i64,
        user_data: UserForUpdate,
    ) -> Result<User, sqlx::Error> {
        let mut query: QueryBuilder<Sqlite> = QueryBuilder::new("UPDATE users SET updated_at = ");
        query.push_bind(now_utc());

        if let Some(name) = user_data.name {
            query.push(", name = ").push_bind(name);
        }
        if let Some(email) = user_data.email {
            query.push(", email = ").push_bind(email);
        }
        if let Some(password_hash) = user_data.password_hash {
            query.push(", password = ").push_bind(password_hash);
        }

        query.push(" WHERE id = ").push_bind(id);

        if query.build().execute(pool).await?.rows_affected() == 0 {
            return Err(sqlx::Error::RowNotFound);
        }

        query_as::<_, User>("SELECT * FROM users WHERE id = ?")
            .bind(id)
            .fetch_one(pool)
            .await
    }

    /// Replace the stored password hash.
    pub async fn update_password(
        pool: &DbPool,
        id: i64,
        password_hash: &str,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE users SET password = ?, updated_at = ? WHERE id = ?")
            .bind(password_hash)
            .bind(now_utc())
            .bind(id)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// Delete a user. Their wallets and transactions are kept with a null `user_id`.
    ///
    /// Returns `false` when no user had this id.
    pub async fn delete(pool: &DbPool, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// One page of all users, oldest first.
    pub async fn list(pool: &DbPool, page: PageRequest) -> Result<Page<User>, sqlx::Error> {
        Self::search(pool, &UserFilter::default(), page).await
    }

    /// Users matching the filter, oldest first.
    pub async fn search(
        pool: &DbPool,
        filter: &UserFilter,
        page: PageRequest,
    ) -> Result<Page<User>, sqlx::Error> {
        let mut count: QueryBuilder<Sqlite> = QueryBuilder::new("SELECT COUNT(*) FROM users");
        push_user_filters(&mut count, filter);
        let total = count.build_query_scalar::<i64>().fetch_one(pool).await?;

        let mut select: QueryBuilder<Sqlite> = QueryBuilder::new("SELECT * FROM users");
        push_user_filters(&mut select, filter);
        select
            .push(" ORDER BY id ASC LIMIT ")
            .push_bind(page.limit())
            .push(" OFFSET ")
            .push_bind(page.offset());
        let users = select.build_query_as::<User>().fetch_all(pool).await?;

        Ok(Page::new(users, total, page))
    }
}

fn push_user_filters(query: &mut QueryBuilder<Sqlite>, filter: &UserFilter) {
    query.push(" WHERE 1 = 1");

    if let Some(term) = filter.query.as_deref().filter(|q| !q.is_empty()) {
        let pattern = format!("%{}%", term);
        query
            .push(" AND (name LIKE ")
            .push_bind(pattern.clone())
            .push(" OR email LIKE ")
            .push_bind(pattern)
            .push(")");
    }
    if let Some(role) = filter.role.as_deref().filter(|r| !r.is_empty()) {
        query.push(" AND role = ").push_bind(role.to_string());
    }
}
