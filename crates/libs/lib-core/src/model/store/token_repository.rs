//! # Token Repositories
//!
//! Persistent state behind bearer tokens and password resets:
//! - revoked JWT ids, written on logout and checked on every authenticated request
//! - one outstanding reset token hash per email

use super::models::PasswordReset;
use super::DbPool;
use chrono::{DateTime, Utc};
use lib_utils::now_utc;
use sqlx::query_as;

pub struct RevokedTokenRepository;

impl RevokedTokenRepository {
    /// Record a token id as revoked. Revoking twice is a no-op.
    pub async fn revoke(
        pool: &DbPool,
        jti: &str,
        user_id: i64,
        expires_at: DateTime<Utc>,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO revoked_tokens (jti, user_id, expires_at, revoked_at)
            VALUES (?, ?, ?, ?)
            ON CONFLICT(jti) DO NOTHING
            "#,
        )
        .bind(jti)
        .bind(user_id)
        .bind(expires_at)
        .bind(now_utc())
        .execute(pool)
        .await?;
        Ok(())
    }

    pub async fn is_revoked(pool: &DbPool, jti: &str) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM revoked_tokens WHERE jti = ?)")
            .bind(jti)
            .fetch_one(pool)
            .await
    }

    /// Drop entries whose token would be rejected as expired anyway.
    pub async fn purge_expired(pool: &DbPool) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM revoked_tokens WHERE expires_at < ?")
            .bind(now_utc())
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}

pub struct PasswordResetRepository;

impl PasswordResetRepository {
    /// Store a fresh token hash for `email`, replacing any earlier one.
    pub async fn upsert(pool: &DbPool, email: &str, token_hash: &str) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO password_reset_tokens (email, token_hash, created_at)
            VALUES (?, ?, ?)
            ON CONFLICT(email) DO UPDATE SET
                token_hash = excluded.token_hash,
                created_at = excluded.created_at
            "#,
        )
        .bind(email)
        .bind(token_hash)
        .bind(now_utc())
        .execute(pool)
        .await?;
        Ok(())
    }

    pub async fn find(pool: &DbPool, email: &str) -> Result<Option<PasswordReset>, sqlx::Error> {
        query_as::<_, PasswordReset>("SELECT * FROM password_reset_tokens WHERE email = ?")
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &DbPool, email: &str) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM password_reset_tokens WHERE email = ?")
            .bind(email)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// Delete the row only if it still holds `token_hash`.
    ///
    /// Returns `true` for exactly one caller per issued token; a concurrent
    /// or repeated reset sees `false`.
    pub async fn consume(pool: &DbPool, email: &str, token_hash: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM password_reset_tokens WHERE email = ? AND token_hash = ?")
            .bind(email)
            .bind(token_hash)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() == 1)
    }
}
