//! # Database Store
//!
//! Database connection pool, embedded migrations and repository implementations.

// region: --- Modules
pub mod models;
pub mod token_repository;
pub mod transaction_repository;
pub mod user_repository;
pub mod wallet_repository;
pub mod wallet_type_repository;
// endregion: --- Modules

// region: --- Re-exports
pub use token_repository::{PasswordResetRepository, RevokedTokenRepository};
pub use transaction_repository::TransactionRepository;
pub use user_repository::UserRepository;
pub use wallet_repository::WalletRepository;
pub use wallet_type_repository::WalletTypeRepository;
// endregion: --- Re-exports

// region: --- Types and Functions
use sqlx::migrate::Migrator;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;
use tracing::info;

/// Type alias for SQLite connection pool.
pub type DbPool = SqlitePool;

/// Schema migrations, embedded at compile time.
pub static MIGRATOR: Migrator = sqlx::migrate!("../../../migrations");

/// Create a new SQLite connection pool, creating the database file if needed.
pub async fn create_pool(database_url: &str) -> anyhow::Result<DbPool> {
    if let Some(db_path) = database_url.strip_prefix("sqlite:") {
        let db_path = db_path.trim_start_matches("//");
        if !db_path.starts_with(":memory:") {
            if let Some(parent) = std::path::Path::new(db_path).parent() {
                if !parent.as_os_str().is_empty() && !parent.exists() {
                    std::fs::create_dir_all(parent)?;
                    info!("Created database directory: {:?}", parent);
                }
            }
        }
    }

    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new().connect_with(options).await?;

    Ok(pool)
}

/// Apply all pending migrations.
pub async fn migrate(pool: &DbPool) -> anyhow::Result<()> {
    MIGRATOR.run(pool).await?;
    Ok(())
}

/// Fresh in-memory database with the schema applied.
///
/// Limited to one connection so every query sees the same database.
pub async fn create_memory_pool() -> anyhow::Result<DbPool> {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await?;

    migrate(&pool).await?;
    Ok(pool)
}
// endregion: --- Types and Functions
