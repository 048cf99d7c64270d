use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

// region: --- User

/// User entity representing a complete user record from the database.
///
/// Carries the password hash, so it is never serialized directly; handlers
/// answer with [`crate::dto::UserDto`].
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub email_verified_at: Option<DateTime<Utc>>,
    pub password: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Data structure for creating a new user.
///
/// Password should be hashed before creating.
#[derive(Debug, Clone)]
pub struct UserForCreate {
    pub name: String,
    pub email: String,
    pub password_hash: String,
}

impl UserForCreate {
    pub fn new(name: String, email: String, password_hash: String) -> Self {
        Self {
            name,
            email,
            password_hash,
        }
    }
}

/// Data structure for updating an existing user.
///
/// All fields are optional - only provided fields will be updated.
#[derive(Debug, Clone, Default)]
pub struct UserForUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password_hash: Option<String>,
}

impl UserForUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: String) -> Self {
        self.name = Some(name);
        self
    }

    pub fn email(mut self, email: String) -> Self {
        self.email = Some(email);
        self
    }

    pub fn password_hash(mut self, password_hash: String) -> Self {
        self.password_hash = Some(password_hash);
        self
    }
}

/// Soft filters for the user search endpoint.
#[derive(Debug, Clone, Default)]
pub struct UserFilter {
    /// Substring of name or email
    pub query: Option<String>,
    pub role: Option<String>,
}

// endregion: --- User

// region: --- WalletType

#[derive(Debug, Clone, FromRow, Serialize, Deserialize, PartialEq)]
pub struct WalletType {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub status: String,
    pub min_balance: f64,
    pub interest_rate: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct WalletTypeForCreate {
    pub name: String,
    pub description: Option<String>,
    pub status: String,
    pub min_balance: f64,
    pub interest_rate: f64,
}

#[derive(Debug, Clone, Default)]
pub struct WalletTypeForUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
    pub min_balance: Option<f64>,
    pub interest_rate: Option<f64>,
}

/// Columns the wallet type search may sort by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WalletTypeSort {
    Id,
    Name,
    Status,
    MinBalance,
    InterestRate,
    #[default]
    CreatedAt,
    UpdatedAt,
}

impl WalletTypeSort {
    pub fn column(&self) -> &'static str {
        match self {
            WalletTypeSort::Id => "id",
            WalletTypeSort::Name => "name",
            WalletTypeSort::Status => "status",
            WalletTypeSort::MinBalance => "min_balance",
            WalletTypeSort::InterestRate => "interest_rate",
            WalletTypeSort::CreatedAt => "created_at",
            WalletTypeSort::UpdatedAt => "updated_at",
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct WalletTypeFilter {
    /// Substring of name or description
    pub query: Option<String>,
    pub status: Option<String>,
}

// endregion: --- WalletType

// region: --- Wallet

#[derive(Debug, Clone, FromRow, Serialize, Deserialize, PartialEq)]
pub struct Wallet {
    pub id: i64,
    pub user_id: Option<i64>,
    pub wallet_type_id: Option<i64>,
    pub name: String,
    pub currency: String,
    pub balance: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct WalletForCreate {
    pub user_id: Option<i64>,
    pub wallet_type_id: Option<i64>,
    pub name: String,
    pub currency: String,
    pub balance: f64,
}

#[derive(Debug, Clone, Default)]
pub struct WalletForUpdate {
    pub user_id: Option<i64>,
    pub wallet_type_id: Option<i64>,
    pub name: Option<String>,
    pub currency: Option<String>,
    pub balance: Option<f64>,
}

// endregion: --- Wallet

// region: --- Transaction

#[derive(Debug, Clone, FromRow, Serialize, Deserialize, PartialEq)]
pub struct Transaction {
    pub id: i64,
    pub user_id: Option<i64>,
    pub wallet_id: Option<i64>,
    pub amount: f64,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub kind: String,
    pub status: String,
    pub description: Option<String>,
    pub currency: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct TransactionForCreate {
    pub user_id: Option<i64>,
    pub wallet_id: Option<i64>,
    pub amount: f64,
    pub kind: String,
    pub status: String,
    pub description: Option<String>,
    pub currency: String,
}

#[derive(Debug, Clone, Default)]
pub struct TransactionForUpdate {
    pub user_id: Option<i64>,
    pub wallet_id: Option<i64>,
    pub amount: Option<f64>,
    pub kind: Option<String>,
    pub status: Option<String>,
    pub description: Option<String>,
    pub currency: Option<String>,
}

/// Columns the transaction search may sort by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionSort {
    Id,
    Amount,
    Type,
    Status,
    Currency,
    #[default]
    CreatedAt,
    UpdatedAt,
}

impl TransactionSort {
    pub fn column(&self) -> &'static str {
        match self {
            TransactionSort::Id => "id",
            TransactionSort::Amount => "amount",
            TransactionSort::Type => "type",
            TransactionSort::Status => "status",
            TransactionSort::Currency => "currency",
            TransactionSort::CreatedAt => "created_at",
            TransactionSort::UpdatedAt => "updated_at",
        }
    }
}

/// Soft filters for the transaction search endpoint; each applies only when set.
#[derive(Debug, Clone, Default)]
pub struct TransactionFilter {
    pub id: Option<i64>,
    pub min_amount: Option<f64>,
    pub max_amount: Option<f64>,
    /// Inclusive, compared on the date part of `created_at`
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub status: Option<String>,
    pub kind: Option<String>,
    /// Substring of description
    pub description: Option<String>,
}

// endregion: --- Transaction

// region: --- Tokens

/// Outstanding password reset for one email address.
#[derive(Debug, Clone, FromRow)]
pub struct PasswordReset {
    pub email: String,
    pub token_hash: String,
    pub created_at: DateTime<Utc>,
}

// endregion: --- Tokens
