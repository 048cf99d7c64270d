//! # Wallet DTOs

use super::{blank_as_none, RequestRules, DEFAULT_PER_PAGE};
use crate::model::store::models::{Wallet, WalletForCreate, WalletForUpdate, WalletType};
use crate::pagination::PageRequest;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::UserDto;

/// Currency applied when a wallet is created without one.
pub const DEFAULT_CURRENCY: &str = "NGN";

/// A wallet with its owner and type loaded.
///
/// The wallet's own fields sit at the top level of the JSON object next to
/// `user` and `wallet_type`, which are `null` when the reference is unset.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WalletDetail {
    #[serde(flatten)]
    pub wallet: Wallet,
    pub user: Option<UserDto>,
    pub wallet_type: Option<WalletType>,
}

/// `{"message", "wallet"}` returned by create and update.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WalletResponse {
    pub message: String,
    pub wallet: Wallet,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct CreateWalletRequest {
    pub user_id: Option<i64>,

    pub wallet_type_id: Option<i64>,

    #[serde(default, deserialize_with = "blank_as_none")]
    #[validate(
        required(message = "The name field is required."),
        length(max = 255, message = "The name field must not be greater than 255 characters.")
    )]
    pub name: Option<String>,

    #[validate(required(message = "The balance field is required."))]
    pub balance: Option<f64>,

    #[serde(default, deserialize_with = "blank_as_none")]
    #[validate(length(max = 10, message = "The currency field must not be greater than 10 characters."))]
    pub currency: Option<String>,
}

impl RequestRules for CreateWalletRequest {}

impl CreateWalletRequest {
    /// Fill defaults. Call only after the rules have passed.
    pub fn into_model(self) -> WalletForCreate {
        WalletForCreate {
            user_id: self.user_id,
            wallet_type_id: self.wallet_type_id,
            name: self.name.unwrap_or_default(),
            currency: self.currency.unwrap_or_else(|| DEFAULT_CURRENCY.to_string()),
            balance: self.balance.unwrap_or_default(),
        }
    }
}

/// Partial update. A missing or `null` field leaves the column unchanged.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateWalletRequest {
    pub user_id: Option<i64>,

    pub wallet_type_id: Option<i64>,

    #[serde(default, deserialize_with = "blank_as_none")]
    #[validate(length(max = 255, message = "The name field must not be greater than 255 characters."))]
    pub name: Option<String>,

    pub balance: Option<f64>,

    #[serde(default, deserialize_with = "blank_as_none")]
    #[validate(length(max = 10, message = "The currency field must not be greater than 10 characters."))]
    pub currency: Option<String>,
}

impl RequestRules for UpdateWalletRequest {}

impl From<UpdateWalletRequest> for WalletForUpdate {
    fn from(req: UpdateWalletRequest) -> Self {
        WalletForUpdate {
            user_id: req.user_id,
            wallet_type_id: req.wallet_type_id,
            name: req.name,
            currency: req.currency,
            balance: req.balance,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct WalletSearchQuery {
    #[serde(default, deserialize_with = "blank_as_none")]
    #[validate(
        required(message = "The query field is required."),
        length(max = 255, message = "The query field must not be greater than 255 characters.")
    )]
    pub query: Option<String>,

    #[validate(range(min = 1, message = "The page field must be at least 1."))]
    pub page: Option<i64>,

    #[validate(range(min = 1, max = 100, message = "The per page field must be between 1 and 100."))]
    pub per_page: Option<i64>,
}

impl RequestRules for WalletSearchQuery {}

impl WalletSearchQuery {
    pub fn page_request(&self) -> PageRequest {
        PageRequest::new(self.page, self.per_page, DEFAULT_PER_PAGE)
    }
}
