//! # Wallet Type DTOs
//!
//! Wallet types are returned bare, without an envelope.

use super::{blank_as_none, RequestRules, DEFAULT_PER_PAGE};
use crate::model::store::models::{
    WalletTypeFilter, WalletTypeForCreate, WalletTypeForUpdate, WalletTypeSort,
};
use crate::pagination::{PageRequest, SortDirection};
use serde::Deserialize;
use validator::Validate;

pub const DEFAULT_WALLET_TYPE_STATUS: &str = "active";
pub const DEFAULT_MIN_BALANCE: f64 = 0.0;
pub const DEFAULT_INTEREST_RATE: f64 = 1.0;

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct CreateWalletTypeRequest {
    #[serde(default, deserialize_with = "blank_as_none")]
    #[validate(
        required(message = "The name field is required."),
        length(max = 255, message = "The name field must not be greater than 255 characters.")
    )]
    pub name: Option<String>,

    #[serde(default, deserialize_with = "blank_as_none")]
    pub description: Option<String>,

    #[serde(default, deserialize_with = "blank_as_none")]
    #[validate(length(max = 50, message = "The status field must not be greater than 50 characters."))]
    pub status: Option<String>,

    #[validate(range(min = 0.0, message = "The min balance field must be at least 0."))]
    pub min_balance: Option<f64>,

    #[validate(range(min = 0.0, message = "The interest rate field must be at least 0."))]
    pub interest_rate: Option<f64>,
}

impl RequestRules for CreateWalletTypeRequest {}

impl CreateWalletTypeRequest {
    /// Fill defaults. Call only after the rules have passed.
    pub fn into_model(self) -> WalletTypeForCreate {
        WalletTypeForCreate {
            name: self.name.unwrap_or_default(),
            description: self.description,
            status: self
                .status
                .unwrap_or_else(|| DEFAULT_WALLET_TYPE_STATUS.to_string()),
            min_balance: self.min_balance.unwrap_or(DEFAULT_MIN_BALANCE),
            interest_rate: self.interest_rate.unwrap_or(DEFAULT_INTEREST_RATE),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateWalletTypeRequest {
    #[serde(default, deserialize_with = "blank_as_none")]
    #[validate(length(max = 255, message = "The name field must not be greater than 255 characters."))]
    pub name: Option<String>,

    #[serde(default, deserialize_with = "blank_as_none")]
    pub description: Option<String>,

    #[serde(default, deserialize_with = "blank_as_none")]
    #[validate(length(max = 50, message = "The status field must not be greater than 50 characters."))]
    pub status: Option<String>,

    #[validate(range(min = 0.0, message = "The min balance field must be at least 0."))]
    pub min_balance: Option<f64>,

    #[validate(range(min = 0.0, message = "The interest rate field must be at least 0."))]
    pub interest_rate: Option<f64>,
}

impl RequestRules for UpdateWalletTypeRequest {}

impl From<UpdateWalletTypeRequest> for WalletTypeForUpdate {
    fn from(req: UpdateWalletTypeRequest) -> Self {
        WalletTypeForUpdate {
            name: req.name,
            description: req.description,
            status: req.status,
            min_balance: req.min_balance,
            interest_rate: req.interest_rate,
        }
    }
}

/// `GET /wallet-types/search`. Unknown `sort` or `order` values fail to parse.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct WalletTypeSearchQuery {
    #[serde(default, deserialize_with = "blank_as_none")]
    pub query: Option<String>,

    #[serde(default, deserialize_with = "blank_as_none")]
    pub status: Option<String>,

    pub sort: Option<WalletTypeSort>,

    pub order: Option<SortDirection>,

    #[validate(range(min = 1, message = "The page field must be at least 1."))]
    pub page: Option<i64>,

    #[validate(range(min = 1, max = 100, message = "The per page field must be between 1 and 100."))]
    pub per_page: Option<i64>,
}

impl RequestRules for WalletTypeSearchQuery {}

impl WalletTypeSearchQuery {
    pub fn filter(&self) -> WalletTypeFilter {
        WalletTypeFilter {
            query: self.query.clone(),
            status: self.status.clone(),
        }
    }

    pub fn sort(&self) -> (WalletTypeSort, SortDirection) {
        (self.sort.unwrap_or_default(), self.order.unwrap_or_default())
    }

    pub fn page_request(&self) -> PageRequest {
        PageRequest::new(self.page, self.per_page, DEFAULT_PER_PAGE)
    }
}
