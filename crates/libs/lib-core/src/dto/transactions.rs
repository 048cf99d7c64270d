//! # Transaction DTOs
//!
//! Transactions are stored as submitted: every field is optional on create and
//! the defaults below fill the gaps. Responses wrap the row as
//! `{"message": ..., "data": Transaction}`.

use super::{blank_as_none, RequestRules, DEFAULT_PER_PAGE};
use crate::error::FieldErrors;
use crate::model::store::models::{
    Transaction, TransactionFilter, TransactionForCreate, TransactionForUpdate, TransactionSort,
};
use crate::pagination::{PageRequest, SortDirection};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

pub const DEFAULT_TRANSACTION_TYPE: &str = "deposit";
pub const DEFAULT_TRANSACTION_STATUS: &str = "completed";
pub const DEFAULT_TRANSACTION_CURRENCY: &str = "NGN";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TransactionResponse {
    pub message: String,
    pub data: Transaction,
}

impl TransactionResponse {
    pub fn new(message: impl Into<String>, data: Transaction) -> Self {
        Self {
            message: message.into(),
            data,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct TransactionRequest {
    pub user_id: Option<i64>,

    pub wallet_id: Option<i64>,

    pub amount: Option<f64>,

    #[serde(rename = "type", default, deserialize_with = "blank_as_none")]
    #[validate(length(max = 50, message = "The type field must not be greater than 50 characters."))]
    pub kind: Option<String>,

    #[serde(default, deserialize_with = "blank_as_none")]
    #[validate(length(max = 50, message = "The status field must not be greater than 50 characters."))]
    pub status: Option<String>,

    #[serde(default, deserialize_with = "blank_as_none")]
    #[validate(length(max = 1000, message = "The description field must not be greater than 1000 characters."))]
    pub description: Option<String>,

    #[serde(default, deserialize_with = "blank_as_none")]
    #[validate(length(max = 10, message = "The currency field must not be greater than 10 characters."))]
    pub currency: Option<String>,
}

impl RequestRules for TransactionRequest {}

impl TransactionRequest {
    /// Fill defaults for a new row.
    pub fn into_model(self) -> TransactionForCreate {
        TransactionForCreate {
            user_id: self.user_id,
            wallet_id: self.wallet_id,
            amount: self.amount.unwrap_or_default(),
            kind: self
                .kind
                .unwrap_or_else(|| DEFAULT_TRANSACTION_TYPE.to_string()),
            status: self
                .status
                .unwrap_or_else(|| DEFAULT_TRANSACTION_STATUS.to_string()),
            description: self.description,
            currency: self
                .currency
                .unwrap_or_else(|| DEFAULT_TRANSACTION_CURRENCY.to_string()),
        }
    }
}

impl From<TransactionRequest> for TransactionForUpdate {
    fn from(req: TransactionRequest) -> Self {
        TransactionForUpdate {
            user_id: req.user_id,
            wallet_id: req.wallet_id,
            amount: req.amount,
            kind: req.kind,
            status: req.status,
            description: req.description,
            currency: req.currency,
        }
    }
}

/// `GET /transactions/search`. Each filter applies only when present.
///
/// Dates are `YYYY-MM-DD`; malformed dates and unknown sort values fail to parse.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct TransactionSearchQuery {
    pub id: Option<i64>,

    pub min_amount: Option<f64>,

    pub max_amount: Option<f64>,

    pub start_date: Option<NaiveDate>,

    pub end_date: Option<NaiveDate>,

    #[serde(default, deserialize_with = "blank_as_none")]
    pub status: Option<String>,

    #[serde(rename = "type", default, deserialize_with = "blank_as_none")]
    pub kind: Option<String>,

    #[serde(default, deserialize_with = "blank_as_none")]
    pub description: Option<String>,

    pub sort_by: Option<TransactionSort>,

    pub sort_order: Option<SortDirection>,

    #[validate(range(min = 1, message = "The page field must be at least 1."))]
    pub page: Option<i64>,

    #[validate(range(min = 1, max = 100, message = "The per page field must be between 1 and 100."))]
    pub per_page: Option<i64>,
}

impl RequestRules for TransactionSearchQuery {
    fn extra_rules(&self, errors: &mut FieldErrors) {
        if let (Some(start), Some(end)) = (self.start_date, self.end_date) {
            if end < start {
                errors.add(
                    "end_date",
                    "The end date field must be a date after or equal to start date.",
                );
            }
        }
    }
}

impl TransactionSearchQuery {
    pub fn filter(&self) -> TransactionFilter {
        TransactionFilter {
            id: self.id,
            min_amount: self.min_amount,
            max_amount: self.max_amount,
            start_date: self.start_date,
            end_date: self.end_date,
            status: self.status.clone(),
            kind: self.kind.clone(),
            description: self.description.clone(),
        }
    }

    pub fn sort(&self) -> (TransactionSort, SortDirection) {
        (self.sort_by.unwrap_or_default(), self.sort_order.unwrap_or_default())
    }

    pub fn page_request(&self) -> PageRequest {
        PageRequest::new(self.page, self.per_page, DEFAULT_PER_PAGE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_body_gets_defaults() {
        let request: TransactionRequest = serde_json::from_str("{}").unwrap();
        assert!(request.field_errors().is_empty());

        let model = request.into_model();
        assert_eq!(model.amount, 0.0);
        assert_eq!(model.kind, "deposit");
        assert_eq!(model.status, "completed");
        assert_eq!(model.currency, "NGN");
    }

    #[test]
    fn test_type_key_maps_to_kind() {
        let request: TransactionRequest =
            serde_json::from_str(r#"{"type": "withdrawal", "amount": 20}"#).unwrap();
        let update = TransactionForUpdate::from(request);

        assert_eq!(update.kind.as_deref(), Some("withdrawal"));
        assert_eq!(update.amount, Some(20.0));
        assert_eq!(update.status, None);
    }

    #[test]
    fn test_search_parses_dates_and_sort() {
        let query: TransactionSearchQuery = serde_json::from_str(
            r#"{"start_date": "2024-01-01", "end_date": "2024-01-31", "sort_by": "amount", "sort_order": "asc"}"#,
        )
        .unwrap();

        assert!(query.field_errors().is_empty());
        assert_eq!(query.sort(), (TransactionSort::Amount, SortDirection::Asc));
        assert_eq!(query.filter().start_date, NaiveDate::from_ymd_opt(2024, 1, 1));
    }

    #[test]
    fn test_search_rejects_malformed_input() {
        assert!(serde_json::from_str::<TransactionSearchQuery>(r#"{"start_date": "01/02/2024"}"#).is_err());
        assert!(serde_json::from_str::<TransactionSearchQuery>(r#"{"sort_by": "password"}"#).is_err());
    }

    #[test]
    fn test_search_end_before_start() {
        let query: TransactionSearchQuery =
            serde_json::from_str(r#"{"start_date": "2024-02-01", "end_date": "2024-01-01"}"#).unwrap();
        assert!(query.field_errors().get("end_date").is_some());
    }
}
