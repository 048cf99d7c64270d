//! # Data Transfer Objects (DTOs)
//!
//! Request bodies, query strings and response envelopes for the REST API.
//!
//! Request structs derive [`validator::Validate`] with one rule set per endpoint.
//! String inputs are trimmed on the way in and blank strings count as absent,
//! so a `required` rule rejects `""` the same way it rejects a missing key.

pub mod transactions;
pub mod users;
pub mod wallet_types;
pub mod wallets;

pub use transactions::*;
pub use users::*;
pub use wallet_types::*;
pub use wallets::*;

use crate::error::FieldErrors;
use crate::pagination::PageRequest;
use serde::{Deserialize, Deserializer, Serialize};
use validator::Validate;

/// Default page size for list and search endpoints.
pub const DEFAULT_PER_PAGE: i64 = 15;

/// Deserialize an optional string, trimming it and mapping blank to `None`.
pub fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty()))
}

/// Like [`blank_as_none`] but without trimming, for passwords.
pub fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.is_empty()))
}

/// Full rule set of one request type: the derive rules plus cross-field checks
/// the derive cannot express.
pub trait RequestRules: Validate {
    fn extra_rules(&self, _errors: &mut FieldErrors) {}

    fn field_errors(&self) -> FieldErrors {
        let mut errors = self.validate().map_err(FieldErrors::from).err().unwrap_or_default();
        self.extra_rules(&mut errors);
        errors
    }
}

/// Add the `confirmed` failure for `field` when `confirmation` differs from `value`.
pub(crate) fn check_confirmed(
    errors: &mut FieldErrors,
    field: &str,
    value: Option<&str>,
    confirmation: Option<&str>,
) {
    if value.is_some() && value != confirmation {
        errors.add(
            field,
            format!("The {} field confirmation does not match.", field.replace('_', " ")),
        );
    }
}

/// `?page=&per_page=` on plain list endpoints.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct PageQuery {
    #[validate(range(min = 1, message = "The page field must be at least 1."))]
    pub page: Option<i64>,
    #[validate(range(min = 1, max = 100, message = "The per page field must be between 1 and 100."))]
    pub per_page: Option<i64>,
}

impl RequestRules for PageQuery {}

impl PageQuery {
    pub fn page_request(&self) -> PageRequest {
        PageRequest::new(self.page, self.per_page, DEFAULT_PER_PAGE)
    }
}

/// Body of every response that only carries a message.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize)]
    struct Probe {
        #[serde(default, deserialize_with = "blank_as_none")]
        name: Option<String>,
    }

    #[test]
    fn test_blank_as_none() {
        let probe: Probe = serde_json::from_str(r#"{"name": "  Ada  "}"#).unwrap();
        assert_eq!(probe.name.as_deref(), Some("Ada"));

        let probe: Probe = serde_json::from_str(r#"{"name": "   "}"#).unwrap();
        assert_eq!(probe.name, None);

        let probe: Probe = serde_json::from_str(r#"{"name": null}"#).unwrap();
        assert_eq!(probe.name, None);

        let probe: Probe = serde_json::from_str("{}").unwrap();
        assert_eq!(probe.name, None);
    }

    #[test]
    fn test_page_query_bounds() {
        let ok = PageQuery {
            page: Some(2),
            per_page: Some(100),
        };
        assert!(ok.validate().is_ok());
        assert_eq!(ok.page_request(), PageRequest::new(Some(2), Some(100), 15));

        let bad = PageQuery {
            page: Some(0),
            per_page: Some(101),
        };
        let errors = bad.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("page"));
        assert!(errors.field_errors().contains_key("per_page"));
    }

    #[test]
    fn test_check_confirmed() {
        let mut errors = FieldErrors::new();
        check_confirmed(&mut errors, "new_password", Some("abc"), Some("abc"));
        check_confirmed(&mut errors, "password", None, None);
        assert!(errors.is_empty());

        check_confirmed(&mut errors, "new_password", Some("abc"), None);
        assert_eq!(
            errors.get("new_password").unwrap()[0],
            "The new password field confirmation does not match."
        );
    }

    #[test]
    fn test_default_page_query() {
        let req = PageQuery::default().page_request();
        assert_eq!(req.page, 1);
        assert_eq!(req.per_page, DEFAULT_PER_PAGE);
    }
}
