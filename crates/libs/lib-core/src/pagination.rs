//! # Pagination
//!
//! Offset pagination shared by every list and search endpoint.
//!
//! ```rust
//! use lib_core::pagination::{Page, PageRequest};
//!
//! let req = PageRequest::new(Some(2), Some(2), 15);
//! assert_eq!(req.offset(), 2);
//!
//! let page = Page::new(vec!["c", "d"], 5, req);
//! assert_eq!(page.last_page, 3);
//! ```

use serde::{Deserialize, Serialize};

/// Largest page size a client may ask for.
pub const MAX_PER_PAGE: i64 = 100;

/// Resolved page number and size for one query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub per_page: i64,
}

impl PageRequest {
    /// Build from optional query parameters, falling back to `default_per_page`.
    ///
    /// Values are clamped into range; handlers reject out-of-range input before
    /// it gets here.
    pub fn new(page: Option<i64>, per_page: Option<i64>, default_per_page: i64) -> Self {
        Self {
            page: page.unwrap_or(1).max(1),
            per_page: per_page.unwrap_or(default_per_page).clamp(1, MAX_PER_PAGE),
        }
    }

    pub fn limit(&self) -> i64 {
        self.per_page
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.per_page)
    }
}

/// One page of results plus the metadata clients use to walk the set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub current_page: i64,
    pub last_page: i64,
    pub per_page: i64,
    pub total: i64,
}

impl<T> Page<T> {
    pub fn new(data: Vec<T>, total: i64, req: PageRequest) -> Self {
        let last_page = ((total + req.per_page - 1) / req.per_page).max(1);
        Self {
            data,
            current_page: req.page,
            last_page,
            per_page: req.per_page,
            total,
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            data: self.data.into_iter().map(f).collect(),
            current_page: self.current_page,
            last_page: self.last_page,
            per_page: self.per_page,
            total: self.total,
        }
    }
}

/// Sort direction accepted by search endpoints.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    pub fn as_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let req = PageRequest::new(None, None, 15);
        assert_eq!(req, PageRequest { page: 1, per_page: 15 });
        assert_eq!(req.offset(), 0);
    }

    #[test]
    fn test_clamping() {
        let req = PageRequest::new(Some(0), Some(1_000), 15);
        assert_eq!(req.page, 1);
        assert_eq!(req.per_page, MAX_PER_PAGE);
    }

    #[test]
    fn test_last_page() {
        let req = PageRequest::new(Some(1), Some(2), 15);
        assert_eq!(Page::<()>::new(vec![], 0, req).last_page, 1);
        assert_eq!(Page::<()>::new(vec![], 4, req).last_page, 2);
        assert_eq!(Page::<()>::new(vec![], 5, req).last_page, 3);
    }

    #[test]
    fn test_sort_direction_parses_lowercase() {
        let dir: SortDirection = serde_json::from_str("\"asc\"").unwrap();
        assert_eq!(dir.as_sql(), "ASC");
        assert!(serde_json::from_str::<SortDirection>("\"sideways\"").is_err());
    }
}
