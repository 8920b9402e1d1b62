//! Typed request parameters for the list endpoints.
//!
//! Both builders render to ordered `(name, value)` pairs which the HTTP
//! clients append to the request URL. Optional criteria are omitted when
//! unset or blank, so the backend applies its own defaults.

use chrono::NaiveDate;

use crate::models::{MerchantStatus, SortDirection, SortField, TransactionStatus};

/// Default merchant page size used by the service layer.
pub const DEFAULT_MERCHANT_PAGE_SIZE: u32 = 20;

/// Default transaction page size.
pub const DEFAULT_TRANSACTION_PAGE_SIZE: u32 = 10;

/// Parameters of `GET /merchants`.
///
/// `page` is one-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MerchantQuery {
    /// One-based page index.
    pub page: u32,
    /// Rows per page (`size` on the wire).
    pub size: u32,
    /// Free-text search over name, email and id.
    pub search: Option<String>,
    /// Status filter.
    pub status: Option<MerchantStatus>,
    /// Sort column.
    pub sort_field: SortField,
    /// Sort direction.
    pub sort_direction: SortDirection,
}

impl Default for MerchantQuery {
    #[inline]
    fn default() -> Self {
        Self {
            page: 1,
            size: DEFAULT_MERCHANT_PAGE_SIZE,
            search: None,
            status: None,
            sort_field: SortField::default(),
            sort_direction: SortDirection::default(),
        }
    }
}

impl MerchantQuery {
    /// Creates a query for the first page with default size and sort.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Selects a page. Zero is treated as the first page.
    #[inline]
    #[must_use]
    pub const fn page(mut self, page: u32) -> Self {
        self.page = if page == 0 { 1 } else { page };
        self
    }

    /// Sets the page size. Zero falls back to the default.
    #[inline]
    #[must_use]
    pub const fn size(mut self, size: u32) -> Self {
        self.size = if size == 0 {
            DEFAULT_MERCHANT_PAGE_SIZE
        } else {
            size
        };
        self
    }

    /// Restricts to merchants matching the text; blank text clears it.
    #[inline]
    #[must_use]
    pub fn search<T: Into<String>>(mut self, text: T) -> Self {
        let owned: String = text.into();
        self.search = (!owned.trim().is_empty()).then_some(owned);
        self
    }

    /// Restricts to merchants with the given status.
    #[inline]
    #[must_use]
    pub const fn status(mut self, status: MerchantStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Sets the sort column and direction.
    #[inline]
    #[must_use]
    pub const fn sort(mut self, field: SortField, direction: SortDirection) -> Self {
        self.sort_field = field;
        self.sort_direction = direction;
        self
    }

    /// Renders the query-string pairs in wire order.
    #[inline]
    #[must_use]
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![("page", self.page.to_string()), ("size", self.size.to_string())];
        if let Some(search) = self.search.as_deref().filter(|text| !text.trim().is_empty()) {
            pairs.push(("search", search.to_owned()));
        }
        if let Some(status) = self.status {
            pairs.push(("status", status.as_str().to_owned()));
        }
        pairs.push(("sortField", self.sort_field.as_str().to_owned()));
        pairs.push(("sortDirection", self.sort_direction.as_str().to_owned()));
        pairs
    }
}

/// Parameters of `GET /merchants/{id}/transactions`.
///
/// `page` is zero-based, matching the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionQuery {
    /// Zero-based page index.
    pub page: u32,
    /// Rows per page.
    pub size: u32,
    /// Inclusive start date.
    pub start_date: Option<NaiveDate>,
    /// Inclusive end date.
    pub end_date: Option<NaiveDate>,
    /// Status filter.
    pub status: Option<TransactionStatus>,
}

impl Default for TransactionQuery {
    #[inline]
    fn default() -> Self {
        Self {
            page: 0,
            size: DEFAULT_TRANSACTION_PAGE_SIZE,
            start_date: None,
            end_date: None,
            status: None,
        }
    }
}

impl TransactionQuery {
    /// Creates a query for the first page with the default size.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Selects a zero-based page.
    #[inline]
    #[must_use]
    pub const fn page(mut self, page: u32) -> Self {
        self.page = page;
        self
    }

    /// Sets the page size.
    #[inline]
    #[must_use]
    pub const fn size(mut self, size: u32) -> Self {
        self.size = size;
        self
    }

    /// Restricts to transactions within the given dates (inclusive).
    #[inline]
    #[must_use]
    pub const fn date_range(mut self, from: NaiveDate, to: NaiveDate) -> Self {
        self.start_date = Some(from);
        self.end_date = Some(to);
        self
    }

    /// Restricts to transactions with the given status.
    #[inline]
    #[must_use]
    pub const fn status(mut self, status: TransactionStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Renders the query-string pairs in wire order.
    #[inline]
    #[must_use]
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![("page", self.page.to_string()), ("size", self.size.to_string())];
        if let Some(start) = self.start_date {
            pairs.push(("startDate", start.format("%Y-%m-%d").to_string()));
        }
        if let Some(end) = self.end_date {
            pairs.push(("endDate", end.format("%Y-%m-%d").to_string()));
        }
        if let Some(status) = self.status {
            pairs.push(("status", status.as_str().to_owned()));
        }
        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_merchant_query_pairs() {
        let pairs = MerchantQuery::new().to_pairs();
        assert_eq!(
            pairs,
            vec![
                ("page", "1".to_owned()),
                ("size", "20".to_owned()),
                ("sortField", "name".to_owned()),
                ("sortDirection", "asc".to_owned()),
            ]
        );
    }

    #[test]
    fn merchant_query_with_all_criteria() {
        let pairs = MerchantQuery::new()
            .page(3)
            .size(50)
            .search("acme")
            .status(MerchantStatus::Inactive)
            .sort(SortField::CreatedAt, SortDirection::Desc)
            .to_pairs();
        assert!(pairs.contains(&("page", "3".to_owned())));
        assert!(pairs.contains(&("size", "50".to_owned())));
        assert!(pairs.contains(&("search", "acme".to_owned())));
        assert!(pairs.contains(&("status", "inactive".to_owned())));
        assert!(pairs.contains(&("sortField", "createdAt".to_owned())));
        assert!(pairs.contains(&("sortDirection", "desc".to_owned())));
    }

    #[test]
    fn blank_search_is_omitted() {
        let query = MerchantQuery::new().search("   ");
        assert!(query.search.is_none());
        assert!(!query.to_pairs().iter().any(|&(name, _)| name == "search"));
    }

    #[test]
    fn zero_page_and_size_fall_back() {
        let query = MerchantQuery::new().page(0).size(0);
        assert_eq!(query.page, 1);
        assert_eq!(query.size, DEFAULT_MERCHANT_PAGE_SIZE);
    }

    #[test]
    fn transaction_query_pairs() {
        let from = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let to = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
        let pairs = TransactionQuery::new()
            .page(2)
            .size(100)
            .date_range(from, to)
            .status(TransactionStatus::Failed)
            .to_pairs();
        assert_eq!(
            pairs,
            vec![
                ("page", "2".to_owned()),
                ("size", "100".to_owned()),
                ("startDate", "2024-01-01".to_owned()),
                ("endDate", "2024-01-31".to_owned()),
                ("status", "failed".to_owned()),
            ]
        );
    }

    #[test]
    fn default_transaction_query_is_first_page() {
        let query = TransactionQuery::default();
        assert_eq!(query.page, 0);
        assert_eq!(query.size, DEFAULT_TRANSACTION_PAGE_SIZE);
        assert_eq!(query.to_pairs().len(), 2);
    }
}
