//! Paging envelopes returned by list endpoints.

use serde::{Deserialize, Serialize};

use super::Merchant;

/// Paging metadata of the transactions endpoint (zero-based `page`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationInfo {
    /// Zero-based page index.
    #[serde(default)]
    pub page: u32,
    /// Requested page size.
    #[serde(default)]
    pub size: u32,
    /// Number of pages available.
    #[serde(default)]
    pub total_pages: u32,
    /// Number of matching records.
    #[serde(default)]
    pub total_elements: u64,
}

/// One page of merchants (`GET /merchants`), normalized.
///
/// `current_page` is one-based. `total_count` is whatever the backend
/// reported; list controllers may correct it when a short page proves the
/// end was reached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MerchantPage {
    /// Merchants on this page.
    pub data: Vec<Merchant>,
    /// Backend-reported number of matching merchants.
    pub total_count: u64,
    /// Backend-reported number of pages.
    pub total_pages: u32,
    /// One-based page index.
    pub current_page: u32,
    /// Page size the backend applied.
    pub page_size: u32,
}

impl MerchantPage {
    /// Returns `true` when the page holds fewer rows than were requested.
    #[inline]
    #[must_use]
    pub fn is_short(&self, requested_size: u32) -> bool {
        u32::try_from(self.data.len()).map_or(false, |len| len < requested_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pagination_info_defaults_missing_fields() {
        let info: PaginationInfo = serde_json::from_str(r#"{"page":2,"size":10}"#).unwrap();
        assert_eq!(info.page, 2);
        assert_eq!(info.total_pages, 0);
        assert_eq!(info.total_elements, 0);
    }

    #[test]
    fn short_page_detection() {
        let page = MerchantPage {
            data: Vec::new(),
            total_count: 0,
            total_pages: 1,
            current_page: 1,
            page_size: 10,
        };
        assert!(page.is_short(10));
        assert!(!page.is_short(0));
    }
}
