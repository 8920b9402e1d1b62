//! Merchant list controller: debounced search, status filter, server-side
//! sort and pagination, refresh trigger.
//!
//! The controller holds request state and the last response. Every setter
//! only changes state; [`MerchantList::sync`] compares the resulting
//! request key with the last one issued and fetches when they differ. The
//! backend does all filtering, sorting and slicing; rows are never
//! re-ordered locally.

use core::ops::RangeInclusive;

use tokio::time::Instant;

use crate::debounce::Debounce;
use crate::models::{Merchant, MerchantPage, MerchantStatus, SortDirection, SortField};
use crate::query::MerchantQuery;
use crate::service::MerchantService;

/// Rows per page when the list opens.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Page sizes offered to the user.
pub const PAGE_SIZE_OPTIONS: [u32; 4] = [10, 20, 50, 100];

/// Error shown in place of the table when a fetch fails.
pub const LOAD_ERROR: &str = "Failed to load merchants. Please try again.";

/// Number of numbered page buttons shown at once.
const PAGE_WINDOW: u32 = 5;

/// Everything a fetch depends on. Two equal requests never both hit the
/// backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListRequest {
    /// Parent-supplied refresh counter.
    pub refresh_trigger: u64,
    /// Backend query.
    pub query: MerchantQuery,
}

/// State of the merchant list view.
#[derive(Debug)]
pub struct MerchantList {
    /// Text as typed.
    search_input: String,
    /// Debounced text used for fetching.
    search_query: String,
    /// Pending search text.
    debounce: Debounce<String>,
    /// Selected status, `None` for all.
    status_filter: Option<MerchantStatus>,
    /// Active sort column.
    sort_field: SortField,
    /// Active sort direction.
    sort_direction: SortDirection,
    /// One-based page.
    current_page: u32,
    /// Rows per page.
    page_size: u32,
    /// Last refresh counter seen from the parent.
    refresh_trigger: u64,
    /// Rows of the last successful fetch.
    merchants: Vec<Merchant>,
    /// Total after short-page correction.
    total_count: u64,
    /// A fetch is in flight.
    loading: bool,
    /// Sticky load error.
    error: Option<String>,
    /// Request behind the current rows or error.
    last_request: Option<ListRequest>,
}

impl Default for MerchantList {
    #[inline]
    fn default() -> Self {
        Self {
            search_input: String::new(),
            search_query: String::new(),
            debounce: Debounce::default(),
            status_filter: None,
            sort_field: SortField::default(),
            sort_direction: SortDirection::default(),
            current_page: 1,
            page_size: DEFAULT_PAGE_SIZE,
            refresh_trigger: 0,
            merchants: Vec::new(),
            total_count: 0,
            loading: false,
            error: None,
            last_request: None,
        }
    }
}

impl MerchantList {
    /// Creates a list on page 1, sorted by name ascending, no filters.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // ── Input ──────────────────────────────────────────────────────────

    /// Records a keystroke. The query follows once input pauses for the
    /// debounce delay.
    #[inline]
    pub fn set_search_input<T: Into<String>>(&mut self, text: T, now: Instant) {
        self.search_input = text.into();
        self.debounce.input(self.search_input.clone(), now);
    }

    /// Applies the pending search text if its delay has elapsed. Returns
    /// `true` when the query changed state.
    #[inline]
    pub fn tick(&mut self, now: Instant) -> bool {
        let Some(text) = self.debounce.fire(now) else {
            return false;
        };
        tracing::debug!(query = %text, "search input settled");
        self.search_query = text;
        self.current_page = 1;
        true
    }

    /// Sleeps until the pending search text is due, then applies it.
    /// Returns `false` immediately when nothing is pending.
    #[inline]
    pub async fn wait_for_search(&mut self) -> bool {
        let Some(deadline) = self.debounce.deadline() else {
            return false;
        };
        tokio::time::sleep_until(deadline).await;
        self.tick(Instant::now())
    }

    /// Sorts by `field`; the active column flips direction, a new column
    /// starts ascending. Always returns to page 1.
    #[inline]
    pub fn toggle_sort(&mut self, field: SortField) {
        if self.sort_field == field {
            self.sort_direction = self.sort_direction.toggled();
        } else {
            self.sort_field = field;
            self.sort_direction = SortDirection::Asc;
        }
        self.current_page = 1;
    }

    /// Sets column and direction directly and returns to page 1.
    #[inline]
    pub fn set_sort(&mut self, field: SortField, direction: SortDirection) {
        self.sort_field = field;
        self.sort_direction = direction;
        self.current_page = 1;
    }

    /// Filters by status (`None` for all) and returns to page 1.
    #[inline]
    pub fn set_status_filter(&mut self, status: Option<MerchantStatus>) {
        self.status_filter = status;
        self.current_page = 1;
    }

    /// Changes the page size and returns to page 1. Zero is ignored.
    #[inline]
    pub fn set_page_size(&mut self, size: u32) {
        if size == 0 {
            return;
        }
        if !PAGE_SIZE_OPTIONS.contains(&size) {
            tracing::debug!(size, "page size outside the offered options");
        }
        self.page_size = size;
        self.current_page = 1;
    }

    /// Moves to a page, clamped to the known page range.
    #[inline]
    pub fn go_to_page(&mut self, page: u32) {
        self.current_page = page.clamp(1, self.total_pages());
    }

    /// Sets the page the next fetch asks for without clamping, for opening
    /// the list on a given page before the page count is known. The backend
    /// answers a page past the end with no rows.
    #[inline]
    pub fn start_at_page(&mut self, page: u32) {
        self.current_page = page.max(1);
    }

    /// Moves to page 1.
    #[inline]
    pub fn first_page(&mut self) {
        self.go_to_page(1);
    }

    /// Moves back one page, if possible.
    #[inline]
    pub fn previous_page(&mut self) {
        self.go_to_page(self.current_page.saturating_sub(1));
    }

    /// Moves forward one page, if possible.
    #[inline]
    pub fn next_page(&mut self) {
        self.go_to_page(self.current_page.saturating_add(1));
    }

    /// Moves to the last known page.
    #[inline]
    pub fn last_page(&mut self) {
        self.go_to_page(self.total_pages());
    }

    /// Clears search and status filter and returns to page 1.
    #[inline]
    pub fn reset_filters(&mut self) {
        self.search_input.clear();
        self.search_query.clear();
        self.debounce.cancel();
        self.status_filter = None;
        self.current_page = 1;
    }

    /// Accepts the parent's refresh counter. A new positive value also
    /// clears search and filters so a just-saved merchant is visible.
    #[inline]
    pub fn set_refresh_trigger(&mut self, trigger: u64) {
        if trigger == self.refresh_trigger {
            return;
        }
        self.refresh_trigger = trigger;
        if trigger > 0 {
            tracing::debug!(trigger, "refresh requested, clearing filters");
            self.reset_filters();
        }
    }

    // ── Fetching ───────────────────────────────────────────────────────

    /// The request the current state maps to.
    #[inline]
    #[must_use]
    pub fn request(&self) -> ListRequest {
        let mut query = MerchantQuery::new()
            .page(self.current_page)
            .size(self.page_size)
            .search(self.search_query.clone())
            .sort(self.sort_field, self.sort_direction);
        query.status = self.status_filter;
        ListRequest {
            refresh_trigger: self.refresh_trigger,
            query,
        }
    }

    /// Returns `true` when state changed since the last issued request.
    #[inline]
    #[must_use]
    pub fn needs_fetch(&self) -> bool {
        self.last_request.as_ref() != Some(&self.request())
    }

    /// Fetches when the request key changed. Returns whether a fetch ran.
    #[inline]
    pub async fn sync<S: MerchantService>(&mut self, service: &S) -> bool {
        let request = self.request();
        if self.last_request.as_ref() == Some(&request) {
            return false;
        }
        self.fetch(service, request).await;
        true
    }

    /// Re-issues the last request with unchanged parameters.
    #[inline]
    pub async fn retry<S: MerchantService>(&mut self, service: &S) {
        let request = self.last_request.clone().unwrap_or_else(|| self.request());
        self.fetch(service, request).await;
    }

    /// Issues one request and stores its outcome.
    async fn fetch<S: MerchantService>(&mut self, service: &S, request: ListRequest) {
        self.loading = true;
        self.error = None;
        tracing::debug!(
            page = request.query.page,
            size = request.query.size,
            search = ?request.query.search,
            status = ?request.query.status,
            sort_field = %request.query.sort_field,
            sort_direction = %request.query.sort_direction,
            "fetching merchants"
        );
        match service.fetch_merchants(&request.query).await {
            Ok(page) => self.apply(page, &request.query),
            Err(err) => {
                tracing::warn!(error = %err, "failed to load merchants");
                self.error = Some(LOAD_ERROR.to_owned());
            }
        }
        self.last_request = Some(request);
        self.loading = false;
    }

    /// Stores a page, correcting the total when a short page proves the end
    /// was reached.
    fn apply(&mut self, page: MerchantPage, query: &MerchantQuery) {
        self.total_count = corrected_total(&page, query.page, query.size);
        self.merchants = page.data;
    }

    // ── View ───────────────────────────────────────────────────────────

    /// Rows of the last successful fetch, in backend order.
    #[inline]
    #[must_use]
    pub fn merchants(&self) -> &[Merchant] {
        &self.merchants
    }

    /// Total merchants after short-page correction.
    #[inline]
    #[must_use]
    pub const fn total_count(&self) -> u64 {
        self.total_count
    }

    /// `true` while a fetch is in flight.
    #[inline]
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.loading
    }

    /// Sticky load error, shown instead of the table.
    #[inline]
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Text as typed.
    #[inline]
    #[must_use]
    pub fn search_input(&self) -> &str {
        &self.search_input
    }

    /// Debounced text used for fetching.
    #[inline]
    #[must_use]
    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    /// Selected status filter.
    #[inline]
    #[must_use]
    pub const fn status_filter(&self) -> Option<MerchantStatus> {
        self.status_filter
    }

    /// Active sort column and direction.
    #[inline]
    #[must_use]
    pub const fn sort(&self) -> (SortField, SortDirection) {
        (self.sort_field, self.sort_direction)
    }

    /// Direction arrow for a column header, only on the active column.
    #[inline]
    #[must_use]
    pub fn sort_indicator(&self, field: SortField) -> Option<&'static str> {
        (self.sort_field == field).then_some(match self.sort_direction {
            SortDirection::Asc => "\u{2191}",
            SortDirection::Desc => "\u{2193}",
        })
    }

    /// One-based current page.
    #[inline]
    #[must_use]
    pub const fn current_page(&self) -> u32 {
        self.current_page
    }

    /// Rows per page.
    #[inline]
    #[must_use]
    pub const fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Last refresh counter seen.
    #[inline]
    #[must_use]
    pub const fn refresh_trigger(&self) -> u64 {
        self.refresh_trigger
    }

    /// `max(1, ceil(total / size))`.
    #[inline]
    #[must_use]
    pub fn total_pages(&self) -> u32 {
        let pages = self.total_count.div_ceil(u64::from(self.page_size.max(1)));
        u32::try_from(pages).unwrap_or(u32::MAX).max(1)
    }

    /// `true` when a previous page exists.
    #[inline]
    #[must_use]
    pub const fn has_previous(&self) -> bool {
        self.current_page > 1
    }

    /// `true` when a next page exists.
    #[inline]
    #[must_use]
    pub fn has_next(&self) -> bool {
        self.current_page < self.total_pages()
    }

    /// `Showing N of T merchants`, with ` (Page P of Q)` when there is more
    /// than one page. `None` when the page is empty.
    #[inline]
    #[must_use]
    pub fn summary_line(&self) -> Option<String> {
        if self.merchants.is_empty() {
            return None;
        }
        let shown = format!(
            "Showing {} of {} merchants",
            self.merchants.len(),
            self.total_count
        );
        let total_pages = self.total_pages();
        Some(if total_pages > 1 {
            format!("{shown} (Page {} of {total_pages})", self.current_page)
        } else {
            shown
        })
    }

    /// Numbered page buttons: up to five, centred on the current page and
    /// pinned at either end.
    #[inline]
    #[must_use]
    pub fn page_window(&self) -> RangeInclusive<u32> {
        let total = self.total_pages();
        let shown = total.min(PAGE_WINDOW);
        let first = if total <= PAGE_WINDOW || self.current_page <= 3 {
            1
        } else if self.current_page >= total.saturating_sub(2) {
            total.saturating_sub(PAGE_WINDOW - 1)
        } else {
            self.current_page.saturating_sub(2)
        };
        first..=first.saturating_add(shown.saturating_sub(1))
    }
}

/// The backend count is trusted for full pages; a short page is proof of
/// the last page, so its total is exact.
#[must_use]
pub(crate) fn corrected_total(page: &MerchantPage, requested_page: u32, requested_size: u32) -> u64 {
    if page.is_short(requested_size) {
        let before = u64::from(requested_page.saturating_sub(1)).saturating_mul(u64::from(requested_size));
        before.saturating_add(u64::try_from(page.data.len()).unwrap_or(u64::MAX))
    } else {
        page.total_count
    }
}
