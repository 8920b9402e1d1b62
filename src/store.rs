//! Per-resource state containers: cached results, loading and error flags,
//! and imperative operations that update them.
//!
//! Every operation clears the error first, records a human-readable error on
//! failure and still returns the underlying result so callers can react.

use core::fmt;

use crate::details::TRANSACTIONS_ERROR;
use crate::error::Result;
use crate::list::corrected_total;
use crate::models::{Merchant, MerchantFormData, MerchantId, MerchantTransactions};
use crate::page::{CREATED, CREATE_FAILED, DELETED, DELETE_FAILED, UPDATED, UPDATE_FAILED};
use crate::query::{MerchantQuery, TransactionQuery};
use crate::service::MerchantService;

/// Fallback when a list fetch fails.
pub const LOAD_MERCHANTS_FAILED: &str = "Failed to load merchants";
/// Fallback when a single-record fetch fails.
pub const LOAD_MERCHANT_FAILED: &str = "Failed to load merchant details";

/// Callback receiving a user-facing message.
pub type Listener = Box<dyn FnMut(&str) + Send>;

/// Merchant state shared by the pages.
#[derive(Default)]
pub struct MerchantStore {
    /// Rows of the last list fetch.
    merchants: Vec<Merchant>,
    /// Total after short-page correction.
    total_count: u64,
    /// An operation is in flight.
    loading: bool,
    /// Error of the last failed operation.
    error: Option<String>,
    /// Told about successful mutations.
    on_success: Option<Listener>,
    /// Told about failures.
    on_error: Option<Listener>,
}

impl fmt::Debug for MerchantStore {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MerchantStore")
            .field("merchants", &self.merchants.len())
            .field("total_count", &self.total_count)
            .field("loading", &self.loading)
            .field("error", &self.error)
            .field("on_success", &self.on_success.is_some())
            .field("on_error", &self.on_error.is_some())
            .finish()
    }
}

impl MerchantStore {
    /// Creates an empty store without listeners.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a listener for success messages.
    #[inline]
    #[must_use]
    pub fn on_success<F: FnMut(&str) + Send + 'static>(mut self, listener: F) -> Self {
        self.on_success = Some(Box::new(listener));
        self
    }

    /// Registers a listener for error messages.
    #[inline]
    #[must_use]
    pub fn on_error<F: FnMut(&str) + Send + 'static>(mut self, listener: F) -> Self {
        self.on_error = Some(Box::new(listener));
        self
    }

    /// Fetches one page (1-based) and caches it.
    ///
    /// # Errors
    ///
    /// Returns the backend error after recording it.
    #[inline]
    pub async fn fetch_merchants<S: MerchantService>(
        &mut self,
        service: &S,
        page: u32,
        limit: u32,
    ) -> Result<()> {
        let query = MerchantQuery::new().page(page).size(limit);
        self.begin();
        let outcome = service.fetch_merchants(&query).await;
        self.loading = false;
        let fetched = self.settle(outcome, LOAD_MERCHANTS_FAILED, None)?;
        self.total_count = corrected_total(&fetched, query.page, query.size);
        self.merchants = fetched.data;
        Ok(())
    }

    /// Fetches every merchant across all pages and caches them.
    ///
    /// # Errors
    ///
    /// Returns the backend error after recording it.
    #[inline]
    pub async fn fetch_all_merchants<S: MerchantService>(&mut self, service: &S) -> Result<()> {
        self.begin();
        let outcome = service.fetch_all_merchants().await;
        self.loading = false;
        let merchants = self.settle(outcome, LOAD_MERCHANTS_FAILED, None)?;
        self.total_count = u64::try_from(merchants.len()).unwrap_or(u64::MAX);
        self.merchants = merchants;
        Ok(())
    }

    /// Fetches one merchant. The cache is left alone.
    ///
    /// # Errors
    ///
    /// Returns the backend error after recording it.
    #[inline]
    pub async fn fetch_merchant<S: MerchantService>(
        &mut self,
        service: &S,
        id: &MerchantId,
    ) -> Result<Merchant> {
        self.begin();
        let outcome = service.fetch_merchant(id).await;
        self.loading = false;
        self.settle(outcome, LOAD_MERCHANT_FAILED, None)
    }

    /// Creates a merchant.
    ///
    /// # Errors
    ///
    /// Returns the backend error after recording it.
    #[inline]
    pub async fn add_merchant<S: MerchantService>(
        &mut self,
        service: &S,
        data: &MerchantFormData,
    ) -> Result<Merchant> {
        self.begin();
        let outcome = service.add_merchant(data).await;
        self.loading = false;
        self.settle(outcome, CREATE_FAILED, Some(CREATED))
    }

    /// Updates a merchant.
    ///
    /// # Errors
    ///
    /// Returns the backend error after recording it.
    #[inline]
    pub async fn update_merchant<S: MerchantService>(
        &mut self,
        service: &S,
        id: &MerchantId,
        data: &MerchantFormData,
    ) -> Result<Merchant> {
        self.begin();
        let outcome = service.update_merchant_by_id(id, data).await;
        self.loading = false;
        self.settle(outcome, UPDATE_FAILED, Some(UPDATED))
    }

    /// Deletes a merchant.
    ///
    /// # Errors
    ///
    /// Returns the backend error after recording it.
    #[inline]
    pub async fn remove_merchant<S: MerchantService>(&mut self, service: &S, id: &MerchantId) -> Result<()> {
        self.begin();
        let outcome = service.remove_merchant(id).await;
        self.loading = false;
        self.settle(outcome, DELETE_FAILED, Some(DELETED))
    }

    /// Cached rows.
    #[inline]
    #[must_use]
    pub fn merchants(&self) -> &[Merchant] {
        &self.merchants
    }

    /// Cached total.
    #[inline]
    #[must_use]
    pub const fn total_count(&self) -> u64 {
        self.total_count
    }

    /// `true` while an operation is in flight.
    #[inline]
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.loading
    }

    /// Error of the last failed operation.
    #[inline]
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Replaces or clears the error.
    #[inline]
    pub fn set_error(&mut self, error: Option<String>) {
        self.error = error;
    }

    /// Marks an operation as started.
    fn begin(&mut self) {
        self.loading = true;
        self.error = None;
    }

    /// Records the outcome and tells the listeners.
    fn settle<T>(&mut self, outcome: Result<T>, fallback: &str, success: Option<&str>) -> Result<T> {
        match outcome {
            Ok(value) => {
                if let Some(message) = success
                    && let Some(ref mut listener) = self.on_success
                {
                    listener(message);
                }
                Ok(value)
            }
            Err(err) => {
                let message = err.user_message(fallback);
                tracing::warn!(error = %err, "{fallback}");
                if let Some(ref mut listener) = self.on_error {
                    listener(&message);
                }
                self.error = Some(message);
                Err(err)
            }
        }
    }
}

/// Transaction dashboard state for one merchant.
#[derive(Debug, Default)]
pub struct TransactionStore {
    /// Last loaded page with its summary.
    data: Option<MerchantTransactions>,
    /// A load is in flight.
    loading: bool,
    /// Error of the last failed load.
    error: Option<String>,
}

impl TransactionStore {
    /// Creates an empty store.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a page of transactions. A failure keeps the previous data.
    ///
    /// # Errors
    ///
    /// Returns the backend error after recording it.
    #[inline]
    pub async fn load<S: MerchantService>(
        &mut self,
        service: &S,
        id: &MerchantId,
        query: &TransactionQuery,
    ) -> Result<()> {
        self.loading = true;
        self.error = None;
        let outcome = service.fetch_transactions(id, query).await;
        self.loading = false;
        match outcome {
            Ok(data) => {
                tracing::debug!(
                    merchant_id = %id,
                    rows = data.transactions.len(),
                    total = data.summary.total_transactions,
                    "loaded transaction dashboard"
                );
                self.data = Some(data);
                Ok(())
            }
            Err(err) => {
                tracing::warn!(merchant_id = %id, error = %err, "failed to load transactions");
                self.error = Some(err.user_message(TRANSACTIONS_ERROR));
                Err(err)
            }
        }
    }

    /// Last loaded page.
    #[inline]
    #[must_use]
    pub const fn data(&self) -> Option<&MerchantTransactions> {
        self.data.as_ref()
    }

    /// `true` while loading.
    #[inline]
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.loading
    }

    /// Error of the last failed load.
    #[inline]
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}
