//! In-memory merchant backend for testing.
//!
//! Provides [`InMemoryService`], a thread-safe in-memory implementation of
//! the service traits. It applies search, status filtering, sorting and
//! paging the way the real backend does, so controllers can be exercised
//! without a server. Tests can also inject failures, override the reported
//! total, and inspect how often each operation was called.

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::Utc;

#[cfg(feature = "async")]
use core::future::{self, Future};

use crate::error::{DashboardError, Result};
use crate::models::{
    Merchant, MerchantFormData, MerchantId, MerchantPage, MerchantTransactions, PaginationInfo,
    SortDirection, SortField, StatusCounts, Transaction, TransactionSummary,
};
use crate::models::wire::DEFAULT_CURRENCY;
use crate::query::{MerchantQuery, TransactionQuery};

/// Prefix of generated merchant IDs.
const ID_PREFIX: &str = "MCH-";

/// Backend operations that can be counted or made to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// `GET /merchants`.
    ListMerchants,
    /// `GET /merchants/{id}`.
    GetMerchant,
    /// `POST /merchants`.
    CreateMerchant,
    /// `PUT /merchants/{id}`.
    UpdateMerchant,
    /// `DELETE /merchants/{id}`.
    DeleteMerchant,
    /// `GET /merchants/{id}/transactions`.
    ListTransactions,
}

/// Thread-safe in-memory merchant backend.
///
/// This type implements both [`super::MerchantService`] (async) and
/// [`super::BlockingMerchantService`] (blocking).
///
/// # Example
///
/// ```rust
/// use merchant_dashboard::models::MerchantFormData;
/// use merchant_dashboard::service::InMemoryService;
///
/// let service = InMemoryService::new();
/// let created = service
///     .insert(MerchantFormData {
///         name: "Acme".to_owned(),
///         email: "ops@acme.test".to_owned(),
///         phone: "555-0100".to_owned(),
///         ..MerchantFormData::default()
///     })
///     .unwrap();
/// assert_eq!(created.id.unwrap().as_str(), "MCH-00001");
/// ```
#[derive(Debug, Default)]
pub struct InMemoryService {
    /// All state behind a single mutex for thread-safe interior mutability.
    inner: Mutex<Inner>,
}

/// Inner mutable state.
#[derive(Debug, Default)]
struct Inner {
    /// Stored merchants in insertion order.
    merchants: Vec<Merchant>,
    /// Transactions per merchant.
    transactions: HashMap<MerchantId, Vec<Transaction>>,
    /// Invocation counters.
    calls: HashMap<Operation, usize>,
    /// Operations that currently fail, with the message they fail with.
    failures: HashMap<Operation, String>,
    /// Total count reported instead of the real one.
    reported_total: Option<u64>,
    /// Every merchant query received, oldest first.
    merchant_queries: Vec<MerchantQuery>,
}

impl InMemoryService {
    /// Creates a new empty backend.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a backend pre-populated with the given drafts.
    ///
    /// # Errors
    ///
    /// Returns an error if two drafts share an email.
    #[inline]
    pub fn with_merchants<I>(drafts: I) -> Result<Self>
    where
        I: IntoIterator<Item = MerchantFormData>,
    {
        let service = Self::new();
        for draft in drafts {
            let _created = service.insert(draft)?;
        }
        Ok(service)
    }

    /// Stores a new merchant without counting it as a backend call.
    ///
    /// # Errors
    ///
    /// Returns an error if the email is already registered.
    #[inline]
    pub fn insert(&self, draft: MerchantFormData) -> Result<Merchant> {
        self.with_lock(|inner| inner.create(draft))?
    }

    /// Attaches transactions to a merchant, replacing any existing ones.
    ///
    /// # Errors
    ///
    /// Returns an error if the lock is poisoned.
    #[inline]
    pub fn set_transactions(&self, id: &MerchantId, transactions: Vec<Transaction>) -> Result<()> {
        self.with_lock(|inner| {
            let _old = inner.transactions.insert(id.clone(), transactions);
        })
    }

    /// Makes every subsequent call of `operation` fail with an HTTP 500
    /// carrying `message`, until [`Self::recover`] is called.
    ///
    /// # Errors
    ///
    /// Returns an error if the lock is poisoned.
    #[inline]
    pub fn fail<T: Into<String>>(&self, operation: Operation, message: T) -> Result<()> {
        let text: String = message.into();
        self.with_lock(|inner| {
            let _old = inner.failures.insert(operation, text);
        })
    }

    /// Clears an injected failure.
    ///
    /// # Errors
    ///
    /// Returns an error if the lock is poisoned.
    #[inline]
    pub fn recover(&self, operation: Operation) -> Result<()> {
        self.with_lock(|inner| {
            let _old = inner.failures.remove(&operation);
        })
    }

    /// Overrides the `totalCount` reported by list responses, emulating a
    /// backend whose count is lossy.
    ///
    /// # Errors
    ///
    /// Returns an error if the lock is poisoned.
    #[inline]
    pub fn report_total(&self, total: Option<u64>) -> Result<()> {
        self.with_lock(|inner| inner.reported_total = total)
    }

    /// Returns how many times `operation` was invoked.
    ///
    /// # Errors
    ///
    /// Returns an error if the lock is poisoned.
    #[inline]
    pub fn call_count(&self, operation: Operation) -> Result<usize> {
        self.with_lock(|inner| inner.calls.get(&operation).copied().unwrap_or_default())
    }

    /// Returns every merchant list query received, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the lock is poisoned.
    #[inline]
    pub fn merchant_queries(&self) -> Result<Vec<MerchantQuery>> {
        self.with_lock(|inner| inner.merchant_queries.clone())
    }

    /// Returns a snapshot of all stored merchants.
    ///
    /// # Errors
    ///
    /// Returns an error if the lock is poisoned.
    #[inline]
    pub fn merchants(&self) -> Result<Vec<Merchant>> {
        self.with_lock(|inner| inner.merchants.clone())
    }

    /// Acquires the inner lock and applies a closure.
    fn with_lock<R>(&self, f: impl FnOnce(&mut Inner) -> R) -> Result<R> {
        let mut inner = self.inner.lock().map_err(|err| lock_error(&err))?;
        Ok(f(&mut inner))
    }

    /// Counts the call, honours injected failures, then runs `f`.
    fn call<R>(&self, operation: Operation, f: impl FnOnce(&mut Inner) -> Result<R>) -> Result<R> {
        self.with_lock(|inner| {
            let count = inner.calls.entry(operation).or_default();
            *count = count.saturating_add(1);
            if let Some(message) = inner.failures.get(&operation) {
                tracing::debug!(?operation, "injected failure");
                return Err(DashboardError::Api {
                    status: 500,
                    message: message.clone(),
                });
            }
            f(inner)
        })?
    }

    /// Backend behavior of `fetch_merchants`.
    fn list(&self, query: &MerchantQuery) -> Result<MerchantPage> {
        self.call(Operation::ListMerchants, |inner| {
            inner.merchant_queries.push(query.clone());
            Ok(inner.page(query))
        })
    }

    /// Backend behavior of `fetch_all_merchants`.
    fn list_all(&self) -> Result<Vec<Merchant>> {
        self.call(Operation::ListMerchants, |inner| Ok(inner.merchants.clone()))
    }

    /// Backend behavior of `fetch_merchant`.
    fn get(&self, id: &MerchantId) -> Result<Merchant> {
        self.call(Operation::GetMerchant, |inner| {
            inner.position(id).map(|index| inner.merchants.get(index).cloned())?.ok_or_else(|| not_found(id))
        })
    }

    /// Backend behavior of `add_merchant`.
    fn create(&self, data: &MerchantFormData) -> Result<Merchant> {
        self.call(Operation::CreateMerchant, |inner| inner.create(data.clone()))
    }

    /// Backend behavior of `update_merchant_by_id`.
    fn update(&self, id: &MerchantId, data: &MerchantFormData) -> Result<Merchant> {
        self.call(Operation::UpdateMerchant, |inner| inner.update(id, data))
    }

    /// Backend behavior of `remove_merchant`.
    fn delete(&self, id: &MerchantId) -> Result<()> {
        self.call(Operation::DeleteMerchant, |inner| {
            let index = inner.position(id)?;
            let _removed = inner.merchants.remove(index);
            let _history = inner.transactions.remove(id);
            Ok(())
        })
    }

    /// Backend behavior of `fetch_transactions`.
    fn transactions(&self, id: &MerchantId, query: &TransactionQuery) -> Result<MerchantTransactions> {
        self.call(Operation::ListTransactions, |inner| {
            let _exists = inner.position(id)?;
            let history = inner.transactions.get(id).map_or(&[][..], Vec::as_slice);
            Ok(transactions_page(id, history, query))
        })
    }
}

impl Inner {
    /// Index of a merchant, or a 404.
    fn position(&self, id: &MerchantId) -> Result<usize> {
        self.merchants
            .iter()
            .position(|merchant| merchant.id.as_ref() == Some(id))
            .ok_or_else(|| not_found(id))
    }

    /// Rejects an email already used by another merchant.
    fn ensure_unique_email(&self, email: &str, except: Option<&MerchantId>) -> Result<()> {
        let taken = self.merchants.iter().any(|merchant| {
            merchant.email.eq_ignore_ascii_case(email) && merchant.id.as_ref() != except
        });
        if taken {
            return Err(DashboardError::Api {
                status: 400,
                message: format!("Merchant with email {email} already exists"),
            });
        }
        Ok(())
    }

    /// Next free `MCH-nnnnn` identifier.
    fn next_id(&self) -> MerchantId {
        let max = self
            .merchants
            .iter()
            .filter_map(|merchant| merchant.id.as_ref())
            .filter_map(|id| id.as_str().strip_prefix(ID_PREFIX))
            .filter_map(|digits| digits.parse::<u64>().ok())
            .max()
            .unwrap_or_default();
        MerchantId::new(format!("{ID_PREFIX}{:05}", max.saturating_add(1)))
    }

    /// Stores a draft as a new merchant.
    fn create(&mut self, draft: MerchantFormData) -> Result<Merchant> {
        self.ensure_unique_email(&draft.email, None)?;
        let now = Utc::now();
        let mut merchant = Merchant::from_draft(draft);
        merchant.id = Some(self.next_id());
        merchant.created_at = Some(now);
        merchant.updated_at = Some(now);
        tracing::debug!(merchant_id = ?merchant.id, "stored merchant");
        self.merchants.push(merchant.clone());
        Ok(merchant)
    }

    /// Applies a draft to an existing merchant.
    fn update(&mut self, id: &MerchantId, data: &MerchantFormData) -> Result<Merchant> {
        let index = self.position(id)?;
        self.ensure_unique_email(&data.email, Some(id))?;
        let stored = self.merchants.get_mut(index).ok_or_else(|| not_found(id))?;
        let created_at = stored.created_at;
        *stored = Merchant::from_draft(data.clone());
        stored.id = Some(id.clone());
        stored.created_at = created_at;
        stored.updated_at = Some(Utc::now());
        Ok(stored.clone())
    }

    /// Filters, sorts and slices merchants for a list query.
    fn page(&self, query: &MerchantQuery) -> MerchantPage {
        let needle = query.search.as_deref().map(|text| text.trim().to_lowercase());
        let mut matching: Vec<&Merchant> = self
            .merchants
            .iter()
            .filter(|merchant| query.status.is_none_or(|status| merchant.status == status))
            .filter(|merchant| needle.as_deref().is_none_or(|text| matches_search(merchant, text)))
            .collect();
        matching.sort_by(|left, right| {
            let ordering = compare(left, right, query.sort_field);
            match query.sort_direction {
                SortDirection::Asc => ordering,
                SortDirection::Desc => ordering.reverse(),
            }
        });

        let size = usize::try_from(query.size).unwrap_or(usize::MAX).max(1);
        let skip = usize::try_from(query.page.saturating_sub(1))
            .unwrap_or(usize::MAX)
            .saturating_mul(size);
        let data: Vec<Merchant> = matching.iter().skip(skip).take(size).map(|&merchant| merchant.clone()).collect();
        let total_count = self
            .reported_total
            .unwrap_or_else(|| u64::try_from(matching.len()).unwrap_or(u64::MAX));
        let total_pages = u32::try_from(total_count.div_ceil(u64::from(query.size.max(1))))
            .unwrap_or(u32::MAX);

        MerchantPage {
            data,
            total_count,
            total_pages,
            current_page: query.page,
            page_size: query.size,
        }
    }
}

/// Case-insensitive match over name, email and id.
fn matches_search(merchant: &Merchant, needle: &str) -> bool {
    merchant.name.to_lowercase().contains(needle)
        || merchant.email.to_lowercase().contains(needle)
        || merchant
            .id
            .as_ref()
            .is_some_and(|id| id.as_str().to_lowercase().contains(needle))
}

/// Orders two merchants by one column, ascending.
fn compare(left: &Merchant, right: &Merchant, field: SortField) -> core::cmp::Ordering {
    match field {
        SortField::Name => left.name.to_lowercase().cmp(&right.name.to_lowercase()),
        SortField::Email => left.email.to_lowercase().cmp(&right.email.to_lowercase()),
        SortField::Status => left.status.as_str().cmp(right.status.as_str()),
        SortField::CreatedAt => left.created_at.cmp(&right.created_at),
        SortField::UpdatedAt => left.updated_at.cmp(&right.updated_at),
    }
}

/// Filters a merchant's history and builds one zero-based page plus the
/// summary over every matching transaction.
fn transactions_page(
    id: &MerchantId,
    history: &[Transaction],
    query: &TransactionQuery,
) -> MerchantTransactions {
    let mut matching: Vec<&Transaction> = history
        .iter()
        .filter(|txn| query.status.is_none_or(|status| txn.status == status))
        .filter(|txn| query.start_date.is_none_or(|start| txn.timestamp.date_naive() >= start))
        .filter(|txn| query.end_date.is_none_or(|end| txn.timestamp.date_naive() <= end))
        .collect();
    matching.sort_by(|left, right| right.timestamp.cmp(&left.timestamp));

    let mut by_status = StatusCounts::default();
    let mut total_amount = 0.0_f64;
    for txn in &matching {
        by_status.bump(txn.status);
        total_amount += txn.amount;
    }
    let currency = matching
        .first()
        .map_or_else(|| DEFAULT_CURRENCY.to_owned(), |txn| txn.currency.clone());

    let size = usize::try_from(query.size).unwrap_or(usize::MAX).max(1);
    let skip = usize::try_from(query.page)
        .unwrap_or(usize::MAX)
        .saturating_mul(size);
    let total_elements = u64::try_from(matching.len()).unwrap_or(u64::MAX);
    let total_pages = u32::try_from(total_elements.div_ceil(u64::from(query.size.max(1))))
        .unwrap_or(u32::MAX);

    MerchantTransactions {
        merchant_id: id.clone(),
        date_range: None,
        summary: TransactionSummary {
            total_transactions: total_elements,
            total_amount,
            currency,
            by_status,
        },
        transactions: matching.iter().skip(skip).take(size).map(|&txn| txn.clone()).collect(),
        pagination: PaginationInfo {
            page: query.page,
            size: query.size,
            total_pages,
            total_elements,
        },
    }
}

/// The backend's 404 for an unknown merchant.
fn not_found(id: &MerchantId) -> DashboardError {
    DashboardError::Api {
        status: 404,
        message: format!("Merchant not found with ID: {id}"),
    }
}

/// Wraps a mutex poison error.
fn lock_error<T>(err: &std::sync::PoisonError<T>) -> DashboardError {
    DashboardError::Backend(err.to_string().into())
}

// ── BlockingMerchantService implementation ──────────────────────────────

#[cfg(feature = "blocking")]
impl super::BlockingMerchantService for InMemoryService {
    #[inline]
    fn fetch_merchants(&self, query: &MerchantQuery) -> Result<MerchantPage> {
        self.list(query)
    }

    #[inline]
    fn fetch_all_merchants(&self) -> Result<Vec<Merchant>> {
        self.list_all()
    }

    #[inline]
    fn fetch_merchant(&self, id: &MerchantId) -> Result<Merchant> {
        self.get(id)
    }

    #[inline]
    fn add_merchant(&self, data: &MerchantFormData) -> Result<Merchant> {
        self.create(data)
    }

    #[inline]
    fn update_merchant_by_id(&self, id: &MerchantId, data: &MerchantFormData) -> Result<Merchant> {
        self.update(id, data)
    }

    #[inline]
    fn remove_merchant(&self, id: &MerchantId) -> Result<()> {
        self.delete(id)
    }

    #[inline]
    fn fetch_transactions(
        &self,
        id: &MerchantId,
        query: &TransactionQuery,
    ) -> Result<MerchantTransactions> {
        self.transactions(id, query)
    }
}

// ── MerchantService (async) implementation ──────────────────────────────

#[cfg(feature = "async")]
impl super::MerchantService for InMemoryService {
    #[inline]
    fn fetch_merchants(
        &self,
        query: &MerchantQuery,
    ) -> impl Future<Output = Result<MerchantPage>> + Send {
        future::ready(self.list(query))
    }

    #[inline]
    fn fetch_all_merchants(&self) -> impl Future<Output = Result<Vec<Merchant>>> + Send {
        future::ready(self.list_all())
    }

    #[inline]
    fn fetch_merchant(&self, id: &MerchantId) -> impl Future<Output = Result<Merchant>> + Send {
        future::ready(self.get(id))
    }

    #[inline]
    fn add_merchant(&self, data: &MerchantFormData) -> impl Future<Output = Result<Merchant>> + Send {
        future::ready(self.create(data))
    }

    #[inline]
    fn update_merchant_by_id(
        &self,
        id: &MerchantId,
        data: &MerchantFormData,
    ) -> impl Future<Output = Result<Merchant>> + Send {
        future::ready(self.update(id, data))
    }

    #[inline]
    fn remove_merchant(&self, id: &MerchantId) -> impl Future<Output = Result<()>> + Send {
        future::ready(self.delete(id))
    }

    #[inline]
    fn fetch_transactions(
        &self,
        id: &MerchantId,
        query: &TransactionQuery,
    ) -> impl Future<Output = Result<MerchantTransactions>> + Send {
        future::ready(self.transactions(id, query))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MerchantStatus, TransactionId, TransactionStatus};

    // ── Test helpers ───────────────────────────────────────────────────

    fn draft(name: &str, status: MerchantStatus) -> MerchantFormData {
        MerchantFormData {
            name: name.to_owned(),
            email: format!("{}@example.com", name.to_lowercase()),
            phone: "555-0100".to_owned(),
            status,
            ..MerchantFormData::default()
        }
    }

    fn seeded() -> InMemoryService {
        InMemoryService::with_merchants([
            draft("Charlie", MerchantStatus::Active),
            draft("alpha", MerchantStatus::Inactive),
            draft("Bravo", MerchantStatus::Active),
        ])
        .unwrap()
    }

    fn txn(id: i64, status: TransactionStatus, amount: f64, day: u32) -> Transaction {
        Transaction {
            txn_id: TransactionId::new(id),
            amount,
            currency: "USD".to_owned(),
            status,
            timestamp: format!("2024-03-{day:02}T10:00:00Z").parse().unwrap(),
            card_type: "Visa".to_owned(),
            card_last4: "4242".to_owned(),
            acquirer: "Acq".to_owned(),
            issuer: "Iss".to_owned(),
            details: Vec::new(),
        }
    }

    // ── Merchants ──────────────────────────────────────────────────────

    #[test]
    fn ids_are_sequential() {
        let service = seeded();
        let ids: Vec<String> = service
            .merchants()
            .unwrap()
            .into_iter()
            .map(|merchant| merchant.id.unwrap().into_inner())
            .collect();
        assert_eq!(ids, ["MCH-00001", "MCH-00002", "MCH-00003"]);
    }

    #[test]
    fn list_sorts_case_insensitively() {
        let service = seeded();
        let page = service.list(&MerchantQuery::new()).unwrap();
        let names: Vec<&str> = page.data.iter().map(|merchant| merchant.name.as_str()).collect();
        assert_eq!(names, ["alpha", "Bravo", "Charlie"]);

        let desc = service
            .list(&MerchantQuery::new().sort(SortField::Name, SortDirection::Desc))
            .unwrap();
        assert_eq!(desc.data.first().unwrap().name, "Charlie");
    }

    #[test]
    fn list_filters_by_status_and_search() {
        let service = seeded();
        let active = service
            .list(&MerchantQuery::new().status(MerchantStatus::Active))
            .unwrap();
        assert_eq!(active.total_count, 2);

        let found = service.list(&MerchantQuery::new().search("MCH-00002")).unwrap();
        assert_eq!(found.data.len(), 1);
        assert_eq!(found.data.first().unwrap().name, "alpha");

        let by_email = service.list(&MerchantQuery::new().search("BRAVO@")).unwrap();
        assert_eq!(by_email.data.len(), 1);
    }

    #[test]
    fn list_pages_are_one_based() {
        let service = seeded();
        let second = service.list(&MerchantQuery::new().page(2).size(2)).unwrap();
        assert_eq!(second.data.len(), 1);
        assert_eq!(second.total_count, 3);
        assert_eq!(second.total_pages, 2);
        assert_eq!(second.current_page, 2);
    }

    #[test]
    fn reported_total_override() {
        let service = seeded();
        service.report_total(Some(25)).unwrap();
        let page = service.list(&MerchantQuery::new()).unwrap();
        assert_eq!(page.total_count, 25);
    }

    #[test]
    fn duplicate_email_rejected() {
        let service = seeded();
        let err = service.create(&draft("Charlie", MerchantStatus::Active)).unwrap_err();
        assert!(err.user_message("x").contains("already exists"));
    }

    #[test]
    fn update_keeps_identity_and_creation_time() {
        let service = seeded();
        let id = MerchantId::new("MCH-00001");
        let before = service.get(&id).unwrap();
        let mut changes = MerchantFormData::from(&before);
        changes.city = Some("Oslo".to_owned());
        let after = service.update(&id, &changes).unwrap();
        assert_eq!(after.id, Some(id));
        assert_eq!(after.created_at, before.created_at);
        assert_eq!(after.city.as_deref(), Some("Oslo"));
    }

    #[test]
    fn delete_unknown_is_not_found() {
        let service = seeded();
        let err = service.delete(&MerchantId::new("MCH-99999")).unwrap_err();
        assert!(matches!(err, DashboardError::Api { status: 404, .. }));
        service.delete(&MerchantId::new("MCH-00001")).unwrap();
        assert_eq!(service.merchants().unwrap().len(), 2);
    }

    #[test]
    fn injected_failures_and_counters() {
        let service = seeded();
        service.fail(Operation::ListMerchants, "boom").unwrap();
        assert!(service.list(&MerchantQuery::new()).is_err());
        service.recover(Operation::ListMerchants).unwrap();
        assert!(service.list(&MerchantQuery::new()).is_ok());
        assert_eq!(service.call_count(Operation::ListMerchants).unwrap(), 2);
        assert_eq!(service.call_count(Operation::DeleteMerchant).unwrap(), 0);
        assert_eq!(service.merchant_queries().unwrap().len(), 1);
    }

    // ── Transactions ───────────────────────────────────────────────────

    #[test]
    fn transactions_are_paged_newest_first_with_full_summary() {
        let service = seeded();
        let id = MerchantId::new("MCH-00001");
        service
            .set_transactions(
                &id,
                vec![
                    txn(1, TransactionStatus::Completed, 10.0, 1),
                    txn(2, TransactionStatus::Failed, 20.0, 2),
                    txn(3, TransactionStatus::Completed, 30.0, 3),
                ],
            )
            .unwrap();
        let body = service
            .transactions(&id, &TransactionQuery::new().size(2))
            .unwrap();
        let ids: Vec<i64> = body
            .transactions
            .iter()
            .map(|txn| txn.txn_id.into_inner())
            .collect();
        assert_eq!(ids, [3, 2]);
        assert_eq!(body.summary.total_transactions, 3);
        assert!((body.summary.total_amount - 60.0).abs() < f64::EPSILON);
        assert_eq!(body.summary.by_status.completed, 2);
        assert_eq!(body.pagination.total_pages, 2);

        let filtered = service
            .transactions(&id, &TransactionQuery::new().status(TransactionStatus::Failed))
            .unwrap();
        assert_eq!(filtered.transactions.len(), 1);
    }

    #[test]
    fn transactions_for_unknown_merchant_fail() {
        let service = seeded();
        let result = service.transactions(&MerchantId::new("MCH-404"), &TransactionQuery::new());
        assert!(result.is_err());
    }

    #[test]
    fn empty_history_is_ok() {
        let service = seeded();
        let body = service
            .transactions(&MerchantId::new("MCH-00002"), &TransactionQuery::new())
            .unwrap();
        assert!(body.transactions.is_empty());
        assert_eq!(body.summary.currency, "USD");
    }
}
