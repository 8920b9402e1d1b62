//! Read-only merchant details: profile refresh, paged transaction history,
//! activity timeline and CSV export of the loaded page.

use std::borrow::Cow;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDate, Utc};

use crate::error::Result;
use crate::format::CurrencyFormatter;
use crate::models::{
    Merchant, PaginationInfo, Transaction, TransactionStatus, TransactionSummary,
};
use crate::query::{DEFAULT_TRANSACTION_PAGE_SIZE, TransactionQuery};
use crate::service::MerchantService;

/// Number of transactions merged into the activity timeline.
pub const TIMELINE_TRANSACTIONS: usize = 5;

/// Error shown when the transaction history cannot be loaded.
pub const TRANSACTIONS_ERROR: &str = "Failed to load transactions";

/// Header row of the CSV export.
pub const CSV_HEADER: &str = "Transaction ID,Amount,Currency,Status,Date,Card Type,Card Last 4";

/// What happened in an activity timeline entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityKind {
    /// Merchant account created.
    Created,
    /// Merchant information updated.
    Updated,
    /// A transaction with this status.
    Transaction(TransactionStatus),
}

/// One entry of the activity timeline.
#[derive(Debug, Clone, PartialEq)]
pub struct ActivityEvent {
    /// When it happened.
    pub date: DateTime<Utc>,
    /// What happened.
    pub kind: ActivityKind,
    /// Display text.
    pub description: String,
}

/// State of the details overlay for one merchant.
#[derive(Debug, Clone)]
pub struct MerchantDetails {
    /// Record the overlay was opened with.
    summary_record: Merchant,
    /// Freshly fetched record, if that fetch succeeded.
    fetched: Option<Merchant>,
    /// Zero-based transaction page.
    page: u32,
    /// Transactions of the loaded page.
    transactions: Vec<Transaction>,
    /// Server-computed aggregate.
    summary: Option<TransactionSummary>,
    /// Server pagination of the loaded page.
    pagination: PaginationInfo,
    /// Transaction fetch in flight.
    loading: bool,
    /// Transaction load error.
    error: Option<String>,
}

impl MerchantDetails {
    /// Opens details for a record from the list.
    #[inline]
    #[must_use]
    pub fn new(merchant: Merchant) -> Self {
        Self {
            summary_record: merchant,
            fetched: None,
            page: 0,
            transactions: Vec::new(),
            summary: None,
            pagination: PaginationInfo::default(),
            loading: false,
            error: None,
        }
    }

    /// Re-fetches the full record and loads the current transaction page.
    /// An unsaved record loads nothing.
    #[inline]
    pub async fn load<S: MerchantService>(&mut self, service: &S) {
        let Some(id) = self.summary_record.id.clone() else {
            tracing::debug!("details opened for an unsaved merchant");
            return;
        };
        match service.fetch_merchant(&id).await {
            Ok(merchant) => self.fetched = Some(merchant),
            Err(err) => {
                tracing::warn!(merchant_id = %id, error = %err, "using list record for details");
                self.fetched = None;
            }
        }
        self.load_transactions(service).await;
    }

    /// Loads the current transaction page and summary.
    #[inline]
    pub async fn load_transactions<S: MerchantService>(&mut self, service: &S) {
        let Some(id) = self.summary_record.id.clone() else {
            return;
        };
        self.loading = true;
        self.error = None;
        let query = TransactionQuery::new()
            .page(self.page)
            .size(DEFAULT_TRANSACTION_PAGE_SIZE);
        match service.fetch_transactions(&id, &query).await {
            Ok(history) => {
                tracing::debug!(
                    merchant_id = %id,
                    page = self.page,
                    rows = history.transactions.len(),
                    "loaded transactions"
                );
                self.transactions = history.transactions;
                self.summary = Some(history.summary);
                self.pagination = history.pagination;
            }
            Err(err) => {
                tracing::warn!(merchant_id = %id, error = %err, "failed to load transactions");
                self.error = Some(err.user_message(TRANSACTIONS_ERROR));
                self.transactions.clear();
                self.summary = None;
            }
        }
        self.loading = false;
    }

    /// Moves to the next transaction page, if any, and reloads.
    #[inline]
    pub async fn next_page<S: MerchantService>(&mut self, service: &S) -> bool {
        if !self.has_next() {
            return false;
        }
        self.page = self.page.saturating_add(1);
        self.load_transactions(service).await;
        true
    }

    /// Moves to the previous transaction page, if any, and reloads.
    #[inline]
    pub async fn previous_page<S: MerchantService>(&mut self, service: &S) -> bool {
        if !self.has_previous() {
            return false;
        }
        self.page = self.page.saturating_sub(1);
        self.load_transactions(service).await;
        true
    }

    /// The fetched record, or the list record when the fetch failed.
    #[inline]
    #[must_use]
    pub fn merchant(&self) -> &Merchant {
        self.fetched.as_ref().unwrap_or(&self.summary_record)
    }

    /// Transactions of the loaded page.
    #[inline]
    #[must_use]
    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    /// Aggregate over the whole history.
    #[inline]
    #[must_use]
    pub const fn summary(&self) -> Option<&TransactionSummary> {
        self.summary.as_ref()
    }

    /// Pagination of the loaded page.
    #[inline]
    #[must_use]
    pub const fn pagination(&self) -> &PaginationInfo {
        &self.pagination
    }

    /// Zero-based transaction page.
    #[inline]
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// `true` while transactions load.
    #[inline]
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.loading
    }

    /// Transaction load error.
    #[inline]
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// `true` when a previous page exists.
    #[inline]
    #[must_use]
    pub const fn has_previous(&self) -> bool {
        self.page > 0
    }

    /// `true` when a next page exists.
    #[inline]
    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.page.saturating_add(1) < self.pagination.total_pages
    }

    /// Creation, update (only when it differs from creation) and the most
    /// recent transactions of the loaded page, newest first.
    #[must_use]
    pub fn activity_timeline(&self) -> Vec<ActivityEvent> {
        let merchant = self.merchant();
        let mut events = Vec::with_capacity(TIMELINE_TRANSACTIONS.saturating_add(2));
        if let Some(created) = merchant.created_at {
            events.push(ActivityEvent {
                date: created,
                kind: ActivityKind::Created,
                description: "Merchant account created".to_owned(),
            });
        }
        if let Some(updated) = merchant.updated_at
            && merchant.created_at != Some(updated)
        {
            events.push(ActivityEvent {
                date: updated,
                kind: ActivityKind::Updated,
                description: "Merchant information updated".to_owned(),
            });
        }

        let mut formatter = CurrencyFormatter::usd();
        for txn in self.transactions.iter().take(TIMELINE_TRANSACTIONS) {
            if !txn.currency.eq_ignore_ascii_case(formatter.currency()) {
                formatter = CurrencyFormatter::new(&txn.currency);
            }
            events.push(ActivityEvent {
                date: txn.timestamp,
                kind: ActivityKind::Transaction(txn.status),
                description: format!("{} transaction: {}", txn.status, formatter.format(txn.amount)),
            });
        }

        events.sort_by(|left, right| right.date.cmp(&left.date));
        events
    }

    /// Writes the loaded page as CSV. Nothing is re-fetched.
    ///
    /// # Errors
    ///
    /// Returns any error from the writer.
    #[inline]
    pub fn export_csv<W: Write>(&self, mut out: W) -> io::Result<()> {
        out.write_all(CSV_HEADER.as_bytes())?;
        for txn in &self.transactions {
            let cells = [
                Cow::Owned(txn.txn_id.to_string()),
                Cow::Owned(txn.amount.to_string()),
                Cow::Borrowed(txn.currency.as_str()),
                Cow::Borrowed(txn.status.as_str()),
                Cow::Owned(txn.timestamp.format("%Y-%m-%d").to_string()),
                Cow::Borrowed(txn.card_type.as_str()),
                Cow::Borrowed(txn.card_last4.as_str()),
            ];
            let row: Vec<String> = cells.iter().map(|cell| quoted(cell)).collect();
            write!(out, "\n{}", row.join(","))?;
        }
        out.flush()
    }

    /// `merchant-<id>-transactions-<date>.csv`.
    #[inline]
    #[must_use]
    pub fn export_file_name(&self, today: NaiveDate) -> String {
        let id = self
            .merchant()
            .id
            .as_ref()
            .map_or("unsaved", |id| id.as_str());
        format!("merchant-{id}-transactions-{}.csv", today.format("%Y-%m-%d"))
    }

    /// Writes the CSV export into `dir` and returns the file path.
    ///
    /// # Errors
    ///
    /// Returns [`crate::DashboardError::Io`] if the file cannot be written.
    #[inline]
    pub fn export_to_dir(&self, dir: &Path, today: NaiveDate) -> Result<PathBuf> {
        let path = dir.join(self.export_file_name(today));
        let file = File::create(&path)?;
        self.export_csv(BufWriter::new(file))?;
        tracing::info!(path = %path.display(), rows = self.transactions.len(), "exported transactions");
        Ok(path)
    }
}

/// Wraps a cell in quotes, doubling embedded quotes.
fn quoted(cell: &str) -> String {
    format!("\"{}\"", cell.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MerchantFormData, MerchantId, TransactionId};
    use crate::service::{InMemoryService, Operation};

    fn at(text: &str) -> DateTime<Utc> {
        text.parse().unwrap()
    }

    fn txn(id: i64, status: TransactionStatus, amount: f64, when: &str) -> Transaction {
        Transaction {
            txn_id: TransactionId::new(id),
            amount,
            currency: "USD".to_owned(),
            status,
            timestamp: at(when),
            card_type: "Visa".to_owned(),
            card_last4: "4242".to_owned(),
            acquirer: "Acq".to_owned(),
            issuer: "Iss".to_owned(),
            details: Vec::new(),
        }
    }

    fn seeded(transactions: usize) -> (InMemoryService, Merchant) {
        let service = InMemoryService::new();
        let merchant = service
            .insert(MerchantFormData {
                name: "Acme".to_owned(),
                email: "ops@acme.test".to_owned(),
                phone: "555".to_owned(),
                ..MerchantFormData::default()
            })
            .unwrap();
        let id = merchant.id.clone().unwrap();
        let history = (1..=transactions)
            .map(|n| {
                let day = u32::try_from(n).unwrap();
                txn(i64::from(day), TransactionStatus::Completed, 10.0, &format!("2024-01-{day:02}T12:00:00Z"))
            })
            .collect();
        service.set_transactions(&id, history).unwrap();
        (service, merchant)
    }

    #[tokio::test]
    async fn load_fetches_record_and_first_page() {
        let (service, merchant) = seeded(15);
        let mut details = MerchantDetails::new(merchant);
        details.load(&service).await;
        assert_eq!(details.transactions().len(), 10);
        assert_eq!(details.summary().unwrap().total_transactions, 15);
        assert_eq!(details.pagination().total_pages, 2);
        assert!(details.has_next());
        assert!(!details.has_previous());
        assert_eq!(service.call_count(Operation::GetMerchant).unwrap(), 1);

        assert!(details.next_page(&service).await);
        assert_eq!(details.page(), 1);
        assert_eq!(details.transactions().len(), 5);
        assert!(!details.next_page(&service).await);
        assert!(details.previous_page(&service).await);
        assert_eq!(details.page(), 0);
    }

    #[tokio::test]
    async fn record_fetch_failure_falls_back_silently() {
        let (service, mut merchant) = seeded(1);
        merchant.name = "From list".to_owned();
        service.fail(Operation::GetMerchant, "boom").unwrap();
        let mut details = MerchantDetails::new(merchant);
        details.load(&service).await;
        assert_eq!(details.merchant().name, "From list");
        assert_eq!(details.error(), None);
        assert_eq!(details.transactions().len(), 1);
    }

    #[tokio::test]
    async fn transaction_failure_clears_page() {
        let (service, merchant) = seeded(3);
        let mut details = MerchantDetails::new(merchant);
        details.load(&service).await;
        assert_eq!(details.transactions().len(), 3);

        service.fail(Operation::ListTransactions, "ledger offline").unwrap();
        details.load_transactions(&service).await;
        assert_eq!(details.error(), Some("ledger offline"));
        assert!(details.transactions().is_empty());
        assert!(details.summary().is_none());
        assert!(!details.is_loading());
    }

    #[tokio::test]
    async fn unsaved_record_loads_nothing() {
        let service = InMemoryService::new();
        let mut details = MerchantDetails::new(Merchant::from_draft(MerchantFormData::default()));
        details.load(&service).await;
        assert_eq!(service.call_count(Operation::GetMerchant).unwrap(), 0);
        assert_eq!(service.call_count(Operation::ListTransactions).unwrap(), 0);
    }

    #[test]
    fn timeline_merges_and_sorts_descending() {
        let mut merchant = Merchant::from_draft(MerchantFormData::default());
        merchant.created_at = Some(at("2024-01-01T00:00:00Z"));
        merchant.updated_at = Some(at("2024-02-15T00:00:00Z"));
        let mut details = MerchantDetails::new(merchant);
        details.transactions = (1..=7)
            .map(|day| txn(day, TransactionStatus::Pending, 1234.5, &format!("2024-02-{day:02}T00:00:00Z")))
            .collect();

        let timeline = details.activity_timeline();
        assert_eq!(timeline.len(), 7);
        assert_eq!(timeline.first().unwrap().kind, ActivityKind::Updated);
        assert_eq!(timeline.last().unwrap().kind, ActivityKind::Created);
        assert_eq!(timeline.get(1).unwrap().description, "pending transaction: $1,234.50");
        assert_eq!(timeline.get(1).unwrap().date, at("2024-02-05T00:00:00Z"));
        assert!(timeline.windows(2).all(|pair| pair[0].date >= pair[1].date));
    }

    #[test]
    fn timeline_skips_unchanged_update() {
        let mut merchant = Merchant::from_draft(MerchantFormData::default());
        merchant.created_at = Some(at("2024-01-01T00:00:00Z"));
        merchant.updated_at = merchant.created_at;
        let details = MerchantDetails::new(merchant);
        let kinds: Vec<_> = details.activity_timeline().into_iter().map(|event| event.kind).collect();
        assert_eq!(kinds, [ActivityKind::Created]);
    }

    #[test]
    fn csv_quotes_every_cell() {
        let mut merchant = Merchant::from_draft(MerchantFormData::default());
        merchant.id = Some(MerchantId::new("MCH-00007"));
        let mut details = MerchantDetails::new(merchant);
        let mut odd = txn(2, TransactionStatus::Failed, 100.0, "2024-03-09T23:30:00Z");
        odd.card_type = "Master\"Card".to_owned();
        details.transactions = vec![txn(1, TransactionStatus::Completed, 12.5, "2024-03-08T10:00:00Z"), odd];

        let mut out = Vec::new();
        details.export_csv(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            "Transaction ID,Amount,Currency,Status,Date,Card Type,Card Last 4\n\
             \"1\",\"12.5\",\"USD\",\"completed\",\"2024-03-08\",\"Visa\",\"4242\"\n\
             \"2\",\"100\",\"USD\",\"failed\",\"2024-03-09\",\"Master\"\"Card\",\"4242\""
        );

        let today = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
        assert_eq!(
            details.export_file_name(today),
            "merchant-MCH-00007-transactions-2024-03-10.csv"
        );
    }
}
