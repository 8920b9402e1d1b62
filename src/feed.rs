//! Live transaction feed: periodic polling with cleanup, client-side search
//! and row formatting with a single shared formatter.
//!
//! The poll loop runs on a spawned Tokio task that fetches immediately and
//! then once per interval. The task is aborted when the feed is dropped and
//! replaced whenever the merchant or the interval changes, so no timer ever
//! outlives the parameters it was started with.

use core::time::Duration;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::format::CurrencyFormatter;
use crate::models::{MerchantId, Transaction, TransactionId, TransactionStatus};
use crate::query::TransactionQuery;
use crate::service::MerchantService;

/// Poll period when none is given.
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(5);

/// Rows requested per poll.
pub const FEED_PAGE_SIZE: u32 = 100;

/// Error shown when a poll fails without a backend message.
pub const FEED_ERROR: &str = "Failed to load transactions";

/// State published by the poll task.
#[derive(Debug, Clone, Default)]
pub struct FeedSnapshot {
    /// Rows of the last successful poll.
    pub transactions: Vec<Transaction>,
    /// A poll is in flight.
    pub loading: bool,
    /// Error of the last poll, cleared by the next success.
    pub error: Option<String>,
    /// Completed polls since the feed started.
    pub polls: u64,
}

/// A transaction formatted for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedRow {
    /// Transaction id.
    pub txn_id: TransactionId,
    /// Formatted amount.
    pub amount: String,
    /// Lifecycle status.
    pub status: TransactionStatus,
    /// `<card type> ****<last4>`.
    pub card: String,
    /// Acquirer name.
    pub acquirer: String,
    /// Issuer name.
    pub issuer: String,
    /// When it happened.
    pub timestamp: DateTime<Utc>,
}

/// Aborts the wrapped task on drop.
#[derive(Debug)]
struct PollTask(JoinHandle<()>);

impl Drop for PollTask {
    #[inline]
    fn drop(&mut self) {
        self.0.abort();
    }
}

/// Polling transaction list for one merchant.
#[derive(Debug)]
pub struct TransactionFeed<S> {
    /// Backend shared with the poll task.
    service: Arc<S>,
    /// Merchant being polled.
    merchant_id: MerchantId,
    /// Poll period.
    refresh_interval: Duration,
    /// Published state.
    state: Arc<watch::Sender<FeedSnapshot>>,
    /// Formatter reused for every render.
    formatter: CurrencyFormatter,
    /// Client-side search text.
    search: String,
    /// Running poll loop.
    task: Option<PollTask>,
}

impl<S: MerchantService + 'static> TransactionFeed<S> {
    /// Starts polling `merchant_id` every `refresh_interval`.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    #[inline]
    #[must_use]
    pub fn spawn(service: Arc<S>, merchant_id: MerchantId, refresh_interval: Duration) -> Self {
        let (state, _initial) = watch::channel(FeedSnapshot::default());
        let mut feed = Self {
            service,
            merchant_id,
            refresh_interval,
            state: Arc::new(state),
            formatter: CurrencyFormatter::usd(),
            search: String::new(),
            task: None,
        };
        feed.restart();
        feed
    }

    /// Switches merchant and/or interval. The running loop is replaced only
    /// when something changed.
    #[inline]
    pub fn set_params(&mut self, merchant_id: MerchantId, refresh_interval: Duration) {
        if merchant_id == self.merchant_id && refresh_interval == self.refresh_interval {
            return;
        }
        self.merchant_id = merchant_id;
        self.refresh_interval = refresh_interval;
        self.restart();
    }

    /// Fetches again right away and resumes the interval from now.
    #[inline]
    pub fn retry(&mut self) {
        self.restart();
    }

    /// Stops polling. The last snapshot stays readable.
    #[inline]
    pub fn stop(&mut self) {
        if self.task.take().is_some() {
            tracing::debug!(merchant_id = %self.merchant_id, "feed stopped");
        }
    }

    /// Aborts the current loop and starts a new one.
    fn restart(&mut self) {
        self.stop();
        tracing::debug!(
            merchant_id = %self.merchant_id,
            interval_ms = self.refresh_interval.as_millis(),
            "feed polling"
        );
        let handle = tokio::spawn(poll(
            Arc::clone(&self.service),
            self.merchant_id.clone(),
            self.refresh_interval,
            Arc::clone(&self.state),
        ));
        self.task = Some(PollTask(handle));
    }
}

impl<S> TransactionFeed<S> {
    /// Sets the client-side search text.
    #[inline]
    pub fn set_search<T: Into<String>>(&mut self, text: T) {
        self.search = text.into();
    }

    /// Current search text.
    #[inline]
    #[must_use]
    pub fn search(&self) -> &str {
        &self.search
    }

    /// Merchant being polled.
    #[inline]
    #[must_use]
    pub const fn merchant_id(&self) -> &MerchantId {
        &self.merchant_id
    }

    /// Poll period.
    #[inline]
    #[must_use]
    pub const fn refresh_interval(&self) -> Duration {
        self.refresh_interval
    }

    /// `true` while a poll loop is running.
    #[inline]
    #[must_use]
    pub fn is_polling(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.0.is_finished())
    }

    /// Copy of the latest state.
    #[inline]
    #[must_use]
    pub fn snapshot(&self) -> FeedSnapshot {
        self.state.borrow().clone()
    }

    /// Receiver notified after every state change.
    #[inline]
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<FeedSnapshot> {
        self.state.subscribe()
    }

    /// Loaded rows matching the search, formatted for display.
    #[inline]
    #[must_use]
    pub fn rows(&self) -> Vec<FeedRow> {
        let needle = self.search.trim().to_lowercase();
        let state = self.state.borrow();
        state
            .transactions
            .iter()
            .filter(|txn| needle.is_empty() || matches_search(txn, &needle))
            .map(|txn| FeedRow {
                txn_id: txn.txn_id,
                amount: self.formatter.format(txn.amount),
                status: txn.status,
                card: format!("{} ****{}", txn.card_type, txn.card_last4),
                acquirer: txn.acquirer.clone(),
                issuer: txn.issuer.clone(),
                timestamp: txn.timestamp,
            })
            .collect()
    }
}

/// Case-insensitive match on id, status, card type, acquirer or issuer.
fn matches_search(txn: &Transaction, needle: &str) -> bool {
    txn.txn_id.to_string().contains(needle)
        || txn.status.as_str().contains(needle)
        || txn.card_type.to_lowercase().contains(needle)
        || txn.acquirer.to_lowercase().contains(needle)
        || txn.issuer.to_lowercase().contains(needle)
}

/// Fetches immediately, then once per tick, forever.
async fn poll<S: MerchantService>(
    service: Arc<S>,
    merchant_id: MerchantId,
    every: Duration,
    state: Arc<watch::Sender<FeedSnapshot>>,
) {
    let mut ticker = tokio::time::interval(every.max(Duration::from_millis(1)));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    loop {
        let _tick = ticker.tick().await;
        refresh(&*service, &merchant_id, &state).await;
    }
}

/// One poll.
async fn refresh<S: MerchantService>(
    service: &S,
    merchant_id: &MerchantId,
    state: &watch::Sender<FeedSnapshot>,
) {
    state.send_modify(|snapshot| snapshot.loading = true);
    let query = TransactionQuery::new().page(0).size(FEED_PAGE_SIZE);
    let outcome = service.fetch_transactions(merchant_id, &query).await;
    state.send_modify(|snapshot| {
        snapshot.loading = false;
        snapshot.polls = snapshot.polls.saturating_add(1);
        match outcome {
            Ok(history) => {
                tracing::trace!(%merchant_id, rows = history.transactions.len(), "feed refreshed");
                snapshot.transactions = history.transactions;
                snapshot.error = None;
            }
            Err(err) => {
                tracing::warn!(%merchant_id, error = %err, "feed poll failed");
                snapshot.error = Some(err.user_message(FEED_ERROR));
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::constructed_on_this_thread;
    use crate::models::MerchantFormData;
    use crate::service::{InMemoryService, Operation};

    fn txn(id: i64, card_type: &str, issuer: &str, amount: f64) -> Transaction {
        Transaction {
            txn_id: TransactionId::new(id),
            amount,
            currency: "USD".to_owned(),
            status: TransactionStatus::Completed,
            timestamp: "2024-06-01T09:00:00Z".parse().unwrap(),
            card_type: card_type.to_owned(),
            card_last4: "1111".to_owned(),
            acquirer: "Northwind".to_owned(),
            issuer: issuer.to_owned(),
            details: Vec::new(),
        }
    }

    fn service() -> Arc<InMemoryService> {
        let service = InMemoryService::new();
        let merchant = service
            .insert(MerchantFormData {
                name: "Feed".to_owned(),
                email: "feed@example.com".to_owned(),
                phone: "1".to_owned(),
                ..MerchantFormData::default()
            })
            .unwrap();
        service
            .set_transactions(
                merchant.id.as_ref().unwrap(),
                vec![
                    txn(101, "Visa", "Chase", 1250.0),
                    txn(102, "Mastercard", "Barclays", -20.5),
                    txn(230, "Amex", "Amex Bank", 3.0),
                ],
            )
            .unwrap();
        Arc::new(service)
    }

    fn polls(service: &InMemoryService) -> usize {
        service.call_count(Operation::ListTransactions).unwrap()
    }

    async fn wait(millis: u64) {
        tokio::time::sleep(Duration::from_millis(millis)).await;
    }

    #[tokio::test(start_paused = true)]
    async fn polls_immediately_then_every_interval() {
        let service = service();
        let feed = TransactionFeed::spawn(Arc::clone(&service), MerchantId::new("MCH-00001"), DEFAULT_REFRESH_INTERVAL);
        wait(1).await;
        assert_eq!(polls(&service), 1);
        assert_eq!(feed.snapshot().transactions.len(), 3);
        assert!(!feed.snapshot().loading);

        wait(5_000).await;
        assert_eq!(polls(&service), 2);
        wait(10_000).await;
        assert_eq!(polls(&service), 4);
        assert_eq!(feed.snapshot().polls, 4);
        assert!(feed.is_polling());
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_the_feed_stops_polling() {
        let service = service();
        let feed = TransactionFeed::spawn(Arc::clone(&service), MerchantId::new("MCH-00001"), DEFAULT_REFRESH_INTERVAL);
        wait(1).await;
        drop(feed);
        wait(30_000).await;
        assert_eq!(polls(&service), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn changing_params_replaces_the_timer() {
        let service = service();
        let mut feed = TransactionFeed::spawn(Arc::clone(&service), MerchantId::new("MCH-00001"), DEFAULT_REFRESH_INTERVAL);
        wait(1).await;

        feed.set_params(MerchantId::new("MCH-00001"), DEFAULT_REFRESH_INTERVAL);
        wait(1).await;
        assert_eq!(polls(&service), 1);

        feed.set_params(MerchantId::new("MCH-00001"), Duration::from_secs(60));
        wait(1).await;
        assert_eq!(polls(&service), 2);
        wait(30_000).await;
        assert_eq!(polls(&service), 2);

        feed.stop();
        wait(120_000).await;
        assert_eq!(polls(&service), 2);
        assert!(!feed.is_polling());
    }

    #[tokio::test(start_paused = true)]
    async fn failure_shows_error_until_retry_succeeds() {
        let service = service();
        service.fail(Operation::ListTransactions, "").unwrap();
        let mut feed = TransactionFeed::spawn(Arc::clone(&service), MerchantId::new("MCH-00001"), Duration::from_secs(60));
        wait(1).await;
        assert_eq!(feed.snapshot().error.as_deref(), Some(FEED_ERROR));

        service.recover(Operation::ListTransactions).unwrap();
        feed.retry();
        wait(1).await;
        assert_eq!(feed.snapshot().error, None);
        assert_eq!(feed.rows().len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn search_filters_and_formatter_is_built_once() {
        let service = service();
        let before = constructed_on_this_thread();
        let mut feed = TransactionFeed::spawn(service, MerchantId::new("MCH-00001"), DEFAULT_REFRESH_INTERVAL);
        wait(1).await;

        for _ in 0..5 {
            assert_eq!(feed.rows().len(), 3);
        }
        feed.set_search("BARC");
        let rows = feed.rows();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows.first().unwrap().amount, "-$20.50");
        assert_eq!(rows.first().unwrap().card, "Mastercard ****1111");

        feed.set_search("23");
        assert_eq!(feed.rows().first().unwrap().txn_id, TransactionId::new(230));
        feed.set_search("amex");
        assert_eq!(feed.rows().len(), 1);
        feed.set_search("COMPLETED");
        assert_eq!(feed.rows().len(), 3);

        assert_eq!(constructed_on_this_thread() - before, 1);
    }
}
