//! Transaction history models.
//!
//! These are read-only on the client: fetched per merchant, replaced wholesale
//! on the next fetch, never mutated locally.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::wire::{SummaryWire, TransactionWire};
use super::{DetailId, DetailType, MerchantId, PaginationInfo, TransactionId, TransactionStatus};

/// A single card transaction of a merchant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "TransactionWire")]
pub struct Transaction {
    /// Backend identifier.
    pub txn_id: TransactionId,
    /// Gross amount.
    pub amount: f64,
    /// ISO 4217 currency code.
    pub currency: String,
    /// Lifecycle status.
    pub status: TransactionStatus,
    /// When the transaction happened.
    pub timestamp: DateTime<Utc>,
    /// Card scheme (`Visa`, `Mastercard`, ...).
    pub card_type: String,
    /// Last four digits of the card number.
    pub card_last4: String,
    /// Acquiring bank.
    pub acquirer: String,
    /// Issuing bank.
    pub issuer: String,
    /// Fee/tax/adjustment/refund line items.
    pub details: Vec<TransactionDetail>,
}

/// A line item attached to a transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionDetail {
    /// Backend identifier.
    pub detail_id: DetailId,
    /// Kind of line item.
    #[serde(rename = "type")]
    pub kind: DetailType,
    /// Line amount.
    #[serde(deserialize_with = "super::wire::amount")]
    pub amount: f64,
    /// Currency, when it differs from the parent transaction.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    /// Free-text description.
    #[serde(default)]
    pub description: String,
}

/// Per-status transaction counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCounts {
    /// Completed transactions.
    pub completed: u64,
    /// Pending transactions.
    pub pending: u64,
    /// Failed transactions.
    pub failed: u64,
    /// Reversed transactions.
    pub reversed: u64,
}

impl StatusCounts {
    /// Returns the count for one status.
    #[inline]
    #[must_use]
    pub const fn get(&self, status: TransactionStatus) -> u64 {
        match status {
            TransactionStatus::Completed => self.completed,
            TransactionStatus::Pending => self.pending,
            TransactionStatus::Failed => self.failed,
            TransactionStatus::Reversed => self.reversed,
        }
    }

    /// Increments the count for one status.
    #[inline]
    pub const fn bump(&mut self, status: TransactionStatus) {
        let slot = match status {
            TransactionStatus::Completed => &mut self.completed,
            TransactionStatus::Pending => &mut self.pending,
            TransactionStatus::Failed => &mut self.failed,
            TransactionStatus::Reversed => &mut self.reversed,
        };
        *slot = slot.saturating_add(1);
    }
}

/// Server-computed aggregate over a merchant's (filtered) transactions.
///
/// Never derived client-side from a partial page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "SummaryWire")]
pub struct TransactionSummary {
    /// Number of matching transactions.
    pub total_transactions: u64,
    /// Sum of matching amounts.
    pub total_amount: f64,
    /// Currency of `total_amount`.
    pub currency: String,
    /// Counts per status.
    pub by_status: StatusCounts,
}

/// Date window the backend applied to a transaction query.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    /// Inclusive start.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<DateTime<Utc>>,
    /// Inclusive end.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<DateTime<Utc>>,
}

/// Body of `GET /merchants/{id}/transactions`, normalized.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MerchantTransactions {
    /// Merchant the history belongs to.
    pub merchant_id: MerchantId,
    /// Date window applied by the backend, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_range: Option<DateRange>,
    /// Aggregate over all matching transactions.
    pub summary: TransactionSummary,
    /// The requested page of transactions.
    pub transactions: Vec<Transaction>,
    /// Paging metadata.
    pub pagination: PaginationInfo,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_full_transaction() {
        let json = r#"{
            "txnId": 1001,
            "amount": 125.50,
            "currency": "EUR",
            "status": "completed",
            "timestamp": "2024-03-01T12:00:00Z",
            "cardType": "Visa",
            "cardLast4": "4242",
            "acquirer": "Acq Bank",
            "issuer": "Iss Bank",
            "details": [
                {"detailId": 1, "type": "fee", "amount": "2.50", "description": "Processing fee"}
            ]
        }"#;
        let txn: Transaction = serde_json::from_str(json).unwrap();
        assert_eq!(txn.txn_id, TransactionId::new(1001));
        assert_eq!(txn.currency, "EUR");
        assert_eq!(txn.status, TransactionStatus::Completed);
        assert_eq!(txn.details.len(), 1);
        assert!((txn.details[0].amount - 2.5).abs() < f64::EPSILON);
        assert_eq!(txn.details[0].kind, DetailType::Fee);
    }

    #[test]
    fn missing_descriptors_are_normalized() {
        let json = r#"{
            "txnId": 7,
            "amount": "19.99",
            "status": "PENDING",
            "timestamp": "2024-03-01T12:00:00Z",
            "cardType": null
        }"#;
        let txn: Transaction = serde_json::from_str(json).unwrap();
        assert!((txn.amount - 19.99).abs() < f64::EPSILON);
        assert_eq!(txn.currency, "USD");
        assert_eq!(txn.status, TransactionStatus::Pending);
        assert_eq!(txn.card_type, "Unknown");
        assert_eq!(txn.card_last4, "0000");
        assert_eq!(txn.acquirer, "Unknown");
        assert_eq!(txn.issuer, "Unknown");
        assert!(txn.details.is_empty());
    }

    #[test]
    fn unknown_transaction_status_is_rejected() {
        let json = r#"{"txnId": 7, "amount": 1, "status": "chargeback",
                       "timestamp": "2024-03-01T12:00:00Z"}"#;
        assert!(serde_json::from_str::<Transaction>(json).is_err());
    }

    #[test]
    fn summary_fills_missing_statuses() {
        let json = r#"{
            "totalTransactions": 3,
            "totalAmount": "300.00",
            "byStatus": {"completed": 2, "FAILED": 1}
        }"#;
        let summary: TransactionSummary = serde_json::from_str(json).unwrap();
        assert_eq!(summary.total_transactions, 3);
        assert_eq!(summary.currency, "USD");
        assert_eq!(summary.by_status.completed, 2);
        assert_eq!(summary.by_status.failed, 1);
        assert_eq!(summary.by_status.pending, 0);
        assert_eq!(summary.by_status.get(TransactionStatus::Reversed), 0);
    }

    #[test]
    fn status_counts_bump() {
        let mut counts = StatusCounts::default();
        counts.bump(TransactionStatus::Reversed);
        counts.bump(TransactionStatus::Reversed);
        assert_eq!(counts.reversed, 2);
    }
}
