//! Raw response shapes and their normalization into domain types.
//!
//! The backend omits or nulls descriptive fields freely and serializes
//! decimals either as numbers or as strings. Everything here is lenient on
//! input; the domain types it produces are not.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};

use super::{
    DateRange, Merchant, MerchantId, MerchantPage, MerchantTransactions, PaginationInfo,
    StatusCounts, Transaction, TransactionDetail, TransactionId, TransactionStatus,
    TransactionSummary, UnknownVariant,
};

/// Currency assumed when the backend omits one.
pub(crate) const DEFAULT_CURRENCY: &str = "USD";

/// Placeholder for missing card/network descriptors.
const UNKNOWN: &str = "Unknown";

/// Placeholder for a missing card suffix.
const UNKNOWN_LAST4: &str = "0000";

/// A decimal that may arrive as a JSON number or a string.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Decimal {
    /// Plain JSON number.
    Number(f64),
    /// Stringified decimal (`"12.50"`).
    Text(String),
}

impl Decimal {
    /// Converts to `f64`, treating unparsable text as zero.
    fn value(self) -> f64 {
        match self {
            Self::Number(number) => number,
            Self::Text(text) => text.trim().parse().unwrap_or_else(|_| {
                tracing::warn!(raw = %text, "unparsable decimal, using 0");
                0.0
            }),
        }
    }
}

/// Deserializes a required amount from a number or a decimal string.
pub(crate) fn amount<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Decimal::deserialize(deserializer).map(Decimal::value)
}

/// Deserializes an optional amount; `null` and missing become zero.
fn lenient_amount<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<Decimal>::deserialize(deserializer).map(|raw| raw.map_or(0.0, Decimal::value))
}

/// Returns the trimmed value, or `fallback` when it is missing or blank.
fn text_or(value: Option<String>, fallback: &str) -> String {
    value
        .map(|text| text.trim().to_owned())
        .filter(|text| !text.is_empty())
        .unwrap_or_else(|| fallback.to_owned())
}

/// Treats zero like a missing value.
fn nonzero_or<T: Default + PartialEq>(value: Option<T>, fallback: T) -> T {
    value.filter(|inner| *inner != T::default()).unwrap_or(fallback)
}

/// A transaction exactly as the backend sends it.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct TransactionWire {
    /// Transaction key.
    txn_id: TransactionId,
    /// Gross amount.
    #[serde(default, deserialize_with = "lenient_amount")]
    amount: f64,
    /// Currency code, possibly absent.
    #[serde(default)]
    currency: Option<String>,
    /// Status in any letter case.
    status: String,
    /// Event time.
    timestamp: DateTime<Utc>,
    /// Card scheme.
    #[serde(default)]
    card_type: Option<String>,
    /// Card suffix.
    #[serde(default)]
    card_last4: Option<String>,
    /// Acquiring bank.
    #[serde(default)]
    acquirer: Option<String>,
    /// Issuing bank.
    #[serde(default)]
    issuer: Option<String>,
    /// Line items.
    #[serde(default)]
    details: Option<Vec<TransactionDetail>>,
}

impl TryFrom<TransactionWire> for Transaction {
    type Error = UnknownVariant;

    #[inline]
    fn try_from(wire: TransactionWire) -> Result<Self, Self::Error> {
        Ok(Self {
            txn_id: wire.txn_id,
            amount: wire.amount,
            currency: text_or(wire.currency, DEFAULT_CURRENCY),
            status: wire.status.parse()?,
            timestamp: wire.timestamp,
            card_type: text_or(wire.card_type, UNKNOWN),
            card_last4: text_or(wire.card_last4, UNKNOWN_LAST4),
            acquirer: text_or(wire.acquirer, UNKNOWN),
            issuer: text_or(wire.issuer, UNKNOWN),
            details: wire.details.unwrap_or_default(),
        })
    }
}

/// A summary exactly as the backend sends it.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SummaryWire {
    /// Matching transaction count.
    #[serde(default)]
    total_transactions: Option<u64>,
    /// Sum of matching amounts.
    #[serde(default, deserialize_with = "lenient_amount")]
    total_amount: f64,
    /// Currency of the sum.
    #[serde(default)]
    currency: Option<String>,
    /// Counts keyed by status name in any letter case.
    #[serde(default)]
    by_status: Option<serde_json::Map<String, serde_json::Value>>,
}

impl From<SummaryWire> for TransactionSummary {
    #[inline]
    fn from(wire: SummaryWire) -> Self {
        let mut by_status = StatusCounts::default();
        for (key, value) in wire.by_status.unwrap_or_default() {
            let Ok(status) = key.parse::<TransactionStatus>() else {
                tracing::warn!(status = %key, "ignoring unknown status bucket");
                continue;
            };
            let count = value.as_u64().unwrap_or_default();
            match status {
                TransactionStatus::Completed => by_status.completed = count,
                TransactionStatus::Pending => by_status.pending = count,
                TransactionStatus::Failed => by_status.failed = count,
                TransactionStatus::Reversed => by_status.reversed = count,
            }
        }
        Self {
            total_transactions: wire.total_transactions.unwrap_or_default(),
            total_amount: wire.total_amount,
            currency: text_or(wire.currency, DEFAULT_CURRENCY),
            by_status,
        }
    }
}

/// Paging metadata as sent, before request-based fallbacks.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PaginationWire {
    /// Zero-based page.
    #[serde(default)]
    page: Option<u32>,
    /// Page size.
    #[serde(default)]
    size: Option<u32>,
    /// Page count.
    #[serde(default)]
    total_pages: Option<u32>,
    /// Record count.
    #[serde(default)]
    total_elements: Option<u64>,
}

/// Body of the transactions endpoint as sent.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct MerchantTransactionsWire {
    /// Owning merchant; some backends omit it.
    #[serde(default)]
    merchant_id: Option<MerchantId>,
    /// Applied date window.
    #[serde(default)]
    date_range: Option<DateRange>,
    /// Aggregate, possibly absent.
    #[serde(default)]
    summary: Option<SummaryWire>,
    /// Page rows.
    #[serde(default)]
    transactions: Option<Vec<Transaction>>,
    /// Paging metadata.
    #[serde(default)]
    pagination: Option<PaginationWire>,
}

impl MerchantTransactionsWire {
    /// Normalizes against the request that produced this body.
    pub(crate) fn into_domain(
        self,
        merchant_id: &MerchantId,
        requested_page: u32,
        requested_size: u32,
    ) -> MerchantTransactions {
        let pagination = self.pagination.unwrap_or_default();
        MerchantTransactions {
            merchant_id: self.merchant_id.unwrap_or_else(|| merchant_id.clone()),
            date_range: self.date_range,
            summary: self.summary.unwrap_or_default().into(),
            transactions: self.transactions.unwrap_or_default(),
            pagination: PaginationInfo {
                page: nonzero_or(pagination.page, requested_page),
                size: nonzero_or(pagination.size, requested_size),
                total_pages: pagination.total_pages.unwrap_or_default(),
                total_elements: pagination.total_elements.unwrap_or_default(),
            },
        }
    }
}

/// Body of the merchant list endpoint as sent.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct MerchantPageWire {
    /// Page rows.
    #[serde(default)]
    data: Option<Vec<Merchant>>,
    /// Reported match count.
    #[serde(default)]
    total_count: Option<u64>,
    /// Reported page count.
    #[serde(default)]
    total_pages: Option<u32>,
    /// One-based page index.
    #[serde(default)]
    current_page: Option<u32>,
    /// Applied page size.
    #[serde(default)]
    page_size: Option<u32>,
}

impl MerchantPageWire {
    /// Normalizes against the request that produced this body.
    pub(crate) fn into_domain(self, requested_page: u32, requested_size: u32) -> MerchantPage {
        MerchantPage {
            data: self.data.unwrap_or_default(),
            total_count: self.total_count.unwrap_or_default(),
            total_pages: nonzero_or(self.total_pages, 1),
            current_page: nonzero_or(self.current_page, requested_page),
            page_size: nonzero_or(self.page_size, requested_size),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merchant_page_falls_back_to_request() {
        let wire: MerchantPageWire = serde_json::from_str(r#"{"data":null,"totalPages":0}"#).unwrap();
        let page = wire.into_domain(3, 20);
        assert!(page.data.is_empty());
        assert_eq!(page.total_count, 0);
        assert_eq!(page.total_pages, 1);
        assert_eq!(page.current_page, 3);
        assert_eq!(page.page_size, 20);
    }

    #[test]
    fn merchant_page_keeps_reported_values() {
        let json = r#"{
            "data": [{"id":"MCH-00001","name":"A","email":"a@b.co","phone":"1","status":"active"}],
            "totalCount": 25, "totalPages": 3, "currentPage": 1, "pageSize": 10
        }"#;
        let page = serde_json::from_str::<MerchantPageWire>(json)
            .unwrap()
            .into_domain(1, 10);
        assert_eq!(page.data.len(), 1);
        assert_eq!(page.total_count, 25);
        assert_eq!(page.total_pages, 3);
    }

    #[test]
    fn transactions_body_normalizes() {
        let json = r#"{
            "summary": {"totalTransactions": 1, "totalAmount": 10.5, "byStatus": {"completed": 1}},
            "transactions": [
                {"txnId": 5, "amount": "10.50", "status": "completed", "timestamp": "2024-05-01T00:00:00Z"}
            ],
            "pagination": {"totalPages": 1, "totalElements": 1}
        }"#;
        let wire: MerchantTransactionsWire = serde_json::from_str(json).unwrap();
        let body = wire.into_domain(&MerchantId::new("MCH-00009"), 0, 10);
        assert_eq!(body.merchant_id.as_str(), "MCH-00009");
        assert_eq!(body.transactions.len(), 1);
        assert_eq!(body.pagination.page, 0);
        assert_eq!(body.pagination.size, 10);
        assert_eq!(body.pagination.total_elements, 1);
        assert_eq!(body.summary.by_status.completed, 1);
        assert_eq!(body.summary.currency, "USD");
    }

    #[test]
    fn empty_transactions_body() {
        let wire: MerchantTransactionsWire = serde_json::from_str("{}").unwrap();
        let body = wire.into_domain(&MerchantId::new("MCH-1"), 2, 50);
        assert!(body.transactions.is_empty());
        assert_eq!(body.summary.total_transactions, 0);
        assert_eq!(body.pagination.page, 2);
    }

    #[test]
    fn garbage_decimal_becomes_zero() {
        let summary: TransactionSummary =
            serde_json::from_str(r#"{"totalAmount":"n/a"}"#).unwrap();
        assert!(summary.total_amount.abs() < f64::EPSILON);
    }
}
