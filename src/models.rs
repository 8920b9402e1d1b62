//! Data models for the merchant backend.
//!
//! Strongly-typed merchants, transactions and paging envelopes, newtype ID
//! wrappers, and enumeration types for constrained values. Lenient wire
//! shapes live in a private submodule and are normalized on deserialize.

mod enums;
mod ids;
mod merchant;
mod pagination;
mod transaction;
pub(crate) mod wire;

pub use chrono::{DateTime, NaiveDate, Utc};
pub use enums::{
    DetailType, MerchantStatus, SortDirection, SortField, TransactionStatus, UnknownVariant,
};
pub use ids::{DetailId, MerchantId, TransactionId};
pub use merchant::{Merchant, MerchantFormData};
pub use pagination::{MerchantPage, PaginationInfo};
pub use transaction::{
    DateRange, MerchantTransactions, StatusCounts, Transaction, TransactionDetail,
    TransactionSummary,
};
