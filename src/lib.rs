//! Merchant management and transaction dashboard.
//!
//! This crate provides a typed client for the payments backend's merchant
//! API together with headless controllers for the dashboard screens: the
//! searchable merchant list, the create/edit form, the page that
//! orchestrates them, the merchant details view with CSV export, and a
//! polling transaction feed.
//!
//! Controllers talk to the backend through [`service::MerchantService`],
//! implemented by the HTTP client and by [`service::InMemoryService`].

pub mod config;
pub mod error;
pub mod form;
pub mod format;
pub mod models;
pub mod query;
pub mod service;

#[cfg(any(feature = "async", feature = "blocking"))]
pub mod client;

#[cfg(feature = "async")]
pub mod debounce;
#[cfg(feature = "async")]
pub mod details;
#[cfg(feature = "async")]
pub mod feed;
#[cfg(feature = "async")]
pub mod list;
#[cfg(feature = "async")]
pub mod page;
#[cfg(feature = "async")]
pub mod store;

pub use error::{DashboardError, Result};
