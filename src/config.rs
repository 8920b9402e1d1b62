//! Runtime settings read from the environment.
//!
//! The binary loads a `.env` file first; the library only ever sees plain
//! environment lookups, so tests pass their own lookup closure.

use core::time::Duration;

use url::Url;

use crate::error::{DashboardError, Result};
use crate::models::MerchantId;

/// Base URL of the backend API when none is configured.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8080/api/v1";

/// Merchant whose transactions the dashboard shows when none is chosen.
pub const DEFAULT_MERCHANT_ID: &str = "MCH-00001";

/// Per-request timeout when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Environment variable holding the API base URL.
pub const API_BASE_URL_ENV: &str = "MERCHANT_API_BASE_URL";

/// Environment variable holding the default merchant id.
pub const DEFAULT_MERCHANT_ID_ENV: &str = "DEFAULT_MERCHANT_ID";

/// Environment variable holding the request timeout in whole seconds.
pub const TIMEOUT_ENV: &str = "MERCHANT_API_TIMEOUT_SECS";

/// Dashboard configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Backend API base URL.
    pub api_base_url: Url,
    /// Merchant shown by the transactions dashboard.
    pub default_merchant_id: MerchantId,
    /// Per-request timeout.
    pub request_timeout: Duration,
}

impl Settings {
    /// Reads settings from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::Config`] if a variable is set but invalid.
    #[inline]
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads settings through an arbitrary lookup. Unset or blank values
    /// take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::Config`] if a value is present but invalid.
    #[inline]
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let value = |name: &str| {
            lookup(name)
                .map(|raw| raw.trim().to_owned())
                .filter(|raw| !raw.is_empty())
        };

        let raw_url = value(API_BASE_URL_ENV).unwrap_or_else(|| DEFAULT_API_BASE_URL.to_owned());
        let api_base_url = parse_base_url(&raw_url)?;

        let default_merchant_id = MerchantId::new(
            value(DEFAULT_MERCHANT_ID_ENV).unwrap_or_else(|| DEFAULT_MERCHANT_ID.to_owned()),
        );

        let request_timeout = match value(TIMEOUT_ENV) {
            Some(raw) => {
                let secs: u64 = raw.parse().map_err(|err| {
                    DashboardError::Config(format!("{TIMEOUT_ENV} must be whole seconds: {err}"))
                })?;
                if secs == 0 {
                    return Err(DashboardError::Config(format!("{TIMEOUT_ENV} must be positive")));
                }
                Duration::from_secs(secs)
            }
            None => DEFAULT_TIMEOUT,
        };

        tracing::debug!(
            api_base_url = %api_base_url,
            default_merchant_id = %default_merchant_id,
            timeout_secs = request_timeout.as_secs(),
            "loaded settings"
        );
        Ok(Self {
            api_base_url,
            default_merchant_id,
            request_timeout,
        })
    }

    /// Replaces the base URL (e.g. from a command-line flag).
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::Config`] if the URL is not an HTTP(S) URL.
    #[inline]
    pub fn with_base_url(mut self, raw: &str) -> Result<Self> {
        self.api_base_url = parse_base_url(raw)?;
        Ok(self)
    }
}

/// Parses and validates an HTTP(S) base URL.
fn parse_base_url(raw: &str) -> Result<Url> {
    let url = Url::parse(raw.trim())
        .map_err(|err| DashboardError::Config(format!("invalid API base URL {raw:?}: {err}")))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(DashboardError::Config(format!(
            "API base URL must use http or https, got {}",
            url.scheme()
        )));
    }
    Ok(url)
}
