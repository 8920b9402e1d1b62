//! HTTP client for the merchant backend.
//!
//! Provides both async and blocking client variants behind feature flags.
//! Both expose the same endpoint methods and normalize responses into the
//! types of [`crate::models`].

/// Root collection of the merchant endpoints.
const MERCHANTS_SEGMENT: &str = "merchants";

/// Sub-collection of a merchant's transactions.
const TRANSACTIONS_SEGMENT: &str = "transactions";

/// Page size used when walking every merchant page.
pub const FETCH_ALL_PAGE_SIZE: u32 = 100;

/// Generates a merchant API client (async or blocking) with builder, methods, and tests.
macro_rules! define_client {
    (
        client_name: $client:ident,
        builder_name: $builder:ident,
        http_type: $http_type:ty,
        request_type: $req_type:ty,
        response_type: $resp_type:ty,
        client_doc: $client_doc:expr,
        builder_doc: $builder_doc:expr,
        $(async_kw: $async_kw:tt,)?
        $(await_kw: $await_ext:tt,)?
    ) => {
        #[doc = $builder_doc]
        #[derive(Debug)]
        pub struct $builder {
            /// Base URL override.
            base_url: Option<String>,
            /// Per-request timeout override.
            timeout: Option<Duration>,
        }

        impl $builder {
            /// Overrides the base URL (useful for testing with a mock server).
            #[inline]
            #[must_use]
            pub fn base_url<T: Into<String>>(mut self, url: T) -> Self {
                self.base_url = Some(url.into());
                self
            }

            /// Overrides the per-request timeout.
            #[inline]
            #[must_use]
            pub const fn timeout(mut self, timeout: Duration) -> Self {
                self.timeout = Some(timeout);
                self
            }

            /// Builds the client.
            ///
            /// # Errors
            ///
            /// Returns [`DashboardError::Url`] if the base URL does not parse.
            /// Returns [`DashboardError::Http`] if the HTTP client fails to build.
            #[inline]
            #[tracing::instrument(skip_all)]
            pub fn build(self) -> Result<$client> {
                let raw = self
                    .base_url
                    .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_owned());
                let base_url = Url::parse(raw.trim())?;
                let timeout = self.timeout.unwrap_or(DEFAULT_TIMEOUT);
                tracing::debug!(base_url = %base_url, timeout_secs = timeout.as_secs(), "building client");
                let http = <$http_type>::builder().timeout(timeout).build()?;

                Ok($client { http, base_url })
            }
        }

        #[doc = $client_doc]
        #[derive(Debug, Clone)]
        pub struct $client {
            /// Underlying HTTP client.
            http: $http_type,
            /// API base URL, e.g. `http://localhost:8080/api/v1`.
            base_url: Url,
        }

        impl $client {
            /// Creates a new builder for configuring the client.
            #[inline]
            #[must_use]
            pub const fn builder() -> $builder {
                $builder {
                    base_url: None,
                    timeout: None,
                }
            }

            /// Returns the base URL requests are resolved against.
            #[inline]
            #[must_use]
            pub const fn base_url(&self) -> &Url {
                &self.base_url
            }

            /// Fetches one page of merchants (`GET /merchants`).
            ///
            /// Missing envelope fields fall back to the requested page and
            /// size.
            ///
            /// # Errors
            ///
            /// Returns an error if the HTTP request fails, the server returns a
            /// non-success status, or the response cannot be deserialized.
            #[inline]
            #[tracing::instrument(skip_all, fields(page = query.page, size = query.size))]
            pub $($async_kw)? fn list_merchants(&self, query: &MerchantQuery) -> Result<MerchantPage> {
                let url = self.endpoint(&[MERCHANTS_SEGMENT], &query.to_pairs())?;
                let body = self.execute(self.http.get(url)) $( .$await_ext )? ?;
                let wire: MerchantPageWire = serde_json::from_str(&body)?;
                let page = wire.into_domain(query.page, query.size);
                tracing::debug!(rows = page.data.len(), total = page.total_count, "merchant page received");
                Ok(page)
            }

            /// Fetches every merchant by walking pages of
            /// [`FETCH_ALL_PAGE_SIZE`] until a short page or the last
            /// reported page.
            ///
            /// # Errors
            ///
            /// Returns the first page request error.
            #[inline]
            #[tracing::instrument(skip_all)]
            pub $($async_kw)? fn all_merchants(&self) -> Result<Vec<Merchant>> {
                let mut merchants = Vec::new();
                let mut page = 1_u32;
                loop {
                    let query = MerchantQuery::new().page(page).size(FETCH_ALL_PAGE_SIZE);
                    let batch = self.list_merchants(&query) $( .$await_ext )? ?;
                    let reached_end = batch.data.is_empty()
                        || batch.is_short(FETCH_ALL_PAGE_SIZE)
                        || page >= batch.total_pages;
                    merchants.extend(batch.data);
                    if reached_end {
                        break;
                    }
                    page = page.saturating_add(1);
                }
                tracing::debug!(count = merchants.len(), pages = page, "fetched all merchants");
                Ok(merchants)
            }

            /// Fetches a single merchant (`GET /merchants/{id}`).
            ///
            /// # Errors
            ///
            /// Returns an error if the HTTP request fails, the server returns a
            /// non-success status, or the response cannot be deserialized.
            #[inline]
            #[tracing::instrument(skip_all, fields(merchant_id = %id))]
            pub $($async_kw)? fn merchant(&self, id: &MerchantId) -> Result<Merchant> {
                let url = self.endpoint(&[MERCHANTS_SEGMENT, id.as_str()], &[])?;
                let body = self.execute(self.http.get(url)) $( .$await_ext )? ?;
                serde_json::from_str(&body).map_err(DashboardError::from)
            }

            /// Creates a merchant (`POST /merchants`).
            ///
            /// # Errors
            ///
            /// Returns an error if the HTTP request fails, the server returns a
            /// non-success status, or the response cannot be deserialized.
            #[inline]
            #[tracing::instrument(skip_all)]
            pub $($async_kw)? fn create_merchant(&self, data: &MerchantFormData) -> Result<Merchant> {
                let url = self.endpoint(&[MERCHANTS_SEGMENT], &[])?;
                let body = self.execute(self.http.post(url).json(data)) $( .$await_ext )? ?;
                let created: Merchant = serde_json::from_str(&body)?;
                tracing::debug!(merchant_id = ?created.id, "merchant created");
                Ok(created)
            }

            /// Replaces a merchant's editable fields (`PUT /merchants/{id}`).
            ///
            /// # Errors
            ///
            /// Returns an error if the HTTP request fails, the server returns a
            /// non-success status, or the response cannot be deserialized.
            #[inline]
            #[tracing::instrument(skip_all, fields(merchant_id = %id))]
            pub $($async_kw)? fn update_merchant(
                &self,
                id: &MerchantId,
                data: &MerchantFormData,
            ) -> Result<Merchant> {
                let url = self.endpoint(&[MERCHANTS_SEGMENT, id.as_str()], &[])?;
                let body = self.execute(self.http.put(url).json(data)) $( .$await_ext )? ?;
                serde_json::from_str(&body).map_err(DashboardError::from)
            }

            /// Deletes a merchant (`DELETE /merchants/{id}`).
            ///
            /// # Errors
            ///
            /// Returns an error if the HTTP request fails or the server returns
            /// a non-success status.
            #[inline]
            #[tracing::instrument(skip_all, fields(merchant_id = %id))]
            pub $($async_kw)? fn delete_merchant(&self, id: &MerchantId) -> Result<()> {
                let url = self.endpoint(&[MERCHANTS_SEGMENT, id.as_str()], &[])?;
                let _body = self.execute(self.http.delete(url)) $( .$await_ext )? ?;
                Ok(())
            }

            /// Fetches a page of a merchant's transactions with the
            /// server-computed summary
            /// (`GET /merchants/{id}/transactions`).
            ///
            /// # Errors
            ///
            /// Returns an error if the HTTP request fails, the server returns a
            /// non-success status, or the response cannot be deserialized.
            #[inline]
            #[tracing::instrument(skip_all, fields(merchant_id = %id, page = query.page))]
            pub $($async_kw)? fn merchant_transactions(
                &self,
                id: &MerchantId,
                query: &TransactionQuery,
            ) -> Result<MerchantTransactions> {
                let url = self.endpoint(
                    &[MERCHANTS_SEGMENT, id.as_str(), TRANSACTIONS_SEGMENT],
                    &query.to_pairs(),
                )?;
                let body = self.execute(self.http.get(url)) $( .$await_ext )? ?;
                let wire: MerchantTransactionsWire = serde_json::from_str(&body)?;
                Ok(wire.into_domain(id, query.page, query.size))
            }

            /// Resolves path segments and query pairs against the base URL.
            fn endpoint(&self, segments: &[&str], pairs: &[(&'static str, String)]) -> Result<Url> {
                let mut url = self.base_url.clone();
                {
                    let mut path = url.path_segments_mut().map_err(|()| {
                        DashboardError::Config(format!("base URL cannot have a path: {}", self.base_url))
                    })?;
                    _ = path.pop_if_empty().extend(segments);
                }
                if !pairs.is_empty() {
                    _ = url
                        .query_pairs_mut()
                        .extend_pairs(pairs.iter().map(|pair| (pair.0, pair.1.as_str())));
                }
                Ok(url)
            }

            /// Sends a request and returns the body of a success response.
            ///
            /// Non-success statuses become [`DashboardError::Api`] carrying the
            /// message extracted from the error body.
            #[tracing::instrument(skip_all)]
            $($async_kw)? fn execute(&self, request: $req_type) -> Result<String> {
                let response: $resp_type = request.send() $( .$await_ext )? ?;
                let status = response.status();
                tracing::debug!(status = %status, url = %response.url(), "received response");
                if status.is_success() {
                    let body = response.text() $( .$await_ext )? ?;
                    tracing::trace!(body_len = body.len(), "parsing response body");
                    Ok(body)
                } else {
                    let body = response
                        .text()
                        $( .$await_ext )?
                        .unwrap_or_default();
                    let message = extract_error_message(&body).unwrap_or_default();
                    tracing::debug!(status = status.as_u16(), message = %message, body_len = body.len(), "API error");
                    Err(DashboardError::Api {
                        status: status.as_u16(),
                        message,
                    })
                }
            }
        }

        #[cfg(test)]
        mod tests {
            use super::*;

            #[test]
            fn builder_defaults_to_local_backend() {
                let client = $client::builder().build().unwrap();
                assert_eq!(client.base_url().as_str(), "http://localhost:8080/api/v1");
            }

            #[test]
            fn builder_custom_base_url() {
                let client = $client::builder()
                    .base_url("http://localhost:9090/api/v2")
                    .timeout(Duration::from_secs(5))
                    .build()
                    .unwrap();
                assert_eq!(client.base_url().as_str(), "http://localhost:9090/api/v2");
            }

            #[test]
            fn builder_rejects_invalid_url() {
                let result = $client::builder().base_url("not a url").build();
                assert!(matches!(result, Err(DashboardError::Url(_))));
            }

            #[test]
            fn endpoint_joins_segments_and_query() {
                let client = $client::builder()
                    .base_url("http://localhost:8080/api/v1/")
                    .build()
                    .unwrap();
                let url = client
                    .endpoint(
                        &[MERCHANTS_SEGMENT, "MCH-00001", TRANSACTIONS_SEGMENT],
                        &[("page", "0".to_owned()), ("size", "10".to_owned())],
                    )
                    .unwrap();
                assert_eq!(
                    url.as_str(),
                    "http://localhost:8080/api/v1/merchants/MCH-00001/transactions?page=0&size=10"
                );
            }

            #[test]
            fn endpoint_escapes_ids() {
                let client = $client::builder().build().unwrap();
                let url = client.endpoint(&[MERCHANTS_SEGMENT, "a/b c"], &[]).unwrap();
                assert_eq!(url.path(), "/api/v1/merchants/a%2Fb%20c");
            }
        }
    };
}

#[cfg(feature = "async")]
mod async_client {
    //! Async HTTP client for the merchant backend.

    use core::time::Duration;

    use url::Url;

    use super::{FETCH_ALL_PAGE_SIZE, MERCHANTS_SEGMENT, TRANSACTIONS_SEGMENT};
    use crate::config::{DEFAULT_API_BASE_URL, DEFAULT_TIMEOUT};
    use crate::error::{DashboardError, Result, extract_error_message};
    use crate::models::wire::{MerchantPageWire, MerchantTransactionsWire};
    use crate::models::{
        Merchant, MerchantFormData, MerchantId, MerchantPage, MerchantTransactions,
    };
    use crate::query::{MerchantQuery, TransactionQuery};

    define_client! {
        client_name: MerchantApiClient,
        builder_name: MerchantApiClientBuilder,
        http_type: reqwest::Client,
        request_type: reqwest::RequestBuilder,
        response_type: reqwest::Response,
        client_doc: "Async client for the merchant backend.\n\nUse [`MerchantApiClient::builder()`] to construct an instance.",
        builder_doc: "Builder for constructing a [`MerchantApiClient`].",
        async_kw: async,
        await_kw: await,
    }
}

#[cfg(feature = "blocking")]
mod blocking_client {
    //! Blocking (synchronous) HTTP client for the merchant backend.

    use core::time::Duration;

    use url::Url;

    use super::{FETCH_ALL_PAGE_SIZE, MERCHANTS_SEGMENT, TRANSACTIONS_SEGMENT};
    use crate::config::{DEFAULT_API_BASE_URL, DEFAULT_TIMEOUT};
    use crate::error::{DashboardError, Result, extract_error_message};
    use crate::models::wire::{MerchantPageWire, MerchantTransactionsWire};
    use crate::models::{
        Merchant, MerchantFormData, MerchantId, MerchantPage, MerchantTransactions,
    };
    use crate::query::{MerchantQuery, TransactionQuery};

    define_client! {
        client_name: MerchantApiBlockingClient,
        builder_name: MerchantApiBlockingClientBuilder,
        http_type: reqwest::blocking::Client,
        request_type: reqwest::blocking::RequestBuilder,
        response_type: reqwest::blocking::Response,
        client_doc: "Blocking (synchronous) client for the merchant backend.\n\nUse [`MerchantApiBlockingClient::builder()`] to construct an instance.",
        builder_doc: "Builder for constructing a [`MerchantApiBlockingClient`].",
    }
}

#[cfg(feature = "async")]
pub use async_client::{MerchantApiClient, MerchantApiClientBuilder};
#[cfg(feature = "blocking")]
pub use blocking_client::{MerchantApiBlockingClient, MerchantApiBlockingClientBuilder};
