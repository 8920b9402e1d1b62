//! Pluggable merchant backends.
//!
//! This module defines the [`MerchantService`] (async) and
//! [`BlockingMerchantService`] (blocking) traits via a shared macro,
//! mirroring the client generation pattern in [`crate::client`]. The HTTP
//! clients implement them, and so does [`InMemoryService`] for tests and
//! offline demos.

mod memory;

pub use memory::{InMemoryService, Operation};

/// Generates a service trait (async or blocking) with all backend methods.
///
/// Uses `@methods` to define the method list once, and `@method` to render
/// each method in async (`impl Future + Send`) or blocking (`fn`) style.
#[cfg_attr(
    not(feature = "blocking"),
    allow(unused_macro_rules, reason = "blocking rules are only expanded with the `blocking` feature")
)]
macro_rules! define_service {
    // ── Entry points ────────────────────────────────────────────────
    (
        trait_name: $trait_name:ident,
        trait_doc: $trait_doc:expr,
        mode: async_mode,
    ) => {
        #[doc = $trait_doc]
        pub trait $trait_name: core::fmt::Debug + Send + Sync {
            define_service!(@methods async_mode);
        }
    };
    (
        trait_name: $trait_name:ident,
        trait_doc: $trait_doc:expr,
        mode: blocking,
    ) => {
        #[doc = $trait_doc]
        pub trait $trait_name: core::fmt::Debug + Send + Sync {
            define_service!(@methods blocking);
        }
    };

    // ── Single method list (shared between both variants) ───────────
    (@methods $mode:ident) => {
        define_service!(@method $mode, fetch_merchants,
            "Fetches one page of merchants matching the query.\n\n# Errors\n\nReturns an error if the backend rejects the request or cannot be reached.",
            query: &MerchantQuery, -> Result<MerchantPage>);
        define_service!(@method $mode, fetch_all_merchants,
            "Fetches every merchant, walking all pages.\n\n# Errors\n\nReturns the first page error.",
            -> Result<Vec<Merchant>>);
        define_service!(@method $mode, fetch_merchant,
            "Fetches a single merchant by ID.\n\n# Errors\n\nReturns an error if the merchant does not exist or the backend fails.",
            id: &MerchantId, -> Result<Merchant>);
        define_service!(@method $mode, add_merchant,
            "Creates a merchant and returns the stored record.\n\n# Errors\n\nReturns an error if the backend rejects the draft.",
            data: &MerchantFormData, -> Result<Merchant>);
        define_service!(@method $mode, update_merchant_by_id,
            "Replaces a merchant's editable fields and returns the stored record.\n\n# Errors\n\nReturns an error if the merchant does not exist or the backend rejects the draft.",
            id: &MerchantId, data: &MerchantFormData, -> Result<Merchant>);
        define_service!(@method $mode, remove_merchant,
            "Deletes a merchant.\n\n# Errors\n\nReturns an error if the merchant does not exist or the backend fails.",
            id: &MerchantId, -> Result<()>);
        define_service!(@method $mode, fetch_transactions,
            "Fetches a page of a merchant's transactions with the server-computed summary.\n\n# Errors\n\nReturns an error if the merchant does not exist or the backend fails.",
            id: &MerchantId, query: &TransactionQuery, -> Result<MerchantTransactions>);
    };

    // ── Blocking method renderer ────────────────────────────────────
    (@method blocking, $name:ident, $doc:expr,
     $($param:ident: $param_ty:ty,)* -> $ret:ty) => {
        #[doc = $doc]
        fn $name(&self $(, $param: $param_ty)*) -> $ret;
    };

    // ── Async method renderer (returns impl Future + Send) ──────────
    (@method async_mode, $name:ident, $doc:expr,
     $($param:ident: $param_ty:ty,)* -> $ret:ty) => {
        #[doc = $doc]
        fn $name(&self $(, $param: $param_ty)*)
            -> impl core::future::Future<Output = $ret> + Send;
    };
}

#[cfg(feature = "async")]
mod async_service {
    //! Async service trait definition and its HTTP implementation.

    use core::future::Future;

    use crate::client::MerchantApiClient;
    use crate::error::Result;
    use crate::models::{
        Merchant, MerchantFormData, MerchantId, MerchantPage, MerchantTransactions,
    };
    use crate::query::{MerchantQuery, TransactionQuery};

    define_service! {
        trait_name: MerchantService,
        trait_doc: "Async merchant backend driven by the dashboard controllers.\n\nAll methods take `&self`; implementations use interior mutability\n(e.g. `Mutex`) for thread-safe mutation.",
        mode: async_mode,
    }

    impl MerchantService for MerchantApiClient {
        #[inline]
        fn fetch_merchants(
            &self,
            query: &MerchantQuery,
        ) -> impl Future<Output = Result<MerchantPage>> + Send {
            self.list_merchants(query)
        }

        #[inline]
        fn fetch_all_merchants(&self) -> impl Future<Output = Result<Vec<Merchant>>> + Send {
            self.all_merchants()
        }

        #[inline]
        fn fetch_merchant(&self, id: &MerchantId) -> impl Future<Output = Result<Merchant>> + Send {
            self.merchant(id)
        }

        #[inline]
        fn add_merchant(
            &self,
            data: &MerchantFormData,
        ) -> impl Future<Output = Result<Merchant>> + Send {
            self.create_merchant(data)
        }

        #[inline]
        fn update_merchant_by_id(
            &self,
            id: &MerchantId,
            data: &MerchantFormData,
        ) -> impl Future<Output = Result<Merchant>> + Send {
            self.update_merchant(id, data)
        }

        #[inline]
        fn remove_merchant(&self, id: &MerchantId) -> impl Future<Output = Result<()>> + Send {
            self.delete_merchant(id)
        }

        #[inline]
        fn fetch_transactions(
            &self,
            id: &MerchantId,
            query: &TransactionQuery,
        ) -> impl Future<Output = Result<MerchantTransactions>> + Send {
            self.merchant_transactions(id, query)
        }
    }
}

#[cfg(feature = "blocking")]
mod blocking_service {
    //! Blocking service trait definition and its HTTP implementation.

    use crate::client::MerchantApiBlockingClient;
    use crate::error::Result;
    use crate::models::{
        Merchant, MerchantFormData, MerchantId, MerchantPage, MerchantTransactions,
    };
    use crate::query::{MerchantQuery, TransactionQuery};

    define_service! {
        trait_name: BlockingMerchantService,
        trait_doc: "Blocking merchant backend.\n\nAll methods take `&self`; implementations use interior mutability\n(e.g. `Mutex`) for thread-safe mutation.",
        mode: blocking,
    }

    impl BlockingMerchantService for MerchantApiBlockingClient {
        #[inline]
        fn fetch_merchants(&self, query: &MerchantQuery) -> Result<MerchantPage> {
            self.list_merchants(query)
        }

        #[inline]
        fn fetch_all_merchants(&self) -> Result<Vec<Merchant>> {
            self.all_merchants()
        }

        #[inline]
        fn fetch_merchant(&self, id: &MerchantId) -> Result<Merchant> {
            self.merchant(id)
        }

        #[inline]
        fn add_merchant(&self, data: &MerchantFormData) -> Result<Merchant> {
            self.create_merchant(data)
        }

        #[inline]
        fn update_merchant_by_id(&self, id: &MerchantId, data: &MerchantFormData) -> Result<Merchant> {
            self.update_merchant(id, data)
        }

        #[inline]
        fn remove_merchant(&self, id: &MerchantId) -> Result<()> {
            self.delete_merchant(id)
        }

        #[inline]
        fn fetch_transactions(
            &self,
            id: &MerchantId,
            query: &TransactionQuery,
        ) -> Result<MerchantTransactions> {
            self.merchant_transactions(id, query)
        }
    }
}

#[cfg(feature = "async")]
pub use async_service::MerchantService;
#[cfg(feature = "blocking")]
pub use blocking_service::BlockingMerchantService;
