//! SuperLian client - state synchronization for the storefront.
//!
//! This crate mirrors a remote commerce backend into local state and keeps
//! the two coherent:
//!
//! - [`api`] - the remote cache layer: typed endpoints, a tag-invalidated
//!   response cache, and the HTTP transport (the only code that touches the
//!   network)
//! - [`store`] - session, catalog, and wishlist stores over an injected
//!   persistence port
//! - [`filter`] - pure filter/pagination derivation over the product list
//! - [`checkout`] - display totals and order assembly
//! - [`debounce`] - the cancellable timer behind debounced search
//! - [`notify`] - transient user-facing notices
//! - [`Storefront`] - the facade tying it together, including the session
//!   boundary (login/logout/registration reset everything atomically)
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use superlian_client::{MemoryStorage, StoreConfig, Storefront};
//!
//! let config = StoreConfig::from_env()?;
//! let store = Storefront::new(&config, Arc::new(MemoryStorage::new()))?;
//!
//! store.login("ada@example.com", "hunter22").await?;
//! let products = store.load_products().await?;
//! let cart = store.add_to_cart(item).await?; // refetched, never computed
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod checkout;
pub mod client;
pub mod config;
pub mod debounce;
pub mod error;
pub mod filter;
pub mod notify;
pub mod store;
pub mod validate;

pub use api::{ApiData, ApiRequest, EndpointId, QueryCache, QueryStatus, Subscription, Tag,
    Transport};
pub use checkout::{AddressChoice, AddressForm, CardDetails, CheckoutForm, OrderTotals,
    PaymentMethod};
pub use client::Storefront;
pub use config::{ConfigError, StoreConfig};
pub use debounce::{CancelToken, Debouncer, SearchDebouncer};
pub use error::ApiError;
pub use filter::{FilterCriteria, PRODUCTS_PER_PAGE, ProductPage, derive, derive_page};
pub use notify::{Notice, NoticeLevel, Notifier};
pub use store::{CatalogSnapshot, CatalogStore, FileStorage, MemoryStorage, SessionStore,
    StoragePort, WishlistStore};
