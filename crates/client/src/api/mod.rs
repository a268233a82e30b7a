//! Remote cache layer: the only subsystem that talks to the network.
//!
//! # Architecture
//!
//! - [`endpoints`] declares every backend operation, its HTTP shape, and the
//!   bipartite tag graph (reads *provide* tags, writes *invalidate* them)
//! - [`transport`] carries a typed request to the backend and returns raw JSON
//! - [`response`] validates raw JSON into typed [`ApiData`]
//! - [`cache`] keys validated responses by `(endpoint, args)` and applies
//!   tag invalidation
//!
//! The stores above this module never see JSON, status codes, or staleness -
//! only typed data and [`crate::error::ApiError`].

pub mod cache;
pub mod endpoints;
pub mod response;
pub mod transport;

pub use cache::{CacheEntry, QueryCache, QueryStatus, Subscription};
pub use endpoints::{ApiRequest, EndpointId, HttpMethod, QueryKey, Tag, invalidated_endpoints};
pub use response::{ApiData, parse_response};
pub use transport::{HttpTransport, Transport};
