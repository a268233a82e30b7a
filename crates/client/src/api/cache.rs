//! Tag-aware request/response cache.
//!
//! Entries are keyed by `(endpoint, serialized args)` and carry the tag set
//! their endpoint provides. Mutations invalidate by tag: every entry whose
//! tags intersect the mutation's declared set is marked stale, and stale
//! entries with live subscribers are refetched immediately, in deterministic
//! key order. Entries are replaced wholesale - a reader never observes a
//! partially-updated response.
//!
//! Nothing in this cache is ever persisted, and a session boundary drops the
//! whole thing via [`QueryCache::reset`].

use std::collections::BTreeSet;
use std::sync::Arc;

use dashmap::DashMap;
use tracing::debug;

use crate::error::ApiError;

use super::endpoints::{ApiRequest, QueryKey, Tag};
use super::response::{ApiData, parse_response};
use super::transport::Transport;

/// Status of a cache entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryStatus {
    /// A request for this key is in flight.
    Loading,
    /// The last request succeeded; `data` holds the response.
    Success,
    /// The last request failed; `error` holds the failure, `data` may still
    /// hold the previous successful response for display.
    Error,
}

/// One cached response.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// The request that produced (and can reproduce) this entry.
    pub request: ApiRequest,
    /// Current status.
    pub status: QueryStatus,
    /// Last successful response, retained across reloads and failures so the
    /// UI can keep rendering the previous snapshot.
    pub data: Option<ApiData>,
    /// Error from the most recent failed request.
    pub error: Option<ApiError>,
    /// Tags this entry provides.
    pub tags: &'static [Tag],
    /// Whether a mutation has invalidated this entry since it was fetched.
    pub stale: bool,
}

/// Tag-aware cache over the remote API.
pub struct QueryCache {
    transport: Arc<dyn Transport>,
    entries: DashMap<QueryKey, CacheEntry>,
    tag_index: DashMap<Tag, BTreeSet<QueryKey>>,
    subscribers: Arc<DashMap<QueryKey, usize>>,
}

impl QueryCache {
    /// Create an empty cache over the given transport.
    #[must_use]
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            entries: DashMap::new(),
            tag_index: DashMap::new(),
            subscribers: Arc::new(DashMap::new()),
        }
    }

    /// Fetch a query endpoint, serving a fresh cached response when one
    /// exists.
    ///
    /// Idempotent per key: identical requests share one entry. A stale or
    /// errored entry re-executes; a fresh `Success` entry short-circuits.
    ///
    /// # Errors
    ///
    /// Propagates transport and parsing failures; the entry records the
    /// error and keeps the previous data snapshot, and no retry is attempted.
    pub async fn fetch(
        &self,
        req: &ApiRequest,
        access_token: Option<&str>,
    ) -> Result<ApiData, ApiError> {
        debug_assert!(req.endpoint().is_query(), "fetch() takes query endpoints");
        let key = req.cache_key();

        if let Some(entry) = self.entries.get(&key)
            && entry.status == QueryStatus::Success
            && !entry.stale
            && let Some(data) = entry.data.clone()
        {
            debug!(key = %key, "cache hit");
            return Ok(data);
        }

        self.load(key, req.clone(), access_token).await
    }

    /// Execute a mutation, then invalidate its declared tag set.
    ///
    /// Invalidation runs only after a successful mutation; a failed mutation
    /// leaves every cache entry untouched.
    ///
    /// # Errors
    ///
    /// Propagates transport and parsing failures from the mutation itself.
    /// Refetch failures during invalidation are logged, not propagated - the
    /// affected entries simply stay stale.
    pub async fn mutate(
        &self,
        req: &ApiRequest,
        access_token: Option<&str>,
    ) -> Result<ApiData, ApiError> {
        let data = self.execute(req, access_token).await?;

        let tags = req.endpoint().invalidates();
        if !tags.is_empty() {
            self.invalidate(tags, access_token).await;
        }

        Ok(data)
    }

    /// Mark every entry whose tags intersect `tags` as stale and refetch the
    /// ones with live subscribers.
    ///
    /// Refetches run sequentially in sorted key order, so two invalidations
    /// of the same endpoint are observed in invalidation order. No ordering
    /// holds across *different* endpoints.
    pub async fn invalidate(&self, tags: &[Tag], access_token: Option<&str>) {
        // Affected keys, deterministically ordered
        let mut keys: BTreeSet<QueryKey> = BTreeSet::new();
        for tag in tags {
            if let Some(set) = self.tag_index.get(tag) {
                keys.extend(set.iter().cloned());
            }
        }

        let mut refetch: Vec<(QueryKey, ApiRequest)> = Vec::new();
        for key in keys {
            if let Some(mut entry) = self.entries.get_mut(&key) {
                entry.stale = true;
                debug!(key = %key, "entry invalidated");
                if self.subscriber_count(&key) > 0 {
                    refetch.push((key.clone(), entry.request.clone()));
                }
            }
        }

        for (key, req) in refetch {
            if let Err(e) = self.load(key.clone(), req, access_token).await {
                debug!(key = %key, error = %e, "refetch after invalidation failed");
            }
        }
    }

    /// Drop every entry, tag mapping, and subscriber count.
    ///
    /// Called by the session boundary so that no response cached for one user
    /// is ever servable to another.
    pub fn reset(&self) {
        let dropped = self.entries.len();
        self.entries.clear();
        self.tag_index.clear();
        self.subscribers.clear();
        debug!(entries = dropped, "cache reset");
    }

    /// Register interest in a query key.
    ///
    /// While at least one subscription for a key is alive, invalidating that
    /// key triggers an immediate refetch instead of a lazy one.
    #[must_use]
    pub fn subscribe(&self, req: &ApiRequest) -> Subscription {
        let key = req.cache_key();
        *self.subscribers.entry(key.clone()).or_insert(0) += 1;
        Subscription {
            key,
            subscribers: Arc::clone(&self.subscribers),
        }
    }

    /// Snapshot of the entry for a request, if one exists.
    #[must_use]
    pub fn entry(&self, req: &ApiRequest) -> Option<CacheEntry> {
        self.entries.get(&req.cache_key()).map(|e| e.clone())
    }

    /// Number of cached entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn subscriber_count(&self, key: &QueryKey) -> usize {
        self.subscribers.get(key).map_or(0, |count| *count)
    }

    /// Execute a request through the transport and validate the response.
    async fn execute(
        &self,
        req: &ApiRequest,
        access_token: Option<&str>,
    ) -> Result<ApiData, ApiError> {
        let value = self.transport.send(req, access_token).await?;
        parse_response(req.endpoint(), value)
    }

    /// Run a query and record the outcome, replacing the entry wholesale.
    async fn load(
        &self,
        key: QueryKey,
        req: ApiRequest,
        access_token: Option<&str>,
    ) -> Result<ApiData, ApiError> {
        let prior = self.entries.get(&key).and_then(|e| e.data.clone());
        let tags = req.endpoint().provides();

        self.entries.insert(
            key.clone(),
            CacheEntry {
                request: req.clone(),
                status: QueryStatus::Loading,
                data: prior.clone(),
                error: None,
                tags,
                stale: false,
            },
        );

        match self.execute(&req, access_token).await {
            Ok(data) => {
                self.entries.insert(
                    key.clone(),
                    CacheEntry {
                        request: req,
                        status: QueryStatus::Success,
                        data: Some(data.clone()),
                        error: None,
                        tags,
                        stale: false,
                    },
                );
                for tag in tags {
                    self.tag_index.entry(*tag).or_default().insert(key.clone());
                }
                Ok(data)
            }
            Err(err) => {
                self.entries.insert(
                    key,
                    CacheEntry {
                        request: req,
                        status: QueryStatus::Error,
                        data: prior,
                        error: Some(err.clone()),
                        tags,
                        stale: false,
                    },
                );
                Err(err)
            }
        }
    }
}

/// RAII guard registering interest in a query key.
///
/// Dropping the guard decrements the subscriber count; a key with no
/// subscribers is still cached but no longer refetched eagerly.
pub struct Subscription {
    key: QueryKey,
    subscribers: Arc<DashMap<QueryKey, usize>>,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        let now_zero = self
            .subscribers
            .get_mut(&self.key)
            .is_some_and(|mut count| {
                *count = count.saturating_sub(1);
                *count == 0
            });
        if now_zero {
            self.subscribers.remove_if(&self.key, |_, count| *count == 0);
        }
    }
}
