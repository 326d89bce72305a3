//! Query cache with session gating, bounded retries, and the 401 teardown
//! sequence.

use std::num::NonZeroUsize;
use std::sync::Arc;

use futures::future::BoxFuture;
use lru::LruCache;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::sync::{RwLock, watch};
use tracing::{debug, trace, warn};

use backoffice_session::TokenStore;

use crate::config::QueryConfig;
use crate::error::{QueryError, RemoteError, Result};
use crate::key::QueryKey;

/// Outcome of a single logical fetch, shared with all waiters.
pub type FetchOutcome = std::result::Result<Value, RemoteError>;

/// Hook invoked after a 401 has torn the session down.
///
/// Receives a handle to the cache so the embedder's logout sequence can do
/// its own cleanup (e.g. drop the current-user entry) without a reference
/// cycle back into the cache.
pub type UnauthorizedHook = Arc<dyn Fn(QueryCache) -> BoxFuture<'static, ()> + Send + Sync>;

/// Status of a cached read.
///
/// An entry exists only once a fetch has started, so there is no idle
/// state; absence from the cache is the idle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryStatus {
    /// A fetch is in flight.
    Loading,
    /// The last fetch succeeded.
    Success,
    /// The last fetch failed terminally.
    Error,
}

/// Snapshot of a cache entry for callers and tests.
#[derive(Debug, Clone)]
pub struct QuerySnapshot {
    /// Current status.
    pub status: QueryStatus,

    /// Last successful value, if any.
    pub data: Option<Value>,

    /// Last terminal error, if any.
    pub error: Option<RemoteError>,

    /// Whether the entry has been marked stale.
    pub stale: bool,

    /// Retries consumed by the current fetch.
    pub retry_count: u32,
}

impl QuerySnapshot {
    /// Whether a fetch is in flight.
    pub fn is_loading(&self) -> bool {
        self.status == QueryStatus::Loading
    }

    /// Whether the last fetch failed terminally.
    pub fn is_error(&self) -> bool {
        self.status == QueryStatus::Error
    }
}

/// Entry stored in the cache.
struct QueryEntry {
    status: QueryStatus,
    data: Option<Value>,
    error: Option<RemoteError>,
    stale: bool,
    retry_count: u32,
    /// Generation of the fetch that owns this entry. Results arriving for
    /// an older generation (entry removed or restarted) are discarded.
    generation: u64,
    /// Channel waiters subscribe to while a fetch is in flight.
    inflight: Option<watch::Receiver<Option<FetchOutcome>>>,
}

/// Inner state protected by RwLock.
struct CacheInner {
    entries: LruCache<QueryKey, QueryEntry>,
    next_generation: u64,
}

/// Cache of authenticated remote reads.
///
/// The single chokepoint for session-gated reads:
/// - queries run only while a session token is present
/// - non-401 failures retry up to the configured budget
/// - a 401 invalidates and removes the entry, clears the token, and fires
///   the unauthorized hook, at most once per distinct observation
///
/// Thread-safe and cheap to clone; clones share one cache.
#[derive(Clone)]
pub struct QueryCache {
    inner: Arc<RwLock<CacheInner>>,
    session: Arc<dyn TokenStore>,
    on_unauthorized: Arc<parking_lot::RwLock<Option<UnauthorizedHook>>>,
    config: QueryConfig,
}

/// What `run` decided to do after inspecting the entry under the lock.
enum Plan {
    /// Fresh cached value.
    Hit(Value),
    /// Another caller's fetch is in flight; wait for its outcome.
    Wait(watch::Receiver<Option<FetchOutcome>>),
    /// This caller owns the fetch for the given generation.
    Fetch(watch::Sender<Option<FetchOutcome>>, u64),
}

impl QueryCache {
    /// Create a cache with default configuration.
    pub fn new(session: Arc<dyn TokenStore>) -> Self {
        Self::with_config(session, QueryConfig::default())
    }

    /// Create a cache with the given configuration.
    pub fn with_config(session: Arc<dyn TokenStore>, config: QueryConfig) -> Self {
        let cap = NonZeroUsize::new(config.max_entries).unwrap_or(NonZeroUsize::MIN);

        let inner = CacheInner {
            entries: LruCache::new(cap),
            next_generation: 1,
        };

        Self {
            inner: Arc::new(RwLock::new(inner)),
            session,
            on_unauthorized: Arc::new(parking_lot::RwLock::new(None)),
            config,
        }
    }

    /// Get the cache configuration.
    pub fn config(&self) -> &QueryConfig {
        &self.config
    }

    /// Install the hook that runs after a 401 has deauthenticated the
    /// session. Replaces any previous hook.
    pub fn set_unauthorized_hook(&self, hook: UnauthorizedHook) {
        *self.on_unauthorized.write() = Some(hook);
    }

    /// Get the current number of cached queries.
    pub async fn len(&self) -> usize {
        self.inner.read().await.entries.len()
    }

    /// Check if the cache is empty.
    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.entries.is_empty()
    }

    /// Run an authenticated read, decoding the cached JSON into `T`.
    ///
    /// Returns [`QueryError::Disabled`] without touching the cache or the
    /// network when no session token is present. The condition is
    /// level-triggered: the same call succeeds once a token appears.
    pub async fn run<T, F>(&self, key: &QueryKey, fetch: F) -> Result<T>
    where
        T: DeserializeOwned,
        F: Fn() -> BoxFuture<'static, FetchOutcome> + Send + Sync,
    {
        let value = self.run_value(key, &fetch).await?;
        serde_json::from_value(value).map_err(|e| QueryError::Decode(e.to_string()))
    }

    /// Populate the cache for a key ahead of use.
    ///
    /// Same fetch path as [`run`](Self::run), but the outcome is dropped
    /// and no loading state is reported to the caller.
    pub async fn prefetch<F>(&self, key: &QueryKey, fetch: F)
    where
        F: Fn() -> BoxFuture<'static, FetchOutcome> + Send + Sync,
    {
        if let Err(err) = self.run_value(key, &fetch).await {
            trace!(key = %key, error = %err, "Prefetch did not populate cache");
        }
    }

    /// Mark a cached entry stale. The next `run` for the key refetches
    /// instead of returning the cached value.
    pub async fn invalidate(&self, key: &QueryKey) {
        let mut inner = self.inner.write().await;
        if let Some(entry) = inner.entries.peek_mut(key) {
            entry.stale = true;
            debug!(key = %key, "Query invalidated");
        }
    }

    /// Mark every cached entry under the given key prefix stale.
    pub async fn invalidate_prefix(&self, prefix: &QueryKey) {
        let mut inner = self.inner.write().await;
        let mut count = 0;
        for (key, entry) in inner.entries.iter_mut() {
            if key.starts_with(prefix) {
                entry.stale = true;
                count += 1;
            }
        }
        if count > 0 {
            debug!(prefix = %prefix, count, "Query namespace invalidated");
        }
    }

    /// Drop a cached entry and any in-flight state for the key.
    ///
    /// A fetch still in flight keeps running for its waiters, but its
    /// result is discarded on arrival instead of repopulating the cache.
    pub async fn remove(&self, key: &QueryKey) {
        let mut inner = self.inner.write().await;
        if inner.entries.pop(key).is_some() {
            debug!(key = %key, "Query removed");
        }
    }

    /// Snapshot a cache entry without affecting LRU order.
    pub async fn snapshot(&self, key: &QueryKey) -> Option<QuerySnapshot> {
        let inner = self.inner.read().await;
        inner.entries.peek(key).map(|entry| QuerySnapshot {
            status: entry.status,
            data: entry.data.clone(),
            error: entry.error.clone(),
            stale: entry.stale,
            retry_count: entry.retry_count,
        })
    }

    async fn run_value<F>(&self, key: &QueryKey, fetch: &F) -> Result<Value>
    where
        F: Fn() -> BoxFuture<'static, FetchOutcome> + Send + Sync,
    {
        if !self.session.is_authenticated() {
            trace!(key = %key, "Query disabled: no active session");
            return Err(QueryError::Disabled);
        }

        let plan = {
            let mut inner = self.inner.write().await;

            let reusable = match inner.entries.get(key) {
                Some(entry) => {
                    if let Some(rx) = &entry.inflight {
                        trace!(key = %key, "Joining in-flight fetch");
                        Some(Plan::Wait(rx.clone()))
                    } else if entry.status == QueryStatus::Success && !entry.stale {
                        trace!(key = %key, "Query cache hit");
                        entry.data.clone().map(Plan::Hit)
                    } else {
                        None
                    }
                }
                None => None,
            };

            match reusable {
                Some(plan) => plan,
                None => self.start_fetch(&mut inner, key),
            }
        };

        match plan {
            Plan::Hit(value) => Ok(value),
            Plan::Wait(mut rx) => loop {
                {
                    let current = rx.borrow_and_update();
                    if let Some(outcome) = (*current).clone() {
                        return outcome.map_err(QueryError::from);
                    }
                }
                if rx.changed().await.is_err() {
                    return Err(QueryError::Remote(RemoteError::transport(
                        "query fetch aborted",
                    )));
                }
            },
            Plan::Fetch(tx, generation) => {
                let outcome = self.fetch_with_retry(key, fetch, generation).await;
                self.complete(key, generation, &outcome).await;
                let _ = tx.send(Some(outcome.clone()));
                outcome.map_err(QueryError::from)
            }
        }
    }

    /// Transition an entry to `Loading` under a fresh generation.
    /// Prior data is kept so a stale refetch does not blank the value.
    fn start_fetch(&self, inner: &mut CacheInner, key: &QueryKey) -> Plan {
        let generation = inner.next_generation;
        inner.next_generation += 1;

        let (tx, rx) = watch::channel(None);
        let prior = inner.entries.pop(key);
        let entry = QueryEntry {
            status: QueryStatus::Loading,
            data: prior.as_ref().and_then(|e| e.data.clone()),
            error: None,
            stale: prior.as_ref().map(|e| e.stale).unwrap_or(false),
            retry_count: 0,
            generation,
            inflight: Some(rx),
        };
        inner.entries.put(key.clone(), entry);

        debug!(key = %key, generation, "Query fetch started");
        Plan::Fetch(tx, generation)
    }

    async fn fetch_with_retry<F>(&self, key: &QueryKey, fetch: &F, generation: u64) -> FetchOutcome
    where
        F: Fn() -> BoxFuture<'static, FetchOutcome> + Send + Sync,
    {
        let mut attempt: u32 = 0;
        loop {
            match fetch().await {
                Ok(value) => return Ok(value),
                // 401 is a session-invalid signal, not a transient fault.
                Err(err) if err.is_unauthorized() => return Err(err),
                Err(err) => {
                    if attempt >= self.config.retries {
                        return Err(err);
                    }
                    attempt += 1;

                    {
                        let mut inner = self.inner.write().await;
                        if let Some(entry) = inner.entries.peek_mut(key) {
                            if entry.generation == generation {
                                entry.retry_count = attempt;
                            }
                        }
                    }

                    debug!(key = %key, attempt, error = %err, "Retrying query fetch");
                    tokio::time::sleep(self.config.retry_delay * attempt).await;
                }
            }
        }
    }

    /// Record a fetch outcome.
    ///
    /// The 401 reaction (invalidate, remove, deauthenticate) runs inside a
    /// single write-lock section, so concurrent 401s cannot resurrect a
    /// stale entry or tear the session down twice; the unauthorized hook
    /// fires only for the reaction that actually cleared the token.
    async fn complete(&self, key: &QueryKey, generation: u64, outcome: &FetchOutcome) {
        let mut fire_hook = false;
        {
            let mut inner = self.inner.write().await;

            let current = inner.entries.peek(key).map(|e| e.generation);
            if current != Some(generation) {
                debug!(key = %key, generation, "Discarding fetch result for removed query");
                return;
            }

            match outcome {
                Ok(value) => {
                    if let Some(entry) = inner.entries.peek_mut(key) {
                        entry.status = QueryStatus::Success;
                        entry.data = Some(value.clone());
                        entry.error = None;
                        entry.stale = false;
                        entry.inflight = None;
                    }
                    trace!(key = %key, "Query fetch succeeded");
                }
                Err(err) if err.is_unauthorized() => {
                    if self.session.is_authenticated() {
                        debug!(key = %key, "Unauthorized response: tearing down session");
                        if let Some(entry) = inner.entries.peek_mut(key) {
                            entry.stale = true;
                        }
                        inner.entries.pop(key);
                        if let Err(err) = self.session.clear() {
                            warn!(error = %err, "Failed to clear session token");
                        }
                        fire_hook = true;
                    } else {
                        // Another read already tore the session down; this
                        // is cleanup only.
                        debug!(key = %key, "Unauthorized response with no session: dropping entry");
                        inner.entries.pop(key);
                    }
                }
                Err(err) => {
                    if let Some(entry) = inner.entries.peek_mut(key) {
                        entry.status = QueryStatus::Error;
                        entry.error = Some(err.clone());
                        entry.inflight = None;
                    }
                    debug!(key = %key, error = %err, "Query fetch failed");
                }
            }
        }

        if fire_hook {
            let hook = self.on_unauthorized.read().clone();
            if let Some(hook) = hook {
                hook(self.clone()).await;
            }
        }
    }
}
