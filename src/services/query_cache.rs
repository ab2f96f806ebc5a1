//! Process-wide query cache with staleness windows and request de-duplication.
//!
//! Each key maps to the last good value, when it was fetched, the last fetch
//! error and the fetch currently in flight. Concurrent callers for a key await
//! the same shared future. Only the caller that settles that future writes
//! the outcome back, so every key has a single writer per fetch.

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::hash::Hash;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use futures::future::{BoxFuture, FutureExt, Shared};
use tokio::time::Instant;

use crate::errors::FetchError;

type SharedFetch<V> = Shared<BoxFuture<'static, Result<V, FetchError>>>;

struct Entry<V> {
    value: Option<V>,
    fetched_at: Option<Instant>,
    invalidated: bool,
    last_error: Option<FetchError>,
    in_flight: Option<SharedFetch<V>>,
}

impl<V> Entry<V> {
    fn empty() -> Self {
        Self {
            value: None,
            fetched_at: None,
            invalidated: false,
            last_error: None,
            in_flight: None,
        }
    }

    fn fresh_value(&self, stale_after: Duration) -> Option<&V> {
        match (&self.value, self.fetched_at) {
            (Some(value), Some(at)) if !self.invalidated && at.elapsed() < stale_after => {
                Some(value)
            }
            _ => None,
        }
    }
}

/// Point-in-time view of one cache entry.
#[derive(Debug, Clone)]
pub struct QueryState<V> {
    /// Last successfully fetched value, kept across later failures.
    pub data: Option<V>,
    /// Error of the most recent fetch, cleared by the next success.
    pub error: Option<FetchError>,
    pub is_fetching: bool,
}

impl<V> QueryState<V> {
    /// True once at least one fetch for the key has completed.
    pub fn has_settled(&self) -> bool {
        self.data.is_some() || self.error.is_some()
    }
}

pub struct QueryCache<K, V> {
    entries: Mutex<HashMap<K, Entry<V>>>,
}

impl<K, V> QueryCache<K, V>
where
    K: Eq + Hash + Clone + fmt::Debug + Send + Sync,
    V: Clone + Send + Sync + 'static,
{
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Return the cached value for `key` if younger than `stale_after`,
    /// otherwise join the in-flight fetch or start one with `fetcher`.
    pub async fn fetch<F, Fut>(
        &self,
        key: K,
        stale_after: Duration,
        fetcher: F,
    ) -> Result<V, FetchError>
    where
        F: FnOnce() -> Fut + Send,
        Fut: Future<Output = Result<V, FetchError>> + Send + 'static,
    {
        let pending = {
            let mut entries = self.lock();
            let entry = entries.entry(key.clone()).or_insert_with(Entry::empty);

            if let Some(value) = entry.fresh_value(stale_after) {
                tracing::debug!(?key, "Query cache hit");
                return Ok(value.clone());
            }

            match entry.in_flight.clone() {
                Some(in_flight) => {
                    tracing::debug!(?key, "Joining in-flight fetch");
                    in_flight
                }
                None => {
                    tracing::debug!(?key, "Query cache miss, fetching");
                    let started = fetcher().boxed().shared();
                    entry.in_flight = Some(started.clone());
                    started
                }
            }
        };

        let outcome = pending.clone().await;
        self.settle(&key, &pending, &outcome);
        outcome
    }

    /// Snapshot of the entry for `key` without triggering a fetch.
    pub fn state(&self, key: &K) -> QueryState<V> {
        let entries = self.lock();
        match entries.get(key) {
            Some(entry) => QueryState {
                data: entry.value.clone(),
                error: entry.last_error.clone(),
                is_fetching: entry.in_flight.is_some(),
            },
            None => QueryState {
                data: None,
                error: None,
                is_fetching: false,
            },
        }
    }

    /// Mark `key` stale. Its value stays readable until a refetch replaces it.
    pub fn invalidate(&self, key: &K) {
        if let Some(entry) = self.lock().get_mut(key) {
            entry.invalidated = true;
        }
    }

    pub fn invalidate_all(&self) {
        for entry in self.lock().values_mut() {
            entry.invalidated = true;
        }
    }

    fn settle(&self, key: &K, pending: &SharedFetch<V>, outcome: &Result<V, FetchError>) {
        let mut entries = self.lock();
        let Some(entry) = entries.get_mut(key) else {
            return;
        };

        // Another waiter on the same fetch already wrote it back.
        let owns_fetch = entry
            .in_flight
            .as_ref()
            .is_some_and(|in_flight| in_flight.ptr_eq(pending));
        if !owns_fetch {
            return;
        }

        entry.in_flight = None;
        match outcome {
            Ok(value) => {
                entry.value = Some(value.clone());
                entry.fetched_at = Some(Instant::now());
                entry.invalidated = false;
                entry.last_error = None;
            }
            Err(e) => {
                tracing::warn!(
                    ?key,
                    error = %e,
                    has_fallback = entry.value.is_some(),
                    "Fetch failed"
                );
                entry.last_error = Some(e.clone());
            }
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<K, Entry<V>>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<K, V> Default for QueryCache<K, V>
where
    K: Eq + Hash + Clone + fmt::Debug + Send + Sync,
    V: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> fmt::Debug for QueryCache<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let entries = self
            .entries
            .lock()
            .map(|entries| entries.len())
            .unwrap_or_default();
        f.debug_struct("QueryCache")
            .field("entries", &entries)
            .finish()
    }
}
