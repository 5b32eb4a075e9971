// ── Query cache ──
//
// Keyed, type-erased storage for read results with per-query freshness.
// Fresh hits are served from memory; stale hits are served immediately
// while one background refetch replaces them; misses fetch inline, and
// concurrent misses on one key share a single fetch.
// Writes never patch entries, they only invalidate them.

pub mod key;

use std::any::Any;
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use dashmap::DashMap;
use dashmap::mapref::entry::Entry as Slot;
use futures::future::{BoxFuture, FutureExt, Shared};
use tokio::time::Instant;
use tokio_util::task::TaskTracker;
use tracing::{debug, trace, warn};

use crate::error::CoreError;

pub use key::QueryKey;

/// Result of a query that may be disabled by a missing parameter.
#[derive(Debug)]
pub enum QueryOutcome<T> {
    /// The query was not run: its parameter is absent or too short.
    Disabled,
    Ready(Arc<T>),
}

impl<T> QueryOutcome<T> {
    pub fn is_disabled(&self) -> bool {
        matches!(self, Self::Disabled)
    }

    pub fn into_data(self) -> Option<Arc<T>> {
        match self {
            Self::Disabled => None,
            Self::Ready(value) => Some(value),
        }
    }
}

struct Entry {
    value: Arc<dyn Any + Send + Sync>,
    fetched_at: Instant,
    /// Identifies this entry since it was last (re)inserted inline. A
    /// background refetch only lands on the generation it started from.
    generation: u64,
    refreshing: bool,
}

type Erased = Arc<dyn Any + Send + Sync>;

/// An inline fetch that later readers of the same key await.
type InFlight = Shared<BoxFuture<'static, Result<Erased, CoreError>>>;

/// Shared cache of query results.
pub struct QueryCache {
    entries: DashMap<QueryKey, Entry>,
    in_flight: DashMap<QueryKey, InFlight>,
    next_generation: AtomicU64,
    refreshes: TaskTracker,
}

impl Default for QueryCache {
    fn default() -> Self {
        Self {
            entries: DashMap::new(),
            in_flight: DashMap::new(),
            next_generation: AtomicU64::new(1),
            refreshes: TaskTracker::new(),
        }
    }
}

impl QueryCache {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Read `key`, fetching with `fetcher` when needed.
    ///
    /// - fresh entry: returned, `fetcher` is not called;
    /// - stale entry: returned, one background refetch is started unless
    ///   one is already running;
    /// - missing entry: `fetcher` runs inline, or not at all when a fetch
    ///   for `key` is already in flight; every caller gets that result.
    ///   Errors are returned and not cached.
    pub async fn fetch<T, F, Fut>(
        self: &Arc<Self>,
        key: QueryKey,
        stale_time: Duration,
        fetcher: F,
    ) -> Result<Arc<T>, CoreError>
    where
        T: Send + Sync + 'static,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, CoreError>> + Send + 'static,
    {
        let now = Instant::now();
        let cached = self.entries.get_mut(&key).and_then(|mut entry| {
            let value = Arc::clone(&entry.value).downcast::<T>().ok()?;
            let stale = now.duration_since(entry.fetched_at) >= stale_time;
            let refetch = stale && !entry.refreshing;
            if refetch {
                entry.refreshing = true;
            }
            Some((value, refetch.then_some(entry.generation)))
        });

        match cached {
            Some((value, None)) => {
                trace!(%key, "cache hit");
                Ok(value)
            }
            Some((value, Some(generation))) => {
                debug!(%key, "serving stale value, refetching");
                self.spawn_refetch(key, generation, fetcher());
                Ok(value)
            }
            None => self.fetch_inline(key, fetcher).await,
        }
    }

    async fn fetch_inline<T, F, Fut>(&self, key: QueryKey, fetcher: F) -> Result<Arc<T>, CoreError>
    where
        T: Send + Sync + 'static,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, CoreError>> + Send + 'static,
    {
        let load = match self.in_flight.entry(key.clone()) {
            Slot::Occupied(slot) => {
                debug!(%key, "cache miss, joining in-flight fetch");
                slot.get().clone()
            }
            Slot::Vacant(slot) => {
                debug!(%key, "cache miss");
                let fut = fetcher();
                let load = async move { fut.await.map(|value| -> Erased { Arc::new(value) }) }
                    .boxed()
                    .shared();
                slot.insert(load.clone());
                load
            }
        };

        let result = load.clone().await;

        // The first caller to finish publishes the value. An invalidation
        // while the fetch ran removes the slot, and nothing is published.
        let owner = self
            .in_flight
            .remove_if(&key, |_, running| running.ptr_eq(&load))
            .is_some();
        let value = result?
            .downcast::<T>()
            .map_err(|_| CoreError::Internal(format!("cached value type mismatch for {key}")))?;
        if owner {
            self.insert(key, Arc::clone(&value));
        }
        Ok(value)
    }

    fn insert<T: Send + Sync + 'static>(&self, key: QueryKey, value: Arc<T>) {
        let generation = self.next_generation.fetch_add(1, Ordering::Relaxed);
        self.entries.insert(
            key,
            Entry {
                value,
                fetched_at: Instant::now(),
                generation,
                refreshing: false,
            },
        );
    }

    fn spawn_refetch<T, Fut>(self: &Arc<Self>, key: QueryKey, generation: u64, fut: Fut)
    where
        T: Send + Sync + 'static,
        Fut: Future<Output = Result<T, CoreError>> + Send + 'static,
    {
        let cache = Arc::clone(self);
        self.refreshes.spawn(async move {
            let result = fut.await;
            let Some(mut entry) = cache.entries.get_mut(&key) else {
                debug!(%key, "entry invalidated during refetch, discarding");
                return;
            };
            if entry.generation != generation {
                debug!(%key, "entry replaced during refetch, discarding");
                return;
            }
            entry.refreshing = false;
            match result {
                Ok(value) => {
                    entry.value = Arc::new(value);
                    entry.fetched_at = Instant::now();
                }
                Err(e) => warn!(%key, error = %e, "background refetch failed"),
            }
        });
    }

    /// Cached value for `key`, regardless of freshness.
    pub fn peek<T: Send + Sync + 'static>(&self, key: &QueryKey) -> Option<Arc<T>> {
        let value = Arc::clone(&self.entries.get(key)?.value);
        value.downcast::<T>().ok()
    }

    /// Drop every entry under `prefix`. The next read fetches inline.
    /// Returns the number of entries dropped.
    pub fn invalidate(&self, prefix: &QueryKey) -> usize {
        self.in_flight.retain(|key, _| !key.starts_with(prefix));
        let before = self.entries.len();
        self.entries.retain(|key, _| !key.starts_with(prefix));
        let dropped = before.saturating_sub(self.entries.len());
        debug!(%prefix, dropped, "invalidated");
        dropped
    }

    pub fn clear(&self) {
        self.in_flight.clear();
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Wait for background refetches started so far.
    pub async fn settle(&self) {
        self.refreshes.close();
        self.refreshes.wait().await;
        self.refreshes.reopen();
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    fn counter_fetch(
        calls: &Arc<AtomicUsize>,
    ) -> impl FnOnce() -> std::pin::Pin<Box<dyn Future<Output = Result<usize, CoreError>> + Send>>
    {
        let calls = Arc::clone(calls);
        move || {
            Box::pin(async move { Ok(calls.fetch_add(1, Ordering::SeqCst) + 1) })
        }
    }

    fn vehicles_key() -> QueryKey {
        QueryKey::new(["fleet", "vehicles"])
    }

    #[tokio::test(start_paused = true)]
    async fn fresh_reads_do_not_refetch() {
        let cache = QueryCache::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let window = Duration::from_secs(60);

        for _ in 0..5 {
            let v = cache.fetch(vehicles_key(), window, counter_fetch(&calls)).await.unwrap();
            assert_eq!(*v, 1);
            tokio::time::advance(Duration::from_secs(10)).await;
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn stale_read_serves_old_value_and_refetches_once() {
        let cache = QueryCache::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let window = Duration::from_secs(30);

        cache.fetch(vehicles_key(), window, counter_fetch(&calls)).await.unwrap();
        tokio::time::advance(Duration::from_secs(31)).await;

        let stale = cache.fetch(vehicles_key(), window, counter_fetch(&calls)).await.unwrap();
        let again = cache.fetch(vehicles_key(), window, counter_fetch(&calls)).await.unwrap();
        assert_eq!((*stale, *again), (1, 1));

        cache.settle().await;
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        let fresh = cache.fetch(vehicles_key(), window, counter_fetch(&calls)).await.unwrap();
        assert_eq!(*fresh, 2);
    }

    #[tokio::test]
    async fn errors_are_not_cached() {
        let cache = QueryCache::new();
        let err = cache
            .fetch(vehicles_key(), Duration::from_secs(60), || async {
                Err::<usize, _>(CoreError::Timeout)
            })
            .await;
        assert!(err.is_err());
        assert!(cache.is_empty());

        let calls = Arc::new(AtomicUsize::new(0));
        let v = cache
            .fetch(vehicles_key(), Duration::from_secs(60), counter_fetch(&calls))
            .await
            .unwrap();
        assert_eq!(*v, 1);
    }

    fn slow_fetch(
        calls: &Arc<AtomicUsize>,
    ) -> impl FnOnce() -> std::pin::Pin<Box<dyn Future<Output = Result<usize, CoreError>> + Send>>
    {
        let calls = Arc::clone(calls);
        move || {
            Box::pin(async move {
                tokio::time::sleep(Duration::from_millis(50)).await;
                Ok(calls.fetch_add(1, Ordering::SeqCst) + 1)
            })
        }
    }

    #[tokio::test(start_paused = true)]
    async fn concurrent_misses_share_one_fetch() {
        let cache = QueryCache::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let window = Duration::from_secs(60);

        let (a, b) = tokio::join!(
            cache.fetch(vehicles_key(), window, slow_fetch(&calls)),
            cache.fetch(vehicles_key(), window, slow_fetch(&calls)),
        );
        assert_eq!((*a.unwrap(), *b.unwrap()), (1, 1));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(cache.len(), 1);

        let again = cache.fetch(vehicles_key(), window, slow_fetch(&calls)).await.unwrap();
        assert_eq!(*again, 1);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn concurrent_misses_share_one_failure() {
        let cache = QueryCache::new();
        let failing = || async {
            tokio::time::sleep(Duration::from_millis(50)).await;
            Err::<usize, _>(CoreError::Timeout)
        };
        let (a, b) = tokio::join!(
            cache.fetch(vehicles_key(), Duration::from_secs(60), failing),
            cache.fetch(vehicles_key(), Duration::from_secs(60), || async {
                Ok::<_, CoreError>(9_usize)
            }),
        );
        assert!(matches!(a, Err(CoreError::Timeout)));
        assert!(matches!(b, Err(CoreError::Timeout)));
        assert!(cache.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn invalidation_beats_inflight_refetch() {
        let cache = QueryCache::new();
        let window = Duration::from_secs(30);
        cache
            .fetch(vehicles_key(), window, || async { Ok::<_, CoreError>(1_usize) })
            .await
            .unwrap();
        tokio::time::advance(Duration::from_secs(31)).await;

        let (release, wait) = tokio::sync::oneshot::channel::<()>();
        let stale = cache
            .fetch(vehicles_key(), window, || async move {
                let _ = wait.await;
                Ok::<_, CoreError>(2_usize)
            })
            .await
            .unwrap();
        assert_eq!(*stale, 1);

        assert_eq!(cache.invalidate(&QueryKey::new(["fleet"])), 1);
        let fresh = cache
            .fetch(vehicles_key(), window, || async { Ok::<_, CoreError>(3_usize) })
            .await
            .unwrap();
        assert_eq!(*fresh, 3);

        release.send(()).unwrap();
        cache.settle().await;
        assert_eq!(*cache.peek::<usize>(&vehicles_key()).unwrap(), 3);
    }

    #[test]
    fn invalidate_matches_prefix_only() {
        let cache = QueryCache::default();
        cache.insert(key::drivers(), Arc::new(1_u8));
        cache.insert(key::driver_routes(7), Arc::new(2_u8));
        cache.insert(key::vehicles(), Arc::new(3_u8));

        assert_eq!(cache.invalidate(&key::drivers()), 2);
        assert!(cache.peek::<u8>(&key::vehicles()).is_some());
        assert!(cache.peek::<u8>(&key::drivers()).is_none());
    }
}
