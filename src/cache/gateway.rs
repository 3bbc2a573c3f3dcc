//! In-process response cache for upstream provider calls
//!
//! A payload fetched for a key is served again, without an outbound call,
//! until it is older than the TTL the caller asks for. Failed fetches never
//! touch the cache.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, instrument, warn};

use crate::{clock::Clock, error::AppResult, routes::metrics};

/// Entry in the gateway cache
struct CacheEntry<V> {
    payload: V,
    fetched_at: DateTime<Utc>,
    /// TTL of the write that produced this entry, used by sweeps
    ttl: Duration,
    last_access: AtomicU64,
}

impl<V> CacheEntry<V> {
    fn is_fresh(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        // A clock that moved backwards yields a negative age; count it as zero.
        let age = now
            .signed_duration_since(self.fetched_at)
            .to_std()
            .unwrap_or(Duration::ZERO);
        age < ttl
    }
}

/// Response cache shared by all request handlers
///
/// # Thread Safety
///
/// Entries live in a `DashMap`, so concurrent reads and writes to different
/// keys never block each other. Two tasks missing the same key at the same
/// time will both fetch; the last one to finish owns the slot.
///
/// # Memory
///
/// With `max_entries > 0`, an insert that pushes the cache over capacity
/// first drops entries past their own TTL, then evicts the least recently
/// used ones.
pub struct GatewayCache<V> {
    entries: DashMap<String, CacheEntry<V>>,
    clock: Arc<dyn Clock>,
    max_entries: usize,
    access_counter: AtomicU64,
}

impl<V> GatewayCache<V>
where
    V: Clone + Send + Sync + 'static,
{
    /// Create a cache; `max_entries == 0` means unbounded
    pub fn new(clock: Arc<dyn Clock>, max_entries: usize) -> Self {
        Self {
            entries: DashMap::new(),
            clock,
            max_entries,
            access_counter: AtomicU64::new(0),
        }
    }

    /// Return the cached payload for `key` if it is younger than `ttl`,
    /// otherwise run `fetcher`, cache its result and return it.
    ///
    /// Errors from `fetcher` are returned unchanged and nothing is written.
    /// If the returned future is dropped before `fetcher` resolves, nothing
    /// is written either.
    #[instrument(skip(self, fetcher), fields(key = %key, ttl_secs = ttl.as_secs()))]
    pub async fn fetch_resource<F, Fut>(&self, key: &str, ttl: Duration, fetcher: F) -> AppResult<V>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = AppResult<V>>,
    {
        if let Some(payload) = self.lookup(key, ttl) {
            debug!("Cache hit");
            metrics::record_cache_operation("hit");
            return Ok(payload);
        }

        debug!("Cache miss, fetching from upstream");

        let payload = match fetcher().await {
            Ok(payload) => payload,
            Err(e) => {
                warn!(error = %e, "Upstream fetch failed, nothing cached");
                metrics::record_cache_operation("error");
                return Err(e);
            }
        };

        metrics::record_cache_operation("miss");
        self.store(key, payload.clone(), ttl);

        Ok(payload)
    }

    /// Remove a key regardless of its age
    pub fn invalidate(&self, key: &str) -> bool {
        let removed = self.entries.remove(key).is_some();
        metrics::set_cache_entries(self.entries.len());
        removed
    }

    /// Drop every entry older than the TTL it was written with
    ///
    /// Returns the number of removed entries.
    pub fn sweep_expired(&self) -> usize {
        let now = self.clock.now();
        let before = self.entries.len();
        self.entries.retain(|_, entry| entry.is_fresh(now, entry.ttl));
        let removed = before.saturating_sub(self.entries.len());
        metrics::set_cache_entries(self.entries.len());
        removed
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Periodically sweep expired entries
    ///
    /// The task holds only a weak reference and stops once the cache is dropped.
    pub fn spawn_sweeper(self: &Arc<Self>, every: Duration) -> JoinHandle<()> {
        let cache: Weak<Self> = Arc::downgrade(self);

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first tick completes immediately.
            ticker.tick().await;

            loop {
                ticker.tick().await;
                let Some(cache) = cache.upgrade() else {
                    debug!("Gateway cache dropped, stopping sweeper");
                    break;
                };
                let removed = cache.sweep_expired();
                if removed > 0 {
                    debug!(removed, remaining = cache.len(), "Swept expired cache entries");
                }
            }
        })
    }

    fn lookup(&self, key: &str, ttl: Duration) -> Option<V> {
        let now = self.clock.now();
        let entry = self.entries.get(key)?;

        if !entry.is_fresh(now, ttl) {
            return None;
        }

        entry.last_access.store(self.next_tick(), Ordering::Relaxed);
        Some(entry.payload.clone())
    }

    fn store(&self, key: &str, payload: V, ttl: Duration) {
        let entry = CacheEntry {
            payload,
            fetched_at: self.clock.now(),
            ttl,
            last_access: AtomicU64::new(self.next_tick()),
        };
        self.entries.insert(key.to_string(), entry);

        if self.max_entries > 0 && self.entries.len() > self.max_entries {
            self.enforce_capacity();
        }

        metrics::set_cache_entries(self.entries.len());
    }

    fn enforce_capacity(&self) {
        let swept = self.sweep_expired();
        let mut evicted = 0usize;

        while self.entries.len() > self.max_entries {
            let victim = self
                .entries
                .iter()
                .min_by_key(|entry| entry.last_access.load(Ordering::Relaxed))
                .map(|entry| entry.key().clone());

            match victim {
                Some(key) => {
                    self.entries.remove(&key);
                    evicted += 1;
                }
                None => break,
            }
        }

        debug!(swept, evicted, max_entries = self.max_entries, "Cache over capacity");
    }

    fn next_tick(&self) -> u64 {
        self.access_counter.fetch_add(1, Ordering::Relaxed)
    }
}
