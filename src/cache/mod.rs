//! Per-region series cache with fetch coalescing.
//!
//! The first miss for a key registers a shared in-flight fetch before the
//! fetch starts; concurrent callers for that key await the same future and
//! receive the same outcome. The map lock is only held to look up or
//! register a slot, so fetches for different keys run in parallel.
//!
//! A completed entry is served as-is until it expires, is evicted to stay
//! within capacity, or is invalidated explicitly. Failed fetches leave the
//! key absent.

pub mod provider;

pub use provider::CachedSeriesProvider;

use futures_util::future::{BoxFuture, FutureExt, Shared};
use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::config::CacheConfig;
use crate::error::Result;
use crate::metrics::Metrics;
use crate::models::{Region, SeriesName, SeriesTable};

type SharedFetch = Shared<BoxFuture<'static, Result<Arc<SeriesTable>>>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct CacheKey {
    region: Region,
    series: SeriesName,
}

enum Slot {
    Ready {
        table: Arc<SeriesTable>,
        inserted_at: Instant,
    },
    InFlight {
        id: u64,
        fetch: SharedFetch,
    },
}

enum Lookup {
    Hit(Arc<SeriesTable>),
    Join(SharedFetch),
    Miss,
}

struct CacheInner {
    entries: Mutex<HashMap<CacheKey, Slot>>,
    config: CacheConfig,
    next_id: AtomicU64,
    metrics: Option<Arc<Metrics>>,
}

#[derive(Clone)]
pub struct SeriesCache {
    inner: Arc<CacheInner>,
}

impl SeriesCache {
    pub fn new(config: CacheConfig) -> Self {
        Self::build(config, None)
    }

    pub fn with_metrics(config: CacheConfig, metrics: Arc<Metrics>) -> Self {
        Self::build(config, Some(metrics))
    }

    fn build(config: CacheConfig, metrics: Option<Arc<Metrics>>) -> Self {
        Self {
            inner: Arc::new(CacheInner {
                entries: Mutex::new(HashMap::new()),
                config,
                next_id: AtomicU64::new(0),
                metrics,
            }),
        }
    }

    /// Return the cached table for (`region`, `series`), invoking `fetch`
    /// only if no completed or in-flight entry exists for that key.
    pub async fn get_or_fetch<F, Fut>(
        &self,
        region: Region,
        series: SeriesName,
        fetch: F,
    ) -> Result<Arc<SeriesTable>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<SeriesTable>> + Send + 'static,
    {
        let key = CacheKey { region, series };

        let shared = {
            let mut entries = self.inner.entries.lock().await;
            let lookup = match entries.get(&key) {
                Some(Slot::Ready { table, inserted_at })
                    if !self.inner.is_expired(*inserted_at) =>
                {
                    Lookup::Hit(table.clone())
                }
                Some(Slot::InFlight { fetch, .. }) => Lookup::Join(fetch.clone()),
                _ => Lookup::Miss,
            };

            match lookup {
                Lookup::Hit(table) => {
                    self.inner.record(|m| m.cache_hits_total.inc());
                    debug!(region = %region, series = %series, "Series cache hit");
                    return Ok(table);
                }
                Lookup::Join(shared) => {
                    self.inner.record(|m| m.cache_coalesced_total.inc());
                    debug!(region = %region, series = %series, "Joining in-flight series fetch");
                    shared
                }
                Lookup::Miss => {
                    self.inner.record(|m| {
                        m.cache_misses_total.inc();
                        m.series_fetches_total.inc();
                    });
                    debug!(region = %region, series = %series, "Series cache miss, fetching");

                    let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
                    let pending = fetch();
                    let inner = Arc::clone(&self.inner);
                    let shared = async move {
                        let outcome = pending.await.map(Arc::new);
                        inner.complete(key, id, &outcome).await;
                        outcome
                    }
                    .boxed()
                    .shared();

                    entries.insert(
                        key,
                        Slot::InFlight {
                            id,
                            fetch: shared.clone(),
                        },
                    );
                    shared
                }
            }
        };

        shared.await
    }

    /// True if a completed, unexpired entry exists for the key.
    pub async fn contains(&self, region: Region, series: SeriesName) -> bool {
        let entries = self.inner.entries.lock().await;
        matches!(
            entries.get(&CacheKey { region, series }),
            Some(Slot::Ready { inserted_at, .. }) if !self.inner.is_expired(*inserted_at)
        )
    }

    /// Number of completed entries, expired ones included until purged.
    pub async fn len(&self) -> usize {
        let entries = self.inner.entries.lock().await;
        entries
            .values()
            .filter(|slot| matches!(slot, Slot::Ready { .. }))
            .count()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Drop one key. An in-flight fetch for it still completes for its
    /// current waiters but is not stored.
    pub async fn invalidate(&self, region: Region, series: SeriesName) -> bool {
        let mut entries = self.inner.entries.lock().await;
        entries.remove(&CacheKey { region, series }).is_some()
    }

    /// Drop every key of `region`, returning how many were removed.
    pub async fn invalidate_region(&self, region: Region) -> usize {
        let mut entries = self.inner.entries.lock().await;
        let before = entries.len();
        entries.retain(|key, _| key.region != region);
        let removed = before - entries.len();
        info!(region = %region, removed, "Invalidated region in series cache");
        removed
    }

    pub async fn clear(&self) {
        let mut entries = self.inner.entries.lock().await;
        entries.clear();
    }
}

impl CacheInner {
    fn is_expired(&self, inserted_at: Instant) -> bool {
        self.config
            .ttl
            .is_some_and(|ttl| inserted_at.elapsed() >= ttl)
    }

    fn record(&self, f: impl FnOnce(&Metrics)) {
        if let Some(metrics) = &self.metrics {
            f(metrics);
        }
    }

    /// Settle the in-flight slot `id` for `key`. A slot replaced or
    /// invalidated while the fetch ran is left alone.
    async fn complete(&self, key: CacheKey, id: u64, outcome: &Result<Arc<SeriesTable>>) {
        let mut entries = self.entries.lock().await;
        let current = matches!(
            entries.get(&key),
            Some(Slot::InFlight { id: slot_id, .. }) if *slot_id == id
        );
        if !current {
            return;
        }

        match outcome {
            Ok(table) => {
                entries.insert(
                    key,
                    Slot::Ready {
                        table: Arc::clone(table),
                        inserted_at: Instant::now(),
                    },
                );
                self.enforce_bounds(&mut entries);
            }
            Err(e) => {
                entries.remove(&key);
                self.record(|m| {
                    m.series_fetch_failures_total
                        .with_label_values(&[e.kind()])
                        .inc()
                });
                warn!(
                    region = %key.region,
                    series = %key.series,
                    error = %e,
                    "Series fetch failed, nothing cached"
                );
            }
        }
    }

    fn enforce_bounds(&self, entries: &mut HashMap<CacheKey, Slot>) {
        if self.config.ttl.is_some() {
            let before = entries.len();
            entries.retain(|_, slot| match slot {
                Slot::Ready { inserted_at, .. } => !self.is_expired(*inserted_at),
                Slot::InFlight { .. } => true,
            });
            let purged = before - entries.len();
            if purged > 0 {
                self.record(|m| m.cache_evictions_total.inc_by(purged as u64));
                debug!(purged, "Purged expired series cache entries");
            }
        }

        let Some(max_entries) = self.config.max_entries else {
            return;
        };
        while entries.len() > max_entries {
            let oldest = entries
                .iter()
                .filter_map(|(key, slot)| match slot {
                    Slot::Ready { inserted_at, .. } => Some((*key, *inserted_at)),
                    Slot::InFlight { .. } => None,
                })
                .min_by_key(|(_, inserted_at)| *inserted_at)
                .map(|(key, _)| key);

            let Some(key) = oldest else {
                break;
            };
            entries.remove(&key);
            self.record(|m| m.cache_evictions_total.inc());
            info!(region = %key.region, series = %key.series, "Evicted series cache entry");
        }
    }
}
