//! Unit tests for the series cache

use futures_util::future::{BoxFuture, FutureExt};
use statewatt::cache::SeriesCache;
use statewatt::config::CacheConfig;
use statewatt::error::EnergyError;
use statewatt::metrics::Metrics;
use statewatt::models::{Region, SeriesName, SeriesTable};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Barrier;

use crate::test_utils::{annual_table, region};

fn population(region: Region) -> SeriesTable {
    annual_table(region, SeriesName::Population, 2015..=2019, |y| {
        Some(1_000.0 + y as f64)
    })
}

type FetchFuture = BoxFuture<'static, statewatt::Result<SeriesTable>>;

/// Fetch closure that counts invocations and returns `table`.
fn counting(calls: &Arc<AtomicUsize>, table: SeriesTable) -> impl FnOnce() -> FetchFuture {
    let calls = calls.clone();
    move || -> FetchFuture {
        calls.fetch_add(1, Ordering::SeqCst);
        async move { Ok(table) }.boxed()
    }
}

#[tokio::test]
async fn test_second_lookup_does_not_fetch() {
    let cache = SeriesCache::new(CacheConfig::unbounded());
    let ny = region("NY");
    let calls = Arc::new(AtomicUsize::new(0));

    let first = cache
        .get_or_fetch(ny, SeriesName::Population, counting(&calls, population(ny)))
        .await
        .unwrap();
    let second = cache
        .get_or_fetch(ny, SeriesName::Population, counting(&calls, population(ny)))
        .await
        .unwrap();

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert!(Arc::ptr_eq(&first, &second));
    assert!(cache.contains(ny, SeriesName::Population).await);
    assert_eq!(cache.len().await, 1);
}

#[tokio::test]
async fn test_keys_are_per_region_and_series() {
    let cache = SeriesCache::new(CacheConfig::unbounded());
    let calls = Arc::new(AtomicUsize::new(0));
    let (ny, ca) = (region("NY"), region("CA"));

    cache
        .get_or_fetch(ny, SeriesName::Population, counting(&calls, population(ny)))
        .await
        .unwrap();
    cache
        .get_or_fetch(ca, SeriesName::Population, counting(&calls, population(ca)))
        .await
        .unwrap();
    cache
        .get_or_fetch(
            ny,
            SeriesName::RealGdp,
            counting(&calls, annual_table(ny, SeriesName::RealGdp, 2015..=2019, |_| Some(1.0))),
        )
        .await
        .unwrap();

    assert_eq!(calls.load(Ordering::SeqCst), 3);
    assert_eq!(cache.len().await, 3);
}

#[tokio::test]
async fn test_concurrent_misses_coalesce_into_one_fetch() {
    let metrics = Arc::new(Metrics::new().unwrap());
    let cache = SeriesCache::with_metrics(CacheConfig::unbounded(), metrics.clone());
    let ny = region("NY");
    let calls = Arc::new(AtomicUsize::new(0));

    let mut handles = Vec::new();
    for _ in 0..10 {
        let cache = cache.clone();
        let calls = calls.clone();
        handles.push(tokio::spawn(async move {
            cache
                .get_or_fetch(ny, SeriesName::Population, move || {
                    calls.fetch_add(1, Ordering::SeqCst);
                    async move {
                        tokio::time::sleep(Duration::from_millis(50)).await;
                        Ok::<_, EnergyError>(population(ny))
                    }
                })
                .await
        }));
    }

    let mut tables = Vec::new();
    for handle in handles {
        tables.push(handle.await.unwrap().unwrap());
    }

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert!(tables.iter().all(|t| Arc::ptr_eq(t, &tables[0])));
    assert_eq!(metrics.cache_misses_total.get(), 1);
    assert_eq!(
        metrics.cache_coalesced_total.get() + metrics.cache_hits_total.get(),
        9
    );
}

#[tokio::test]
async fn test_different_keys_fetch_in_parallel() {
    let cache = SeriesCache::new(CacheConfig::unbounded());
    let barrier = Arc::new(Barrier::new(2));
    let (ny, ca) = (region("NY"), region("CA"));

    // Each fetch waits for the other to start; serialized fetches would
    // never get past the barrier.
    let fetch_for = |r: Region| {
        let cache = cache.clone();
        let barrier = barrier.clone();
        async move {
            cache
                .get_or_fetch(r, SeriesName::Population, move || async move {
                    barrier.wait().await;
                    Ok::<_, EnergyError>(population(r))
                })
                .await
        }
    };

    let joined = tokio::time::timeout(Duration::from_secs(5), async {
        tokio::join!(fetch_for(ny), fetch_for(ca))
    })
    .await
    .expect("fetches for different keys must not block each other");

    assert!(joined.0.is_ok());
    assert!(joined.1.is_ok());
}

#[tokio::test]
async fn test_failed_fetch_is_not_cached() {
    let cache = SeriesCache::new(CacheConfig::unbounded());
    let ny = region("NY");
    let calls = Arc::new(AtomicUsize::new(0));

    let failing = {
        let calls = calls.clone();
        move || {
            calls.fetch_add(1, Ordering::SeqCst);
            async move {
                Err::<SeriesTable, _>(EnergyError::transport("SEDS.TPOPP.NY.A", "connection reset"))
            }
        }
    };
    let err = cache
        .get_or_fetch(ny, SeriesName::Population, failing)
        .await
        .unwrap_err();
    assert!(matches!(err, EnergyError::Transport { .. }));
    assert!(!cache.contains(ny, SeriesName::Population).await);

    cache
        .get_or_fetch(ny, SeriesName::Population, counting(&calls, population(ny)))
        .await
        .unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 2);
    assert!(cache.contains(ny, SeriesName::Population).await);
}

#[tokio::test]
async fn test_concurrent_waiters_share_one_failure() {
    let cache = SeriesCache::new(CacheConfig::unbounded());
    let ny = region("NY");
    let calls = Arc::new(AtomicUsize::new(0));

    let mut handles = Vec::new();
    for _ in 0..5 {
        let cache = cache.clone();
        let calls = calls.clone();
        handles.push(tokio::spawn(async move {
            cache
                .get_or_fetch(ny, SeriesName::RealGdp, move || {
                    calls.fetch_add(1, Ordering::SeqCst);
                    async move {
                        tokio::time::sleep(Duration::from_millis(50)).await;
                        Err::<SeriesTable, _>(EnergyError::malformed(
                            "SEDS.GDPRX.NY.A",
                            "truncated body",
                        ))
                    }
                })
                .await
        }));
    }

    for handle in handles {
        let result = handle.await.unwrap();
        assert!(matches!(result, Err(EnergyError::MalformedResponse { .. })));
    }
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert!(cache.is_empty().await);
}

#[tokio::test(start_paused = true)]
async fn test_entries_expire_after_ttl() {
    let cache = SeriesCache::new(CacheConfig {
        ttl: Some(Duration::from_secs(60)),
        max_entries: None,
    });
    let ny = region("NY");
    let calls = Arc::new(AtomicUsize::new(0));

    cache
        .get_or_fetch(ny, SeriesName::Population, counting(&calls, population(ny)))
        .await
        .unwrap();
    tokio::time::advance(Duration::from_secs(30)).await;
    cache
        .get_or_fetch(ny, SeriesName::Population, counting(&calls, population(ny)))
        .await
        .unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    tokio::time::advance(Duration::from_secs(31)).await;
    assert!(!cache.contains(ny, SeriesName::Population).await);
    cache
        .get_or_fetch(ny, SeriesName::Population, counting(&calls, population(ny)))
        .await
        .unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test(start_paused = true)]
async fn test_capacity_evicts_oldest_entry() {
    let cache = SeriesCache::new(CacheConfig {
        ttl: None,
        max_entries: Some(2),
    });
    let calls = Arc::new(AtomicUsize::new(0));
    let regions = [region("NY"), region("CA"), region("TX")];

    for r in regions {
        cache
            .get_or_fetch(r, SeriesName::Population, counting(&calls, population(r)))
            .await
            .unwrap();
        tokio::time::advance(Duration::from_secs(1)).await;
    }

    assert_eq!(cache.len().await, 2);
    assert!(!cache.contains(regions[0], SeriesName::Population).await);
    assert!(cache.contains(regions[1], SeriesName::Population).await);
    assert!(cache.contains(regions[2], SeriesName::Population).await);
}

#[tokio::test]
async fn test_explicit_invalidation() {
    let cache = SeriesCache::new(CacheConfig::default());
    let calls = Arc::new(AtomicUsize::new(0));
    let (ny, ca) = (region("NY"), region("CA"));

    for series in [SeriesName::Population, SeriesName::RealGdp] {
        cache
            .get_or_fetch(
                ny,
                series,
                counting(&calls, annual_table(ny, series, 2019..=2019, |_| Some(1.0))),
            )
            .await
            .unwrap();
    }
    cache
        .get_or_fetch(ca, SeriesName::Population, counting(&calls, population(ca)))
        .await
        .unwrap();

    assert!(cache.invalidate(ca, SeriesName::Population).await);
    assert!(!cache.invalidate(ca, SeriesName::Population).await);
    assert_eq!(cache.invalidate_region(ny).await, 2);
    assert!(cache.is_empty().await);

    cache
        .get_or_fetch(ny, SeriesName::Population, counting(&calls, population(ny)))
        .await
        .unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 4);

    cache.clear().await;
    assert!(cache.is_empty().await);
}
