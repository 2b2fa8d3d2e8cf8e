use super::LinkCache;
use async_trait::async_trait;
use moka::future::Cache;
use snip_core::error::{Result, StorageError};
use snip_core::{LinkRecord, ShortCode};
use std::future::Future;
use std::time::Duration;
use tracing::{debug, trace};
use typed_builder::TypedBuilder;

/// Why a single-flight load produced no value to cache.
#[derive(Debug)]
enum Miss {
    Absent,
    Storage(StorageError),
}

/// An in-memory cache of link records using Moka.
///
/// Suitable for a single node. Entries are bounded by capacity and may
/// carry a time-to-live; records never change after creation, so the only
/// staleness to handle is deletion, which callers signal with
/// [`LinkCache::invalidate`].
#[derive(Debug, Clone)]
pub struct MokaLinkCache {
    cache: Cache<ShortCode, LinkRecord>,
}

impl MokaLinkCache {
    /// Creates a cache holding at most 10,000 records.
    pub fn new() -> Self {
        Self::with_capacity(10_000)
    }

    /// Creates a cache with a custom maximum capacity.
    pub fn with_capacity(max_capacity: u64) -> Self {
        let cache = Cache::builder().max_capacity(max_capacity).build();
        Self { cache }
    }

    /// Creates a cache whose entries expire `ttl` after insertion.
    pub fn with_ttl(max_capacity: u64, ttl: Duration) -> Self {
        let cache = Cache::builder()
            .max_capacity(max_capacity)
            .time_to_live(ttl)
            .build();
        Self { cache }
    }

    /// Returns a builder for creating a custom cache configuration.
    pub fn builder() -> CacheConfigBuilder {
        CacheConfig::builder()
    }
}

impl Default for MokaLinkCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LinkCache for MokaLinkCache {
    async fn get(&self, code: &ShortCode) -> Option<LinkRecord> {
        let hit = self.cache.get(code).await;
        match &hit {
            Some(_) => trace!(code = %code, "moka cache hit"),
            None => trace!(code = %code, "moka cache miss"),
        }
        hit
    }

    async fn insert(&self, record: LinkRecord) {
        trace!(code = %record.code, "caching link record");
        self.cache.insert(record.code.clone(), record).await;
    }

    async fn invalidate(&self, code: &ShortCode) {
        self.cache.invalidate(code).await;
        debug!(code = %code, "removed link record from cache (if present)");
    }

    async fn get_or_fetch<F, Fut>(&self, code: &ShortCode, fetch: F) -> Result<Option<LinkRecord>>
    where
        F: FnOnce() -> Fut + Send,
        Fut: Future<Output = Result<Option<LinkRecord>>> + Send,
    {
        // try_get_with coalesces concurrent loads for the same key and
        // caches only Ok values, so absence is carried as an error.
        let loaded = self
            .cache
            .try_get_with(code.clone(), async move {
                trace!(code = %code, "cache miss, loading record");
                match fetch().await {
                    Ok(Some(record)) => Ok(record),
                    Ok(None) => Err(Miss::Absent),
                    Err(e) => Err(Miss::Storage(e)),
                }
            })
            .await;

        match loaded {
            Ok(record) => Ok(Some(record)),
            Err(miss) => match miss.as_ref() {
                Miss::Absent => Ok(None),
                Miss::Storage(e) => Err(e.clone()),
            },
        }
    }
}

/// Configuration for creating a [`MokaLinkCache`] with custom settings.
#[derive(Debug, TypedBuilder, Default)]
pub struct CacheConfig {
    /// Maximum number of entries the cache can hold.
    #[builder(default, setter(strip_option))]
    max_capacity: Option<u64>,
    /// Time-to-live for cache entries.
    #[builder(default, setter(strip_option))]
    ttl: Option<Duration>,
}

impl From<CacheConfig> for MokaLinkCache {
    fn from(config: CacheConfig) -> Self {
        let mut builder = Cache::builder();

        if let Some(capacity) = config.max_capacity {
            builder = builder.max_capacity(capacity);
        }

        if let Some(ttl) = config.ttl {
            builder = builder.time_to_live(ttl);
        }

        MokaLinkCache {
            cache: builder.build(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn record(code: &str, url: &str) -> LinkRecord {
        LinkRecord::new(ShortCode::new_unchecked(code), url, None)
    }

    fn code(s: &str) -> ShortCode {
        ShortCode::new_unchecked(s)
    }

    #[tokio::test]
    async fn insert_then_get() {
        let cache = MokaLinkCache::new();

        assert!(cache.get(&code("abcd")).await.is_none());

        let rec = record("abcd", "https://example.com");
        cache.insert(rec.clone()).await;

        assert_eq!(cache.get(&code("abcd")).await, Some(rec));
    }

    #[tokio::test]
    async fn invalidate_is_idempotent() {
        let cache = MokaLinkCache::new();
        cache.insert(record("abcd", "https://example.com")).await;

        cache.invalidate(&code("abcd")).await;
        assert!(cache.get(&code("abcd")).await.is_none());

        cache.invalidate(&code("abcd")).await;
        assert!(cache.get(&code("abcd")).await.is_none());
    }

    #[tokio::test]
    async fn keys_are_case_sensitive() {
        let cache = MokaLinkCache::new();
        cache.insert(record("abcd", "https://lower.example")).await;

        assert!(cache.get(&code("ABCD")).await.is_none());
    }

    #[tokio::test]
    async fn entries_expire_after_ttl() {
        let cache = MokaLinkCache::with_ttl(100, Duration::from_millis(50));
        cache.insert(record("abcd", "https://example.com")).await;
        assert!(cache.get(&code("abcd")).await.is_some());

        tokio::time::sleep(Duration::from_millis(120)).await;

        assert!(cache.get(&code("abcd")).await.is_none());
    }

    #[tokio::test]
    async fn builder_config() {
        let cache: MokaLinkCache = MokaLinkCache::builder()
            .max_capacity(1000)
            .ttl(Duration::from_secs(60))
            .build()
            .into();

        cache.insert(record("abcd", "https://example.com")).await;
        assert!(cache.get(&code("abcd")).await.is_some());
    }

    #[tokio::test]
    async fn fetched_record_is_cached() {
        let cache = MokaLinkCache::new();
        let loads = AtomicUsize::new(0);

        for _ in 0..3 {
            let got = cache
                .get_or_fetch(&code("abcd"), || async {
                    loads.fetch_add(1, Ordering::SeqCst);
                    Ok(Some(record("abcd", "https://example.com")))
                })
                .await
                .unwrap();
            assert_eq!(got.unwrap().original_url, "https://example.com");
        }

        assert_eq!(loads.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn absent_result_is_not_cached() {
        let cache = MokaLinkCache::new();
        let loads = AtomicUsize::new(0);

        for _ in 0..2 {
            let got = cache
                .get_or_fetch(&code("abcd"), || async {
                    loads.fetch_add(1, Ordering::SeqCst);
                    Ok(None)
                })
                .await
                .unwrap();
            assert!(got.is_none());
        }

        assert_eq!(loads.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn fetch_error_is_propagated_and_not_cached() {
        let cache = MokaLinkCache::new();

        let err = cache
            .get_or_fetch(&code("abcd"), || async {
                Err(StorageError::Timeout("simulated timeout".to_string()))
            })
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::Timeout(_)));

        let got = cache
            .get_or_fetch(&code("abcd"), || async {
                Ok(Some(record("abcd", "https://example.com")))
            })
            .await
            .unwrap();
        assert!(got.is_some());
    }

    #[tokio::test]
    async fn concurrent_misses_share_one_fetch() {
        let cache = MokaLinkCache::new();
        let loads = Arc::new(AtomicUsize::new(0));
        let mut handles = vec![];

        for _ in 0..10 {
            let cache = cache.clone();
            let loads = Arc::clone(&loads);
            handles.push(tokio::spawn(async move {
                cache
                    .get_or_fetch(&code("abcd"), || async move {
                        tokio::time::sleep(Duration::from_millis(50)).await;
                        loads.fetch_add(1, Ordering::SeqCst);
                        Ok(Some(record("abcd", "https://example.com")))
                    })
                    .await
            }));
        }

        for handle in handles {
            assert!(handle.await.unwrap().unwrap().is_some());
        }

        assert_eq!(loads.load(Ordering::SeqCst), 1);
    }
}
