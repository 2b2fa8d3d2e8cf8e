use crate::cache::LinkCache;
use async_trait::async_trait;
use snip_core::error::Result;
use snip_core::{LinkRecord, LinkScope, ReadRepository, Repository, ShortCode};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, trace};

/// A repository decorator that adds read-through caching.
///
/// Reads check the cache first and fall back to the inner repository;
/// records found there are cached. Writes go straight to the inner
/// repository, and a successful delete evicts the cached record so a
/// deleted code stops resolving immediately.
///
/// A load that overlaps a delete may read the record just before it is
/// removed. Every successful delete bumps a generation counter; a read that
/// sees the counter move while it was in flight discards what it loaded and
/// reads the inner repository again.
#[derive(Debug, Clone)]
pub struct CachedRepository<R, C> {
    inner: R,
    cache: C,
    generation: Arc<AtomicU64>,
}

impl<R: ReadRepository, C: LinkCache> CachedRepository<R, C> {
    /// Creates a new cached repository decorator.
    pub fn new(inner: R, cache: C) -> Self {
        Self {
            inner,
            cache,
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    /// Returns a reference to the inner repository.
    pub fn inner(&self) -> &R {
        &self.inner
    }

    /// Returns a reference to the cache.
    pub fn cache(&self) -> &C {
        &self.cache
    }

    /// Evicts a cached entry.
    pub async fn invalidate(&self, code: &ShortCode) {
        trace!(code = %code, "invalidating cache entry");
        self.cache.invalidate(code).await;
    }
}

#[async_trait]
impl<R: ReadRepository, C: LinkCache> ReadRepository for CachedRepository<R, C> {
    async fn get(&self, code: &ShortCode) -> Result<Option<LinkRecord>> {
        let started = self.generation();

        let found = self
            .cache
            .get_or_fetch(code, || async move {
                let before = self.generation();
                trace!(code = %code, "fetching from inner repository");
                let found = self.inner.get(code).await?;
                if self.generation() == before {
                    return Ok(found);
                }
                // A delete landed mid-fetch; only a read issued after it is trustworthy.
                self.inner.get(code).await
            })
            .await?;

        if self.generation() == started {
            return Ok(found);
        }

        debug!(code = %code, "delete overlapped cached read, re-reading");
        self.cache.invalidate(code).await;
        self.inner.get(code).await
    }

    async fn exists(&self, code: &ShortCode) -> Result<bool> {
        if self.cache.get(code).await.is_some() {
            debug!(code = %code, "cache hit indicates code exists");
            return Ok(true);
        }
        self.inner.exists(code).await
    }
}

#[async_trait]
impl<R: Repository, C: LinkCache> Repository for CachedRepository<R, C> {
    async fn insert(&self, record: LinkRecord) -> Result<()> {
        self.inner.insert(record).await
    }

    async fn find_by_destination(
        &self,
        original_url: &str,
        owner: Option<&str>,
    ) -> Result<Option<LinkRecord>> {
        self.inner.find_by_destination(original_url, owner).await
    }

    async fn list(&self, scope: LinkScope<'_>) -> Result<Vec<LinkRecord>> {
        self.inner.list(scope).await
    }

    async fn count(&self, scope: LinkScope<'_>) -> Result<u64> {
        self.inner.count(scope).await
    }

    async fn delete_owned(&self, code: &ShortCode, owner: &str) -> Result<bool> {
        let deleted = self.inner.delete_owned(code, owner).await?;
        if deleted {
            self.generation.fetch_add(1, Ordering::AcqRel);
            self.invalidate(code).await;
        }
        Ok(deleted)
    }
}
