//! Cache implementations for the redirector service.

pub mod moka;

pub use self::moka::{CacheConfig, MokaLinkCache};

use async_trait::async_trait;
use snip_core::error::Result;
use snip_core::{LinkRecord, ShortCode};
use std::future::Future;

/// A cache of resolved link records keyed by short code.
///
/// Only records that exist are cached. A lookup for a missing code always
/// reaches the backing store, so a newly allocated code is visible at once.
#[async_trait]
pub trait LinkCache: Send + Sync + 'static {
    /// Returns the cached record, if any.
    async fn get(&self, code: &ShortCode) -> Option<LinkRecord>;

    /// Caches a record under its own code.
    async fn insert(&self, record: LinkRecord);

    /// Drops the cached record for `code`. Idempotent.
    async fn invalidate(&self, code: &ShortCode);

    /// Returns the cached record or runs `fetch` to load it.
    ///
    /// Concurrent misses for the same code share a single fetch. Fetch
    /// errors and `None` results are returned to every waiter but not cached.
    async fn get_or_fetch<F, Fut>(&self, code: &ShortCode, fetch: F) -> Result<Option<LinkRecord>>
    where
        F: FnOnce() -> Fut + Send,
        Fut: Future<Output = Result<Option<LinkRecord>>> + Send;
}
