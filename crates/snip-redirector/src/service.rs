use std::sync::Arc;

use crate::redirector::Redirector;
use async_trait::async_trait;
use snip_core::{LinkRecord, ReadRepository, ShortCode};
use tracing::{debug, trace};

/// Service for handling redirects.
///
/// Uses a read-only repository to fetch link records.
#[derive(Debug)]
pub struct RedirectorService<R> {
    repository: Arc<R>,
}

impl<R: ReadRepository> RedirectorService<R> {
    /// Creates a new RedirectorService with the given repository.
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }
}

impl<R> Clone for RedirectorService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}

#[async_trait]
impl<R: ReadRepository> Redirector for RedirectorService<R> {
    async fn resolve(&self, code: &ShortCode) -> crate::Result<Option<LinkRecord>> {
        trace!(code = %code, "resolving short code");

        match self.repository.get(code).await? {
            Some(record) => {
                debug!(code = %code, url = %record.original_url, "resolved short code");
                Ok(Some(record))
            }
            None => {
                trace!(code = %code, "short code not found");
                Ok(None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CachedRepository, MokaLinkCache};
    use snip_core::Repository;
    use snip_storage::InMemoryRepository;

    fn code(s: &str) -> ShortCode {
        ShortCode::new_unchecked(s)
    }

    async fn setup_with_record(c: &str, url: &str) -> RedirectorService<InMemoryRepository> {
        let repo = InMemoryRepository::new();
        repo.insert(LinkRecord::new(code(c), url, None))
            .await
            .unwrap();
        RedirectorService::new(repo)
    }

    #[tokio::test]
    async fn resolve_existing_code() {
        let service = setup_with_record("XyAB", "https://example.com").await;

        let result = service.resolve(&code("XyAB")).await.unwrap();
        let result = result.expect("record should exist");
        assert_eq!(result.original_url, "https://example.com");
    }

    #[tokio::test]
    async fn resolve_nonexistent_code() {
        let service = RedirectorService::new(InMemoryRepository::new());

        let result = service.resolve(&code("nope")).await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn resolve_is_case_sensitive() {
        let service = setup_with_record("XyAB", "https://example.com").await;

        assert!(service.resolve(&code("xyab")).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn resolve_through_cache_stops_after_delete() {
        let repo = std::sync::Arc::new(CachedRepository::new(
            InMemoryRepository::new(),
            MokaLinkCache::new(),
        ));
        repo.insert(LinkRecord::new(
            code("XyAB"),
            "https://example.com",
            Some("a@example.com".to_string()),
        ))
        .await
        .unwrap();

        let service = RedirectorService::new(std::sync::Arc::clone(&repo));
        assert!(service.resolve(&code("XyAB")).await.unwrap().is_some());

        assert!(repo
            .delete_owned(&code("XyAB"), "a@example.com")
            .await
            .unwrap());
        assert!(service.resolve(&code("XyAB")).await.unwrap().is_none());
    }
}
