use crate::error::{Result, ShortenerError};
use crate::shortener::{ShortenOutcome, ShortenParams, Shortener};
use async_trait::async_trait;
use snip_core::{LinkRecord, LinkScope, Repository, ShortCode, StorageError};
use snip_generator::Generator;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Upper bound on candidate codes tried for a single allocation.
pub const MAX_ALLOCATION_ATTEMPTS: usize = 20;

/// A concrete implementation of the [`Shortener`] trait.
///
/// This service wraps a `Repository` and a `Generator` to handle:
/// - Reuse of an existing code for the same destination and owner
/// - Candidate generation with a bounded collision retry
/// - Owner-scoped listing and deletion
///
/// Code uniqueness is ultimately enforced by the repository's insert; a
/// `Conflict` from a concurrent writer is treated like any other collision.
#[derive(Debug)]
pub struct ShortenerService<R, G> {
    repository: Arc<R>,
    generator: Arc<G>,
    max_attempts: usize,
}

impl<R: Repository, G: Generator> ShortenerService<R, G> {
    /// Creates a new `ShortenerService`.
    pub fn new(repository: R, generator: G) -> Self {
        Self {
            repository: Arc::new(repository),
            generator: Arc::new(generator),
            max_attempts: MAX_ALLOCATION_ATTEMPTS,
        }
    }

    /// Overrides the number of candidates tried before giving up.
    pub fn with_max_attempts(mut self, max_attempts: usize) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Returns the destination with surrounding whitespace removed.
    ///
    /// Destinations are otherwise stored as given; only blank input is rejected.
    fn validate_url(url: &str) -> Result<&str> {
        let url = url.trim();
        if url.is_empty() {
            return Err(ShortenerError::InvalidUrl(
                "URL cannot be empty".to_string(),
            ));
        }
        Ok(url)
    }

    async fn allocate(&self, original_url: &str, owner: Option<String>) -> Result<LinkRecord> {
        for attempt in 1..=self.max_attempts {
            let code: ShortCode = self.generator.generate().into();

            if self.repository.exists(&code).await? {
                debug!(code = %code, attempt, "short code already taken");
                continue;
            }

            let record = LinkRecord::new(code, original_url, owner.clone());
            match self.repository.insert(record.clone()).await {
                Ok(()) => return Ok(record),
                Err(StorageError::Conflict(_)) => {
                    debug!(code = %record.code, attempt, "short code claimed concurrently");
                }
                Err(e) => return Err(e.into()),
            }
        }

        warn!(
            attempts = self.max_attempts,
            "could not find a free short code"
        );
        Err(ShortenerError::CodeSpaceExhausted {
            attempts: self.max_attempts,
        })
    }
}

#[async_trait]
impl<R: Repository, G: Generator> Shortener for ShortenerService<R, G> {
    async fn shorten(&self, params: ShortenParams) -> Result<ShortenOutcome> {
        let original_url = Self::validate_url(&params.original_url)?;

        if let Some(existing) = self
            .repository
            .find_by_destination(original_url, params.owner.as_deref())
            .await?
        {
            debug!(code = %existing.code, "reusing existing short code");
            return Ok(ShortenOutcome {
                record: existing,
                reused: true,
            });
        }

        let record = self.allocate(original_url, params.owner).await?;
        info!(
            code = %record.code,
            owner = record.owner.as_deref().unwrap_or("-"),
            "allocated short code"
        );

        Ok(ShortenOutcome {
            record,
            reused: false,
        })
    }

    async fn list(&self, scope: LinkScope<'_>) -> Result<Vec<LinkRecord>> {
        Ok(self.repository.list(scope).await?)
    }

    async fn count(&self, scope: LinkScope<'_>) -> Result<u64> {
        Ok(self.repository.count(scope).await?)
    }

    async fn delete(&self, code: &ShortCode, owner: &str) -> Result<bool> {
        let deleted = self.repository.delete_owned(code, owner).await?;
        if deleted {
            info!(code = %code, owner, "deleted short code");
        } else {
            debug!(code = %code, owner, "nothing deleted: missing or not owned");
        }
        Ok(deleted)
    }
}
