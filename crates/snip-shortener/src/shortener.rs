use crate::error::Result;
use async_trait::async_trait;
use snip_core::{LinkRecord, LinkScope, ShortCode};

/// Parameters for creating a shortened URL.
#[derive(Debug, Clone)]
pub struct ShortenParams {
    /// The destination URL to be shortened.
    pub original_url: String,
    /// Email of the signed-in user, `None` for anonymous shortening.
    pub owner: Option<String>,
}

/// Result of a shorten request.
#[derive(Debug, Clone, PartialEq)]
pub struct ShortenOutcome {
    pub record: LinkRecord,
    /// `true` when an existing record for the same destination and owner was returned.
    pub reused: bool,
}

#[async_trait]
pub trait Shortener: Send + Sync + 'static {
    /// Returns the short code for the URL, reusing the owner's existing one if any.
    async fn shorten(&self, params: ShortenParams) -> Result<ShortenOutcome>;

    /// Lists the links in a scope, oldest first.
    async fn list(&self, scope: LinkScope<'_>) -> Result<Vec<LinkRecord>>;

    /// Counts the links in a scope.
    async fn count(&self, scope: LinkScope<'_>) -> Result<u64>;

    /// Deletes a link owned by `owner`.
    /// Returns `true` if the record existed, belonged to `owner` and was removed.
    async fn delete(&self, code: &ShortCode, owner: &str) -> Result<bool>;
}
