use crate::Result;
use async_trait::async_trait;
use snip_core::{LinkRecord, ShortCode};

#[async_trait]
pub trait Redirector: Send + Sync + 'static {
    /// Resolves a short code to its stored link record.
    /// Returns `None` if no record exists for the code.
    async fn resolve(&self, code: &ShortCode) -> Result<Option<LinkRecord>>;
}
