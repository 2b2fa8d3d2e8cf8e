use async_trait::async_trait;
use dashmap::DashMap;
use snip_core::error::Result;
use snip_core::{PendingRegistration, PendingRegistrationStore};

/// In-memory pending registration store keyed by session token.
///
/// Expired entries are dropped lazily when they are read.
#[derive(Debug, Default)]
pub struct InMemoryPendingStore {
    entries: DashMap<String, PendingRegistration>,
}

impl InMemoryPendingStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PendingRegistrationStore for InMemoryPendingStore {
    async fn put(&self, token: &str, pending: PendingRegistration) -> Result<()> {
        self.entries.retain(|_, p| !p.is_expired());
        self.entries.insert(token.to_owned(), pending);
        Ok(())
    }

    async fn get(&self, token: &str) -> Result<Option<PendingRegistration>> {
        let Some(entry) = self.entries.get(token) else {
            return Ok(None);
        };

        if entry.is_expired() {
            drop(entry);
            self.entries.remove_if(token, |_, p| p.is_expired());
            return Ok(None);
        }

        Ok(Some(entry.clone()))
    }

    async fn take(&self, token: &str) -> Result<Option<PendingRegistration>> {
        Ok(self
            .entries
            .remove(token)
            .map(|(_, pending)| pending)
            .filter(|pending| !pending.is_expired()))
    }
}
