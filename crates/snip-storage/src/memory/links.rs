use async_trait::async_trait;
use dashmap::mapref::entry::Entry as MapEntry;
use dashmap::DashMap;
use snip_core::error::{Result, StorageError};
use snip_core::{LinkRecord, LinkScope, ReadRepository, Repository, ShortCode};
use std::sync::atomic::{AtomicU64, Ordering};

/// In-memory storage entry for a link.
#[derive(Debug, Clone)]
struct Entry {
    /// Insertion order, used to list records oldest first.
    seq: u64,
    record: LinkRecord,
}

/// In-memory implementation of the link repository using DashMap.
///
/// DashMap provides better concurrency than RwLock<HashMap> because it
/// uses sharded locks, allowing concurrent reads and writes to different
/// buckets without blocking. Code uniqueness is enforced by the entry API,
/// which holds the shard lock between the check and the insert.
#[derive(Debug, Default)]
pub struct InMemoryRepository {
    storage: DashMap<ShortCode, Entry>,
    next_seq: AtomicU64,
}

impl InMemoryRepository {
    /// Creates a new in-memory repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new in-memory repository with the specified capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            storage: DashMap::with_capacity(capacity),
            next_seq: AtomicU64::new(0),
        }
    }

    fn scoped(&self, scope: &LinkScope<'_>) -> Vec<Entry> {
        let mut entries: Vec<Entry> = self
            .storage
            .iter()
            .filter(|e| e.record.in_scope(scope))
            .map(|e| e.value().clone())
            .collect();
        entries.sort_by_key(|e| e.seq);
        entries
    }
}

#[async_trait]
impl ReadRepository for InMemoryRepository {
    async fn get(&self, code: &ShortCode) -> Result<Option<LinkRecord>> {
        Ok(self.storage.get(code).map(|e| e.record.clone()))
    }

    async fn exists(&self, code: &ShortCode) -> Result<bool> {
        Ok(self.storage.contains_key(code))
    }
}

#[async_trait]
impl Repository for InMemoryRepository {
    async fn insert(&self, record: LinkRecord) -> Result<()> {
        match self.storage.entry(record.code.clone()) {
            MapEntry::Occupied(_) => Err(StorageError::Conflict(record.code.to_string())),
            MapEntry::Vacant(slot) => {
                let seq = self.next_seq.fetch_add(1, Ordering::Relaxed);
                slot.insert(Entry { seq, record });
                Ok(())
            }
        }
    }

    async fn find_by_destination(
        &self,
        original_url: &str,
        owner: Option<&str>,
    ) -> Result<Option<LinkRecord>> {
        Ok(self
            .storage
            .iter()
            .filter(|e| e.record.original_url == original_url && e.record.owner.as_deref() == owner)
            .min_by_key(|e| e.seq)
            .map(|e| e.record.clone()))
    }

    async fn list(&self, scope: LinkScope<'_>) -> Result<Vec<LinkRecord>> {
        Ok(self
            .scoped(&scope)
            .into_iter()
            .map(|e| e.record)
            .collect())
    }

    async fn count(&self, scope: LinkScope<'_>) -> Result<u64> {
        let count = self
            .storage
            .iter()
            .filter(|e| e.record.in_scope(&scope))
            .count();
        Ok(count as u64)
    }

    async fn delete_owned(&self, code: &ShortCode, owner: &str) -> Result<bool> {
        Ok(self
            .storage
            .remove_if(code, |_, e| e.record.owner.as_deref() == Some(owner))
            .is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn code(s: &str) -> ShortCode {
        ShortCode::new_unchecked(s)
    }

    fn record(c: &str, url: &str, owner: Option<&str>) -> LinkRecord {
        LinkRecord::new(code(c), url, owner.map(str::to_string))
    }

    #[tokio::test]
    async fn insert_and_get() {
        let repo = InMemoryRepository::new();

        repo.insert(record("abcd", "https://example.com", None))
            .await
            .unwrap();

        let result = repo.get(&code("abcd")).await.unwrap().unwrap();
        assert_eq!(result.original_url, "https://example.com");
        assert_eq!(result.owner, None);
    }

    #[tokio::test]
    async fn get_nonexistent() {
        let repo = InMemoryRepository::new();

        assert!(repo.get(&code("nope")).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn insert_conflict() {
        let repo = InMemoryRepository::new();

        repo.insert(record("abcd", "https://example.com", None))
            .await
            .unwrap();

        let err = repo
            .insert(record("abcd", "https://other.com", Some("a@example.com")))
            .await
            .unwrap_err();

        assert!(matches!(err, StorageError::Conflict(_)));
        let kept = repo.get(&code("abcd")).await.unwrap().unwrap();
        assert_eq!(kept.original_url, "https://example.com");
    }

    #[tokio::test]
    async fn codes_are_case_sensitive() {
        let repo = InMemoryRepository::new();

        repo.insert(record("abcd", "https://lower.com", None))
            .await
            .unwrap();
        repo.insert(record("ABCD", "https://upper.com", None))
            .await
            .unwrap();

        assert_eq!(repo.count(LinkScope::All).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn find_by_destination_is_owner_scoped() {
        let repo = InMemoryRepository::new();

        repo.insert(record("aaaa", "https://example.com", None))
            .await
            .unwrap();
        repo.insert(record("bbbb", "https://example.com", Some("a@example.com")))
            .await
            .unwrap();

        let anonymous = repo
            .find_by_destination("https://example.com", None)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(anonymous.code.as_str(), "aaaa");

        let owned = repo
            .find_by_destination("https://example.com", Some("a@example.com"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(owned.code.as_str(), "bbbb");

        assert!(repo
            .find_by_destination("https://example.com", Some("b@example.com"))
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn list_and_count_by_scope() {
        let repo = InMemoryRepository::new();

        repo.insert(record("aaaa", "https://one.com", Some("a@example.com")))
            .await
            .unwrap();
        repo.insert(record("bbbb", "https://two.com", None))
            .await
            .unwrap();
        repo.insert(record("cccc", "https://three.com", Some("a@example.com")))
            .await
            .unwrap();

        let owned = repo.list(LinkScope::Owner("a@example.com")).await.unwrap();
        let codes: Vec<&str> = owned.iter().map(|r| r.code.as_str()).collect();
        assert_eq!(codes, vec!["aaaa", "cccc"]);

        assert_eq!(repo.count(LinkScope::All).await.unwrap(), 3);
        assert_eq!(repo.count(LinkScope::Anonymous).await.unwrap(), 1);
        assert_eq!(
            repo.count(LinkScope::Owner("a@example.com")).await.unwrap(),
            2
        );
        assert_eq!(
            repo.count(LinkScope::Owner("b@example.com")).await.unwrap(),
            0
        );
    }

    #[tokio::test]
    async fn delete_requires_owner() {
        let repo = InMemoryRepository::new();

        repo.insert(record("abcd", "https://example.com", Some("a@example.com")))
            .await
            .unwrap();

        assert!(!repo
            .delete_owned(&code("abcd"), "b@example.com")
            .await
            .unwrap());
        assert!(repo.exists(&code("abcd")).await.unwrap());

        assert!(repo
            .delete_owned(&code("abcd"), "a@example.com")
            .await
            .unwrap());
        assert!(!repo.exists(&code("abcd")).await.unwrap());
    }

    #[tokio::test]
    async fn anonymous_records_cannot_be_deleted() {
        let repo = InMemoryRepository::new();

        repo.insert(record("abcd", "https://example.com", None))
            .await
            .unwrap();

        assert!(!repo
            .delete_owned(&code("abcd"), "a@example.com")
            .await
            .unwrap());
        assert!(repo.exists(&code("abcd")).await.unwrap());
    }

    #[tokio::test]
    async fn concurrent_inserts_of_same_code_admit_one() {
        let repo = Arc::new(InMemoryRepository::new());
        let mut handles = vec![];

        for i in 0..16 {
            let repo = Arc::clone(&repo);
            handles.push(tokio::spawn(async move {
                repo.insert(record("same", &format!("https://example{i}.com"), None))
                    .await
                    .is_ok()
            }));
        }

        let mut successes = 0;
        for handle in handles {
            if handle.await.unwrap() {
                successes += 1;
            }
        }

        assert_eq!(successes, 1);
        assert_eq!(repo.count(LinkScope::All).await.unwrap(), 1);
    }
}
