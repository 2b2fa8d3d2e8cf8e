use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use snip_core::error::{Result, StorageError};
use snip_core::{UserRecord, UserRepository};

/// In-memory user store keyed by email.
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    users: DashMap<String, UserRecord>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>> {
        Ok(self.users.get(email).map(|u| u.clone()))
    }

    async fn insert(&self, user: UserRecord) -> Result<()> {
        match self.users.entry(user.email.clone()) {
            Entry::Occupied(_) => Err(StorageError::Conflict(user.email)),
            Entry::Vacant(slot) => {
                slot.insert(user);
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jiff::Timestamp;

    fn user(name: &str, email: &str) -> UserRecord {
        UserRecord {
            username: name.to_string(),
            email: email.to_string(),
            password_hash: "$argon2id$fake".to_string(),
            created_at: Timestamp::now(),
        }
    }

    #[tokio::test]
    async fn insert_and_find() {
        let repo = InMemoryUserRepository::new();

        repo.insert(user("alice", "a@example.com")).await.unwrap();

        let found = repo.find_by_email("a@example.com").await.unwrap().unwrap();
        assert_eq!(found.username, "alice");
        assert!(repo.find_by_email("b@example.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn duplicate_email_conflicts_and_keeps_original() {
        let repo = InMemoryUserRepository::new();

        repo.insert(user("alice", "a@example.com")).await.unwrap();
        let err = repo
            .insert(user("mallory", "a@example.com"))
            .await
            .unwrap_err();

        assert!(matches!(err, StorageError::Conflict(_)));
        let found = repo.find_by_email("a@example.com").await.unwrap().unwrap();
        assert_eq!(found.username, "alice");
    }
}
