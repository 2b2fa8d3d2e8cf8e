use crate::error::Result;
use crate::link::{LinkRecord, LinkScope};
use crate::shortcode::ShortCode;
use crate::user::{PendingRegistration, UserRecord};
use async_trait::async_trait;
use std::sync::Arc;

/// A read-only view of a link repository.
///
/// This trait provides only the read operations from [`Repository`],
/// allowing services like the redirector to have read-only access.
#[async_trait]
pub trait ReadRepository: Send + Sync + 'static {
    /// Retrieves the link record for a given short code.
    /// Returns `None` if the code does not exist.
    async fn get(&self, code: &ShortCode) -> Result<Option<LinkRecord>>;

    /// Checks whether a short code is already taken.
    async fn exists(&self, code: &ShortCode) -> Result<bool>;
}

#[async_trait]
pub trait Repository: ReadRepository {
    /// Inserts a new link record.
    ///
    /// Returns `Err(Conflict)` if the code already exists. Implementations
    /// must enforce this atomically at the write layer.
    async fn insert(&self, record: LinkRecord) -> Result<()>;

    /// Finds the record created by `owner` (or anonymously, when `None`) for
    /// exactly this destination URL.
    async fn find_by_destination(
        &self,
        original_url: &str,
        owner: Option<&str>,
    ) -> Result<Option<LinkRecord>>;

    /// Lists the records in a scope, oldest first.
    async fn list(&self, scope: LinkScope<'_>) -> Result<Vec<LinkRecord>>;

    /// Counts the records in a scope.
    async fn count(&self, scope: LinkScope<'_>) -> Result<u64>;

    /// Deletes the record for `code` only if it is owned by `owner`.
    /// Returns `true` if a record was removed.
    async fn delete_owned(&self, code: &ShortCode, owner: &str) -> Result<bool>;
}

/// Durable store of verified users.
#[async_trait]
pub trait UserRepository: Send + Sync + 'static {
    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>>;

    /// Inserts a user. Returns `Err(Conflict)` if the email is already registered.
    async fn insert(&self, user: UserRecord) -> Result<()>;
}

/// Short-lived store of registrations awaiting OTP verification.
///
/// Entries are keyed by an opaque session token. Expired entries must be
/// invisible to [`get`](Self::get) and [`take`](Self::take).
#[async_trait]
pub trait PendingRegistrationStore: Send + Sync + 'static {
    /// Stores (or replaces) the pending registration for `token`.
    async fn put(&self, token: &str, pending: PendingRegistration) -> Result<()>;

    /// Returns the live pending registration for `token`.
    async fn get(&self, token: &str) -> Result<Option<PendingRegistration>>;

    /// Removes and returns the live pending registration for `token`.
    ///
    /// At most one concurrent caller observes `Some` for a given entry.
    async fn take(&self, token: &str) -> Result<Option<PendingRegistration>>;
}

#[async_trait]
impl<T: ReadRepository> ReadRepository for Arc<T> {
    async fn get(&self, code: &ShortCode) -> Result<Option<LinkRecord>> {
        (**self).get(code).await
    }

    async fn exists(&self, code: &ShortCode) -> Result<bool> {
        (**self).exists(code).await
    }
}

#[async_trait]
impl<T: Repository> Repository for Arc<T> {
    async fn insert(&self, record: LinkRecord) -> Result<()> {
        (**self).insert(record).await
    }

    async fn find_by_destination(
        &self,
        original_url: &str,
        owner: Option<&str>,
    ) -> Result<Option<LinkRecord>> {
        (**self).find_by_destination(original_url, owner).await
    }

    async fn list(&self, scope: LinkScope<'_>) -> Result<Vec<LinkRecord>> {
        (**self).list(scope).await
    }

    async fn count(&self, scope: LinkScope<'_>) -> Result<u64> {
        (**self).count(scope).await
    }

    async fn delete_owned(&self, code: &ShortCode, owner: &str) -> Result<bool> {
        (**self).delete_owned(code, owner).await
    }
}

#[async_trait]
impl<T: UserRepository> UserRepository for Arc<T> {
    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>> {
        (**self).find_by_email(email).await
    }

    async fn insert(&self, user: UserRecord) -> Result<()> {
        (**self).insert(user).await
    }
}

#[async_trait]
impl<T: PendingRegistrationStore> PendingRegistrationStore for Arc<T> {
    async fn put(&self, token: &str, pending: PendingRegistration) -> Result<()> {
        (**self).put(token, pending).await
    }

    async fn get(&self, token: &str) -> Result<Option<PendingRegistration>> {
        (**self).get(token).await
    }

    async fn take(&self, token: &str) -> Result<Option<PendingRegistration>> {
        (**self).take(token).await
    }
}
