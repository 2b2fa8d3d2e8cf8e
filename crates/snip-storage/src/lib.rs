//! Storage backends for snip.
//!
//! Two interchangeable implementations of the `snip-core` storage
//! contracts: an in-memory backend for development and tests, and a MySQL
//! backend whose unique indexes enforce code and email uniqueness.

pub mod memory;
pub mod mysql;

pub use memory::{InMemoryPendingStore, InMemoryRepository, InMemoryUserRepository};
pub use mysql::{MySqlPendingStore, MySqlRepository, MySqlUserRepository};
pub use snip_core::error::{Result, StorageError};
pub use snip_core::{PendingRegistrationStore, ReadRepository, Repository, UserRepository};
