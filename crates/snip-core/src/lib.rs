//! Core types and traits for the snip URL shortener.
//!
//! This crate provides the domain types and storage contracts shared by
//! the allocator, the resolver, the auth flow and the storage backends.

pub mod error;
pub mod link;
pub mod mailer;
pub mod repository;
pub mod shortcode;
pub mod user;

pub use error::{CoreError, MailError, StorageError};
pub use link::{LinkRecord, LinkScope};
pub use mailer::{Mail, Mailer};
pub use repository::{PendingRegistrationStore, ReadRepository, Repository, UserRepository};
pub use shortcode::ShortCode;
pub use user::{PendingRegistration, UserRecord};
