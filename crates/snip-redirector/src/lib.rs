//! Short code resolution with read-through caching.
//!
//! [`RedirectorService`] resolves short codes to their stored link records.
//! Caching is added transparently with the repository decorator
//! [`CachedRepository`], which composes any `snip_core::Repository` with a
//! [`LinkCache`] such as [`MokaLinkCache`].
//!
//! ```rust
//! use snip_redirector::{CachedRepository, MokaLinkCache, Redirector, RedirectorService};
//! use snip_storage::InMemoryRepository;
//! use snip_core::ShortCode;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let repository = CachedRepository::new(InMemoryRepository::new(), MokaLinkCache::new());
//! let service = RedirectorService::new(repository);
//!
//! let code = ShortCode::new("XyAB")?;
//! if let Some(record) = service.resolve(&code).await? {
//!     println!("Redirect to: {}", record.original_url);
//! }
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod error;
pub mod redirector;
pub mod repository;
pub mod service;

pub use cache::{LinkCache, MokaLinkCache};
pub use error::{RedirectorError, Result};
pub use redirector::Redirector;
pub use repository::CachedRepository;
pub use service::RedirectorService;
