//! Short code allocation.
//!
//! This crate provides the [`Shortener`] contract and [`ShortenerService`],
//! which maps destination URLs to unique short codes on top of any
//! `snip_core::Repository` and `snip_generator::Generator`.

pub mod error;
pub mod service;
pub mod shortener;

pub use error::ShortenerError;
pub use service::{ShortenerService, MAX_ALLOCATION_ATTEMPTS};
pub use shortener::{ShortenOutcome, ShortenParams, Shortener};
