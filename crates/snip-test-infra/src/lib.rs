//! Test support shared by the snip crates.

pub mod error;
pub mod mailer;
pub mod mysql;

pub use error::{Result, TestInfraError};
