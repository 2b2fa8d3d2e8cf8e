//! HTTP front end for snip.
//!
//! Serves the link, redirect and account routes over `axum`, keeping the
//! signed-in user, the pending registration token and one-shot flash
//! messages in encrypted cookies.

pub mod app;
pub mod cli;
pub mod error;
pub mod handlers;
pub mod model;
pub mod session;
pub mod state;

pub use app::App;
pub use error::{AppError, Result};
pub use state::{AppState, Services};
