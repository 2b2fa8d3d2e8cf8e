use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Input for a new registration.
#[derive(Debug, Clone)]
pub struct RegisterParams {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// The minimal identity kept in a signed-in session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub username: String,
    pub email: String,
}

#[async_trait]
pub trait Authenticator: Send + Sync + 'static {
    /// Starts a registration and emails a one-time password.
    ///
    /// Returns the opaque token under which the pending registration is held.
    async fn register(&self, params: RegisterParams) -> Result<String>;

    /// Returns `true` if a live pending registration exists for `token`.
    async fn has_pending(&self, token: &str) -> Result<bool>;

    /// Confirms a pending registration, creating the user.
    ///
    /// On a wrong code the pending registration is kept for another attempt.
    async fn verify_otp(&self, token: &str, otp: &str) -> Result<SessionUser>;

    /// Checks credentials for a registered user.
    async fn login(&self, email: &str, password: &str) -> Result<SessionUser>;
}
