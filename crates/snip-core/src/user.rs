use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// A registered, email-verified user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    pub username: String,
    /// Unique across all users.
    pub email: String,
    /// PHC-formatted password hash. Plaintext passwords are never stored.
    pub password_hash: String,
    pub created_at: Timestamp,
}

/// A registration waiting for its emailed one-time password.
///
/// Held in a [`PendingRegistrationStore`](crate::PendingRegistrationStore)
/// under an opaque session token until it is verified or `expires_at` passes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingRegistration {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub otp_code: String,
    pub expires_at: Timestamp,
}

impl PendingRegistration {
    pub fn is_expired(&self) -> bool {
        Timestamp::now() >= self.expires_at
    }

    /// Converts a verified registration into a durable user record.
    pub fn into_user(self) -> UserRecord {
        UserRecord {
            username: self.username,
            email: self.email,
            password_hash: self.password_hash,
            created_at: Timestamp::now(),
        }
    }
}
