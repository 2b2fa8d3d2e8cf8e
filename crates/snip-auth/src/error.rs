use snip_core::{MailError, StorageError};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, AuthError>;

#[derive(Debug, Clone, Error)]
pub enum AuthError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("email is already registered")]
    EmailAlreadyRegistered,
    #[error("no registration is awaiting verification")]
    NoPendingRegistration,
    #[error("invalid one-time password")]
    InvalidOtp,
    #[error("email is not registered")]
    EmailNotRegistered,
    #[error("incorrect password")]
    InvalidPassword,
    #[error("failed to send verification email: {0}")]
    Mail(#[from] MailError),
    #[error("password hashing failed: {0}")]
    PasswordHash(String),
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}
