//! Registration, email OTP verification and login.
//!
//! [`AuthService`] implements the [`Authenticator`] contract on top of a
//! `UserRepository`, a `PendingRegistrationStore` and a `Mailer`. A
//! registration is held as a pending record under an opaque token until the
//! emailed one-time password is confirmed, and only then becomes a user.

pub mod authenticator;
pub mod error;
pub mod otp;
pub mod password;
pub mod service;

pub use authenticator::{Authenticator, RegisterParams, SessionUser};
pub use error::{AuthError, Result};
pub use service::{AuthService, PENDING_TTL};
